//! Revision classification and projection inclusion rules.

use std::fmt;

use serde::Serialize;

use crate::constants::{TAG_DELETED, TAG_INSERTED, TAG_MOVE_FROM, TAG_MOVE_TO};
use crate::node::MarkupNode;

/// Revision marker carried by a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RevisionState {
    /// Ordinary content.
    #[default]
    None,
    /// Pending deletion.
    Deleted,
    /// Pending insertion.
    Inserted,
    /// Source side of a move.
    MoveFrom,
    /// Destination side of a move.
    MoveTo,
}

impl RevisionState {
    /// Classifies a node by its unprefixed tag name.
    ///
    /// Text nodes and unrecognised tags are [`RevisionState::None`].
    pub fn classify(node: &MarkupNode) -> Self {
        node.local_name()
            .map_or(RevisionState::None, Self::from_local_name)
    }

    /// Maps an unprefixed tag name to a revision state.
    ///
    /// Matching is exact: `delText` or `moveFromRangeStart` are not markers.
    pub fn from_local_name(name: &str) -> Self {
        match name {
            TAG_DELETED => RevisionState::Deleted,
            TAG_INSERTED => RevisionState::Inserted,
            TAG_MOVE_FROM => RevisionState::MoveFrom,
            TAG_MOVE_TO => RevisionState::MoveTo,
            _ => RevisionState::None,
        }
    }

    /// Returns true for every state except [`RevisionState::None`].
    pub fn is_marked(self) -> bool {
        self != RevisionState::None
    }

    /// Resolves the state in effect below a node with state `self`, given
    /// the state inherited from its ancestors. The innermost marker wins.
    pub fn within(self, inherited: RevisionState) -> RevisionState {
        if self.is_marked() {
            self
        } else {
            inherited
        }
    }
}

impl fmt::Display for RevisionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RevisionState::None => "none",
            RevisionState::Deleted => "deleted",
            RevisionState::Inserted => "inserted",
            RevisionState::MoveFrom => "move-from",
            RevisionState::MoveTo => "move-to",
        };
        f.write_str(name)
    }
}

/// Which reading of the document to reconstruct.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectionKind {
    /// The document before any pending edit.
    Original,
    /// The document once every pending edit is accepted.
    Revised,
}

impl ProjectionKind {
    /// Both projections, in the order they are extracted.
    pub const ALL: [ProjectionKind; 2] = [ProjectionKind::Original, ProjectionKind::Revised];

    /// Whether text whose effective state is `state` belongs to this
    /// projection.
    ///
    /// Moves behave as a deletion at the source and an insertion at the
    /// destination, so moved text lands exactly once in each projection.
    pub fn includes(self, state: RevisionState) -> bool {
        match (self, state) {
            (_, RevisionState::None) => true,
            (ProjectionKind::Original, RevisionState::Deleted | RevisionState::MoveFrom) => true,
            (ProjectionKind::Original, RevisionState::Inserted | RevisionState::MoveTo) => false,
            (ProjectionKind::Revised, RevisionState::Inserted | RevisionState::MoveTo) => true,
            (ProjectionKind::Revised, RevisionState::Deleted | RevisionState::MoveFrom) => false,
        }
    }
}

impl fmt::Display for ProjectionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProjectionKind::Original => f.write_str("original"),
            ProjectionKind::Revised => f.write_str("revised"),
        }
    }
}
