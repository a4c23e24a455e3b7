//! Text reconstruction for a single projection.
//!
//! The walk is a depth-first, children-in-sequence traversal driven by an
//! explicit stack. Each frame carries the revision state inherited from its
//! ancestors, which is the active marker context for that subtree.

use std::fmt;

use serde::Serialize;

use crate::error::{Error, Result};
use crate::node::{MarkupTree, NodeId};
use crate::revision::{ProjectionKind, RevisionState};

/// Why a child reference was not followed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// The child id does not resolve to a node.
    Dangling,
    /// The child was already reached earlier in this walk (shared subtree
    /// or cycle).
    Revisited,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::Dangling => f.write_str("reference does not resolve"),
            SkipReason::Revisited => f.write_str("node already visited"),
        }
    }
}

/// A child reference skipped during traversal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct SkippedChild {
    /// The node holding the bad reference.
    pub parent: NodeId,
    /// Position of the reference among the parent's children.
    pub position: usize,
    /// The unresolvable or repeated id.
    pub child: NodeId,
    /// Why it was skipped.
    pub reason: SkipReason,
}

/// Text of one projection plus everything the walk had to skip.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Reconstruction {
    /// Included text fragments, concatenated in document order.
    pub text: String,
    /// Skipped child references, in document order.
    pub skipped: Vec<SkippedChild>,
}

#[derive(Debug, Clone, Copy)]
struct Frame {
    /// `(parent, position)` of the reference that led here; `None` for the root.
    origin: Option<(NodeId, usize)>,
    id: NodeId,
    inherited: RevisionState,
}

/// Rebuilds projection text from a borrowed tree.
///
/// Holds nothing but the borrow, so any number of reconstructors may read
/// the same tree at once.
#[derive(Debug, Clone, Copy)]
pub struct TextReconstructor<'t> {
    tree: &'t MarkupTree,
}

impl<'t> TextReconstructor<'t> {
    /// Creates a reconstructor over `tree`.
    pub fn new(tree: &'t MarkupTree) -> Self {
        TextReconstructor { tree }
    }

    /// Returns the text of `projection`.
    pub fn reconstruct(&self, projection: ProjectionKind) -> Result<String> {
        self.reconstruct_with_diagnostics(projection)
            .map(|reconstruction| reconstruction.text)
    }

    /// Returns the text of `projection` and the child references skipped
    /// on the way.
    ///
    /// Fails only when the tree has no resolvable root.
    pub fn reconstruct_with_diagnostics(
        &self,
        projection: ProjectionKind,
    ) -> Result<Reconstruction> {
        let tree = self.tree;
        let root = tree.root().ok_or(Error::MissingDocumentRoot)?;
        if tree.get(root).is_none() {
            return Err(Error::MissingDocumentRoot);
        }

        let mut out = Reconstruction::default();
        let mut visited = vec![false; tree.len()];
        let mut stack = vec![Frame {
            origin: None,
            id: root,
            inherited: RevisionState::None,
        }];

        while let Some(frame) = stack.pop() {
            let Some(node) = tree.get(frame.id) else {
                out.skip(frame, SkipReason::Dangling);
                continue;
            };
            if std::mem::replace(&mut visited[frame.id.index()], true) {
                out.skip(frame, SkipReason::Revisited);
                continue;
            }

            if let Some(text) = node.text_content() {
                if projection.includes(frame.inherited) {
                    out.text.push_str(text);
                }
            }

            // Excluded subtrees are still walked: an inner marker may
            // re-include its text.
            let state = RevisionState::classify(node).within(frame.inherited);
            for (position, &child) in node.children().iter().enumerate().rev() {
                stack.push(Frame {
                    origin: Some((frame.id, position)),
                    id: child,
                    inherited: state,
                });
            }
        }

        Ok(out)
    }
}

impl Reconstruction {
    fn skip(&mut self, frame: Frame, reason: SkipReason) {
        // The root is validated before the walk, so every skipped frame
        // came from a child reference.
        if let Some((parent, position)) = frame.origin {
            self.skipped.push(SkippedChild {
                parent,
                position,
                child: frame.id,
                reason,
            });
        }
    }
}

/// Reconstructs `projection` from `tree`.
pub fn reconstruct(tree: &MarkupTree, projection: ProjectionKind) -> Result<String> {
    TextReconstructor::new(tree).reconstruct(projection)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::{MarkupElement, MarkupNode, NodeContent, TreeBuilder};
    use std::collections::HashMap;

    fn both(tree: &MarkupTree) -> (String, String) {
        (
            reconstruct(tree, ProjectionKind::Original).unwrap(),
            reconstruct(tree, ProjectionKind::Revised).unwrap(),
        )
    }

    fn body() -> (TreeBuilder, NodeId) {
        let mut b = TreeBuilder::new();
        let root = b.root(MarkupElement::new("w:body", HashMap::new()));
        (b, root)
    }

    #[test]
    fn test_deletion_scenario() {
        let (mut b, root) = body();
        b.text(root, "The party shall ");
        let del = b.tag(root, "w:del");
        b.text(del, "not ");
        b.text(root, "indemnify.");
        let tree = b.finish();

        let (original, revised) = both(&tree);
        assert_eq!(original, "The party shall not indemnify.");
        assert_eq!(revised, "The party shall indemnify.");
    }

    #[test]
    fn test_insertion_scenario() {
        let (mut b, root) = body();
        b.text(root, "Payment due in ");
        let ins = b.tag(root, "w:ins");
        b.text(ins, "thirty ");
        b.text(root, "days.");
        let tree = b.finish();

        let (original, revised) = both(&tree);
        assert_eq!(original, "Payment due in days.");
        assert_eq!(revised, "Payment due in thirty days.");
    }

    #[test]
    fn test_marker_applies_to_whole_subtree() {
        // del > r > delText > "gone"
        let (mut b, root) = body();
        b.text(root, "keep ");
        let del = b.tag(root, "w:del");
        let run = b.tag(del, "w:r");
        let del_text = b.tag(run, "w:delText");
        b.text(del_text, "gone");
        let tree = b.finish();

        let (original, revised) = both(&tree);
        assert_eq!(original, "keep gone");
        assert_eq!(revised, "keep ");
    }

    #[test]
    fn test_deleted_inside_inserted_uses_innermost() {
        // An insertion that was later struck: "A" is inserted, "B" is an
        // insertion whose content was then deleted.
        let (mut b, root) = body();
        let ins = b.tag(root, "w:ins");
        b.text(ins, "A");
        let del = b.tag(ins, "w:del");
        b.text(del, "B");
        b.text(ins, "C");
        let tree = b.finish();

        let (original, revised) = both(&tree);
        assert_eq!(original, "B");
        assert_eq!(revised, "AC");
    }

    #[test]
    fn test_inserted_inside_deleted_uses_innermost() {
        let (mut b, root) = body();
        let del = b.tag(root, "w:del");
        b.text(del, "x");
        let ins = b.tag(del, "w:ins");
        b.text(ins, "y");
        let tree = b.finish();

        let (original, revised) = both(&tree);
        assert_eq!(original, "x");
        assert_eq!(revised, "y");
    }

    #[test]
    fn test_move_appears_once_per_projection() {
        let (mut b, root) = body();
        let from = b.tag(root, "w:moveFrom");
        b.text(from, "Clause 4. ");
        b.text(root, "Clause 5. ");
        let to = b.tag(root, "w:moveTo");
        b.text(to, "Clause 4. ");
        let tree = b.finish();

        let (original, revised) = both(&tree);
        assert_eq!(original, "Clause 4. Clause 5. ");
        assert_eq!(revised, "Clause 5. Clause 4. ");
    }

    #[test]
    fn test_deletion_inside_move_source() {
        let (mut b, root) = body();
        let from = b.tag(root, "w:moveFrom");
        b.text(from, "a");
        let del = b.tag(from, "w:del");
        b.text(del, "b");
        let tree = b.finish();

        let (original, revised) = both(&tree);
        assert_eq!(original, "ab");
        assert_eq!(revised, "");
    }

    #[test]
    fn test_whitespace_leaves_are_ordinary_text() {
        let (mut b, root) = body();
        b.text(root, "a");
        let del = b.tag(root, "w:del");
        b.text(del, " ");
        b.text(root, " ");
        b.text(root, "b");
        let tree = b.finish();

        let (original, revised) = both(&tree);
        assert_eq!(original, "a  b");
        assert_eq!(revised, "a b");
    }

    #[test]
    fn test_unknown_tags_are_transparent() {
        let (mut b, root) = body();
        let p = b.tag(root, "w:p");
        let custom = b.tag(p, "foo:deletion");
        b.text(custom, "stays");
        let tree = b.finish();

        let (original, revised) = both(&tree);
        assert_eq!(original, "stays");
        assert_eq!(revised, "stays");
    }

    #[test]
    fn test_missing_root_is_an_error() {
        let tree = MarkupTree::default();
        assert!(matches!(
            reconstruct(&tree, ProjectionKind::Original),
            Err(Error::MissingDocumentRoot)
        ));
    }

    #[test]
    fn test_dangling_child_is_skipped() {
        let element = |name: &str| NodeContent::Element(MarkupElement::new(name, HashMap::new()));
        let nodes = vec![
            MarkupNode::new(
                element("body"),
                vec![NodeId::new(1), NodeId::new(42), NodeId::new(2)],
            ),
            MarkupNode::text("left "),
            MarkupNode::text("right"),
        ];
        let tree = MarkupTree::from_raw_parts(nodes, Some(NodeId::new(0)));

        let result = TextReconstructor::new(&tree)
            .reconstruct_with_diagnostics(ProjectionKind::Revised)
            .unwrap();
        assert_eq!(result.text, "left right");
        assert_eq!(
            result.skipped,
            vec![SkippedChild {
                parent: NodeId::new(0),
                position: 1,
                child: NodeId::new(42),
                reason: SkipReason::Dangling,
            }]
        );
    }

    #[test]
    fn test_cycle_is_skipped() {
        let element = |name: &str| NodeContent::Element(MarkupElement::new(name, HashMap::new()));
        let nodes = vec![
            MarkupNode::new(element("body"), vec![NodeId::new(1)]),
            MarkupNode::new(element("w:ins"), vec![NodeId::new(2), NodeId::new(0)]),
            MarkupNode::text("new"),
        ];
        let tree = MarkupTree::from_raw_parts(nodes, Some(NodeId::new(0)));

        let result = TextReconstructor::new(&tree)
            .reconstruct_with_diagnostics(ProjectionKind::Revised)
            .unwrap();
        assert_eq!(result.text, "new");
        assert_eq!(result.skipped.len(), 1);
        assert_eq!(result.skipped[0].reason, SkipReason::Revisited);
        assert_eq!(result.skipped[0].parent, NodeId::new(1));
    }

    #[test]
    fn test_deep_nesting_does_not_recurse() {
        let (mut b, root) = body();
        let mut parent = root;
        for depth in 0..100_000 {
            parent = b.tag(parent, if depth % 2 == 0 { "w:ins" } else { "w:r" });
        }
        b.text(parent, "deep");
        let tree = b.finish();

        let (original, revised) = both(&tree);
        assert_eq!(original, "");
        assert_eq!(revised, "deep");
    }

    #[test]
    fn test_reconstruct_is_repeatable() {
        let (mut b, root) = body();
        b.text(root, "x");
        let tree = b.finish();
        let reconstructor = TextReconstructor::new(&tree);
        assert_eq!(
            reconstructor.reconstruct(ProjectionKind::Original).unwrap(),
            reconstructor.reconstruct(ProjectionKind::Original).unwrap()
        );
    }
}
