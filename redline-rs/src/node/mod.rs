//! Node structures for markup tree representation.
//!
//! A [`MarkupTree`] is an immutable arena of [`MarkupNode`]s addressed by
//! [`NodeId`]. Children are ordered index lists; there are no parent
//! pointers and nothing can be mutated once the tree is built, so a tree
//! can be shared freely across threads while extractions read it.

mod content;
pub mod namespace;

pub use content::{MarkupElement, MarkupText, NodeContent};
pub use namespace::{ExpandedName, NamespaceContext};

use std::collections::HashMap;
use std::fmt;

use serde::Serialize;

use crate::error::{Error, Result};
use crate::revision::RevisionState;

/// Index of a node within its [`MarkupTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct NodeId(usize);

impl NodeId {
    /// Creates a node id from a raw arena index.
    pub fn new(index: usize) -> Self {
        NodeId(index)
    }

    /// Returns the raw arena index.
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A node in the markup tree.
#[derive(Debug, Clone, PartialEq)]
pub struct MarkupNode {
    content: NodeContent,
    children: Vec<NodeId>,
}

impl MarkupNode {
    /// Creates a node with the given content and children.
    pub fn new(content: NodeContent, children: Vec<NodeId>) -> Self {
        MarkupNode { content, children }
    }

    /// Creates a childless element node.
    pub fn element(element: MarkupElement) -> Self {
        Self::new(NodeContent::Element(element), Vec::new())
    }

    /// Creates a text leaf.
    pub fn text(text: impl Into<String>) -> Self {
        Self::new(NodeContent::Text(MarkupText::new(text)), Vec::new())
    }

    /// Returns the content of this node.
    pub fn content(&self) -> &NodeContent {
        &self.content
    }

    /// Returns the child references in document order.
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    /// Returns the element, if this is an element node.
    pub fn as_element(&self) -> Option<&MarkupElement> {
        self.content.as_element()
    }

    /// Returns the text content, if this is a text leaf.
    pub fn text_content(&self) -> Option<&str> {
        self.content.as_text().map(MarkupText::as_str)
    }

    /// Returns the unprefixed tag name, if this is an element node.
    pub fn local_name(&self) -> Option<&str> {
        self.as_element().map(MarkupElement::local_name)
    }
}

/// An immutable snapshot of a document's markup.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MarkupTree {
    nodes: Vec<MarkupNode>,
    root: Option<NodeId>,
}

impl MarkupTree {
    /// Wraps a host-supplied arena without validating it.
    ///
    /// Child ids that do not resolve and child references that form cycles
    /// are tolerated here and reported as malformed during traversal.
    pub fn from_raw_parts(nodes: Vec<MarkupNode>, root: Option<NodeId>) -> Self {
        MarkupTree { nodes, root }
    }

    /// Returns the root id, if any.
    pub fn root(&self) -> Option<NodeId> {
        self.root
    }

    /// Returns the root node.
    pub fn root_node(&self) -> Result<&MarkupNode> {
        self.root
            .and_then(|id| self.get(id))
            .ok_or(Error::MissingDocumentRoot)
    }

    /// Dereferences a node id.
    pub fn get(&self, id: NodeId) -> Option<&MarkupNode> {
        self.nodes.get(id.0)
    }

    /// Returns the number of nodes in the arena.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns true if the arena holds no nodes.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Iterates over revision-marked elements in document order.
    ///
    /// Dangling and repeated child references are skipped silently; the
    /// reconstructor is where they get reported.
    pub fn revisions(&self) -> Revisions<'_> {
        Revisions {
            tree: self,
            stack: self.root.into_iter().collect(),
            visited: vec![false; self.nodes.len()],
        }
    }
}

/// Iterator returned by [`MarkupTree::revisions`].
pub struct Revisions<'a> {
    tree: &'a MarkupTree,
    stack: Vec<NodeId>,
    visited: Vec<bool>,
}

impl<'a> Iterator for Revisions<'a> {
    type Item = (NodeId, &'a MarkupNode, RevisionState);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(id) = self.stack.pop() {
            let Some(node) = self.tree.get(id) else {
                continue;
            };
            if std::mem::replace(&mut self.visited[id.0], true) {
                continue;
            }
            self.stack.extend(node.children().iter().rev());

            let state = RevisionState::classify(node);
            if state.is_marked() {
                return Some((id, node, state));
            }
        }
        None
    }
}

/// Incrementally assembles a [`MarkupTree`].
///
/// Every id handed out by the builder resolves in the finished tree.
#[derive(Debug, Default)]
pub struct TreeBuilder {
    nodes: Vec<MarkupNode>,
    root: Option<NodeId>,
}

impl TreeBuilder {
    /// Creates an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds the root element and returns its id.
    pub fn root(&mut self, element: MarkupElement) -> NodeId {
        let id = self.push(MarkupNode::element(element));
        self.root = Some(id);
        id
    }

    /// Appends an element as the last child of `parent`.
    pub fn element(&mut self, parent: NodeId, element: MarkupElement) -> NodeId {
        let id = self.push(MarkupNode::element(element));
        self.append_child(parent, id);
        id
    }

    /// Appends an element with no attributes.
    pub fn tag(&mut self, parent: NodeId, name: &str) -> NodeId {
        self.element(parent, MarkupElement::new(name, HashMap::new()))
    }

    /// Appends a text leaf as the last child of `parent`.
    pub fn text(&mut self, parent: NodeId, text: impl Into<String>) -> NodeId {
        let id = self.push(MarkupNode::text(text));
        self.append_child(parent, id);
        id
    }

    /// Finishes the tree.
    pub fn finish(self) -> MarkupTree {
        MarkupTree {
            nodes: self.nodes,
            root: self.root,
        }
    }

    fn push(&mut self, node: MarkupNode) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(node);
        id
    }

    fn append_child(&mut self, parent: NodeId, child: NodeId) {
        if let Some(node) = self.nodes.get_mut(parent.0) {
            node.children.push(child);
        }
    }
}
