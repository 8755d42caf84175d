use std::fmt;

use refmine_core::{TextRange, TextSize};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::SyntaxKind;

/// Index of a node inside the [`SyntaxTree`] that allocated it.
///
/// Ids are only meaningful for their own tree; the root is always `NodeId(0)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(u32);

impl NodeId {
    pub const ROOT: NodeId = NodeId(0);

    #[inline]
    pub const fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    #[inline]
    pub const fn to_raw(self) -> u32 {
        self.0
    }

    #[inline]
    fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    pub kind: SyntaxKind,
    /// Literal payload, e.g. identifier text. Empty for structural nodes.
    pub label: String,
    pub range: TextRange,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TreeError {
    #[error("node {node} span {range:?} exceeds the text length {text_len:?}")]
    SpanOutOfBounds {
        node: NodeId,
        range: TextRange,
        text_len: TextSize,
    },
    #[error("node {child} span {child_range:?} escapes its parent {parent} span {parent_range:?}")]
    SpanEscapesParent {
        parent: NodeId,
        parent_range: TextRange,
        child: NodeId,
        child_range: TextRange,
    },
    #[error("node {0} does not exist")]
    UnknownNode(NodeId),
    #[error("span at {pos} with length {length} overflows the offset range")]
    SpanOverflow { pos: u32, length: u32 },
}

/// An ordered, labeled tree stored as an arena together with the text it was
/// parsed from.
///
/// Children own nothing: every node lives in the arena and refers to its parent
/// and children by [`NodeId`]. Accessors panic on ids from another tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxTree {
    text: String,
    nodes: Vec<Node>,
}

impl SyntaxTree {
    #[inline]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[inline]
    pub fn root(&self) -> NodeId {
        NodeId::ROOT
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    #[inline]
    pub fn contains(&self, id: NodeId) -> bool {
        id.index() < self.nodes.len()
    }

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.index())
    }

    #[inline]
    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.index()]
    }

    #[inline]
    pub fn kind(&self, id: NodeId) -> SyntaxKind {
        self.node(id).kind
    }

    #[inline]
    pub fn label(&self, id: NodeId) -> &str {
        &self.node(id).label
    }

    #[inline]
    pub fn range(&self, id: NodeId) -> TextRange {
        self.node(id).range
    }

    #[inline]
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).parent
    }

    #[inline]
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.node(id).children
    }

    /// Whether `id` is a type reference node.
    #[inline]
    pub fn is_type_node(&self, id: NodeId) -> bool {
        self.kind(id).is_type()
    }

    /// Iterate over the strict ancestors of `id`, nearest first.
    pub fn ancestors(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        std::iter::successors(self.parent(id), move |&node| self.parent(node))
    }

    /// All node ids in allocation order.
    pub fn node_ids(&self) -> impl Iterator<Item = NodeId> + ExactSizeIterator {
        (0..self.nodes.len() as u32).map(NodeId)
    }

    /// First direct child of `id` with the given kind.
    pub fn child_of_kind(&self, id: NodeId, kind: SyntaxKind) -> Option<NodeId> {
        self.children(id)
            .iter()
            .copied()
            .find(|&child| self.kind(child) == kind)
    }

    /// Source text covered by the node's span, or `""` when the span does not
    /// land on char boundaries.
    pub fn source_text(&self, id: NodeId) -> &str {
        let range = self.range(id);
        self.text
            .get(usize::from(range.start())..usize::from(range.end()))
            .unwrap_or("")
    }

    /// Human readable label used in signatures and rewrite keys.
    ///
    /// Structural nodes have an empty label; for those we fall back to the covered
    /// source text, except for type declarations and compilation units which are
    /// abbreviated to `...`.
    pub fn display_label(&self, id: NodeId) -> &str {
        let node = self.node(id);
        if !node.label.is_empty() {
            return &node.label;
        }
        match node.kind {
            SyntaxKind::TypeDeclaration | SyntaxKind::CompilationUnit => "...",
            _ => self.source_text(id),
        }
    }

    /// Whether the subtree at `id` has the same shape as the subtree at
    /// `other_id` in `other`: equal kinds, equal labels and pairwise isomorphic
    /// children.
    pub fn is_isomorphic(&self, id: NodeId, other: &SyntaxTree, other_id: NodeId) -> bool {
        let mut stack = vec![(id, other_id)];
        while let Some((a, b)) = stack.pop() {
            let left = self.node(a);
            let right = other.node(b);
            if left.kind != right.kind
                || left.label != right.label
                || left.children.len() != right.children.len()
            {
                return false;
            }
            stack.extend(
                left.children
                    .iter()
                    .copied()
                    .zip(right.children.iter().copied()),
            );
        }
        true
    }
}

/// Incrementally builds a [`SyntaxTree`].
///
/// Nodes are allocated in push order; the root is created by [`TreeBuilder::new`]
/// and spans the whole text.
#[derive(Debug)]
pub struct TreeBuilder {
    text: String,
    nodes: Vec<Node>,
}

impl TreeBuilder {
    pub fn new(text: impl Into<String>, root_kind: SyntaxKind) -> Self {
        let text = text.into();
        let len = TextSize::from(text.len() as u32);
        Self::with_root_range(text, root_kind, "", TextRange::new(0.into(), len))
    }

    pub fn with_root_range(
        text: impl Into<String>,
        root_kind: SyntaxKind,
        root_label: impl Into<String>,
        root_range: TextRange,
    ) -> Self {
        Self {
            text: text.into(),
            nodes: vec![Node {
                kind: root_kind,
                label: root_label.into(),
                range: root_range,
                parent: None,
                children: Vec::new(),
            }],
        }
    }

    pub fn root(&self) -> NodeId {
        NodeId::ROOT
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Append a node as the last child of `parent`.
    ///
    /// Fails if `parent` has not been allocated by this builder.
    pub fn push(
        &mut self,
        parent: NodeId,
        kind: SyntaxKind,
        label: impl Into<String>,
        range: TextRange,
    ) -> Result<NodeId, TreeError> {
        if parent.index() >= self.nodes.len() {
            return Err(TreeError::UnknownNode(parent));
        }
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(Node {
            kind,
            label: label.into(),
            range,
            parent: Some(parent),
            children: Vec::new(),
        });
        self.nodes[parent.index()].children.push(id);
        Ok(id)
    }

    /// Validate span invariants and produce the tree.
    pub fn finish(self) -> Result<SyntaxTree, TreeError> {
        let text_len = TextSize::from(self.text.len() as u32);
        for (idx, node) in self.nodes.iter().enumerate() {
            let id = NodeId(idx as u32);
            if node.range.end() > text_len {
                return Err(TreeError::SpanOutOfBounds {
                    node: id,
                    range: node.range,
                    text_len,
                });
            }
            if let Some(parent) = node.parent {
                let parent_range = self.nodes[parent.index()].range;
                if !parent_range.contains_range(node.range) {
                    return Err(TreeError::SpanEscapesParent {
                        parent,
                        parent_range,
                        child: id,
                        child_range: node.range,
                    });
                }
            }
        }
        Ok(SyntaxTree {
            text: self.text,
            nodes: self.nodes,
        })
    }
}
