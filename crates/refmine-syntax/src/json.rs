//! JSON interchange for trees, correspondences and edit scripts.
//!
//! The node layout follows GumTree's JSON tree output (`type`, `label`, `pos`,
//! `length`, `children`); `pos`/`length` are accepted either as numbers or as
//! the decimal strings GumTree writes. Node ids used by `mappings` and
//! `actions` are pre-order indices of the respective tree.

use std::collections::HashMap;

use refmine_core::TextRange;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

use crate::{
    EditAction, MappingError, NodeCorrespondence, NodeId, SyntaxKind, SyntaxTree, TreeBuilder,
    TreeDiff, TreeError,
};

#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("failed to parse diff document")]
    Json(#[from] serde_json::Error),
    #[error("invalid tree")]
    Tree(#[from] TreeError),
    #[error("invalid mapping")]
    Mapping(#[from] MappingError),
    #[error("the {side} tree has no node {node}")]
    DanglingNode { side: &'static str, node: NodeId },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawNode {
    #[serde(rename = "type")]
    pub kind: SyntaxKind,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub label: String,
    #[serde(deserialize_with = "offset")]
    pub pos: u32,
    #[serde(deserialize_with = "offset")]
    pub length: u32,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<RawNode>,
}

impl RawNode {
    fn range(&self) -> Result<TextRange, TreeError> {
        let end = self
            .pos
            .checked_add(self.length)
            .ok_or(TreeError::SpanOverflow {
                pos: self.pos,
                length: self.length,
            })?;
        Ok(TextRange::new(self.pos.into(), end.into()))
    }
}

fn offset<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Offset {
        Number(u32),
        Text(String),
    }

    match Offset::deserialize(deserializer)? {
        Offset::Number(value) => Ok(value),
        Offset::Text(text) => text.trim().parse().map_err(D::Error::custom),
    }
}

/// A tree together with the text it was parsed from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeDocument {
    pub text: String,
    pub root: RawNode,
}

impl TreeDocument {
    /// Build the arena tree, allocating ids in pre-order.
    pub fn into_tree(self) -> Result<SyntaxTree, TreeError> {
        let TreeDocument { text, root } = self;
        let mut builder =
            TreeBuilder::with_root_range(text, root.kind, root.label.clone(), root.range()?);

        let mut stack: Vec<(NodeId, RawNode)> = root
            .children
            .into_iter()
            .rev()
            .map(|child| (NodeId::ROOT, child))
            .collect();
        while let Some((parent, mut node)) = stack.pop() {
            let children = std::mem::take(&mut node.children);
            let range = node.range()?;
            let id = builder.push(parent, node.kind, node.label, range)?;
            stack.extend(children.into_iter().rev().map(|child| (id, child)));
        }

        builder.finish()
    }

    /// Serialize a tree. Returns the document and the pre-order index assigned
    /// to every node id of `tree`.
    pub fn from_tree(tree: &SyntaxTree) -> (Self, HashMap<NodeId, NodeId>) {
        let mut order = HashMap::with_capacity(tree.len());
        let root = raw_node(tree, tree.root(), &mut order);
        (
            TreeDocument {
                text: tree.text().to_string(),
                root,
            },
            order,
        )
    }
}

fn raw_node(tree: &SyntaxTree, id: NodeId, order: &mut HashMap<NodeId, NodeId>) -> RawNode {
    order.insert(id, NodeId::from_raw(order.len() as u32));
    let range = tree.range(id);
    RawNode {
        kind: tree.kind(id),
        label: tree.label(id).to_string(),
        pos: range.start().into(),
        length: range.len().into(),
        children: tree
            .children(id)
            .iter()
            .map(|&child| raw_node(tree, child, order))
            .collect(),
    }
}

/// Everything the classifiers need for one file pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiffDocument {
    pub path: String,
    pub before: TreeDocument,
    pub after: TreeDocument,
    #[serde(default)]
    pub mappings: Vec<(NodeId, NodeId)>,
    #[serde(default)]
    pub actions: Vec<EditAction>,
}

impl DiffDocument {
    pub fn from_json(text: &str) -> Result<Self, DocumentError> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn to_json(&self) -> Result<String, DocumentError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Validate the document and build the trees it describes.
    pub fn into_tree_diff(self) -> Result<(String, TreeDiff), DocumentError> {
        let before = self.before.into_tree()?;
        let after = self.after.into_tree()?;

        let check = |tree: &SyntaxTree, side: &'static str, node: NodeId| {
            if tree.contains(node) {
                Ok(())
            } else {
                Err(DocumentError::DanglingNode { side, node })
            }
        };

        let mut mappings = NodeCorrespondence::new();
        for (src, dst) in self.mappings {
            check(&before, "source", src)?;
            check(&after, "destination", dst)?;
            mappings.insert(src, dst)?;
        }
        for action in &self.actions {
            match action {
                EditAction::Insert { node } => check(&after, "destination", *node)?,
                _ => check(&before, "source", action.node())?,
            }
        }

        tracing::debug!(
            path = %self.path,
            before_nodes = before.len(),
            after_nodes = after.len(),
            mappings = mappings.len(),
            actions = self.actions.len(),
            "loaded diff document"
        );

        Ok((
            self.path,
            TreeDiff {
                before,
                after,
                mappings,
                actions: self.actions,
            },
        ))
    }

    pub fn from_tree_diff(path: impl Into<String>, diff: &TreeDiff) -> Self {
        let (before, src_order) = TreeDocument::from_tree(&diff.before);
        let (after, dst_order) = TreeDocument::from_tree(&diff.after);
        let src = |id: NodeId| src_order.get(&id).copied().unwrap_or(id);
        let dst = |id: NodeId| dst_order.get(&id).copied().unwrap_or(id);

        let mappings = diff
            .mappings
            .iter()
            .map(|(a, b)| (src(a), dst(b)))
            .collect();
        let actions = diff
            .actions
            .iter()
            .map(|action| match action {
                EditAction::Insert { node } => EditAction::Insert { node: dst(*node) },
                EditAction::Delete { node } => EditAction::Delete { node: src(*node) },
                EditAction::Update { node, label } => EditAction::Update {
                    node: src(*node),
                    label: label.clone(),
                },
                EditAction::Move { node } => EditAction::Move { node: src(*node) },
            })
            .collect();

        DiffDocument {
            path: path.into(),
            before,
            after,
            mappings,
            actions,
        }
    }
}
