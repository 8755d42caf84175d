use serde::{Deserialize, Serialize};

use crate::NodeId;

/// One primitive tree edit produced by an edit-script generator.
///
/// `Insert` references a destination node; every other action references a
/// source node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action")]
pub enum EditAction {
    #[serde(rename = "insert-node")]
    Insert { node: NodeId },
    #[serde(rename = "delete-node")]
    Delete { node: NodeId },
    #[serde(rename = "update-node")]
    Update { node: NodeId, label: String },
    #[serde(rename = "move-tree")]
    Move { node: NodeId },
}

impl EditAction {
    /// GumTree action name.
    pub fn name(&self) -> &'static str {
        match self {
            EditAction::Insert { .. } => "insert-node",
            EditAction::Delete { .. } => "delete-node",
            EditAction::Update { .. } => "update-node",
            EditAction::Move { .. } => "move-tree",
        }
    }

    #[inline]
    pub fn node(&self) -> NodeId {
        match self {
            EditAction::Insert { node }
            | EditAction::Delete { node }
            | EditAction::Update { node, .. }
            | EditAction::Move { node } => *node,
        }
    }

    /// New label carried by an update, `None` for every other action.
    pub fn new_label(&self) -> Option<&str> {
        match self {
            EditAction::Update { label, .. } => Some(label),
            _ => None,
        }
    }

    /// Canonical rewrite key, given the label the node had before the edit.
    pub fn key(&self, old_label: &str) -> String {
        rewrite_key(self.name(), old_label, self.new_label().unwrap_or(""))
    }
}

/// `"<action> from <old> to <new>"`, the key actions are grouped by.
pub fn rewrite_key(action: &str, old_label: &str, new_label: &str) -> String {
    format!("{action} from {old_label} to {new_label}")
}
