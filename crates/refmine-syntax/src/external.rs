//! Seams for the collaborators refmine consumes but does not implement: a Java
//! parser and a tree matcher / edit-script generator.

use thiserror::Error;

use crate::{EditAction, NodeCorrespondence, SyntaxTree};

/// Failure reported by an external collaborator.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{message}")]
pub struct ExternalError {
    message: String,
}

impl ExternalError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Turns source text into a labeled tree.
pub trait SourceParser: Send + Sync {
    fn parse(&self, text: &str) -> Result<SyntaxTree, ExternalError>;
}

/// Computes the node correspondence between two trees and the edit script it
/// implies.
pub trait TreeMatcher: Send + Sync {
    fn match_trees(
        &self,
        src: &SyntaxTree,
        dst: &SyntaxTree,
    ) -> Result<NodeCorrespondence, ExternalError>;

    fn edit_script(
        &self,
        src: &SyntaxTree,
        dst: &SyntaxTree,
        mappings: &NodeCorrespondence,
    ) -> Result<Vec<EditAction>, ExternalError>;
}

/// The immutable input of both classifiers for one file pair.
#[derive(Debug, Clone)]
pub struct TreeDiff {
    pub before: SyntaxTree,
    pub after: SyntaxTree,
    pub mappings: NodeCorrespondence,
    pub actions: Vec<EditAction>,
}

impl TreeDiff {
    /// Parse both texts, match the trees and derive the edit script.
    pub fn compute(
        parser: &dyn SourceParser,
        matcher: &dyn TreeMatcher,
        before_text: &str,
        after_text: &str,
    ) -> Result<Self, ExternalError> {
        let before = parser.parse(before_text)?;
        let after = parser.parse(after_text)?;
        let mappings = matcher.match_trees(&before, &after)?;
        let actions = matcher.edit_script(&before, &after, &mappings)?;
        Ok(TreeDiff {
            before,
            after,
            mappings,
            actions,
        })
    }
}
