//! Syntax trees, node correspondences and edit scripts.
//!
//! This crate holds the data refmine consumes from external collaborators:
//! - [`SyntaxTree`]: an arena of labeled Java AST nodes over their source text.
//! - [`NodeCorrespondence`]: the partial bijection produced by a tree matcher.
//! - [`EditAction`]: the primitive edits derived from that correspondence.
//!
//! It also defines the JSON interchange used to feed GumTree output to the
//! engine ([`DiffDocument`]) and the collaborator traits ([`SourceParser`],
//! [`TreeMatcher`]).

mod action;
mod external;
mod json;
mod mapping;
mod syntax_kind;
mod tree;

pub use action::{rewrite_key, EditAction};
pub use external::{ExternalError, SourceParser, TreeDiff, TreeMatcher};
pub use json::{DiffDocument, DocumentError, RawNode, TreeDocument};
pub use mapping::{MappingError, NodeCorrespondence};
pub use syntax_kind::SyntaxKind;
pub use tree::{Node, NodeId, SyntaxTree, TreeBuilder, TreeError};
