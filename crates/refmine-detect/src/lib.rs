//! Refactoring classification over AST edit scripts.
//!
//! Given two versions of a Java file as labeled trees, the node correspondence
//! between them and the edit script it implies, this crate recognizes the
//! edits that amount to a rename (method, parameter, attribute, variable) or a
//! type change (parameter, attribute, variable, return type) and describes
//! each as a [`Refactoring`] anchored at source ranges in both versions.
//!
//! Per file pair, a rename pass and a type-change pass read the same
//! [`TreeDiff`](refmine_syntax::TreeDiff) independently. Records are
//! identified by their description; [`RefactoringSet`] keeps the first one
//! seen for each.

mod diff;
mod group;
mod navigate;
mod refactoring;
mod rename;
mod signature;
mod type_change;

pub use diff::{
    detect_many, detect_refactorings, diff_file_sets, try_detect_refactorings, DetectOptions,
    DetectionReport, DiffError,
};
pub use navigate::{find_enclosing_method, find_enclosing_type_declaration, find_outermost_type};
pub use refactoring::{CodeElementType, CodeRange, Refactoring, RefactoringKind, RefactoringSet};
pub use signature::{class_signature, is_argument_position, method_signature, variable_signature};
