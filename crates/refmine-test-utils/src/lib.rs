//! Utilities shared by refmine tests.
//!
//! Real trees come from a Java parser and real edit scripts from GumTree; tests
//! build both by hand instead:
//! - [`FixtureTree`] lays out JDT-shaped nodes over a Java snippet, locating each
//!   node's span by searching its text inside the parent.
//! - [`match_by_shape`] and [`label_updates`] emulate a matcher for tree pairs
//!   that only differ in labels.
//! - [`FixtureParser`] / [`ShapeMatcher`] plug those into the collaborator traits.

mod fixture;
mod matcher;

pub use fixture::{ClassNodes, FieldNodes, FixtureTree, MethodNodes, ParameterNodes};
pub use matcher::{label_updates, match_by_shape, FixtureParser, ShapeMatcher};

use refmine_syntax::{SyntaxTree, TreeDiff};

/// Diff two identically shaped trees: shape-based mappings plus one update per
/// changed label.
pub fn label_diff(before: SyntaxTree, after: SyntaxTree) -> TreeDiff {
    let mappings = match_by_shape(&before, &after);
    let actions = label_updates(&before, &after, &mappings);
    TreeDiff {
        before,
        after,
        mappings,
        actions,
    }
}
