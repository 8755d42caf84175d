use std::collections::btree_map::{self, BTreeMap};
use std::fmt;
use std::hash::{Hash, Hasher};

use refmine_core::LineIndex;
use refmine_syntax::{NodeId, SyntaxTree, TreeDiff};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RefactoringKind {
    #[serde(rename = "Rename Method")]
    RenameMethod,
    #[serde(rename = "Rename Parameter")]
    RenameParameter,
    #[serde(rename = "Rename Attribute")]
    RenameAttribute,
    #[serde(rename = "Rename Variable")]
    RenameVariable,
    #[serde(rename = "Change Parameter Type")]
    ChangeParameterType,
    #[serde(rename = "Change Attribute Type")]
    ChangeAttributeType,
    #[serde(rename = "Change Variable Type")]
    ChangeVariableType,
    #[serde(rename = "Change Return Type")]
    ChangeReturnType,
}

impl RefactoringKind {
    pub fn display_name(self) -> &'static str {
        match self {
            RefactoringKind::RenameMethod => "Rename Method",
            RefactoringKind::RenameParameter => "Rename Parameter",
            RefactoringKind::RenameAttribute => "Rename Attribute",
            RefactoringKind::RenameVariable => "Rename Variable",
            RefactoringKind::ChangeParameterType => "Change Parameter Type",
            RefactoringKind::ChangeAttributeType => "Change Attribute Type",
            RefactoringKind::ChangeVariableType => "Change Variable Type",
            RefactoringKind::ChangeReturnType => "Change Return Type",
        }
    }

    pub fn is_rename(self) -> bool {
        matches!(
            self,
            RefactoringKind::RenameMethod
                | RefactoringKind::RenameParameter
                | RefactoringKind::RenameAttribute
                | RefactoringKind::RenameVariable
        )
    }
}

impl fmt::Display for RefactoringKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// What a code range points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CodeElementType {
    MethodDeclaration,
    SingleVariableDeclaration,
    FieldDeclaration,
    VariableDeclarationStatement,
    VariableDeclarationExpression,
    EnhancedForStatementParameterName,
    Type,
}

/// A node's location in one version of a file.
///
/// Lines and columns are 1-based; columns count UTF-16 code units and the end
/// position is exclusive.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CodeRange {
    pub file_path: String,
    pub start_line: u32,
    pub end_line: u32,
    pub start_column: u32,
    pub end_column: u32,
    pub code_element_type: CodeElementType,
    /// Role of the element in the refactoring, e.g. `original method name`.
    pub description: String,
    pub code_element: String,
}

impl CodeRange {
    pub(crate) fn with_role(mut self, description: &str, code_element: impl Into<String>) -> Self {
        self.description = description.to_string();
        self.code_element = code_element.into();
        self
    }
}

/// One detected refactoring. Two records are the same refactoring iff their
/// descriptions are equal.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Refactoring {
    pub description: String,
    pub kind: RefactoringKind,
    pub before: CodeRange,
    pub after: CodeRange,
}

impl Refactoring {
    /// `details` is the description without the leading kind name.
    pub(crate) fn new(
        kind: RefactoringKind,
        details: impl fmt::Display,
        before: CodeRange,
        after: CodeRange,
    ) -> Self {
        Self {
            description: format!("{kind} {details}"),
            kind,
            before,
            after,
        }
    }
}

impl PartialEq for Refactoring {
    fn eq(&self, other: &Self) -> bool {
        self.description == other.description
    }
}

impl Eq for Refactoring {}

impl Hash for Refactoring {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.description.hash(state);
    }
}

/// Refactorings keyed by description. The first record inserted for a
/// description is kept.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RefactoringSet {
    records: BTreeMap<String, Refactoring>,
}

impl RefactoringSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `false` if a refactoring with the same description was already
    /// present.
    pub fn insert(&mut self, refactoring: Refactoring) -> bool {
        match self.records.entry(refactoring.description.clone()) {
            btree_map::Entry::Vacant(entry) => {
                entry.insert(refactoring);
                true
            }
            btree_map::Entry::Occupied(_) => false,
        }
    }

    pub fn get(&self, description: &str) -> Option<&Refactoring> {
        self.records.get(description)
    }

    pub fn contains(&self, description: &str) -> bool {
        self.records.contains_key(description)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Records ordered by description.
    pub fn iter(&self) -> impl Iterator<Item = &Refactoring> + '_ {
        self.records.values()
    }

    pub fn descriptions(&self) -> impl Iterator<Item = &str> + '_ {
        self.records.keys().map(String::as_str)
    }

    pub fn into_vec(self) -> Vec<Refactoring> {
        self.records.into_values().collect()
    }
}

impl Extend<Refactoring> for RefactoringSet {
    fn extend<I: IntoIterator<Item = Refactoring>>(&mut self, iter: I) {
        for refactoring in iter {
            self.insert(refactoring);
        }
    }
}

impl FromIterator<Refactoring> for RefactoringSet {
    fn from_iter<I: IntoIterator<Item = Refactoring>>(iter: I) -> Self {
        let mut set = RefactoringSet::new();
        set.extend(iter);
        set
    }
}

impl IntoIterator for RefactoringSet {
    type Item = Refactoring;
    type IntoIter = btree_map::IntoValues<String, Refactoring>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.into_values()
    }
}

/// Maps nodes of either tree of a diff to [`CodeRange`]s.
#[derive(Debug)]
pub(crate) struct CodeRangeMapper<'a> {
    path: &'a str,
    before: &'a SyntaxTree,
    after: &'a SyntaxTree,
    before_lines: LineIndex,
    after_lines: LineIndex,
}

impl<'a> CodeRangeMapper<'a> {
    pub fn new(path: &'a str, diff: &'a TreeDiff) -> Self {
        Self {
            path,
            before: &diff.before,
            after: &diff.after,
            before_lines: LineIndex::new(diff.before.text()),
            after_lines: LineIndex::new(diff.after.text()),
        }
    }

    pub fn before(&self, node: NodeId, element: CodeElementType) -> CodeRange {
        self.range(self.before, &self.before_lines, node, element)
    }

    pub fn after(&self, node: NodeId, element: CodeElementType) -> CodeRange {
        self.range(self.after, &self.after_lines, node, element)
    }

    fn range(
        &self,
        tree: &SyntaxTree,
        lines: &LineIndex,
        node: NodeId,
        element: CodeElementType,
    ) -> CodeRange {
        let (start, end) = lines.range(tree.text(), tree.range(node));
        CodeRange {
            file_path: self.path.to_string(),
            start_line: start.line,
            end_line: end.line,
            start_column: start.col,
            end_column: end.col,
            code_element_type: element,
            description: String::new(),
            code_element: String::new(),
        }
    }
}
