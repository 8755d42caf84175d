//! Rename classification: label updates on declarations, classified by the
//! shape of their parent and grandparent.

use refmine_syntax::{EditAction, SyntaxKind, TreeDiff};

use crate::group::rename_groups;
use crate::navigate::Anchor;
use crate::refactoring::{CodeElementType, CodeRangeMapper, Refactoring, RefactoringKind};
use crate::signature::{class_signature, member_context, method_signature, variable_signature};

pub(crate) fn detect_renames(ranges: &CodeRangeMapper<'_>, diff: &TreeDiff) -> Vec<Refactoring> {
    let mut found = Vec::new();
    for (key, actions) in rename_groups(diff).iter() {
        tracing::debug!(%key, actions = actions.len(), "rename group");
        for action in actions {
            if let Some(refactoring) = classify(ranges, diff, action, actions.len()) {
                tracing::debug!(description = %refactoring.description, "rename detected");
                found.push(refactoring);
            }
        }
    }
    found
}

/// Attribute and local variable renames only count when at least two updates
/// share the rewrite key.
fn classify(
    ranges: &CodeRangeMapper<'_>,
    diff: &TreeDiff,
    action: &EditAction,
    group_size: usize,
) -> Option<Refactoring> {
    let (before, after) = (&diff.before, &diff.after);
    let src = Anchor::of(before, action.node())?;
    let dst = Anchor::of(after, diff.mappings.dst(src.node)?)?;
    tracing::trace!(?src, ?dst, group_size, "rename candidate");

    let old_name = before.label(src.node);
    let new_name = after.label(dst.node);

    match (before.kind(src.parent), src.grandparent_kind(before)) {
        (SyntaxKind::MethodDeclaration, _) => {
            let old = method_signature(before, Some(src.parent));
            let new = method_signature(after, Some(dst.parent));
            let class = class_signature(after, dst.grandparent?)?;
            let element = CodeElementType::MethodDeclaration;
            Some(Refactoring::new(
                RefactoringKind::RenameMethod,
                format_args!("{old} renamed to {new} in class {class}"),
                ranges
                    .before(src.node, element)
                    .with_role("original method name", old_name),
                ranges
                    .after(dst.node, element)
                    .with_role("renamed method name", new_name),
            ))
        }
        (SyntaxKind::SingleVariableDeclaration, Some(SyntaxKind::MethodDeclaration))
            if dst.grandparent_kind(after) == Some(SyntaxKind::MethodDeclaration) =>
        {
            let method = dst.grandparent?;
            let v1 = variable_signature(before, src.parent)?;
            let v2 = variable_signature(after, dst.parent)?;
            let signature = method_signature(after, Some(method));
            let class = class_signature(after, after.parent(method)?)?;
            let element = CodeElementType::SingleVariableDeclaration;
            Some(Refactoring::new(
                RefactoringKind::RenameParameter,
                format_args!("{v1} to {v2} in method {signature} in class {class}"),
                ranges
                    .before(src.node, element)
                    .with_role("original variable declaration", v1.as_str()),
                ranges
                    .after(dst.node, element)
                    .with_role("renamed variable declaration", v2.as_str()),
            ))
        }
        (SyntaxKind::VariableDeclarationFragment, Some(SyntaxKind::FieldDeclaration))
            if group_size > 1 =>
        {
            let v1 = variable_signature(before, src.parent)?;
            let v2 = variable_signature(after, dst.parent)?;
            let class = class_signature(after, after.parent(dst.grandparent?)?)?;
            let element = CodeElementType::FieldDeclaration;
            Some(Refactoring::new(
                RefactoringKind::RenameAttribute,
                format_args!("{v1} to {v2} in class {class}"),
                ranges
                    .before(src.node, element)
                    .with_role("original attribute declaration", v1.as_str()),
                ranges
                    .after(dst.node, element)
                    .with_role("renamed attribute declaration", v2.as_str()),
            ))
        }
        (SyntaxKind::VariableDeclarationFragment, Some(statement))
            if statement.is_variable_declaration() && group_size > 1 =>
        {
            let element = if statement == SyntaxKind::VariableDeclarationStatement {
                CodeElementType::VariableDeclarationStatement
            } else {
                CodeElementType::VariableDeclarationExpression
            };
            local_rename(ranges, diff, src, dst, element)
        }
        (SyntaxKind::SingleVariableDeclaration, Some(SyntaxKind::EnhancedForStatement))
            if group_size > 1 =>
        {
            let element = CodeElementType::EnhancedForStatementParameterName;
            local_rename(ranges, diff, src, dst, element)
        }
        _ => None,
    }
}

fn local_rename(
    ranges: &CodeRangeMapper<'_>,
    diff: &TreeDiff,
    src: Anchor,
    dst: Anchor,
    element: CodeElementType,
) -> Option<Refactoring> {
    let v1 = variable_signature(&diff.before, src.parent)?;
    let v2 = variable_signature(&diff.after, dst.parent)?;
    let (signature, class) = member_context(&diff.after, dst.parent)?;
    Some(Refactoring::new(
        RefactoringKind::RenameVariable,
        format_args!("{v1} to {v2} in method {signature} in class {class}"),
        ranges
            .before(src.node, element)
            .with_role("original variable declaration", v1.as_str()),
        ranges
            .after(dst.node, element)
            .with_role("renamed variable declaration", v2.as_str()),
    ))
}
