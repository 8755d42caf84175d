//! Type-change classification: updated or moved type references on
//! declarations.

use refmine_syntax::{EditAction, NodeId, SyntaxKind, SyntaxTree, TreeDiff};

use crate::group::type_change_groups;
use crate::navigate::{find_enclosing_method, Anchor};
use crate::refactoring::{
    CodeElementType, CodeRange, CodeRangeMapper, Refactoring, RefactoringKind,
};
use crate::signature::{class_signature, member_context, method_signature, variable_signature};

pub(crate) fn detect_type_changes(
    ranges: &CodeRangeMapper<'_>,
    diff: &TreeDiff,
) -> Vec<Refactoring> {
    let mut found = Vec::new();
    for (key, actions) in type_change_groups(diff).iter() {
        tracing::debug!(%key, actions = actions.len(), "type change group");
        for action in actions {
            if let Some(refactoring) = classify(ranges, diff, action) {
                tracing::debug!(description = %refactoring.description, "type change detected");
                found.push(refactoring);
            }
        }
    }
    found
}

fn classify(
    ranges: &CodeRangeMapper<'_>,
    diff: &TreeDiff,
    action: &EditAction,
) -> Option<Refactoring> {
    let (before, after) = (&diff.before, &diff.after);
    let mapped = diff.mappings.dst(action.node())?;
    let src = Anchor::of(before, action.node())?.resolve_type(before)?;
    let dst = Anchor::of(after, mapped)?.resolve_type(after)?;
    tracing::trace!(?src, ?dst, "type change candidate");

    if matches!(action, EditAction::Move { .. }) && before.is_isomorphic(src.node, after, dst.node)
    {
        tracing::debug!(node = %src.node, "skipping isomorphic move");
        return None;
    }

    let left = ranges.before(src.node, CodeElementType::Type);
    let right = ranges.after(dst.node, CodeElementType::Type);

    match (before.kind(src.parent), src.grandparent_kind(before)) {
        (SyntaxKind::SingleVariableDeclaration, Some(SyntaxKind::MethodDeclaration))
            if dst.grandparent_kind(after) == Some(SyntaxKind::MethodDeclaration) =>
        {
            let method = dst.grandparent?;
            let v1 = variable_signature(before, src.parent)?;
            let v2 = variable_signature(after, dst.parent)?;
            let signature = method_signature(after, Some(method));
            let class = class_signature(after, after.parent(method)?)?;
            Some(Refactoring::new(
                RefactoringKind::ChangeParameterType,
                format_args!("{v1} to {v2} in method {signature} in class {class}"),
                left.with_role("original variable declaration", v1.as_str()),
                right.with_role("changed-type variable declaration", v2.as_str()),
            ))
        }
        (SyntaxKind::FieldDeclaration, _) => {
            let v1 = first_fragment_signature(before, src.parent)?;
            let v2 = first_fragment_signature(after, dst.parent)?;
            let class = class_signature(after, after.parent(dst.parent)?)?;
            Some(Refactoring::new(
                RefactoringKind::ChangeAttributeType,
                format_args!("{v1} to {v2} in class {class}"),
                left.with_role("original attribute declaration", v1.as_str()),
                right.with_role("changed-type attribute declaration", v2.as_str()),
            ))
        }
        (statement, _) if statement.is_variable_declaration() => {
            let v1 = first_fragment_signature(before, src.parent)?;
            let v2 = first_fragment_signature(after, dst.parent)?;
            variable_type_change(after, dst, v1, v2, left, right)
        }
        (SyntaxKind::SingleVariableDeclaration, Some(SyntaxKind::EnhancedForStatement)) => {
            let v1 = variable_signature(before, src.parent)?;
            let v2 = variable_signature(after, dst.parent)?;
            variable_type_change(after, dst, v1, v2, left, right)
        }
        (SyntaxKind::MethodDeclaration, _) => {
            let t1 = before.display_label(src.node);
            let t2 = after.display_label(dst.node);
            let method = find_enclosing_method(after, dst.node)?;
            let signature = method_signature(after, Some(method));
            let class = class_signature(after, after.parent(method)?)?;
            if !signature.ends_with(t2) {
                tracing::debug!(%signature, new_type = t2, "return type not in signature");
                return None;
            }
            Some(Refactoring::new(
                RefactoringKind::ChangeReturnType,
                format_args!("{t1} to {t2} in method {signature} in class {class}"),
                left.with_role("original return type", t1),
                right.with_role("changed return type", t2),
            ))
        }
        _ => None,
    }
}

fn first_fragment_signature(tree: &SyntaxTree, decl: NodeId) -> Option<String> {
    let fragment = tree.child_of_kind(decl, SyntaxKind::VariableDeclarationFragment)?;
    variable_signature(tree, fragment)
}

fn variable_type_change(
    after: &SyntaxTree,
    dst: Anchor,
    v1: String,
    v2: String,
    left: CodeRange,
    right: CodeRange,
) -> Option<Refactoring> {
    let (signature, class) = member_context(after, dst.parent)?;
    Some(Refactoring::new(
        RefactoringKind::ChangeVariableType,
        format_args!("{v1} to {v2} in method {signature} in class {class}"),
        left.with_role("original variable declaration", v1.as_str()),
        right.with_role("changed-type variable declaration", v2.as_str()),
    ))
}
