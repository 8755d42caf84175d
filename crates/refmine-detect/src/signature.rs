//! Human readable signatures reconstructed from declaration subtrees.

use refmine_syntax::{NodeId, SyntaxKind, SyntaxTree};

use crate::navigate::{find_enclosing_method, find_enclosing_type_declaration};

/// `"<name> : <type>"` for a single-variable declaration or a variable
/// declaration fragment.
///
/// A fragment takes its type from the enclosing declaration. Returns `None`
/// when either half is missing.
pub fn variable_signature(tree: &SyntaxTree, decl: NodeId) -> Option<String> {
    let first_type = |parent: NodeId| {
        tree.children(parent)
            .iter()
            .copied()
            .find(|&child| tree.is_type_node(child))
    };

    let (name, ty) = match tree.kind(decl) {
        SyntaxKind::SingleVariableDeclaration => (
            tree.child_of_kind(decl, SyntaxKind::SimpleName),
            first_type(decl),
        ),
        SyntaxKind::VariableDeclarationFragment => (
            tree.child_of_kind(decl, SyntaxKind::SimpleName),
            tree.parent(decl).and_then(first_type),
        ),
        _ => (None, None),
    };

    let signature = format!("{} : {}", tree.label(name?), tree.display_label(ty?));
    tracing::trace!(%decl, %signature, "variable signature");
    Some(signature)
}

/// Dot-qualified name of a type declaration, including its package.
///
/// Walks from `type_decl` to the root and prepends, at every level, the first
/// simple name that is not a constructor argument.
pub fn class_signature(tree: &SyntaxTree, type_decl: NodeId) -> Option<String> {
    let mut qualified: Option<String> = None;
    let prepend = |qualified: &mut Option<String>, segment: &str| {
        *qualified = Some(match qualified.take() {
            Some(rest) => format!("{segment}.{rest}"),
            None => segment.to_string(),
        });
    };

    for level in std::iter::once(type_decl).chain(tree.ancestors(type_decl)) {
        for &child in tree.children(level) {
            match tree.kind(child) {
                SyntaxKind::SimpleName if !is_argument_position(tree, level, child) => {
                    prepend(&mut qualified, tree.label(child));
                    break;
                }
                SyntaxKind::PackageDeclaration if qualified.is_some() => {
                    if let Some(package) = tree
                        .children(child)
                        .iter()
                        .map(|&part| tree.label(part))
                        .find(|label| !label.is_empty())
                    {
                        prepend(&mut qualified, package);
                    }
                }
                _ => {}
            }
        }
    }

    tracing::trace!(%type_decl, signature = ?qualified, "class signature");
    qualified
}

/// Whether `child` is an argument of the instance creation `parent`: it comes
/// after the created type and before the anonymous class body.
///
/// Method and super-method invocations never exclude their children.
pub fn is_argument_position(tree: &SyntaxTree, parent: NodeId, child: NodeId) -> bool {
    if tree.kind(parent) != SyntaxKind::ClassInstanceCreation {
        return false;
    }

    let mut type_found = false;
    let mut body_found = false;
    for &sibling in tree.children(parent) {
        if tree.is_type_node(sibling) {
            type_found = true;
        } else if tree.kind(sibling) == SyntaxKind::Block {
            body_found = true;
        } else if type_found && !body_found && sibling == child {
            return true;
        }
    }
    false
}

/// `"<access> [abstract] <name>(<params>) : <return type>"` for a method
/// declaration, or `""` without one.
///
/// The return type is the first type child before any parameter; type
/// children after the parameters are thrown types, except on a declaration
/// without a body and without a leading type.
///
/// Parameters render as `"<name> <type>"`. Without an explicit access modifier
/// a method with a body is package-private and one without is an interface
/// method, hence public.
pub fn method_signature(tree: &SyntaxTree, method: Option<NodeId>) -> String {
    let Some(method) = method else {
        return String::new();
    };

    let children = tree.children(method);
    let mut signature = String::new();
    let mut return_type = None;
    let mut access_found = false;
    let mut body_found = false;
    let mut param_seen = false;
    let mut trailing_type = None;

    for (idx, &child) in children.iter().enumerate() {
        let kind = tree.kind(child);
        if kind == SyntaxKind::SimpleName {
            signature.push_str(tree.label(child));
            signature.push('(');
        } else if kind.is_type() && return_type.is_none() && !param_seen {
            return_type = Some(tree.display_label(child));
        } else if kind.is_type() && param_seen {
            trailing_type = trailing_type.or(Some(tree.display_label(child)));
        } else if kind == SyntaxKind::Modifier {
            match tree.label(child) {
                modifier @ ("public" | "private" | "protected") => {
                    signature.push_str(modifier);
                    signature.push(' ');
                    access_found = true;
                }
                "abstract" => signature.push_str("abstract "),
                "default" => {
                    signature.push_str("public ");
                    access_found = true;
                }
                _ => {}
            }
        } else if kind == SyntaxKind::SingleVariableDeclaration {
            param_seen = true;
            let (name, ty) = parameter_parts(tree, child);
            signature.push_str(name);
            signature.push(' ');
            signature.push_str(ty);
            let next_is_param = children
                .get(idx + 1)
                .is_some_and(|&next| tree.kind(next) == SyntaxKind::SingleVariableDeclaration);
            if next_is_param {
                signature.push_str(", ");
            }
        } else if kind == SyntaxKind::Block {
            body_found = true;
        }
    }

    signature.push(')');
    // Constructors always have a body, so a bodiless declaration listing its
    // type after the parameters still has a return type.
    let return_type = match return_type {
        Some(ty) => Some(ty),
        None if !body_found => trailing_type,
        None => None,
    };
    if let Some(return_type) = return_type {
        signature.push_str(" : ");
        signature.push_str(return_type);
    }
    if !access_found {
        let prefix = if body_found { "package " } else { "public " };
        signature.insert_str(0, prefix);
    }

    tracing::trace!(%method, %signature, "method signature");
    signature
}

/// Name and type text of a parameter. A nested declaration (the varargs
/// shape) overrides the outer one.
fn parameter_parts(tree: &SyntaxTree, param: NodeId) -> (&str, &str) {
    let mut name = "";
    let mut ty = "";
    let mut visit = |node: NodeId| {
        if tree.is_type_node(node) {
            ty = tree.display_label(node);
        }
        if tree.kind(node) == SyntaxKind::SimpleName {
            name = tree.label(node);
        }
    };

    for &child in tree.children(param) {
        visit(child);
        if tree.kind(child) == SyntaxKind::SingleVariableDeclaration {
            for &nested in tree.children(child) {
                visit(nested);
            }
        }
    }
    (name, ty)
}

/// Signature of the method enclosing `node` (empty outside methods) and the
/// qualified name of the class declaring it.
pub(crate) fn member_context(tree: &SyntaxTree, node: NodeId) -> Option<(String, String)> {
    let method = find_enclosing_method(tree, node);
    let type_decl = match method {
        Some(method) => tree.parent(method)?,
        None => find_enclosing_type_declaration(tree, node)?,
    };
    let class = class_signature(tree, type_decl)?;
    Some((method_signature(tree, method), class))
}
