//! Context lookups around an edited node.

use refmine_syntax::{NodeId, SyntaxKind, SyntaxTree};

/// The top-level parameterized or array type enclosing `node`, walking up
/// through type nodes only.
///
/// Returns `None` as soon as the walk leaves type nodes without finding a
/// parameterized or array type whose parent is not itself a type.
pub fn find_outermost_type(tree: &SyntaxTree, node: NodeId) -> Option<NodeId> {
    let mut current = node;
    while tree.is_type_node(current) {
        let parent = tree.parent(current);
        let nested = parent.is_some_and(|parent| tree.is_type_node(parent));
        if !nested
            && matches!(
                tree.kind(current),
                SyntaxKind::ParameterizedType | SyntaxKind::ArrayType
            )
        {
            return Some(current);
        }
        current = parent?;
    }
    None
}

pub fn find_enclosing_method(tree: &SyntaxTree, node: NodeId) -> Option<NodeId> {
    tree.ancestors(node)
        .find(|&ancestor| tree.kind(ancestor) == SyntaxKind::MethodDeclaration)
}

pub fn find_enclosing_type_declaration(tree: &SyntaxTree, node: NodeId) -> Option<NodeId> {
    tree.ancestors(node)
        .find(|&ancestor| tree.kind(ancestor) == SyntaxKind::TypeDeclaration)
}

/// An edited node together with its parent and grandparent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Anchor {
    pub node: NodeId,
    pub parent: NodeId,
    pub grandparent: Option<NodeId>,
}

impl Anchor {
    /// `None` for the root, which has no parent to classify against.
    pub fn of(tree: &SyntaxTree, node: NodeId) -> Option<Self> {
        let parent = tree.parent(node)?;
        Some(Self {
            node,
            parent,
            grandparent: tree.parent(parent),
        })
    }

    pub fn grandparent_kind(&self, tree: &SyntaxTree) -> Option<SyntaxKind> {
        self.grandparent.map(|grandparent| tree.kind(grandparent))
    }

    /// Lift an edit inside a type reference to the type as a whole.
    ///
    /// A simple name that spells the same text as its enclosing type stands
    /// for that type; a component of a generic or array type stands for the
    /// outermost such type.
    pub fn resolve_type(self, tree: &SyntaxTree) -> Option<Self> {
        if !tree.is_type_node(self.parent) {
            return Some(self);
        }

        let mut anchor = self;
        if tree.kind(anchor.node) == SyntaxKind::SimpleName
            && tree.display_label(anchor.node) == tree.display_label(anchor.parent)
        {
            anchor = Anchor::of(tree, anchor.parent)?;
        }
        if let Some(outer) = find_outermost_type(tree, anchor.parent) {
            anchor = Anchor::of(tree, outer)?;
        }
        Some(anchor)
    }
}
