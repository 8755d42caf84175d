//! Grouping of edit actions by rewrite key.
//!
//! Both classifiers look at actions one key at a time: "every update from `a`
//! to `b`" is a single signal no matter how many nodes it touched, and the
//! size of the group is part of the evidence for some rename shapes.

use std::collections::HashMap;

use refmine_syntax::{rewrite_key, EditAction, SyntaxKind, TreeDiff};

/// Actions sharing a rewrite key, keys in first-seen order.
#[derive(Debug, Default)]
pub(crate) struct ActionGroups {
    groups: Vec<(String, Vec<EditAction>)>,
    index: HashMap<String, usize>,
}

impl ActionGroups {
    fn push(&mut self, key: String, action: EditAction) {
        match self.index.get(&key) {
            Some(&idx) => self.groups[idx].1.push(action),
            None => {
                self.index.insert(key.clone(), self.groups.len());
                self.groups.push((key, vec![action]));
            }
        }
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[EditAction])> + '_ {
        self.groups
            .iter()
            .map(|(key, actions)| (key.as_str(), actions.as_slice()))
    }
}

/// Updates that may be renames: everything except literal, text element and
/// doc tag edits.
pub(crate) fn rename_groups(diff: &TreeDiff) -> ActionGroups {
    let tree = &diff.before;
    let mut groups = ActionGroups::default();
    for action in &diff.actions {
        if !matches!(action, EditAction::Update { .. }) {
            continue;
        }
        let node = action.node();
        if tree.kind(node).is_incidental_text() {
            continue;
        }
        if tree
            .parent(node)
            .is_some_and(|parent| tree.kind(parent) == SyntaxKind::TagElement)
        {
            continue;
        }
        groups.push(action.key(tree.label(node)), action.clone());
    }
    tracing::debug!(groups = groups.len(), "grouped rename candidates");
    groups
}

/// Updates and moves of type references or names, plus a synthetic update
/// for every mapped pair of top-level generic types whose subtrees differ.
///
/// The synthetic updates catch type-argument changes the edit script spreads
/// over several inner nodes.
pub(crate) fn type_change_groups(diff: &TreeDiff) -> ActionGroups {
    let (before, after) = (&diff.before, &diff.after);
    let mut groups = ActionGroups::default();
    for action in &diff.actions {
        if !matches!(action, EditAction::Update { .. } | EditAction::Move { .. }) {
            continue;
        }
        let node = action.node();
        if before.is_type_node(node) || before.kind(node) == SyntaxKind::SimpleName {
            groups.push(action.key(before.label(node)), action.clone());
        }
    }

    for (src, dst) in diff.mappings.iter() {
        if before.kind(src) != SyntaxKind::ParameterizedType
            || after.kind(dst) != SyntaxKind::ParameterizedType
        {
            continue;
        }
        let nested_src = before.parent(src).is_some_and(|p| before.is_type_node(p));
        let nested_dst = after.parent(dst).is_some_and(|p| after.is_type_node(p));
        if nested_src || nested_dst || before.is_isomorphic(src, after, dst) {
            continue;
        }

        let old = before.display_label(src);
        let new = after.display_label(dst);
        let key = rewrite_key("update-node", old, new);
        tracing::debug!(%key, "quasi-update");
        groups.push(
            key,
            EditAction::Update {
                node: src,
                label: new.to_string(),
            },
        );
    }

    tracing::debug!(groups = groups.len(), "grouped type change candidates");
    groups
}

#[cfg(test)]
mod tests {
    use super::*;
    use refmine_syntax::NodeId;
    use refmine_test_utils::{label_diff, FixtureTree};

    fn diff_of(before: &str, after: &str, build: impl Fn(&mut FixtureTree, &str)) -> TreeDiff {
        let tree = |text: &str| {
            let mut t = FixtureTree::new(text);
            build(&mut t, text);
            t.finish()
        };
        label_diff(tree(before), tree(after))
    }

    fn keys(groups: &ActionGroups) -> Vec<(String, usize)> {
        groups
            .iter()
            .map(|(key, actions)| (key.to_string(), actions.len()))
            .collect()
    }

    #[test]
    fn identical_updates_share_a_group() {
        let diff = diff_of(
            "class C { void m() { int a; a(a); } }",
            "class C { void m() { int b; b(b); } }",
            |t, text| {
                let class = t.class(t.root(), text);
                let name = text.split("int ").nth(1).unwrap().chars().next().unwrap();
                let snippet = format!("void m() {{ int {name}; {name}({name}); }}");
                let method = t.method(class.decl, &snippet);
                let body = method.body.unwrap();
                t.local(body, &format!("int {name};"));
                let call = t.node(body, SyntaxKind::MethodInvocation, &format!("{name}({name})"));
                let name = name.to_string();
                t.leaf(call, SyntaxKind::SimpleName, &name);
                t.leaf(call, SyntaxKind::SimpleName, &name);
            },
        );

        let groups = rename_groups(&diff);
        assert_eq!(keys(&groups), vec![("update-node from a to b".to_string(), 3)]);
    }

    #[test]
    fn literals_and_moves_are_not_rename_candidates() {
        let diff = diff_of(
            "class C { String s = \"a\"; }",
            "class C { String s = \"b\"; }",
            |t, text| {
                let class = t.class(t.root(), text);
                let literal = if text.contains("\"a\"") { "\"a\"" } else { "\"b\"" };
                let field = t.field(class.decl, &format!("String s = {literal};"));
                t.leaf(field.fragment, SyntaxKind::StringLiteral, literal);
            },
        );
        let mut diff = diff;
        diff.actions.push(EditAction::Move { node: NodeId::from_raw(1) });

        assert_eq!(rename_groups(&diff).len(), 0);
    }

    #[test]
    fn changed_generics_get_a_quasi_update() {
        let diff = diff_of(
            "class C { List<String> items; }",
            "class C { List<Integer> items; }",
            |t, text| {
                let class = t.class(t.root(), text);
                let decl = &text[10..text.len() - 2];
                t.field(class.decl, decl);
            },
        );

        let groups = type_change_groups(&diff);
        assert_eq!(
            keys(&groups),
            vec![
                ("update-node from String to Integer".to_string(), 1),
                (
                    "update-node from List<String> to List<Integer>".to_string(),
                    1
                ),
            ]
        );
    }

    #[test]
    fn identical_generics_get_no_quasi_update() {
        let diff = diff_of(
            "class C { List<String> items; }",
            "class C { List<String> names; }",
            |t, text| {
                let class = t.class(t.root(), text);
                let decl = &text[10..text.len() - 2];
                t.field(class.decl, decl);
            },
        );

        let groups = type_change_groups(&diff);
        assert_eq!(
            keys(&groups),
            vec![("update-node from items to names".to_string(), 1)]
        );
    }
}
