use std::collections::HashMap;

use refmine_syntax::{
    EditAction, ExternalError, NodeCorrespondence, SourceParser, SyntaxTree, TreeMatcher,
};

/// Pair nodes of two trees position by position.
///
/// Nodes are mapped while their kinds agree; children are only visited when
/// both sides have the same number of them.
pub fn match_by_shape(src: &SyntaxTree, dst: &SyntaxTree) -> NodeCorrespondence {
    let mut mappings = NodeCorrespondence::new();
    let mut stack = vec![(src.root(), dst.root())];
    while let Some((s, d)) = stack.pop() {
        if src.kind(s) != dst.kind(d) {
            continue;
        }
        mappings
            .insert(s, d)
            .expect("shape matching visits every node once");
        let (s_children, d_children) = (src.children(s), dst.children(d));
        if s_children.len() == d_children.len() {
            stack.extend(s_children.iter().copied().zip(d_children.iter().copied()));
        }
    }
    mappings
}

/// One `update-node` per mapped pair whose labels differ, in source order.
pub fn label_updates(
    src: &SyntaxTree,
    dst: &SyntaxTree,
    mappings: &NodeCorrespondence,
) -> Vec<EditAction> {
    mappings
        .iter()
        .filter(|&(s, d)| src.label(s) != dst.label(d))
        .map(|(s, d)| EditAction::Update {
            node: s,
            label: dst.label(d).to_string(),
        })
        .collect()
}

/// Serves pre-built trees keyed by their source text.
#[derive(Debug, Default)]
pub struct FixtureParser {
    trees: HashMap<String, SyntaxTree>,
}

impl FixtureParser {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, tree: SyntaxTree) {
        self.trees.insert(tree.text().to_string(), tree);
    }
}

impl SourceParser for FixtureParser {
    fn parse(&self, text: &str) -> Result<SyntaxTree, ExternalError> {
        self.trees
            .get(text)
            .cloned()
            .ok_or_else(|| ExternalError::new(format!("no fixture tree for {text:?}")))
    }
}

/// A [`TreeMatcher`] built on [`match_by_shape`]: label changes become
/// updates, unmatched nodes become deletes and inserts.
#[derive(Debug, Default, Clone, Copy)]
pub struct ShapeMatcher;

impl TreeMatcher for ShapeMatcher {
    fn match_trees(
        &self,
        src: &SyntaxTree,
        dst: &SyntaxTree,
    ) -> Result<NodeCorrespondence, ExternalError> {
        Ok(match_by_shape(src, dst))
    }

    fn edit_script(
        &self,
        src: &SyntaxTree,
        dst: &SyntaxTree,
        mappings: &NodeCorrespondence,
    ) -> Result<Vec<EditAction>, ExternalError> {
        let mut actions = label_updates(src, dst, mappings);
        actions.extend(
            src.node_ids()
                .filter(|&node| mappings.dst(node).is_none())
                .map(|node| EditAction::Delete { node }),
        );
        actions.extend(
            dst.node_ids()
                .filter(|&node| mappings.src(node).is_none())
                .map(|node| EditAction::Insert { node }),
        );
        Ok(actions)
    }
}
