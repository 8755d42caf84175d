use std::collections::HashMap;

use refmine_core::{TextRange, TextSize};
use refmine_syntax::{NodeId, SyntaxKind, SyntaxTree, TreeBuilder};

const PRIMITIVES: &[&str] = &[
    "boolean", "byte", "char", "double", "float", "int", "long", "short", "void",
];

const MODIFIERS: &[&str] = &[
    "public",
    "protected",
    "private",
    "static",
    "final",
    "abstract",
    "default",
    "synchronized",
    "native",
    "transient",
    "volatile",
    "strictfp",
];

#[derive(Debug, Clone, Copy)]
pub struct ClassNodes {
    pub decl: NodeId,
    pub name: NodeId,
}

/// A field declaration or local variable declaration statement with a single
/// fragment.
#[derive(Debug, Clone, Copy)]
pub struct FieldNodes {
    pub decl: NodeId,
    pub ty: NodeId,
    pub fragment: NodeId,
    pub name: NodeId,
}

/// A `SingleVariableDeclaration`: method parameter or enhanced-for variable.
#[derive(Debug, Clone, Copy)]
pub struct ParameterNodes {
    pub decl: NodeId,
    pub ty: NodeId,
    pub name: NodeId,
}

#[derive(Debug, Clone)]
pub struct MethodNodes {
    pub decl: NodeId,
    pub return_type: Option<NodeId>,
    pub name: NodeId,
    pub params: Vec<ParameterNodes>,
    pub body: Option<NodeId>,
}

/// Builds a JDT-shaped tree over a Java snippet.
///
/// Every node is anchored at the first occurrence of its text inside the
/// parent's span, searching from the end of the previously added sibling, so
/// nodes must be added in source order.
#[derive(Debug)]
pub struct FixtureTree {
    builder: TreeBuilder,
    ranges: Vec<TextRange>,
    cursors: HashMap<NodeId, TextSize>,
}

impl FixtureTree {
    pub fn new(text: &str) -> Self {
        Self {
            builder: TreeBuilder::new(text, SyntaxKind::CompilationUnit),
            ranges: vec![TextRange::up_to(TextSize::of(text))],
            cursors: HashMap::new(),
        }
    }

    pub fn root(&self) -> NodeId {
        NodeId::ROOT
    }

    pub fn range(&self, id: NodeId) -> TextRange {
        self.ranges[id.to_raw() as usize]
    }

    fn locate(&self, parent: NodeId, snippet: &str) -> TextRange {
        let parent_range = self.range(parent);
        let from = self
            .cursors
            .get(&parent)
            .copied()
            .unwrap_or(parent_range.start());
        let haystack = &self.builder.text()[usize::from(from)..usize::from(parent_range.end())];
        let offset = haystack.find(snippet).unwrap_or_else(|| {
            panic!("`{snippet}` not found after {from:?} inside {parent_range:?}")
        });
        TextRange::at(from + TextSize::from(offset as u32), TextSize::of(snippet))
    }

    /// Add a node labeled `label` spanning `snippet`.
    pub fn labeled(
        &mut self,
        parent: NodeId,
        kind: SyntaxKind,
        label: &str,
        snippet: &str,
    ) -> NodeId {
        let range = self.locate(parent, snippet);
        let id = self
            .builder
            .push(parent, kind, label, range)
            .expect("parent allocated by this fixture");
        self.ranges.push(range);
        self.cursors.insert(parent, range.end());
        id
    }

    /// Add a structural (unlabeled) node spanning `snippet`.
    pub fn node(&mut self, parent: NodeId, kind: SyntaxKind, snippet: &str) -> NodeId {
        self.labeled(parent, kind, "", snippet)
    }

    /// Add a node whose label is its own text.
    pub fn leaf(&mut self, parent: NodeId, kind: SyntaxKind, text: &str) -> NodeId {
        self.labeled(parent, kind, text, text)
    }

    pub fn name(&mut self, parent: NodeId, ident: &str) -> NodeId {
        self.leaf(parent, SyntaxKind::SimpleName, ident)
    }

    /// Add a type reference, expanding generics, arrays and wildcards the way
    /// the JDT generator does.
    pub fn ty(&mut self, parent: NodeId, ty: &str) -> NodeId {
        let ty = ty.trim();
        if let Some(element) = ty.strip_suffix("[]") {
            let array = self.node(parent, SyntaxKind::ArrayType, ty);
            self.ty(array, element);
            return array;
        }
        if let (Some(open), true) = (ty.find('<'), ty.ends_with('>')) {
            let generic = self.node(parent, SyntaxKind::ParameterizedType, ty);
            self.ty(generic, &ty[..open]);
            for arg in split_top_level(&ty[open + 1..ty.len() - 1]) {
                self.type_argument(generic, arg);
            }
            return generic;
        }
        if PRIMITIVES.contains(&ty) {
            return self.leaf(parent, SyntaxKind::PrimitiveType, ty);
        }
        let simple = self.node(parent, SyntaxKind::SimpleType, ty);
        if ty.contains('.') {
            self.leaf(simple, SyntaxKind::QualifiedName, ty);
        } else {
            self.name(simple, ty);
        }
        simple
    }

    fn type_argument(&mut self, parent: NodeId, arg: &str) {
        let Some(rest) = arg.strip_prefix('?') else {
            self.ty(parent, arg);
            return;
        };
        let wildcard = self.node(parent, SyntaxKind::WildcardType, arg);
        let rest = rest.trim_start();
        if let Some(bound) = rest
            .strip_prefix("extends")
            .or_else(|| rest.strip_prefix("super"))
        {
            self.ty(wildcard, bound);
        }
    }

    /// `package a.b.c;` as the next child of the compilation unit.
    pub fn package(&mut self, name: &str) -> NodeId {
        let decl = self.node(
            NodeId::ROOT,
            SyntaxKind::PackageDeclaration,
            &format!("package {name};"),
        );
        let kind = if name.contains('.') {
            SyntaxKind::QualifiedName
        } else {
            SyntaxKind::SimpleName
        };
        self.leaf(decl, kind, name);
        decl
    }

    /// A class or interface declaration; `snippet` is its full text.
    pub fn class(&mut self, parent: NodeId, snippet: &str) -> ClassNodes {
        let decl = self.node(parent, SyntaxKind::TypeDeclaration, snippet);
        let header = &snippet[..snippet.find('{').unwrap_or(snippet.len())];
        let mut words = header.split_whitespace();
        let mut name = None;
        while let Some(word) = words.next() {
            if word == "class" || word == "interface" {
                self.leaf(decl, SyntaxKind::TypeDeclarationKind, word);
                name = words.next();
                break;
            }
            self.leaf(decl, SyntaxKind::Modifier, word);
        }
        let name = name.expect("class snippet names the type");
        let name = name.split('<').next().unwrap_or(name);
        let name = self.name(decl, name);
        ClassNodes { decl, name }
    }

    /// A field declaration such as `private List<String> items;`.
    pub fn field(&mut self, class: NodeId, snippet: &str) -> FieldNodes {
        self.variable(class, SyntaxKind::FieldDeclaration, snippet)
    }

    /// A local variable declaration statement such as `int count = 0;`.
    pub fn local(&mut self, block: NodeId, snippet: &str) -> FieldNodes {
        self.variable(block, SyntaxKind::VariableDeclarationStatement, snippet)
    }

    fn variable(&mut self, parent: NodeId, kind: SyntaxKind, snippet: &str) -> FieldNodes {
        let decl = self.node(parent, kind, snippet);
        let statement = snippet.trim_end().trim_end_matches(';');
        let declarator = statement.split('=').next().unwrap_or(statement).trim_end();
        let (head, name) = split_last_word(declarator);
        let (modifiers, ty) = split_modifiers(head);
        for modifier in modifiers {
            self.leaf(decl, SyntaxKind::Modifier, modifier);
        }
        let ty = self.ty(decl, ty);
        let fragment_text = statement[declarator.len() - name.len()..].trim();
        let fragment = self.node(decl, SyntaxKind::VariableDeclarationFragment, fragment_text);
        let name = self.name(fragment, name);
        FieldNodes {
            decl,
            ty,
            fragment,
            name,
        }
    }

    /// A method declaration; `snippet` is its full text including the body.
    pub fn method(&mut self, class: NodeId, snippet: &str) -> MethodNodes {
        let decl = self.node(class, SyntaxKind::MethodDeclaration, snippet);
        let open = snippet.find('(').expect("method snippet has a parameter list");
        let close = open + snippet[open..].find(')').expect("parameter list is closed");

        let (head, name) = split_last_word(snippet[..open].trim_end());
        let (modifiers, return_type) = split_modifiers(head);
        for modifier in modifiers {
            self.leaf(decl, SyntaxKind::Modifier, modifier);
        }
        let return_type = (!return_type.is_empty()).then(|| self.ty(decl, return_type));
        let name = self.name(decl, name);

        let mut params = Vec::new();
        for param in split_top_level(&snippet[open + 1..close]) {
            params.push(self.parameter(decl, param));
        }

        let tail = &snippet[close + 1..];
        let body = tail
            .find('{')
            .map(|brace| self.node(decl, SyntaxKind::Block, tail[brace..].trim_end()));

        MethodNodes {
            decl,
            return_type,
            name,
            params,
            body,
        }
    }

    /// A `SingleVariableDeclaration` such as `int x`.
    pub fn parameter(&mut self, parent: NodeId, snippet: &str) -> ParameterNodes {
        let decl = self.node(parent, SyntaxKind::SingleVariableDeclaration, snippet);
        let (ty, name) = split_last_word(snippet);
        let ty = self.ty(decl, ty);
        let name = self.name(decl, name);
        ParameterNodes { decl, ty, name }
    }

    /// An enhanced for statement such as `for (String s : items) { ... }`.
    pub fn for_each(&mut self, block: NodeId, snippet: &str) -> (NodeId, ParameterNodes) {
        let statement = self.node(block, SyntaxKind::EnhancedForStatement, snippet);
        let open = snippet.find('(').expect("for statement has a header");
        let colon = snippet.find(':').expect("enhanced for has a colon");
        let variable = self.parameter(statement, snippet[open + 1..colon].trim());
        (statement, variable)
    }

    pub fn finish(self) -> SyntaxTree {
        self.builder
            .finish()
            .expect("fixture spans are well formed")
    }
}

fn split_last_word(text: &str) -> (&str, &str) {
    let text = text.trim();
    match text.rfind(char::is_whitespace) {
        Some(split) => (text[..split].trim_end(), &text[split + 1..]),
        None => ("", text),
    }
}

fn split_modifiers(text: &str) -> (Vec<&str>, &str) {
    let mut modifiers = Vec::new();
    let mut rest = text.trim_start();
    loop {
        let word_end = rest.find(char::is_whitespace).unwrap_or(rest.len());
        let word = &rest[..word_end];
        if word.is_empty() || !MODIFIERS.contains(&word) {
            break;
        }
        modifiers.push(word);
        rest = rest[word_end..].trim_start();
    }
    (modifiers, rest.trim())
}

fn split_top_level(text: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;
    for (idx, ch) in text.char_indices() {
        match ch {
            '<' => depth += 1,
            '>' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => {
                parts.push(text[start..idx].trim());
                start = idx + 1;
            }
            _ => {}
        }
    }
    let last = text[start..].trim();
    if !last.is_empty() {
        parts.push(last);
    }
    parts
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn methods_follow_jdt_child_order() {
        let text = "class C { public String foo(int x, List<String> ys) { return null; } }";
        let mut t = FixtureTree::new(text);
        let class = t.class(t.root(), text);
        let method = t.method(class.decl, "public String foo(int x, List<String> ys) { return null; }");
        let tree = t.finish();

        let kinds: Vec<_> = tree
            .children(method.decl)
            .iter()
            .map(|&child| tree.kind(child))
            .collect();
        assert_eq!(
            kinds,
            vec![
                SyntaxKind::Modifier,
                SyntaxKind::SimpleType,
                SyntaxKind::SimpleName,
                SyntaxKind::SingleVariableDeclaration,
                SyntaxKind::SingleVariableDeclaration,
                SyntaxKind::Block,
            ]
        );
        assert_eq!(tree.label(method.name), "foo");
        assert_eq!(tree.source_text(method.params[1].ty), "List<String>");
        assert_eq!(tree.kind(method.params[1].ty), SyntaxKind::ParameterizedType);
        assert_eq!(tree.source_text(method.body.unwrap()), "{ return null; }");
        assert_eq!(tree.label(class.name), "C");
    }

    #[test]
    fn fields_split_modifiers_type_and_fragment() {
        let text = "class C { private static Map<String, int[]> index = null; }";
        let mut t = FixtureTree::new(text);
        let class = t.class(t.root(), text);
        let field = t.field(class.decl, "private static Map<String, int[]> index = null;");
        let tree = t.finish();

        assert_eq!(tree.source_text(field.ty), "Map<String, int[]>");
        assert_eq!(tree.source_text(field.fragment), "index = null");
        assert_eq!(tree.label(field.name), "index");
        let modifiers: Vec<_> = tree
            .children(field.decl)
            .iter()
            .filter(|&&child| tree.kind(child) == SyntaxKind::Modifier)
            .map(|&child| tree.label(child))
            .collect();
        assert_eq!(modifiers, vec!["private", "static"]);
    }
}
