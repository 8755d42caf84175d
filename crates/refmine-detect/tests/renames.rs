use pretty_assertions::assert_eq;
use refmine_detect::{
    detect_refactorings, CodeElementType, DetectOptions, RefactoringKind, RefactoringSet,
};
use refmine_syntax::SyntaxKind;
use refmine_test_utils::{label_diff, FixtureTree};

/// Build the same layout over both texts and classify the label changes.
fn detect(before: &str, after: &str, build: impl Fn(&mut FixtureTree, &str)) -> RefactoringSet {
    let tree = |text: &str| {
        let mut t = FixtureTree::new(text);
        build(&mut t, text);
        t.finish()
    };
    let diff = label_diff(tree(before), tree(after));
    detect_refactorings("src/C.java", &diff, &DetectOptions::default())
}

fn descriptions(set: &RefactoringSet) -> Vec<&str> {
    set.descriptions().collect()
}

/// The method snippet of a one-method class `class C { <method> }`.
fn method_text(text: &str) -> &str {
    &text["class C { ".len()..text.len() - " }".len()]
}

#[test]
fn renamed_method() {
    let found = detect(
        "class C { public void foo(int x) {} }",
        "class C { public void bar(int x) {} }",
        |t, text| {
            let class = t.class(t.root(), text);
            t.method(class.decl, method_text(text));
        },
    );

    assert_eq!(
        descriptions(&found),
        vec!["Rename Method public foo(x int) : void renamed to public bar(x int) : void in class C"]
    );
    let rename = found.iter().next().unwrap();
    assert_eq!(rename.kind, RefactoringKind::RenameMethod);
    assert_eq!(rename.before.code_element_type, CodeElementType::MethodDeclaration);
    assert_eq!(rename.before.description, "original method name");
    assert_eq!(rename.before.code_element, "foo");
    assert_eq!(rename.after.description, "renamed method name");
    assert_eq!(rename.after.code_element, "bar");
    assert_eq!((rename.after.start_line, rename.after.start_column), (1, 23));
    assert_eq!((rename.after.end_line, rename.after.end_column), (1, 26));
}

#[test]
fn renamed_method_in_packaged_nested_class() {
    let build = |t: &mut FixtureTree, text: &str| {
        t.package("org.demo");
        let start = text.find("class").unwrap();
        let outer = t.class(t.root(), &text[start..]);
        let inner_start = text.find("static class").unwrap();
        let inner = t.class(outer.decl, &text[inner_start..text.len() - 2]);
        let method_start = text.find("void").unwrap();
        t.method(inner.decl, &text[method_start..text.len() - 4]);
    };
    let found = detect(
        "package org.demo;\nclass Outer { static class Inner { void run() {} } }",
        "package org.demo;\nclass Outer { static class Inner { void start() {} } }",
        build,
    );

    assert_eq!(
        descriptions(&found),
        vec!["Rename Method package run() : void renamed to package start() : void in class org.demo.Outer.Inner"]
    );
}

#[test]
fn renamed_parameter() {
    let build = |t: &mut FixtureTree, text: &str| {
        let class = t.class(t.root(), text);
        let method = t.method(class.decl, method_text(text));
        let body = method.body.unwrap();
        let name = t.range(method.params[0].name);
        let name = &text[usize::from(name.start())..usize::from(name.end())];
        let stmt = t.node(body, SyntaxKind::ExpressionStatement, &format!("use({name});"));
        let call = t.node(stmt, SyntaxKind::MethodInvocation, &format!("use({name})"));
        t.name(call, "use");
        t.name(call, name);
    };
    let found = detect(
        "class C { public void m(int a) { use(a); } }",
        "class C { public void m(int b) { use(b); } }",
        build,
    );

    let expected = "Rename Parameter a : int to b : int in method public m(b int) : void in class C";
    // The type-change pass reads the declaration's name update by shape too.
    assert_eq!(
        descriptions(&found),
        vec![
            "Change Parameter Type a : int to b : int in method public m(b int) : void in class C",
            expected,
        ]
    );
    let rename = found.get(expected).unwrap();
    assert_eq!(rename.before.code_element_type, CodeElementType::SingleVariableDeclaration);
    assert_eq!(rename.before.code_element, "a : int");
    assert_eq!(rename.after.code_element, "b : int");
    assert_eq!(rename.after.description, "renamed variable declaration");
}

#[test]
fn attribute_renames_need_a_second_update() {
    let declaration_only = detect(
        "class C { private int count; }",
        "class C { private int total; }",
        |t, text| {
            let class = t.class(t.root(), text);
            t.field(class.decl, &text[10..text.len() - 2]);
        },
    );
    assert!(declaration_only.is_empty());

    let build = |t: &mut FixtureTree, text: &str| {
        let class = t.class(t.root(), text);
        let field_end = text.find(';').unwrap() + 1;
        let field = t.field(class.decl, &text[10..field_end]);
        let name = t.range(field.name);
        let name = text[usize::from(name.start())..usize::from(name.end())].to_string();
        let method = t.method(class.decl, &text[field_end + 1..text.len() - 2]);
        let ret = t.node(
            method.body.unwrap(),
            SyntaxKind::ReturnStatement,
            &format!("return {name};"),
        );
        t.name(ret, &name);
    };
    let found = detect(
        "class C { private int count; int get() { return count; } }",
        "class C { private int total; int get() { return total; } }",
        build,
    );

    let expected = "Rename Attribute count : int to total : int in class C";
    assert_eq!(descriptions(&found), vec![expected]);
    let rename = found.get(expected).unwrap();
    assert_eq!(rename.kind, RefactoringKind::RenameAttribute);
    assert_eq!(rename.before.code_element_type, CodeElementType::FieldDeclaration);
    assert_eq!(rename.before.description, "original attribute declaration");
}

#[test]
fn renamed_local_variable() {
    let build = |t: &mut FixtureTree, text: &str| {
        let class = t.class(t.root(), text);
        let method = t.method(class.decl, method_text(text));
        let body = method.body.unwrap();
        let local = t.local(body, &text[text.find("int").unwrap()..text.find(';').unwrap() + 1]);
        let name = t.range(local.name);
        let name = text[usize::from(name.start())..usize::from(name.end())].to_string();
        let stmt = t.node(body, SyntaxKind::ExpressionStatement, &format!("{name}++;"));
        t.name(stmt, &name);
    };
    let found = detect(
        "class C { void m() { int n = 0; n++; } }",
        "class C { void m() { int k = 0; k++; } }",
        build,
    );

    let expected = "Rename Variable n : int to k : int in method package m() : void in class C";
    assert_eq!(descriptions(&found), vec![expected]);
    assert_eq!(
        found.get(expected).unwrap().before.code_element_type,
        CodeElementType::VariableDeclarationStatement
    );
}

#[test]
fn renamed_enhanced_for_variable() {
    let build = |t: &mut FixtureTree, text: &str| {
        let class = t.class(t.root(), text);
        let method = t.method(class.decl, method_text(text));
        let for_start = text.find("for").unwrap();
        let (statement, variable) =
            t.for_each(method.body.unwrap(), &text[for_start..text.len() - 4]);
        t.name(statement, "items");
        let name = t.range(variable.name);
        let name = text[usize::from(name.start())..usize::from(name.end())].to_string();
        let block = t.node(statement, SyntaxKind::Block, &format!("{{ print({name}); }}"));
        let call = t.node(block, SyntaxKind::MethodInvocation, &format!("print({name})"));
        t.name(call, "print");
        t.name(call, &name);
    };
    let found = detect(
        "class C { void m(List<String> items) { for (String s : items) { print(s); } } }",
        "class C { void m(List<String> items) { for (String t : items) { print(t); } } }",
        build,
    );

    let expected = "Rename Variable s : String to t : String in method package m(items List<String>) : void in class C";
    assert_eq!(
        descriptions(&found),
        vec![
            "Change Variable Type s : String to t : String in method package m(items List<String>) : void in class C",
            expected,
        ]
    );
    assert_eq!(
        found.get(expected).unwrap().after.code_element_type,
        CodeElementType::EnhancedForStatementParameterName
    );
}

#[test]
fn primitive_return_type_update_is_a_method_rename() {
    let found = detect(
        "class C { int size() { return 0; } }",
        "class C { long size() { return 0; } }",
        |t, text| {
            let class = t.class(t.root(), text);
            t.method(class.decl, method_text(text));
        },
    );

    let expected = "Rename Method package size() : int renamed to package size() : long in class C";
    assert!(found.contains(expected), "missing: {:?}", descriptions(&found));
    let rename = found.get(expected).unwrap();
    assert_eq!(rename.before.code_element, "int");
    assert_eq!(rename.after.code_element, "long");
}

#[test]
fn literal_and_modifier_edits_are_not_renames() {
    let found = detect(
        "class C { public String s = \"a\"; }",
        "class C { private String s = \"b\"; }",
        |t, text| {
            let class = t.class(t.root(), text);
            let field = t.field(class.decl, &text[10..text.len() - 2]);
            let literal = &text[text.find('"').unwrap()..text.rfind('"').unwrap() + 1];
            t.leaf(field.fragment, SyntaxKind::StringLiteral, literal);
        },
    );
    assert!(found.is_empty(), "unexpected: {:?}", descriptions(&found));
}
