//! List reformatting tests

use parline_core::cst::ast::{AstNode, ArgumentList, ParameterList, SeparatedList};
use parline_core::cst::{CsSyntaxKind, CsSyntaxNode, parse_cs};
use parline_core::{NewlineStyle, SourceModel};
use parline_rules::FixOptions;
use parline_rules::builtin::{detect, list_reformat::reformat};

fn nth_of(root: &CsSyntaxNode, kind: CsSyntaxKind, n: usize) -> CsSyntaxNode {
    root.descendants()
        .filter(|node| node.kind() == kind)
        .nth(n)
        .unwrap()
}

fn reformat_text(source: &str, kind: CsSyntaxKind, n: usize) -> Option<String> {
    let (cst, _) = parse_cs(source);
    let trigger = nth_of(&cst, kind, n);
    reformat(&cst, &trigger, &FixOptions::default()).map(|root| root.text().to_string())
}

#[test]
fn test_declaration_on_one_line() {
    let fixed = reformat_text("void f(int a, string b) { }\n", CsSyntaxKind::MethodDecl, 0);

    assert_eq!(fixed.as_deref(), Some("void f(\n    int a,\n    string b) { }\n"));
}

#[test]
fn test_call_inside_indented_body() {
    let source = "class C\n{\n    void M()\n    {\n        f(0, \"test\");\n    }\n}\n";
    let fixed = reformat_text(source, CsSyntaxKind::InvocationExpr, 0).unwrap();

    assert_eq!(
        fixed,
        "class C\n{\n    void M()\n    {\n        f(\n            0,\n            \"test\");\n    }\n}\n"
    );
}

#[test]
fn test_already_formatted_list_is_unchanged() {
    let source = "class C\n{\n    void M(\n        int a,\n        string b)\n    {\n    }\n}\n";

    for kind in [
        CsSyntaxKind::MethodDecl,
        CsSyntaxKind::ParameterList,
        CsSyntaxKind::Parameter,
    ] {
        assert_eq!(reformat_text(source, kind, 0), None, "{kind:?}");
    }
}

#[test]
fn test_fix_output_is_a_fixpoint() {
    let source = "class C\n{\n    void M(int a, int b, int c)\n    {\n        Run(a, b);\n    }\n}\n";

    let once = reformat_text(source, CsSyntaxKind::MethodDecl, 0).unwrap();
    let twice = reformat_text(&once, CsSyntaxKind::MethodDecl, 0);
    assert_eq!(twice, None);

    let model = SourceModel::parse("Test.cs", once);
    let decl = nth_of(&model.cst, CsSyntaxKind::MethodDecl, 0);
    assert!(detect(&decl, &model.source_map).is_empty());
}

#[test]
fn test_separators_are_preserved() {
    let source = "class C\n{\n    void M()\n    {\n        F(a ,b ,  c,d);\n    }\n}\n";
    let (cst, _) = parse_cs(source);
    let call = nth_of(&cst, CsSyntaxKind::InvocationExpr, 0);

    let separators = |root: &CsSyntaxNode| -> Vec<String> {
        let list = ArgumentList::cast(nth_of(root, CsSyntaxKind::ArgumentList, 0)).unwrap();
        list.separators().iter().map(|t| t.text().to_string()).collect()
    };

    let fixed = reformat(&cst, &call, &FixOptions::default()).unwrap();
    assert_eq!(separators(&fixed), separators(&cst));
    assert_eq!(
        fixed.text().to_string(),
        "class C\n{\n    void M()\n    {\n        F(\n            a ,\n            b ,\n            c,\n            d);\n    }\n}\n"
    );
}

#[test]
fn test_argument_trigger_resolves_to_its_call() {
    let source = "class C\n{\n    void M(int a, int b)\n    {\n        F(a, b);\n    }\n}\n";
    let fixed = reformat_text(source, CsSyntaxKind::Argument, 1).unwrap();

    // The enclosing declaration's parameters stay on one line
    assert_eq!(
        fixed,
        "class C\n{\n    void M(int a, int b)\n    {\n        F(\n            a,\n            b);\n    }\n}\n"
    );
}

#[test]
fn test_every_trigger_shape_gives_the_same_edit() {
    let source = "class C\n{\n    void M(int a, int b) { }\n}\n";
    let expected = "class C\n{\n    void M(\n        int a,\n        int b) { }\n}\n";

    for (kind, n) in [
        (CsSyntaxKind::Parameter, 0),
        (CsSyntaxKind::Parameter, 1),
        (CsSyntaxKind::ParameterList, 0),
        (CsSyntaxKind::MethodDecl, 0),
    ] {
        assert_eq!(reformat_text(source, kind, n).as_deref(), Some(expected), "{kind:?}");
    }
}

#[test]
fn test_unrelated_trigger_is_a_no_op() {
    let source = "class C\n{\n    int x = 1;\n    void M(int a, int b) { }\n}\n";

    assert_eq!(reformat_text(source, CsSyntaxKind::MemberDecl, 0), None);
    assert_eq!(reformat_text(source, CsSyntaxKind::TypeDecl, 0), None);
}

#[test]
fn test_original_tree_is_not_modified() {
    let source = "class C { void M(int a, int b) { } }";
    let (cst, _) = parse_cs(source);
    let list = nth_of(&cst, CsSyntaxKind::ParameterList, 0);

    let fixed = reformat(&cst, &list, &FixOptions::default()).unwrap();
    assert_ne!(fixed.text().to_string(), source);
    assert_eq!(cst.text().to_string(), source);
    assert_eq!(
        ParameterList::cast(nth_of(&fixed, CsSyntaxKind::ParameterList, 0))
            .unwrap()
            .items()
            .len(),
        2
    );
}

#[test]
fn test_crlf_documents_get_crlf_breaks() {
    let source = "class C\r\n{\r\n    void M(int a, int b) { }\r\n}\r\n";
    let fixed = reformat_text(source, CsSyntaxKind::MethodDecl, 0).unwrap();

    assert_eq!(
        fixed,
        "class C\r\n{\r\n    void M(\r\n        int a,\r\n        int b) { }\r\n}\r\n"
    );

    let (cst, _) = parse_cs(source);
    let decl = nth_of(&cst, CsSyntaxKind::MethodDecl, 0);
    let lf = FixOptions {
        newline: NewlineStyle::Lf,
        ..FixOptions::default()
    };
    let fixed = reformat(&cst, &decl, &lf).unwrap().text().to_string();
    assert!(fixed.contains("void M(\n        int a,\n        int b)"));
}

#[test]
fn test_indent_follows_anchor_line_not_open_paren() {
    let source = "class C\n{\n    void M()\n    {\n        var total = Sum(1, 2);\n    }\n}\n";
    let fixed = reformat_text(source, CsSyntaxKind::InvocationExpr, 0).unwrap();

    assert_eq!(
        fixed,
        "class C\n{\n    void M()\n    {\n        var total = Sum(\n            1,\n            2);\n    }\n}\n"
    );
}

#[test]
fn test_missing_item_keeps_its_separator() {
    let source = "class C\n{\n    void M()\n    {\n        F(a, b, );\n    }\n}\n";
    let fixed = reformat_text(source, CsSyntaxKind::InvocationExpr, 0).unwrap();

    assert_eq!(
        fixed,
        "class C\n{\n    void M()\n    {\n        F(\n            a,\n            b,\n            );\n    }\n}\n"
    );
}
