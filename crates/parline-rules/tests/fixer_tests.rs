//! Fix application and fix-all tests

use parline_core::{ConfigLoader, Diagnostic, ParlineConfig, SourceModel};
use parline_rules::{
    CancellationFlag, FixOptions, FixOutcome, RuleEngine, apply_fix, fix_all,
};
use std::path::Path;

const BEFORE: &str = r#"
    using System;

    class TestClass
    {
        void TestMethod(int param1, string param2) { }

        void AnotherMethod()
        {
            TestMethod(0, "test");
        }
    }"#;

const AFTER: &str = r#"
    using System;

    class TestClass
    {
        void TestMethod(
            int param1,
            string param2) { }

        void AnotherMethod()
        {
            TestMethod(
                0,
                "test");
        }
    }"#;

fn engine() -> RuleEngine {
    RuleEngine::with_builtin_rules(ParlineConfig::default())
}

fn render(diagnostics: &[Diagnostic]) -> String {
    diagnostics
        .iter()
        .map(|d| {
            format!(
                "{}:{}-{}:{} {} {}",
                d.location.line,
                d.location.column,
                d.location.end_line.unwrap_or_default(),
                d.location.end_column.unwrap_or_default(),
                d.rule_id,
                d.message
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[test]
fn test_end_to_end_diagnostics() {
    let model = SourceModel::parse("Test.cs", BEFORE);
    let diagnostics = engine().lint(&model, &CancellationFlag::new());

    insta::assert_snapshot!(render(&diagnostics), @r"
    6:25-6:50 style/parameters-on-separate-lines Parameters should be on separate lines
    10:24-10:33 style/parameters-on-separate-lines Parameters should be on separate lines
    ");

    let suggestion = &diagnostics[0].suggestions[0];
    assert_eq!(suggestion.message, "Place each parameter on a new line");
    assert_eq!(
        suggestion.equivalence_key.as_deref(),
        Some("PlaceEachParameterOnNewLine")
    );
}

#[test]
fn test_end_to_end_fix_all() {
    let result = fix_all(&engine(), Path::new("Test.cs"), BEFORE, &FixOptions::default());

    assert_eq!(result.output, AFTER);
    assert_eq!(result.applied, 2);
    assert_eq!(result.passes, 3);
    assert!(result.remaining.is_empty());
    assert!(result.is_changed());
}

#[test]
fn test_fixed_source_has_no_diagnostics() {
    let model = SourceModel::parse("Test.cs", AFTER);
    assert!(engine().lint(&model, &CancellationFlag::new()).is_empty());

    let result = fix_all(&engine(), Path::new("Test.cs"), AFTER, &FixOptions::default());
    assert_eq!(result.output, AFTER);
    assert!(!result.is_changed());
    assert_eq!(result.passes, 1);
}

#[test]
fn test_apply_single_fix() {
    let engine = engine();
    let model = SourceModel::parse("Test.cs", BEFORE);
    let diagnostics = engine.lint(&model, &CancellationFlag::new());

    let FixOutcome::Changed(output) =
        apply_fix(&engine, &model, &diagnostics[1], &FixOptions::default())
    else {
        panic!("expected an edit");
    };

    // Only the call was rewritten
    assert!(output.contains("void TestMethod(int param1, string param2) { }"));
    assert!(output.contains("TestMethod(\n                0,\n                \"test\");"));
}

#[test]
fn test_apply_fix_with_stale_diagnostic() {
    let engine = engine();
    let model = SourceModel::parse("Test.cs", BEFORE);
    let mut diagnostic = engine.lint(&model, &CancellationFlag::new()).remove(0);

    diagnostic.location.span = Some((10_000, 10_010));
    assert_eq!(
        apply_fix(&engine, &model, &diagnostic, &FixOptions::default()),
        FixOutcome::NoChange
    );

    diagnostic.rule_id = "style/unknown".to_string();
    assert_eq!(
        apply_fix(&engine, &model, &diagnostic, &FixOptions::default()),
        FixOutcome::NoChange
    );
}

#[test]
fn test_nested_calls_converge() {
    let source = "class C\n{\n    void M()\n    {\n        Log(a, F(b, c));\n    }\n}\n";
    let result = fix_all(&engine(), Path::new("Test.cs"), source, &FixOptions::default());

    assert_eq!(
        result.output,
        "class C\n{\n    void M()\n    {\n        Log(\n            a,\n            F(\n                b,\n                c));\n    }\n}\n"
    );
    assert_eq!(result.applied, 2);
    assert!(result.remaining.is_empty());
}

#[test]
fn test_fix_all_respects_max_passes() {
    let config = ConfigLoader::parse("[files]\nmax_fix_passes = 1\n", Path::new("parline.toml"))
        .unwrap();
    let engine = RuleEngine::with_builtin_rules(config);

    let result = fix_all(&engine, Path::new("Test.cs"), BEFORE, &FixOptions::default());
    assert_eq!(result.applied, 1);
    assert_eq!(result.passes, 2);
    assert_eq!(result.remaining.len(), 1);
}

#[test]
fn test_fix_all_uses_configured_layout() {
    let config = ConfigLoader::parse(
        "[formatter]\nindent_style = \"tabs\"\n",
        Path::new("parline.toml"),
    )
    .unwrap();
    let options = FixOptions::from_config(&config);
    let engine = RuleEngine::with_builtin_rules(config);

    let source = "class C\n{\n\tvoid M(int a, int b) { }\n}\n";
    let result = fix_all(&engine, Path::new("Test.cs"), source, &options);
    assert_eq!(
        result.output,
        "class C\n{\n\tvoid M(\n\t\tint a,\n\t\tint b) { }\n}\n"
    );
}

#[test]
fn test_fix_all_leaves_syntax_errors_in_remaining() {
    let source = "class C { void M(int a) { var s = \"open; } }";
    let result = fix_all(&engine(), Path::new("Test.cs"), source, &FixOptions::default());

    assert!(!result.is_changed());
    assert_eq!(result.remaining.len(), 1);
    assert_eq!(result.remaining[0].rule_id, "correctness/syntax-error");
}
