//! End-to-end checks through the public API.

use scriptguard_checker::{
    check, validate, AnonymousFunctionChecker, Checker, ModuleFunctionChecker, ParseGoal, PolicyFile,
    ScriptParser, SingleExpressionChecker, StatementChecker, StatementListChecker,
};
use scriptguard_core::{ErrorCategory, ErrorKind, ListenerRegistry, SanitizerOptions};
use scriptguard_test_utils::assertions::{assert_accepted, assert_context, assert_rejected};
use scriptguard_test_utils::fixtures;
use std::sync::Arc;
use std::thread;

// ============================================================================
// INPUT
// ============================================================================

#[test]
fn test_empty_input_has_no_context() {
    let options = SanitizerOptions::default_options();
    for source in [Some(""), Some("   "), None] {
        let error = assert_rejected(check(&options, source), ErrorKind::EmptyCodeString);
        assert_eq!(error.code(), 2);
        assert_eq!(error.to_string(), "The JavaScript code is empty.");
        assert!(error.context().is_none());
        assert_eq!(error.kind().category(), ErrorCategory::Input);
    }
}

// ============================================================================
// SYNTAX
// ============================================================================

#[test]
fn test_stray_semicolons_are_invalid_tokens() {
    let options = SanitizerOptions::default_options();
    let error = assert_rejected(check(&options, ";;;"), ErrorKind::InvalidToken);
    assert_eq!(error.code(), 200);
    assert_eq!(
        error.context().map(ToString::to_string).as_deref(),
        Some("Source Code: ;\nLine Number: 1, 1\nColumn: 0, 1\nPosition: 0, 1")
    );
}

#[test]
fn test_named_function_is_not_an_expression() {
    let options = SanitizerOptions::default_options();
    let error = assert_rejected(check(&options, "function a() {}"), ErrorKind::InvalidToken);
    assert_eq!(error.to_string(), "Token a is invalid. Expecting '('.");
    let context = assert_context(&error, "a");
    assert_eq!(context.positions, (9, 10));
    assert_eq!(context.lines, (1, 1));
}

#[test]
fn test_syntax_error_position_on_later_line() {
    let options = SanitizerOptions::default_options();
    let error = assert_rejected(check(&options, "1 +\n  * 2"), ErrorKind::InvalidToken);
    let context = assert_context(&error, "*");
    assert_eq!(context.lines, (2, 2));
    assert_eq!(context.columns, (2, 3));
    assert_eq!(context.positions, (6, 7));
}

// ============================================================================
// ACCEPTANCE
// ============================================================================

#[test]
fn test_simple_expressions_are_accepted() {
    let options = SanitizerOptions::default_options();
    assert_eq!(check(&options, "1 + 1"), Ok(true));
    assert_eq!(check(&options, "() => {}"), Ok(true));
    assert!(validate(&options, "1 + 1").unwrap().as_expression().is_some());
}

#[test]
fn test_fixture_expressions() {
    let checker = SingleExpressionChecker::new();
    for source in fixtures::SAFE_EXPRESSIONS {
        assert_accepted(&checker.validate(*source));
    }
    for (source, kind) in fixtures::UNSAFE_EXPRESSIONS {
        assert_rejected(checker.validate(*source), *kind);
    }
}

// ============================================================================
// POLICY
// ============================================================================

#[test]
fn test_async_round_trips_through_derived_policy() {
    let checker = StatementChecker::new();
    let error = assert_rejected(checker.validate("async function f() {}"), ErrorKind::KeywordNotAllowed);
    assert_eq!(error.to_string(), "Keyword async is not allowed.");
    assert_context(&error, "async");

    let options = SanitizerOptions::default_options()
        .to_builder()
        .keyword_async_enabled(true)
        .build_shared();
    assert_eq!(StatementChecker::with_options(options).check("async function f() {}"), Ok(true));

    assert!(!SanitizerOptions::default_options().is_keyword_async_enabled());
}

#[test]
fn test_anonymous_async_function_expression() {
    let error = assert_rejected(
        SingleExpressionChecker::new().validate("async function () {}"),
        ErrorKind::KeywordNotAllowed,
    );
    assert_context(&error, "async");

    let options = Arc::new(fixtures::permissive_options());
    assert_eq!(SingleExpressionChecker::with_options(options).check("async function () {}"), Ok(true));
}

#[test]
fn test_identifier_context_is_exact() {
    let error = assert_rejected(
        SingleExpressionChecker::new().validate("a.b(c).constructor"),
        ErrorKind::IdentifierNotAllowed,
    );
    assert_eq!(error.to_string(), "Identifier constructor is not allowed.");
    let context = assert_context(&error, "constructor");
    assert_eq!(context.positions, (7, 18));
}

#[test]
fn test_policy_file_changes_verdicts() {
    let policy = PolicyFile::from_toml_str(
        r#"
name = "formulas"
reserved_identifier_pattern = "^(price|qty)$"

[keywords]
await = true
"#,
    )
    .unwrap();
    let options = Arc::new(policy.into_options(&ListenerRegistry::with_defaults()).unwrap());
    let checker = SingleExpressionChecker::with_options(options);

    assert_eq!(checker.check("price * qty"), Ok(true));
    assert_eq!(checker.check("Math.round(price)"), Ok(true));
    assert_rejected(checker.validate("discount"), ErrorKind::IdentifierNotAllowed);
}

// ============================================================================
// REGEX OR DIVISION
// ============================================================================

#[test]
fn test_division_after_expression_brace_is_checked() {
    for (source, name) in [
        ("x = {}\n/eval(1)/g", "eval"),
        ("x = function () {}\n/eval(1)/g", "eval"),
        ("a.return\n/eval(1)/g", "eval"),
        ("a.if\n/eval(1)/g", "eval"),
        ("x = {}\n/setTimeout(f)/g", "setTimeout"),
        ("x = class {}\n/Function('y')/g", "Function"),
    ] {
        let error = assert_rejected(StatementListChecker::new().validate(source), ErrorKind::IdentifierNotAllowed);
        let context = assert_context(&error, name);
        assert_eq!(context.lines, (2, 2), "{source:?}");
    }
}

#[test]
fn test_regex_after_statement_brace_is_inert() {
    for source in ["{}\n/eval(1)/g", "if (a) {}\n/eval(1)/g", "while (a) {}\n/setTimeout(f)/g"] {
        assert_accepted(&StatementListChecker::new().validate(source));
    }
}

// ============================================================================
// LIMITS
// ============================================================================

#[test]
fn test_deep_input_is_rejected_without_overflow() {
    let deep = [
        vec!["1"; 50_000].join("+"),
        format!("a{}", ".b".repeat(50_000)),
        format!("f{}", "()".repeat(50_000)),
        format!("{}a", "!".repeat(50_000)),
        "(".repeat(50_000),
        format!("{}{}", "[".repeat(50_000), "]".repeat(50_000)),
    ];
    for source in &deep {
        for checker in [&StatementListChecker::new() as &dyn Checker, &SingleExpressionChecker::new()] {
            let error = assert_rejected(checker.validate_source(Some(source.as_str())), ErrorKind::InvalidToken);
            let context = error.context().expect("positioned error");
            assert!(context.positions.1 <= source.len());
        }
    }

    let sum = vec!["1"; 100].join(" + ");
    assert_accepted(&SingleExpressionChecker::new().validate(sum.as_str()));
}

// ============================================================================
// PROPERTY NAMES
// ============================================================================

#[test]
fn test_wrapped_literal_property_names() {
    for source in [
        "a[['constructor']]",
        "a[('constr', 'constructor')]",
        "a[[(0, '__proto__')]]",
        "a[`constr\\u0075ctor`]",
    ] {
        assert_rejected(SingleExpressionChecker::new().validate(source), ErrorKind::IdentifierNotAllowed);
    }
    assert_accepted(&SingleExpressionChecker::new().validate("a[['items']]"));
}

// ============================================================================
// STRUCTURE
// ============================================================================

#[test]
fn test_goal_specific_checkers() {
    assert_eq!(StatementListChecker::new().max_count(2).check("a; b;"), Ok(true));
    assert_rejected(
        StatementListChecker::new().max_count(2).validate("a; b; c;"),
        ErrorKind::SyntaxCountTooLarge,
    );
    assert_eq!(AnonymousFunctionChecker::new().parameter_count(1).check("(x) => x"), Ok(true));
    assert_eq!(ModuleFunctionChecker::new().check("function main() { return 1; }"), Ok(true));

    let error = assert_rejected(ModuleFunctionChecker::new().validate("const main = 1;"), ErrorKind::IdentifierNotAllowed);
    assert_context(&error, "main");
}

#[test]
fn test_checkers_as_trait_objects() {
    let checkers: Vec<Box<dyn Checker>> = vec![
        Box::new(SingleExpressionChecker::new()),
        Box::new(StatementChecker::new()),
        Box::new(StatementListChecker::new()),
    ];
    for checker in &checkers {
        assert!(checker.validate_source(Some("a + b")).is_ok());
        assert_rejected(checker.validate_source(Some("eval(a)")), ErrorKind::IdentifierNotAllowed);
    }
}

#[test]
fn test_parser_states_by_hand() {
    let options = SanitizerOptions::default_options();
    let parsed = ScriptParser::new(&options, "x = 1; y = 2;", ParseGoal::Program).parse().unwrap();
    let validated = parsed.validate().unwrap();
    assert_eq!(validated.goal(), ParseGoal::Program);
    assert!(validated.accept().is_ok());

    let parsed = ScriptParser::new(&options, "x = 1; y = 2;", ParseGoal::Statement).parse().unwrap();
    let error = assert_rejected(parsed.validate(), ErrorKind::SyntaxCountMismatch);
    assert_context(&error, "y = 2;");
}

// ============================================================================
// CONCURRENCY
// ============================================================================

#[test]
fn test_shared_policy_across_threads() {
    let options = SanitizerOptions::default_options()
        .to_builder()
        .add_disallowed_identifiers(["fetch"])
        .build_shared();

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let options = Arc::clone(&options);
            thread::spawn(move || {
                let checker = SingleExpressionChecker::with_options(options);
                let accepted = checker.check(format!("a + {i}").as_str());
                let rejected = checker.validate(format!("fetch({i})").as_str()).map(|_| ());
                (accepted, rejected)
            })
        })
        .collect();

    for handle in handles {
        let (accepted, rejected) = handle.join().unwrap();
        assert_eq!(accepted, Ok(true));
        assert_rejected(rejected, ErrorKind::IdentifierNotAllowed);
    }
}
