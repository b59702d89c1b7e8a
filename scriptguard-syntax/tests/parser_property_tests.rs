//! Property-Based Tests for Parser Robustness
//!
//! Random sources must never panic the parser, error spans must point
//! inside the source, and a `/` after a line break must be read the way a
//! JavaScript engine reads it.

use proptest::prelude::*;
use scriptguard_syntax::parser::ast::*;
use scriptguard_syntax::{parse_program, parse_single_expression, Expected};

// ============================================================================
// STRATEGIES
// ============================================================================

/// Sources that end in a complete expression, so a following `/` divides.
fn expression_prefix() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("x = {}".to_string()),
        Just("x = function () {}".to_string()),
        Just("x = class {}".to_string()),
        Just("(a)".to_string()),
        Just("a[0]".to_string()),
        Just("a`t`".to_string()),
        "[a-z]{1,4}".prop_filter("reserved words", |name| !is_reserved(name)),
        prop::sample::select(vec!["return", "if", "typeof", "in", "this", "await", "yield"])
            .prop_map(|word| format!("a.{word}")),
        prop::sample::select(vec!["return", "if", "new", "delete"]).prop_map(|word| format!("a?.{word}")),
    ]
}

/// Sources that end in a complete statement, so a following `/` starts a
/// regular expression.
fn statement_prefix() -> impl Strategy<Value = String> {
    prop::sample::select(vec![
        "{}",
        "if (a) {}",
        "if (a) {} else {}",
        "while (a) {}",
        "for (;;) {}",
        "try {} catch {}",
        "function f() {}",
        "class K {}",
        "label: {}",
        ";",
    ])
    .prop_map(str::to_string)
}

fn slash_payload() -> impl Strategy<Value = String> {
    prop::sample::select(vec!["eval(1)", "setTimeout(f)", "Function('x')", "a", "\\/x"])
        .prop_map(|body| format!("/{body}/g"))
}

fn is_reserved(word: &str) -> bool {
    matches!(
        word,
        "do" | "if" | "in" | "for" | "let" | "new" | "try" | "var" | "case" | "else" | "enum" | "this"
            | "void" | "with" | "null" | "true"
    )
}

// ============================================================================
// PROPERTIES
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn parser_never_panics(source in "\\PC{0,64}") {
        let _ = parse_program(&source);
        let _ = parse_single_expression(&source);
    }

    #[test]
    fn error_spans_stay_inside_source(source in "[a-z(){}\\[\\];,.=+/*'\"` \n]{0,48}") {
        for result in [parse_program(&source).err(), parse_single_expression(&source).err()] {
            if let Some(error) = result {
                prop_assert!(error.span.start <= error.span.end);
                prop_assert!(error.span.end <= source.len());
                prop_assert!(source.is_char_boundary(error.span.start));
                prop_assert!(source.is_char_boundary(error.span.end));
                prop_assert!(error.span.line >= 1);
            }
        }
    }

    #[test]
    fn slash_after_expression_is_division(
        prefix in expression_prefix(),
        separator in prop::sample::select(vec!["\n", " ", "\n  /* c */ "]),
        payload in slash_payload(),
    ) {
        let source = format!("{prefix}{separator}{payload}");
        if let Ok(program) = parse_program(&source) {
            prop_assert_eq!(program.body.len(), 1, "{:?}", source);
            prop_assert!(!contains_regex(&program.body[0]), "{:?} read a regex", source);
        }
    }

    #[test]
    fn slash_after_statement_is_regex(prefix in statement_prefix(), payload in slash_payload()) {
        let source = format!("{prefix}\n{payload}");
        let program = parse_program(&source).map_err(|e| TestCaseError::fail(format!("{source:?}: {e}")))?;
        let last = program.body.last();
        prop_assert!(
            matches!(last, Some(Statement::Expression(s)) if matches!(s.expression, Expression::Literal(Literal::RegExp(_)))),
            "{:?} should end in a regular expression",
            source
        );
    }

    #[test]
    fn deep_nesting_is_an_error(depth in 300usize..2_000, opener in prop::sample::select(vec!["(", "[", "!", "-", "typeof "])) {
        let closer = match opener {
            "(" => ")",
            "[" => "]",
            _ => "",
        };
        let source = format!("{}x{}", opener.repeat(depth), closer.repeat(depth));
        let error = parse_single_expression(&source).unwrap_err();
        prop_assert_eq!(error.expected, Expected::ShallowerNesting);
    }
}

/// Whether a regular expression literal appears directly in a statement's
/// binary and assignment operands.
fn contains_regex(statement: &Statement) -> bool {
    let Statement::Expression(statement) = statement else {
        return false;
    };
    let mut pending = vec![&statement.expression];
    while let Some(expression) = pending.pop() {
        match expression {
            Expression::Literal(Literal::RegExp(_)) => return true,
            Expression::Binary(binary) => pending.extend([&binary.left, &binary.right]),
            Expression::Assignment(assignment) => pending.push(&assignment.value),
            _ => {}
        }
    }
    false
}
