//! Parser integration tests: accepted shapes, error locations and ASI.

use scriptguard_syntax::parser::ast::*;
use scriptguard_syntax::{parse_program, parse_single_expression, Expected};

// ============================================================================
// SINGLE EXPRESSIONS
// ============================================================================

#[test]
fn single_expressions_accepted() {
    let cases = [
        "1 + 1",
        "() => {}",
        "async () => {}",
        "async x => await x",
        "(a, b = 2, ...rest) => a + b",
        "function () {}",
        "function* () { yield 1; }",
        "async function () {}",
        "class {}",
        "a?.b?.[c]?.(d)",
        "a ?? b || c && d",
        "x = y ||= z",
        "2 ** 3 ** 2",
        "typeof a === 'string' ? a : String(a)",
        "new Date().getTime()",
        "`hello ${name}, ${`nested ${deep}`}`",
        "tag`raw ${value}`",
        "/ab+c/gi.test(s)",
        "{ a: 1, 'b': 2, [c]: 3, d, ...e, get f() { return 1; }, set f(v) {}, g() {} }",
        "[1, , 3, ...rest]",
        "import('./module.js')",
        "a, b, c",
        "0x1F + 0b101 + 0o17 + 1_000 + 10n + .5e-3",
    ];

    for source in cases {
        if let Err(error) = parse_single_expression(source) {
            panic!("{source:?} should parse: {error}");
        }
    }
}

#[test]
fn named_function_rejected_as_single_expression() {
    for (source, name) in [
        ("function a() {}", "a"),
        ("async function b() {}", "b"),
        ("function* c() {}", "c"),
    ] {
        let error = parse_single_expression(source).unwrap_err();
        assert_eq!(error.expected, Expected::Token("(".into()));
        assert_eq!(error.found, name);
    }
}

#[test]
fn nested_named_function_is_allowed() {
    let expression = parse_single_expression("(function inner() {})").unwrap();
    let inner = expression.unparenthesized();
    match inner {
        Expression::Function(function) => {
            assert_eq!(function.id.as_ref().map(|id| id.name.as_str()), Some("inner"));
        }
        other => panic!("expected function, got {other:?}"),
    }
}

#[test]
fn comma_sequence_keeps_every_expression() {
    let expression = parse_single_expression("a, b, c").unwrap();
    match expression {
        Expression::Sequence(sequence) => {
            assert_eq!(sequence.expressions.len(), 3);
            assert_eq!(sequence.span.start, 0);
            assert_eq!(sequence.span.end, 7);
        }
        other => panic!("expected sequence, got {other:?}"),
    }
}

#[test]
fn arrow_records_async_span() {
    let expression = parse_single_expression("async (x) => x").unwrap();
    match expression {
        Expression::Arrow(arrow) => {
            let span = arrow.async_span.expect("async span");
            assert_eq!((span.start, span.end), (0, 5));
            assert_eq!(arrow.params.len(), 1);
        }
        other => panic!("expected arrow, got {other:?}"),
    }
}

#[test]
fn async_as_plain_identifier() {
    let expression = parse_single_expression("async(1)").unwrap();
    assert!(matches!(expression, Expression::Call(_)));
}

#[test]
fn precedence_and_associativity() {
    let expression = parse_single_expression("1 + 2 * 3").unwrap();
    let Expression::Binary(binary) = expression else {
        panic!("expected binary");
    };
    assert_eq!(binary.operator, BinaryOperator::Add);
    assert!(matches!(&binary.right, Expression::Binary(b) if b.operator == BinaryOperator::Mul));

    let expression = parse_single_expression("2 ** 3 ** 2").unwrap();
    let Expression::Binary(binary) = expression else {
        panic!("expected binary");
    };
    assert!(matches!(&binary.left, Expression::Literal(_)));
    assert!(matches!(&binary.right, Expression::Binary(b) if b.operator == BinaryOperator::Exp));
}

// ============================================================================
// ERRORS
// ============================================================================

#[test]
fn empty_statements_rejected_at_first_token() {
    let error = parse_single_expression(";;;").unwrap_err();
    assert_eq!(error.found, ";");
    assert_eq!((error.span.start, error.span.end), (0, 1));
    assert_eq!((error.span.line, error.span.column), (1, 0));
    assert_eq!(error.span.end_column, 1);
}

#[test]
fn error_positions_on_later_lines() {
    let error = parse_program("let a = 1;\nlet b = ;").unwrap_err();
    assert_eq!(error.found, ";");
    assert_eq!(error.span.line, 2);
    assert_eq!(error.span.column, 8);
    assert_eq!(error.span.start, 19);
}

#[test]
fn unterminated_inputs_fail_cleanly() {
    for source in ["(", "[1, 2", "{ a: ", "`abc ${x", "'abc", "function () {", "/* open"] {
        assert!(parse_single_expression(source).is_err(), "{source:?} should fail");
    }
}

#[test]
fn escaped_keyword_is_not_an_identifier() {
    assert!(parse_single_expression(r"\u0076ar").is_err());
    let expression = parse_single_expression(r"\u{65}val").unwrap();
    assert!(matches!(expression, Expression::Identifier(id) if id.name == "eval"));
}

// ============================================================================
// PROGRAMS
// ============================================================================

#[test]
fn program_statements() {
    let source = r#"
        'use strict';
        import def, { a as b, c } from "mod";
        export const x = 1, y = 2;
        export default function () {}
        var v; let [p, q] = r; const { s, ...t } = u;
        label: for (let i = 0; i < 3; i++) { if (i) continue label; else break; }
        for (const k in obj) {}
        for await (const item of items) {}
        while (false) ;
        do { n--; } while (n)
        switch (z) { case 1: f(); break; default: g(); }
        try { h(); } catch { } finally { }
        try { h(); } catch ({ message }) { throw message; }
        debugger;
        class K extends Base { #p = 1; static s; static { init(); } constructor() { super(); } get v() { return this.#p; } }
    "#;
    let program = parse_program(source).unwrap();
    assert_eq!(program.body.len(), 17);
    assert!(matches!(program.body[1], Statement::Import(_)));
    assert!(matches!(program.body[8], Statement::ForIn(_)));
    match &program.body[9] {
        Statement::ForOf(for_of) => assert!(for_of.await_span.is_some()),
        other => panic!("expected for-of, got {other:?}"),
    }
    match &program.body[16] {
        Statement::Class(class) => {
            assert_eq!(class.body.len(), 5);
            let constructor = class.body.iter().any(|member| {
                matches!(member, ClassMember::Method(m) if m.kind == MethodKind::Constructor)
            });
            assert!(constructor);
        }
        other => panic!("expected class, got {other:?}"),
    }
}

#[test]
fn script_only_and_module_only_programs() {
    let program = parse_program("with (scope) { w; }").unwrap();
    assert!(matches!(program.body[0], Statement::With(_)));

    let program = parse_program("import x from 'y'; await x;").unwrap();
    assert_eq!(program.body.len(), 2);

    // Neither a script nor a module may mix the two.
    assert!(parse_program("import x from 'y'; with (x) {}").is_err());
}

#[test]
fn automatic_semicolon_insertion() {
    let program = parse_program("a = 1\nb = 2\nc++\n++d").unwrap();
    assert_eq!(program.body.len(), 4);

    // `return` followed by a line break returns nothing.
    let program = parse_program("function f() { return\n1 }").unwrap();
    let Statement::Function(function) = &program.body[0] else {
        panic!("expected function");
    };
    assert_eq!(function.body.body.len(), 2);
    assert!(matches!(&function.body.body[0], Statement::Return(r) if r.argument.is_none()));

    assert!(parse_program("a = 1 b = 2").is_err());
}

#[test]
fn regex_after_block_and_division_after_paren() {
    let program = parse_program("{}\n/re/.test(s)").unwrap();
    assert_eq!(program.body.len(), 2);

    let expression = parse_single_expression("(a) / b / c").unwrap();
    assert!(matches!(expression, Expression::Binary(b) if b.operator == BinaryOperator::Div));
}

#[test]
fn slash_after_expression_closing_brace_divides() {
    for prefix in ["x = {}", "x = function () {}", "x = class {}", "a.return", "a.if", "(a)", "a[0]"] {
        let source = format!("{prefix}\n/eval(1)/g");
        let program = parse_program(&source).unwrap();
        assert_eq!(program.body.len(), 1, "{source:?}");
        let Statement::Expression(statement) = &program.body[0] else {
            panic!("{source:?}: expected expression statement");
        };
        let divided = match &statement.expression {
            Expression::Binary(binary) => binary.operator == BinaryOperator::Div,
            Expression::Assignment(assignment) => matches!(
                &assignment.value,
                Expression::Binary(b) if b.operator == BinaryOperator::Div
            ),
            _ => false,
        };
        assert!(divided, "{source:?} should divide");
    }
}

#[test]
fn slash_after_statement_closing_brace_starts_regex() {
    for prefix in ["{}", "if (a) {}", "function f() {}", ";"] {
        let source = format!("{prefix}\n/eval(1)/g");
        let program = parse_program(&source).unwrap();
        let last = program.body.last().unwrap();
        assert!(
            matches!(last, Statement::Expression(s) if matches!(s.expression, Expression::Literal(Literal::RegExp(_)))),
            "{source:?} should end in a regular expression"
        );
    }
}

#[test]
fn deep_inputs_rejected_without_overflow() {
    let sum = vec!["1"; 50_000].join("+");
    assert_eq!(parse_single_expression(&sum).unwrap_err().expected, Expected::ShallowerNesting);

    let chain = format!("a{}", ".b".repeat(50_000));
    assert_eq!(parse_program(&chain).unwrap_err().expected, Expected::ShallowerNesting);

    let blocks = format!("{}{}", "{".repeat(50_000), "}".repeat(50_000));
    assert_eq!(parse_program(&blocks).unwrap_err().expected, Expected::ShallowerNesting);

    assert!(parse_single_expression(&vec!["1"; 100].join(" + ")).is_ok());
}

#[test]
fn let_as_identifier() {
    let program = parse_program("let = 1; let\nx = 2").unwrap();
    assert!(matches!(program.body[0], Statement::Expression(_)));
    assert!(matches!(program.body[1], Statement::Variable(_)));
}

#[test]
fn ast_serializes_to_json() {
    let expression = parse_single_expression("a.b(1)").unwrap();
    let json = serde_json::to_value(&expression).unwrap();
    assert!(json.get("Call").is_some());
}
