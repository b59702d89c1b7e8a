//! SCRIPTGUARD Test Utilities
//!
//! Shared test infrastructure for the SCRIPTGUARD workspace:
//! - Proptest generators for identifiers, policies and scripts
//! - Fixtures with scripts of known verdict
//! - Assertions on verdicts, error kinds and error contexts

pub use scriptguard_checker::{Checker, ParseGoal, ParseUnit, ScriptParser};
pub use scriptguard_core::{
    ErrorContext, ErrorKind, IdentifierSet, KeywordFlags, PolicyKeyword, SanitizerError,
    SanitizerOptions, SanitizerOptionsBuilder, SanitizerResult,
};

// ============================================================================
// PROPTEST GENERATORS
// ============================================================================

pub mod generators {
    //! Proptest strategies for policies and scripts.

    use super::*;
    use proptest::prelude::*;

    /// A plausible JavaScript identifier, biased towards names the default
    /// policy has an opinion about.
    pub fn arb_identifier() -> impl Strategy<Value = String> {
        prop_oneof![
            3 => "[a-z][a-zA-Z0-9_]{0,8}",
            1 => "[A-Z][a-zA-Z0-9]{0,8}",
            1 => "[$_][a-z0-9]{0,4}",
            1 => prop::sample::select(vec!["eval", "Math", "JSON", "main", "constructor", "require"])
                .prop_map(str::to_string),
        ]
    }

    pub fn arb_keyword() -> impl Strategy<Value = PolicyKeyword> {
        prop::sample::select(PolicyKeyword::ALL.to_vec())
    }

    pub fn arb_keyword_flags() -> impl Strategy<Value = KeywordFlags> {
        any::<u8>().prop_map(KeywordFlags::from_bits_truncate)
    }

    /// A policy derived from the defaults with random additions.
    pub fn arb_options() -> impl Strategy<Value = SanitizerOptions> {
        (
            prop::collection::vec(arb_identifier(), 0..4),
            prop::collection::vec(arb_identifier(), 0..4),
            prop::collection::vec(arb_identifier(), 0..4),
            arb_keyword_flags(),
        )
            .prop_map(|(built_ins, disallowed, mutable, keywords)| {
                SanitizerOptionsBuilder::new("generated")
                    .add_built_in_objects(built_ins)
                    .add_disallowed_identifiers(disallowed)
                    .add_reserved_mutable_identifiers(mutable)
                    .keywords(keywords)
                    .build()
            })
    }

    /// A small expression over random names. Generated names may collide
    /// with reserved words, so not every sample parses.
    pub fn arb_expression() -> impl Strategy<Value = String> {
        let leaf = prop_oneof![
            arb_identifier(),
            (0u32..1000).prop_map(|n| n.to_string()),
            "[a-z ]{0,6}".prop_map(|s| format!("'{s}'")),
        ];
        leaf.prop_recursive(3, 16, 3, |inner| {
            prop_oneof![
                (inner.clone(), inner.clone()).prop_map(|(a, b)| format!("{a} + {b}")),
                (inner.clone(), arb_identifier()).prop_map(|(a, b)| format!("({a}).{b}")),
                (arb_identifier(), prop::collection::vec(inner.clone(), 0..3))
                    .prop_map(|(f, args)| format!("{f}({})", args.join(", "))),
                inner.clone().prop_map(|a| format!("[{a}]")),
                (arb_identifier(), inner).prop_map(|(p, body)| format!("({p}) => {body}")),
            ]
        })
    }

    /// A line ending in a complete expression, after which `/` divides
    /// rather than starting a regular expression.
    pub fn arb_expression_line() -> impl Strategy<Value = String> {
        prop_oneof![
            prop::sample::select(vec![
                "x = {}",
                "x = function () {}",
                "x = class {}",
                "(a)",
                "a[0]",
                "a++",
                "a`t`",
            ])
            .prop_map(str::to_string),
            prop::sample::select(vec!["return", "if", "typeof", "in", "new", "this", "await", "yield"])
                .prop_map(|word| format!("a.{word}")),
        ]
    }

    /// A call to a name the default policy disallows.
    pub fn arb_disallowed_call() -> impl Strategy<Value = (String, String)> {
        prop::sample::select(vec!["eval", "setTimeout", "Function", "setInterval"])
            .prop_map(|name| (name.to_string(), format!("{name}(1)")))
    }

    /// A short program mixing accepted and rejected statements.
    pub fn arb_program() -> impl Strategy<Value = String> {
        let statement = prop_oneof![
            arb_expression().prop_map(|e| format!("{e};")),
            (arb_identifier(), arb_expression()).prop_map(|(n, e)| format!("const {n} = {e};")),
            (arb_identifier(), arb_expression()).prop_map(|(n, e)| format!("let {n} = {e};")),
            Just("function main() { return 1; }".to_string()),
            Just("if (a) { b(); } else { c(); }".to_string()),
            Just("for (const x of xs) { total += x; }".to_string()),
            Just("debugger;".to_string()),
            Just("var legacy = 1;".to_string()),
        ];
        prop::collection::vec(statement, 0..6).prop_map(|parts| parts.join("\n"))
    }
}

// ============================================================================
// TEST FIXTURES
// ============================================================================

pub mod fixtures {
    //! Scripts with a known verdict under the default policy.

    use super::*;

    /// Single expressions the default policy accepts.
    pub const SAFE_EXPRESSIONS: &[&str] = &[
        "1 + 1",
        "Math.max(a, b) * 2",
        "JSON.stringify({ total: a + b })",
        "() => {}",
        "(x) => x.map((y) => y * 2)",
        "`total: ${a}`",
        "a ? b : c",
        "[1, 2, 3].filter((n) => n > 1)",
    ];

    /// Single expressions the default policy rejects, with the error kind.
    pub const UNSAFE_EXPRESSIONS: &[(&str, ErrorKind)] = &[
        ("eval('1')", ErrorKind::IdentifierNotAllowed),
        ("x.constructor", ErrorKind::IdentifierNotAllowed),
        ("x['__proto__']", ErrorKind::IdentifierNotAllowed),
        ("Math.max = 1", ErrorKind::IdentifierNotAllowed),
        ("setTimeout(f, 10)", ErrorKind::IdentifierNotAllowed),
        ("async () => 1", ErrorKind::KeywordNotAllowed),
        ("import('fs')", ErrorKind::KeywordNotAllowed),
        ("a, b", ErrorKind::ArgumentCountMismatch),
        ("1 +", ErrorKind::InvalidToken),
    ];

    /// Sources that count as no code at all.
    pub const EMPTY_SOURCES: &[&str] = &["", " ", "\n\t  \r\n"];

    /// Default tables with every keyword enabled.
    pub fn permissive_options() -> SanitizerOptions {
        SanitizerOptionsBuilder::new("permissive")
            .keywords(KeywordFlags::all())
            .build()
    }

    /// Default tables with a matcher that accepts nothing outside the sets.
    pub fn strict_options() -> SanitizerOptions {
        SanitizerOptionsBuilder::new("strict")
            .reserved_identifier_matcher(|_| false)
            .build()
    }
}

// ============================================================================
// CUSTOM ASSERTIONS
// ============================================================================

pub mod assertions {
    //! Verdict assertions.

    use super::*;

    /// Assert a check accepted its script.
    #[track_caller]
    pub fn assert_accepted<T: std::fmt::Debug>(result: &SanitizerResult<T>) {
        assert!(result.is_ok(), "Expected script to be accepted, got: {:?}", result);
    }

    /// Assert a check rejected its script with `kind`; returns the error.
    #[track_caller]
    pub fn assert_rejected<T: std::fmt::Debug>(result: SanitizerResult<T>, kind: ErrorKind) -> SanitizerError {
        match result {
            Err(error) => {
                assert_eq!(error.kind(), kind, "Wrong error kind: {}", error);
                error
            }
            Ok(value) => panic!("Expected {} rejection, got: {:?}", kind.name(), value),
        }
    }

    /// Assert an error carries a context over exactly `source_code`.
    #[track_caller]
    pub fn assert_context(error: &SanitizerError, source_code: &str) -> ErrorContext {
        match error.context() {
            Some(context) => {
                assert_eq!(context.source_code, source_code, "Wrong context for {}", error);
                context.clone()
            }
            None => panic!("Expected context {:?}, got none on {}", source_code, error),
        }
    }

    /// Assert a checker produces the same verdict twice for `source`.
    #[track_caller]
    pub fn assert_deterministic<C: Checker>(checker: &C, source: &str) {
        let first = checker.validate_source(Some(source));
        let second = checker.validate_source(Some(source));
        assert_eq!(first, second, "Verdict changed between runs for {:?}", source);
    }
}

// ============================================================================
// TESTS
// ============================================================================
