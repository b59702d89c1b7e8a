//! Parser wrapper
//!
//! One check moves through typed states:
//!
//! ```text
//! ScriptParser ──parse()──► ParsedScript ──validate()──► ValidatedScript ──accept()──► ParseUnit
//!      │                         │                            │
//!      └──────── Err(SanitizerError): rejected, first error only ┘
//! ```
//!
//! Every failure is a context-decorated [`SanitizerError`]; callers never
//! see the parser's own error type.

use clap::ValueEnum;
use scriptguard_core::{ErrorContext, SanitizerError, SanitizerOptions, SanitizerResult};
use scriptguard_syntax::parser::ast::{Expression, Program, Statement};
use scriptguard_syntax::{parse_program, parse_single_expression, walk_expression, walk_program, walk_statement, Span};
use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// GOALS AND UNITS
// ============================================================================

/// Start production a source is parsed with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum ParseGoal {
    /// Any number of statements.
    Program,
    /// Exactly one statement.
    Statement,
    /// Exactly one expression and nothing after it.
    SingleExpression,
}

impl ParseGoal {
    pub fn as_str(self) -> &'static str {
        match self {
            ParseGoal::Program => "program",
            ParseGoal::Statement => "statement",
            ParseGoal::SingleExpression => "single-expression",
        }
    }
}

impl fmt::Display for ParseGoal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A certified (or in-progress) syntax tree.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "goal", content = "tree", rename_all = "snake_case")]
pub enum ParseUnit {
    Program(Program),
    Statement(Statement),
    Expression(Expression),
}

impl ParseUnit {
    pub fn span(&self) -> Span {
        match self {
            ParseUnit::Program(program) => program.span,
            ParseUnit::Statement(statement) => statement.span(),
            ParseUnit::Expression(expression) => expression.span(),
        }
    }

    pub fn as_program(&self) -> Option<&Program> {
        match self {
            ParseUnit::Program(program) => Some(program),
            _ => None,
        }
    }

    pub fn as_statement(&self) -> Option<&Statement> {
        match self {
            ParseUnit::Statement(statement) => Some(statement),
            _ => None,
        }
    }

    pub fn as_expression(&self) -> Option<&Expression> {
        match self {
            ParseUnit::Expression(expression) => Some(expression),
            _ => None,
        }
    }
}

// ============================================================================
// STATES
// ============================================================================

/// A check that has not run yet.
#[derive(Debug, Clone, Copy)]
pub struct ScriptParser<'a> {
    options: &'a SanitizerOptions,
    source: Option<&'a str>,
    goal: ParseGoal,
}

/// Source parsed with its goal's start production.
#[derive(Debug, Clone)]
pub struct ParsedScript<'a> {
    options: &'a SanitizerOptions,
    source: &'a str,
    goal: ParseGoal,
    unit: ParseUnit,
}

/// Parse tree whose shape matches the goal.
#[derive(Debug, Clone)]
pub struct ValidatedScript<'a> {
    options: &'a SanitizerOptions,
    source: &'a str,
    goal: ParseGoal,
    unit: ParseUnit,
}

impl<'a> ScriptParser<'a> {
    pub fn new(options: &'a SanitizerOptions, source: impl Into<Option<&'a str>>, goal: ParseGoal) -> Self {
        Self {
            options,
            source: source.into(),
            goal,
        }
    }

    /// Run the parser. Missing or blank source is `EmptyCodeString`; a
    /// malformed token is `InvalidToken` positioned on that token.
    pub fn parse(self) -> SanitizerResult<ParsedScript<'a>> {
        let source = match self.source {
            Some(source) if !source.trim().is_empty() => source,
            _ => return Err(SanitizerError::empty_code_string()),
        };

        tracing::trace!(goal = %self.goal, length = source.len(), "parsing script");
        let parsed = match self.goal {
            ParseGoal::Program | ParseGoal::Statement => parse_program(source).map(ParseUnit::Program),
            ParseGoal::SingleExpression => parse_single_expression(source).map(ParseUnit::Expression),
        };
        let unit = parsed.map_err(|error| SanitizerError::from_parse_error(source, &error))?;

        Ok(ParsedScript {
            options: self.options,
            source,
            goal: self.goal,
            unit,
        })
    }

    /// Parse, validate and accept, logging the outcome.
    pub fn run(self) -> SanitizerResult<ParseUnit> {
        let goal = self.goal;
        let length = self.source.map_or(0, str::len);
        let outcome = self.parse().and_then(ParsedScript::validate).and_then(ValidatedScript::accept);
        log_outcome(goal, length, &outcome);
        outcome
    }
}

impl<'a> ParsedScript<'a> {
    pub fn source(&self) -> &'a str {
        self.source
    }

    pub fn goal(&self) -> ParseGoal {
        self.goal
    }

    pub fn unit(&self) -> &ParseUnit {
        &self.unit
    }

    /// Check the tree has the shape the goal promises: one statement for
    /// `Statement`, one expression (not a comma sequence) for
    /// `SingleExpression`.
    pub fn validate(self) -> SanitizerResult<ValidatedScript<'a>> {
        let unit = match (self.goal, self.unit) {
            (ParseGoal::Statement, ParseUnit::Program(mut program)) => {
                if program.body.len() != 1 {
                    let span = extra_span(program.body.iter().map(Statement::span), 1).unwrap_or(program.span);
                    return Err(SanitizerError::syntax_count_mismatch(1, program.body.len())
                        .with_context(ErrorContext::from_span(self.source, span)));
                }
                ParseUnit::Statement(program.body.remove(0))
            }
            (ParseGoal::SingleExpression, ParseUnit::Expression(Expression::Sequence(sequence))) => {
                let count = sequence.expressions.len();
                let span = extra_span(sequence.expressions.iter().map(Expression::span), 1)
                    .unwrap_or(sequence.span);
                return Err(SanitizerError::argument_count_mismatch(1, count)
                    .with_context(ErrorContext::from_span(self.source, span)));
            }
            (_, unit) => unit,
        };

        Ok(ValidatedScript {
            options: self.options,
            source: self.source,
            goal: self.goal,
            unit,
        })
    }
}

impl<'a> ValidatedScript<'a> {
    pub fn options(&self) -> &'a SanitizerOptions {
        self.options
    }

    pub fn source(&self) -> &'a str {
        self.source
    }

    pub fn goal(&self) -> ParseGoal {
        self.goal
    }

    pub fn unit(&self) -> &ParseUnit {
        &self.unit
    }

    /// Context over `span` of this script's source.
    pub fn context(&self, span: Span) -> ErrorContext {
        ErrorContext::from_span(self.source, span)
    }

    /// Walk the tree with the policy's listener. The first violation
    /// rejects the script.
    pub fn accept(self) -> SanitizerResult<ParseUnit> {
        let mut listener = self.options.listener().instantiate(self.options)?;
        let walked = match &self.unit {
            ParseUnit::Program(program) => walk_program(listener.as_mut(), program),
            ParseUnit::Statement(statement) => walk_statement(listener.as_mut(), statement),
            ParseUnit::Expression(expression) => walk_expression(listener.as_mut(), expression),
        };
        walked.map_err(|violation| violation.into_error(self.source))?;
        Ok(self.unit)
    }
}

/// Span from the `skip`-th item through the last one.
pub(crate) fn extra_span(spans: impl Iterator<Item = Span>, skip: usize) -> Option<Span> {
    let mut extra = spans.skip(skip);
    let first = extra.next()?;
    Some(extra.last().map_or(first, |last| first.to(last)))
}

pub(crate) fn log_outcome(goal: ParseGoal, length: usize, outcome: &SanitizerResult<ParseUnit>) {
    match outcome {
        Ok(_) => tracing::debug!(%goal, length, "script accepted"),
        Err(error) => tracing::info!(
            %goal,
            length,
            code = error.code(),
            kind = %error.kind(),
            "script rejected: {}",
            error
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scriptguard_core::ErrorKind;

    fn run(goal: ParseGoal, source: &str) -> SanitizerResult<ParseUnit> {
        let options = SanitizerOptions::default_options();
        ScriptParser::new(&options, source, goal).run()
    }

    #[test]
    fn test_empty_sources() {
        let options = SanitizerOptions::default_options();
        for source in [Some(""), Some("   "), Some("\n\t"), None] {
            let error = ScriptParser::new(&options, source, ParseGoal::Program).parse().unwrap_err();
            assert_eq!(error.kind(), ErrorKind::EmptyCodeString);
            assert!(error.context().is_none());
        }
    }

    #[test]
    fn test_states_expose_the_tree() {
        let options = SanitizerOptions::default_options();
        let parsed = ScriptParser::new(&options, "a; b;", ParseGoal::Program).parse().unwrap();
        assert_eq!(parsed.goal(), ParseGoal::Program);
        assert_eq!(parsed.unit().as_program().map(|p| p.body.len()), Some(2));
        let validated = parsed.validate().unwrap();
        assert_eq!(validated.source(), "a; b;");
        let unit = validated.accept().unwrap();
        assert!(unit.as_program().is_some());
    }

    #[test]
    fn test_statement_goal_requires_one_statement() {
        let unit = run(ParseGoal::Statement, "const a = 1;").unwrap();
        assert!(unit.as_statement().is_some());

        let error = run(ParseGoal::Statement, "a; b; c;").unwrap_err();
        assert_eq!(error.kind(), ErrorKind::SyntaxCountMismatch);
        assert_eq!(error.to_string(), "Syntax count mismatch. Expecting 1, but got 3.");
        assert_eq!(error.context().unwrap().source_code, "b; c;");

        let error = run(ParseGoal::Statement, "// nothing").unwrap_err();
        assert_eq!(error.kind(), ErrorKind::SyntaxCountMismatch);
        assert_eq!(error.context().unwrap().source_code, "// nothing");
    }

    #[test]
    fn test_comma_sequence_is_argument_count_mismatch() {
        let error = run(ParseGoal::SingleExpression, "a, b, c").unwrap_err();
        assert_eq!(error.kind(), ErrorKind::ArgumentCountMismatch);
        assert_eq!(error.to_string(), "Argument count mismatch. Expecting 1, but got 3.");
        let context = error.context().unwrap();
        assert_eq!(context.source_code, "b, c");
        assert_eq!(context.positions, (3, 7));

        assert!(run(ParseGoal::SingleExpression, "(a, b)").is_ok());
    }

    #[test]
    fn test_violation_gets_context() {
        let error = run(ParseGoal::SingleExpression, "1 + eval").unwrap_err();
        assert_eq!(error.kind(), ErrorKind::IdentifierNotAllowed);
        assert_eq!(
            error.context().unwrap().to_string(),
            "Source Code: eval\nLine Number: 1, 1\nColumn: 4, 8\nPosition: 4, 8"
        );
    }

    #[test]
    fn test_parse_unit_serializes_with_goal_tag() {
        let unit = run(ParseGoal::SingleExpression, "1 + 1").unwrap();
        let json = serde_json::to_value(&unit).unwrap();
        assert_eq!(json["goal"], "expression");
        assert!(json["tree"].get("Binary").is_some());
    }
}
