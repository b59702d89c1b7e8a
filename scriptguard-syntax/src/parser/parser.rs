//! Parser entry points
//!
//! Source text goes through the oxc parser and is then lowered into the
//! owned tree in [`super::ast`]. Every source is read twice, once as a
//! classic script and once as a module: a source only one reading accepts
//! takes that reading, and a source both accept must mean the same thing
//! under both.

use super::ast::*;
use super::lower::Lowering;
use super::nesting::check_nesting_depth;
use crate::span::{LineIndex, Span};
use oxc_allocator::Allocator;
use oxc_ast::ast as js;
use oxc_diagnostics::OxcDiagnostic;
use oxc_parser::Parser;
use oxc_span::{GetSpan, SourceType};
use serde::Serialize;
use std::fmt;
use thiserror::Error;

// ============================================================================
// PARSE ERROR
// ============================================================================

/// Maximum nesting of statements, expressions and patterns a source may
/// have.
pub const MAX_NESTING_DEPTH: usize = 256;

/// What the parser was looking for when it failed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Expected {
    /// One specific token, e.g. `(`.
    Token(String),
    /// End of input.
    Eof,
    /// Nesting exceeded [`MAX_NESTING_DEPTH`].
    ShallowerNesting,
    /// Syntax outside plain JavaScript, such as decorators or TypeScript.
    PlainJavaScript(&'static str),
    /// Source that reads differently as a script and as a module.
    SameReading,
    /// The parser's own description of the problem.
    Diagnostic(String),
}

impl fmt::Display for Expected {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expected::Token(token) => write!(f, "'{}'", token),
            Expected::Eof => f.write_str("<EOF>"),
            Expected::ShallowerNesting => {
                write!(f, "nesting depth at most {}", MAX_NESTING_DEPTH)
            }
            Expected::PlainJavaScript(without) => write!(f, "JavaScript without {}", without),
            Expected::SameReading => f.write_str("code that reads the same as a script and as a module"),
            Expected::Diagnostic(message) => write!(f, "valid syntax: {}", message),
        }
    }
}

impl Expected {
    /// Classify an oxc diagnostic message.
    fn from_message(message: &str) -> Self {
        if let Some((token, _)) = message
            .strip_prefix("Expected `")
            .and_then(|rest| rest.split_once('`'))
        {
            return Expected::Token(token.to_string());
        }
        if message.starts_with("Expected a semicolon") {
            return Expected::Token(";".to_string());
        }
        Expected::Diagnostic(message.to_string())
    }
}

/// A syntax error: the offending token and what was expected in its place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Error)]
#[error("Token {found} is invalid. Expecting {expected}.")]
pub struct ParseError {
    pub expected: Expected,
    /// Source text of the offending token, `<EOF>` at end of input.
    pub found: String,
    pub span: Span,
}

impl ParseError {
    /// Error on the token at `offset`.
    pub(crate) fn at(lines: &LineIndex<'_>, offset: usize, expected: Expected) -> Self {
        Self::on(lines, lines.token_span(offset), expected)
    }

    fn on(lines: &LineIndex<'_>, span: Span, expected: Expected) -> Self {
        let found = if span.is_empty() {
            "<EOF>".to_string()
        } else {
            lines.text(span).to_string()
        };
        Self { expected, found, span }
    }

    fn from_diagnostic(lines: &LineIndex<'_>, diagnostic: &OxcDiagnostic) -> Self {
        let expected = Expected::from_message(&diagnostic.to_string());
        let label = diagnostic.labels.as_ref().and_then(|labels| labels.first());
        let Some(label) = label else {
            return Self::at(lines, lines.len(), expected);
        };
        let labelled = lines.span(label.offset(), label.offset() + label.len());
        // Labels over a whole construct are narrowed to its first token.
        if labelled.is_empty() || lines.text(labelled).contains(char::is_whitespace) {
            Self::at(lines, label.offset(), expected)
        } else {
            Self::on(lines, labelled, expected)
        }
    }

    /// The earliest of the parser's errors.
    fn first(lines: &LineIndex<'_>, diagnostics: &[OxcDiagnostic]) -> Option<Self> {
        diagnostics
            .iter()
            .map(|diagnostic| Self::from_diagnostic(lines, diagnostic))
            .min_by_key(|error| error.span.start)
    }
}

// ============================================================================
// READINGS
// ============================================================================

fn script() -> SourceType {
    SourceType::mjs().with_module(false)
}

fn module() -> SourceType {
    SourceType::mjs()
}

/// Run `read` under both source types and reconcile the results.
///
/// `disagreement` names the span where two successful readings first
/// differ.
fn read_both_ways<T: PartialEq>(
    lines: &LineIndex<'_>,
    read: impl Fn(SourceType) -> Result<T, ParseError>,
    disagreement: impl Fn(&T, &T) -> Span,
) -> Result<T, ParseError> {
    match (read(script()), read(module())) {
        (Ok(script), Ok(module)) if script == module => Ok(script),
        (Ok(script), Ok(module)) => {
            let span = disagreement(&script, &module);
            Err(ParseError::at(lines, span.start, Expected::SameReading))
        }
        (Ok(tree), Err(_)) | (Err(_), Ok(tree)) => Ok(tree),
        // Report the reading that got further.
        (Err(script), Err(module)) if module.span.start > script.span.start => Err(module),
        (Err(script), Err(_)) => Err(script),
    }
}

fn check_nesting(lines: &LineIndex<'_>) -> Result<(), ParseError> {
    check_nesting_depth(lines.source())
        .map_err(|offset| ParseError::at(lines, offset, Expected::ShallowerNesting))
}

// ============================================================================
// ENTRY POINTS
// ============================================================================

/// Parse a whole script or module.
pub fn parse_program(source: &str) -> Result<Program, ParseError> {
    let lines = LineIndex::new(source);
    check_nesting(&lines)?;

    read_both_ways(
        &lines,
        |source_type| {
            let allocator = Allocator::default();
            let parsed = Parser::new(&allocator, source, source_type).parse();
            if let Some(error) = ParseError::first(&lines, &parsed.errors) {
                return Err(error);
            }
            if parsed.panicked {
                return Err(ParseError::at(&lines, 0, Expected::Diagnostic("a complete program".into())));
            }
            Lowering::new(&lines).program(&parsed.program)
        },
        |script, module| {
            script
                .body
                .iter()
                .zip(&module.body)
                .find(|(left, right)| left != right)
                .map_or(script.span, |(left, _)| left.span())
        },
    )
}

/// Parse a single expression that must span the whole source.
///
/// Comma sequences are accepted and returned as [`Expression::Sequence`].
/// A leading `function` (or `async function`) must be anonymous.
pub fn parse_single_expression(source: &str) -> Result<Expression, ParseError> {
    let lines = LineIndex::new(source);
    check_nesting(&lines)?;

    read_both_ways(
        &lines,
        |source_type| {
            let allocator = Allocator::default();
            let expression = Parser::new(&allocator, source, source_type)
                .parse_expression()
                .map_err(|errors| {
                    ParseError::first(&lines, &errors)
                        .unwrap_or_else(|| ParseError::at(&lines, 0, Expected::Diagnostic("an expression".into())))
                })?;

            let end = lines.skip_trivia(expression.span().end as usize);
            if end < lines.len() {
                return Err(ParseError::at(&lines, end, Expected::Eof));
            }
            if let js::Expression::FunctionExpression(function) = &expression {
                if let Some(id) = &function.id {
                    return Err(ParseError::at(&lines, id.span.start as usize, Expected::Token("(".into())));
                }
            }
            Lowering::new(&lines).expression(&expression)
        },
        |script, _| script.span(),
    )
}
