//! Goal-specific checkers
//!
//! A [`Checker`] pairs a policy with a parse goal and the structural rules
//! that come with it. All checkers run the same pipeline:
//! parse, validate, [`Checker::inspect`], listener walk, [`Checker::finish`].

use crate::parser::{extra_span, log_outcome, ParseGoal, ParseUnit, ScriptParser, ValidatedScript};
use scriptguard_core::listener::checks::declared_function;
use scriptguard_core::{SanitizerError, SanitizerOptions, SanitizerResult};
use scriptguard_syntax::parser::ast::{Expression, Pattern};
use scriptguard_syntax::Span;
use std::sync::Arc;

/// Expected-token set reported when an anonymous function is missing.
const FUNCTION_START: &str = "{'function', 'async', '('}";

pub trait Checker {
    fn options(&self) -> &SanitizerOptions;

    fn goal(&self) -> ParseGoal;

    /// Structural rules checked before the listener walks the tree.
    fn inspect(&self, _script: &ValidatedScript<'_>) -> SanitizerResult<()> {
        Ok(())
    }

    /// Rules that need the whole tree to have passed the listener.
    fn finish(&self, _unit: &ParseUnit) -> SanitizerResult<()> {
        Ok(())
    }

    /// Check `source` and return the certified tree.
    fn validate_source(&self, source: Option<&str>) -> SanitizerResult<ParseUnit> {
        let goal = self.goal();
        let outcome = ScriptParser::new(self.options(), source, goal)
            .parse()
            .and_then(|parsed| parsed.validate())
            .and_then(|validated| {
                self.inspect(&validated)?;
                validated.accept()
            })
            .and_then(|unit| {
                self.finish(&unit)?;
                Ok(unit)
            });
        log_outcome(goal, source.map_or(0, str::len), &outcome);
        outcome
    }

    fn validate<'s>(&self, source: impl Into<Option<&'s str>>) -> SanitizerResult<ParseUnit>
    where
        Self: Sized,
    {
        self.validate_source(source.into())
    }

    fn check<'s>(&self, source: impl Into<Option<&'s str>>) -> SanitizerResult<bool>
    where
        Self: Sized,
    {
        self.validate_source(source.into()).map(|_| true)
    }
}

// ============================================================================
// SINGLE EXPRESSION / STATEMENT
// ============================================================================

/// Exactly one expression, e.g. a formula or a callback.
#[derive(Debug, Clone)]
pub struct SingleExpressionChecker {
    options: Arc<SanitizerOptions>,
}

impl SingleExpressionChecker {
    pub fn new() -> Self {
        Self::with_options(SanitizerOptions::default_options())
    }

    pub fn with_options(options: Arc<SanitizerOptions>) -> Self {
        Self { options }
    }
}

impl Default for SingleExpressionChecker {
    fn default() -> Self {
        Self::new()
    }
}

impl Checker for SingleExpressionChecker {
    fn options(&self) -> &SanitizerOptions {
        &self.options
    }

    fn goal(&self) -> ParseGoal {
        ParseGoal::SingleExpression
    }
}

/// Exactly one statement.
#[derive(Debug, Clone)]
pub struct StatementChecker {
    options: Arc<SanitizerOptions>,
}

impl StatementChecker {
    pub fn new() -> Self {
        Self::with_options(SanitizerOptions::default_options())
    }

    pub fn with_options(options: Arc<SanitizerOptions>) -> Self {
        Self { options }
    }
}

impl Default for StatementChecker {
    fn default() -> Self {
        Self::new()
    }
}

impl Checker for StatementChecker {
    fn options(&self) -> &SanitizerOptions {
        &self.options
    }

    fn goal(&self) -> ParseGoal {
        ParseGoal::Statement
    }
}

// ============================================================================
// STATEMENT LIST
// ============================================================================

/// A program whose statement count lies within optional bounds.
#[derive(Debug, Clone)]
pub struct StatementListChecker {
    options: Arc<SanitizerOptions>,
    min_count: Option<usize>,
    max_count: Option<usize>,
}

impl StatementListChecker {
    pub fn new() -> Self {
        Self::with_options(SanitizerOptions::default_options())
    }

    pub fn with_options(options: Arc<SanitizerOptions>) -> Self {
        Self {
            options,
            min_count: None,
            max_count: None,
        }
    }

    pub fn min_count(mut self, min_count: usize) -> Self {
        self.min_count = Some(min_count);
        self
    }

    pub fn max_count(mut self, max_count: usize) -> Self {
        self.max_count = Some(max_count);
        self
    }
}

impl Default for StatementListChecker {
    fn default() -> Self {
        Self::new()
    }
}

impl Checker for StatementListChecker {
    fn options(&self) -> &SanitizerOptions {
        &self.options
    }

    fn goal(&self) -> ParseGoal {
        ParseGoal::Program
    }

    fn inspect(&self, script: &ValidatedScript<'_>) -> SanitizerResult<()> {
        let Some(program) = script.unit().as_program() else {
            return Ok(());
        };
        let count = program.body.len();

        if let Some(min_count) = self.min_count.filter(|min| count < *min) {
            return Err(SanitizerError::syntax_count_too_small(min_count, count)
                .with_context(script.context(program.span)));
        }
        if let Some(max_count) = self.max_count.filter(|max| count > *max) {
            let span = extra_span(program.body.iter().map(|s| s.span()), max_count).unwrap_or(program.span);
            return Err(SanitizerError::syntax_count_too_large(max_count, count)
                .with_context(script.context(span)));
        }
        Ok(())
    }
}

// ============================================================================
// ANONYMOUS FUNCTION
// ============================================================================

/// A single anonymous function or arrow, optionally with a fixed number of
/// parameters.
#[derive(Debug, Clone)]
pub struct AnonymousFunctionChecker {
    options: Arc<SanitizerOptions>,
    parameter_count: Option<usize>,
}

impl AnonymousFunctionChecker {
    pub fn new() -> Self {
        Self::with_options(SanitizerOptions::default_options())
    }

    pub fn with_options(options: Arc<SanitizerOptions>) -> Self {
        Self {
            options,
            parameter_count: None,
        }
    }

    pub fn parameter_count(mut self, parameter_count: usize) -> Self {
        self.parameter_count = Some(parameter_count);
        self
    }
}

impl Default for AnonymousFunctionChecker {
    fn default() -> Self {
        Self::new()
    }
}

impl Checker for AnonymousFunctionChecker {
    fn options(&self) -> &SanitizerOptions {
        &self.options
    }

    fn goal(&self) -> ParseGoal {
        ParseGoal::SingleExpression
    }

    fn inspect(&self, script: &ValidatedScript<'_>) -> SanitizerResult<()> {
        let Some(expression) = script.unit().as_expression() else {
            return Ok(());
        };

        let (params, span): (&[Pattern], Span) = match expression.unparenthesized() {
            Expression::Function(function) => {
                if let Some(id) = &function.id {
                    return Err(SanitizerError::token_mismatch("'('", id.name.as_str())
                        .with_context(script.context(id.span)));
                }
                (function.params.as_slice(), function.span)
            }
            Expression::Arrow(arrow) => (arrow.params.as_slice(), arrow.span),
            other => {
                let span = other.leading_span();
                let found = script.source().get(span.start..span.end).unwrap_or_default();
                return Err(SanitizerError::token_mismatch(FUNCTION_START, found)
                    .with_context(script.context(span)));
            }
        };

        match self.parameter_count {
            Some(expected) if expected != params.len() => {
                let span = extra_span(params.iter().map(Pattern::span), 0).unwrap_or(span);
                Err(SanitizerError::argument_count_mismatch(expected, params.len())
                    .with_context(script.context(span)))
            }
            _ => Ok(()),
        }
    }
}

// ============================================================================
// MODULE FUNCTIONS
// ============================================================================

/// A program that declares every reserved function name as a top-level
/// function, e.g. a script exposing `main`.
#[derive(Debug, Clone)]
pub struct ModuleFunctionChecker {
    options: Arc<SanitizerOptions>,
}

impl ModuleFunctionChecker {
    pub fn new() -> Self {
        Self::with_options(SanitizerOptions::default_options())
    }

    pub fn with_options(options: Arc<SanitizerOptions>) -> Self {
        Self { options }
    }
}

impl Default for ModuleFunctionChecker {
    fn default() -> Self {
        Self::new()
    }
}

impl Checker for ModuleFunctionChecker {
    fn options(&self) -> &SanitizerOptions {
        &self.options
    }

    fn goal(&self) -> ParseGoal {
        ParseGoal::Program
    }

    fn finish(&self, unit: &ParseUnit) -> SanitizerResult<()> {
        let Some(program) = unit.as_program() else {
            return Ok(());
        };
        let declared: Vec<&str> = program
            .body
            .iter()
            .filter_map(declared_function)
            .filter_map(|function| function.id.as_ref())
            .map(|id| id.name.as_str())
            .collect();

        match self
            .options
            .reserved_function_identifiers()
            .iter()
            .find(|name| !declared.contains(&name.as_str()))
        {
            Some(missing) => Err(SanitizerError::function_not_found(missing.as_str())),
            None => Ok(()),
        }
    }
}

// ============================================================================
// FREE FUNCTIONS
// ============================================================================

/// Whether `source` is one expression allowed by `options`.
pub fn check<'s>(options: &SanitizerOptions, source: impl Into<Option<&'s str>>) -> SanitizerResult<bool> {
    validate(options, source).map(|_| true)
}

/// Certify `source` as one expression allowed by `options`.
pub fn validate<'s>(
    options: &SanitizerOptions,
    source: impl Into<Option<&'s str>>,
) -> SanitizerResult<ParseUnit> {
    let source: Option<&str> = source.into();
    ScriptParser::new(options, source, ParseGoal::SingleExpression).run()
}
