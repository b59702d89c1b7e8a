//! Error types for SCRIPTGUARD checks
//!
//! Every rejection is a [`SanitizerError`]: one [`ErrorKind`], the named
//! parameters its message is rendered from, an optional [`ErrorContext`]
//! pointing into the checked source and an optional underlying cause.

use scriptguard_syntax::{ParseError, Span};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::error::Error as StdError;
use std::fmt;
use std::sync::Arc;

/// Named message parameters, ordered by name.
pub type Parameters = BTreeMap<String, Value>;

/// Boxed cause carried by a [`SanitizerError`].
pub type Cause = Arc<dyn StdError + Send + Sync + 'static>;

/// Result type alias for SCRIPTGUARD checks.
pub type SanitizerResult<T> = Result<T, SanitizerError>;

// ============================================================================
// ERROR KINDS
// ============================================================================

/// Closed set of rejection kinds, each with a stable numeric code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    ArgumentCountMismatch,
    EmptyCodeString,
    FunctionNotFound,
    IdentifierNotAllowed,
    KeywordNotAllowed,
    ListenerNotFound,
    SyntaxCountMismatch,
    SyntaxCountTooLarge,
    SyntaxCountTooSmall,
    InvalidToken,
    UnknownError,
}

/// Coarse grouping of error kinds by the layer that raises them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorCategory {
    /// Empty or missing source. A caller mistake, not a security event.
    Input,
    /// Malformed tokens or a parse tree of the wrong shape.
    Syntax,
    /// A construct forbidden by the active policy.
    Policy,
    /// The policy itself cannot be put to work.
    Configuration,
    Unknown,
}

impl ErrorKind {
    pub const ALL: [ErrorKind; 11] = [
        ErrorKind::ArgumentCountMismatch,
        ErrorKind::EmptyCodeString,
        ErrorKind::FunctionNotFound,
        ErrorKind::IdentifierNotAllowed,
        ErrorKind::KeywordNotAllowed,
        ErrorKind::ListenerNotFound,
        ErrorKind::SyntaxCountMismatch,
        ErrorKind::SyntaxCountTooLarge,
        ErrorKind::SyntaxCountTooSmall,
        ErrorKind::InvalidToken,
        ErrorKind::UnknownError,
    ];

    pub fn code(self) -> u16 {
        match self {
            ErrorKind::ArgumentCountMismatch => 1,
            ErrorKind::EmptyCodeString => 2,
            ErrorKind::FunctionNotFound => 3,
            ErrorKind::IdentifierNotAllowed => 4,
            ErrorKind::KeywordNotAllowed => 5,
            ErrorKind::ListenerNotFound => 6,
            ErrorKind::SyntaxCountMismatch => 100,
            ErrorKind::SyntaxCountTooLarge => 101,
            ErrorKind::SyntaxCountTooSmall => 102,
            ErrorKind::InvalidToken => 200,
            ErrorKind::UnknownError => 999,
        }
    }

    pub fn from_code(code: u16) -> Option<ErrorKind> {
        ErrorKind::ALL.into_iter().find(|kind| kind.code() == code)
    }

    pub fn name(self) -> &'static str {
        match self {
            ErrorKind::ArgumentCountMismatch => "ArgumentCountMismatch",
            ErrorKind::EmptyCodeString => "EmptyCodeString",
            ErrorKind::FunctionNotFound => "FunctionNotFound",
            ErrorKind::IdentifierNotAllowed => "IdentifierNotAllowed",
            ErrorKind::KeywordNotAllowed => "KeywordNotAllowed",
            ErrorKind::ListenerNotFound => "ListenerNotFound",
            ErrorKind::SyntaxCountMismatch => "SyntaxCountMismatch",
            ErrorKind::SyntaxCountTooLarge => "SyntaxCountTooLarge",
            ErrorKind::SyntaxCountTooSmall => "SyntaxCountTooSmall",
            ErrorKind::InvalidToken => "InvalidToken",
            ErrorKind::UnknownError => "UnknownError",
        }
    }

    pub fn category(self) -> ErrorCategory {
        match self {
            ErrorKind::EmptyCodeString => ErrorCategory::Input,
            ErrorKind::ArgumentCountMismatch
            | ErrorKind::SyntaxCountMismatch
            | ErrorKind::SyntaxCountTooLarge
            | ErrorKind::SyntaxCountTooSmall
            | ErrorKind::InvalidToken => ErrorCategory::Syntax,
            ErrorKind::FunctionNotFound
            | ErrorKind::IdentifierNotAllowed
            | ErrorKind::KeywordNotAllowed => ErrorCategory::Policy,
            ErrorKind::ListenerNotFound => ErrorCategory::Configuration,
            ErrorKind::UnknownError => ErrorCategory::Unknown,
        }
    }

    /// Message template; `{name}` placeholders are filled from parameters.
    pub fn template(self) -> &'static str {
        match self {
            ErrorKind::ArgumentCountMismatch => {
                "Argument count mismatch. Expecting {expectedCount}, but got {actualCount}."
            }
            ErrorKind::EmptyCodeString => "The JavaScript code is empty.",
            ErrorKind::FunctionNotFound => "Function {name} is not found.",
            ErrorKind::IdentifierNotAllowed => "Identifier {identifier} is not allowed.",
            ErrorKind::KeywordNotAllowed => "Keyword {keyword} is not allowed.",
            ErrorKind::ListenerNotFound => "Listener {name} is not found.",
            ErrorKind::SyntaxCountMismatch => {
                "Syntax count mismatch. Expecting {expectedCount}, but got {actualCount}."
            }
            ErrorKind::SyntaxCountTooLarge => "Syntax count {actualCount} is larger than {maxCount}.",
            ErrorKind::SyntaxCountTooSmall => "Syntax count {actualCount} is smaller than {minCount}.",
            ErrorKind::InvalidToken => "Token {actualToken} is invalid. Expecting {expectedToken}.",
            ErrorKind::UnknownError => "Unknown error: {message}",
        }
    }

    /// Parameter names the template refers to, in template order.
    pub fn parameter_names(self) -> &'static [&'static str] {
        match self {
            ErrorKind::ArgumentCountMismatch | ErrorKind::SyntaxCountMismatch => {
                &["expectedCount", "actualCount"]
            }
            ErrorKind::EmptyCodeString => &[],
            ErrorKind::FunctionNotFound | ErrorKind::ListenerNotFound => &["name"],
            ErrorKind::IdentifierNotAllowed => &["identifier"],
            ErrorKind::KeywordNotAllowed => &["keyword"],
            ErrorKind::SyntaxCountTooLarge => &["actualCount", "maxCount"],
            ErrorKind::SyntaxCountTooSmall => &["actualCount", "minCount"],
            ErrorKind::InvalidToken => &["actualToken", "expectedToken"],
            ErrorKind::UnknownError => &["message"],
        }
    }

    /// Render the message for `parameters`.
    ///
    /// String values are inserted verbatim, other values in their JSON
    /// form. A placeholder without a parameter is left as written.
    pub fn render(self, parameters: &Parameters) -> String {
        let template = self.template();
        let mut message = String::with_capacity(template.len() + 16);
        let mut rest = template;

        while let Some(open) = rest.find('{') {
            message.push_str(&rest[..open]);
            let after = &rest[open + 1..];
            let Some(close) = after.find('}') else {
                message.push_str(&rest[open..]);
                return message;
            };
            let name = &after[..close];
            match parameters.get(name) {
                Some(Value::String(value)) => message.push_str(value),
                Some(value) => message.push_str(&value.to_string()),
                None => {
                    message.push('{');
                    message.push_str(name);
                    message.push('}');
                }
            }
            rest = &after[close + 1..];
        }

        message.push_str(rest);
        message
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ============================================================================
// ERROR CONTEXT
// ============================================================================

/// Where in the source an error was detected, as start/end pairs.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ErrorContext {
    /// The offending source text.
    pub source_code: String,
    /// 1-based start and end line.
    pub lines: (usize, usize),
    /// 0-based start and end column, in characters.
    pub columns: (usize, usize),
    /// Start and end byte offset, end exclusive.
    pub positions: (usize, usize),
}

impl ErrorContext {
    pub fn from_span(source: &str, span: Span) -> Self {
        Self {
            source_code: source.get(span.start..span.end).unwrap_or_default().to_string(),
            lines: (span.line, span.end_line),
            columns: (span.column, span.end_column),
            positions: (span.start, span.end),
        }
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Source Code: {}\nLine Number: {}, {}\nColumn: {}, {}\nPosition: {}, {}",
            self.source_code,
            self.lines.0,
            self.lines.1,
            self.columns.0,
            self.columns.1,
            self.positions.0,
            self.positions.1,
        )
    }
}

// ============================================================================
// SANITIZER ERROR
// ============================================================================

/// A rejected check.
///
/// Built only through the named constructors so every parameter the
/// message needs is present. The context may be attached once afterwards
/// by whichever layer knows the position.
#[derive(Clone)]
pub struct SanitizerError {
    kind: ErrorKind,
    parameters: Parameters,
    message: String,
    context: Option<ErrorContext>,
    cause: Option<Cause>,
}

impl SanitizerError {
    fn new(kind: ErrorKind, parameters: Parameters, cause: Option<Cause>) -> Self {
        if let Some(missing) = kind
            .parameter_names()
            .iter()
            .find(|name| !parameters.contains_key(**name))
        {
            panic!("{kind} error built without its {missing} parameter");
        }
        let message = kind.render(&parameters);
        Self {
            kind,
            parameters,
            message,
            context: None,
            cause,
        }
    }

    fn with_parameters<const N: usize>(kind: ErrorKind, parameters: [(&str, Value); N]) -> Self {
        let parameters = parameters
            .into_iter()
            .map(|(name, value)| (name.to_string(), value))
            .collect();
        Self::new(kind, parameters, None)
    }

    pub fn argument_count_mismatch(expected_count: usize, actual_count: usize) -> Self {
        Self::with_parameters(
            ErrorKind::ArgumentCountMismatch,
            [
                ("expectedCount", Value::from(expected_count)),
                ("actualCount", Value::from(actual_count)),
            ],
        )
    }

    pub fn empty_code_string() -> Self {
        Self::with_parameters(ErrorKind::EmptyCodeString, [])
    }

    pub fn function_not_found(name: impl Into<String>) -> Self {
        Self::with_parameters(ErrorKind::FunctionNotFound, [("name", Value::from(name.into()))])
    }

    pub fn identifier_not_allowed(identifier: impl Into<String>) -> Self {
        Self::with_parameters(
            ErrorKind::IdentifierNotAllowed,
            [("identifier", Value::from(identifier.into()))],
        )
    }

    pub fn keyword_not_allowed(keyword: impl Into<String>) -> Self {
        Self::with_parameters(
            ErrorKind::KeywordNotAllowed,
            [("keyword", Value::from(keyword.into()))],
        )
    }

    pub fn listener_not_found<E>(name: impl Into<String>, cause: E) -> Self
    where
        E: StdError + Send + Sync + 'static,
    {
        let parameters = Parameters::from([("name".to_string(), Value::from(name.into()))]);
        Self::new(ErrorKind::ListenerNotFound, parameters, Some(Arc::new(cause)))
    }

    pub fn syntax_count_mismatch(expected_count: usize, actual_count: usize) -> Self {
        Self::with_parameters(
            ErrorKind::SyntaxCountMismatch,
            [
                ("expectedCount", Value::from(expected_count)),
                ("actualCount", Value::from(actual_count)),
            ],
        )
    }

    pub fn syntax_count_too_large(max_count: usize, actual_count: usize) -> Self {
        Self::with_parameters(
            ErrorKind::SyntaxCountTooLarge,
            [
                ("maxCount", Value::from(max_count)),
                ("actualCount", Value::from(actual_count)),
            ],
        )
    }

    pub fn syntax_count_too_small(min_count: usize, actual_count: usize) -> Self {
        Self::with_parameters(
            ErrorKind::SyntaxCountTooSmall,
            [
                ("minCount", Value::from(min_count)),
                ("actualCount", Value::from(actual_count)),
            ],
        )
    }

    pub fn token_mismatch(expected_token: impl Into<String>, actual_token: impl Into<String>) -> Self {
        Self::with_parameters(
            ErrorKind::InvalidToken,
            [
                ("expectedToken", Value::from(expected_token.into())),
                ("actualToken", Value::from(actual_token.into())),
            ],
        )
    }

    pub fn unknown_error<E>(message: impl Into<String>, cause: E) -> Self
    where
        E: StdError + Send + Sync + 'static,
    {
        let parameters = Parameters::from([("message".to_string(), Value::from(message.into()))]);
        Self::new(ErrorKind::UnknownError, parameters, Some(Arc::new(cause)))
    }

    /// A syntax error from the parser, positioned on the offending token.
    pub fn from_parse_error(source: &str, error: &ParseError) -> Self {
        Self::token_mismatch(error.expected.to_string(), error.found.clone())
            .with_context(ErrorContext::from_span(source, error.span))
    }

    /// Attach a context. Only the first attached context is kept.
    pub fn with_context(mut self, context: ErrorContext) -> Self {
        if self.context.is_none() {
            self.context = Some(context);
        }
        self
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn code(&self) -> u16 {
        self.kind.code()
    }

    pub fn parameters(&self) -> &Parameters {
        &self.parameters
    }

    pub fn parameter(&self, name: &str) -> Option<&Value> {
        self.parameters.get(name)
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn context(&self) -> Option<&ErrorContext> {
        self.context.as_ref()
    }

    pub fn cause(&self) -> Option<&(dyn StdError + Send + Sync + 'static)> {
        self.cause.as_deref()
    }

    pub fn diagnostic(&self) -> Diagnostic {
        Diagnostic::from(self)
    }
}

impl fmt::Debug for SanitizerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SanitizerError")
            .field("kind", &self.kind)
            .field("parameters", &self.parameters)
            .field("context", &self.context)
            .field("cause", &self.cause.as_ref().map(|cause| cause.to_string()))
            .finish()
    }
}

impl fmt::Display for SanitizerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl StdError for SanitizerError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.cause
            .as_deref()
            .map(|cause| cause as &(dyn StdError + 'static))
    }
}

/// Causes are compared by presence only.
impl PartialEq for SanitizerError {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind
            && self.parameters == other.parameters
            && self.context == other.context
            && self.cause.is_some() == other.cause.is_some()
    }
}

// ============================================================================
// DIAGNOSTIC
// ============================================================================

/// Serializable snapshot of a [`SanitizerError`] for audit logs and tooling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub code: u16,
    pub kind: ErrorKind,
    pub category: ErrorCategory,
    pub message: String,
    pub parameters: Parameters,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<ErrorContext>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cause: Option<String>,
}

impl From<&SanitizerError> for Diagnostic {
    fn from(error: &SanitizerError) -> Self {
        Self {
            code: error.code(),
            kind: error.kind,
            category: error.kind.category(),
            message: error.message.clone(),
            parameters: error.parameters.clone(),
            context: error.context.clone(),
            cause: error.cause.as_ref().map(|cause| cause.to_string()),
        }
    }
}

// ============================================================================
// VIOLATION
// ============================================================================

/// An error raised during a tree walk, positioned but not yet tied to the
/// source text.
#[derive(Debug, Clone, PartialEq)]
pub struct Violation {
    pub error: SanitizerError,
    pub span: Option<Span>,
}

impl Violation {
    pub fn at(error: SanitizerError, span: Span) -> Self {
        Self {
            error,
            span: Some(span),
        }
    }

    pub fn unpositioned(error: SanitizerError) -> Self {
        Self { error, span: None }
    }

    pub fn kind(&self) -> ErrorKind {
        self.error.kind()
    }

    /// Decorate the error with its context in `source`.
    pub fn into_error(self, source: &str) -> SanitizerError {
        match self.span {
            Some(span) => self.error.with_context(ErrorContext::from_span(source, span)),
            None => self.error,
        }
    }
}

impl From<SanitizerError> for Violation {
    fn from(error: SanitizerError) -> Self {
        Self::unpositioned(error)
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use scriptguard_syntax::parse_single_expression;

    #[test]
    fn test_codes_are_unique_and_round_trip() {
        for kind in ErrorKind::ALL {
            assert_eq!(ErrorKind::from_code(kind.code()), Some(kind));
        }
        assert_eq!(ErrorKind::from_code(7), None);
    }

    #[test]
    fn test_every_template_placeholder_is_declared() {
        for kind in ErrorKind::ALL {
            for name in kind.parameter_names() {
                assert!(
                    kind.template().contains(&format!("{{{}}}", name)),
                    "{kind} does not use {name}"
                );
            }
            let placeholders = kind.template().matches('{').count();
            assert_eq!(placeholders, kind.parameter_names().len(), "{kind}");
        }
    }

    #[test]
    fn test_every_constructor_fills_its_template() {
        let io = || std::io::Error::other("disk");
        let errors = [
            SanitizerError::argument_count_mismatch(1, 2),
            SanitizerError::empty_code_string(),
            SanitizerError::function_not_found("main"),
            SanitizerError::identifier_not_allowed("eval"),
            SanitizerError::keyword_not_allowed("with"),
            SanitizerError::listener_not_found("audit", io()),
            SanitizerError::syntax_count_mismatch(1, 2),
            SanitizerError::syntax_count_too_large(1, 2),
            SanitizerError::syntax_count_too_small(2, 1),
            SanitizerError::token_mismatch("'('", "a"),
            SanitizerError::unknown_error("boom", io()),
        ];
        for error in &errors {
            assert!(!error.message().contains('{'), "{:?} left a placeholder", error.kind());
        }
        let mut kinds: Vec<_> = errors.iter().map(SanitizerError::kind).collect();
        kinds.dedup();
        assert_eq!(kinds.len(), ErrorKind::ALL.len());
    }

    #[test]
    #[should_panic(expected = "without its name parameter")]
    fn test_missing_parameter_panics_in_every_build() {
        SanitizerError::new(ErrorKind::FunctionNotFound, Parameters::new(), None);
    }

    #[test]
    fn test_messages() {
        assert_eq!(
            SanitizerError::argument_count_mismatch(1, 3).to_string(),
            "Argument count mismatch. Expecting 1, but got 3."
        );
        assert_eq!(
            SanitizerError::empty_code_string().to_string(),
            "The JavaScript code is empty."
        );
        assert_eq!(
            SanitizerError::identifier_not_allowed("eval").to_string(),
            "Identifier eval is not allowed."
        );
        assert_eq!(
            SanitizerError::keyword_not_allowed("async").to_string(),
            "Keyword async is not allowed."
        );
        assert_eq!(
            SanitizerError::syntax_count_too_large(2, 5).to_string(),
            "Syntax count 5 is larger than 2."
        );
        assert_eq!(
            SanitizerError::syntax_count_too_small(2, 1).to_string(),
            "Syntax count 1 is smaller than 2."
        );
        assert_eq!(
            SanitizerError::token_mismatch("'('", "a").to_string(),
            "Token a is invalid. Expecting '('."
        );
        assert_eq!(
            SanitizerError::function_not_found("main").to_string(),
            "Function main is not found."
        );
    }

    #[test]
    fn test_render_keeps_unknown_placeholder() {
        let message = ErrorKind::FunctionNotFound.render(&Parameters::new());
        assert_eq!(message, "Function {name} is not found.");
    }

    #[test]
    fn test_context_attaches_once() {
        let first = ErrorContext {
            source_code: "a".to_string(),
            lines: (1, 1),
            columns: (0, 1),
            positions: (0, 1),
        };
        let second = ErrorContext {
            source_code: "b".to_string(),
            ..first.clone()
        };
        let error = SanitizerError::identifier_not_allowed("a")
            .with_context(first.clone())
            .with_context(second);
        assert_eq!(error.context(), Some(&first));
        assert_eq!(error.kind(), ErrorKind::IdentifierNotAllowed);
        assert_eq!(error.message(), "Identifier a is not allowed.");
    }

    #[test]
    fn test_context_display() {
        let source = "function a() {}";
        let error = parse_single_expression(source).unwrap_err();
        let error = SanitizerError::from_parse_error(source, &error);
        assert_eq!(error.code(), 200);
        assert_eq!(error.to_string(), "Token a is invalid. Expecting '('.");
        assert_eq!(
            error.context().unwrap().to_string(),
            "Source Code: a\nLine Number: 1, 1\nColumn: 9, 10\nPosition: 9, 10"
        );
    }

    #[test]
    fn test_cause_is_error_source() {
        let io = std::io::Error::new(std::io::ErrorKind::Other, "boom");
        let error = SanitizerError::unknown_error("wrapped", io);
        assert_eq!(error.to_string(), "Unknown error: wrapped");
        assert_eq!(error.source().map(|s| s.to_string()), Some("boom".to_string()));
        assert_eq!(error.diagnostic().cause.as_deref(), Some("boom"));
    }

    #[test]
    fn test_diagnostic_json_shape() {
        let error = SanitizerError::keyword_not_allowed("var");
        let json = serde_json::to_value(error.diagnostic()).unwrap();
        assert_eq!(json["code"], 5);
        assert_eq!(json["kind"], "KeywordNotAllowed");
        assert_eq!(json["category"], "Policy");
        assert_eq!(json["parameters"]["keyword"], "var");
        assert!(json.get("context").is_none());
    }

    #[test]
    fn test_violation_into_error_positions_context() {
        let source = "x + eval";
        let span = Span {
            start: 4,
            end: 8,
            line: 1,
            column: 4,
            end_line: 1,
            end_column: 8,
        };
        let error = Violation::at(SanitizerError::identifier_not_allowed("eval"), span).into_error(source);
        let context = error.context().unwrap();
        assert_eq!(context.source_code, "eval");
        assert_eq!(context.positions, (4, 8));
    }
}
