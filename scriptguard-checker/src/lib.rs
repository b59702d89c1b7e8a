//! SCRIPTGUARD Checker - Pre-Execution Gate for JavaScript
//!
//! Decides whether an untrusted script may run, before it runs:
//!
//! ```text
//! source ──► ScriptParser ──► ParsedScript ──► ValidatedScript ──► ParseUnit (accepted)
//!               │ empty / syntax   │ goal shape        │ policy listener
//!               └──────────────────┴───────────────────┴──► SanitizerError (rejected)
//! ```
//!
//! The gate is deterministic and free of side effects: the same source
//! under the same policy always yields the same verdict. It never executes
//! the script and imposes no time limit of its own; callers that accept
//! very large inputs should bound them before checking.
//!
//! ```
//! use scriptguard_checker::{Checker, SingleExpressionChecker};
//!
//! let checker = SingleExpressionChecker::new();
//! assert!(checker.check("Math.max(1, 2)").unwrap());
//! assert!(checker.check("eval('1')").is_err());
//! ```

pub mod checkers;
pub mod config;
pub mod parser;
pub mod telemetry;

pub use checkers::{
    check, validate, AnonymousFunctionChecker, Checker, ModuleFunctionChecker, SingleExpressionChecker,
    StatementChecker, StatementListChecker,
};
pub use config::{ConfigError, PolicyFile, SetPatch};
pub use parser::{ParseGoal, ParseUnit, ParsedScript, ScriptParser, ValidatedScript};
pub use telemetry::{init_tracing, LogFormat};

pub use scriptguard_core::{
    Diagnostic, ErrorContext, ErrorKind, IdentifierSet, PolicyKeyword, SanitizerError, SanitizerOptions,
    SanitizerOptionsBuilder, SanitizerResult,
};
