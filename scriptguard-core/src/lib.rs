//! SCRIPTGUARD Core - Policy Model & Listener
//!
//! Everything a check needs besides the parser:
//!
//! ```text
//! SanitizerOptionsBuilder ──build()──► SanitizerOptions (immutable, Arc-shared)
//!                                          │
//!                        matcher::matches ◄┤
//!                                          ▼
//!                              ListenerBinding ──► SanitizerListener
//!                                                      │ first violation
//!                                                      ▼
//!                                      Violation ──into_error──► SanitizerError
//! ```

pub mod error;
pub mod listener;
pub mod matcher;
pub mod options;

pub use error::{
    Diagnostic, ErrorCategory, ErrorContext, ErrorKind, Parameters, SanitizerError, SanitizerResult,
    Violation,
};
pub use listener::{
    ListenerBinding, ListenerError, ListenerFactory, ListenerRegistry, PolicyListener,
    SanitizerListener, SanitizerListenerFactory, SANITIZER_LISTENER_NAME,
};
pub use matcher::matches;
pub use options::{
    IdentifierSet, KeywordFlags, PolicyKeyword, ReservedIdentifierPredicate, SanitizerOptions,
    SanitizerOptionsBuilder,
};
