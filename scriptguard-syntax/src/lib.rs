//! SCRIPTGUARD Syntax - JavaScript Parser & Tree Walker
//!
//! This crate turns untrusted JavaScript source text into a typed syntax tree
//! and drives listeners over it. It knows nothing about policy; the
//! `scriptguard-core` crate layers its rules on top of [`visit::Listener`].
//!
//! Architecture:
//! ```text
//! Source text
//!     ↓
//! Nesting pre-check (lexical, bounds parser recursion)
//!     ↓
//! oxc parser (read as a script and as a module, readings reconciled)
//!     ↓
//! Lowering (owned AST with line/column spans, depth-capped)
//!     ↓
//! AST (Program / Statement / Expression)
//!     ↓
//! Walker (pre-order enter/exit, stops at first listener error)
//! ```

pub mod parser;
pub mod span;
pub mod visit;

pub use parser::{
    parse_program, parse_single_expression, Expected, ParseError, MAX_NESTING_DEPTH,
};
pub use span::{LineIndex, Span};
pub use visit::{walk_expression, walk_program, walk_statement, BindingKind, Listener, Node};
