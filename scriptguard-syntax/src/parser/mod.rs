//! Parser module for JavaScript source

pub mod ast;
mod lower;
mod nesting;
pub mod parser;

pub use ast::*;
pub use parser::*;
