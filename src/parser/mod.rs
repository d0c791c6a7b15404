//! Parser module for building a typed Abstract Syntax Tree (AST).
//!
//! This module transforms a stream of tokens into an AST by recursive
//! descent, type-checking each expression node as it is built:
//!
//! - `parser`: token cursor, options, diagnostics and the `parse` entry points
//! - `lookups`: binary operator table per precedence level
//! - `expr`: the precedence chain and the `!` level
//! - `factor`: identifiers, subscripts, calls, literals and prefix operators
//! - `coercion`: implicit `char`/`int` conversion nodes
//! - `types`: type specifiers
//! - `stmt`: declarations, functions and statements
//!
//! Fatal errors unwind through `Result` and are caught at bracketed
//! constructs and statement boundaries, where the stream is resynchronized.
//! Semantic errors are recorded in the parser's diagnostics and never stop
//! the parse.

pub mod coercion;
pub mod expr;
pub mod factor;
pub mod lookups;
pub mod parser;
pub mod stmt;
pub mod types;

#[cfg(test)]
mod tests;
