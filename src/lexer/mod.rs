//! Lexical analysis.
//!
//! Converts source text into a stream of tokens for the parser:
//!
//! - Tokenization through an ordered table of anchored regex patterns
//! - Keywords, identifiers, integer/character constants and string literals
//! - Line and column tracking for every token
//! - Comments and whitespace are skipped

pub mod lexer;
pub mod tokens;
