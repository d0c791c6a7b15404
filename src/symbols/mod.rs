//! Symbol management.
//!
//! - `symbols`: identifier descriptors (variables, functions and the dummy
//!   placeholder), function signatures, and the scoped symbol table
//! - `strings`: the table of string literals collected for later emission

pub mod strings;
pub mod symbols;

#[cfg(test)]
mod tests;
