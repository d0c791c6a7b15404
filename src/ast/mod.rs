/// AST (Abstract Syntax Tree) module
/// Contains all definitions related to the AST structure
///
/// Submodules:
/// - ast: Core traits and node-kind enums
/// - expressions: Expression node definitions
/// - operators: Binary operators and prefix steps
/// - rules: Pluggable type-compatibility policy
/// - statements: Statement, function and program definitions
/// - types: Semantic types
pub mod ast;
pub mod expressions;
pub mod operators;
pub mod rules;
pub mod statements;
pub mod types;
