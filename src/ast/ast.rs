use std::{any::Any, fmt::{Debug, Display}, ops::Deref};

use super::types::Type;

/// Statement Types
#[derive(PartialEq, Clone, Copy, Debug)]
pub enum StmtType {
    Decl,
    Assign,
    ArrayAssign,
    Expression,
    Return,
    If,
    While,
    Compound,
    Null,
}

/// Statement Trait
///
/// Defines the behavior of all statement types in the AST.
pub trait Stmt: Debug {
    /// Returns the kind of the statement.
    fn get_stmt_type(&self) -> StmtType;
    /// Type conversion purposes - used with `.downcast_ref<T>()`
    fn as_any(&self) -> &dyn Any;
    /// Returns the span of the statement.
    fn get_span(&self) -> &crate::Span;
    /// Canonical S-expression rendering of the statement.
    fn sexpr(&self) -> String;
}

/// Statement Wrapper
///
/// A wrapper that allows for any statement kind to be stored with helper methods
#[derive(Debug)]
pub struct StmtWrapper(Box<dyn Stmt>);

impl StmtWrapper {
    pub fn new<T: Stmt + 'static>(stmt: T) -> Self {
        StmtWrapper(Box::new(stmt))
    }

    pub fn downcast_ref<T: 'static>(&self) -> Option<&T> {
        self.0.as_any().downcast_ref::<T>()
    }
}

// Not used often, can be removed in future
impl Deref for StmtWrapper {
    type Target = Box<dyn Stmt>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl Stmt for StmtWrapper {
    fn get_stmt_type(&self) -> StmtType {
        self.0.get_stmt_type()
    }
    fn as_any(&self) -> &dyn Any {
        self.0.as_any()
    }
    fn get_span(&self) -> &crate::Span {
        self.0.get_span()
    }
    fn sexpr(&self) -> String {
        self.0.sexpr()
    }
}

/// Expression Types
///
/// The closed set of expression node kinds.
#[derive(PartialEq, Clone, Copy, Debug)]
pub enum ExprType {
    LogicalOr,
    LogicalAnd,
    RelationalCompare,
    Additive,
    Multiplicative,
    LogicalNot,
    Increment,
    Decrement,
    AddressOfArrayElement,
    ArraySubscript,
    FunctionCall,
    Identifier,
    Constant,
    String,
    /// Implicit `char` -> `int` widening
    ToInt,
    /// Implicit `int` -> `char` narrowing
    ToChar,
}

pub trait Expr: Debug {
    /// Returns the node kind of the expression.
    fn get_expr_type(&self) -> ExprType;
    /// Type conversion purposes - used with `.downcast_ref<T>()`
    fn as_any(&self) -> &dyn Any;
    /// Returns the resolved type of the expression.
    ///
    /// Operator nodes resolve this when they are finalized, so it is
    /// available as soon as the parser hands the node back.
    fn get_type(&self) -> Type;
    /// Returns the span of the expression.
    fn get_span(&self) -> &crate::Span;
    /// Canonical S-expression rendering, e.g. `(- (- a b) c)`.
    fn sexpr(&self) -> String;
}

/// Expression Wrapper
///
/// A wrapper that allows for any expression kind to be stored with helper methods
#[derive(Debug)]
pub struct ExprWrapper(Box<dyn Expr>);

impl ExprWrapper {
    pub fn new<T: Expr + 'static>(expression: T) -> Self {
        ExprWrapper(Box::new(expression))
    }

    pub fn downcast_ref<T: 'static>(&self) -> Option<&T> {
        self.0.as_any().downcast_ref::<T>()
    }
}

impl Expr for ExprWrapper {
    fn get_expr_type(&self) -> ExprType {
        self.0.get_expr_type()
    }
    fn as_any(&self) -> &dyn Any {
        self.0.as_any()
    }
    fn get_type(&self) -> Type {
        self.0.get_type()
    }
    fn get_span(&self) -> &crate::Span {
        self.0.get_span()
    }
    fn sexpr(&self) -> String {
        self.0.sexpr()
    }
}

impl Display for ExprWrapper {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.sexpr())
    }
}
