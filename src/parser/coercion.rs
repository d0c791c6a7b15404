//! Implicit conversions between `char` and `int`.

use crate::ast::{
    ast::{Expr, ExprWrapper},
    expressions::{ToCharExpr, ToIntExpr},
    types::Type,
};

/// Widens a `char` expression to `int`. Anything else is returned as is.
pub fn char_to_int(expr: ExprWrapper) -> ExprWrapper {
    if expr.get_type() != Type::Char {
        return expr;
    }

    ExprWrapper::new(ToIntExpr { operand: expr })
}

/// Narrows an `int` expression to `char`. Anything else is returned as is.
pub fn int_to_char(expr: ExprWrapper) -> ExprWrapper {
    if expr.get_type() != Type::Int {
        return expr;
    }

    ExprWrapper::new(ToCharExpr { operand: expr })
}
