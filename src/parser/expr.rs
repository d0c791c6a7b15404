//! Precedence chain of the expression grammar.
//!
//! ```text
//! Expr     --> AndTerm Expr'        Expr'    --> || AndTerm Expr'   | ε
//! AndTerm  --> RelExpr AndTerm'     AndTerm' --> && RelExpr AndTerm' | ε
//! RelExpr  --> NumExpr RelExpr'     RelExpr' --> (== | != | < | >) NumExpr RelExpr' | ε
//! NumExpr  --> Term NumExpr'        NumExpr' --> (+ | -) Term NumExpr' | ε
//! Term     --> Value Term'          Term'    --> (* | / | %) Value Term' | ε
//! Value    --> ! Factor | Factor
//! ```
//!
//! The tail rules are right-recursive so one token of lookahead suffices,
//! but each one passes the node it just built down as the left operand of
//! the next, so the finished tree is left-associative.
//!
//! Every rule returns `Ok(None)` when it does not match at all. That is not
//! an error: it lets the caller try something else. A missing operand after
//! an operator token is a fatal error.

use std::rc::Rc;

use log::trace;

use crate::{
    ast::{
        ast::{Expr, ExprWrapper},
        expressions::{ArraySub, BinaryExpr, NotExpr},
    },
    errors::{
        diagnostics::SemanticError,
        errors::{Error, ErrorImpl},
    },
    lexer::tokens::TokenKind,
    symbols::symbols::Symbol,
    Span,
};

use super::{
    factor::parse_factor,
    lookups::{operator_at, Precedence},
    parser::Parser,
};

/// A token the statement parser already consumed before handing over.
///
/// Passed by value into the expression entry point and on to the leftmost
/// factor, which uses it in place of reading an identifier.
#[derive(Debug)]
pub enum Pending {
    /// A resolved identifier; the cursor sits on the token after it.
    Ident { ident: Rc<Symbol>, span: Span },
    /// A complete `id [ Expr ]`; the cursor sits after the `]`.
    Array(ArraySub),
}

pub type ExprResult = Result<Option<ExprWrapper>, Error>;

/// Outcome of a tail rule. `Epsilon` hands the untouched left operand back.
enum Prime {
    Matched(ExprWrapper),
    Epsilon(ExprWrapper),
}

impl Prime {
    fn into_inner(self) -> ExprWrapper {
        match self {
            Prime::Matched(expr) | Prime::Epsilon(expr) => expr,
        }
    }
}

type OperandRule = fn(&mut Parser, Option<Pending>) -> ExprResult;

/// Expr --> AndTerm Expr'
pub fn parse_expr(parser: &mut Parser) -> ExprResult {
    parse_expr_after(parser, None)
}

/// `parse_expr` for a caller that already consumed the leading identifier.
pub fn parse_expr_after(parser: &mut Parser, pending: Option<Pending>) -> ExprResult {
    parse_level(parser, pending, Precedence::LogicalOr, parse_and_term)
}

/// AndTerm --> RelExpr AndTerm'
pub fn parse_and_term(parser: &mut Parser, pending: Option<Pending>) -> ExprResult {
    parse_level(parser, pending, Precedence::LogicalAnd, parse_rel_expr)
}

/// RelExpr --> NumExpr RelExpr'
pub fn parse_rel_expr(parser: &mut Parser, pending: Option<Pending>) -> ExprResult {
    parse_level(parser, pending, Precedence::Relational, parse_num_expr)
}

/// NumExpr --> Term NumExpr'
pub fn parse_num_expr(parser: &mut Parser, pending: Option<Pending>) -> ExprResult {
    parse_level(parser, pending, Precedence::Additive, parse_term)
}

/// Term --> Value Term'
pub fn parse_term(parser: &mut Parser, pending: Option<Pending>) -> ExprResult {
    parse_level(parser, pending, Precedence::Multiplicative, parse_value)
}

/// Head rule shared by every binary level: one operand, then the tail.
fn parse_level(
    parser: &mut Parser,
    pending: Option<Pending>,
    level: Precedence,
    operand: OperandRule,
) -> ExprResult {
    let Some(lhs) = operand(parser, pending)? else {
        return Ok(None);
    };

    Ok(Some(parse_prime(parser, lhs, level, operand)?.into_inner()))
}

/// Tail rule shared by every binary level.
///
/// L' --> op Operand L' | ε
fn parse_prime(
    parser: &mut Parser,
    lhs: ExprWrapper,
    level: Precedence,
    operand: OperandRule,
) -> Result<Prime, Error> {
    let Some(operator) = operator_at(parser.current_token_kind(), level) else {
        return Ok(Prime::Epsilon(lhs));
    };

    let operator_token = parser.advance().clone();
    let position = operator_token.span.start.clone();

    // The right operand is mandatory once the operator is consumed
    let rhs = operand(parser, None)?.ok_or_else(|| {
        Error::new(
            ErrorImpl::OperandMissing {
                operator: operator_token.kind,
            },
            position.clone(),
        )
    })?;

    let mut node = BinaryExpr::new(operator, lhs, rhs);
    if !node.finalize_op(parser.rules()) {
        let error = SemanticError::InvalidOperands {
            lhs: node.lhs().get_type(),
            rhs: node.rhs().get_type(),
        };
        parser.report_semantic(error, position);
    }
    trace!("built {} : {}", node.sexpr(), node.get_type());

    // The node just built becomes the left operand of the next operator
    match parse_prime(parser, ExprWrapper::new(node), level, operand)? {
        Prime::Matched(deeper) => Ok(Prime::Matched(deeper)),
        Prime::Epsilon(node) => Ok(Prime::Matched(node)),
    }
}

/// Value --> ! Factor | Factor
pub fn parse_value(parser: &mut Parser, pending: Option<Pending>) -> ExprResult {
    // A pending identifier means the value already started with it
    if pending.is_some() || parser.current_token_kind() != TokenKind::Not {
        return parse_factor(parser, pending);
    }

    let not_token = parser.advance().clone();
    let factor = parse_factor(parser, None)?.ok_or_else(|| {
        Error::new(
            ErrorImpl::syntax("`!` must be followed by an expression"),
            parser.get_position(),
        )
    })?;

    let span = not_token.span.to(factor.get_span());
    let mut node = NotExpr::new(factor, span);
    if !node.finalize_op(parser.rules()) {
        let error = SemanticError::InvalidOperand {
            operand: node.operand().get_type(),
        };
        parser.report_semantic(error, not_token.span.start.clone());
    }

    Ok(Some(ExprWrapper::new(node)))
}
