//! Factor resolver.
//!
//! ```text
//! Factor --> id | id [ Expr ] | id ( Args ) | string | constant
//!          | ( Expr ) | ++ id | -- id | & id [ Expr ]
//! ```
//!
//! The identifier-led alternative is always tried first since it may be
//! handed an identifier the statement parser already consumed. The other
//! alternatives are tried in `FACTOR_RULES` order and each one only looks
//! at the current token before committing.

use std::rc::Rc;

use log::trace;

use crate::{
    ast::{
        ast::{Expr, ExprWrapper},
        expressions::{
            AddrOfArray, ArrayExpr, ArraySub, ConstantExpr, FuncExpr, IdentExpr, StepExpr,
            StringExpr,
        },
        operators::Step,
        types::Type,
    },
    errors::{
        diagnostics::SemanticError,
        errors::{Error, ErrorImpl},
    },
    lexer::tokens::{Token, TokenKind},
    symbols::symbols::{FunctionSignature, Symbol, PRINTF},
    Span,
};

use super::{
    coercion::{char_to_int, int_to_char},
    expr::{parse_expr, ExprResult, Pending},
    parser::Parser,
};

pub type FactorRule = fn(&mut Parser) -> ExprResult;

/// Alternatives after the identifier-led one, in the order they are tried.
const FACTOR_RULES: [FactorRule; 6] = [
    parse_string,
    parse_constant,
    parse_paren,
    parse_increment,
    parse_decrement,
    parse_addr_of,
];

pub fn parse_factor(parser: &mut Parser, pending: Option<Pending>) -> ExprResult {
    if let Some(factor) = parse_ident_factor(parser, pending)? {
        return Ok(Some(factor));
    }

    for rule in FACTOR_RULES {
        if let Some(factor) = rule(parser)? {
            return Ok(Some(factor));
        }
    }

    Ok(None)
}

/// id | id [ Expr ] | id ( Args )
fn parse_ident_factor(parser: &mut Parser, pending: Option<Pending>) -> ExprResult {
    let (ident, span) = match pending {
        Some(Pending::Array(array)) => {
            return Ok(Some(char_to_int(ExprWrapper::new(ArrayExpr::new(array)))));
        }
        Some(Pending::Ident { ident, span }) => (ident, span),
        None => {
            if parser.current_token_kind() != TokenKind::Identifier {
                return Ok(None);
            }

            let token = parser.advance().clone();
            let ident = parser.get_variable(&token.value, token.span.start.clone());
            (ident, token.span)
        }
    };

    let factor = match parser.current_token_kind() {
        TokenKind::OpenBracket => parse_subscript(parser, ident, span)?,
        TokenKind::OpenParen => parse_call(parser, ident, span)?,
        _ => ExprWrapper::new(IdentExpr::new(ident, span)),
    };

    Ok(Some(char_to_int(factor)))
}

/// Whether `ident [ ... ]` should be parsed rather than rejected.
pub fn accepts_subscript(parser: &Parser, ident: &Symbol) -> bool {
    !parser.options().check_semantics || ident.is_dummy() || ident.get_type().is_array()
}

/// `[ Expr ]` following an identifier.
///
/// A missing subscript expression or closing bracket is fatal.
pub fn parse_array_sub(parser: &mut Parser, ident: Rc<Symbol>, span: Span) -> Result<ArraySub, Error> {
    parser.expect(TokenKind::OpenBracket)?;

    let position = parser.get_position();
    let index = parse_expr(parser)?.ok_or_else(|| {
        Error::new(
            ErrorImpl::syntax("not a valid expression inside brackets"),
            position.clone(),
        )
    })?;
    let close = parser.expect(TokenKind::CloseBracket)?;

    let received = index.get_type();
    if !received.is_scalar() && !received.is_error() {
        parser.report_semantic(SemanticError::SubscriptType { received }, position);
    }

    Ok(ArraySub::new(ident, index, span.to(&close.span)))
}

/// Reports `ident` as not an array and skips its `[ ... ]`.
pub fn reject_subscript(parser: &mut Parser, ident: &Symbol, span: &Span) -> Result<(), Error> {
    parser.report_semantic(
        SemanticError::NotAnArray {
            name: ident.name().to_string(),
        },
        span.start.clone(),
    );
    skip_past(parser, TokenKind::CloseBracket)
}

fn parse_subscript(parser: &mut Parser, ident: Rc<Symbol>, span: Span) -> Result<ExprWrapper, Error> {
    if !accepts_subscript(parser, &ident) {
        reject_subscript(parser, &ident, &span)?;
        return Ok(placeholder(parser, span));
    }

    match parse_array_sub(parser, ident, span.clone()) {
        Ok(array) => Ok(ExprWrapper::new(ArrayExpr::new(array))),
        Err(error) => {
            recover(parser, error, TokenKind::CloseBracket)?;
            Ok(placeholder(parser, span))
        }
    }
}

fn parse_call(parser: &mut Parser, ident: Rc<Symbol>, span: Span) -> Result<ExprWrapper, Error> {
    let signature = ident.signature().cloned();

    if signature.is_none() && !ident.is_dummy() && parser.options().check_semantics {
        parser.report_semantic(
            SemanticError::NotAFunction {
                name: ident.name().to_string(),
            },
            span.start.clone(),
        );
        skip_past(parser, TokenKind::OpenParen)?;
        skip_past(parser, TokenKind::CloseParen)?;
        return Ok(placeholder(parser, span));
    }

    // Dummy callees and unchecked parses collect arguments without checks
    let signature = signature.filter(|_| parser.options().check_semantics);
    let is_printf = ident.name() == PRINTF && signature.as_ref().is_some_and(|sig| sig.variadic);
    if ident.name() == PRINTF {
        parser.mark_printf();
    }

    let open = parser.expect(TokenKind::OpenParen)?;
    let mut call = FuncExpr::new(Rc::clone(&ident), span.clone());

    let end = match parse_arguments(parser, &mut call, signature.as_ref(), is_printf) {
        Ok(close) => {
            call.set_span(span.to(&close.span));
            close.span.start
        }
        Err(error) => {
            // The call keeps whatever arguments were parsed and is still checked
            let position = error.get_position().clone();
            recover(parser, error, TokenKind::CloseParen)?;
            position
        }
    };

    if let Some(signature) = &signature {
        if is_printf {
            if call.num_args() == 0 {
                parser.report_semantic(SemanticError::FormatArgumentsRequired, open.span.start.clone());
            }
        } else if call.num_args() < signature.num_args() {
            let error = SemanticError::TooFewArguments {
                function: ident.name().to_string(),
                expected: signature.num_args(),
            };
            parser.report_semantic(error, end);
        }
    }

    Ok(ExprWrapper::new(call))
}

/// Args --> ε | Expr (, Expr)*
///
/// Returns the closing `)`.
fn parse_arguments(
    parser: &mut Parser,
    call: &mut FuncExpr,
    signature: Option<&FunctionSignature>,
    is_printf: bool,
) -> Result<Token, Error> {
    if parser.current_token_kind() != TokenKind::CloseParen {
        loop {
            let position = parser.get_position();
            let arg = parse_expr(parser)?.ok_or_else(|| {
                Error::new(
                    ErrorImpl::syntax("expected an argument expression"),
                    position,
                )
            })?;

            let arg = match signature {
                Some(signature) => check_argument(parser, call, signature, is_printf, arg),
                None => arg,
            };
            call.add_arg(arg);

            if !parser.peek_and_consume(TokenKind::Comma) {
                break;
            }
        }
    }

    parser.expect(TokenKind::CloseParen)
}

/// Checks the next argument of `call` against its parameter, narrowing an
/// `int` passed for a `char` parameter.
fn check_argument(
    parser: &mut Parser,
    call: &FuncExpr,
    signature: &FunctionSignature,
    is_printf: bool,
    arg: ExprWrapper,
) -> ExprWrapper {
    let index = call.num_args();
    let received = arg.get_type();
    let position = arg.get_span().start.clone();

    if is_printf {
        if index == 0 && received != Type::CharArray && !received.is_error() {
            parser.report_semantic(SemanticError::FormatStringRequired, position);
        }
        return arg;
    }

    match signature.arg_type(index) {
        None => {
            if !signature.variadic {
                let error = SemanticError::TooManyArguments {
                    function: call.ident().name().to_string(),
                    expected: signature.num_args(),
                };
                parser.report_semantic(error, position);
            }
            arg
        }
        Some(Type::Char) if received == Type::Int => int_to_char(arg),
        Some(expected) => {
            if !signature.check_arg_type(index, received) {
                parser.report_semantic(SemanticError::ArgumentType { expected }, position);
            }
            arg
        }
    }
}

/// string
fn parse_string(parser: &mut Parser) -> ExprResult {
    if parser.current_token_kind() != TokenKind::String {
        return Ok(None);
    }

    let token = parser.advance().clone();
    let id = parser.strings_mut().intern(&token.value);

    Ok(Some(ExprWrapper::new(StringExpr {
        value: token.value,
        id,
        span: token.span,
    })))
}

/// constant
fn parse_constant(parser: &mut Parser) -> ExprResult {
    if parser.current_token_kind() != TokenKind::Constant {
        return Ok(None);
    }

    let token = parser.advance().clone();
    let position = token.span.start.clone();
    let constant = ConstantExpr::from_literal(&token.value, token.span)
        .map_err(|error| Error::new(error, position))?;

    Ok(Some(ExprWrapper::new(constant)))
}

/// ( Expr )
fn parse_paren(parser: &mut Parser) -> ExprResult {
    if parser.current_token_kind() != TokenKind::OpenParen {
        return Ok(None);
    }

    parser.advance();
    let expr = parse_expr(parser)?.ok_or_else(|| {
        Error::new(
            ErrorImpl::syntax("not a valid expression inside parenthesis"),
            parser.get_position(),
        )
    })?;
    parser.expect(TokenKind::CloseParen)?;

    Ok(Some(expr))
}

/// ++ id
fn parse_increment(parser: &mut Parser) -> ExprResult {
    parse_step(parser, TokenKind::PlusPlus, Step::Increment)
}

/// -- id
fn parse_decrement(parser: &mut Parser) -> ExprResult {
    parse_step(parser, TokenKind::MinusMinus, Step::Decrement)
}

fn parse_step(parser: &mut Parser, kind: TokenKind, step: Step) -> ExprResult {
    if parser.current_token_kind() != kind {
        return Ok(None);
    }

    let operator = parser.advance().clone();
    let error = Error::new(
        ErrorImpl::syntax(&format!("`{}` must be followed by an identifier", kind)),
        parser.get_position(),
    );
    let name = parser.expect_error(TokenKind::Identifier, Some(error))?;
    let ident = parser.get_variable(&name.value, name.span.start.clone());

    let mut node = StepExpr::new(step, ident, operator.span.to(&name.span));
    if !node.finalize_op(parser.rules()) {
        let error = SemanticError::InvalidOperand {
            operand: node.ident().get_type(),
        };
        parser.report_semantic(error, operator.span.start.clone());
    }

    Ok(Some(char_to_int(ExprWrapper::new(node))))
}

/// & id [ Expr ]
fn parse_addr_of(parser: &mut Parser) -> ExprResult {
    if parser.current_token_kind() != TokenKind::Ampersand {
        return Ok(None);
    }

    let ampersand = parser.advance().clone();
    let error = Error::new(
        ErrorImpl::syntax("`&` must be followed by an identifier"),
        parser.get_position(),
    );
    let name = parser.expect_error(TokenKind::Identifier, Some(error))?;
    let ident = parser.get_variable(&name.value, name.span.start.clone());

    if parser.current_token_kind() != TokenKind::OpenBracket {
        return Err(Error::new(
            ErrorImpl::syntax("`&` only applies to an array element"),
            parser.get_position(),
        ));
    }

    if !accepts_subscript(parser, &ident) {
        let error = SemanticError::NotAnArray {
            name: ident.name().to_string(),
        };
        parser.report_semantic(error, name.span.start.clone());
    }

    let array = parse_array_sub(parser, ident, name.span)?;
    let span = ampersand.span.to(array.get_span());
    trace!("address of {}", array.sexpr());

    Ok(Some(ExprWrapper::new(AddrOfArray::new(array, span))))
}

/// Reports a caught error and skips past the closing `delimiter`.
pub(super) fn recover(parser: &mut Parser, error: Error, delimiter: TokenKind) -> Result<(), Error> {
    if error.is_eof() {
        return Err(error);
    }

    parser.report_error(error);
    skip_past(parser, delimiter)
}

fn skip_past(parser: &mut Parser, delimiter: TokenKind) -> Result<(), Error> {
    parser.resync(delimiter)?;
    parser.advance();
    Ok(())
}

/// Stand-in for a factor that failed a check.
fn placeholder(parser: &Parser, span: Span) -> ExprWrapper {
    ExprWrapper::new(IdentExpr::new(parser.symbols().dummy_variable(), span))
}
