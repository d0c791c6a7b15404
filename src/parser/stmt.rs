//! Statement-level parser.
//!
//! ```text
//! Program    --> (Decl | Function)* EOF
//! Function   --> TypeSpec id ( Params ) CompoundStmt
//! Params     --> void | ε | Param (, Param)*
//! Param      --> TypeSpec id [ '[' ']' ]
//! Decl       --> TypeSpec id [ '[' constant? ']' ] [ = Expr ] ;
//! Stmt       --> CompoundStmt | if ( Expr ) Stmt [else Stmt] | while ( Expr ) Stmt
//!              | return [Expr] ; | ; | AssignStmt | Expr ;
//! AssignStmt --> id = Expr ; | id [ Expr ] = Expr ;
//! ```
//!
//! A statement beginning with an identifier is ambiguous until the token
//! after the identifier (or after its subscript) is seen. When it turns out
//! not to be an assignment, the already consumed part is handed to the
//! expression parser as a `Pending` value.

use std::rc::Rc;

use log::debug;

use crate::{
    ast::{
        ast::{Expr, ExprWrapper, Stmt, StmtWrapper},
        statements::{
            ArrayAssignStmt, AssignStmt, CompoundStmt, DeclStmt, ExpressionStmt, FunctionDecl,
            IfStmt, NullStmt, Program, ReturnStmt, WhileStmt,
        },
        types::Type,
    },
    errors::{
        diagnostics::SemanticError,
        errors::{Error, ErrorImpl},
    },
    lexer::tokens::{Token, TokenKind},
    symbols::symbols::{FunctionSignature, Symbol},
    Position, Span,
};

use super::{
    coercion::{char_to_int, int_to_char},
    expr::{parse_expr, parse_expr_after, Pending},
    factor::{accepts_subscript, parse_array_sub, recover, reject_subscript},
    parser::Parser,
    types::{array_type, parse_type},
};

pub fn parse_program(parser: &mut Parser) -> Result<Program, Error> {
    let start = parser.get_position();
    let mut globals = Vec::new();
    let mut functions = Vec::new();

    while parser.has_tokens() {
        if let Err(error) = parse_external(parser, &mut globals, &mut functions) {
            recover_statement(parser, error)?;
        }
    }

    Ok(Program {
        globals,
        functions,
        strings: parser.take_strings(),
        needs_printf: parser.needs_printf(),
        span: Span {
            start,
            end: parser.get_position(),
        },
    })
}

/// A global declaration or a function definition.
fn parse_external(
    parser: &mut Parser,
    globals: &mut Vec<DeclStmt>,
    functions: &mut Vec<FunctionDecl>,
) -> Result<(), Error> {
    let start = parser.get_position();
    let ty = parse_type(parser)?;
    let name = expect_identifier(parser, "expected an identifier after the type specifier")?;

    if parser.current_token_kind() == TokenKind::OpenParen {
        functions.push(parse_function(parser, ty, name, start)?);
    } else {
        globals.push(parse_declarator(parser, ty, name, start)?);
    }

    Ok(())
}

fn parse_function(
    parser: &mut Parser,
    return_type: Type,
    name: Token,
    start: Position,
) -> Result<FunctionDecl, Error> {
    parser.expect(TokenKind::OpenParen)?;

    // Parameters live in their own scope around the body
    parser.symbols_mut().enter_scope();
    let function = parse_function_rest(parser, return_type, name, start);
    parser.symbols_mut().exit_scope();
    parser.set_return_type(None);

    function
}

fn parse_function_rest(
    parser: &mut Parser,
    return_type: Type,
    name: Token,
    start: Position,
) -> Result<FunctionDecl, Error> {
    let params = parse_params(parser)?;
    parser.expect(TokenKind::CloseParen)?;

    let signature = FunctionSignature::new(
        return_type,
        params.iter().map(|param| param.get_type()).collect(),
    );
    let symbol = Symbol::function(&name.value, signature);
    let symbol = match parser.symbols_mut().declare_global(symbol.clone()) {
        Ok(symbol) => symbol,
        Err(_) => {
            report_redeclaration(parser, &name);
            Rc::new(symbol)
        }
    };

    debug!("parsing body of {}", name.value);
    parser.set_return_type(Some(return_type));
    let body = parse_block(parser)?;
    let span = Span {
        start,
        end: body.span.end.clone(),
    };

    Ok(FunctionDecl {
        symbol,
        params,
        body,
        span,
    })
}

/// Params --> void | ε | Param (, Param)*
fn parse_params(parser: &mut Parser) -> Result<Vec<Rc<Symbol>>, Error> {
    let mut params = Vec::new();

    if parser.current_token_kind() == TokenKind::CloseParen {
        return Ok(params);
    }

    loop {
        let ty = parse_type(parser)?;

        if ty == Type::Void && params.is_empty() && parser.current_token_kind() == TokenKind::CloseParen {
            return Ok(params);
        }

        let name = expect_identifier(parser, "expected a parameter name")?;
        let ty = if parser.peek_and_consume(TokenKind::OpenBracket) {
            parser.expect(TokenKind::CloseBracket)?;
            array_type(ty, &name.span.start)?
        } else {
            ty
        };

        if ty == Type::Void {
            return Err(Error::new(
                ErrorImpl::syntax(&format!("parameter `{}` declared void", name.value)),
                name.span.start.clone(),
            ));
        }

        params.push(declare(parser, Symbol::variable(&name.value, ty), &name));

        if !parser.peek_and_consume(TokenKind::Comma) {
            return Ok(params);
        }
    }
}

/// Everything of a declaration after `TypeSpec id`.
fn parse_declarator(
    parser: &mut Parser,
    ty: Type,
    name: Token,
    start: Position,
) -> Result<DeclStmt, Error> {
    let mut ty = ty;
    let mut size = None;

    if parser.peek_and_consume(TokenKind::OpenBracket) {
        ty = array_type(ty, &name.span.start)?;

        if parser.current_token_kind() == TokenKind::Constant {
            let token = parser.advance().clone();
            let parsed = token.value.parse::<usize>().map_err(|_| {
                Error::new(
                    ErrorImpl::NumberParseError { token: token.value.clone() },
                    token.span.start.clone(),
                )
            })?;
            size = Some(parsed);
        }

        parser.expect(TokenKind::CloseBracket)?;
    }

    if ty == Type::Void {
        return Err(Error::new(
            ErrorImpl::syntax(&format!("variable `{}` declared void", name.value)),
            name.span.start.clone(),
        ));
    }

    let symbol = declare(parser, Symbol::variable(&name.value, ty), &name);

    let initializer = if parser.current_token_kind() == TokenKind::Assignment {
        let position = parser.advance().span.start.clone();
        let value = expect_expr(parser, "expected an expression after `=`")?;
        Some(coerce(parser, ty, value, position, |target, value| {
            SemanticError::AssignmentType { target, value }
        }))
    } else {
        None
    };

    let semicolon = parser.expect(TokenKind::Semicolon)?;

    Ok(DeclStmt {
        symbol,
        size,
        initializer,
        span: Span {
            start,
            end: semicolon.span.end,
        },
    })
}

pub fn parse_stmt(parser: &mut Parser) -> Result<StmtWrapper, Error> {
    match parser.current_token_kind() {
        TokenKind::OpenCurly => Ok(StmtWrapper::new(parse_scoped_block(parser)?)),
        TokenKind::If => parse_if_stmt(parser),
        TokenKind::While => parse_while_stmt(parser),
        TokenKind::Return => parse_return_stmt(parser),
        TokenKind::Semicolon => {
            let span = parser.advance().span.clone();
            Ok(StmtWrapper::new(NullStmt { span }))
        }
        TokenKind::Identifier => parse_ident_stmt(parser),
        kind if kind.is_type_specifier() => {
            let start = parser.get_position();
            let ty = parse_type(parser)?;
            let name = expect_identifier(parser, "expected an identifier after the type specifier")?;
            Ok(StmtWrapper::new(parse_declarator(parser, ty, name, start)?))
        }
        _ => parse_expression_stmt(parser),
    }
}

/// CompoundStmt --> { Stmt* }
///
/// A statement that fails to parse is reported and replaced by a null
/// statement once the stream is past the next `;`.
fn parse_block(parser: &mut Parser) -> Result<CompoundStmt, Error> {
    let start = parser.expect(TokenKind::OpenCurly)?.span.start;

    let mut body = Vec::new();
    while parser.current_token_kind() != TokenKind::CloseCurly {
        if !parser.has_tokens() {
            return Err(Error::new(ErrorImpl::UnexpectedEof, parser.get_position()));
        }

        match parse_stmt(parser) {
            Ok(stmt) => body.push(stmt),
            Err(error) => body.push(StmtWrapper::new(recover_statement(parser, error)?)),
        }
    }

    let close = parser.expect(TokenKind::CloseCurly)?;

    Ok(CompoundStmt {
        body,
        span: Span {
            start,
            end: close.span.end,
        },
    })
}

fn parse_scoped_block(parser: &mut Parser) -> Result<CompoundStmt, Error> {
    parser.symbols_mut().enter_scope();
    let block = parse_block(parser);
    parser.symbols_mut().exit_scope();
    block
}

fn parse_if_stmt(parser: &mut Parser) -> Result<StmtWrapper, Error> {
    let start = parser.advance().span.start.clone();

    let condition = parse_condition(parser)?;
    let then_body = parse_stmt(parser)?;

    let else_body = if parser.peek_and_consume(TokenKind::Else) {
        Some(parse_stmt(parser)?)
    } else {
        None
    };

    let end = else_body.as_ref().unwrap_or(&then_body).get_span().end.clone();

    Ok(StmtWrapper::new(IfStmt {
        condition,
        then_body,
        else_body,
        span: Span { start, end },
    }))
}

fn parse_while_stmt(parser: &mut Parser) -> Result<StmtWrapper, Error> {
    let start = parser.advance().span.start.clone();

    let condition = parse_condition(parser)?;
    let body = parse_stmt(parser)?;
    let end = body.get_span().end.clone();

    Ok(StmtWrapper::new(WhileStmt {
        condition,
        body,
        span: Span { start, end },
    }))
}

/// ( Expr ), where the expression must be a scalar.
fn parse_condition(parser: &mut Parser) -> Result<ExprWrapper, Error> {
    parser.expect(TokenKind::OpenParen)?;
    let condition = expect_expr(parser, "expected a condition")?;
    parser.expect(TokenKind::CloseParen)?;

    let received = condition.get_type();
    if !received.is_scalar() && !received.is_error() {
        let position = condition.get_span().start.clone();
        parser.report_semantic(SemanticError::ConditionType { received }, position);
    }

    Ok(condition)
}

fn parse_return_stmt(parser: &mut Parser) -> Result<StmtWrapper, Error> {
    let keyword = parser.advance().clone();
    let expected = parser.return_type().unwrap_or(Type::Void);

    let value = match parse_expr(parser)? {
        Some(value) => Some(coerce(
            parser,
            expected,
            value,
            keyword.span.start.clone(),
            |expected, received| SemanticError::ReturnType { expected, received },
        )),
        None => {
            if expected != Type::Void {
                let error = SemanticError::ReturnType {
                    expected,
                    received: Type::Void,
                };
                parser.report_semantic(error, keyword.span.start.clone());
            }
            None
        }
    };

    let semicolon = parser.expect(TokenKind::Semicolon)?;

    Ok(StmtWrapper::new(ReturnStmt {
        value,
        span: keyword.span.to(&semicolon.span),
    }))
}

/// AssignStmt, or an expression statement that starts with an identifier.
fn parse_ident_stmt(parser: &mut Parser) -> Result<StmtWrapper, Error> {
    let token = parser.advance().clone();
    let ident = parser.get_variable(&token.value, token.span.start.clone());

    let pending = if parser.current_token_kind() != TokenKind::OpenBracket {
        Pending::Ident {
            ident,
            span: token.span.clone(),
        }
    } else if accepts_subscript(parser, &ident) {
        match parse_array_sub(parser, ident, token.span.clone()) {
            Ok(array) => Pending::Array(array),
            Err(error) => {
                // Contained to the brackets; the statement goes on with the placeholder
                recover(parser, error, TokenKind::CloseBracket)?;
                Pending::Ident {
                    ident: parser.symbols().dummy_variable(),
                    span: token.span.clone(),
                }
            }
        }
    } else {
        // The rest of the statement is checked against the placeholder
        reject_subscript(parser, &ident, &token.span)?;
        Pending::Ident {
            ident: parser.symbols().dummy_variable(),
            span: token.span.clone(),
        }
    };

    if parser.current_token_kind() != TokenKind::Assignment {
        let expression = parse_expr_after(parser, Some(pending))?.ok_or_else(|| {
            Error::new(ErrorImpl::syntax("expected an expression"), token.span.start.clone())
        })?;
        let semicolon = parser.expect(TokenKind::Semicolon)?;

        return Ok(StmtWrapper::new(ExpressionStmt {
            span: token.span.to(&semicolon.span),
            expression,
        }));
    }

    let position = parser.advance().span.start.clone();
    let value = expect_expr(parser, "expected an expression after `=`")?;
    let semicolon = parser.expect(TokenKind::Semicolon)?;
    let span = token.span.to(&semicolon.span);
    let mismatch = |target, value| SemanticError::AssignmentType { target, value };

    match pending {
        Pending::Ident { ident, .. } => {
            let value = coerce(parser, ident.get_type(), value, position, mismatch);
            Ok(StmtWrapper::new(AssignStmt {
                target: ident,
                value,
                span,
            }))
        }
        Pending::Array(target) => {
            let value = coerce(parser, target.get_type(), value, position, mismatch);
            Ok(StmtWrapper::new(ArrayAssignStmt {
                target,
                value,
                span,
            }))
        }
    }
}

fn parse_expression_stmt(parser: &mut Parser) -> Result<StmtWrapper, Error> {
    let token = parser.current_token().clone();
    let expression = parse_expr(parser)?.ok_or_else(|| {
        Error::new(
            ErrorImpl::UnexpectedTokenDetailed {
                token: token.to_string(),
                message: String::from("expected a statement"),
            },
            token.span.start.clone(),
        )
    })?;
    let semicolon = parser.expect(TokenKind::Semicolon)?;

    Ok(StmtWrapper::new(ExpressionStmt {
        span: token.span.to(&semicolon.span),
        expression,
    }))
}

/// Fits `value` to a `target` type, inserting a `char`/`int` conversion
/// where one applies and reporting `mismatch` otherwise.
fn coerce(
    parser: &mut Parser,
    target: Type,
    value: ExprWrapper,
    position: Position,
    mismatch: impl FnOnce(Type, Type) -> SemanticError,
) -> ExprWrapper {
    let received = value.get_type();
    if target.is_error() || received.is_error() || target == received {
        return value;
    }

    match (target, received) {
        (Type::Char, Type::Int) => int_to_char(value),
        (Type::Int, Type::Char) => char_to_int(value),
        _ => {
            parser.report_semantic(mismatch(target, received), position);
            value
        }
    }
}

/// Reports a caught error and skips past the next `;`.
fn recover_statement(parser: &mut Parser, error: Error) -> Result<NullStmt, Error> {
    if error.is_eof() {
        return Err(error);
    }

    let position = error.get_position().clone();
    parser.report_error(error);
    parser.resync(TokenKind::Semicolon)?;
    parser.advance();

    Ok(NullStmt {
        span: Span {
            start: position,
            end: parser.get_position(),
        },
    })
}

fn declare(parser: &mut Parser, symbol: Symbol, name: &Token) -> Rc<Symbol> {
    match parser.symbols_mut().declare(symbol.clone()) {
        Ok(symbol) => symbol,
        Err(_) => {
            report_redeclaration(parser, name);
            Rc::new(symbol)
        }
    }
}

fn report_redeclaration(parser: &mut Parser, name: &Token) {
    let error = SemanticError::Redeclaration {
        name: name.value.clone(),
    };
    parser.report_semantic(error, name.span.start.clone());
}

fn expect_identifier(parser: &mut Parser, message: &str) -> Result<Token, Error> {
    let error = Error::new(
        ErrorImpl::UnexpectedTokenDetailed {
            token: parser.current_token().to_string(),
            message: String::from(message),
        },
        parser.get_position(),
    );
    parser.expect_error(TokenKind::Identifier, Some(error))
}

fn expect_expr(parser: &mut Parser, message: &str) -> Result<ExprWrapper, Error> {
    let position = parser.get_position();
    parse_expr(parser)?.ok_or_else(|| Error::new(ErrorImpl::syntax(message), position))
}
