//! Type specifier parsing.
//!
//! ```text
//! TypeSpec --> int | char | void
//! ```
//!
//! Array types are written on the declarator (`int a[10]`, `char s[]`) and
//! are folded in by the statement parser through `Type::array_of`.

use crate::{
    ast::types::Type,
    errors::errors::{Error, ErrorImpl},
    lexer::tokens::TokenKind,
};

use super::parser::Parser;

/// Maps a type keyword to its type.
pub fn type_of_keyword(kind: TokenKind) -> Option<Type> {
    match kind {
        TokenKind::Int => Some(Type::Int),
        TokenKind::Char => Some(Type::Char),
        TokenKind::Void => Some(Type::Void),
        _ => None,
    }
}

pub fn parse_type(parser: &mut Parser) -> Result<Type, Error> {
    let token = parser.current_token();

    match type_of_keyword(token.kind) {
        Some(ty) => {
            parser.advance();
            Ok(ty)
        }
        None => Err(Error::new(
            ErrorImpl::UnexpectedTokenDetailed {
                token: token.to_string(),
                message: String::from("expected a type specifier"),
            },
            token.span.start.clone(),
        )),
    }
}

/// Applies a `[]` declarator suffix to `ty`.
pub fn array_type(ty: Type, position: &crate::Position) -> Result<Type, Error> {
    ty.array_of().ok_or_else(|| {
        Error::new(
            ErrorImpl::syntax(&format!("cannot declare an array of `{}`", ty)),
            position.clone(),
        )
    })
}
