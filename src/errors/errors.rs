use std::fmt::Display;

use thiserror::Error;

use crate::{lexer::tokens::TokenKind, Position};

/// A fatal (structural) error. Parsing functions return it through `?`,
/// unwinding to the nearest construct able to resynchronize.
#[derive(Debug, Clone, PartialEq)]
pub struct Error {
    internal_error: ErrorImpl,
    position: Position,
}

impl Error {
    pub fn new(error_impl: ErrorImpl, position: Position) -> Self {
        Error {
            internal_error: error_impl,
            position,
        }
    }

    pub fn get_position(&self) -> &Position {
        &self.position
    }

    pub fn get_impl(&self) -> &ErrorImpl {
        &self.internal_error
    }

    pub fn into_impl(self) -> ErrorImpl {
        self.internal_error
    }

    pub fn is_eof(&self) -> bool {
        matches!(self.internal_error, ErrorImpl::UnexpectedEof)
    }

    pub fn get_error_name(&self) -> &str {
        self.internal_error.get_error_name()
    }

    pub fn get_tip(&self) -> ErrorTip {
        self.internal_error.get_tip()
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.position, self.internal_error)
    }
}

pub enum ErrorTip {
    None,
    Suggestion(String),
}

impl Display for ErrorTip {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorTip::None => write!(f, ""),
            ErrorTip::Suggestion(suggestion) => write!(f, "{}", suggestion),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ErrorImpl {
    #[error("unrecognised token: {token:?}")]
    UnrecognisedToken { token: String },
    #[error("unexpected token: {token:?}")]
    UnexpectedToken { token: String },
    #[error("unexpected token ({message}): {token:?}")]
    UnexpectedTokenDetailed { token: String, message: String },
    #[error("error parsing constant: {token:?}")]
    NumberParseError { token: String },
    #[error("missing operand for operator `{operator}`")]
    OperandMissing { operator: TokenKind },
    #[error("{message}")]
    InvalidSyntax { message: String },
    #[error("unexpected end of file")]
    UnexpectedEof,
}

impl ErrorImpl {
    pub fn get_error_name(&self) -> &str {
        match self {
            ErrorImpl::UnrecognisedToken { .. } => "UnrecognisedToken",
            ErrorImpl::UnexpectedToken { .. } => "UnexpectedToken",
            ErrorImpl::UnexpectedTokenDetailed { .. } => "UnexpectedTokenDetailed",
            ErrorImpl::NumberParseError { .. } => "NumberParseError",
            ErrorImpl::OperandMissing { .. } => "OperandMissing",
            ErrorImpl::InvalidSyntax { .. } => "InvalidSyntax",
            ErrorImpl::UnexpectedEof => "UnexpectedEof",
        }
    }

    pub fn get_tip(&self) -> ErrorTip {
        match self {
            ErrorImpl::UnrecognisedToken { .. } => ErrorTip::None,
            ErrorImpl::UnexpectedToken { token } => ErrorTip::Suggestion(format!(
                "Unexpected token: `{}`, did you miss a semicolon?",
                token
            )),
            ErrorImpl::UnexpectedTokenDetailed { token, message } => {
                ErrorTip::Suggestion(format!("Unexpected token: `{}`, {}", token, message))
            }
            ErrorImpl::NumberParseError { token } => ErrorTip::Suggestion(format!(
                "Invalid constant: `{}`, is it above the integer limit?",
                token
            )),
            ErrorImpl::OperandMissing { operator } => ErrorTip::Suggestion(format!(
                "Operator `{}` must be followed by an operand",
                operator
            )),
            ErrorImpl::InvalidSyntax { .. } => ErrorTip::None,
            ErrorImpl::UnexpectedEof => ErrorTip::Suggestion(String::from(
                "Reached the end of the file while recovering from an earlier error",
            )),
        }
    }

    pub fn syntax(message: &str) -> Self {
        ErrorImpl::InvalidSyntax {
            message: String::from(message),
        }
    }
}
