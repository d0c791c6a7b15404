//! Recoverable diagnostics.
//!
//! Semantic errors never unwind: the parser records them here and keeps
//! going with a placeholder so one compilation can report many of them.
//! Fatal errors caught by a resynchronizing construct are recorded here too.

use std::fmt::Display;

use log::debug;
use thiserror::Error;

use crate::{ast::types::Type, render_report, Position};

use super::errors::{Error, ErrorImpl, ErrorTip};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SemanticError {
    #[error("cannot perform operation between type `{lhs}` and `{rhs}`")]
    InvalidOperands { lhs: Type, rhs: Type },
    #[error("cannot perform operation on type `{operand}`")]
    InvalidOperand { operand: Type },
    #[error("use of undeclared identifier '{name}'")]
    UndeclaredIdentifier { name: String },
    #[error("'{name}' is not an array")]
    NotAnArray { name: String },
    #[error("'{name}' is not a function")]
    NotAFunction { name: String },
    #[error("function {function} takes only {expected} arguments")]
    TooManyArguments { function: String, expected: usize },
    #[error("function {function} requires {expected} arguments")]
    TooFewArguments { function: String, expected: usize },
    #[error("expected expression of type `{expected}`")]
    ArgumentType { expected: Type },
    #[error("the first parameter to printf must be a char[]")]
    FormatStringRequired,
    #[error("printf requires a minimum of one argument")]
    FormatArgumentsRequired,
    #[error("invalid redeclaration of identifier '{name}'")]
    Redeclaration { name: String },
    #[error("cannot assign an expression of type `{value}` to `{target}`")]
    AssignmentType { target: Type, value: Type },
    #[error("expected a return value of type `{expected}`, received `{received}`")]
    ReturnType { expected: Type, received: Type },
    #[error("array subscript must be an integer, received `{received}`")]
    SubscriptType { received: Type },
    #[error("condition must be an integer expression, received `{received}`")]
    ConditionType { received: Type },
}

impl SemanticError {
    pub fn get_error_name(&self) -> &str {
        match self {
            SemanticError::InvalidOperands { .. } => "InvalidOperands",
            SemanticError::InvalidOperand { .. } => "InvalidOperand",
            SemanticError::UndeclaredIdentifier { .. } => "UndeclaredIdentifier",
            SemanticError::NotAnArray { .. } => "NotAnArray",
            SemanticError::NotAFunction { .. } => "NotAFunction",
            SemanticError::TooManyArguments { .. } => "TooManyArguments",
            SemanticError::TooFewArguments { .. } => "TooFewArguments",
            SemanticError::ArgumentType { .. } => "ArgumentType",
            SemanticError::FormatStringRequired => "FormatStringRequired",
            SemanticError::FormatArgumentsRequired => "FormatArgumentsRequired",
            SemanticError::Redeclaration { .. } => "Redeclaration",
            SemanticError::AssignmentType { .. } => "AssignmentType",
            SemanticError::ReturnType { .. } => "ReturnType",
            SemanticError::SubscriptType { .. } => "SubscriptType",
            SemanticError::ConditionType { .. } => "ConditionType",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum DiagnosticKind {
    Syntax(ErrorImpl),
    Semantic(SemanticError),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    pub position: Position,
}

impl Diagnostic {
    pub fn is_semantic(&self) -> bool {
        matches!(self.kind, DiagnosticKind::Semantic(_))
    }

    pub fn get_error_name(&self) -> &str {
        match &self.kind {
            DiagnosticKind::Syntax(error) => error.get_error_name(),
            DiagnosticKind::Semantic(error) => error.get_error_name(),
        }
    }

    pub fn message(&self) -> String {
        match &self.kind {
            DiagnosticKind::Syntax(error) => error.to_string(),
            DiagnosticKind::Semantic(error) => error.to_string(),
        }
    }

    /// Caret-style rendering against the source text. Syntax errors carry
    /// their tip on a trailing `= ` line.
    pub fn render(&self, source: &str) -> String {
        let severity = if self.is_semantic() { "Semantic error" } else { "Error" };
        let headline = format!("{}: {} ({})", severity, self.get_error_name(), self.message());
        let mut report = render_report(&headline, &self.position, source);

        if let DiagnosticKind::Syntax(error) = &self.kind {
            if let ErrorTip::Suggestion(tip) = error.get_tip() {
                report.push_str(&format!("\n= {}", tip));
            }
        }

        report
    }
}

impl Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.position, self.message())
    }
}

impl From<Error> for Diagnostic {
    fn from(error: Error) -> Self {
        let position = error.get_position().clone();

        Diagnostic {
            kind: DiagnosticKind::Syntax(error.into_impl()),
            position,
        }
    }
}

/// Ordered collection of everything reported during one parse.
#[derive(Debug, Default, Clone)]
pub struct Diagnostics {
    entries: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Diagnostics::default()
    }

    pub fn semantic(&mut self, error: SemanticError, position: Position) {
        debug!("semantic error at {}: {}", position, error);
        self.entries.push(Diagnostic {
            kind: DiagnosticKind::Semantic(error),
            position,
        });
    }

    pub fn syntax(&mut self, error: Error) {
        debug!("syntax error at {}", error);
        self.entries.push(Diagnostic::from(error));
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Diagnostic> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn semantic_count(&self) -> usize {
        self.entries.iter().filter(|d| d.is_semantic()).count()
    }

    pub fn syntax_count(&self) -> usize {
        self.entries.len() - self.semantic_count()
    }
}

impl<'a> IntoIterator for &'a Diagnostics {
    type Item = &'a Diagnostic;
    type IntoIter = std::slice::Iter<'a, Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
