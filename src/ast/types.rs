//! Semantic types carried by identifiers and expression nodes.

use std::fmt::Display;

/// The closed set of value types in the language.
///
/// `Error` is the sentinel given to nodes that already failed a check; any
/// operation over it yields `Error` again without a further diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Type {
    Void,
    Int,
    Char,
    IntArray,
    CharArray,
    Function,
    Error,
}

impl Type {
    pub fn is_scalar(self) -> bool {
        matches!(self, Type::Int | Type::Char)
    }

    pub fn is_array(self) -> bool {
        matches!(self, Type::IntArray | Type::CharArray)
    }

    pub fn is_error(self) -> bool {
        self == Type::Error
    }

    /// Element type of an array type.
    pub fn element(self) -> Option<Type> {
        match self {
            Type::IntArray => Some(Type::Int),
            Type::CharArray => Some(Type::Char),
            _ => None,
        }
    }

    /// Array type whose elements are `self`.
    pub fn array_of(self) -> Option<Type> {
        match self {
            Type::Int => Some(Type::IntArray),
            Type::Char => Some(Type::CharArray),
            _ => None,
        }
    }
}

impl Display for Type {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let text = match self {
            Type::Void => "void",
            Type::Int => "int",
            Type::Char => "char",
            Type::IntArray => "int[]",
            Type::CharArray => "char[]",
            Type::Function => "function",
            Type::Error => "error",
        };

        write!(f, "{}", text)
    }
}
