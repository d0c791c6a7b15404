//! Type-compatibility policy consulted when operator nodes are finalized.
//!
//! Nodes handle the `Error` sentinel themselves before asking the policy,
//! so implementations only see operand types that have not failed yet.

use std::fmt::Debug;

use super::{operators::BinaryOperator, types::Type};

pub trait TypeRules: Debug {
    /// Result type of `lhs <operator> rhs`, or `None` if the mix is invalid.
    fn binary(&self, operator: BinaryOperator, lhs: Type, rhs: Type) -> Option<Type>;
    /// Result type of `!operand`.
    fn not(&self, operand: Type) -> Option<Type>;
    /// Result type of `++x` / `--x` for an identifier of type `operand`.
    fn step(&self, operand: Type) -> Option<Type>;
}

/// Every operator takes two scalars (`int` or `char`) and yields `int`.
#[derive(Debug, Default, Clone, Copy)]
pub struct StandardRules;

impl TypeRules for StandardRules {
    fn binary(&self, _operator: BinaryOperator, lhs: Type, rhs: Type) -> Option<Type> {
        if lhs.is_scalar() && rhs.is_scalar() {
            Some(Type::Int)
        } else {
            None
        }
    }

    fn not(&self, operand: Type) -> Option<Type> {
        operand.is_scalar().then_some(Type::Int)
    }

    fn step(&self, operand: Type) -> Option<Type> {
        operand.is_scalar().then_some(operand)
    }
}

#[cfg(test)]
mod tests {
    use super::{StandardRules, TypeRules};
    use crate::ast::{operators::BinaryOperator, types::Type};

    #[test]
    fn test_scalars_combine_to_int() {
        let rules = StandardRules;

        assert_eq!(rules.binary(BinaryOperator::Add, Type::Int, Type::Int), Some(Type::Int));
        assert_eq!(rules.binary(BinaryOperator::Less, Type::Char, Type::Int), Some(Type::Int));
        assert_eq!(rules.binary(BinaryOperator::Or, Type::Char, Type::Char), Some(Type::Int));
    }

    #[test]
    fn test_arrays_and_void_are_rejected() {
        let rules = StandardRules;

        assert_eq!(rules.binary(BinaryOperator::Add, Type::CharArray, Type::Int), None);
        assert_eq!(rules.binary(BinaryOperator::Equals, Type::IntArray, Type::IntArray), None);
        assert_eq!(rules.binary(BinaryOperator::Multiply, Type::Void, Type::Int), None);
        assert_eq!(rules.not(Type::IntArray), None);
        assert_eq!(rules.step(Type::Function), None);
    }

    #[test]
    fn test_step_keeps_operand_type() {
        let rules = StandardRules;

        assert_eq!(rules.step(Type::Char), Some(Type::Char));
        assert_eq!(rules.not(Type::Char), Some(Type::Int));
    }
}
