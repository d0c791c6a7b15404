use std::collections::HashMap;

use lazy_static::lazy_static;

use crate::{ast::operators::BinaryOperator, lexer::tokens::TokenKind};

/// Binary precedence levels, loosest first.
#[derive(PartialEq, Eq, PartialOrd, Ord, Clone, Copy, Debug, Hash)]
pub enum Precedence {
    LogicalOr,
    LogicalAnd,
    Relational,
    Additive,
    Multiplicative,
}

lazy_static! {
    /// Which level each binary operator token belongs to.
    pub static ref OPERATOR_LOOKUP: HashMap<TokenKind, (BinaryOperator, Precedence)> = {
        let mut map = HashMap::new();

        // Logical
        map.insert(TokenKind::Or, (BinaryOperator::Or, Precedence::LogicalOr));
        map.insert(TokenKind::And, (BinaryOperator::And, Precedence::LogicalAnd));

        // Relational
        map.insert(TokenKind::Equals, (BinaryOperator::Equals, Precedence::Relational));
        map.insert(TokenKind::NotEquals, (BinaryOperator::NotEquals, Precedence::Relational));
        map.insert(TokenKind::Less, (BinaryOperator::Less, Precedence::Relational));
        map.insert(TokenKind::Greater, (BinaryOperator::Greater, Precedence::Relational));

        // Additive and multiplicative
        map.insert(TokenKind::Plus, (BinaryOperator::Add, Precedence::Additive));
        map.insert(TokenKind::Dash, (BinaryOperator::Subtract, Precedence::Additive));
        map.insert(TokenKind::Star, (BinaryOperator::Multiply, Precedence::Multiplicative));
        map.insert(TokenKind::Slash, (BinaryOperator::Divide, Precedence::Multiplicative));
        map.insert(TokenKind::Percent, (BinaryOperator::Modulo, Precedence::Multiplicative));

        map
    };
}

/// The operator for `kind` if it belongs to `level`.
pub fn operator_at(kind: TokenKind, level: Precedence) -> Option<BinaryOperator> {
    match OPERATOR_LOOKUP.get(&kind) {
        Some((operator, precedence)) if *precedence == level => Some(*operator),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::{operator_at, Precedence, OPERATOR_LOOKUP};
    use crate::{ast::operators::BinaryOperator, lexer::tokens::TokenKind};

    #[test]
    fn test_operator_only_matches_its_level() {
        assert_eq!(operator_at(TokenKind::Plus, Precedence::Additive), Some(BinaryOperator::Add));
        assert_eq!(operator_at(TokenKind::Plus, Precedence::Multiplicative), None);
        assert_eq!(operator_at(TokenKind::Less, Precedence::Relational), Some(BinaryOperator::Less));
        assert_eq!(operator_at(TokenKind::Not, Precedence::LogicalOr), None);
    }

    #[test]
    fn test_lookup_agrees_with_token_mapping() {
        for (kind, (operator, _)) in OPERATOR_LOOKUP.iter() {
            assert_eq!(BinaryOperator::from_token(*kind), Some(*operator));
        }
        assert_eq!(OPERATOR_LOOKUP.len(), 11);
    }
}
