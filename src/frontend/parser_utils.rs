use super::grammar::BinaryOperator;
use super::token::Token;

#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Clone, Copy)]
pub enum Precedence {
    // Lowest precedence
    Lowest,
    Additive,
    Multiplicative, // Highest precedence
}

impl BinaryOperator {
    pub fn from_token(token: &Token) -> Option<BinaryOperator> {
        let op = match token {
            Token::Plus => BinaryOperator::Add,
            Token::Minus => BinaryOperator::Subtract,
            Token::Asterisk => BinaryOperator::Multiply,
            Token::Slash => BinaryOperator::Divide,
            Token::Percent => BinaryOperator::Modulo,
            Token::Caret => BinaryOperator::Power,
            _ => return None,
        };
        Some(op)
    }

    /// `^` shares the multiplicative tier; there is no separate exponent tier.
    pub fn precedence(&self) -> Precedence {
        match self {
            BinaryOperator::Add | BinaryOperator::Subtract => Precedence::Additive,
            BinaryOperator::Multiply
            | BinaryOperator::Divide
            | BinaryOperator::Modulo
            | BinaryOperator::Power => Precedence::Multiplicative,
        }
    }

    /// All binary operators are left associative, so an operator only binds
    /// when it is strictly tighter than the surrounding one.
    pub fn is_higher_precedence(&self, min_precedence: Precedence) -> bool {
        self.precedence() > min_precedence
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ::more_asserts::*;

    #[test]
    fn test_precedence() {
        assert_lt!(Precedence::Lowest, Precedence::Additive);
        assert_gt!(Precedence::Multiplicative, Precedence::Additive);
        assert_eq!(
            BinaryOperator::Power.precedence(),
            BinaryOperator::Multiply.precedence()
        );
    }

    #[test]
    fn test_operators() {
        assert_eq!(
            BinaryOperator::from_token(&Token::Plus),
            Some(BinaryOperator::Add)
        );
        assert_eq!(
            BinaryOperator::from_token(&Token::Caret),
            Some(BinaryOperator::Power)
        );
        assert_eq!(BinaryOperator::from_token(&Token::Equals), None);
    }

    #[test]
    fn test_left_associativity() {
        assert!(BinaryOperator::Add.is_higher_precedence(Precedence::Lowest));
        assert!(!BinaryOperator::Add.is_higher_precedence(Precedence::Additive));
        assert!(BinaryOperator::Modulo.is_higher_precedence(Precedence::Additive));
        assert!(!BinaryOperator::Divide.is_higher_precedence(Precedence::Multiplicative));
    }
}
