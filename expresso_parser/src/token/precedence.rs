//! Operator precedence and associativity definitions

use super::Token;

/// Operator precedence levels, lowest first
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[repr(i8)]
pub enum Precedence {
    /// Entry level for a full expression
    Lowest = 0,
    /// Conditional: ? :
    Conditional = 1,
    /// Null coalescing: ??
    Coalesce = 2,
    /// Logical or: ||
    LogicalOr = 3,
    /// Logical and: &&
    LogicalAnd = 4,
    /// Equality: ==, !=
    Equality = 5,
    /// Relational: <, <=, >, >=
    Relational = 6,
    /// Additive: +, -
    Additive = 7,
    /// Multiplicative: *, /, %
    Multiplicative = 8,
    /// Prefix: -, !
    Unary = 9,
    /// Member access, indexing and calls
    Postfix = 10,
}

impl Precedence {
    /// The next tighter level, saturating at `Postfix`
    pub fn next(self) -> Precedence {
        Precedence::try_from(self as i8 + 1).unwrap_or(Precedence::Postfix)
    }
}

impl TryFrom<i8> for Precedence {
    type Error = ();

    fn try_from(value: i8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Precedence::Lowest),
            1 => Ok(Precedence::Conditional),
            2 => Ok(Precedence::Coalesce),
            3 => Ok(Precedence::LogicalOr),
            4 => Ok(Precedence::LogicalAnd),
            5 => Ok(Precedence::Equality),
            6 => Ok(Precedence::Relational),
            7 => Ok(Precedence::Additive),
            8 => Ok(Precedence::Multiplicative),
            9 => Ok(Precedence::Unary),
            10 => Ok(Precedence::Postfix),
            _ => Err(()),
        }
    }
}

/// Operator associativity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Associativity {
    Left,
    Right,
}

impl Token {
    /// Get the precedence and associativity of an infix operator
    ///
    /// The ternary `?` is listed here too; the parser handles its `:` arm.
    pub fn binary_precedence(&self) -> Option<(Precedence, Associativity)> {
        use Associativity::{Left, Right};
        use Precedence::*;

        Some(match self {
            Token::Question => (Conditional, Right),
            Token::QuestionQuestion => (Coalesce, Left),
            Token::OrOr => (LogicalOr, Left),
            Token::AndAnd => (LogicalAnd, Left),
            Token::EqEq | Token::NotEq => (Equality, Left),
            Token::Lt | Token::LtEq | Token::Gt | Token::GtEq => (Relational, Left),
            Token::Plus | Token::Minus => (Additive, Left),
            Token::Star | Token::Slash | Token::Percent => (Multiplicative, Left),
            _ => return None,
        })
    }

    /// Get the precedence of a unary operator
    pub fn unary_precedence(&self) -> Option<Precedence> {
        match self {
            Token::Minus | Token::Not => Some(Precedence::Unary),
            _ => None,
        }
    }

    /// Check if this token opens a postfix segment (`.`, `?.`, `[`, `?[`, `(`)
    pub fn is_postfix(&self) -> bool {
        matches!(
            self,
            Token::Dot
                | Token::QuestionDot
                | Token::LBracket
                | Token::QuestionBracket
                | Token::LParen
        )
    }
}
