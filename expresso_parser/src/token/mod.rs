//! Token definitions for the expression lexer

mod precedence;

#[cfg(test)]
mod tests;

use logos::Logos;

pub use precedence::{Associativity, Precedence};

/// Expression tokens
///
/// Strings and block comments only produce their opening delimiter here;
/// the [`Lexer`](crate::lexer::Lexer) scans the rest by hand.
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[logos(skip r"[ \t\r\n\f]+")]
pub enum Token {
    // ==================== Keywords ====================
    #[token("true")]
    True,
    #[token("false")]
    False,
    #[token("null")]
    Null,

    // ==================== Names ====================
    #[regex(r"[A-Za-z_][A-Za-z0-9_]*")]
    Identifier,
    /// `$name`, an alternative spelling of a context variable
    #[regex(r"\$[A-Za-z_][A-Za-z0-9_]*")]
    Variable,

    // ==================== Literals ====================
    #[regex(r"[0-9]+", priority = 5)]
    Integer,
    #[regex(
        r"[0-9]+\.[0-9]+([eE][+-]?[0-9]+)?|[0-9]+[eE][+-]?[0-9]+",
        priority = 5
    )]
    Float,
    // Digits glued to letters or extra dots: `12abc`, `1.2.3`, `1e`
    #[regex(r"[0-9][0-9A-Za-z_]*(\.[0-9][0-9A-Za-z_]*)*", priority = 1)]
    MalformedNumber,

    #[token("\"")]
    DoubleQuote,
    #[token("'")]
    SingleQuote,

    // ==================== Comments ====================
    #[regex(r"//[^\n]*")]
    LineComment,
    #[token("/*")]
    BlockCommentStart,

    // ==================== Operators ====================
    #[token("+")]
    Plus,
    #[token("-")]
    Minus,
    #[token("*")]
    Star,
    #[token("/")]
    Slash,
    #[token("%")]
    Percent,
    #[token("==")]
    EqEq,
    #[token("!=")]
    NotEq,
    #[token("<")]
    Lt,
    #[token("<=")]
    LtEq,
    #[token(">")]
    Gt,
    #[token(">=")]
    GtEq,
    #[token("&&")]
    AndAnd,
    #[token("||")]
    OrOr,
    #[token("!")]
    Not,
    #[token("?")]
    Question,
    #[token(":")]
    Colon,
    #[token("?.")]
    QuestionDot,
    #[token("??")]
    QuestionQuestion,
    #[token("?[")]
    QuestionBracket,
    #[token(".")]
    Dot,

    // ==================== Punctuation ====================
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token("[")]
    LBracket,
    #[token("]")]
    RBracket,
    #[token(",")]
    Comma,

    // ==================== End of input ====================
    Eof,
}

/// Coarse grouping of tokens, used in diagnostics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenClass {
    Literal,
    Identifier,
    Operator,
    Punctuation,
    Comment,
    EndOfInput,
}

impl Token {
    pub fn class(&self) -> TokenClass {
        match self {
            Token::True
            | Token::False
            | Token::Null
            | Token::Integer
            | Token::Float
            | Token::MalformedNumber
            | Token::DoubleQuote
            | Token::SingleQuote => TokenClass::Literal,
            Token::Identifier | Token::Variable => TokenClass::Identifier,
            Token::LineComment | Token::BlockCommentStart => TokenClass::Comment,
            Token::LParen | Token::RParen | Token::LBracket | Token::RBracket | Token::Comma => {
                TokenClass::Punctuation
            }
            Token::Eof => TokenClass::EndOfInput,
            _ => TokenClass::Operator,
        }
    }

    /// Check if this token is a literal
    pub fn is_literal(&self) -> bool {
        self.class() == TokenClass::Literal
    }

    /// Check if this token is an operator
    pub fn is_operator(&self) -> bool {
        self.class() == TokenClass::Operator
    }

    pub fn is_trivia(&self) -> bool {
        self.class() == TokenClass::Comment
    }

    /// Check if an expression may start with this token
    pub fn starts_expression(&self) -> bool {
        matches!(
            self,
            Token::True
                | Token::False
                | Token::Null
                | Token::Identifier
                | Token::Variable
                | Token::Integer
                | Token::Float
                | Token::DoubleQuote
                | Token::SingleQuote
                | Token::Minus
                | Token::Not
                | Token::LParen
        )
    }

    /// Fixed source text of operator and punctuation tokens
    pub fn symbol(&self) -> Option<&'static str> {
        Some(match self {
            Token::True => "true",
            Token::False => "false",
            Token::Null => "null",
            Token::Plus => "+",
            Token::Minus => "-",
            Token::Star => "*",
            Token::Slash => "/",
            Token::Percent => "%",
            Token::EqEq => "==",
            Token::NotEq => "!=",
            Token::Lt => "<",
            Token::LtEq => "<=",
            Token::Gt => ">",
            Token::GtEq => ">=",
            Token::AndAnd => "&&",
            Token::OrOr => "||",
            Token::Not => "!",
            Token::Question => "?",
            Token::Colon => ":",
            Token::QuestionDot => "?.",
            Token::QuestionQuestion => "??",
            Token::QuestionBracket => "?[",
            Token::Dot => ".",
            Token::LParen => "(",
            Token::RParen => ")",
            Token::LBracket => "[",
            Token::RBracket => "]",
            Token::Comma => ",",
            _ => return None,
        })
    }

    /// Human readable description used in error messages
    pub fn describe(&self) -> &'static str {
        match self {
            Token::Identifier => "identifier",
            Token::Variable => "variable",
            Token::Integer | Token::Float | Token::MalformedNumber => "number",
            Token::DoubleQuote | Token::SingleQuote => "string",
            Token::LineComment | Token::BlockCommentStart => "comment",
            Token::Eof => "end of input",
            other => other.symbol().unwrap_or("token"),
        }
    }
}
