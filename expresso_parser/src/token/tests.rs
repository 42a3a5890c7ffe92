//! Tests for token module

use super::*;
use logos::Logos;

#[test]
fn test_keywords() {
    let mut lexer = Token::lexer("true false null nullable");
    assert_eq!(lexer.next(), Some(Ok(Token::True)));
    assert_eq!(lexer.next(), Some(Ok(Token::False)));
    assert_eq!(lexer.next(), Some(Ok(Token::Null)));
    assert_eq!(lexer.next(), Some(Ok(Token::Identifier)));
    assert_eq!(lexer.next(), None);
}

#[test]
fn test_operators() {
    let mut lexer = Token::lexer("+ - * / % == != <= >= && || ! ?. ?? ?[ ? :");
    assert_eq!(lexer.next(), Some(Ok(Token::Plus)));
    assert_eq!(lexer.next(), Some(Ok(Token::Minus)));
    assert_eq!(lexer.next(), Some(Ok(Token::Star)));
    assert_eq!(lexer.next(), Some(Ok(Token::Slash)));
    assert_eq!(lexer.next(), Some(Ok(Token::Percent)));
    assert_eq!(lexer.next(), Some(Ok(Token::EqEq)));
    assert_eq!(lexer.next(), Some(Ok(Token::NotEq)));
    assert_eq!(lexer.next(), Some(Ok(Token::LtEq)));
    assert_eq!(lexer.next(), Some(Ok(Token::GtEq)));
    assert_eq!(lexer.next(), Some(Ok(Token::AndAnd)));
    assert_eq!(lexer.next(), Some(Ok(Token::OrOr)));
    assert_eq!(lexer.next(), Some(Ok(Token::Not)));
    assert_eq!(lexer.next(), Some(Ok(Token::QuestionDot)));
    assert_eq!(lexer.next(), Some(Ok(Token::QuestionQuestion)));
    assert_eq!(lexer.next(), Some(Ok(Token::QuestionBracket)));
    assert_eq!(lexer.next(), Some(Ok(Token::Question)));
    assert_eq!(lexer.next(), Some(Ok(Token::Colon)));
}

#[test]
fn test_numbers() {
    let mut lexer = Token::lexer("42 3.14 1e3 2.5E-3");
    assert_eq!(lexer.next(), Some(Ok(Token::Integer)));
    assert_eq!(lexer.next(), Some(Ok(Token::Float)));
    assert_eq!(lexer.next(), Some(Ok(Token::Float)));
    assert_eq!(lexer.next(), Some(Ok(Token::Float)));
}

#[test]
fn test_malformed_numbers() {
    for source in ["12abc", "1.2.3", "1e", "0x1F"] {
        let mut lexer = Token::lexer(source);
        assert_eq!(lexer.next(), Some(Ok(Token::MalformedNumber)), "{source}");
        assert_eq!(lexer.slice(), source);
    }
}

#[test]
fn test_identifiers_and_variables() {
    let mut lexer = Token::lexer("user _tmp2 $user");
    assert_eq!(lexer.next(), Some(Ok(Token::Identifier)));
    assert_eq!(lexer.next(), Some(Ok(Token::Identifier)));
    assert_eq!(lexer.next(), Some(Ok(Token::Variable)));
    assert_eq!(lexer.slice(), "$user");
}

#[test]
fn test_comments() {
    let mut lexer = Token::lexer("1 // rest\n/* x */");
    assert_eq!(lexer.next(), Some(Ok(Token::Integer)));
    assert_eq!(lexer.next(), Some(Ok(Token::LineComment)));
    assert_eq!(lexer.next(), Some(Ok(Token::BlockCommentStart)));
}

#[test]
fn test_unknown_character() {
    let mut lexer = Token::lexer("#");
    assert_eq!(lexer.next(), Some(Err(())));
}

// =============================================================================
// Classification and precedence
// =============================================================================

#[test]
fn test_token_class() {
    assert_eq!(Token::Integer.class(), TokenClass::Literal);
    assert_eq!(Token::Variable.class(), TokenClass::Identifier);
    assert_eq!(Token::QuestionDot.class(), TokenClass::Operator);
    assert_eq!(Token::Comma.class(), TokenClass::Punctuation);
    assert_eq!(Token::Eof.class(), TokenClass::EndOfInput);
    assert!(Token::LineComment.is_trivia());
}

#[test]
fn test_describe() {
    assert_eq!(Token::Eof.describe(), "end of input");
    assert_eq!(Token::RParen.describe(), ")");
    assert_eq!(Token::Float.describe(), "number");
}

#[test]
fn test_precedence_ordering() {
    let prec = |t: Token| t.binary_precedence().map(|(p, _)| p);

    assert!(prec(Token::Question) < prec(Token::QuestionQuestion));
    assert!(prec(Token::QuestionQuestion) < prec(Token::OrOr));
    assert!(prec(Token::OrOr) < prec(Token::AndAnd));
    assert!(prec(Token::AndAnd) < prec(Token::EqEq));
    assert!(prec(Token::EqEq) < prec(Token::Lt));
    assert!(prec(Token::Lt) < prec(Token::Plus));
    assert!(prec(Token::Plus) < prec(Token::Star));
    assert!(prec(Token::Star).unwrap() < Token::Minus.unary_precedence().unwrap());
    assert!(Token::Not.unary_precedence().unwrap() < Precedence::Postfix);
}

#[test]
fn test_associativity() {
    assert_eq!(
        Token::Question.binary_precedence(),
        Some((Precedence::Conditional, Associativity::Right))
    );
    assert_eq!(
        Token::Minus.binary_precedence(),
        Some((Precedence::Additive, Associativity::Left))
    );
    assert_eq!(Token::Dot.binary_precedence(), None);
}

#[test]
fn test_precedence_next() {
    assert_eq!(Precedence::Additive.next(), Precedence::Multiplicative);
    assert_eq!(Precedence::Postfix.next(), Precedence::Postfix);
}
