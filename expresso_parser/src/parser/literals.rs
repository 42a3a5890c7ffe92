//! Literal and variable parsing

use crate::ast::{Expr, ExprKind, Literal};
use crate::error::{ParseError, ParseResult};
use crate::span::Span;
use crate::token::Token;

use super::Parser;

impl<'a> Parser<'a> {
    /// Parse a literal token using the value the lexer cooked for it
    pub(crate) fn parse_literal(&mut self) -> ParseResult<Expr> {
        let token = self.advance()?;
        let literal = match (token.token, token.literal) {
            (_, Some(literal)) => literal,
            (Token::True, None) => Literal::Bool(true),
            (Token::False, None) => Literal::Bool(false),
            (Token::Null, None) => Literal::Null,
            (_, None) => {
                return Err(ParseError::unexpected_token(
                    token.text,
                    "literal",
                    token.span,
                ))
            }
        };
        Ok(Expr::new(ExprKind::Literal(literal), token.span))
    }

    /// Parse `$name`; the `$` is not part of the variable name
    pub(crate) fn parse_dollar_variable(&mut self) -> ParseResult<Expr> {
        let token = self.expect(Token::Variable)?;
        let name = token.text.trim_start_matches('$');
        Ok(Expr::new(ExprKind::Variable(name.to_string()), token.span))
    }

    /// Parse an identifier as a property or function name
    pub(crate) fn parse_name(&mut self, expected: &str) -> ParseResult<(String, Span)> {
        if self.check(&Token::Identifier) {
            let token = self.advance()?;
            Ok((token.text.to_string(), token.span))
        } else {
            Err(ParseError::unexpected_token(
                self.current_text(),
                expected,
                self.current_span(),
            ))
        }
    }
}
