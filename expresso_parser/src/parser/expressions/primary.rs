//! Primary expression parsers

use crate::ast::{Expr, ExprKind};
use crate::error::{ParseError, ParseResult};
use crate::token::Token;

use crate::parser::Parser;

impl<'a> Parser<'a> {
    /// Parse a primary expression (literals, names, calls, parenthesized expressions)
    pub(crate) fn parse_primary(&mut self) -> ParseResult<Expr> {
        match self.current_token() {
            // Literals
            Token::Integer
            | Token::Float
            | Token::DoubleQuote
            | Token::SingleQuote
            | Token::True
            | Token::False
            | Token::Null => {
                self.height = 1;
                self.parse_literal()
            }

            Token::Variable => {
                self.height = 1;
                self.parse_dollar_variable()
            }

            // Variable reference or function call
            Token::Identifier => {
                let (name, span) = self.parse_name("identifier")?;
                if self.check(&Token::LParen) {
                    self.parse_call_expression(name, span)
                } else {
                    self.height = 1;
                    Ok(Expr::new(ExprKind::Variable(name), span))
                }
            }

            Token::LParen => self.parse_parenthesized(),

            _ => Err(ParseError::unexpected_token(
                self.current_text(),
                "expression",
                self.current_span(),
            )),
        }
    }

    /// Parse `( expr )`; the node's span is widened to cover the parens
    ///
    /// Parentheses add no tree level.
    fn parse_parenthesized(&mut self) -> ParseResult<Expr> {
        let open = self.expect(Token::LParen)?;

        if self.is_at_end() {
            return Err(ParseError::UnclosedParenthesis { span: open.span });
        }

        let mut inner = self.parse_expression()?;

        if self.is_at_end() {
            return Err(ParseError::UnclosedParenthesis { span: open.span });
        }
        let close = self.expect(Token::RParen)?;

        inner.span = self.span_between(&open.span, &close.span);
        Ok(inner)
    }
}
