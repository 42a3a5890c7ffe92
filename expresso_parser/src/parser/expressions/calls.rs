//! Call expression parsers

use crate::ast::{Expr, ExprKind};
use crate::error::{ParseError, ParseResult};
use crate::span::Span;
use crate::token::Token;

use crate::parser::Parser;

impl<'a> Parser<'a> {
    /// Parse a free function call; the current token is `(` after `name`
    pub(crate) fn parse_call_expression(
        &mut self,
        name: String,
        name_span: Span,
    ) -> ParseResult<Expr> {
        let (args, close) = self.parse_call_arguments()?;
        let span = self.span_between(&name_span, &close);
        self.grow(span)?;
        Ok(Expr::new(ExprKind::Call { name, args }, span))
    }

    /// Parse `(arg, ...)` and return the arguments with the span of the `)`
    ///
    /// Leaves `self.height` at the tallest argument, or 0 for no arguments.
    pub(crate) fn parse_call_arguments(&mut self) -> ParseResult<(Vec<Expr>, Span)> {
        let open = self.expect(Token::LParen)?;
        let mut args = Vec::new();
        let mut height = 0;

        // Check for empty call
        if !self.check(&Token::RParen) {
            loop {
                if self.is_at_end() {
                    return Err(ParseError::UnclosedParenthesis { span: open.span });
                }
                args.push(self.parse_expression()?);
                height = height.max(self.height);
                if !self.check(&Token::Comma) {
                    break;
                }
                self.advance()?;
            }
        }

        if self.is_at_end() {
            return Err(ParseError::UnclosedParenthesis { span: open.span });
        }
        let close = self.expect(Token::RParen)?;
        self.height = height;
        Ok((args, close.span))
    }
}
