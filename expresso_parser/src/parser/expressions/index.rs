//! Index expression parsers

use crate::ast::{Expr, ExprKind};
use crate::error::{ParseError, ParseResult};
use crate::token::Token;

use crate::parser::Parser;

impl<'a> Parser<'a> {
    /// Parse `[index]` or `?[index]` after `target`
    pub(crate) fn parse_index_expression(&mut self, target: Expr) -> ParseResult<Expr> {
        let target_height = self.height;
        let open = self.advance()?;
        let null_safe = open.token == Token::QuestionBracket;

        if self.is_at_end() {
            return Err(ParseError::UnclosedBracket { span: open.span });
        }

        let index = self.parse_expression()?;

        if self.is_at_end() {
            return Err(ParseError::UnclosedBracket { span: open.span });
        }
        let close = self.expect(Token::RBracket)?;

        let span = self.span_between(&target.span, &close.span);
        self.height = self.height.max(target_height);
        self.grow(span)?;
        let (target, index) = (Box::new(target), Box::new(index));
        let kind = if null_safe {
            ExprKind::NullSafeIndex { target, index }
        } else {
            ExprKind::Index { target, index }
        };
        Ok(Expr::new(kind, span))
    }
}
