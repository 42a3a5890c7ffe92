//! Member access and method call parsers

use crate::ast::{Expr, ExprKind};
use crate::error::ParseResult;
use crate::token::Token;

use crate::parser::Parser;

impl<'a> Parser<'a> {
    /// Parse `.name`, `?.name`, `.name(args)` or `?.name(args)` after `object`
    pub(crate) fn parse_field_expression(&mut self, object: Expr) -> ParseResult<Expr> {
        let object_height = self.height;
        let dot = self.advance()?;
        let null_safe = dot.token == Token::QuestionDot;

        let (name, name_span) = self.parse_name("property name")?;

        if self.check(&Token::LParen) {
            let (args, close) = self.parse_call_arguments()?;
            let span = self.span_between(&object.span, &close);
            self.height = self.height.max(object_height);
            self.grow(span)?;
            return Ok(Expr::new(
                ExprKind::MethodCall {
                    receiver: Box::new(object),
                    name,
                    args,
                    null_safe,
                },
                span,
            ));
        }

        let span = self.span_between(&object.span, &name_span);
        self.height = object_height;
        self.grow(span)?;
        let target = Box::new(object);
        let kind = if null_safe {
            ExprKind::NullSafeMember { target, name }
        } else {
            ExprKind::Member { target, name }
        };
        Ok(Expr::new(kind, span))
    }
}
