//! Postfix expression parsers

use crate::ast::Expr;
use crate::error::ParseResult;
use crate::token::Token;

use crate::parser::Parser;

impl<'a> Parser<'a> {
    /// Apply postfix operations to `left` until none follows
    ///
    /// A call is not a postfix operation here: only a bare name or a member
    /// name can be called, so `(f)(x)` stops the chain before the `(`.
    pub(crate) fn parse_postfix_chain(&mut self, mut left: Expr) -> ParseResult<Expr> {
        loop {
            left = match self.current_token() {
                // Member access or method call: expr.name, expr?.name(args)
                Token::Dot | Token::QuestionDot => self.parse_field_expression(left)?,

                // Index: expr[idx], expr?[idx]
                Token::LBracket | Token::QuestionBracket => self.parse_index_expression(left)?,

                _ => return Ok(left),
            };
        }
    }
}
