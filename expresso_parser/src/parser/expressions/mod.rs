//! Expression parsing (Pratt parser)
//!
//! Handles:
//! - Binary and unary expressions with precedence climbing
//! - The right-associative ternary `? :`
//! - Postfix chains (member access, indexing, method calls)

mod calls;
mod field;
mod index;
mod postfix;
mod primary;

use crate::ast::{BinaryOp, Expr, ExprKind, UnaryOp};
use crate::error::{ParseError, ParseResult};
use crate::lexer::SpannedToken;
use crate::token::{Associativity, Precedence, Token};

use super::Parser;

fn binary_op(token: Token) -> Option<BinaryOp> {
    Some(match token {
        Token::Plus => BinaryOp::Add,
        Token::Minus => BinaryOp::Sub,
        Token::Star => BinaryOp::Mul,
        Token::Slash => BinaryOp::Div,
        Token::Percent => BinaryOp::Rem,
        Token::EqEq => BinaryOp::Eq,
        Token::NotEq => BinaryOp::NotEq,
        Token::Lt => BinaryOp::Lt,
        Token::LtEq => BinaryOp::LtEq,
        Token::Gt => BinaryOp::Gt,
        Token::GtEq => BinaryOp::GtEq,
        Token::AndAnd => BinaryOp::And,
        Token::OrOr => BinaryOp::Or,
        Token::QuestionQuestion => BinaryOp::Coalesce,
        _ => return None,
    })
}

impl<'a> Parser<'a> {
    // ==================== Expression Parsing (Pratt Parser) ====================

    /// Parse an expression (top-level entry point)
    pub(crate) fn parse_expression(&mut self) -> ParseResult<Expr> {
        self.parse_expression_with_precedence(Precedence::Lowest)
    }

    /// Parse an expression with minimum precedence
    pub(crate) fn parse_expression_with_precedence(
        &mut self,
        min_prec: Precedence,
    ) -> ParseResult<Expr> {
        self.enter()?;
        let result = self.parse_infix_chain(min_prec);
        self.leave();
        result
    }

    /// Pratt parser core: a prefix expression then binary operators that
    /// bind at least as tightly as `min_prec`
    fn parse_infix_chain(&mut self, min_prec: Precedence) -> ParseResult<Expr> {
        let mut left = self.parse_prefix()?;

        loop {
            let token = self.current_token();
            let Some((prec, assoc)) = token.binary_precedence() else {
                break;
            };
            if prec < min_prec {
                break;
            }

            let op_token = self.advance()?;

            if op_token.token == Token::Question {
                left = self.parse_ternary(left, &op_token)?;
                continue;
            }

            let Some(op) = binary_op(op_token.token) else {
                return Err(ParseError::unexpected_token(
                    op_token.text,
                    "binary operator",
                    op_token.span,
                ));
            };

            // Calculate next precedence based on associativity
            let next_prec = match assoc {
                Associativity::Left => prec.next(),
                Associativity::Right => prec,
            };

            let left_height = self.height;
            let right = self.parse_operand(&op_token, next_prec)?;
            let span = self.span_between(&left.span, &right.span);
            self.height = self.height.max(left_height);
            self.grow(span)?;
            left = Expr::new(
                ExprKind::Binary {
                    op,
                    left: Box::new(left),
                    right: Box::new(right),
                },
                span,
            );
        }

        Ok(left)
    }

    /// Parse the operand that must follow `op_token`
    fn parse_operand(
        &mut self,
        op_token: &SpannedToken<'a>,
        min_prec: Precedence,
    ) -> ParseResult<Expr> {
        if !self.current_token().starts_expression() {
            return Err(ParseError::MissingOperand {
                operator: op_token.text.to_string(),
                span: self.current_span(),
            });
        }
        self.parse_expression_with_precedence(min_prec)
    }

    /// Parse `then : else` after the `?` of a conditional
    fn parse_ternary(
        &mut self,
        condition: Expr,
        question: &SpannedToken<'a>,
    ) -> ParseResult<Expr> {
        let mut height = self.height;
        let then_branch = self.parse_operand(question, Precedence::Lowest)?;
        height = height.max(self.height);

        let colon = self.expect(Token::Colon)?;

        // Right associative: a ? b : c ? d : e == a ? b : (c ? d : e)
        let else_branch = self.parse_operand(&colon, Precedence::Conditional)?;

        let span = self.span_between(&condition.span, &else_branch.span);
        self.height = height.max(self.height);
        self.grow(span)?;
        Ok(Expr::new(
            ExprKind::Conditional {
                condition: Box::new(condition),
                then_branch: Box::new(then_branch),
                else_branch: Box::new(else_branch),
            },
            span,
        ))
    }

    /// Parse a prefix expression (unary operator or primary)
    pub(crate) fn parse_prefix(&mut self) -> ParseResult<Expr> {
        let token = self.current_token();

        if token.unary_precedence().is_some() {
            let op_token = self.advance()?;
            let op = match op_token.token {
                Token::Minus => UnaryOp::Negate,
                _ => UnaryOp::Not,
            };
            if !self.current_token().starts_expression() {
                return Err(ParseError::MissingOperand {
                    operator: op_token.text.to_string(),
                    span: self.current_span(),
                });
            }
            // Postfix binds tighter than unary: -a.b is -(a.b)
            self.enter()?;
            let operand = self.parse_prefix();
            self.leave();
            let operand = operand?;

            let span = self.span_between(&op_token.span, &operand.span);
            self.grow(span)?;
            return Ok(Expr::new(
                ExprKind::Unary {
                    op,
                    operand: Box::new(operand),
                },
                span,
            ));
        }

        self.parse_primary_with_postfix()
    }

    /// Parse a primary expression followed by any postfix operations
    fn parse_primary_with_postfix(&mut self) -> ParseResult<Expr> {
        let primary = self.parse_primary()?;
        self.parse_postfix_chain(primary)
    }
}
