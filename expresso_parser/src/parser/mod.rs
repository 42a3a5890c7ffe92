//! Precedence-climbing parser for expressions
//!
//! Converts the token stream from the lexer into an [`Expr`] tree. Parsing
//! stops at the first error; there is no recovery.

mod expressions;
mod literals;

use crate::ast::Expr;
use crate::error::{ParseError, ParseResult};
use crate::lexer::{Lexer, SpannedToken};
use crate::span::{SourceMap, Span};
use crate::token::Token;

/// Deepest recursion the parser will enter: brackets, call arguments,
/// unary operators and right operands each take one level
pub const MAX_NESTING_DEPTH: usize = 128;

/// Tallest tree the parser will build
///
/// Left-associative chains such as `a + b + c` or `a.b.c` are parsed in a
/// loop but still produce one tree level per operator.
pub const MAX_TREE_HEIGHT: usize = 256;

/// Expression parser
pub struct Parser<'a> {
    /// Source text
    pub(crate) source: &'a str,
    /// Lexer
    pub(crate) lexer: Lexer<'a>,
    /// Source map for line/column calculation
    pub(crate) source_map: SourceMap,
    /// Current token; `None` until the parser is primed
    pub(crate) current: Option<SpannedToken<'a>>,
    /// Current recursion depth
    nesting: usize,
    /// Height of the expression most recently parsed
    pub(crate) height: usize,
}

impl std::fmt::Debug for Parser<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Parser")
            .field("current", &self.current)
            .field("nesting", &self.nesting)
            .finish_non_exhaustive()
    }
}

impl<'a> Parser<'a> {
    /// Create a new parser for the given source text
    pub fn new(source: &'a str) -> Self {
        Self::from_lexer(Lexer::new(source))
    }

    /// Create a parser over an existing lexer
    pub fn from_lexer(lexer: Lexer<'a>) -> Self {
        let source = lexer.source();
        let source_map = lexer.source_map().clone();
        Self {
            source,
            lexer,
            source_map,
            current: None,
            nesting: 0,
            height: 0,
        }
    }

    /// Parse the whole input as a single expression
    ///
    /// Fails on empty input and on anything left over after the expression.
    pub fn parse_expression_root(mut self) -> ParseResult<Expr> {
        // Prime the parser with first token
        self.current = Some(self.next_token()?);

        if self.check(&Token::Eof) {
            return Err(ParseError::unexpected_token(
                Token::Eof.describe(),
                "expression",
                self.current_span(),
            ));
        }

        let expr = self.parse_expression()?;

        if !self.check(&Token::Eof) {
            return Err(ParseError::TrailingTokens {
                found: self.current_text().to_string(),
                span: self.current_span(),
            });
        }

        Ok(expr)
    }

    // ==================== Token Management ====================

    fn next_token(&mut self) -> ParseResult<SpannedToken<'a>> {
        match self.lexer.next_token() {
            Some(result) => Ok(result?),
            // The lexer is exhausted once it has produced Eof; keep repeating it
            None => {
                let end = self.source.len();
                Ok(SpannedToken::new(Token::Eof, self.source_map.span(end, end), ""))
            }
        }
    }

    /// Advance to the next token, returning the one just consumed
    pub(crate) fn advance(&mut self) -> ParseResult<SpannedToken<'a>> {
        let next = self.next_token()?;
        match self.current.replace(next) {
            Some(prev) => Ok(prev),
            None => Err(ParseError::unexpected_token(
                Token::Eof.describe(),
                "expression",
                self.current_span(),
            )),
        }
    }

    /// Kind of the current token
    pub(crate) fn current_token(&self) -> Token {
        self.current.as_ref().map(|t| t.token).unwrap_or(Token::Eof)
    }

    /// Check if current token matches
    pub(crate) fn check(&self, expected: &Token) -> bool {
        self.current_token() == *expected
    }

    /// Consume current token if it matches, return error otherwise
    pub(crate) fn expect(&mut self, expected: Token) -> ParseResult<SpannedToken<'a>> {
        if self.check(&expected) {
            self.advance()
        } else {
            Err(ParseError::unexpected_token(
                self.current_text(),
                format!("'{}'", expected.describe()),
                self.current_span(),
            ))
        }
    }

    /// Source text of the current token, or a description for end of input
    pub(crate) fn current_text(&self) -> &str {
        match &self.current {
            Some(t) if t.token != Token::Eof => t.text,
            _ => Token::Eof.describe(),
        }
    }

    /// Get the span of the current token
    pub(crate) fn current_span(&self) -> Span {
        self.current
            .as_ref()
            .map(|t| t.span)
            .unwrap_or_else(|| self.source_map.span(self.source.len(), self.source.len()))
    }

    /// Check if we're at end of input
    pub(crate) fn is_at_end(&self) -> bool {
        self.check(&Token::Eof)
    }

    // ==================== Depth Limits ====================

    /// Enter one level of recursion; pair with [`Parser::leave`]
    pub(crate) fn enter(&mut self) -> ParseResult<()> {
        if self.nesting >= MAX_NESTING_DEPTH {
            return Err(ParseError::NestingTooDeep {
                limit: MAX_NESTING_DEPTH,
                span: self.current_span(),
            });
        }
        self.nesting += 1;
        Ok(())
    }

    pub(crate) fn leave(&mut self) {
        self.nesting = self.nesting.saturating_sub(1);
    }

    /// Record a new node one level above `self.height`
    pub(crate) fn grow(&mut self, span: Span) -> ParseResult<()> {
        self.height += 1;
        if self.height > MAX_TREE_HEIGHT {
            return Err(ParseError::NestingTooDeep {
                limit: MAX_TREE_HEIGHT,
                span,
            });
        }
        Ok(())
    }

    /// Build a span from `start` to the end of `end`
    pub(crate) fn span_between(&self, start: &Span, end: &Span) -> Span {
        self.source_map.span(start.start, end.end)
    }
}

/// Parse source text into an expression tree
pub fn parse(source: &str) -> ParseResult<Expr> {
    Parser::new(source).parse_expression_root()
}
