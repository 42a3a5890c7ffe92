//! Lex and parse error types

use crate::span::Span;
use thiserror::Error;

/// Error raised while turning source text into tokens
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LexError {
    /// String literal without its closing quote
    #[error("unterminated string literal starting at {}", position(.span))]
    UnterminatedString { span: Span },

    /// Malformed or out-of-range number
    #[error("invalid numeric literal '{literal}' at {}", position(.span))]
    InvalidNumericLiteral { literal: String, span: Span },

    /// Character that starts no token
    #[error("unknown character '{character}' at {}", position(.span))]
    UnknownCharacter { character: char, span: Span },

    /// Unsupported escape inside a string literal
    #[error("invalid escape sequence '{sequence}' at {}", position(.span))]
    InvalidEscape { sequence: String, span: Span },

    /// `/*` without a matching `*/`
    #[error("unterminated block comment starting at {}", position(.span))]
    UnterminatedComment { span: Span },
}

impl LexError {
    pub fn span(&self) -> &Span {
        match self {
            LexError::UnterminatedString { span }
            | LexError::InvalidNumericLiteral { span, .. }
            | LexError::UnknownCharacter { span, .. }
            | LexError::InvalidEscape { span, .. }
            | LexError::UnterminatedComment { span } => span,
        }
    }

    /// Format error with source context
    pub fn format_with_context(&self, source: &str) -> String {
        format_with_context(self.span(), source)
    }
}

/// Error raised while building the AST
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// Token that does not fit the grammar at this point
    #[error("unexpected token '{found}' at {}, expected {expected}", position(.span))]
    UnexpectedToken {
        found: String,
        expected: String,
        span: Span,
    },

    /// `(` whose `)` never arrives. The span points at the opening paren.
    #[error("unclosed parenthesis opened at {}", position(.span))]
    UnclosedParenthesis { span: Span },

    /// `[` whose `]` never arrives. The span points at the opening bracket.
    #[error("unclosed bracket opened at {}", position(.span))]
    UnclosedBracket { span: Span },

    /// Operator with no operand after it
    #[error("missing operand after '{operator}' at {}", position(.span))]
    MissingOperand { operator: String, span: Span },

    /// Complete expression followed by more input
    #[error("unexpected trailing input '{found}' at {}", position(.span))]
    TrailingTokens { found: String, span: Span },

    /// Brackets, operators or chains nested past `limit` levels
    #[error("expression nested deeper than {limit} levels at {}", position(.span))]
    NestingTooDeep { limit: usize, span: Span },

    #[error(transparent)]
    Lex(#[from] LexError),
}

impl ParseError {
    /// Get the span of the error
    pub fn span(&self) -> &Span {
        match self {
            ParseError::UnexpectedToken { span, .. }
            | ParseError::UnclosedParenthesis { span }
            | ParseError::UnclosedBracket { span }
            | ParseError::MissingOperand { span, .. }
            | ParseError::TrailingTokens { span, .. }
            | ParseError::NestingTooDeep { span, .. } => span,
            ParseError::Lex(e) => e.span(),
        }
    }

    /// Create an unexpected token error
    pub fn unexpected_token(
        found: impl Into<String>,
        expected: impl Into<String>,
        span: Span,
    ) -> Self {
        ParseError::UnexpectedToken {
            found: found.into(),
            expected: expected.into(),
            span,
        }
    }

    /// Format error with source context
    ///
    /// Returns a string showing the source line with an error marker.
    pub fn format_with_context(&self, source: &str) -> String {
        format_with_context(self.span(), source)
    }
}

/// Result type for parsing operations
pub type ParseResult<T> = Result<T, ParseError>;

/// Result type for lexing operations
pub type LexResult<T> = Result<T, LexError>;

fn position(span: &Span) -> String {
    format!("{}:{}", span.start_line, span.start_column)
}

/// Render the line holding `span` with a caret marker under it
pub fn format_with_context(span: &Span, source: &str) -> String {
    let lines: Vec<&str> = source.lines().collect();
    let line_idx = span.start_line.saturating_sub(1);

    let Some(line) = lines.get(line_idx) else {
        return String::new();
    };

    let col = span.start_column.saturating_sub(1);
    let len = if span.start_line == span.end_line {
        span.end_column.saturating_sub(span.start_column).max(1)
    } else {
        1
    };

    let marker = "^".repeat(len.min(line.len().saturating_sub(col)).max(1));

    format!(
        "  {} | {}\n  {} | {}{}",
        span.start_line,
        line,
        " ".repeat(span.start_line.to_string().len()),
        " ".repeat(col),
        marker
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unexpected_token() {
        let span = Span::new(0, 1, 1, 1, 1, 2);
        let err = ParseError::unexpected_token(")", "expression", span);

        assert_eq!(err.span(), &span);
        assert!(err.to_string().contains(")"));
        assert!(err.to_string().contains("expression"));
        assert!(err.to_string().contains("1:1"));
    }

    #[test]
    fn test_lex_error_is_transparent() {
        let span = Span::new(4, 5, 1, 1, 5, 6);
        let err: ParseError = LexError::UnknownCharacter {
            character: '#',
            span,
        }
        .into();

        assert_eq!(err.span(), &span);
        assert_eq!(err.to_string(), "unknown character '#' at 1:5");
    }

    #[test]
    fn test_format_with_context() {
        let source = "1 + # 2";
        let err = LexError::UnknownCharacter {
            character: '#',
            span: Span::new(4, 5, 1, 1, 5, 6),
        };

        let context = err.format_with_context(source);
        assert!(context.contains("1 + # 2"));
        assert!(context.ends_with("    ^"));
    }

    #[test]
    fn test_format_with_context_out_of_range() {
        let err = ParseError::UnclosedParenthesis {
            span: Span::new(0, 1, 3, 3, 1, 2),
        };
        assert_eq!(err.format_with_context("(1"), "");
    }
}
