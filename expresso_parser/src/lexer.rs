//! Lexer for expression source text
//!
//! Wraps the logos-generated lexer with hand-written scanning for string
//! literals and block comments, and cooks literal values as it goes.

use std::iter::FusedIterator;

use logos::Logos;

use crate::ast::Literal;
use crate::error::{LexError, LexResult};
use crate::span::{SourceMap, Span};
use crate::token::Token;

/// A token with its span
#[derive(Debug, Clone, PartialEq)]
pub struct SpannedToken<'a> {
    pub token: Token,
    pub span: Span,
    pub text: &'a str,
    /// Cooked value of literal tokens
    pub literal: Option<Literal>,
}

impl<'a> SpannedToken<'a> {
    pub fn new(token: Token, span: Span, text: &'a str) -> Self {
        Self {
            token,
            span,
            text,
            literal: None,
        }
    }

    pub fn with_literal(token: Token, span: Span, text: &'a str, literal: Literal) -> Self {
        Self {
            token,
            span,
            text,
            literal: Some(literal),
        }
    }
}

/// Expression lexer
///
/// Yields tokens lazily, ends with exactly one [`Token::Eof`], and stops for
/// good after the first error.
pub struct Lexer<'a> {
    source: &'a str,
    inner: logos::Lexer<'a, Token>,
    source_map: SourceMap,
    /// Peeked token (for lookahead)
    peeked: Option<Option<LexResult<SpannedToken<'a>>>>,
    /// End of the last token handed out
    position: usize,
    finished: bool,
}

impl std::fmt::Debug for Lexer<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Lexer")
            .field("position", &self.position)
            .field("finished", &self.finished)
            .finish()
    }
}

impl<'a> Lexer<'a> {
    /// Create a new lexer for the given source text
    pub fn new(source: &'a str) -> Self {
        Self {
            source,
            inner: Token::lexer(source),
            source_map: SourceMap::new(source),
            peeked: None,
            position: 0,
            finished: false,
        }
    }

    /// Get the source text
    pub fn source(&self) -> &'a str {
        self.source
    }

    /// Get the source map
    pub fn source_map(&self) -> &SourceMap {
        &self.source_map
    }

    /// Get current position in source
    pub fn position(&self) -> usize {
        self.position
    }

    fn make_span(&self, start: usize, end: usize) -> Span {
        self.source_map.span(start, end)
    }

    /// Peek at the next token without consuming it
    pub fn peek(&mut self) -> Option<&LexResult<SpannedToken<'a>>> {
        if self.peeked.is_none() {
            let next = self.next_token_internal();
            self.peeked = Some(next);
        }
        self.peeked.as_ref().and_then(|p| p.as_ref())
    }

    /// Get the next token
    pub fn next_token(&mut self) -> Option<LexResult<SpannedToken<'a>>> {
        if let Some(peeked) = self.peeked.take() {
            return peeked;
        }
        self.next_token_internal()
    }

    fn fail(&mut self, error: LexError) -> Option<LexResult<SpannedToken<'a>>> {
        self.finished = true;
        Some(Err(error))
    }

    fn next_token_internal(&mut self) -> Option<LexResult<SpannedToken<'a>>> {
        if self.finished {
            return None;
        }

        loop {
            let Some(result) = self.inner.next() else {
                self.finished = true;
                let end = self.source.len();
                self.position = end;
                return Some(Ok(SpannedToken::new(
                    Token::Eof,
                    self.make_span(end, end),
                    "",
                )));
            };
            let range = self.inner.span();
            let (start, end) = (range.start, range.end);
            let source = self.source;
            let text = &source[start..end];

            let token = match result {
                Ok(token) => token,
                Err(()) => {
                    let character = source[start..].chars().next().unwrap_or('\0');
                    let span = self.make_span(start, start + character.len_utf8());
                    return self.fail(LexError::UnknownCharacter { character, span });
                }
            };

            let literal = match token {
                Token::LineComment => continue,
                Token::BlockCommentStart => match self.scan_block_comment(start, end) {
                    Ok(comment_end) => {
                        self.restart_from(comment_end);
                        continue;
                    }
                    Err(e) => return self.fail(e),
                },
                Token::DoubleQuote | Token::SingleQuote => {
                    let quote = if token == Token::DoubleQuote { b'"' } else { b'\'' };
                    return match self.scan_string(start, end, quote) {
                        Ok((string_end, value)) => {
                            self.restart_from(string_end);
                            self.position = string_end;
                            Some(Ok(SpannedToken::with_literal(
                                token,
                                self.make_span(start, string_end),
                                &source[start..string_end],
                                Literal::String(value),
                            )))
                        }
                        Err(e) => self.fail(e),
                    };
                }
                Token::Integer => match text.parse::<i64>() {
                    Ok(n) => Some(Literal::Integer(n)),
                    Err(_) => return self.fail(self.invalid_number(start, end)),
                },
                Token::Float => match text.parse::<f64>() {
                    Ok(x) if x.is_finite() => Some(Literal::Float(x)),
                    _ => return self.fail(self.invalid_number(start, end)),
                },
                Token::MalformedNumber => return self.fail(self.invalid_number(start, end)),
                Token::True => Some(Literal::Bool(true)),
                Token::False => Some(Literal::Bool(false)),
                Token::Null => Some(Literal::Null),
                _ => None,
            };

            self.position = end;
            let span = self.make_span(start, end);
            return Some(Ok(SpannedToken {
                token,
                span,
                text,
                literal,
            }));
        }
    }

    fn invalid_number(&self, start: usize, end: usize) -> LexError {
        LexError::InvalidNumericLiteral {
            literal: self.source[start..end].to_string(),
            span: self.make_span(start, end),
        }
    }

    /// Scan a `/* ... */` comment whose opener spans `start..body`.
    /// Returns the offset just past the closing `*/`.
    fn scan_block_comment(&self, start: usize, body: usize) -> LexResult<usize> {
        let bytes = self.source.as_bytes();
        let mut pos = body;

        while let Some(offset) = memchr::memchr(b'*', &bytes[pos..]) {
            pos += offset;
            if bytes.get(pos + 1) == Some(&b'/') {
                return Ok(pos + 2);
            }
            pos += 1;
        }

        Err(LexError::UnterminatedComment {
            span: self.make_span(start, body),
        })
    }

    /// Scan string content after the opening quote at `start`.
    /// Uses memchr to jump between escapes and the closing quote.
    ///
    /// Returns the offset just past the closing quote and the cooked value.
    fn scan_string(&self, start: usize, body: usize, quote: u8) -> LexResult<(usize, String)> {
        let bytes = self.source.as_bytes();
        let mut value = String::new();
        let mut pos = body;

        while let Some(offset) = memchr::memchr2(b'\\', quote, &bytes[pos..]) {
            value.push_str(&self.source[pos..pos + offset]);
            pos += offset;

            if bytes[pos] == quote {
                return Ok((pos + 1, value));
            }

            // Backslash: decode one escape sequence
            let Some(escaped) = self.source[pos + 1..].chars().next() else {
                break;
            };
            let cooked = match escaped {
                'n' => '\n',
                't' => '\t',
                'r' => '\r',
                '0' => '\0',
                '\\' => '\\',
                '"' => '"',
                '\'' => '\'',
                'u' => {
                    let (c, len) = self.scan_unicode_escape(pos)?;
                    value.push(c);
                    pos += len;
                    continue;
                }
                other => {
                    let end = pos + 1 + other.len_utf8();
                    return Err(LexError::InvalidEscape {
                        sequence: self.source[pos..end].to_string(),
                        span: self.make_span(pos, end),
                    });
                }
            };
            value.push(cooked);
            pos += 2;
        }

        Err(LexError::UnterminatedString {
            span: self.make_span(start, start + 1),
        })
    }

    /// Decode `\uXXXX` at `pos`. Returns the char and the escape length.
    fn scan_unicode_escape(&self, pos: usize) -> LexResult<(char, usize)> {
        const LEN: usize = 6;
        let digits = self.source.get(pos + 2..pos + LEN);
        let decoded = digits
            .filter(|d| d.bytes().all(|b| b.is_ascii_hexdigit()))
            .and_then(|d| u32::from_str_radix(d, 16).ok())
            .and_then(char::from_u32);

        decoded.map(|c| (c, LEN)).ok_or_else(|| {
            let end = self
                .source
                .get(pos + 2..)
                .and_then(|rest| rest.char_indices().nth(4).map(|(i, _)| pos + 2 + i))
                .unwrap_or(self.source.len());
            LexError::InvalidEscape {
                sequence: self.source[pos..end].to_string(),
                span: self.make_span(pos, end),
            }
        })
    }

    /// Move the logos lexer forward to `pos`, past hand-scanned input
    fn restart_from(&mut self, pos: usize) {
        let logos_pos = self.inner.span().end;
        if pos > logos_pos && pos <= self.source.len() {
            self.inner.bump(pos - logos_pos);
        }
    }

    /// Collect all tokens (for debugging)
    pub fn collect_all(mut self) -> Vec<LexResult<SpannedToken<'a>>> {
        let mut tokens = Vec::new();
        while let Some(token) = self.next_token() {
            tokens.push(token);
        }
        tokens
    }
}

impl<'a> Iterator for Lexer<'a> {
    type Item = LexResult<SpannedToken<'a>>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_token()
    }
}

impl FusedIterator for Lexer<'_> {}

/// Tokenize source text, stopping at the first error
///
/// The returned vector always ends with a [`Token::Eof`] token.
pub fn tokenize(source: &str) -> LexResult<Vec<SpannedToken<'_>>> {
    Lexer::new(source).collect()
}
