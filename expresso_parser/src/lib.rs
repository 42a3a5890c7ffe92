//! expresso_parser
//!
//! Lexer and parser for the Expresso expression language.
//!
//! Source text goes through [`Lexer`] into [`SpannedToken`]s and then through
//! [`Parser`] into an [`Expr`] tree. Evaluation lives in the `expresso` crate.
//!
//! # Example
//!
//! ```
//! use expresso_parser::{parse, ExprKind};
//!
//! let expr = parse("user?.address?.city").expect("parse failed");
//! assert!(matches!(expr.kind, ExprKind::NullSafeMember { .. }));
//! assert_eq!(expr.to_string(), "user?.address?.city");
//! ```

pub mod ast;
pub mod error;
pub mod lexer;
pub mod parser;
pub mod span;
pub mod token;

// Re-exports
pub use ast::{BinaryOp, Expr, ExprKind, ExprWalker, Literal, UnaryOp};
pub use error::{LexError, LexResult, ParseError, ParseResult};
pub use lexer::{Lexer, SpannedToken};
pub use parser::{Parser, MAX_NESTING_DEPTH, MAX_TREE_HEIGHT};
pub use span::{SourceMap, Span};
pub use token::{Associativity, Precedence, Token, TokenClass};

// Test utilities (available in tests or with "testing" feature)
#[cfg(any(test, feature = "testing"))]
pub use ast::testing;

/// Parse expression source text into an AST
///
/// # Example
///
/// ```
/// use expresso_parser::parse;
///
/// let expr = parse("1 + 2 * 3").unwrap();
/// assert_eq!(expr.to_string(), "(1 + (2 * 3))");
/// ```
pub fn parse(source: &str) -> ParseResult<Expr> {
    parser::parse(source)
}

/// Tokenize expression source text
///
/// Returns the tokens including the final [`Token::Eof`], or the first lex error.
pub fn tokenize(source: &str) -> LexResult<Vec<SpannedToken<'_>>> {
    lexer::tokenize(source)
}

/// Get version information
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
