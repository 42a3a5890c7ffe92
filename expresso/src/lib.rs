// Library code reports through return values and tracing, never stderr.
// The REPL binary (bin/) may print.
#![deny(clippy::print_stderr)]

//! Expresso: an embeddable expression engine
//!
//! Expressions such as `user?.address?.city ?? "unknown"` are parsed by
//! [`expresso_parser`] and evaluated here against a [`Context`] of named
//! values and a [`FunctionRegistry`] of callable functions.
//!
//! ```
//! use expresso::{evaluate, Context, FunctionRegistry, Value};
//!
//! let registry = FunctionRegistry::with_builtins();
//! let context = Context::new().with("user", Value::map([("name", Value::from("ada"))]));
//! let value = evaluate("upperCase(user?.name ?? 'anonymous')", &context, &registry).unwrap();
//! assert_eq!(value, Value::from("ADA"));
//! ```

// Core modules
pub mod builtins;
pub mod config;
pub mod context;
pub mod error;
pub mod eval;
pub mod registry;
pub mod value;

// Static checks
pub mod validation;

// Public façade
pub mod api;

// Interactive session state (front end in bin/)
pub mod repl;

pub use api::{evaluate, parse, Engine, Expression};
pub use config::{EvaluatorConfig, DEFAULT_MAX_DEPTH};
pub use context::Context;
pub use error::{
    CallError, ConfigError, Error, EvalErrorKind, EvalResult, EvaluationError, RegistryError,
    Result,
};
pub use eval::Evaluator;
pub use registry::{Arity, FunctionDescriptor, FunctionProvider, FunctionRegistry, NativeFunction};
pub use validation::{IssueCategory, ValidationIssue, ValidationResult};
pub use value::{MapBuilder, PropertyAccess, Value, ValueKind, ValueMap};

// Parser types that appear in this crate's API
pub use expresso_parser::{Expr, ExprKind, LexError, ParseError, Span};

/// Get version information
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
