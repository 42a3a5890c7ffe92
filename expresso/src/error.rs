//! Error types for evaluation, function dispatch, configuration and the
//! top-level API.

use std::error::Error as StdError;
use std::fmt;

use expresso_parser::{LexError, ParseError, Span};
use thiserror::Error;

use crate::value::ValueKind;

/// Category of an evaluation failure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EvalErrorKind {
    UndefinedVariable,
    TypeMismatch,
    DivisionByZero,
    IndexError,
    UnknownFunction,
    ArityMismatch,
    /// A registered function returned an error
    FunctionError,
    PropertyNotFound,
    /// Plain member or index access on `null`
    NullReference,
    NumericOverflow,
    DepthLimitExceeded,
}

impl fmt::Display for EvalErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EvalErrorKind::UndefinedVariable => "undefined variable",
            EvalErrorKind::TypeMismatch => "type mismatch",
            EvalErrorKind::DivisionByZero => "division by zero",
            EvalErrorKind::IndexError => "index error",
            EvalErrorKind::UnknownFunction => "unknown function",
            EvalErrorKind::ArityMismatch => "arity mismatch",
            EvalErrorKind::FunctionError => "function error",
            EvalErrorKind::PropertyNotFound => "property not found",
            EvalErrorKind::NullReference => "null reference",
            EvalErrorKind::NumericOverflow => "numeric overflow",
            EvalErrorKind::DepthLimitExceeded => "depth limit exceeded",
        };
        f.write_str(name)
    }
}

/// Failure reported by a registered function
///
/// Carries a message and, optionally, the underlying error so the cause
/// chain survives wrapping into [`EvaluationError`].
#[derive(Debug)]
pub struct CallError {
    message: String,
    source: Option<Box<dyn StdError + Send + Sync>>,
}

impl CallError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            source: None,
        }
    }

    /// Wrap an underlying error
    pub fn with_source(
        message: impl Into<String>,
        source: impl StdError + Send + Sync + 'static,
    ) -> Self {
        Self {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for CallError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl StdError for CallError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.source
            .as_deref()
            .map(|e| e as &(dyn StdError + 'static))
    }
}

/// Error raised while evaluating an expression tree
#[derive(Debug, Error)]
#[error("{kind}: {message}")]
pub struct EvaluationError {
    pub kind: EvalErrorKind,
    pub message: String,
    /// Span of the node that failed
    pub span: Option<Span>,
    #[source]
    pub cause: Option<CallError>,
}

impl EvaluationError {
    pub fn new(kind: EvalErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            span: None,
            cause: None,
        }
    }

    /// Attach a span unless one is already set
    pub fn at(mut self, span: Span) -> Self {
        if self.span.is_none() {
            self.span = Some(span);
        }
        self
    }

    pub fn with_cause(mut self, cause: CallError) -> Self {
        self.cause = Some(cause);
        self
    }

    pub fn undefined_variable(name: &str) -> Self {
        Self::new(
            EvalErrorKind::UndefinedVariable,
            format!("variable '{}' is not defined", name),
        )
    }

    pub fn type_mismatch(message: impl Into<String>) -> Self {
        Self::new(EvalErrorKind::TypeMismatch, message)
    }

    pub fn division_by_zero() -> Self {
        Self::new(EvalErrorKind::DivisionByZero, "division by zero")
    }

    pub fn index_error(message: impl Into<String>) -> Self {
        Self::new(EvalErrorKind::IndexError, message)
    }

    pub fn null_reference(message: impl Into<String>) -> Self {
        Self::new(EvalErrorKind::NullReference, message)
    }

    pub fn overflow(operator: &str) -> Self {
        Self::new(
            EvalErrorKind::NumericOverflow,
            format!("integer overflow in '{}'", operator),
        )
    }

    /// Wrap a function failure, keeping it as the source
    pub fn function_failed(name: &str, cause: CallError) -> Self {
        Self::new(
            EvalErrorKind::FunctionError,
            format!("function '{}' failed: {}", name, cause),
        )
        .with_cause(cause)
    }

    /// Render the failing region of `source` with a caret marker
    pub fn format_with_context(&self, source: &str) -> String {
        match &self.span {
            Some(span) => format!(
                "{}\n{}",
                self,
                expresso_parser::error::format_with_context(span, source)
            ),
            None => self.to_string(),
        }
    }
}

impl From<RegistryError> for EvaluationError {
    fn from(err: RegistryError) -> Self {
        let kind = match err {
            RegistryError::UnknownFunction { .. } => EvalErrorKind::UnknownFunction,
            RegistryError::ArityMismatch { .. } => EvalErrorKind::ArityMismatch,
            RegistryError::TypeMismatch { .. } => EvalErrorKind::TypeMismatch,
        };
        Self::new(kind, err.to_string())
    }
}

/// Function lookup failures
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("unknown function '{name}'")]
    UnknownFunction { name: String },

    #[error("function '{name}' expects {expected} argument(s), got {found}")]
    ArityMismatch {
        name: String,
        expected: String,
        found: usize,
    },

    #[error("no overload of '{name}' accepts ({})", kind_list(.found))]
    TypeMismatch { name: String, found: Vec<ValueKind> },
}

fn kind_list(kinds: &[ValueKind]) -> String {
    kinds
        .iter()
        .map(ValueKind::name)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Configuration loading failures
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid configuration: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid configuration value for '{key}': {message}")]
    Invalid { key: String, message: String },
}

/// Any error produced on the way from source text to a value
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Lex(LexError),

    #[error(transparent)]
    Parse(ParseError),

    #[error(transparent)]
    Evaluation(#[from] EvaluationError),
}

impl From<ParseError> for Error {
    fn from(err: ParseError) -> Self {
        match err {
            ParseError::Lex(lex) => Error::Lex(lex),
            other => Error::Parse(other),
        }
    }
}

impl From<LexError> for Error {
    fn from(err: LexError) -> Self {
        Error::Lex(err)
    }
}

impl Error {
    pub fn span(&self) -> Option<&Span> {
        match self {
            Error::Lex(e) => Some(e.span()),
            Error::Parse(e) => Some(e.span()),
            Error::Evaluation(e) => e.span.as_ref(),
        }
    }

    /// Evaluation error kind, if this is an evaluation error
    pub fn eval_kind(&self) -> Option<EvalErrorKind> {
        match self {
            Error::Evaluation(e) => Some(e.kind),
            _ => None,
        }
    }

    /// Message followed by the failing region of `source`
    pub fn format_with_context(&self, source: &str) -> String {
        match self {
            Error::Lex(e) => format!("{}\n{}", e, e.format_with_context(source)),
            Error::Parse(e) => format!("{}\n{}", e, e.format_with_context(source)),
            Error::Evaluation(e) => e.format_with_context(source),
        }
    }
}

/// Result type for the public API
pub type Result<T> = std::result::Result<T, Error>;

/// Result type for evaluation
pub type EvalResult<T> = std::result::Result<T, EvaluationError>;
