//! Entry points: one-shot [`evaluate`], reusable [`Expression`]s and the
//! [`Engine`] that owns a registry and configuration.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use expresso_parser::{Expr, ExprKind};
use indexmap::IndexSet;

use crate::config::EvaluatorConfig;
use crate::context::Context;
use crate::error::{CallError, Result};
use crate::eval::Evaluator;
use crate::registry::{Arity, FunctionDescriptor, FunctionProvider, FunctionRegistry};
use crate::validation::{self, ValidationResult};
use crate::value::Value;

/// Parse and evaluate `source` in one step with the default configuration
pub fn evaluate(source: &str, context: &Context, registry: &FunctionRegistry) -> Result<Value> {
    parse(source)?.evaluate(context, registry)
}

/// Parse `source` into a reusable [`Expression`]
pub fn parse(source: &str) -> Result<Expression> {
    Expression::parse(source)
}

/// A parsed expression, cheap to clone and share between threads
#[derive(Debug, Clone)]
pub struct Expression {
    source: Arc<str>,
    expr: Arc<Expr>,
}

impl Expression {
    pub fn parse(source: &str) -> Result<Self> {
        let expr = expresso_parser::parse(source)?;
        Ok(Self {
            source: Arc::from(source),
            expr: Arc::new(expr),
        })
    }

    /// The text this expression was parsed from
    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn ast(&self) -> &Expr {
        &self.expr
    }

    pub fn evaluate(&self, context: &Context, registry: &FunctionRegistry) -> Result<Value> {
        self.evaluate_with(&Evaluator::new(registry), context)
    }

    pub fn evaluate_with(&self, evaluator: &Evaluator<'_>, context: &Context) -> Result<Value> {
        Ok(evaluator.evaluate(&self.expr, context)?)
    }

    pub fn validate(&self, context: &Context, registry: &FunctionRegistry) -> ValidationResult {
        validation::validate_expr(&self.expr, context, registry)
    }

    /// Distinct variable names in order of first reference
    pub fn variables(&self) -> Vec<&str> {
        self.collect_names(|kind| match kind {
            ExprKind::Variable(name) => Some(name),
            _ => None,
        })
    }

    /// Distinct function names in order of first call
    pub fn functions(&self) -> Vec<&str> {
        self.collect_names(|kind| match kind {
            ExprKind::Call { name, .. } | ExprKind::MethodCall { name, .. } => Some(name),
            _ => None,
        })
    }

    fn collect_names<'e>(
        &'e self,
        pick: impl Fn(&'e ExprKind) -> Option<&'e String>,
    ) -> Vec<&'e str> {
        self.expr
            .walk()
            .filter_map(|node| pick(&node.kind))
            .map(String::as_str)
            .collect::<IndexSet<_>>()
            .into_iter()
            .collect()
    }
}

/// Canonical, fully parenthesised form
impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.expr)
    }
}

impl FromStr for Expression {
    type Err = crate::error::Error;

    fn from_str(source: &str) -> Result<Self> {
        Self::parse(source)
    }
}

/// Owns a function registry and an evaluator configuration
///
/// ```
/// use expresso::{Context, Engine};
///
/// let engine = Engine::new();
/// let context = Context::of("age", 20);
/// let value = engine.evaluate("age >= 18 ? 'adult' : 'minor'", &context).unwrap();
/// assert_eq!(value.to_string(), "adult");
/// ```
#[derive(Debug, Clone)]
pub struct Engine {
    registry: FunctionRegistry,
    config: EvaluatorConfig,
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}

impl Engine {
    /// Engine with the built-in function library and default configuration
    pub fn new() -> Self {
        Self::with_registry(FunctionRegistry::with_builtins())
    }

    pub fn with_registry(registry: FunctionRegistry) -> Self {
        Self {
            registry,
            config: EvaluatorConfig::default(),
        }
    }

    pub fn with_config(mut self, config: EvaluatorConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &EvaluatorConfig {
        &self.config
    }

    pub fn registry(&self) -> &FunctionRegistry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut FunctionRegistry {
        &mut self.registry
    }

    pub fn register_fn<F>(&mut self, name: impl Into<String>, arity: Arity, f: F)
    where
        F: Fn(&[Value]) -> std::result::Result<Value, CallError> + Send + Sync + 'static,
    {
        self.registry.register_fn(name, arity, f);
    }

    pub fn register(&mut self, descriptor: FunctionDescriptor) {
        self.registry.register(descriptor);
    }

    pub fn register_provider(&mut self, provider: &dyn FunctionProvider) {
        self.registry.register_provider(provider);
    }

    /// Evaluator borrowing this engine's registry
    pub fn evaluator(&self) -> Evaluator<'_> {
        Evaluator::new(&self.registry).with_config(self.config)
    }

    pub fn parse(&self, source: &str) -> Result<Expression> {
        Expression::parse(source)
    }

    pub fn evaluate(&self, source: &str, context: &Context) -> Result<Value> {
        self.evaluate_expression(&Expression::parse(source)?, context)
    }

    pub fn evaluate_expression(&self, expression: &Expression, context: &Context) -> Result<Value> {
        expression.evaluate_with(&self.evaluator(), context)
    }

    pub fn validate_syntax(&self, source: &str) -> ValidationResult {
        validation::validate_syntax(source)
    }

    pub fn validate_with_context(&self, source: &str, context: &Context) -> ValidationResult {
        validation::validate_with_context(source, context, &self.registry)
    }
}
