//! Tree-walking evaluator
//!
//! Walks an [`Expr`] depth first against an immutable [`Context`] and a
//! read-only [`FunctionRegistry`]. Operands are evaluated left to right;
//! `&&`, `||`, `??` and `? :` evaluate only what they need.
//!
//! Null-safe segments (`?.`, `?[ ]`, `?.name()`) short-circuit the rest of
//! the postfix chain they start: in `a?.b.c.d()` with `a` null, neither the
//! member reads nor the call happen and the whole chain is null.

mod access;
mod binary;
mod call;
mod unary;

use expresso_parser::{BinaryOp, Expr, ExprKind, Span};

use crate::config::EvaluatorConfig;
use crate::context::Context;
use crate::error::{EvalErrorKind, EvalResult, EvaluationError};
use crate::registry::FunctionRegistry;
use crate::value::Value;

/// Result of one step of the recursive walk
///
/// The error is boxed: every nesting level holds one of these on the stack.
type Step<T> = Result<T, Box<EvaluationError>>;

/// Outcome of evaluating a node that may sit inside a postfix chain
#[derive(Debug)]
enum Chain {
    Value(Value),
    /// A null-safe segment met null; the rest of the chain is skipped
    ShortCircuit,
}

/// Expression evaluator
#[derive(Debug, Clone, Copy)]
pub struct Evaluator<'r> {
    registry: &'r FunctionRegistry,
    config: EvaluatorConfig,
}

impl<'r> Evaluator<'r> {
    /// Create an evaluator with the default configuration
    pub fn new(registry: &'r FunctionRegistry) -> Self {
        Self {
            registry,
            config: EvaluatorConfig::default(),
        }
    }

    /// Replace the configuration (builder pattern)
    pub fn with_config(mut self, config: EvaluatorConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &EvaluatorConfig {
        &self.config
    }

    pub fn registry(&self) -> &'r FunctionRegistry {
        self.registry
    }

    /// Evaluate `expr` against `context`
    pub fn evaluate(&self, expr: &Expr, context: &Context) -> EvalResult<Value> {
        tracing::debug!(expr = %expr, variables = context.len(), "evaluate");
        let result = self.eval(expr, context, 0).map_err(|err| *err);
        match &result {
            Ok(value) => tracing::trace!(result = ?value, "evaluated"),
            Err(err) => tracing::debug!(kind = %err.kind, error = %err, "evaluation failed"),
        }
        result
    }

    fn eval(&self, expr: &Expr, ctx: &Context, depth: usize) -> Step<Value> {
        match self.eval_chain(expr, ctx, depth)? {
            Chain::Value(value) => Ok(value),
            Chain::ShortCircuit => Ok(Value::Null),
        }
    }

    fn eval_chain(&self, expr: &Expr, ctx: &Context, depth: usize) -> Step<Chain> {
        let depth = depth + 1;
        if depth > self.config.max_depth {
            return Err(depth_exceeded(self.config.max_depth, expr.span));
        }
        self.eval_node(expr, ctx, depth)
            .map_err(|err| located(err, expr.span))
    }

    fn eval_node(&self, expr: &Expr, ctx: &Context, depth: usize) -> Step<Chain> {
        let value = match &expr.kind {
            ExprKind::Literal(literal) => Value::from(literal),
            ExprKind::Variable(name) => self.eval_variable(name, ctx)?,
            ExprKind::Unary { op, operand } => {
                let value = self.eval(operand, ctx, depth)?;
                unary::apply(*op, &value)?
            }
            ExprKind::Binary { op, left, right } => {
                self.eval_binary(*op, left, right, ctx, depth)?
            }
            ExprKind::Conditional {
                condition,
                then_branch,
                else_branch,
            } => self.eval_conditional(condition, then_branch, else_branch, ctx, depth)?,
            ExprKind::Member { target, name } => {
                return self.eval_member(target, name, false, ctx, depth)
            }
            ExprKind::NullSafeMember { target, name } => {
                return self.eval_member(target, name, true, ctx, depth)
            }
            ExprKind::Index { target, index } => {
                return self.eval_index(target, index, false, ctx, depth)
            }
            ExprKind::NullSafeIndex { target, index } => {
                return self.eval_index(target, index, true, ctx, depth)
            }
            ExprKind::Call { name, args } => self.eval_call(name, None, args, ctx, depth)?,
            ExprKind::MethodCall {
                receiver,
                name,
                args,
                null_safe,
            } => match self.eval_target(receiver, *null_safe, ctx, depth)? {
                Some(receiver) => self.eval_call(name, Some(receiver), args, ctx, depth)?,
                None => return Ok(Chain::ShortCircuit),
            },
        };
        Ok(Chain::Value(value))
    }

    fn eval_variable(&self, name: &str, ctx: &Context) -> EvalResult<Value> {
        match ctx.get(name) {
            Some(value) => Ok(value.clone()),
            None if self.config.strict_variables => Err(EvaluationError::undefined_variable(name)),
            None => Ok(Value::Null),
        }
    }

    /// Evaluate the target of a postfix segment
    ///
    /// Returns `None` when the chain short-circuits: an earlier null-safe
    /// segment met null, or this segment is null-safe and its target is null
    /// or an unbound variable.
    fn eval_target(
        &self,
        target: &Expr,
        null_safe: bool,
        ctx: &Context,
        depth: usize,
    ) -> Step<Option<Value>> {
        if null_safe {
            if let ExprKind::Variable(name) = &target.kind {
                if !ctx.contains(name) {
                    return Ok(None);
                }
            }
        }
        match self.eval_chain(target, ctx, depth)? {
            Chain::ShortCircuit => Ok(None),
            Chain::Value(Value::Null) if null_safe => Ok(None),
            Chain::Value(value) => Ok(Some(value)),
        }
    }

    fn eval_member(
        &self,
        target: &Expr,
        name: &str,
        null_safe: bool,
        ctx: &Context,
        depth: usize,
    ) -> Step<Chain> {
        match self.eval_target(target, null_safe, ctx, depth)? {
            Some(value) => Ok(Chain::Value(access::member(&value, name)?)),
            None => Ok(Chain::ShortCircuit),
        }
    }

    fn eval_index(
        &self,
        target: &Expr,
        index: &Expr,
        null_safe: bool,
        ctx: &Context,
        depth: usize,
    ) -> Step<Chain> {
        let Some(value) = self.eval_target(target, null_safe, ctx, depth)? else {
            return Ok(Chain::ShortCircuit);
        };
        let key = self.eval(index, ctx, depth)?;
        Ok(Chain::Value(access::index(&value, &key, null_safe)?))
    }

    fn eval_binary(
        &self,
        op: BinaryOp,
        left: &Expr,
        right: &Expr,
        ctx: &Context,
        depth: usize,
    ) -> Step<Value> {
        match op {
            BinaryOp::And => {
                let lhs = self.eval(left, ctx, depth)?;
                if !binary::expect_bool(op, &lhs)? {
                    return Ok(Value::Bool(false));
                }
                let rhs = self.eval(right, ctx, depth)?;
                Ok(Value::Bool(binary::expect_bool(op, &rhs)?))
            }
            BinaryOp::Or => {
                let lhs = self.eval(left, ctx, depth)?;
                if binary::expect_bool(op, &lhs)? {
                    return Ok(Value::Bool(true));
                }
                let rhs = self.eval(right, ctx, depth)?;
                Ok(Value::Bool(binary::expect_bool(op, &rhs)?))
            }
            BinaryOp::Coalesce => {
                let lhs = self.eval(left, ctx, depth)?;
                if lhs.is_null() {
                    self.eval(right, ctx, depth)
                } else {
                    Ok(lhs)
                }
            }
            _ => {
                let lhs = self.eval(left, ctx, depth)?;
                let rhs = self.eval(right, ctx, depth)?;
                Ok(binary::apply(op, &lhs, &rhs)?)
            }
        }
    }

    /// Null conditions count as false; other non-booleans are rejected
    fn eval_conditional(
        &self,
        condition: &Expr,
        then_branch: &Expr,
        else_branch: &Expr,
        ctx: &Context,
        depth: usize,
    ) -> Step<Value> {
        let taken = match self.eval(condition, ctx, depth)? {
            Value::Bool(b) => b,
            Value::Null => false,
            other => return Err(not_a_condition(&other, condition.span)),
        };
        if taken {
            self.eval(then_branch, ctx, depth)
        } else {
            self.eval(else_branch, ctx, depth)
        }
    }
}

#[cold]
#[inline(never)]
fn depth_exceeded(limit: usize, span: Span) -> Box<EvaluationError> {
    Box::new(
        EvaluationError::new(
            EvalErrorKind::DepthLimitExceeded,
            format!("expression nesting exceeds the limit of {}", limit),
        )
        .at(span),
    )
}

#[cold]
#[inline(never)]
fn not_a_condition(value: &Value, span: Span) -> Box<EvaluationError> {
    Box::new(
        EvaluationError::type_mismatch(format!(
            "condition must be a boolean, got {}",
            value.kind()
        ))
        .at(span),
    )
}

/// Attach `span` unless a deeper node already did
fn located(mut err: Box<EvaluationError>, span: Span) -> Box<EvaluationError> {
    if err.span.is_none() {
        err.span = Some(span);
    }
    err
}
