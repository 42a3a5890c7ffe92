//! Function and method dispatch

use expresso_parser::Expr;

use super::{Evaluator, Step};
use crate::context::Context;
use crate::error::{EvalResult, EvaluationError};
use crate::registry::{select_overload, FunctionDescriptor};
use crate::value::Value;

impl Evaluator<'_> {
    /// Call `name` with an optional receiver prepended to the arguments
    ///
    /// Lookup and arity are checked before any argument is evaluated, so an
    /// unknown function never runs side effects of its arguments.
    pub(super) fn eval_call(
        &self,
        name: &str,
        receiver: Option<Value>,
        args: &[Expr],
        ctx: &Context,
        depth: usize,
    ) -> Step<Value> {
        let argc = args.len() + usize::from(receiver.is_some());
        let candidates = self
            .registry
            .resolve(name, argc)
            .map_err(EvaluationError::from)?;

        let mut values = Vec::with_capacity(argc);
        values.extend(receiver);
        for arg in args {
            values.push(self.eval(arg, ctx, depth)?);
        }

        Ok(dispatch(name, &candidates, &values)?)
    }
}

/// Pick the overload for the evaluated arguments and run it
#[inline(never)]
fn dispatch(
    name: &str,
    candidates: &[&FunctionDescriptor],
    values: &[Value],
) -> EvalResult<Value> {
    let descriptor = select_overload(name, candidates, values)?;
    tracing::trace!(function = name, argc = values.len(), "call");
    descriptor.call(values).map_err(|cause| {
        tracing::debug!(function = name, error = %cause, "function failed");
        EvaluationError::function_failed(name, cause)
    })
}
