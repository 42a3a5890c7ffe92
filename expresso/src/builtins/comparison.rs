use std::cmp::Ordering;

use crate::error::CallError;
use crate::registry::{Arity, FunctionProvider, FunctionRegistry};
use crate::value::Value;

/// Comparison functions
///
/// The ordering functions return `false` when either side is `null`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ComparisonFunctions;

impl FunctionProvider for ComparisonFunctions {
    fn register_functions(&self, registry: &mut FunctionRegistry) {
        registry.register_fn("greaterThan", Arity::Exact(2), |args| {
            ordered("greaterThan", args, |o| o == Ordering::Greater)
        });
        registry.register_fn("lessThan", Arity::Exact(2), |args| {
            ordered("lessThan", args, |o| o == Ordering::Less)
        });
        registry.register_fn("greaterThanOrEqual", Arity::Exact(2), |args| {
            ordered("greaterThanOrEqual", args, |o| o != Ordering::Less)
        });
        registry.register_fn("lessThanOrEqual", Arity::Exact(2), |args| {
            ordered("lessThanOrEqual", args, |o| o != Ordering::Greater)
        });
        registry.register_fn("strictEquals", Arity::Exact(2), native_strict_equals);
        registry.register_fn("notEquals", Arity::Exact(2), native_not_equals);
    }
}

fn ordered(name: &str, args: &[Value], test: fn(Ordering) -> bool) -> Result<Value, CallError> {
    let (a, b) = (&args[0], &args[1]);
    if a.is_null() || b.is_null() {
        return Ok(Value::Bool(false));
    }
    match a.compare(b) {
        Some(ordering) => Ok(Value::Bool(test(ordering))),
        // NaN against a number
        None if a.is_number() && b.is_number() => Ok(Value::Bool(false)),
        None => Err(CallError::new(format!(
            "{}: cannot compare {} and {}",
            name,
            a.kind(),
            b.kind()
        ))),
    }
}

fn native_strict_equals(args: &[Value]) -> Result<Value, CallError> {
    Ok(Value::Bool(args[0].strict_eq(&args[1])))
}

fn native_not_equals(args: &[Value]) -> Result<Value, CallError> {
    Ok(Value::Bool(!args[0].strict_eq(&args[1])))
}
