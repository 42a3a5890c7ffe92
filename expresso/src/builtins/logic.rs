use crate::error::CallError;
use crate::registry::{Arity, FunctionProvider, FunctionRegistry};
use crate::value::Value;

/// Null checks, type predicates and value selection
#[derive(Debug, Clone, Copy, Default)]
pub struct LogicFunctions;

impl FunctionProvider for LogicFunctions {
    fn register_functions(&self, registry: &mut FunctionRegistry) {
        registry.register_fn("isNull", Arity::Exact(1), |args| {
            Ok(Value::Bool(args[0].is_null()))
        });
        registry.register_fn("coalesce", Arity::AtLeast(0), native_coalesce);
        registry.register_fn("isEmpty", Arity::Exact(1), native_is_empty);
        registry.register_fn("isNumber", Arity::Exact(1), |args| {
            Ok(Value::Bool(args[0].is_number()))
        });
        registry.register_fn("isString", Arity::Exact(1), |args| {
            Ok(Value::Bool(matches!(args[0], Value::String(_))))
        });
        registry.register_fn("isBoolean", Arity::Exact(1), |args| {
            Ok(Value::Bool(matches!(args[0], Value::Bool(_))))
        });
        registry.register_fn("isList", Arity::Exact(1), |args| {
            Ok(Value::Bool(matches!(args[0], Value::List(_))))
        });
        registry.register_fn("isMap", Arity::Exact(1), |args| {
            Ok(Value::Bool(matches!(args[0], Value::Map(_))))
        });
        registry.register_fn("equals", Arity::Exact(2), |args| {
            Ok(Value::Bool(args[0] == args[1]))
        });
        registry.register_fn("ifThen", Arity::Exact(3), native_if_then);
    }
}

/// First non-null argument, or null
fn native_coalesce(args: &[Value]) -> Result<Value, CallError> {
    Ok(args.iter().find(|v| !v.is_null()).cloned().unwrap_or_default())
}

fn native_is_empty(args: &[Value]) -> Result<Value, CallError> {
    let empty = match &args[0] {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        Value::List(items) => items.is_empty(),
        Value::Map(map) => map.is_empty(),
        _ => false,
    };
    Ok(Value::Bool(empty))
}

/// ifThen(condition, then, else); null is false, other non-booleans are true
fn native_if_then(args: &[Value]) -> Result<Value, CallError> {
    let condition = match &args[0] {
        Value::Null => false,
        Value::Bool(b) => *b,
        _ => true,
    };
    Ok(if condition { args[1].clone() } else { args[2].clone() })
}
