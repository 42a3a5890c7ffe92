use super::type_error;
use crate::error::CallError;
use crate::registry::{Arity, FunctionProvider, FunctionRegistry};
use crate::value::Value;

/// Type inspection and conversion
#[derive(Debug, Clone, Copy, Default)]
pub struct UtilityFunctions;

impl FunctionProvider for UtilityFunctions {
    fn register_functions(&self, registry: &mut FunctionRegistry) {
        registry.register_fn("typeof", Arity::Exact(1), |args| {
            Ok(Value::from(args[0].type_name()))
        });
        registry.register_fn("toString", Arity::Exact(1), |args| {
            Ok(Value::from(args[0].to_string()))
        });
        registry.register_fn("toNumber", Arity::Exact(1), native_to_number);
        registry.register_fn("toBoolean", Arity::Exact(1), native_to_boolean);
    }
}

/// Integers stay integers; strings parse as an integer first, then a finite float
fn native_to_number(args: &[Value]) -> Result<Value, CallError> {
    match &args[0] {
        Value::Null => Ok(Value::Integer(0)),
        Value::Integer(i) => Ok(Value::Integer(*i)),
        Value::Float(x) => Ok(Value::Float(*x)),
        Value::Bool(b) => Ok(Value::Integer(i64::from(*b))),
        Value::String(s) => {
            let trimmed = s.trim();
            if let Ok(i) = trimmed.parse::<i64>() {
                return Ok(Value::Integer(i));
            }
            let x = trimmed.parse::<f64>().map_err(|e| {
                CallError::with_source(format!("toNumber: cannot convert '{}' to a number", s), e)
            })?;
            if !x.is_finite() {
                return Err(CallError::new(format!(
                    "toNumber: '{}' is not a finite number",
                    s
                )));
            }
            Ok(Value::Float(x))
        }
        other => Err(type_error("toNumber", "string, number or bool", other)),
    }
}

fn native_to_boolean(args: &[Value]) -> Result<Value, CallError> {
    let b = match &args[0] {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Integer(i) => *i != 0,
        Value::Float(x) => *x != 0.0,
        Value::String(s) => match s.to_lowercase().as_str() {
            "true" | "yes" | "1" => true,
            "false" | "no" | "0" => false,
            other => !other.is_empty(),
        },
        _ => true,
    };
    Ok(Value::Bool(b))
}
