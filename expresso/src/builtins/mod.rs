//! Built-in function library
//!
//! Each group is a [`FunctionProvider`]; [`register_all`] installs every
//! group. Functions are plain `fn(&[Value]) -> Result<Value, CallError>`
//! items. The registry checks arity before calling, so a native may index
//! its arguments directly.

mod collections;
mod comparison;
mod dates;
mod logic;
mod math;
mod strings;
mod utility;

pub use collections::CollectionFunctions;
pub use comparison::ComparisonFunctions;
pub use dates::DateFunctions;
pub use logic::LogicFunctions;
pub use math::MathFunctions;
pub use strings::StringFunctions;
pub use utility::UtilityFunctions;

use crate::error::CallError;
use crate::registry::{FunctionProvider, FunctionRegistry};
use crate::value::Value;

/// Register every built-in group
pub fn register_all(registry: &mut FunctionRegistry) {
    let providers: [&dyn FunctionProvider; 7] = [
        &StringFunctions,
        &MathFunctions,
        &LogicFunctions,
        &ComparisonFunctions,
        &CollectionFunctions,
        &DateFunctions,
        &UtilityFunctions,
    ];
    for provider in providers {
        registry.register_provider(provider);
    }
    tracing::debug!(functions = registry.len(), "registered built-in functions");
}

pub(crate) fn type_error(function: &str, expected: &str, got: &Value) -> CallError {
    CallError::new(format!(
        "{}: expected {}, got {}",
        function,
        expected,
        got.kind()
    ))
}

/// Integer argument; integral floats are accepted
pub(crate) fn int_arg(function: &str, value: &Value) -> Result<i64, CallError> {
    match value {
        Value::Integer(i) => Ok(*i),
        Value::Float(x) if x.fract() == 0.0 && x.is_finite() => Ok(*x as i64),
        other => Err(type_error(function, "integer", other)),
    }
}

pub(crate) fn number_arg(function: &str, value: &Value) -> Result<f64, CallError> {
    value
        .as_f64()
        .ok_or_else(|| type_error(function, "number", value))
}

pub(crate) fn str_arg<'a>(function: &str, value: &'a Value) -> Result<&'a str, CallError> {
    value
        .as_str()
        .ok_or_else(|| type_error(function, "string", value))
}
