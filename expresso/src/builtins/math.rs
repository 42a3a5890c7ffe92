use std::cmp::Ordering;

use super::{int_arg, number_arg, type_error};
use crate::error::CallError;
use crate::registry::{Arity, FunctionProvider, FunctionRegistry};
use crate::value::Value;

/// Numeric functions
#[derive(Debug, Clone, Copy, Default)]
pub struct MathFunctions;

impl FunctionProvider for MathFunctions {
    fn register_functions(&self, registry: &mut FunctionRegistry) {
        registry.register_fn("abs", Arity::Exact(1), native_abs);
        registry.register_fn("ceil", Arity::Exact(1), native_ceil);
        registry.register_fn("floor", Arity::Exact(1), native_floor);
        registry.register_fn("round", Arity::Range { min: 1, max: 2 }, native_round);
        registry.register_fn("max", Arity::Exact(2), native_max);
        registry.register_fn("min", Arity::Exact(2), native_min);
        registry.register_fn("pow", Arity::Exact(2), native_pow);
        registry.register_fn("sqrt", Arity::Exact(1), native_sqrt);
        registry.register_fn("sin", Arity::Exact(1), |args| unary_float("sin", args, f64::sin));
        registry.register_fn("cos", Arity::Exact(1), |args| unary_float("cos", args, f64::cos));
        registry.register_fn("tan", Arity::Exact(1), |args| unary_float("tan", args, f64::tan));
        registry.register_fn("log", Arity::Exact(1), |args| unary_float("log", args, f64::ln));
        registry.register_fn("log10", Arity::Exact(1), |args| {
            unary_float("log10", args, f64::log10)
        });
        registry.register_fn("exp", Arity::Exact(1), |args| unary_float("exp", args, f64::exp));
    }
}

fn unary_float(name: &str, args: &[Value], op: fn(f64) -> f64) -> Result<Value, CallError> {
    Ok(Value::Float(op(number_arg(name, &args[0])?)))
}

/// Half-up rounding
fn round_half_up(x: f64) -> f64 {
    (x + 0.5).floor()
}

fn native_abs(args: &[Value]) -> Result<Value, CallError> {
    match &args[0] {
        Value::Integer(i) => i
            .checked_abs()
            .map(Value::Integer)
            .ok_or_else(|| CallError::new("abs: integer overflow")),
        Value::Float(x) => Ok(Value::Float(x.abs())),
        other => Err(type_error("abs", "number", other)),
    }
}

fn native_ceil(args: &[Value]) -> Result<Value, CallError> {
    Ok(Value::Float(number_arg("ceil", &args[0])?.ceil()))
}

fn native_floor(args: &[Value]) -> Result<Value, CallError> {
    Ok(Value::Float(number_arg("floor", &args[0])?.floor()))
}

/// round(x) gives an integer; round(x, decimals) a float
fn native_round(args: &[Value]) -> Result<Value, CallError> {
    let x = number_arg("round", &args[0])?;
    match args.get(1) {
        None => {
            if let Value::Integer(i) = args[0] {
                return Ok(Value::Integer(i));
            }
            let rounded = round_half_up(x);
            if !rounded.is_finite() || rounded.abs() >= i64::MAX as f64 {
                return Err(CallError::new(format!("round: {} out of integer range", x)));
            }
            Ok(Value::Integer(rounded as i64))
        }
        Some(decimals) => {
            let decimals = int_arg("round", decimals)?;
            let decimals = i32::try_from(decimals)
                .map_err(|_| CallError::new(format!("round: invalid decimals {}", decimals)))?;
            let factor = 10f64.powi(decimals);
            Ok(Value::Float(round_half_up(x * factor) / factor))
        }
    }
}

/// Larger (`Greater`) or smaller (`Less`) of two numbers
fn extremum(name: &str, args: &[Value], keep: Ordering) -> Result<Value, CallError> {
    match (&args[0], &args[1]) {
        (Value::Integer(a), Value::Integer(b)) => {
            let pick = if a.cmp(b) == keep.reverse() { *b } else { *a };
            Ok(Value::Integer(pick))
        }
        (a, b) => {
            let x = number_arg(name, a)?;
            let y = number_arg(name, b)?;
            let pick = if x.partial_cmp(&y) == Some(keep.reverse()) { y } else { x };
            Ok(Value::Float(pick))
        }
    }
}

fn native_max(args: &[Value]) -> Result<Value, CallError> {
    extremum("max", args, Ordering::Greater)
}

fn native_min(args: &[Value]) -> Result<Value, CallError> {
    extremum("min", args, Ordering::Less)
}

fn native_pow(args: &[Value]) -> Result<Value, CallError> {
    let base = number_arg("pow", &args[0])?;
    let exponent = number_arg("pow", &args[1])?;
    Ok(Value::Float(base.powf(exponent)))
}

fn native_sqrt(args: &[Value]) -> Result<Value, CallError> {
    Ok(Value::Float(number_arg("sqrt", &args[0])?.sqrt()))
}
