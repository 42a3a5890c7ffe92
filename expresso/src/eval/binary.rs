//! Strict binary operators
//!
//! `&&`, `||` and `??` are handled by the evaluator itself since they decide
//! whether the right operand is evaluated at all.

use std::cmp::Ordering;

use expresso_parser::BinaryOp;

use crate::error::{EvalResult, EvaluationError};
use crate::value::Value;

pub(super) fn apply(op: BinaryOp, lhs: &Value, rhs: &Value) -> EvalResult<Value> {
    match op {
        BinaryOp::Add => add(lhs, rhs),
        BinaryOp::Sub => arithmetic(op, lhs, rhs, i64::checked_sub, |a, b| a - b),
        BinaryOp::Mul => arithmetic(op, lhs, rhs, i64::checked_mul, |a, b| a * b),
        BinaryOp::Div => divide(lhs, rhs),
        BinaryOp::Rem => {
            check_divisor(op, lhs, rhs)?;
            arithmetic(op, lhs, rhs, i64::checked_rem, |a, b| a % b)
        }
        BinaryOp::Eq => Ok(Value::Bool(lhs == rhs)),
        BinaryOp::NotEq => Ok(Value::Bool(lhs != rhs)),
        BinaryOp::Lt => relational(op, lhs, rhs, Ordering::is_lt),
        BinaryOp::LtEq => relational(op, lhs, rhs, Ordering::is_le),
        BinaryOp::Gt => relational(op, lhs, rhs, Ordering::is_gt),
        BinaryOp::GtEq => relational(op, lhs, rhs, Ordering::is_ge),
        BinaryOp::And | BinaryOp::Or => {
            let lhs = expect_bool(op, lhs)?;
            let rhs = expect_bool(op, rhs)?;
            Ok(Value::Bool(if op == BinaryOp::And {
                lhs && rhs
            } else {
                lhs || rhs
            }))
        }
        BinaryOp::Coalesce => Ok(if lhs.is_null() {
            rhs.clone()
        } else {
            lhs.clone()
        }),
    }
}

/// Operand of a logical operator
pub(super) fn expect_bool(op: BinaryOp, value: &Value) -> EvalResult<bool> {
    match value {
        Value::Bool(b) => Ok(*b),
        other => Err(EvaluationError::type_mismatch(format!(
            "'{}' expects boolean operands, got {}",
            op.symbol(),
            other.kind()
        ))),
    }
}

fn mismatch(op: BinaryOp, lhs: &Value, rhs: &Value) -> EvaluationError {
    EvaluationError::type_mismatch(format!(
        "cannot apply '{}' to {} and {}",
        op.symbol(),
        lhs.kind(),
        rhs.kind()
    ))
}

fn add(lhs: &Value, rhs: &Value) -> EvalResult<Value> {
    match (lhs, rhs) {
        (Value::String(_), _) | (_, Value::String(_)) => {
            Ok(Value::from(format!("{}{}", lhs, rhs)))
        }
        _ => arithmetic(BinaryOp::Add, lhs, rhs, i64::checked_add, |a, b| a + b),
    }
}

/// Integer pairs use the checked operation; any float operand promotes both
fn arithmetic(
    op: BinaryOp,
    lhs: &Value,
    rhs: &Value,
    int_op: fn(i64, i64) -> Option<i64>,
    float_op: fn(f64, f64) -> f64,
) -> EvalResult<Value> {
    match (lhs, rhs) {
        (Value::Integer(a), Value::Integer(b)) => int_op(*a, *b)
            .map(Value::Integer)
            .ok_or_else(|| EvaluationError::overflow(op.symbol())),
        _ => match (lhs.as_f64(), rhs.as_f64()) {
            (Some(a), Some(b)) => Ok(Value::Float(float_op(a, b))),
            _ => Err(mismatch(op, lhs, rhs)),
        },
    }
}

fn check_divisor(op: BinaryOp, lhs: &Value, rhs: &Value) -> EvalResult<()> {
    if !lhs.is_number() || !rhs.is_number() {
        return Err(mismatch(op, lhs, rhs));
    }
    match rhs {
        Value::Integer(0) => Err(EvaluationError::division_by_zero()),
        Value::Float(x) if *x == 0.0 => Err(EvaluationError::division_by_zero()),
        _ => Ok(()),
    }
}

/// Exact integer quotients stay integers; the rest become floats
fn divide(lhs: &Value, rhs: &Value) -> EvalResult<Value> {
    check_divisor(BinaryOp::Div, lhs, rhs)?;
    match (lhs, rhs) {
        (Value::Integer(a), Value::Integer(b)) => match a.checked_rem(*b) {
            Some(0) => Ok(Value::Integer(a / b)),
            Some(_) => Ok(Value::Float(*a as f64 / *b as f64)),
            None => Err(EvaluationError::overflow("/")),
        },
        _ => arithmetic(BinaryOp::Div, lhs, rhs, i64::checked_div, |a, b| a / b),
    }
}

/// Null on either side compares false; unordered numbers (NaN) too
fn relational(
    op: BinaryOp,
    lhs: &Value,
    rhs: &Value,
    test: fn(Ordering) -> bool,
) -> EvalResult<Value> {
    if lhs.is_null() || rhs.is_null() {
        return Ok(Value::Bool(false));
    }
    match lhs.compare(rhs) {
        Some(ordering) => Ok(Value::Bool(test(ordering))),
        None if lhs.is_number() && rhs.is_number() => Ok(Value::Bool(false)),
        None => Err(mismatch(op, lhs, rhs)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EvalErrorKind;

    fn int(i: i64) -> Value {
        Value::Integer(i)
    }

    fn kind_of(result: EvalResult<Value>) -> EvalErrorKind {
        result.unwrap_err().kind
    }

    #[test]
    fn test_integer_arithmetic_stays_integer() {
        assert_eq!(apply(BinaryOp::Add, &int(2), &int(3)).unwrap(), Value::Integer(5));
        assert_eq!(apply(BinaryOp::Sub, &int(2), &int(3)).unwrap(), Value::Integer(-1));
        assert_eq!(apply(BinaryOp::Mul, &int(4), &int(3)).unwrap(), Value::Integer(12));
        assert_eq!(apply(BinaryOp::Rem, &int(7), &int(3)).unwrap(), Value::Integer(1));
    }

    #[test]
    fn test_float_promotion() {
        let sum = apply(BinaryOp::Add, &int(1), &Value::Float(0.5)).unwrap();
        assert!(matches!(sum, Value::Float(x) if x == 1.5));
        let product = apply(BinaryOp::Mul, &Value::Float(2.0), &int(3)).unwrap();
        assert!(matches!(product, Value::Float(x) if x == 6.0));
    }

    #[test]
    fn test_division() {
        assert!(matches!(
            apply(BinaryOp::Div, &int(10), &int(2)).unwrap(),
            Value::Integer(5)
        ));
        assert!(matches!(
            apply(BinaryOp::Div, &int(7), &int(2)).unwrap(),
            Value::Float(x) if x == 3.5
        ));
        assert_eq!(kind_of(apply(BinaryOp::Div, &int(10), &int(0))), EvalErrorKind::DivisionByZero);
        assert_eq!(
            kind_of(apply(BinaryOp::Div, &Value::Float(1.0), &Value::Float(0.0))),
            EvalErrorKind::DivisionByZero
        );
        assert_eq!(kind_of(apply(BinaryOp::Rem, &int(1), &int(0))), EvalErrorKind::DivisionByZero);
        assert_eq!(
            kind_of(apply(BinaryOp::Div, &int(i64::MIN), &int(-1))),
            EvalErrorKind::NumericOverflow
        );
    }

    #[test]
    fn test_overflow() {
        assert_eq!(
            kind_of(apply(BinaryOp::Add, &int(i64::MAX), &int(1))),
            EvalErrorKind::NumericOverflow
        );
        assert_eq!(
            kind_of(apply(BinaryOp::Mul, &int(i64::MAX), &int(2))),
            EvalErrorKind::NumericOverflow
        );
    }

    #[test]
    fn test_string_concatenation() {
        let joined = apply(BinaryOp::Add, &Value::from("n="), &int(3)).unwrap();
        assert_eq!(joined, Value::from("n=3"));
        let joined = apply(BinaryOp::Add, &Value::Float(2.0), &Value::from("x")).unwrap();
        assert_eq!(joined, Value::from("2.0x"));
        let joined = apply(BinaryOp::Add, &Value::from("v: "), &Value::Null).unwrap();
        assert_eq!(joined, Value::from("v: null"));
    }

    #[test]
    fn test_arithmetic_type_mismatch() {
        let err = apply(BinaryOp::Sub, &Value::from("a"), &int(1)).unwrap_err();
        assert_eq!(err.kind, EvalErrorKind::TypeMismatch);
        assert_eq!(err.message, "cannot apply '-' to string and integer");
        assert_eq!(
            kind_of(apply(BinaryOp::Div, &Value::Bool(true), &int(0))),
            EvalErrorKind::TypeMismatch
        );
    }

    #[test]
    fn test_equality() {
        assert_eq!(apply(BinaryOp::Eq, &int(1), &Value::Float(1.0)).unwrap(), Value::Bool(true));
        assert_eq!(apply(BinaryOp::Eq, &int(1), &Value::from("1")).unwrap(), Value::Bool(false));
        assert_eq!(apply(BinaryOp::NotEq, &Value::Null, &int(0)).unwrap(), Value::Bool(true));
        assert_eq!(apply(BinaryOp::Eq, &Value::Null, &Value::Null).unwrap(), Value::Bool(true));
    }

    #[test]
    fn test_relational() {
        assert_eq!(apply(BinaryOp::Lt, &int(1), &Value::Float(1.5)).unwrap(), Value::Bool(true));
        assert_eq!(
            apply(BinaryOp::GtEq, &Value::from("b"), &Value::from("a")).unwrap(),
            Value::Bool(true)
        );
        assert_eq!(apply(BinaryOp::Gt, &Value::Null, &int(1)).unwrap(), Value::Bool(false));
        assert_eq!(apply(BinaryOp::LtEq, &int(1), &Value::Null).unwrap(), Value::Bool(false));
        assert_eq!(
            apply(BinaryOp::Lt, &Value::Float(f64::NAN), &int(1)).unwrap(),
            Value::Bool(false)
        );
        assert_eq!(
            kind_of(apply(BinaryOp::Lt, &int(1), &Value::from("2"))),
            EvalErrorKind::TypeMismatch
        );
    }
}
