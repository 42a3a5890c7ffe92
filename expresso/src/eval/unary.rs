use expresso_parser::UnaryOp;

use crate::error::{EvalResult, EvaluationError};
use crate::value::Value;

pub(super) fn apply(op: UnaryOp, operand: &Value) -> EvalResult<Value> {
    match (op, operand) {
        (UnaryOp::Negate, Value::Integer(i)) => i
            .checked_neg()
            .map(Value::Integer)
            .ok_or_else(|| EvaluationError::overflow("-")),
        (UnaryOp::Negate, Value::Float(x)) => Ok(Value::Float(-x)),
        (UnaryOp::Not, Value::Bool(b)) => Ok(Value::Bool(!b)),
        (UnaryOp::Negate, other) => Err(EvaluationError::type_mismatch(format!(
            "cannot negate {}",
            other.kind()
        ))),
        (UnaryOp::Not, other) => Err(EvaluationError::type_mismatch(format!(
            "'!' expects a boolean, got {}",
            other.kind()
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EvalErrorKind;

    #[test]
    fn test_negate() {
        assert_eq!(apply(UnaryOp::Negate, &Value::Integer(3)).unwrap(), Value::Integer(-3));
        assert_eq!(apply(UnaryOp::Negate, &Value::Float(1.5)).unwrap(), Value::Float(-1.5));
        let err = apply(UnaryOp::Negate, &Value::Integer(i64::MIN)).unwrap_err();
        assert_eq!(err.kind, EvalErrorKind::NumericOverflow);
        let err = apply(UnaryOp::Negate, &Value::from("x")).unwrap_err();
        assert_eq!(err.kind, EvalErrorKind::TypeMismatch);
    }

    #[test]
    fn test_not_is_strict() {
        assert_eq!(apply(UnaryOp::Not, &Value::Bool(true)).unwrap(), Value::Bool(false));
        let err = apply(UnaryOp::Not, &Value::Null).unwrap_err();
        assert_eq!(err.to_string(), "type mismatch: '!' expects a boolean, got null");
    }
}
