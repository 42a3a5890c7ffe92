//! Member and index access

use crate::error::{EvalErrorKind, EvalResult, EvaluationError};
use crate::value::Value;

/// `target.name`
pub(super) fn member(target: &Value, name: &str) -> EvalResult<Value> {
    match target {
        Value::Map(map) => Ok(map.get(name).cloned().unwrap_or_default()),
        Value::Object(object) => object
            .property(name)
            .ok_or_else(|| property_not_found(object.type_name(), name)),
        Value::Null => Err(EvaluationError::null_reference(format!(
            "cannot read property '{}' of null",
            name
        ))),
        other => Err(EvaluationError::type_mismatch(format!(
            "cannot read property '{}' of {}",
            name,
            other.kind()
        ))),
    }
}

/// `target[index]`; with `lenient` set an out-of-range position yields null
pub(super) fn index(target: &Value, index: &Value, lenient: bool) -> EvalResult<Value> {
    match (target, index) {
        (Value::List(items), Value::Integer(i)) => match position(*i, items.len()) {
            Some(at) => Ok(items[at].clone()),
            None => out_of_range(*i, items.len(), "list", lenient),
        },
        (Value::String(s), Value::Integer(i)) => {
            let len = s.chars().count();
            match position(*i, len).and_then(|at| s.chars().nth(at)) {
                Some(c) => Ok(Value::from(c.to_string())),
                None => out_of_range(*i, len, "string", lenient),
            }
        }
        (Value::Map(map), Value::String(key)) => Ok(map.get(&**key).cloned().unwrap_or_default()),
        (Value::Object(object), Value::String(key)) => object
            .property(key)
            .ok_or_else(|| property_not_found(object.type_name(), key)),
        (Value::List(_) | Value::String(_), other) => Err(EvaluationError::index_error(format!(
            "{} index must be an integer, got {}",
            target.kind(),
            other.kind()
        ))),
        (Value::Map(_) | Value::Object(_), other) => Err(EvaluationError::index_error(format!(
            "{} key must be a string, got {}",
            target.kind(),
            other.kind()
        ))),
        (Value::Null, _) => Err(EvaluationError::null_reference("cannot index into null")),
        (other, _) => Err(EvaluationError::type_mismatch(format!(
            "cannot index into {}",
            other.kind()
        ))),
    }
}

fn position(index: i64, len: usize) -> Option<usize> {
    usize::try_from(index).ok().filter(|at| *at < len)
}

fn out_of_range(index: i64, len: usize, what: &str, lenient: bool) -> EvalResult<Value> {
    if lenient {
        return Ok(Value::Null);
    }
    Err(EvaluationError::index_error(format!(
        "index {} out of range for {} of length {}",
        index, what, len
    )))
}

fn property_not_found(type_name: &str, name: &str) -> EvaluationError {
    EvaluationError::new(
        EvalErrorKind::PropertyNotFound,
        format!("{} has no property '{}'", type_name, name),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::PropertyAccess;

    #[derive(Debug)]
    struct Point;

    impl PropertyAccess for Point {
        fn type_name(&self) -> &str {
            "Point"
        }

        fn property(&self, name: &str) -> Option<Value> {
            (name == "x").then_some(Value::Integer(3))
        }

        fn property_names(&self) -> Vec<String> {
            vec!["x".to_string()]
        }
    }

    fn letters() -> Value {
        Value::list(["a", "b", "c"].map(Value::from))
    }

    #[test]
    fn test_member_on_map_and_object() {
        let map = Value::map([("name", Value::from("Ada"))]);
        assert_eq!(member(&map, "name").unwrap(), Value::from("Ada"));
        assert_eq!(member(&map, "missing").unwrap(), Value::Null);

        let point = Value::object(Point);
        assert_eq!(member(&point, "x").unwrap(), Value::Integer(3));
        let err = member(&point, "y").unwrap_err();
        assert_eq!(err.kind, EvalErrorKind::PropertyNotFound);
        assert_eq!(err.message, "Point has no property 'y'");
    }

    #[test]
    fn test_member_on_null_and_scalars() {
        assert_eq!(member(&Value::Null, "x").unwrap_err().kind, EvalErrorKind::NullReference);
        assert_eq!(
            member(&Value::Integer(1), "x").unwrap_err().kind,
            EvalErrorKind::TypeMismatch
        );
    }

    #[test]
    fn test_list_index() {
        assert_eq!(index(&letters(), &Value::Integer(1), false).unwrap(), Value::from("b"));
        let err = index(&letters(), &Value::Integer(10), false).unwrap_err();
        assert_eq!(err.kind, EvalErrorKind::IndexError);
        assert_eq!(err.message, "index 10 out of range for list of length 3");
        assert_eq!(
            index(&letters(), &Value::Integer(-1), false).unwrap_err().kind,
            EvalErrorKind::IndexError
        );
        assert_eq!(index(&letters(), &Value::Integer(10), true).unwrap(), Value::Null);
        assert_eq!(
            index(&letters(), &Value::from("0"), false).unwrap_err().kind,
            EvalErrorKind::IndexError
        );
    }

    #[test]
    fn test_string_index_counts_chars() {
        let word = Value::from("héllo");
        assert_eq!(index(&word, &Value::Integer(1), false).unwrap(), Value::from("é"));
        assert!(index(&word, &Value::Integer(5), false).is_err());
    }

    #[test]
    fn test_map_and_object_index() {
        let map = Value::map([("k", Value::Integer(1))]);
        assert_eq!(index(&map, &Value::from("k"), false).unwrap(), Value::Integer(1));
        assert_eq!(index(&map, &Value::from("z"), false).unwrap(), Value::Null);
        assert_eq!(
            index(&map, &Value::Integer(0), false).unwrap_err().kind,
            EvalErrorKind::IndexError
        );
        assert_eq!(
            index(&Value::object(Point), &Value::from("x"), false).unwrap(),
            Value::Integer(3)
        );
    }

    #[test]
    fn test_index_on_null_and_scalars() {
        assert_eq!(
            index(&Value::Null, &Value::Integer(0), false).unwrap_err().kind,
            EvalErrorKind::NullReference
        );
        assert_eq!(
            index(&Value::Bool(true), &Value::Integer(0), false).unwrap_err().kind,
            EvalErrorKind::TypeMismatch
        );
    }
}
