use regex::Regex;

use super::{int_arg, str_arg, type_error};
use crate::error::CallError;
use crate::registry::{Arity, FunctionDescriptor, FunctionProvider, FunctionRegistry};
use crate::value::{Value, ValueKind};

/// String manipulation functions
#[derive(Debug, Clone, Copy, Default)]
pub struct StringFunctions;

impl FunctionProvider for StringFunctions {
    fn register_functions(&self, registry: &mut FunctionRegistry) {
        registry.register_fn("upperCase", Arity::Exact(1), native_upper_case);
        registry.register_fn("lowerCase", Arity::Exact(1), native_lower_case);
        registry.register_fn("length", Arity::Exact(1), native_length);
        registry.register_fn("trim", Arity::Exact(1), native_trim);
        registry.register_fn("substring", Arity::Range { min: 2, max: 3 }, native_substring);
        registry.register_fn("replace", Arity::Exact(3), native_replace);
        registry.register_fn("contains", Arity::Exact(2), native_contains);
        registry.register_fn("startsWith", Arity::Exact(2), native_starts_with);
        registry.register_fn("endsWith", Arity::Exact(2), native_ends_with);
        registry.register_fn("split", Arity::Exact(2), native_split);
        // join(delimiter, list) and list.join(delimiter)
        registry.register(
            FunctionDescriptor::new("join", Arity::Exact(2), native_join)
                .with_params([ValueKind::String, ValueKind::List]),
        );
        registry.register(
            FunctionDescriptor::new("join", Arity::Exact(2), native_join_receiver)
                .with_params([ValueKind::List, ValueKind::String]),
        );
        registry.register_fn("charAt", Arity::Exact(2), native_char_at);
        registry.register_fn("indexOf", Arity::Exact(2), native_index_of);
    }
}

fn native_upper_case(args: &[Value]) -> Result<Value, CallError> {
    Ok(Value::from(str_arg("upperCase", &args[0])?.to_uppercase()))
}

fn native_lower_case(args: &[Value]) -> Result<Value, CallError> {
    Ok(Value::from(str_arg("lowerCase", &args[0])?.to_lowercase()))
}

fn native_length(args: &[Value]) -> Result<Value, CallError> {
    let s = str_arg("length", &args[0])?;
    Ok(Value::Integer(s.chars().count() as i64))
}

fn native_trim(args: &[Value]) -> Result<Value, CallError> {
    Ok(Value::from(str_arg("trim", &args[0])?.trim()))
}

/// substring(text, start[, length]), in characters
fn native_substring(args: &[Value]) -> Result<Value, CallError> {
    let s = str_arg("substring", &args[0])?;
    let char_count = s.chars().count() as i64;
    let start = int_arg("substring", &args[1])?;
    if !(0..=char_count).contains(&start) {
        return Err(CallError::new(format!(
            "substring: start {} out of range for length {}",
            start, char_count
        )));
    }
    let length = match args.get(2) {
        Some(v) => int_arg("substring", v)?,
        None => char_count - start,
    };
    if length < 0 {
        return Err(CallError::new(format!(
            "substring: negative length {}",
            length
        )));
    }
    let taken: String = s
        .chars()
        .skip(start as usize)
        .take(length.min(char_count - start) as usize)
        .collect();
    Ok(Value::from(taken))
}

fn native_replace(args: &[Value]) -> Result<Value, CallError> {
    let s = str_arg("replace", &args[0])?;
    let from = str_arg("replace", &args[1])?;
    let to = str_arg("replace", &args[2])?;
    Ok(Value::from(s.replace(from, to)))
}

/// Substring test for strings, membership test for lists
fn native_contains(args: &[Value]) -> Result<Value, CallError> {
    let found = match (&args[0], &args[1]) {
        (Value::String(s), Value::String(needle)) => s.contains(needle.as_ref()),
        (Value::List(items), needle) => items.iter().any(|item| item == needle),
        _ => false,
    };
    Ok(Value::Bool(found))
}

fn native_starts_with(args: &[Value]) -> Result<Value, CallError> {
    let s = str_arg("startsWith", &args[0])?;
    Ok(Value::Bool(s.starts_with(str_arg("startsWith", &args[1])?)))
}

fn native_ends_with(args: &[Value]) -> Result<Value, CallError> {
    let s = str_arg("endsWith", &args[0])?;
    Ok(Value::Bool(s.ends_with(str_arg("endsWith", &args[1])?)))
}

/// Split on a regular expression; trailing empty pieces are dropped
fn native_split(args: &[Value]) -> Result<Value, CallError> {
    let s = str_arg("split", &args[0])?;
    let pattern = str_arg("split", &args[1])?;
    if s.is_empty() {
        return Ok(Value::list(vec![Value::from("")]));
    }
    let re = Regex::new(pattern).map_err(|e| {
        CallError::with_source(format!("split: invalid delimiter pattern '{}'", pattern), e)
    })?;

    let mut parts: Vec<&str> = re.split(s).collect();
    while parts.last().is_some_and(|p| p.is_empty()) {
        parts.pop();
    }
    Ok(Value::list(parts.into_iter().map(Value::from)))
}

fn join_items(delimiter: &str, items: &Value) -> Result<Value, CallError> {
    let Some(items) = items.as_list() else {
        return Err(type_error("join", "list", items));
    };
    let joined = items
        .iter()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join(delimiter);
    Ok(Value::from(joined))
}

fn native_join(args: &[Value]) -> Result<Value, CallError> {
    join_items(str_arg("join", &args[0])?, &args[1])
}

fn native_join_receiver(args: &[Value]) -> Result<Value, CallError> {
    join_items(str_arg("join", &args[1])?, &args[0])
}

fn native_char_at(args: &[Value]) -> Result<Value, CallError> {
    let s = str_arg("charAt", &args[0])?;
    let index = int_arg("charAt", &args[1])?;
    usize::try_from(index)
        .ok()
        .and_then(|i| s.chars().nth(i))
        .map(|c| Value::from(c.to_string()))
        .ok_or_else(|| CallError::new(format!("charAt: index {} out of range", index)))
}

/// Character index of the first occurrence, or -1
fn native_index_of(args: &[Value]) -> Result<Value, CallError> {
    let s = str_arg("indexOf", &args[0])?;
    let needle = str_arg("indexOf", &args[1])?;
    let index = s
        .find(needle)
        .map(|byte| s[..byte].chars().count() as i64)
        .unwrap_or(-1);
    Ok(Value::Integer(index))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn s(text: &str) -> Value {
        Value::from(text)
    }

    #[test]
    fn test_case_and_trim() {
        assert_eq!(native_upper_case(&[s("abc")]).unwrap(), s("ABC"));
        assert_eq!(native_lower_case(&[s("AbC")]).unwrap(), s("abc"));
        assert_eq!(native_trim(&[s("  x ")]).unwrap(), s("x"));
        assert!(native_upper_case(&[Value::Null]).is_err());
    }

    #[test]
    fn test_length_counts_chars() {
        assert_eq!(native_length(&[s("héllo")]).unwrap(), Value::Integer(5));
    }

    #[test]
    fn test_substring_start_and_length() {
        assert_eq!(
            native_substring(&[s("expresso"), Value::Integer(2)]).unwrap(),
            s("presso")
        );
        assert_eq!(
            native_substring(&[s("expresso"), Value::Integer(0), Value::Integer(3)]).unwrap(),
            s("exp")
        );
        assert_eq!(
            native_substring(&[s("abc"), Value::Integer(1), Value::Integer(10)]).unwrap(),
            s("bc")
        );
        assert!(native_substring(&[s("abc"), Value::Integer(4)]).is_err());
        assert!(native_substring(&[s("abc"), Value::Integer(0), Value::Integer(-1)]).is_err());
    }

    #[test]
    fn test_contains_string_and_list() {
        assert_eq!(
            native_contains(&[s("hello"), s("ell")]).unwrap(),
            Value::Bool(true)
        );
        assert_eq!(
            native_contains(&[s("hello"), Value::Integer(1)]).unwrap(),
            Value::Bool(false)
        );
        let list = Value::list(vec![Value::Integer(1), Value::Null]);
        assert_eq!(
            native_contains(&[list.clone(), Value::Float(1.0)]).unwrap(),
            Value::Bool(true)
        );
        assert_eq!(
            native_contains(&[list, Value::Null]).unwrap(),
            Value::Bool(true)
        );
        assert_eq!(
            native_contains(&[Value::Null, s("x")]).unwrap(),
            Value::Bool(false)
        );
    }

    #[test]
    fn test_split_drops_trailing_empty_pieces() {
        let parts = native_split(&[s("a,b,,c,,"), s(",")]).unwrap();
        assert_eq!(
            parts,
            Value::list(vec![s("a"), s("b"), s(""), s("c")])
        );
        let parts = native_split(&[s("a1b22c"), s("[0-9]+")]).unwrap();
        assert_eq!(parts, Value::list(vec![s("a"), s("b"), s("c")]));
        assert_eq!(
            native_split(&[s(""), s(",")]).unwrap(),
            Value::list(vec![s("")])
        );
        assert!(native_split(&[s("a"), s("(")]).is_err());
    }

    #[test]
    fn test_join_both_argument_orders() {
        let items = Value::list(vec![s("a"), Value::Integer(1), Value::Bool(true)]);
        assert_eq!(native_join(&[s("-"), items.clone()]).unwrap(), s("a-1-true"));
        assert_eq!(native_join_receiver(&[items, s("+")]).unwrap(), s("a+1+true"));
    }

    #[test]
    fn test_char_at_and_index_of() {
        assert_eq!(native_char_at(&[s("héllo"), Value::Integer(1)]).unwrap(), s("é"));
        assert!(native_char_at(&[s("abc"), Value::Integer(3)]).is_err());
        assert!(native_char_at(&[s("abc"), Value::Integer(-1)]).is_err());
        assert_eq!(
            native_index_of(&[s("héllo"), s("l")]).unwrap(),
            Value::Integer(2)
        );
        assert_eq!(
            native_index_of(&[s("abc"), s("z")]).unwrap(),
            Value::Integer(-1)
        );
    }

    #[test]
    fn test_replace_all() {
        assert_eq!(
            native_replace(&[s("a.b.c"), s("."), s("/")]).unwrap(),
            s("a/b/c")
        );
    }
}
