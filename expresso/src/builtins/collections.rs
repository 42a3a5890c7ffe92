use super::{int_arg, type_error};
use crate::error::CallError;
use crate::registry::{Arity, FunctionProvider, FunctionRegistry};
use crate::value::Value;

/// List and size functions
#[derive(Debug, Clone, Copy, Default)]
pub struct CollectionFunctions;

impl FunctionProvider for CollectionFunctions {
    fn register_functions(&self, registry: &mut FunctionRegistry) {
        registry.register_fn("size", Arity::Exact(1), native_size);
        registry.register_fn("first", Arity::Exact(1), native_first);
        registry.register_fn("last", Arity::Exact(1), native_last);
        registry.register_fn("subList", Arity::Range { min: 2, max: 3 }, native_sub_list);
        registry.register_fn("list", Arity::AtLeast(0), |args| Ok(Value::list(args.to_vec())));
    }
}

fn native_size(args: &[Value]) -> Result<Value, CallError> {
    let size = match &args[0] {
        Value::Null => 0,
        Value::String(s) => s.chars().count(),
        Value::List(items) => items.len(),
        Value::Map(map) => map.len(),
        other => return Err(type_error("size", "string, list or map", other)),
    };
    Ok(Value::Integer(size as i64))
}

fn native_first(args: &[Value]) -> Result<Value, CallError> {
    Ok(args[0]
        .as_list()
        .and_then(|items| items.first())
        .cloned()
        .unwrap_or_default())
}

fn native_last(args: &[Value]) -> Result<Value, CallError> {
    Ok(args[0]
        .as_list()
        .and_then(|items| items.last())
        .cloned()
        .unwrap_or_default())
}

/// subList(list, start[, end]) with both bounds clamped into range
fn native_sub_list(args: &[Value]) -> Result<Value, CallError> {
    let items = match &args[0] {
        Value::Null => return Ok(Value::list(Vec::new())),
        Value::List(items) => items,
        other => return Err(type_error("subList", "list", other)),
    };
    let len = items.len() as i64;
    let start = int_arg("subList", &args[1])?.clamp(0, len);
    let end = match args.get(2) {
        Some(v) => int_arg("subList", v)?,
        None => len,
    }
    .clamp(start, len);
    Ok(Value::list(items[start as usize..end as usize].to_vec()))
}
