//! End-to-end evaluation: source text in, value or error out.

mod common;

use common::{eval_err, eval_ok, user_context, CallCounter};
use expresso::*;
use pretty_assertions::assert_eq;

// ==================== Scenarios ====================

#[test]
fn test_arithmetic_precedence() {
    assert_eq!(eval_ok("1 + 2 * 3", &Context::new()), Value::Integer(7));
}

#[test]
fn test_null_safe_navigation_through_missing_address() {
    let ctx = Context::of("user", Value::map([("address", Value::Null)]));
    assert_eq!(eval_ok("user?.address?.city", &ctx), Value::Null);
}

#[test]
fn test_ternary_on_context_value() {
    let ctx = Context::of("age", 25);
    assert_eq!(
        eval_ok("age >= 18 ? \"adult\" : \"minor\"", &ctx),
        Value::from("adult")
    );
    let ctx = Context::of("age", 12);
    assert_eq!(
        eval_ok("age >= 18 ? \"adult\" : \"minor\"", &ctx),
        Value::from("minor")
    );
}

#[test]
fn test_index_out_of_range() {
    assert_eq!(eval_err("values[10]", &user_context()), EvalErrorKind::IndexError);
}

#[test]
fn test_unknown_function() {
    assert_eq!(eval_err("unknownFn(1, 2)", &Context::new()), EvalErrorKind::UnknownFunction);
}

#[test]
fn test_division_by_zero() {
    assert_eq!(eval_err("10 / 0", &Context::new()), EvalErrorKind::DivisionByZero);
    assert_eq!(eval_err("10.5 % 0.0", &Context::new()), EvalErrorKind::DivisionByZero);
}

// ==================== Navigation ====================

#[test]
fn test_nested_navigation() {
    let ctx = user_context();
    assert_eq!(eval_ok("user.address.city", &ctx), Value::from("London"));
    assert_eq!(eval_ok("user['address']['city']", &ctx), Value::from("London"));
    assert_eq!(eval_ok("user.tags[1]", &ctx), Value::from("editor"));
    assert_eq!(eval_ok("user.address.zip ?? 'n/a'", &ctx), Value::from("n/a"));
    assert_eq!(eval_ok("user?.manager?.name ?? 'none'", &ctx), Value::from("none"));
}

#[test]
fn test_null_safe_method_call() {
    let ctx = user_context().with("nickname", Value::Null);
    assert_eq!(eval_ok("nickname?.upperCase()", &ctx), Value::Null);
    assert_eq!(eval_ok("user.name?.upperCase()", &ctx), Value::from("ADA"));
}

#[test]
fn test_plain_navigation_errors() {
    let ctx = user_context();
    assert_eq!(eval_err("user.address.zip.code", &ctx), EvalErrorKind::NullReference);
    assert_eq!(eval_err("user.age.years", &ctx), EvalErrorKind::TypeMismatch);
    assert_eq!(eval_err("values['first']", &ctx), EvalErrorKind::IndexError);
    assert_eq!(eval_err("ghost.name", &ctx), EvalErrorKind::UndefinedVariable);
}

// ==================== Laziness ====================

#[test]
fn test_null_safe_chain_never_calls_later_segments() {
    let counter = CallCounter::new();
    let ctx = Context::of("a", Value::Null);
    assert_eq!(counter.eval("a?.b.c.track()", &ctx).unwrap(), Value::Null);
    assert_eq!(counter.eval("a?.b[track()].c", &ctx).unwrap(), Value::Null);
    assert_eq!(counter.calls(), 0);
}

#[test]
fn test_coalesce_evaluates_right_side_only_for_null() {
    let counter = CallCounter::new();
    let ctx = Context::new().with("set", 3).with("unset", Value::Null);

    assert_eq!(counter.eval("set ?? track(9)", &ctx).unwrap(), Value::Integer(3));
    assert_eq!(counter.calls(), 0);

    assert_eq!(counter.eval("unset ?? track(9)", &ctx).unwrap(), Value::Integer(9));
    assert_eq!(counter.calls(), 1);
}

#[test]
fn test_untaken_branch_never_runs() {
    let counter = CallCounter::new();
    let ctx = Context::new();
    assert_eq!(counter.eval("true ? 1 : track()", &ctx).unwrap(), Value::Integer(1));
    assert_eq!(counter.eval("false ? track() : 2", &ctx).unwrap(), Value::Integer(2));
    assert_eq!(counter.eval("false && track(true)", &ctx).unwrap(), Value::Bool(false));
    assert_eq!(counter.eval("true || track(true)", &ctx).unwrap(), Value::Bool(true));
    assert_eq!(counter.calls(), 0);
}

#[test]
fn test_arguments_evaluated_left_to_right_once() {
    let order = std::sync::Arc::new(std::sync::Mutex::new(Vec::new()));
    let seen = std::sync::Arc::clone(&order);
    let mut registry = FunctionRegistry::with_builtins();
    registry.register_fn("mark", Arity::Exact(1), move |args| {
        if let Ok(mut seen) = seen.lock() {
            seen.push(args[0].clone());
        }
        Ok(args[0].clone())
    });

    let value = evaluate("list(mark(1), mark(2), mark(3))", &Context::new(), &registry).unwrap();
    assert_eq!(value.to_string(), "[1, 2, 3]");
    assert_eq!(
        *order.lock().unwrap(),
        vec![Value::Integer(1), Value::Integer(2), Value::Integer(3)]
    );
}

// ==================== Operators ====================

#[test]
fn test_numeric_coercion() {
    let ctx = Context::new();
    assert_eq!(eval_ok("7 / 2", &ctx), Value::Float(3.5));
    assert!(matches!(eval_ok("8 / 2", &ctx), Value::Integer(4)));
    assert!(matches!(eval_ok("1 + 0.5", &ctx), Value::Float(x) if x == 1.5));
    assert_eq!(eval_ok("1 == 1.0", &ctx), Value::Bool(true));
    assert_eq!(eval_ok("'1' == 1", &ctx), Value::Bool(false));
    assert_eq!(eval_err("9223372036854775807 + 1", &ctx), EvalErrorKind::NumericOverflow);
}

#[test]
fn test_string_concatenation_uses_display_form() {
    let ctx = user_context();
    insta::assert_snapshot!(
        eval_ok("user.name + ' (' + user.age + ') ' + user.tags", &ctx).to_string(),
        @"Ada (36) [admin, editor]"
    );
    insta::assert_snapshot!(eval_ok("'total: ' + 2.0 * 3", &ctx).to_string(), @"total: 6.0");
}

#[test]
fn test_comparisons_with_null_are_false() {
    let ctx = Context::of("n", Value::Null);
    assert_eq!(eval_ok("n > 1", &ctx), Value::Bool(false));
    assert_eq!(eval_ok("n <= 1", &ctx), Value::Bool(false));
    assert_eq!(eval_ok("n == null", &ctx), Value::Bool(true));
    assert_eq!(eval_err("1 < 'a'", &ctx), EvalErrorKind::TypeMismatch);
}

#[test]
fn test_logical_operators_need_booleans() {
    let ctx = Context::new();
    assert_eq!(eval_ok("!(1 > 2) && 'a' < 'b'", &ctx), Value::Bool(true));
    assert_eq!(eval_err("!1", &ctx), EvalErrorKind::TypeMismatch);
    assert_eq!(eval_err("null || true", &ctx), EvalErrorKind::TypeMismatch);
}

// ==================== Errors ====================

#[test]
fn test_error_context_rendering() {
    let registry = FunctionRegistry::with_builtins();
    let source = "1 + values[10]";
    let err = evaluate(source, &user_context(), &registry).unwrap_err();
    insta::assert_snapshot!(
        err.to_string(),
        @"index error: index 10 out of range for list of length 5"
    );
    let rendered = err.format_with_context(source);
    assert!(rendered.contains("1 + values[10]"), "{rendered}");
    assert!(rendered.contains("^^^^^^^^^^"), "{rendered}");
}

#[test]
fn test_lex_and_parse_errors_are_distinct() {
    let registry = FunctionRegistry::new();
    let ctx = Context::new();
    assert!(matches!(evaluate("1 # 2", &ctx, &registry), Err(Error::Lex(_))));
    assert!(matches!(evaluate("(1 + 2", &ctx, &registry), Err(Error::Parse(_))));
    assert!(matches!(evaluate("1 2", &ctx, &registry), Err(Error::Parse(_))));
}

#[test]
fn test_function_error_keeps_source_chain() {
    use std::error::Error as _;

    let registry = FunctionRegistry::with_builtins();
    let err = evaluate("parseDate('31/02/2024', '%d/%m/%Y')", &Context::new(), &registry)
        .unwrap_err();
    assert_eq!(err.eval_kind(), Some(EvalErrorKind::FunctionError));

    // the top-level error is transparent, so its source is the call error
    let call = err.source().expect("call error");
    assert!(call.to_string().starts_with("parseDate: cannot parse"));
    assert!(call.source().is_some());
}
