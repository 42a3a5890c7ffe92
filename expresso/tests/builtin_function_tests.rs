//! Built-in functions called from expressions, including method-call syntax

mod common;

use common::{eval_err, eval_ok, user_context};
use expresso::*;
use pretty_assertions::assert_eq;

fn show(source: &str) -> String {
    eval_ok(source, &user_context()).to_string()
}

// ==================== Strings ====================

#[test]
fn test_string_functions() {
    insta::assert_snapshot!(show("upperCase(trim('  ada  '))"), @"ADA");
    insta::assert_snapshot!(show("user.name.lowerCase() + length(user.name)"), @"ada3");
    insta::assert_snapshot!(show("substring('expresso', 2, 3)"), @"pre");
    insta::assert_snapshot!(show("replace('a-b-c', '-', '+')"), @"a+b+c");
    insta::assert_snapshot!(show("indexOf('expresso', 'press')"), @"2");
    insta::assert_snapshot!(show("charAt(user.name, 2)"), @"a");
    insta::assert_snapshot!(show("startsWith(user.name, 'A') && endsWith(user.name, 'a')"), @"true");
}

#[test]
fn test_split_and_join() {
    insta::assert_snapshot!(show("split('a,b,,c,,', ',')"), @"[a, b, , c]");
    insta::assert_snapshot!(show("size(split('one  two three', '\\\\s+'))"), @"3");
    insta::assert_snapshot!(show("join(', ', user.tags)"), @"admin, editor");
    insta::assert_snapshot!(show("user.tags.join('/')"), @"admin/editor");
    insta::assert_snapshot!(show("join('-', values)"), @"1-2-3-4-5");
}

#[test]
fn test_contains_on_strings_and_lists() {
    let ctx = user_context();
    assert_eq!(eval_ok("contains(user.tags, 'admin')", &ctx), Value::Bool(true));
    assert_eq!(eval_ok("user.name.contains('d')", &ctx), Value::Bool(true));
    assert_eq!(eval_ok("contains(values, 9)", &ctx), Value::Bool(false));
}

// ==================== Math ====================

#[test]
fn test_math_functions() {
    let ctx = Context::new();
    assert_eq!(eval_ok("abs(-4)", &ctx), Value::Integer(4));
    assert_eq!(eval_ok("round(2.5)", &ctx), Value::Integer(3));
    assert_eq!(eval_ok("round(3.14159, 2)", &ctx), Value::Float(3.14));
    assert_eq!(eval_ok("max(3, 7)", &ctx), Value::Integer(7));
    assert_eq!(eval_ok("min(1, 2.5)", &ctx), Value::Float(1.0));
    assert_eq!(eval_ok("floor(2.7) + ceil(2.2)", &ctx), Value::Float(5.0));
    insta::assert_snapshot!(show("pow(2, 10)"), @"1024.0");
    insta::assert_snapshot!(show("sqrt(16)"), @"4.0");
}

// ==================== Logic and comparison ====================

#[test]
fn test_logic_functions() {
    let ctx = user_context();
    assert_eq!(eval_ok("coalesce(null, user.address.zip, 'x')", &ctx), Value::from("x"));
    assert_eq!(eval_ok("coalesce(ghost?.name, user.name)", &ctx), Value::from("Ada"));
    assert_eq!(eval_ok("ifThen(size(values) > 3, 'many', 'few')", &ctx), Value::from("many"));
    assert_eq!(eval_ok("isEmpty(list()) && isNull(user.address.zip)", &ctx), Value::Bool(true));
    assert_eq!(eval_ok("isList(user.tags) && isMap(user.address)", &ctx), Value::Bool(true));
}

#[test]
fn test_equality_functions() {
    let ctx = Context::new();
    assert_eq!(eval_ok("equals(1, 1.0)", &ctx), Value::Bool(true));
    assert_eq!(eval_ok("strictEquals(1, 1.0)", &ctx), Value::Bool(false));
    assert_eq!(eval_ok("notEquals('a', 'b')", &ctx), Value::Bool(true));
    assert_eq!(eval_ok("greaterThan(null, 1)", &ctx), Value::Bool(false));
    assert_eq!(eval_ok("lessThanOrEqual(2, 2.0)", &ctx), Value::Bool(true));
}

// ==================== Collections ====================

#[test]
fn test_collection_functions() {
    insta::assert_snapshot!(show("first(values) + last(values)"), @"6");
    insta::assert_snapshot!(show("subList(values, 1, 3)"), @"[2, 3]");
    insta::assert_snapshot!(show("subList(values, -5, 99)"), @"[1, 2, 3, 4, 5]");
    insta::assert_snapshot!(show("size(user) + size(user.name)"), @"7");
    insta::assert_snapshot!(show("list(1, 'two', null, list())"), @"[1, two, null, []]");
}

// ==================== Dates ====================

#[test]
fn test_date_functions() {
    insta::assert_snapshot!(
        show("formatDate(addDays(parseDate('2024-02-27'), 3), '%d/%m/%Y')"),
        @"01/03/2024"
    );
    insta::assert_snapshot!(show("addMonths(parseDate('2024-01-31'), 1)"), @"2024-02-29");
    insta::assert_snapshot!(show("addYears(parseDate('2024-02-29'), -1)"), @"2023-02-28");
    insta::assert_snapshot!(
        show("daysBetween(parseDate('2024-01-01'), parseDate('2024-03-01'))"),
        @"60"
    );
    insta::assert_snapshot!(show("year(parseDate('06.05.2024', '%d.%m.%Y'))"), @"2024");
    insta::assert_snapshot!(show("format(parseDate('2024-01-15'), '%Y')"), @"2024");
    insta::assert_snapshot!(show("parseDate('2024-01-15').format('%d.%m')"), @"15.01");

    let ctx = Context::new();
    assert_eq!(
        eval_ok("isDateBefore(parseDate('2024-01-01'), parseDate('2024-01-02'))", &ctx),
        Value::Bool(true)
    );
    assert_eq!(eval_ok("typeof(currentDate())", &ctx), Value::from("date"));
}

// ==================== Conversion ====================

#[test]
fn test_conversion_functions() {
    let ctx = user_context();
    assert_eq!(eval_ok("toNumber('42') + 1", &ctx), Value::Integer(43));
    assert_eq!(eval_ok("toNumber(' 2.5 ')", &ctx), Value::Float(2.5));
    assert_eq!(eval_ok("toBoolean('yes') && !toBoolean(0)", &ctx), Value::Bool(true));
    assert_eq!(eval_ok("toString(1.0) + toString(null)", &ctx), Value::from("1.0null"));

    let types: Vec<String> = ["1.5", "values", "user", "null", "'s'", "true"]
        .iter()
        .map(|arg| show(&format!("typeof({})", arg)))
        .collect();
    assert_eq!(types, ["number", "list", "map", "null", "string", "boolean"]);
}

// ==================== Failures ====================

#[test]
fn test_builtin_failures() {
    let ctx = user_context();
    assert_eq!(eval_err("upperCase(1)", &ctx), EvalErrorKind::FunctionError);
    assert_eq!(eval_err("upperCase()", &ctx), EvalErrorKind::ArityMismatch);
    assert_eq!(eval_err("charAt('abc', 5)", &ctx), EvalErrorKind::FunctionError);
    assert_eq!(eval_err("toNumber('abc')", &ctx), EvalErrorKind::FunctionError);
    assert_eq!(eval_err("toNumber('NaN')", &ctx), EvalErrorKind::FunctionError);
    assert_eq!(eval_err("toNumber('inf')", &ctx), EvalErrorKind::FunctionError);
    assert_eq!(eval_err("toNumber('infinity')", &ctx), EvalErrorKind::FunctionError);
    assert_eq!(eval_err("join(1, 2)", &ctx), EvalErrorKind::TypeMismatch);
    assert_eq!(
        eval_err("formatDate(parseDate('2024-01-01'), '%Q')", &ctx),
        EvalErrorKind::FunctionError
    );
}

#[test]
fn test_builtin_failure_message() {
    let err = Engine::new().evaluate("upperCase(user.age)", &user_context()).unwrap_err();
    insta::assert_snapshot!(
        err.to_string(),
        @"function error: function 'upperCase' failed: upperCase: expected string, got integer"
    );
}
