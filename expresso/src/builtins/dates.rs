use std::fmt::Write as _;

use chrono::format::{Item, StrftimeItems};
use chrono::{Datelike, Days, Local, Months, NaiveDate};

use super::{int_arg, str_arg, type_error};
use crate::error::CallError;
use crate::registry::{Arity, FunctionProvider, FunctionRegistry};
use crate::value::Value;

/// Default pattern for `parseDate`
pub const DEFAULT_DATE_PATTERN: &str = "%Y-%m-%d";

/// Calendar date functions
///
/// Patterns use chrono's strftime syntax (`%Y-%m-%d`).
#[derive(Debug, Clone, Copy, Default)]
pub struct DateFunctions;

impl FunctionProvider for DateFunctions {
    fn register_functions(&self, registry: &mut FunctionRegistry) {
        registry.register_fn("currentDate", Arity::Exact(0), native_today);
        registry.register_fn("now", Arity::Exact(0), native_today);
        registry.register_fn("parseDate", Arity::Range { min: 1, max: 2 }, native_parse_date);
        registry.register_fn("formatDate", Arity::Exact(2), native_format_date);
        registry.register_fn("format", Arity::Exact(2), native_format_date);
        registry.register_fn("isDateBefore", Arity::Exact(2), |args| {
            let (a, b) = date_pair("isDateBefore", args)?;
            Ok(Value::Bool(a < b))
        });
        registry.register_fn("isDateAfter", Arity::Exact(2), |args| {
            let (a, b) = date_pair("isDateAfter", args)?;
            Ok(Value::Bool(a > b))
        });
        registry.register_fn("daysBetween", Arity::Exact(2), |args| {
            days_between("daysBetween", args)
        });
        registry.register_fn("dateDiff", Arity::Exact(2), |args| days_between("dateDiff", args));
        registry.register_fn("addDays", Arity::Exact(2), native_add_days);
        registry.register_fn("addMonths", Arity::Exact(2), native_add_months);
        registry.register_fn("addYears", Arity::Exact(2), native_add_years);
        for name in ["year", "getYear"] {
            registry.register_fn(name, Arity::Exact(1), |args| {
                Ok(Value::Integer(i64::from(date_arg("year", &args[0])?.year())))
            });
        }
        for name in ["month", "getMonth"] {
            registry.register_fn(name, Arity::Exact(1), |args| {
                Ok(Value::Integer(i64::from(date_arg("month", &args[0])?.month())))
            });
        }
        for name in ["dayOfMonth", "getDayOfMonth"] {
            registry.register_fn(name, Arity::Exact(1), |args| {
                Ok(Value::Integer(i64::from(date_arg("dayOfMonth", &args[0])?.day())))
            });
        }
    }
}

fn date_arg(function: &str, value: &Value) -> Result<NaiveDate, CallError> {
    value
        .as_date()
        .ok_or_else(|| type_error(function, "date", value))
}

fn date_pair(function: &str, args: &[Value]) -> Result<(NaiveDate, NaiveDate), CallError> {
    Ok((date_arg(function, &args[0])?, date_arg(function, &args[1])?))
}

/// Parse a strftime pattern, rejecting invalid specifiers
fn pattern_items<'a>(function: &str, pattern: &'a str) -> Result<Vec<Item<'a>>, CallError> {
    let items: Vec<Item<'a>> = StrftimeItems::new(pattern).collect();
    if items.iter().any(|item| matches!(item, Item::Error)) {
        return Err(CallError::new(format!(
            "{}: invalid date pattern '{}'",
            function, pattern
        )));
    }
    Ok(items)
}

fn native_today(_args: &[Value]) -> Result<Value, CallError> {
    Ok(Value::Date(Local::now().date_naive()))
}

fn native_parse_date(args: &[Value]) -> Result<Value, CallError> {
    let text = str_arg("parseDate", &args[0])?;
    let pattern = match args.get(1) {
        Some(p) => str_arg("parseDate", p)?,
        None => DEFAULT_DATE_PATTERN,
    };
    pattern_items("parseDate", pattern)?;
    NaiveDate::parse_from_str(text, pattern)
        .map(Value::Date)
        .map_err(|e| {
            CallError::with_source(
                format!("parseDate: cannot parse '{}' with pattern '{}'", text, pattern),
                e,
            )
        })
}

fn native_format_date(args: &[Value]) -> Result<Value, CallError> {
    let date = date_arg("formatDate", &args[0])?;
    let pattern = str_arg("formatDate", &args[1])?;
    let items = pattern_items("formatDate", pattern)?;

    let mut out = String::new();
    write!(out, "{}", date.format_with_items(items.into_iter())).map_err(|e| {
        CallError::with_source(format!("formatDate: cannot format with '{}'", pattern), e)
    })?;
    Ok(Value::from(out))
}

/// Whole days from the first date to the second
fn days_between(function: &str, args: &[Value]) -> Result<Value, CallError> {
    let (from, to) = date_pair(function, args)?;
    Ok(Value::Integer(to.signed_duration_since(from).num_days()))
}

fn out_of_range(function: &str) -> CallError {
    CallError::new(format!("{}: resulting date out of range", function))
}

fn native_add_days(args: &[Value]) -> Result<Value, CallError> {
    let date = date_arg("addDays", &args[0])?;
    let days = int_arg("addDays", &args[1])?;
    let amount = Days::new(days.unsigned_abs());
    let shifted = if days >= 0 {
        date.checked_add_days(amount)
    } else {
        date.checked_sub_days(amount)
    };
    shifted.map(Value::Date).ok_or_else(|| out_of_range("addDays"))
}

fn shift_months(function: &str, date: NaiveDate, months: i64) -> Result<Value, CallError> {
    let amount = u32::try_from(months.unsigned_abs())
        .map(Months::new)
        .map_err(|_| out_of_range(function))?;
    let shifted = if months >= 0 {
        date.checked_add_months(amount)
    } else {
        date.checked_sub_months(amount)
    };
    shifted.map(Value::Date).ok_or_else(|| out_of_range(function))
}

fn native_add_months(args: &[Value]) -> Result<Value, CallError> {
    let date = date_arg("addMonths", &args[0])?;
    shift_months("addMonths", date, int_arg("addMonths", &args[1])?)
}

fn native_add_years(args: &[Value]) -> Result<Value, CallError> {
    let date = date_arg("addYears", &args[0])?;
    let years = int_arg("addYears", &args[1])?;
    let months = years
        .checked_mul(12)
        .ok_or_else(|| out_of_range("addYears"))?;
    shift_months("addYears", date, months)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> Value {
        Value::Date(NaiveDate::from_ymd_opt(y, m, d).unwrap())
    }

    #[test]
    fn test_parse_default_and_custom_pattern() {
        assert_eq!(
            native_parse_date(&[Value::from("2024-02-29")]).unwrap(),
            date(2024, 2, 29)
        );
        assert_eq!(
            native_parse_date(&[Value::from("29/02/2024"), Value::from("%d/%m/%Y")]).unwrap(),
            date(2024, 2, 29)
        );
    }

    #[test]
    fn test_parse_failure_keeps_source() {
        use std::error::Error as _;
        let err = native_parse_date(&[Value::from("not a date")]).unwrap_err();
        assert!(err.to_string().starts_with("parseDate: cannot parse"));
        assert!(err.source().is_some());
    }

    #[test]
    fn test_format_date() {
        assert_eq!(
            native_format_date(&[date(2024, 3, 5), Value::from("%d.%m.%Y")]).unwrap(),
            Value::from("05.03.2024")
        );
        assert!(native_format_date(&[date(2024, 3, 5), Value::from("%Q")]).is_err());
    }

    #[test]
    fn test_days_between_is_signed() {
        let args = [date(2024, 1, 1), date(2024, 3, 1)];
        assert_eq!(days_between("daysBetween", &args).unwrap(), Value::from(60));
        let args = [date(2024, 3, 1), date(2024, 1, 1)];
        assert_eq!(days_between("daysBetween", &args).unwrap(), Value::from(-60));
    }

    #[test]
    fn test_add_days_months_years() {
        assert_eq!(
            native_add_days(&[date(2024, 1, 30), Value::from(3)]).unwrap(),
            date(2024, 2, 2)
        );
        assert_eq!(
            native_add_days(&[date(2024, 1, 1), Value::from(-1)]).unwrap(),
            date(2023, 12, 31)
        );
        // month end clamps
        assert_eq!(
            native_add_months(&[date(2024, 1, 31), Value::from(1)]).unwrap(),
            date(2024, 2, 29)
        );
        assert_eq!(
            native_add_years(&[date(2024, 2, 29), Value::from(-1)]).unwrap(),
            date(2023, 2, 28)
        );
    }

    #[test]
    fn test_wrong_kind() {
        let err = native_add_days(&[Value::from("2024-01-01"), Value::from(1)]).unwrap_err();
        assert_eq!(err.to_string(), "addDays: expected date, got string");
    }
}
