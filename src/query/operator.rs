//! Value-level operator evaluation.
//!
//! Shared by the graph query matcher (value fields and relation-list
//! operators) and the flat entity repository. Operator objects are
//! validated here: exactly one entry, with a key drawn from the recognised
//! set.

use std::cmp::Ordering;

use regex::Regex;

use crate::error::{GraphError, Result};
use crate::model::Value;

use super::input::{OperatorArg, OperatorMap, ValueQuery};

static NULL: Value = Value::Null;

/// Evaluates a value query against a field value. Missing fields are
/// matched as `Null`.
pub fn match_value(value: Option<&Value>, query: &ValueQuery) -> Result<bool> {
    let value = value.unwrap_or(&NULL);
    match query {
        ValueQuery::Eq(expected) => Ok(value_eq(value, expected)),
        ValueQuery::AnyOf(options) => Ok(options.iter().any(|option| value_eq(value, option))),
        ValueQuery::Where(ops) => match_operator(value, ops),
    }
}

pub(crate) fn match_operator(value: &Value, ops: &OperatorMap) -> Result<bool> {
    let (key, arg) = single_entry(ops)?;
    match key {
        "eq" => Ok(value_eq(value, scalar_arg(key, arg)?)),
        "ne" => Ok(!value_eq(value, scalar_arg(key, arg)?)),
        "lt" => Ok(ordered(value, scalar_arg(key, arg)?, Ordering::is_lt)),
        "lte" => Ok(ordered(value, scalar_arg(key, arg)?, Ordering::is_le)),
        "gt" => Ok(ordered(value, scalar_arg(key, arg)?, Ordering::is_gt)),
        "gte" => Ok(ordered(value, scalar_arg(key, arg)?, Ordering::is_ge)),
        "re" => match_regex(value, scalar_arg(key, arg)?),
        "empty" => Ok(match_empty(value, scalar_arg(key, arg)?)),
        "length" => match value.len() {
            Some(len) => match_length(len, arg),
            None => Ok(false),
        },
        "includes" => Ok(match_includes(value, scalar_arg(key, arg)?)),
        other => Err(GraphError::UnsupportedOperator(other.to_owned())),
    }
}

/// Applies a length argument (number for equality, nested operator object
/// otherwise) to a concrete length.
pub(crate) fn match_length(len: usize, arg: &OperatorArg) -> Result<bool> {
    let len = Value::Int(len as i64);
    match arg {
        OperatorArg::Value(expected) => Ok(value_eq(&len, expected)),
        OperatorArg::Nested(ops) => match_operator(&len, ops),
    }
}

pub(crate) fn single_entry(ops: &OperatorMap) -> Result<(&str, &OperatorArg)> {
    match ops.entries() {
        [(key, arg)] => Ok((key.as_str(), arg)),
        [] => Err(GraphError::validation(
            "operator object",
            "exactly one operator key",
            "none",
        )),
        entries => {
            let keys: Vec<&str> = entries.iter().map(|(key, _)| key.as_str()).collect();
            Err(GraphError::validation(
                "operator object",
                "exactly one operator key",
                keys.join(", "),
            ))
        }
    }
}

pub(crate) fn scalar_arg<'a>(key: &str, arg: &'a OperatorArg) -> Result<&'a Value> {
    match arg {
        OperatorArg::Value(value) => Ok(value),
        OperatorArg::Nested(_) => Err(GraphError::validation(
            key,
            "scalar argument",
            "nested operator object",
        )),
    }
}

/// Equality with Int/Float coercion; everything else is structural.
pub(crate) fn value_eq(a: &Value, b: &Value) -> bool {
    match a.partial_cmp_value(b) {
        Some(ordering) => ordering == Ordering::Equal,
        None => a == b,
    }
}

fn ordered(value: &Value, arg: &Value, pick: fn(Ordering) -> bool) -> bool {
    // Ordered comparison is only defined for numerics; anything else
    // simply fails to match.
    match (value.as_f64(), arg.as_f64()) {
        (Some(a), Some(b)) => a.partial_cmp(&b).is_some_and(pick),
        _ => false,
    }
}

fn match_regex(value: &Value, arg: &Value) -> Result<bool> {
    let Value::String(pattern) = arg else {
        return Err(GraphError::validation(
            "re",
            "regex pattern string",
            format!("{arg:?}"),
        ));
    };
    let regex = Regex::new(pattern)
        .map_err(|err| GraphError::validation("re", "valid regex", err.to_string()))?;
    match value {
        Value::String(s) => Ok(regex.is_match(s)),
        _ => Ok(false),
    }
}

/// `len == 0 && truthy(arg)`: `empty(false)` never matches.
fn match_empty(value: &Value, arg: &Value) -> bool {
    value.is_empty() == Some(true) && arg.truthy()
}

fn match_includes(value: &Value, arg: &Value) -> bool {
    match value {
        Value::List(items) => items.iter().any(|item| value_eq(item, arg)),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::input::OperatorMap;

    fn matches(value: &Value, ops: OperatorMap) -> bool {
        match_value(Some(value), &ValueQuery::Where(ops)).expect("operator evaluates")
    }

    #[test]
    fn scalar_equality_and_membership() {
        let v = Value::from("steve");
        assert!(match_value(Some(&v), &ValueQuery::Eq("steve".into())).unwrap());
        assert!(!match_value(Some(&v), &ValueQuery::Eq("bob".into())).unwrap());
        assert!(match_value(
            Some(&v),
            &ValueQuery::AnyOf(vec!["bob".into(), "steve".into()])
        )
        .unwrap());
    }

    #[test]
    fn numeric_equality_coerces_int_and_float() {
        assert!(matches(&Value::Int(5), OperatorMap::eq(Value::Float(5.0))));
        assert!(matches(&Value::Float(2.0), OperatorMap::eq(2)));
        assert!(!matches(&Value::Int(5), OperatorMap::eq(Value::Float(5.5))));
    }

    #[test]
    fn ordered_operators_only_match_numerics() {
        assert!(matches(&Value::Int(5), OperatorMap::gt(4)));
        assert!(matches(&Value::Int(5), OperatorMap::gte(5)));
        assert!(matches(&Value::Float(1.5), OperatorMap::lt(2)));
        assert!(!matches(&Value::Int(5), OperatorMap::lt(5)));
        assert!(!matches(&Value::from("5"), OperatorMap::gt(4)));
        assert!(!matches(&Value::Null, OperatorMap::lte(0)));
    }

    #[test]
    fn regex_matches_strings_only() {
        assert!(matches(&Value::from("steve"), OperatorMap::re("^st")));
        assert!(!matches(&Value::from("steve"), OperatorMap::re("^x")));
        assert!(!matches(&Value::Int(5), OperatorMap::re("5")));
    }

    #[test]
    fn invalid_regex_is_a_validation_error() {
        let err = match_value(
            Some(&Value::from("x")),
            &ValueQuery::Where(OperatorMap::re("(")),
        );
        assert!(matches!(err, Err(GraphError::Validation { .. })));
    }

    #[test]
    fn empty_requires_a_truthy_argument() {
        let empty_list = Value::List(vec![]);
        assert!(matches(&empty_list, OperatorMap::empty(true)));
        assert!(!matches(&empty_list, OperatorMap::empty(false)));
        assert!(!matches(&Value::List(vec![Value::Int(1)]), OperatorMap::empty(true)));
        assert!(matches(&Value::from(""), OperatorMap::empty(true)));
    }

    #[test]
    fn length_accepts_numbers_and_nested_operators() {
        let list = Value::List(vec![Value::Int(1), Value::Int(2)]);
        assert!(matches(&list, OperatorMap::length(2)));
        assert!(matches(&list, OperatorMap::length(OperatorMap::gt(1))));
        assert!(!matches(&list, OperatorMap::length(OperatorMap::gt(2))));
        assert!(matches(&Value::from("abc"), OperatorMap::length(3)));
        assert!(!matches(&Value::Int(3), OperatorMap::length(1)));
    }

    #[test]
    fn includes_tests_list_membership() {
        let list = Value::List(vec![Value::from("a"), Value::from("b")]);
        assert!(matches(&list, OperatorMap::includes("a")));
        assert!(!matches(&list, OperatorMap::includes("c")));
        assert!(!matches(&Value::from("ab"), OperatorMap::includes("a")));
    }

    #[test]
    fn unknown_operator_keys_are_unsupported() {
        let err = match_value(
            Some(&Value::Int(1)),
            &ValueQuery::Where(OperatorMap::single("between", 1)),
        );
        assert_eq!(
            err,
            Err(GraphError::UnsupportedOperator("between".into()))
        );
    }

    #[test]
    fn operator_objects_must_carry_exactly_one_key() {
        let none = OperatorMap::from_entries(vec![]);
        let err = match_value(Some(&Value::Int(1)), &ValueQuery::Where(none));
        assert!(matches!(err, Err(GraphError::Validation { .. })));

        let two = OperatorMap::from_entries(vec![
            ("gt".into(), 1.into()),
            ("lt".into(), 5.into()),
        ]);
        let err = match_value(Some(&Value::Int(3)), &ValueQuery::Where(two));
        assert!(matches!(err, Err(GraphError::Validation { .. })));
    }

    #[test]
    fn missing_fields_match_as_null() {
        assert!(match_value(None, &ValueQuery::Eq(Value::Null)).unwrap());
        assert!(match_value(None, &ValueQuery::Where(OperatorMap::ne("x"))).unwrap());
        assert!(!match_value(None, &ValueQuery::Where(OperatorMap::gt(0))).unwrap());
    }
}
