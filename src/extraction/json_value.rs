//! Lenient conversion of JSON values into table-friendly scalars.
//!
//! Uploaded snapshots are produced by collection scripts of varying age, so
//! optional fields are read leniently: `null` counts as absent and scalars of
//! the "wrong" JSON type are rendered rather than rejected.

use serde_json::{Map, Value};

/// Convert a JSON value to its display string.
pub fn value_to_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => String::new(),
        _ => value.to_string(), // Arrays and objects as JSON strings
    }
}

/// Convert a JSON value to an integer if possible. Whole floats such as
/// `80.0` count as integers.
pub fn value_to_int(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| {
            n.as_f64()
                .filter(|f| f.fract() == 0.0 && f.abs() < i64::MAX as f64)
                .map(|f| f as i64)
        }),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Read an optional string field. Missing and `null` both yield `None`.
pub fn optional_string(obj: &Map<String, Value>, key: &str) -> Option<String> {
    match obj.get(key) {
        None | Some(Value::Null) => None,
        Some(v) => Some(value_to_string(v)),
    }
}

/// Read an optional integer field.
pub fn optional_int(obj: &Map<String, Value>, key: &str) -> Option<i64> {
    obj.get(key).and_then(value_to_int)
}

/// Integers read from a list field, plus the entries that could not be read.
#[derive(Debug, Default, PartialEq)]
pub struct IntList {
    pub values: Vec<i64>,
    pub rejected: Vec<String>,
}

/// Read a list of integers.
///
/// A missing or `null` field is an empty list. A bare scalar is treated as a
/// one-element list.
pub fn int_list(obj: &Map<String, Value>, key: &str) -> IntList {
    let mut out = IntList::default();

    let items: Vec<&Value> = match obj.get(key) {
        None | Some(Value::Null) => return out,
        Some(Value::Array(arr)) => arr.iter().collect(),
        Some(other) => vec![other],
    };

    for item in items {
        match value_to_int(item) {
            Some(i) => out.values.push(i),
            None => out.rejected.push(value_to_string(item)),
        }
    }

    out
}
