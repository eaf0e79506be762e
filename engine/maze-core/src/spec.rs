//! Helpers for reading and building nested spec mappings.
//!
//! Specs are `serde_json::Value` trees. Every reader takes the dotted path
//! of the value it inspects so failures point at the offending field.

use serde_json::{Map, Value};

use crate::error::{MazeError, Result};

pub type SpecMap = Map<String, Value>;

/// `parent.key`, or `key` at the root
pub fn child(path: &str, key: &str) -> String {
    if path.is_empty() {
        key.to_string()
    } else {
        format!("{path}.{key}")
    }
}

/// `parent[index]`
pub fn item(path: &str, index: usize) -> String {
    format!("{path}[{index}]")
}

pub fn as_map<'a>(value: &'a Value, path: &str) -> Result<&'a SpecMap> {
    value
        .as_object()
        .ok_or_else(|| MazeError::type_mismatch(path, "a mapping"))
}

pub fn as_list<'a>(value: &'a Value, path: &str) -> Result<&'a Vec<Value>> {
    value
        .as_array()
        .ok_or_else(|| MazeError::type_mismatch(path, "a list"))
}

/// Fetch a key that must be present and non-null.
pub fn required<'a>(map: &'a SpecMap, key: &str, path: &str) -> Result<&'a Value> {
    optional(map, key).ok_or_else(|| MazeError::missing(child(path, key)))
}

/// Fetch a key, treating an explicit null as absent.
pub fn optional<'a>(map: &'a SpecMap, key: &str) -> Option<&'a Value> {
    map.get(key).filter(|value| !value.is_null())
}

pub fn as_str<'a>(value: &'a Value, path: &str) -> Result<&'a str> {
    value
        .as_str()
        .ok_or_else(|| MazeError::type_mismatch(path, "a string"))
}

/// A number, rejecting booleans.
pub fn as_number(value: &Value, path: &str) -> Result<f64> {
    value
        .as_f64()
        .ok_or_else(|| MazeError::type_mismatch(path, "a number"))
}

pub fn positive_number(value: &Value, path: &str) -> Result<f64> {
    let number = as_number(value, path)?;
    if number <= 0.0 || !number.is_finite() {
        return Err(MazeError::out_of_range(path, "> 0"));
    }
    Ok(number)
}

pub fn as_integer(value: &Value, path: &str) -> Result<i64> {
    value
        .as_i64()
        .ok_or_else(|| MazeError::type_mismatch(path, "an integer"))
}

pub fn non_negative_index(value: &Value, path: &str) -> Result<usize> {
    let number = as_integer(value, path)?;
    usize::try_from(number).map_err(|_| MazeError::out_of_range(path, ">= 0"))
}

/// Build a mapping from key/value pairs, preserving their order.
pub fn mapping<I, K>(entries: I) -> Value
where
    I: IntoIterator<Item = (K, Value)>,
    K: Into<String>,
{
    Value::Object(entries.into_iter().map(|(k, v)| (k.into(), v)).collect())
}
