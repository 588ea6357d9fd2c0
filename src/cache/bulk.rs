//! Bulk Argument Module
//!
//! Coerces dynamically-typed bulk arguments into key lists and key/value pairs.

use serde_json::Value;

use crate::error::{CacheError, Result};

/// Reads an array of scalar keys. Numbers are accepted and rendered as strings.
pub fn keys_from_json(keys: &Value) -> Result<Vec<String>> {
    let Value::Array(elements) = keys else {
        return Err(CacheError::InvalidArgument(
            "The keys must be an array".to_string(),
        ));
    };

    elements
        .iter()
        .map(|element| match element {
            Value::String(key) => Ok(key.clone()),
            Value::Number(n) => Ok(n.to_string()),
            other => Err(CacheError::InvalidArgument(format!(
                "Keys must be strings or numbers, got {other}"
            ))),
        })
        .collect()
}

/// Reads an object of key => value pairs.
pub fn entries_from_json(values: &Value) -> Result<Vec<(String, Value)>> {
    match values {
        Value::Object(map) => Ok(map.iter().map(|(k, v)| (k.clone(), v.clone())).collect()),
        _ => Err(CacheError::InvalidArgument(
            "The values must be an object {key: value, ...}".to_string(),
        )),
    }
}
