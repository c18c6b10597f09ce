//! Key-casing conversion between host and API conventions
//!
//! The host names keys with hyphens (`page-size`), the API with underscores
//! (`page_size`). Conversion rewrites every map key at any depth, recursing
//! through lists; scalars are untouched.

use serde_json::{Map, Value};

/// Rename keys to the host's hyphenated form
pub fn to_host(value: Value) -> Value {
    rename_keys(value, '_', '-')
}

/// Rename keys to the API's underscored form
pub fn to_target(value: Value) -> Value {
    rename_keys(value, '-', '_')
}

/// Host-facing name of an API identifier
pub fn host_name(target: &str) -> String {
    target.replace('_', "-")
}

fn rename_keys(value: Value, from: char, to: char) -> Value {
    match value {
        Value::Object(map) => Value::Object(
            map.into_iter()
                .map(|(k, v)| (k.replace(from, &to.to_string()), rename_keys(v, from, to)))
                .collect::<Map<String, Value>>(),
        ),
        Value::Array(items) => Value::Array(
            items
                .into_iter()
                .map(|v| rename_keys(v, from, to))
                .collect(),
        ),
        other => other,
    }
}
