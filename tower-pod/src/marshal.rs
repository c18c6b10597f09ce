//! Argument marshalling
//!
//! Generic map values are turned into typed models when their declared type
//! (or the first model alternative of a union) can be constructed from a
//! map. Everything else is passed through for the endpoint to validate.

use serde_json::{Map, Value};
use tower_api::{Arg, ModelType, TypeHint};

use crate::error::BridgeError;

/// Convert one argument value against its declared type
pub fn marshal(param: &str, value: Value, hint: Option<&TypeHint>) -> Result<Arg, BridgeError> {
    let map = match (hint, value) {
        (Some(_), Value::Object(map)) => map,
        (_, value) => return Ok(Arg::Plain(value)),
    };

    match hint.and_then(constructible) {
        Some(model) => construct(param, model, map),
        None => Ok(Arg::Plain(Value::Object(map))),
    }
}

/// The model type a map value should be built as, if any
fn constructible(hint: &TypeHint) -> Option<&ModelType> {
    match hint {
        TypeHint::Model(model) => Some(model),
        TypeHint::Union(alternatives) => alternatives
            .iter()
            .filter(|alt| **alt != TypeHint::NoneType)
            .find_map(TypeHint::as_model),
        _ => None,
    }
}

fn construct(param: &str, model: &ModelType, map: Map<String, Value>) -> Result<Arg, BridgeError> {
    model
        .from_generic(map)
        .map(Arg::Model)
        .map_err(|source| BridgeError::Marshal {
            param: param.to_string(),
            source,
        })
}
