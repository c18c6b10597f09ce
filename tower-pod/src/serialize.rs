//! Result serialization
//!
//! Typed models become generic maps with host-convention keys; plain values
//! are already wire-safe and go out as they are.

use serde_json::Value;
use tower_api::Output;

use crate::convention;
use crate::error::BridgeError;

pub fn serialize(output: Output) -> Result<Value, BridgeError> {
    match output {
        Output::None => Ok(Value::Null),
        Output::Model(model) => Ok(convention::to_host(Value::Object(model.to_generic()?))),
        Output::Value(value) => Ok(value),
    }
}
