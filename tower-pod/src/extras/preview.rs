//! Display redaction for secret values

use serde_json::Value;

use super::str_arg;
use crate::error::BridgeError;

pub const NAME: &str = "secret-preview";

/// Characters left visible at the end
const VISIBLE: usize = 4;

const FILLER: char = 'X';

/// Mask all but the last four characters
pub fn preview(value: &str) -> String {
    let total = value.chars().count();
    let hidden = total.saturating_sub(VISIBLE);

    let mut out: String = std::iter::repeat(FILLER).take(hidden).collect();
    out.extend(value.chars().skip(hidden));
    out
}

pub(super) fn call(args: &[Value]) -> Result<Value, BridgeError> {
    let value = str_arg(NAME, args, 0)?;
    Ok(Value::String(preview(value)))
}
