//! Encoding functions: `base64Encode`, `base64Decode`, `jsonEncode`,
//! `jsonDecode`.

use crate::value::{Fields, cel_to_json, fields_to_cel, json_to_cel};
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use cel_interpreter::{ExecutionError, Value};
use std::sync::Arc;

/// Standard-alphabet base64 encoding of the UTF-8 bytes of the input.
pub(crate) fn base64_encode(input: Arc<String>) -> String {
    STANDARD.encode(input.as_bytes())
}

/// Standard-alphabet base64 decoding; malformed input is an error.
pub(crate) fn base64_decode(input: Arc<String>) -> Result<Value, ExecutionError> {
    let bytes = STANDARD
        .decode(input.as_bytes())
        .map_err(|e| ExecutionError::function_error("base64Decode", e))?;
    let text = String::from_utf8(bytes).map_err(|e| ExecutionError::function_error("base64Decode", e))?;
    Ok(Value::String(Arc::new(text)))
}

/// Serializes any value to its JSON text.
pub(crate) fn json_encode(value: Value) -> Result<Value, ExecutionError> {
    let json = cel_to_json(&value).map_err(|e| ExecutionError::function_error("jsonEncode", e))?;
    let text = serde_json::to_string(&json).map_err(|e| ExecutionError::function_error("jsonEncode", e))?;
    Ok(Value::String(Arc::new(text)))
}

/// Parses a JSON object into a map.
///
/// Parse failures (and non-object documents) yield an empty map rather
/// than an error. Documented quirk carried over from the original
/// implementation.
pub(crate) fn json_decode(input: Arc<String>) -> Value {
    match serde_json::from_str::<serde_json::Value>(&input) {
        Ok(parsed @ serde_json::Value::Object(_)) => json_to_cel(&parsed),
        _ => fields_to_cel(&Fields::new()),
    }
}
