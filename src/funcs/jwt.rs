//! Structural JWT helpers: `parseClaims`, `parseHeader`, `parseSignature`.
//!
//! These parse the token structure only; no signature verification
//! happens here.

use crate::value::json_to_cel;
use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use cel_interpreter::{ExecutionError, Value};
use std::sync::Arc;

fn segments<'a>(function: &str, token: &'a str) -> Result<[&'a str; 3], ExecutionError> {
    let parts: Vec<&str> = token.split('.').collect();
    match parts.as_slice() {
        &[header, claims, signature] => Ok([header, claims, signature]),
        _ => Err(ExecutionError::function_error(
            function,
            format!("malformed JWT: expected 3 dot-separated segments, found {}", parts.len()),
        )),
    }
}

fn decode_segment(function: &str, segment: &str) -> Result<Value, ExecutionError> {
    let bytes = URL_SAFE_NO_PAD
        .decode(segment.as_bytes())
        .map_err(|e| ExecutionError::function_error(function, e))?;
    let parsed: serde_json::Value =
        serde_json::from_slice(&bytes).map_err(|e| ExecutionError::function_error(function, e))?;
    if !parsed.is_object() {
        return Err(ExecutionError::function_error(function, "JWT segment is not a JSON object"));
    }
    Ok(json_to_cel(&parsed))
}

/// Decodes the payload (second segment) of a JWT into a map.
pub(crate) fn parse_claims(token: Arc<String>) -> Result<Value, ExecutionError> {
    let [_, claims, _] = segments("parseClaims", &token)?;
    decode_segment("parseClaims", claims)
}

/// Decodes the header (first segment) of a JWT into a map.
pub(crate) fn parse_header(token: Arc<String>) -> Result<Value, ExecutionError> {
    let [header, _, _] = segments("parseHeader", &token)?;
    decode_segment("parseHeader", header)
}

/// Returns the signature (third segment) of a JWT verbatim.
pub(crate) fn parse_signature(token: Arc<String>) -> Result<Value, ExecutionError> {
    let [_, _, signature] = segments("parseSignature", &token)?;
    Ok(Value::String(Arc::new(signature.to_string())))
}
