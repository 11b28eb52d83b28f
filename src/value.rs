//! Context field maps and the JSON ⇄ CEL value conversions.
//!
//! Callers describe the evaluation context as ordinary JSON data
//! ([`Fields`]); expressions see it as a CEL map bound to the variable
//! `this`. Conversion into CEL is lossless. Conversion back out (used when
//! a trigger merges patch results into the context) narrows the few CEL
//! types JSON cannot represent: bytes become a standard-base64 string,
//! timestamps an RFC 3339 string, and durations whole seconds.

use cel_interpreter::Value;
use cel_interpreter::objects::{Key, Map};
use std::collections::HashMap;
use std::sync::Arc;

/// A mapping of field names to dynamic values, bound to `this` during
/// evaluation. Supplied fresh per evaluation call; mutable only by the
/// trigger merge step, never by a decision.
pub type Fields = serde_json::Map<String, serde_json::Value>;

/// Converts a JSON value into its CEL counterpart.
///
/// Integers that fit `i64` become `Int`, larger positive integers become
/// `UInt`, and everything else numeric becomes `Float`.
pub(crate) fn json_to_cel(value: &serde_json::Value) -> Value {
    match value {
        serde_json::Value::Null => Value::Null,
        serde_json::Value::Bool(b) => Value::Bool(*b),
        serde_json::Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Value::Int(i)
            } else if let Some(u) = n.as_u64() {
                Value::UInt(u)
            } else {
                Value::Float(n.as_f64().unwrap_or(f64::NAN))
            }
        }
        serde_json::Value::String(s) => Value::String(Arc::new(s.clone())),
        serde_json::Value::Array(items) => Value::List(Arc::new(items.iter().map(json_to_cel).collect())),
        serde_json::Value::Object(fields) => fields_to_cel(fields),
    }
}

/// Converts a field map into a CEL map value.
pub(crate) fn fields_to_cel(fields: &Fields) -> Value {
    let mut map: HashMap<Arc<String>, Value> = HashMap::with_capacity(fields.len());
    for (name, value) in fields {
        let _ = map.insert(Arc::new(name.clone()), json_to_cel(value));
    }
    Value::Map(Map::from(map))
}

/// Converts a CEL value back into JSON.
///
/// # Errors
/// Returns a message when the value has no JSON representation (function
/// references, non-finite floats).
pub(crate) fn cel_to_json(value: &Value) -> Result<serde_json::Value, String> {
    match value {
        Value::Null => Ok(serde_json::Value::Null),
        Value::Bool(b) => Ok(serde_json::Value::Bool(*b)),
        Value::Int(i) => Ok(serde_json::Value::from(*i)),
        Value::UInt(u) => Ok(serde_json::Value::from(*u)),
        Value::Float(f) => serde_json::Number::from_f64(*f)
            .map(serde_json::Value::Number)
            .ok_or_else(|| format!("non-finite number {f} is not representable as JSON")),
        Value::String(s) => Ok(serde_json::Value::String(s.as_str().to_string())),
        Value::Bytes(bytes) => {
            use base64::Engine as _;
            Ok(serde_json::Value::String(base64::engine::general_purpose::STANDARD.encode(bytes.as_slice())))
        }
        Value::List(items) => {
            let mut out = Vec::with_capacity(items.len());
            for item in items.iter() {
                out.push(cel_to_json(item)?);
            }
            Ok(serde_json::Value::Array(out))
        }
        Value::Map(map) => {
            let mut out = Fields::new();
            for (key, item) in map.map.iter() {
                let _ = out.insert(key_to_string(key), cel_to_json(item)?);
            }
            Ok(serde_json::Value::Object(out))
        }
        Value::Timestamp(ts) => Ok(serde_json::Value::String(ts.to_rfc3339())),
        Value::Duration(d) => Ok(serde_json::Value::from(d.num_seconds())),
        Value::Function(name, _) => Err(format!("function '{name}' is not representable as JSON")),
    }
}

/// Renders a CEL map key as a field name.
pub(crate) fn key_to_string(key: &Key) -> String {
    match key {
        Key::String(s) => s.as_str().to_string(),
        Key::Int(i) => i.to_string(),
        Key::Uint(u) => u.to_string(),
        Key::Bool(b) => b.to_string(),
    }
}
