//! String and collection transforms: `replace`, `join`, `split`, case and
//! trim functions, `includes`, `typeOf`.

use cel_interpreter::{ExecutionError, Value};
use std::sync::Arc;

/// Replaces every occurrence of `old` with `new`.
pub(crate) fn replace_all(input: Arc<String>, old: Arc<String>, new: Arc<String>) -> String {
    input.replace(old.as_str(), new.as_str())
}

/// Joins a list of strings with a separator.
pub(crate) fn join(list: Value, separator: Arc<String>) -> Result<Value, ExecutionError> {
    let Value::List(items) = list else {
        return Err(ExecutionError::function_error("join", "first argument must be a list"));
    };
    let mut parts = Vec::with_capacity(items.len());
    for item in items.iter() {
        let Value::String(s) = item else {
            return Err(ExecutionError::function_error("join", "list elements must be strings"));
        };
        parts.push(s.as_str());
    }
    Ok(Value::String(Arc::new(parts.join(separator.as_str()))))
}

/// Splits a string on a separator.
pub(crate) fn split(input: Arc<String>, separator: Arc<String>) -> Value {
    let parts = input
        .split(separator.as_str())
        .map(|part| Value::String(Arc::new(part.to_string())))
        .collect();
    Value::List(Arc::new(parts))
}

/// Uppercases the first letter of every word, leaving the rest untouched.
pub(crate) fn title_case(input: Arc<String>) -> String {
    let mut out = String::with_capacity(input.len());
    let mut prev_is_letter = false;
    for ch in input.chars() {
        if prev_is_letter {
            out.push(ch);
        } else {
            out.extend(ch.to_uppercase());
        }
        prev_is_letter = ch.is_alphabetic();
    }
    out
}

pub(crate) fn lower_case(input: Arc<String>) -> String {
    input.to_lowercase()
}

pub(crate) fn upper_case(input: Arc<String>) -> String {
    input.to_uppercase()
}

/// Trims leading and trailing whitespace.
pub(crate) fn trim_space(input: Arc<String>) -> String {
    input.trim().to_string()
}

/// Removes a leading prefix if present; otherwise returns the input
/// unchanged.
pub(crate) fn trim_prefix(input: Arc<String>, prefix: Arc<String>) -> String {
    input.strip_prefix(prefix.as_str()).unwrap_or(&input).to_string()
}

/// Removes a trailing suffix if present; otherwise returns the input
/// unchanged.
pub(crate) fn trim_suffix(input: Arc<String>, suffix: Arc<String>) -> String {
    input.strip_suffix(suffix.as_str()).unwrap_or(&input).to_string()
}

/// Whether `needle` is present in the list.
///
/// Equality is numeric-tolerant: `1`, `1u`, and `1.0` compare equal.
pub(crate) fn includes(list: Value, needle: Value) -> Result<Value, ExecutionError> {
    let Value::List(items) = list else {
        return Err(ExecutionError::function_error("includes", "first argument must be a list"));
    };
    Ok(Value::Bool(items.iter().any(|item| loose_eq(item, &needle))))
}

/// The runtime type name of the argument.
pub(crate) fn type_of(value: Value) -> String {
    type_name(&value).to_string()
}

pub(crate) fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Int(_) => "int",
        Value::UInt(_) => "uint",
        Value::Float(_) => "double",
        Value::String(_) => "string",
        Value::Bytes(_) => "bytes",
        Value::List(_) => "list",
        Value::Map(_) => "map",
        Value::Timestamp(_) => "timestamp",
        Value::Duration(_) => "duration",
        Value::Function(..) => "function",
    }
}

#[expect(clippy::cast_precision_loss, reason = "Comparison tolerance, not arithmetic")]
fn as_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Int(i) => Some(*i as f64),
        Value::UInt(u) => Some(*u as f64),
        Value::Float(f) => Some(*f),
        _ => None,
    }
}

/// Equality that unifies the numeric variants before comparing.
fn loose_eq(a: &Value, b: &Value) -> bool {
    if let (Some(x), Some(y)) = (as_f64(a), as_f64(b)) {
        return (x - y).abs() < f64::EPSILON;
    }
    match (a, b) {
        (Value::Null, Value::Null) => true,
        (Value::Bool(x), Value::Bool(y)) => x == y,
        (Value::String(x), Value::String(y)) => x == y,
        (Value::Bytes(x), Value::Bytes(y)) => x == y,
        (Value::Timestamp(x), Value::Timestamp(y)) => x == y,
        (Value::Duration(x), Value::Duration(y)) => x == y,
        (Value::List(x), Value::List(y)) => x.len() == y.len() && x.iter().zip(y.iter()).all(|(i, j)| loose_eq(i, j)),
        (Value::Map(x), Value::Map(y)) => {
            x.map.len() == y.map.len()
                && x.map
                    .iter()
                    .all(|(key, value)| y.map.get(key).is_some_and(|other| loose_eq(value, other)))
        }
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn arc(s: &str) -> Arc<String> {
        Arc::new(s.to_string())
    }

    fn string_list(items: &[&str]) -> Value {
        Value::List(Arc::new(items.iter().map(|s| Value::String(Arc::new((*s).to_string()))).collect()))
    }

    #[test]
    fn test_replace_all_occurrences() {
        assert_eq!(replace_all(arc("a-b-c"), arc("-"), arc("+")), "a+b+c");
        assert_eq!(replace_all(arc("aaa"), arc("a"), arc("")), "");
        assert_eq!(replace_all(arc("abc"), arc("x"), arc("y")), "abc");
    }

    #[test]
    fn test_join() {
        let joined = join(string_list(&["a", "b", "c"]), arc(",")).unwrap();
        let Value::String(s) = joined else {
            panic!("expected a string");
        };
        assert_eq!(s.as_str(), "a,b,c");
    }

    #[test]
    fn test_join_rejects_non_list() {
        let result = join(Value::Int(1), arc(","));
        let _ = result.unwrap_err();
    }

    #[test]
    fn test_join_rejects_non_string_elements() {
        let list = Value::List(Arc::new(vec![Value::Int(1)]));
        let result = join(list, arc(","));
        let _ = result.unwrap_err();
    }

    #[test]
    fn test_split() {
        let Value::List(parts) = split(arc("a,b,c"), arc(",")) else {
            panic!("expected a list");
        };
        assert_eq!(parts.len(), 3);
    }

    #[test]
    fn test_title_case() {
        assert_eq!(title_case(arc("hello world")), "Hello World");
        assert_eq!(title_case(arc("already Titled")), "Already Titled");
        assert_eq!(title_case(arc("")), "");
    }

    #[test]
    fn test_case_and_trim() {
        assert_eq!(lower_case(arc("HeLLo")), "hello");
        assert_eq!(upper_case(arc("HeLLo")), "HELLO");
        assert_eq!(trim_space(arc("  padded  ")), "padded");
        assert_eq!(trim_prefix(arc("prefix.rest"), arc("prefix.")), "rest");
        assert_eq!(trim_prefix(arc("rest"), arc("prefix.")), "rest");
        assert_eq!(trim_suffix(arc("file.txt"), arc(".txt")), "file");
        assert_eq!(trim_suffix(arc("file"), arc(".txt")), "file");
    }

    #[test]
    fn test_includes() {
        let list = string_list(&["a", "b"]);
        let Value::Bool(found) = includes(list, Value::String(arc("b"))).unwrap() else {
            panic!("expected a bool");
        };
        assert!(found);
    }

    #[test]
    fn test_includes_numeric_tolerance() {
        let list = Value::List(Arc::new(vec![Value::Int(1), Value::Float(2.0)]));
        let Value::Bool(found) = includes(list, Value::Float(1.0)).unwrap() else {
            panic!("expected a bool");
        };
        assert!(found);
    }

    #[test]
    fn test_includes_rejects_non_list() {
        let result = includes(Value::String(arc("ab")), Value::String(arc("a")));
        let _ = result.unwrap_err();
    }

    #[test]
    fn test_type_of() {
        assert_eq!(type_of(Value::Null), "null");
        assert_eq!(type_of(Value::Int(1)), "int");
        assert_eq!(type_of(Value::Float(1.0)), "double");
        assert_eq!(type_of(Value::String(arc("x"))), "string");
        assert_eq!(type_of(Value::List(Arc::new(vec![]))), "list");
    }
}
