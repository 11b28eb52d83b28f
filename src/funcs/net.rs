//! URL component extraction: `parseHost`, `parsePath`, `parseScheme`,
//! `parseQuery`.

use cel_interpreter::objects::Map;
use cel_interpreter::{ExecutionError, Value};
use std::collections::HashMap;
use std::sync::Arc;
use url::Url;

fn parse(function: &str, input: &str) -> Result<Url, ExecutionError> {
    Url::parse(input).map_err(|e| ExecutionError::function_error(function, e))
}

/// The host component of a URL, empty when the URL has none.
pub(crate) fn parse_host(input: Arc<String>) -> Result<Value, ExecutionError> {
    let url = parse("parseHost", &input)?;
    Ok(Value::String(Arc::new(url.host_str().unwrap_or_default().to_string())))
}

/// The path component of a URL.
pub(crate) fn parse_path(input: Arc<String>) -> Result<Value, ExecutionError> {
    let url = parse("parsePath", &input)?;
    Ok(Value::String(Arc::new(url.path().to_string())))
}

/// The scheme of a URL.
pub(crate) fn parse_scheme(input: Arc<String>) -> Result<Value, ExecutionError> {
    let url = parse("parseScheme", &input)?;
    Ok(Value::String(Arc::new(url.scheme().to_string())))
}

/// The query parameters of a URL as a map, keeping only the first value
/// for a repeated key.
pub(crate) fn parse_query(input: Arc<String>) -> Result<Value, ExecutionError> {
    let url = parse("parseQuery", &input)?;
    let mut params: HashMap<Arc<String>, Value> = HashMap::new();
    for (key, value) in url.query_pairs() {
        let _ = params
            .entry(Arc::new(key.into_owned()))
            .or_insert_with(|| Value::String(Arc::new(value.into_owned())));
    }
    Ok(Value::Map(Map::from(params)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::key_to_string;

    const URL: &str = "https://acme.com/accounts/login?user=bob&lang=en&lang=fr";

    fn arc(s: &str) -> Arc<String> {
        Arc::new(s.to_string())
    }

    fn as_string(value: Value) -> String {
        let Value::String(s) = value else {
            panic!("expected a string");
        };
        s.as_str().to_string()
    }

    #[test]
    fn test_parse_host() {
        assert_eq!(as_string(parse_host(arc(URL)).unwrap()), "acme.com");
    }

    #[test]
    fn test_parse_path() {
        assert_eq!(as_string(parse_path(arc(URL)).unwrap()), "/accounts/login");
    }

    #[test]
    fn test_parse_scheme() {
        assert_eq!(as_string(parse_scheme(arc(URL)).unwrap()), "https");
    }

    #[test]
    fn test_parse_query_first_value_wins() {
        let Value::Map(params) = parse_query(arc(URL)).unwrap() else {
            panic!("expected a map");
        };
        assert_eq!(params.map.len(), 2);

        let lang = params
            .map
            .iter()
            .find(|(key, _)| key_to_string(key) == "lang")
            .map(|(_, v)| v.clone());
        let Some(Value::String(lang)) = lang else {
            panic!("expected a lang parameter");
        };
        assert_eq!(lang.as_str(), "en");
    }

    #[test]
    fn test_malformed_url() {
        let result = parse_host(arc("://no-scheme"));
        let _ = result.unwrap_err();
    }

    #[test]
    fn test_no_query() {
        let Value::Map(params) = parse_query(arc("https://acme.com/")).unwrap() else {
            panic!("expected a map");
        };
        assert_eq!(params.map.len(), 0);
    }
}
