//! Text templating: `render`.

use crate::value::cel_to_json;
use cel_interpreter::{ExecutionError, Value};
use handlebars::Handlebars;
use std::sync::Arc;

/// Substitutes fields of the map into the template using Handlebars-style
/// `{{field}}` placeholders.
pub(crate) fn render(template: Arc<String>, data: Value) -> Result<Value, ExecutionError> {
    if !matches!(data, Value::Map(_)) {
        return Err(ExecutionError::function_error("render", "second argument must be a map"));
    }
    let json = cel_to_json(&data).map_err(|e| ExecutionError::function_error("render", e))?;

    let registry = Handlebars::new();
    let rendered = registry
        .render_template(&template, &json)
        .map_err(|e| ExecutionError::function_error("render", e))?;
    Ok(Value::String(Arc::new(rendered)))
}
