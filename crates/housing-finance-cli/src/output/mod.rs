pub mod csv_out;
pub mod json;
pub mod minimal;
pub mod table;

use crate::OutputFormat;
use serde_json::Value;

/// Dispatch output to the appropriate formatter.
pub fn format_output(format: &OutputFormat, value: &Value) {
    match format {
        OutputFormat::Json => json::print_json(value),
        OutputFormat::Table => table::print_table(value),
        OutputFormat::Csv => csv_out::print_csv(value),
        OutputFormat::Minimal => minimal::print_minimal(value),
    }
}

/// Keys whose array values are rendered as their own table or CSV body.
pub const ROW_KEYS: [&str; 2] = ["rows", "scenarios"];

/// The computation result, unwrapping the `{"result": ...}` envelope if present.
pub fn result_of(value: &Value) -> &Value {
    value
        .as_object()
        .and_then(|m| m.get("result"))
        .unwrap_or(value)
}

/// First row array in a result object, if any.
pub fn row_array(result: &Value) -> Option<&Vec<Value>> {
    let map = result.as_object()?;
    ROW_KEYS
        .iter()
        .find_map(|k| map.get(*k).and_then(Value::as_array))
}

/// Render a scalar or nested value as a single cell.
pub fn cell(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => String::new(),
        _ => serde_json::to_string(value).unwrap_or_default(),
    }
}
