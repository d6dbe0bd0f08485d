use serde_json::Value;
use tabled::{builder::Builder, Table};

use super::{cell, result_of, ROW_KEYS};

/// Format output as tables: scalar fields first, then any row arrays
/// (schedule rows, term scenarios) as their own table.
pub fn print_table(value: &Value) {
    print!("{}", render(value));
}

fn render(value: &Value) -> String {
    let mut out = String::new();
    let result = result_of(value);

    match result {
        Value::Object(map) => {
            let mut builder = Builder::default();
            builder.push_record(["Field", "Value"]);
            for (key, val) in map {
                if ROW_KEYS.contains(&key.as_str()) && val.is_array() {
                    continue;
                }
                builder.push_record([key.as_str(), &format_value(val)]);
            }
            out.push_str(&format!("{}\n", Table::from(builder)));

            for key in ROW_KEYS {
                if let Some(Value::Array(rows)) = map.get(key) {
                    out.push_str(&format!("\n{key}:\n"));
                    out.push_str(&render_rows(rows));
                }
            }
        }
        Value::Array(rows) => out.push_str(&render_rows(rows)),
        other => out.push_str(&format!("{}\n", cell(other))),
    }

    if let Some(Value::Array(warnings)) = value.get("warnings") {
        if !warnings.is_empty() {
            out.push_str("\nWarnings:\n");
            for w in warnings.iter().filter_map(Value::as_str) {
                out.push_str(&format!("  - {w}\n"));
            }
        }
    }

    if let Some(Value::String(meth)) = value.get("methodology") {
        out.push_str(&format!("\nMethodology: {meth}\n"));
    }

    out
}

fn render_rows(rows: &[Value]) -> String {
    let Some(Value::Object(first)) = rows.first() else {
        return rows.iter().map(|r| format!("{}\n", format_value(r))).collect();
    };

    let headers: Vec<String> = first.keys().cloned().collect();
    let mut builder = Builder::default();
    builder.push_record(&headers);
    for row in rows.iter().filter_map(Value::as_object) {
        builder.push_record(
            headers
                .iter()
                .map(|h| row.get(h.as_str()).map(format_value).unwrap_or_default()),
        );
    }
    format!("{}\n", Table::from(builder))
}

fn format_value(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Array(arr) => arr.iter().map(format_value).collect::<Vec<_>>().join(", "),
        _ => cell(value),
    }
}
