use serde_json::Value;
use std::io::{self, Write};

use super::{cell, result_of, row_array};

/// Write output as CSV to stdout.
pub fn print_csv(value: &Value) {
    let stdout = io::stdout();
    if let Err(e) = write_csv(stdout.lock(), value) {
        tracing::error!(error = %e, "CSV output failed");
    }
}

/// Row arrays (schedule rows, term scenarios) become one CSV record per row;
/// anything else is written as `field,value` pairs.
fn write_csv<W: Write>(writer: W, value: &Value) -> Result<(), csv::Error> {
    let mut wtr = csv::Writer::from_writer(writer);
    let result = result_of(value);

    if let Some(rows) = row_array(result) {
        write_rows(&mut wtr, rows)?;
    } else if let Value::Array(rows) = result {
        write_rows(&mut wtr, rows)?;
    } else if let Value::Object(map) = result {
        wtr.write_record(["field", "value"])?;
        for (key, val) in map {
            wtr.write_record([key.as_str(), &cell(val)])?;
        }
    } else {
        wtr.write_record([cell(result)])?;
    }

    wtr.flush()?;
    Ok(())
}

fn write_rows<W: Write>(wtr: &mut csv::Writer<W>, rows: &[Value]) -> Result<(), csv::Error> {
    let Some(Value::Object(first)) = rows.first() else {
        for item in rows {
            wtr.write_record([cell(item)])?;
        }
        return Ok(());
    };

    let headers: Vec<&str> = first.keys().map(String::as_str).collect();
    wtr.write_record(&headers)?;
    for row in rows.iter().filter_map(Value::as_object) {
        wtr.write_record(
            headers
                .iter()
                .map(|h| row.get(*h).map(cell).unwrap_or_default()),
        )?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn to_csv(value: &Value) -> String {
        let mut buf = Vec::new();
        write_csv(&mut buf, value).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_scenarios_written_as_records() {
        let v = json!({"result": {
            "lowest_total_interest_term": 10,
            "scenarios": [
                {"term_years": 10, "monthly_payment": "5"},
                {"term_years": 15, "monthly_payment": "4"}
            ]
        }});
        let text = to_csv(&v);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "monthly_payment,term_years");
        assert_eq!(lines[1], "5,10");
        assert_eq!(lines.len(), 3);
    }

    #[test]
    fn test_flat_result_as_field_value() {
        let text = to_csv(&json!({"credit_amount": "181000000"}));
        assert_eq!(text, "field,value\ncredit_amount,181000000\n");
    }
}
