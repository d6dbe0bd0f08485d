use serde_json::Value;

use super::{cell, result_of};

/// Key answer fields, in order of priority.
const PRIORITY_KEYS: [&str; 5] = [
    "monthly_payment",
    "status",
    "lowest_total_interest_term",
    "credit_amount",
    "version",
];

/// Print just the key answer value from the output.
pub fn print_minimal(value: &Value) {
    println!("{}", minimal_line(value));
}

fn minimal_line(value: &Value) -> String {
    let result = result_of(value);
    let Value::Object(map) = result else {
        return cell(result);
    };

    // Simulator output nests the calculator result one level down.
    let financing = map.get("financing").and_then(Value::as_object);
    for key in PRIORITY_KEYS {
        let found = map
            .get(key)
            .or_else(|| financing.and_then(|f| f.get(key)));
        if let Some(val) = found.filter(|v| !v.is_null()) {
            return cell(val);
        }
    }

    match map.iter().next() {
        Some((key, val)) => format!("{key}: {}", cell(val)),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_picks_monthly_payment() {
        let v = json!({"credit_amount": "100", "monthly_payment": "5"});
        assert_eq!(minimal_line(&v), "5");
    }

    #[test]
    fn test_looks_inside_simulation_output() {
        let v = json!({"result": {"adjustments": [], "financing": {"monthly_payment": "7"}}});
        assert_eq!(minimal_line(&v), "7");
    }

    #[test]
    fn test_falls_back_to_first_field() {
        let v = json!({"alpha": 1});
        assert_eq!(minimal_line(&v), "alpha: 1");
    }
}
