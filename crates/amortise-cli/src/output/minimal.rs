use serde_json::Value;

use super::{format_cell, result_of};

/// Print just the headline number: the periodic payment, or the interest
/// total for interest-only loans, or the combined payments of an aggregate.
pub fn print_minimal(value: &Value) {
    println!("{}", headline(result_of(value)));
}

fn headline(result: &Value) -> String {
    match result {
        Value::Object(map) => {
            for key in ["periodic_payment", "interest_total"] {
                if let Some(val) = map.get(key) {
                    if !val.is_null() {
                        return format_cell(val);
                    }
                }
            }
            map.iter()
                .next()
                .map(|(k, v)| format!("{}: {}", k, format_cell(v)))
                .unwrap_or_default()
        }
        Value::Array(rows) => {
            let total: f64 = rows
                .iter()
                .filter_map(|r| r.get("total_payment").and_then(Value::as_f64))
                .sum();
            total.to_string()
        }
        other => format_cell(other),
    }
}
