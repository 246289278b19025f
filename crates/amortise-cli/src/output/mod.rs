pub mod csv_out;
pub mod minimal;
pub mod table;

use crate::OutputFormat;
use serde_json::{Map, Value};

/// Column order for schedule and aggregate rows; unknown keys go last.
const COLUMN_ORDER: [&str; 8] = [
    "payment_sequence",
    "payment_date",
    "beginning_balance",
    "principal_payment",
    "interest_payment",
    "total_payment",
    "ending_balance",
    "notes",
];

/// Dispatch output to the appropriate formatter.
pub fn format_output(format: &OutputFormat, value: &Value) {
    match format {
        OutputFormat::Json => print_json(value),
        OutputFormat::Table => table::print_table(value),
        OutputFormat::Csv => csv_out::print_csv(value),
        OutputFormat::Minimal => minimal::print_minimal(value),
    }
}

fn print_json(value: &Value) {
    match serde_json::to_string_pretty(value) {
        Ok(text) => println!("{text}"),
        Err(e) => eprintln!("Failed to render output as JSON: {e}"),
    }
}

/// The `result` of an output envelope, or the value itself.
fn result_of(value: &Value) -> &Value {
    value
        .as_object()
        .and_then(|m| m.get("result"))
        .unwrap_or(value)
}

/// Payment rows carried by a result: the summary schedule or the
/// aggregated buckets.
fn rows_of(result: &Value) -> Option<&[Value]> {
    match result {
        Value::Array(rows) => Some(rows),
        Value::Object(map) => match map.get("schedule") {
            Some(Value::Array(rows)) => Some(rows),
            _ => None,
        },
        _ => None,
    }
}

fn ordered_columns(first: &Map<String, Value>) -> Vec<String> {
    let mut cols: Vec<String> = COLUMN_ORDER
        .iter()
        .filter(|c| first.contains_key(**c))
        .map(|c| c.to_string())
        .collect();
    for key in first.keys() {
        if !cols.contains(key) {
            cols.push(key.clone());
        }
    }
    cols
}

fn format_cell(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => String::new(),
        _ => serde_json::to_string(value).unwrap_or_default(),
    }
}
