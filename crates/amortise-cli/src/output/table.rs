use serde_json::{Map, Value};
use tabled::{builder::Builder, Table};

use super::{format_cell, ordered_columns, result_of, rows_of};

/// Print scalar result fields as a Field/Value table, then the payment rows.
pub fn print_table(value: &Value) {
    let result = result_of(value);

    if let Value::Object(res_map) = result {
        print_fields(res_map);
    }
    if let Some(rows) = rows_of(result) {
        println!();
        print_rows(rows);
    }

    if let Some(envelope) = value.as_object() {
        print_footer(envelope);
    }
}

fn print_fields(map: &Map<String, Value>) {
    let mut builder = Builder::default();
    builder.push_record(["Field", "Value"]);
    for (key, val) in map {
        if val.is_array() {
            continue;
        }
        builder.push_record([key.as_str(), &format_cell(val)]);
    }
    println!("{}", Table::from(builder));
}

fn print_rows(rows: &[Value]) {
    let Some(Value::Object(first)) = rows.first() else {
        println!("(no payments)");
        return;
    };
    let headers = ordered_columns(first);
    let mut builder = Builder::default();
    builder.push_record(&headers);

    for item in rows {
        if let Value::Object(map) = item {
            let row: Vec<String> = headers
                .iter()
                .map(|h| map.get(h).map(format_cell).unwrap_or_default())
                .collect();
            builder.push_record(row);
        }
    }
    println!("{}", Table::from(builder));
}

fn print_footer(envelope: &Map<String, Value>) {
    if let Some(Value::Array(warnings)) = envelope.get("warnings") {
        if !warnings.is_empty() {
            println!("\nWarnings:");
            for w in warnings {
                if let Value::String(s) = w {
                    println!("  - {}", s);
                }
            }
        }
    }

    if let Some(Value::String(meth)) = envelope.get("methodology") {
        println!("\nMethodology: {}", meth);
    }
}
