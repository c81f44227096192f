use serde_json::{Map, Value};
use tabled::{builder::Builder, Table};

use super::{format_scalar, primary_list, result_of};

/// Rows shown per company list; the JSON output carries the full list.
const MAX_TABLE_ROWS: usize = 25;

/// Summary fields first, then the main company list, then envelope notes.
pub fn print_table(value: &Value) {
    match result_of(value) {
        Value::Object(result) => print_section(result),
        Value::Array(rows) => print_rows(rows),
        other => println!("{}", format_scalar(other)),
    }

    if let Some(envelope) = value.as_object() {
        print_notes(envelope);
    }
}

fn print_section(result: &Map<String, Value>) {
    let mut builder = Builder::default();
    builder.push_record(["Field", "Value"]);
    let mut subsections: Vec<(&String, &Map<String, Value>)> = Vec::new();

    for (key, val) in result {
        match val {
            Value::Array(items) if items.iter().any(Value::is_object) => {
                builder.push_record([key.clone(), format!("{} entries", items.len())]);
            }
            Value::Object(inner) if inner.values().any(|v| v.is_object() || v.is_array()) => {
                subsections.push((key, inner));
            }
            Value::Object(inner) => {
                for (sub_key, sub_val) in inner {
                    builder.push_record([format!("{key}.{sub_key}"), format_scalar(sub_val)]);
                }
            }
            _ => builder.push_record([key.clone(), format_scalar(val)]),
        }
    }
    println!("{}", Table::from(builder));

    if let Some((name, rows)) = primary_list(result) {
        println!("\n{name}:");
        print_rows(rows);
    }

    for (name, inner) in subsections {
        println!("\n== {name} ==");
        print_section(inner);
    }
}

fn print_rows(rows: &[Value]) {
    if rows.is_empty() {
        println!("(empty)");
        return;
    }

    let Some(Value::Object(first)) = rows.first() else {
        for item in rows {
            println!("{}", format_scalar(item));
        }
        return;
    };

    // Nested objects (details, metrics) stay in the JSON output only
    let headers: Vec<String> = first
        .iter()
        .filter(|(_, v)| !v.is_object())
        .map(|(k, _)| k.clone())
        .collect();
    let mut builder = Builder::default();
    builder.push_record(headers.clone());
    for item in rows.iter().take(MAX_TABLE_ROWS) {
        if let Value::Object(map) = item {
            let row: Vec<String> = headers
                .iter()
                .map(|h| map.get(h.as_str()).map(format_scalar).unwrap_or_default())
                .collect();
            builder.push_record(row);
        }
    }
    println!("{}", Table::from(builder));
    if rows.len() > MAX_TABLE_ROWS {
        println!("... {} more (use --output json for all)", rows.len() - MAX_TABLE_ROWS);
    }
}

fn print_notes(envelope: &Map<String, Value>) {
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
