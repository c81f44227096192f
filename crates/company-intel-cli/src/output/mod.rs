pub mod csv_out;
pub mod minimal;
pub mod table;

use crate::OutputFormat;
use serde_json::{Map, Value};

/// Dispatch output to the appropriate formatter.
pub fn format_output(format: &OutputFormat, value: &Value) {
    match format {
        OutputFormat::Json => print_json(value),
        OutputFormat::Table => table::print_table(value),
        OutputFormat::Csv => csv_out::print_csv(value),
        OutputFormat::Minimal => minimal::print_minimal(value),
    }
}

/// Pretty-print JSON to stdout.
fn print_json(value: &Value) {
    match serde_json::to_string_pretty(value) {
        Ok(s) => println!("{}", s),
        Err(e) => eprintln!("JSON serialization error: {}", e),
    }
}

/// Per-company lists, in the order a reader most wants them.
const PRIMARY_LISTS: [&str; 8] = [
    "companies",
    "fastest_growth",
    "county_stats",
    "predictions_2025",
    "bankruptcy_risks",
    "anomalies",
    "stars",
    "top_counties",
];

/// The `result` object of an envelope, or the value itself.
pub(crate) fn result_of(value: &Value) -> &Value {
    value
        .as_object()
        .and_then(|m| m.get("result"))
        .unwrap_or(value)
}

/// The most relevant list of row objects inside a result, if any.
pub(crate) fn primary_list(result: &Map<String, Value>) -> Option<(&str, &[Value])> {
    PRIMARY_LISTS
        .iter()
        .find_map(|key| match result.get(*key) {
            Some(Value::Array(rows)) if rows.iter().all(Value::is_object) => {
                Some((*key, rows.as_slice()))
            }
            _ => None,
        })
}

pub(crate) fn format_scalar(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => String::new(),
        Value::Array(arr) => arr.iter().map(format_scalar).collect::<Vec<_>>().join("; "),
        Value::Object(_) => serde_json::to_string(value).unwrap_or_default(),
    }
}
