use serde_json::{Map, Value};
use std::io;

use super::{format_scalar, primary_list, result_of};

/// Write the main company list as CSV to stdout; results without one are
/// written as two-column `field,value` rows.
pub fn print_csv(value: &Value) {
    let stdout = io::stdout();
    let mut wtr = csv::Writer::from_writer(stdout.lock());

    if let Err(e) = write_csv(&mut wtr, result_of(value)).and_then(|_| wtr.flush()) {
        eprintln!("CSV write error: {}", e);
    }
}

fn write_csv<W: io::Write>(wtr: &mut csv::Writer<W>, result: &Value) -> io::Result<()> {
    match result {
        Value::Object(map) => match primary_list(map) {
            Some((_, rows)) => write_rows(wtr, rows),
            None => write_fields(wtr, map),
        },
        Value::Array(rows) => write_rows(wtr, rows),
        other => wtr.write_record([format_scalar(other)]).map_err(io::Error::from),
    }
}

fn write_fields<W: io::Write>(
    wtr: &mut csv::Writer<W>,
    map: &Map<String, Value>,
) -> io::Result<()> {
    wtr.write_record(["field", "value"])?;
    for (key, val) in map {
        wtr.write_record([key.as_str(), &format_scalar(val)])?;
    }
    Ok(())
}

/// Nested objects are flattened one level: `metrics.revenue_2024`.
fn write_rows<W: io::Write>(wtr: &mut csv::Writer<W>, rows: &[Value]) -> io::Result<()> {
    let Some(Value::Object(first)) = rows.first() else {
        for item in rows {
            wtr.write_record([format_scalar(item)])?;
        }
        return Ok(());
    };

    let mut columns: Vec<(String, Option<String>)> = Vec::new();
    for (key, val) in first {
        match val {
            Value::Object(inner) => {
                columns.extend(inner.keys().map(|k| (key.clone(), Some(k.clone()))));
            }
            _ => columns.push((key.clone(), None)),
        }
    }
    // Maps keyed per row (fraud details) have no stable columns
    columns.retain(|(key, _)| key != "details");

    let headers: Vec<String> = columns
        .iter()
        .map(|(key, sub)| match sub {
            Some(sub) => format!("{key}.{sub}"),
            None => key.clone(),
        })
        .collect();
    wtr.write_record(&headers)?;

    for item in rows {
        if let Value::Object(map) = item {
            let row: Vec<String> = columns
                .iter()
                .map(|(key, sub)| {
                    let cell = map.get(key.as_str());
                    let cell = match sub {
                        Some(sub) => cell.and_then(|v| v.get(sub.as_str())),
                        None => cell,
                    };
                    cell.map(format_scalar).unwrap_or_default()
                })
                .collect();
            wtr.write_record(&row)?;
        }
    }
    Ok(())
}
