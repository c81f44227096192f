//! Snapshot loading. A snapshot is either a JSON array of company records
//! or the wide CSV filing export, from a file or piped on stdin.

pub mod file;
pub mod wide_csv;

use company_intel_core::RecordSet;
use std::io::{self, Read};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnapshotFormat {
    Json,
    WideCsv,
}

impl SnapshotFormat {
    /// JSON snapshots open with an array or object; anything else is CSV.
    fn sniff(contents: &str) -> Self {
        match contents.trim_start().chars().next() {
            Some('[') | Some('{') => SnapshotFormat::Json,
            _ => SnapshotFormat::WideCsv,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            SnapshotFormat::Json => "json",
            SnapshotFormat::WideCsv => "csv",
        }
    }
}

/// Parse snapshot text in the given format into a validated [`RecordSet`].
pub fn parse_snapshot(
    contents: &str,
    format: SnapshotFormat,
) -> Result<RecordSet, Box<dyn std::error::Error>> {
    match format {
        SnapshotFormat::Json => Ok(serde_json::from_str::<RecordSet>(contents)?),
        SnapshotFormat::WideCsv => Ok(RecordSet::new(wide_csv::parse_records(contents.as_bytes())?)?),
    }
}

/// Read a snapshot piped on stdin, sniffing JSON versus CSV.
/// Returns None if stdin is a TTY (interactive) or empty.
pub fn read_piped() -> Result<Option<RecordSet>, Box<dyn std::error::Error>> {
    if atty::is(atty::Stream::Stdin) {
        return Ok(None);
    }

    let mut buffer = String::new();
    io::stdin().read_to_string(&mut buffer)?;
    if buffer.trim().is_empty() {
        return Ok(None);
    }

    let format = SnapshotFormat::sniff(&buffer);
    let records = parse_snapshot(&buffer, format)
        .map_err(|e| format!("Failed to parse stdin as {}: {}", format.name(), e))?;
    tracing::debug!(
        bytes = buffer.len(),
        companies = records.len(),
        format = format.name(),
        "read snapshot from stdin"
    );
    Ok(Some(records))
}
