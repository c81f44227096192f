use company_intel_core::RecordSet;
use std::fs;
use std::path::{Path, PathBuf};

use super::{parse_snapshot, SnapshotFormat};

/// Load a record snapshot. `.csv` files are read as the wide filing export,
/// anything else as a JSON array of company records.
pub fn read_records(path: &str) -> Result<RecordSet, Box<dyn std::error::Error>> {
    let canonical = resolve_path(path)?;
    let format = if canonical
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"))
    {
        SnapshotFormat::WideCsv
    } else {
        SnapshotFormat::Json
    };

    let contents = fs::read_to_string(&canonical)
        .map_err(|e| format!("Failed to read '{}': {}", canonical.display(), e))?;
    let records = parse_snapshot(&contents, format)
        .map_err(|e| format!("Failed to parse '{}': {}", canonical.display(), e))?;

    tracing::debug!(
        path = %canonical.display(),
        companies = records.len(),
        format = format.name(),
        "loaded snapshot"
    );
    Ok(records)
}

/// Resolve and validate the path.
fn resolve_path(path: &str) -> Result<PathBuf, Box<dyn std::error::Error>> {
    let p = Path::new(path);
    let canonical = if p.is_absolute() {
        p.to_path_buf()
    } else {
        std::env::current_dir()?.join(p)
    };

    if !canonical.exists() {
        return Err(format!("File not found: {}", canonical.display()).into());
    }

    if !canonical.is_file() {
        return Err(format!("Not a file: {}", canonical.display()).into());
    }

    Ok(canonical)
}
