use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;
use serde_json::{json, Value};

use company_intel_core::model::{FIRST_YEAR, LAST_YEAR};
use company_intel_core::{with_metadata, RecordSet};

use super::analysis::{load_records, AnalysisArgs};
use crate::config::CliConfig;

/// Coverage of a loaded snapshot. Loading already enforced unique CIFs and
/// the year range; this reports what the analyses will have to work with.
#[derive(Debug, Serialize)]
struct SnapshotSummary {
    companies: usize,
    with_name: usize,
    with_caen: usize,
    with_county: usize,
    counties: usize,
    /// Companies reporting revenue, per year.
    revenue_by_year: BTreeMap<i32, usize>,
    /// Companies without a single filing.
    empty_records: usize,
}

fn summarize(records: &RecordSet) -> (SnapshotSummary, Vec<String>) {
    let mut counties: BTreeSet<&str> = BTreeSet::new();
    let mut summary = SnapshotSummary {
        companies: records.len(),
        with_name: 0,
        with_caen: 0,
        with_county: 0,
        counties: 0,
        revenue_by_year: (FIRST_YEAR..=LAST_YEAR).map(|y| (y, 0)).collect(),
        empty_records: 0,
    };

    for record in records.records() {
        summary.with_name += usize::from(record.name.is_some());
        summary.with_caen += usize::from(record.caen.is_some());
        if let Some(judet) = record.judet.as_deref().map(str::trim).filter(|j| !j.is_empty()) {
            summary.with_county += 1;
            counties.insert(judet);
        }
        if record.years.values().all(|y| y.is_empty()) {
            summary.empty_records += 1;
        }
        for (year, count) in summary.revenue_by_year.iter_mut() {
            *count += usize::from(record.has_revenue(*year));
        }
    }
    summary.counties = counties.len();

    let mut warnings = Vec::new();
    if summary.revenue_by_year.get(&2023).copied().unwrap_or(0) == 0 {
        warnings.push("No company reports 2023 revenue; most analyses will be empty.".into());
    }
    if summary.empty_records > 0 {
        warnings.push(format!("{} companies have no filings.", summary.empty_records));
    }
    (summary, warnings)
}

pub fn run_validate(args: AnalysisArgs, config: &CliConfig) -> Result<Value, Box<dyn std::error::Error>> {
    let records = load_records(args.input, config)?;
    let (summary, warnings) = summarize(&records);
    let assumptions = json!({ "years": format!("{FIRST_YEAR}-{LAST_YEAR}") });
    let output = with_metadata(
        "Snapshot coverage check",
        &assumptions,
        warnings,
        records.len(),
        summary,
    );
    Ok(serde_json::to_value(output)?)
}
