use chrono::Utc;
use clap::Args;
use serde_json::Value;

use company_intel_core::forecasting::analyze_timeseries;
use company_intel_core::fraud_detection::detect_fraud;
use company_intel_core::geography::analyze_geography;
use company_intel_core::health::calculate_health_scores;
use company_intel_core::report::run_full_report;
use company_intel_core::segmentation::segment_companies;
use company_intel_core::trends::analyze_trends;
use company_intel_core::RecordSet;

use crate::config::CliConfig;
use crate::input;

#[derive(Args)]
pub struct AnalysisArgs {
    /// Snapshot file: JSON record array or wide CSV export
    #[arg(long)]
    pub input: Option<String>,
}

#[derive(Args)]
pub struct ReportArgs {
    #[arg(long)]
    pub input: Option<String>,

    /// Stamp the report with the current UTC time
    #[arg(long)]
    pub timestamp: bool,
}

/// Load the snapshot from `--input`, the configured input, or piped stdin.
pub fn load_records(
    flag: Option<String>,
    config: &CliConfig,
) -> Result<RecordSet, Box<dyn std::error::Error>> {
    let records: RecordSet = if let Some(path) = config.input_path(flag) {
        input::file::read_records(&path)?
    } else if let Some(piped) = input::read_piped()? {
        piped
    } else {
        return Err("--input <file.json|file.csv> or stdin required".into());
    };
    records.ensure_not_empty()?;
    Ok(records)
}

pub fn run_trends(args: AnalysisArgs, config: &CliConfig) -> Result<Value, Box<dyn std::error::Error>> {
    let records = load_records(args.input, config)?;
    let result = analyze_trends(&records);
    Ok(serde_json::to_value(result)?)
}

pub fn run_health(args: AnalysisArgs, config: &CliConfig) -> Result<Value, Box<dyn std::error::Error>> {
    let records = load_records(args.input, config)?;
    let result = calculate_health_scores(&records);
    Ok(serde_json::to_value(result)?)
}

pub fn run_segments(args: AnalysisArgs, config: &CliConfig) -> Result<Value, Box<dyn std::error::Error>> {
    let records = load_records(args.input, config)?;
    let result = segment_companies(&records);
    Ok(serde_json::to_value(result)?)
}

pub fn run_geography(
    args: AnalysisArgs,
    config: &CliConfig,
) -> Result<Value, Box<dyn std::error::Error>> {
    let records = load_records(args.input, config)?;
    let result = analyze_geography(&records);
    Ok(serde_json::to_value(result)?)
}

pub fn run_forecast(args: AnalysisArgs, config: &CliConfig) -> Result<Value, Box<dyn std::error::Error>> {
    let records = load_records(args.input, config)?;
    let result = analyze_timeseries(&records);
    Ok(serde_json::to_value(result)?)
}

pub fn run_fraud(args: AnalysisArgs, config: &CliConfig) -> Result<Value, Box<dyn std::error::Error>> {
    let records = load_records(args.input, config)?;
    let result = detect_fraud(&records);
    Ok(serde_json::to_value(result)?)
}

pub fn run_report(args: ReportArgs, config: &CliConfig) -> Result<Value, Box<dyn std::error::Error>> {
    let records = load_records(args.input, config)?;
    let generated_at = args.timestamp.then(Utc::now);
    let result = run_full_report(&records, generated_at);
    Ok(serde_json::to_value(result)?)
}
