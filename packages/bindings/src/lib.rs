use chrono::{DateTime, Utc};
use napi::Result as NapiResult;
use napi_derive::napi;
use serde::Serialize;

use company_intel_core::RecordSet;

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

/// Parse and validate a JSON array of company records.
fn parse_records(records_json: &str) -> NapiResult<RecordSet> {
    serde_json::from_str(records_json).map_err(to_napi_error)
}

fn to_json(output: &impl Serialize) -> NapiResult<String> {
    serde_json::to_string(output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Per-component analyses
// ---------------------------------------------------------------------------

#[napi]
pub fn analyze_trends(records_json: String) -> NapiResult<String> {
    let records = parse_records(&records_json)?;
    to_json(&company_intel_core::trends::analyze_trends(&records))
}

#[napi]
pub fn health_scores(records_json: String) -> NapiResult<String> {
    let records = parse_records(&records_json)?;
    to_json(&company_intel_core::health::calculate_health_scores(&records))
}

#[napi]
pub fn segment_companies(records_json: String) -> NapiResult<String> {
    let records = parse_records(&records_json)?;
    to_json(&company_intel_core::segmentation::segment_companies(&records))
}

#[napi]
pub fn analyze_geography(records_json: String) -> NapiResult<String> {
    let records = parse_records(&records_json)?;
    to_json(&company_intel_core::geography::analyze_geography(&records))
}

#[napi]
pub fn analyze_timeseries(records_json: String) -> NapiResult<String> {
    let records = parse_records(&records_json)?;
    to_json(&company_intel_core::forecasting::analyze_timeseries(&records))
}

#[napi]
pub fn detect_fraud(records_json: String) -> NapiResult<String> {
    let records = parse_records(&records_json)?;
    to_json(&company_intel_core::fraud_detection::detect_fraud(&records))
}

// ---------------------------------------------------------------------------
// Full report
// ---------------------------------------------------------------------------

/// `generated_at` is an optional RFC 3339 timestamp copied into the report.
#[napi]
pub fn full_report(records_json: String, generated_at: Option<String>) -> NapiResult<String> {
    let records = parse_records(&records_json)?;
    let generated_at = generated_at
        .map(|ts| {
            DateTime::parse_from_rfc3339(&ts)
                .map(|dt| dt.with_timezone(&Utc))
                .map_err(|e| to_napi_error(format!("invalid generated_at '{ts}': {e}")))
        })
        .transpose()?;
    to_json(&company_intel_core::report::run_full_report(
        &records,
        generated_at,
    ))
}
