//! All six analyses over one snapshot, bundled for export.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::forecasting::{analyze_timeseries, TimeseriesOutput};
use crate::fraud_detection::{detect_fraud, FraudAnalysisOutput};
use crate::geography::{analyze_geography, GeographyOutput};
use crate::health::{calculate_health_scores, HealthScoreOutput};
use crate::model::RecordSet;
use crate::segmentation::{segment_companies, SegmentationOutput};
use crate::trends::{analyze_trends, TrendAnalysisOutput};
use crate::types::{with_metadata, ComputationOutput};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FullReport {
    /// Supplied by the caller; `None` keeps the report reproducible.
    pub generated_at: Option<DateTime<Utc>>,
    pub trends: TrendAnalysisOutput,
    pub financial_health: HealthScoreOutput,
    pub segmentation: SegmentationOutput,
    pub geography: GeographyOutput,
    pub timeseries: TimeseriesOutput,
    pub fraud: FraudAnalysisOutput,
}

fn prefixed(section: &str, warnings: Vec<String>) -> impl Iterator<Item = String> + '_ {
    warnings
        .into_iter()
        .map(move |w| format!("{section}: {w}"))
}

/// Run every component and collect their results. Component warnings are
/// carried over, prefixed with the section they came from.
pub fn run_full_report(
    records: &RecordSet,
    generated_at: Option<DateTime<Utc>>,
) -> ComputationOutput<FullReport> {
    let trends = analyze_trends(records);
    let health = calculate_health_scores(records);
    let segmentation = segment_companies(records);
    let geography = analyze_geography(records);
    let timeseries = analyze_timeseries(records);
    let fraud = detect_fraud(records);

    let mut warnings: Vec<String> = Vec::new();
    warnings.extend(prefixed("trends", trends.warnings));
    warnings.extend(prefixed("financial_health", health.warnings));
    warnings.extend(prefixed("segmentation", segmentation.warnings));
    warnings.extend(prefixed("geography", geography.warnings));
    warnings.extend(prefixed("timeseries", timeseries.warnings));
    warnings.extend(prefixed("fraud", fraud.warnings));

    tracing::info!(
        companies = records.len(),
        trends = trends.result.total_analyzed,
        health = health.result.total_analyzed,
        counties = geography.result.total_counties,
        predictions = timeseries.result.total_analyzed,
        fraud_critical = fraud.result.summary.critical,
        "full report generated"
    );

    let assumptions = json!({
        "trends": trends.assumptions,
        "financial_health": health.assumptions,
        "segmentation": segmentation.assumptions,
        "geography": geography.assumptions,
        "timeseries": timeseries.assumptions,
        "fraud": fraud.assumptions,
    });

    let report = FullReport {
        generated_at,
        trends: trends.result,
        financial_health: health.result,
        segmentation: segmentation.result,
        geography: geography.result,
        timeseries: timeseries.result,
        fraud: fraud.result,
    };

    with_metadata(
        "Trend, health, segmentation, geography, time-series and fraud analyses over one snapshot",
        &assumptions,
        warnings,
        records.len(),
        report,
    )
}
