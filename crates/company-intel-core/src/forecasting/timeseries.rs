use serde::{Deserialize, Serialize};
use serde_json::json;

use super::anomalies::{detect_anomalies, RevenueAnomaly};
use super::bankruptcy_risk::{
    score_bankruptcy_risk, BankruptcyRisk, RiskLevel, HIGH_RISK_THRESHOLD, REPORT_THRESHOLD,
};
use super::revenue_forecast::{forecast_revenue, RevenueForecast};
use crate::arithmetic::{sort_ranked, SortOrder};
use crate::model::RecordSet;
use crate::types::{with_metadata, ComputationOutput};

const BASE_YEAR: i32 = 2023;

/// Number of forecasts retained, best growth first.
pub const PREDICTION_CAP: usize = 100;
/// Number of anomalies retained, in detection order.
pub const ANOMALY_CAP: usize = 50;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimeseriesOutput {
    pub predictions_2025: Vec<RevenueForecast>,
    pub bankruptcy_risks: Vec<BankruptcyRisk>,
    pub high_risk_count: usize,
    pub anomalies: Vec<RevenueAnomaly>,
    /// Companies that qualified for a forecast, before the cap.
    pub total_analyzed: usize,
}

/// Forecast, anomaly scan and bankruptcy scoring for every company with a
/// reported 2023 revenue.
pub fn analyze_timeseries(records: &RecordSet) -> ComputationOutput<TimeseriesOutput> {
    let mut predictions: Vec<RevenueForecast> = Vec::new();
    let mut anomalies: Vec<RevenueAnomaly> = Vec::new();
    let mut bankruptcy_risks: Vec<BankruptcyRisk> = Vec::new();
    let mut scanned = 0usize;

    for record in records.with_revenue_in(BASE_YEAR) {
        scanned += 1;
        if let Some(forecast) = forecast_revenue(record) {
            predictions.push(forecast);
        }
        if anomalies.len() < ANOMALY_CAP {
            anomalies.extend(detect_anomalies(record));
        }
        let risk = score_bankruptcy_risk(record);
        if risk.is_reportable() {
            bankruptcy_risks.push(risk);
        }
    }
    anomalies.truncate(ANOMALY_CAP);

    let total_analyzed = predictions.len();
    sort_ranked(&mut predictions, |p| p.growth_rate, SortOrder::Descending);
    predictions.truncate(PREDICTION_CAP);

    sort_ranked(
        &mut bankruptcy_risks,
        |r| r.risk_score.into(),
        SortOrder::Descending,
    );
    let high_risk_count = bankruptcy_risks
        .iter()
        .filter(|r| r.risk_level == RiskLevel::Inalt)
        .count();

    let mut warnings = Vec::new();
    if scanned > 0 && total_analyzed == 0 {
        warnings.push(
            "No company reports positive revenue for every year 2020-2023; no forecasts produced."
                .into(),
        );
    }

    tracing::debug!(
        scanned,
        forecasts = total_analyzed,
        anomalies = anomalies.len(),
        bankruptcy_risks = bankruptcy_risks.len(),
        high_risk_count,
        "time-series analysis complete"
    );

    let assumptions = json!({
        "forecast_history": "2020-2023, all revenues > 0",
        "anomaly_window": "2020-2024",
        "anomaly_threshold_pct": 100,
        "bankruptcy_report_threshold": REPORT_THRESHOLD,
        "bankruptcy_high_threshold": HIGH_RISK_THRESHOLD,
        "prediction_cap": PREDICTION_CAP,
        "anomaly_cap": ANOMALY_CAP,
    });

    let output = TimeseriesOutput {
        predictions_2025: predictions,
        bankruptcy_risks,
        high_risk_count,
        anomalies,
        total_analyzed,
    };

    with_metadata(
        "Average three-year growth forecast, ±100% revenue anomaly scan, additive bankruptcy risk",
        &assumptions,
        warnings,
        scanned,
        output,
    )
}
