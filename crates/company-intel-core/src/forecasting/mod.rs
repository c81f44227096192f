//! Short-horizon revenue forecast, revenue anomaly detection and
//! bankruptcy-risk scoring over the 2020-2024 filings.

pub mod anomalies;
pub mod bankruptcy_risk;
pub mod revenue_forecast;
pub mod timeseries;

pub use anomalies::{detect_anomalies, AnomalyKind, RevenueAnomaly};
pub use bankruptcy_risk::{score_bankruptcy_risk, BankruptcyRisk, RiskLevel};
pub use revenue_forecast::{forecast_revenue, RevenueForecast};
pub use timeseries::{analyze_timeseries, TimeseriesOutput};
