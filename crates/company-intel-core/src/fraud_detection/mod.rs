//! Fraud-pattern risk scoring.
//!
//! Two phases: a sector-wide benchmark reduction over every 2024 filing,
//! then eight independent red-flag rules per company. The benchmarks are
//! published alongside the scores as context; the rules do not read them.

pub mod detector;
pub mod pattern_scoring;
pub mod sector_benchmarks;

pub use detector::{detect_fraud, FraudAnalysisOutput, HealthSummary};
pub use pattern_scoring::{score_fraud_patterns, FraudFlag, FraudMetrics, FraudProfile, HealthStatus};
pub use sector_benchmarks::{calculate_sector_benchmarks, SectorBenchmarks};
