use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::pattern_scoring::{
    score_fraud_patterns, FraudFlag, FraudProfile, HealthStatus, CRITICAL_THRESHOLD,
    WARNING_THRESHOLD,
};
use super::sector_benchmarks::{scan_benchmarks, SectorBenchmarks};
use crate::arithmetic::{sort_ranked, SortOrder};
use crate::model::RecordSet;
use crate::types::{with_metadata, ComputationOutput};

// ---------------------------------------------------------------------------
// Output
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthSummary {
    pub healthy: usize,
    pub warning: usize,
    pub critical: usize,
}

impl HealthSummary {
    fn record(&mut self, status: HealthStatus) {
        match status {
            HealthStatus::Healthy => self.healthy += 1,
            HealthStatus::Warning => self.warning += 1,
            HealthStatus::Critical => self.critical += 1,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FraudAnalysisOutput {
    pub total_companies: usize,
    pub sector_benchmarks: SectorBenchmarks,
    pub summary: HealthSummary,
    /// Companies that triggered each flag; every flag is listed.
    pub flag_counts: BTreeMap<FraudFlag, usize>,
    /// Companies at or above the critical threshold.
    pub high_risk_count: usize,
    /// Highest risk first, ties by CIF.
    pub companies: Vec<FraudProfile>,
}

// ---------------------------------------------------------------------------
// Core function
// ---------------------------------------------------------------------------

/// Two passes: the sector benchmark reduction completes over the whole
/// snapshot before any company is scored.
pub fn detect_fraud(records: &RecordSet) -> ComputationOutput<FraudAnalysisOutput> {
    let (sector_benchmarks, mut warnings) = scan_benchmarks(records);

    let mut companies: Vec<FraudProfile> = records
        .records()
        .iter()
        .map(score_fraud_patterns)
        .collect();

    let mut summary = HealthSummary::default();
    let mut flag_counts: BTreeMap<FraudFlag, usize> =
        FraudFlag::ALL.iter().map(|&flag| (flag, 0)).collect();
    for profile in &companies {
        summary.record(profile.health_status);
        for flag in &profile.fraud_flags {
            *flag_counts.entry(*flag).or_default() += 1;
        }
    }
    let high_risk_count = summary.critical;

    sort_ranked(
        &mut companies,
        |p| Decimal::from(p.risk_score),
        SortOrder::Descending,
    );

    if sector_benchmarks.companies_sampled == 0 && !records.is_empty() {
        warnings.push("No company reports positive 2024 revenue; sector benchmarks are zero.".into());
    }

    tracing::debug!(
        companies = companies.len(),
        healthy = summary.healthy,
        warning = summary.warning,
        critical = summary.critical,
        "fraud pattern scoring complete"
    );

    let points: BTreeMap<&str, u32> = FraudFlag::ALL
        .iter()
        .map(|flag| (flag.code(), flag.points()))
        .collect();
    let assumptions = json!({
        "flag_points": points,
        "warning_threshold": WARNING_THRESHOLD,
        "critical_threshold": CRITICAL_THRESHOLD,
        "benchmark_year": 2024,
        "benchmarks_informational": true,
    });

    let output = FraudAnalysisOutput {
        total_companies: companies.len(),
        sector_benchmarks,
        summary,
        flag_counts,
        high_risk_count,
        companies,
    };

    with_metadata(
        "Sector benchmark scan followed by eight additive red-flag rules per company",
        &assumptions,
        warnings,
        records.len(),
        output,
    )
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
