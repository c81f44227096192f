//! Year-over-year revenue jumps and collapses above 100%.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::arithmetic::pct_change;
use crate::model::CompanyRecord;
use crate::types::Percent;

/// Newest first; adjacent pairs are compared.
const WINDOW: [i32; 5] = [2024, 2023, 2022, 2021, 2020];

const ANOMALY_THRESHOLD: Decimal = dec!(100);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnomalyKind {
    Spike,
    Drop,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RevenueAnomaly {
    pub cif: String,
    pub name: String,
    pub year_from: i32,
    pub year_to: i32,
    pub change_percent: Percent,
    #[serde(rename = "type")]
    pub kind: AnomalyKind,
}

/// Revenue changes above ±100% between adjacent years, most recent pair
/// first. Pairs whose older year has no positive revenue are skipped.
pub fn detect_anomalies(record: &CompanyRecord) -> Vec<RevenueAnomaly> {
    WINDOW
        .windows(2)
        .filter_map(|pair| {
            let (newer_year, older_year) = (pair[0], pair[1]);
            let older = record.revenue_or_zero(older_year);
            if older <= Decimal::ZERO {
                return None;
            }
            let change = pct_change(older, record.revenue_or_zero(newer_year));
            if change.abs() <= ANOMALY_THRESHOLD {
                return None;
            }
            Some(RevenueAnomaly {
                cif: record.cif.clone(),
                name: record.display_name(),
                year_from: older_year,
                year_to: newer_year,
                change_percent: change,
                kind: if change > Decimal::ZERO {
                    AnomalyKind::Spike
                } else {
                    AnomalyKind::Drop
                },
            })
        })
        .collect()
}
