//! One-step-ahead revenue projection from the average of the last three
//! year-over-year growth rates.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::arithmetic::{mean, safe_div, CompanyKeyed};
use crate::model::CompanyRecord;
use crate::types::{Money, Percent};

/// Oldest to newest. Every year must report strictly positive revenue.
const HISTORY: [i32; 4] = [2020, 2021, 2022, 2023];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RevenueForecast {
    pub cif: String,
    pub name: String,
    pub revenue_2023: Money,
    /// Projected revenue for the year after the last filing, floored at 0.
    #[serde(rename = "predicted_2025")]
    pub predicted_next: Money,
    /// Average year-over-year growth, in percent.
    pub growth_rate: Percent,
}

impl CompanyKeyed for RevenueForecast {
    fn cif(&self) -> &str {
        &self.cif
    }
}

/// Project next-year revenue. `None` when any of 2020-2023 revenue is
/// missing or not strictly positive.
pub fn forecast_revenue(record: &CompanyRecord) -> Option<RevenueForecast> {
    let mut history = [Decimal::ZERO; HISTORY.len()];
    for (slot, year) in history.iter_mut().zip(HISTORY) {
        match record.revenue(year) {
            Some(r) if r > Decimal::ZERO => *slot = r,
            _ => return None,
        }
    }

    let growth_rates: Vec<Decimal> = history
        .windows(2)
        .map(|w| safe_div(w[1] - w[0], w[0], Decimal::ZERO))
        .collect();
    let average_growth = mean(&growth_rates);

    let latest = history[HISTORY.len() - 1];
    let predicted = (latest * (Decimal::ONE + average_growth)).max(Decimal::ZERO);

    Some(RevenueForecast {
        cif: record.cif.clone(),
        name: record.display_name(),
        revenue_2023: latest,
        predicted_next: predicted,
        growth_rate: average_growth * Decimal::ONE_HUNDRED,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
