//! Additive bankruptcy-risk score (0-100).
//!
//! | Factor | Points |
//! |---|---|
//! | Net loss in each of 2022, 2023 and 2024 | 40 |
//! | Negative 2023 equity | 30 |
//! | 2023 debt above 80% of 2023 revenue | 20 |
//! | 2024 revenue below 70% of 2022 revenue | 10 |

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::arithmetic::{safe_div, CompanyKeyed};
use crate::model::{CompanyRecord, Field};

const LOSS_YEARS: [i32; 3] = [2024, 2023, 2022];
const BALANCE_YEAR: i32 = 2023;

const CONSECUTIVE_LOSS_POINTS: u32 = 40;
const NEGATIVE_EQUITY_POINTS: u32 = 30;
const HIGH_DEBT_POINTS: u32 = 20;
const REVENUE_DECLINE_POINTS: u32 = 10;

const HIGH_DEBT_RATIO: Decimal = dec!(0.8);
const REVENUE_DECLINE_RATIO: Decimal = dec!(0.7);

/// Scores at or above this are reported.
pub const REPORT_THRESHOLD: u32 = 50;
/// Scores at or above this are labelled ÎNALT.
pub const HIGH_RISK_THRESHOLD: u32 = 70;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RiskLevel {
    #[serde(rename = "ÎNALT")]
    Inalt,
    #[serde(rename = "MEDIU")]
    Mediu,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BankruptcyRisk {
    pub cif: String,
    pub name: String,
    pub risk_score: u32,
    pub risk_factors: Vec<String>,
    pub risk_level: RiskLevel,
}

impl BankruptcyRisk {
    pub fn is_reportable(&self) -> bool {
        self.risk_score >= REPORT_THRESHOLD
    }
}

impl CompanyKeyed for BankruptcyRisk {
    fn cif(&self) -> &str {
        &self.cif
    }
}

/// Score one company. Always returns an assessment; callers keep only
/// [`BankruptcyRisk::is_reportable`] entries.
pub fn score_bankruptcy_risk(record: &CompanyRecord) -> BankruptcyRisk {
    let mut risk_score = 0u32;
    let mut risk_factors: Vec<String> = Vec::new();

    if LOSS_YEARS
        .iter()
        .all(|&year| record.net_profit(year) < Decimal::ZERO)
    {
        risk_score += CONSECUTIVE_LOSS_POINTS;
        risk_factors.push("Pierderi consecutive 3 ani".to_string());
    }

    if record.amount_or_zero(BALANCE_YEAR, Field::Equity) < Decimal::ZERO {
        risk_score += NEGATIVE_EQUITY_POINTS;
        risk_factors.push("Capital negativ".to_string());
    }

    let revenue = record.revenue_or_zero(BALANCE_YEAR);
    if revenue > Decimal::ZERO {
        let debt_ratio = safe_div(
            record.amount_or_zero(BALANCE_YEAR, Field::Debt),
            revenue,
            Decimal::ZERO,
        );
        if debt_ratio > HIGH_DEBT_RATIO {
            risk_score += HIGH_DEBT_POINTS;
            risk_factors.push(format!(
                "Datorii mari ({:.0}%)",
                (debt_ratio * Decimal::ONE_HUNDRED).round_dp(0)
            ));
        }
    }

    if record.revenue_or_zero(2024) < record.revenue_or_zero(2022) * REVENUE_DECLINE_RATIO {
        risk_score += REVENUE_DECLINE_POINTS;
        risk_factors.push("Scădere venituri -30%".to_string());
    }

    let risk_level = if risk_score >= HIGH_RISK_THRESHOLD {
        RiskLevel::Inalt
    } else {
        RiskLevel::Mediu
    };

    BankruptcyRisk {
        cif: record.cif.clone(),
        name: record.display_name(),
        risk_score,
        risk_factors,
        risk_level,
    }
}
