//! Eight independent red-flag rules over the 2022-2024 filings.
//!
//! | Flag | Points |
//! |---|---|
//! | phantom_revenue | 20 |
//! | zombie_company | 15 |
//! | debt_bomb | 25 |
//! | revenue_spike | 15 |
//! | negative_equity | 20 |
//! | cash_flow_mismatch | 10 |
//! | efficiency_drop | 10 |
//! | profit_margin_anomaly | 15 |
//!
//! "Profit" here is the reported net profit figure of the year, without
//! netting the separately reported loss.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::arithmetic::{percent_of, safe_div, CompanyKeyed};
use crate::model::{CompanyRecord, Field};
use crate::types::{Money, Percent};

const CURRENT: i32 = 2024;
const PRIOR: i32 = 2023;
const LOSS_YEARS: [i32; 3] = [2024, 2023, 2022];

// ---------------------------------------------------------------------------
// Flags and status
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FraudFlag {
    PhantomRevenue,
    ZombieCompany,
    DebtBomb,
    RevenueSpike,
    NegativeEquity,
    CashFlowMismatch,
    EfficiencyDrop,
    ProfitMarginAnomaly,
}

impl FraudFlag {
    pub const ALL: [FraudFlag; 8] = [
        FraudFlag::PhantomRevenue,
        FraudFlag::ZombieCompany,
        FraudFlag::DebtBomb,
        FraudFlag::RevenueSpike,
        FraudFlag::NegativeEquity,
        FraudFlag::CashFlowMismatch,
        FraudFlag::EfficiencyDrop,
        FraudFlag::ProfitMarginAnomaly,
    ];

    pub fn points(&self) -> u32 {
        match self {
            FraudFlag::PhantomRevenue => 20,
            FraudFlag::ZombieCompany => 15,
            FraudFlag::DebtBomb => 25,
            FraudFlag::RevenueSpike => 15,
            FraudFlag::NegativeEquity => 20,
            FraudFlag::CashFlowMismatch => 10,
            FraudFlag::EfficiencyDrop => 10,
            FraudFlag::ProfitMarginAnomaly => 15,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            FraudFlag::PhantomRevenue => "phantom_revenue",
            FraudFlag::ZombieCompany => "zombie_company",
            FraudFlag::DebtBomb => "debt_bomb",
            FraudFlag::RevenueSpike => "revenue_spike",
            FraudFlag::NegativeEquity => "negative_equity",
            FraudFlag::CashFlowMismatch => "cash_flow_mismatch",
            FraudFlag::EfficiencyDrop => "efficiency_drop",
            FraudFlag::ProfitMarginAnomaly => "profit_margin_anomaly",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    Warning,
    Critical,
}

/// Inclusive lower bounds: 75 → critical, 40 → warning.
pub const CRITICAL_THRESHOLD: u32 = 75;
pub const WARNING_THRESHOLD: u32 = 40;

impl HealthStatus {
    pub fn from_score(risk_score: u32) -> HealthStatus {
        match risk_score {
            s if s >= CRITICAL_THRESHOLD => HealthStatus::Critical,
            s if s >= WARNING_THRESHOLD => HealthStatus::Warning,
            _ => HealthStatus::Healthy,
        }
    }
}

// ---------------------------------------------------------------------------
// Output
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FraudMetrics {
    pub revenue_2024: Money,
    pub profit_2024: Money,
    pub profit_margin: Percent,
    pub debt_ratio: Percent,
    pub employees: u32,
    /// Revenue per employee.
    pub efficiency: Money,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FraudProfile {
    pub cif: String,
    pub risk_score: u32,
    pub fraud_flags: Vec<FraudFlag>,
    pub health_status: HealthStatus,
    pub details: BTreeMap<FraudFlag, String>,
    pub metrics: FraudMetrics,
}

impl CompanyKeyed for FraudProfile {
    fn cif(&self) -> &str {
        &self.cif
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn one_dp(value: Decimal) -> String {
    format!("{:.1}", value.round_dp(1))
}

/// The year's filing figures the rules read, missing as zero.
struct Snapshot {
    revenue: Money,
    profit: Money,
    receivables: Money,
    debt: Money,
    equity: Money,
    employees: u32,
}

impl Snapshot {
    fn of(record: &CompanyRecord, year: i32) -> Self {
        Snapshot {
            revenue: record.revenue_or_zero(year),
            profit: record.amount_or_zero(year, Field::NetProfit),
            receivables: record.amount_or_zero(year, Field::Receivables),
            debt: record.amount_or_zero(year, Field::Debt),
            equity: record.amount_or_zero(year, Field::Equity),
            employees: record.employees_or_zero(year),
        }
    }
}

// ---------------------------------------------------------------------------
// Core function
// ---------------------------------------------------------------------------

/// Evaluate all eight rules for one company.
pub fn score_fraud_patterns(record: &CompanyRecord) -> FraudProfile {
    let cur = Snapshot::of(record, CURRENT);
    let prior = Snapshot::of(record, PRIOR);
    let mut details: BTreeMap<FraudFlag, String> = BTreeMap::new();

    let margin = percent_of(cur.profit, cur.revenue);

    // 1. Phantom revenue: large turnover, thin margin, almost no receivables
    if cur.revenue > dec!(1_000_000) {
        let receivables_ratio = percent_of(cur.receivables, cur.revenue);
        if margin < dec!(5) && receivables_ratio < dec!(10) {
            details.insert(
                FraudFlag::PhantomRevenue,
                format!(
                    "Marjă profit: {}%, Creanțe: {}%",
                    one_dp(margin),
                    one_dp(receivables_ratio)
                ),
            );
        }
    }

    // 2. Zombie company
    let loss_years = LOSS_YEARS
        .iter()
        .filter(|&&year| record.amount_or_zero(year, Field::NetLoss) > Decimal::ZERO)
        .count();
    if cur.employees == 0 && cur.revenue < dec!(50_000) && loss_years >= 2 {
        details.insert(
            FraudFlag::ZombieCompany,
            format!("{loss_years} ani cu pierdere, 0 angajați"),
        );
    }

    // 3. Debt bomb
    if prior.debt > Decimal::ZERO && cur.debt > Decimal::ZERO {
        let debt_growth = percent_of(cur.debt - prior.debt, prior.debt);
        if debt_growth > dec!(50) {
            details.insert(
                FraudFlag::DebtBomb,
                format!("Creștere datorii: {}%", one_dp(debt_growth)),
            );
        }
    }

    // 4. Revenue spike without matching headcount change
    if prior.revenue > Decimal::ZERO && cur.revenue > Decimal::ZERO {
        let revenue_multiple = safe_div(cur.revenue, prior.revenue, Decimal::ZERO);
        let employee_change = if prior.employees > 0 {
            let delta = Decimal::from(cur.employees) - Decimal::from(prior.employees);
            safe_div(delta.abs(), Decimal::from(prior.employees), Decimal::ZERO)
        } else {
            Decimal::ZERO
        };
        if revenue_multiple > dec!(3) && employee_change < dec!(0.2) {
            details.insert(
                FraudFlag::RevenueSpike,
                format!(
                    "Cifră de afaceri {}x, personal ±{}%",
                    one_dp(revenue_multiple),
                    (employee_change * Decimal::ONE_HUNDRED).round_dp(0)
                ),
            );
        }
    }

    // 5. Negative equity two years running
    if cur.equity < Decimal::ZERO && prior.equity < Decimal::ZERO {
        details.insert(
            FraudFlag::NegativeEquity,
            "2 ani capital negativ".to_string(),
        );
    }

    // 6. Cash-flow mismatch
    if cur.profit > Decimal::ZERO
        && cur.debt > Decimal::ZERO
        && cur.receivables / dec!(2) > cur.debt
    {
        details.insert(
            FraudFlag::CashFlowMismatch,
            format!(
                "Creanțe/Datorii: {}x",
                one_dp(safe_div(cur.receivables, cur.debt, Decimal::ZERO))
            ),
        );
    }

    // 7. Efficiency drop
    if prior.employees > 0 && cur.employees > 0 {
        let eff_prior = safe_div(prior.revenue, Decimal::from(prior.employees), Decimal::ZERO);
        let eff_cur = safe_div(cur.revenue, Decimal::from(cur.employees), Decimal::ZERO);
        if eff_prior > Decimal::ZERO {
            let drop = percent_of(eff_prior - eff_cur, eff_prior);
            if drop > dec!(40) {
                details.insert(
                    FraudFlag::EfficiencyDrop,
                    format!("Scădere eficiență: {}%", one_dp(drop)),
                );
            }
        }
    }

    // 8. Profit margin anomaly
    if cur.revenue > Decimal::ZERO && (margin > dec!(50) || margin < dec!(-20)) {
        details.insert(
            FraudFlag::ProfitMarginAnomaly,
            format!("Marjă profit: {}%", one_dp(margin)),
        );
    }

    let fraud_flags: Vec<FraudFlag> = details.keys().copied().collect();
    let risk_score: u32 = fraud_flags.iter().map(FraudFlag::points).sum();

    let metrics = FraudMetrics {
        revenue_2024: cur.revenue,
        profit_2024: cur.profit,
        profit_margin: margin,
        debt_ratio: percent_of(cur.debt, cur.revenue),
        employees: cur.employees,
        efficiency: if cur.employees > 0 {
            safe_div(cur.revenue, Decimal::from(cur.employees), Decimal::ZERO)
        } else {
            Decimal::ZERO
        },
    };

    FraudProfile {
        cif: record.cif.clone(),
        risk_score,
        fraud_flags,
        health_status: HealthStatus::from_score(risk_score),
        details,
        metrics,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::FinancialYear;

    fn filing(year: i32, data: FinancialYear) -> CompanyRecord {
        CompanyRecord::new("55").with_year(year, data)
    }

    #[test]
    fn test_phantom_revenue() {
        let record = filing(
            2024,
            FinancialYear {
                revenue: Some(dec!(2_000_000)),
                net_profit: Some(dec!(50_000)),
                receivables: Some(dec!(100_000)),
                employees: Some(10),
                ..Default::default()
            },
        );
        let p = score_fraud_patterns(&record);
        assert_eq!(p.fraud_flags, vec![FraudFlag::PhantomRevenue]);
        assert_eq!(p.risk_score, 20);
        assert_eq!(p.health_status, HealthStatus::Healthy);
        assert_eq!(p.metrics.profit_margin, dec!(2.5));
        assert_eq!(p.details[&FraudFlag::PhantomRevenue], "Marjă profit: 2.5%, Creanțe: 5.0%");
    }

    #[test]
    fn test_zombie_company() {
        let record = CompanyRecord::new("1")
            .with_year(
                2024,
                FinancialYear {
                    revenue: Some(dec!(10_000)),
                    net_loss: Some(dec!(3_000)),
                    employees: Some(0),
                    ..Default::default()
                },
            )
            .with_year(
                2022,
                FinancialYear {
                    net_loss: Some(dec!(1)),
                    ..Default::default()
                },
            );
        let p = score_fraud_patterns(&record);
        assert!(p.fraud_flags.contains(&FraudFlag::ZombieCompany));
        assert_eq!(p.details[&FraudFlag::ZombieCompany], "2 ani cu pierdere, 0 angajați");
    }

    #[test]
    fn test_debt_bomb_and_negative_equity_is_warning() {
        let record = CompanyRecord::new("1")
            .with_year(
                2023,
                FinancialYear {
                    debt: Some(dec!(100)),
                    equity: Some(dec!(-10)),
                    ..Default::default()
                },
            )
            .with_year(
                2024,
                FinancialYear {
                    debt: Some(dec!(151)),
                    equity: Some(dec!(-20)),
                    ..Default::default()
                },
            );
        let p = score_fraud_patterns(&record);
        assert_eq!(
            p.fraud_flags,
            vec![FraudFlag::DebtBomb, FraudFlag::NegativeEquity]
        );
        assert_eq!(p.risk_score, 45);
        assert_eq!(p.health_status, HealthStatus::Warning);
    }

    #[test]
    fn test_revenue_spike_with_flat_headcount() {
        let record = CompanyRecord::new("1")
            .with_year(
                2023,
                FinancialYear {
                    revenue: Some(dec!(100_000)),
                    employees: Some(10),
                    ..Default::default()
                },
            )
            .with_year(
                2024,
                FinancialYear {
                    revenue: Some(dec!(400_000)),
                    net_profit: Some(dec!(40_000)),
                    receivables: Some(dec!(200_000)),
                    employees: Some(11),
                    ..Default::default()
                },
            );
        let p = score_fraud_patterns(&record);
        assert_eq!(p.fraud_flags, vec![FraudFlag::RevenueSpike]);
        assert_eq!(p.risk_score, 15);
    }

    #[test]
    fn test_spike_with_hiring_not_flagged() {
        let record = CompanyRecord::new("1")
            .with_year(
                2023,
                FinancialYear {
                    revenue: Some(dec!(100_000)),
                    employees: Some(10),
                    ..Default::default()
                },
            )
            .with_year(
                2024,
                FinancialYear {
                    revenue: Some(dec!(400_000)),
                    net_profit: Some(dec!(40_000)),
                    receivables: Some(dec!(200_000)),
                    employees: Some(12),
                    ..Default::default()
                },
            );
        assert!(score_fraud_patterns(&record).fraud_flags.is_empty());
    }

    #[test]
    fn test_revenue_spike_without_prior_staff() {
        // no 2023 headcount: the headcount change counts as zero
        let record = CompanyRecord::new("1")
            .with_year(
                2023,
                FinancialYear {
                    revenue: Some(dec!(100_000)),
                    employees: Some(0),
                    ..Default::default()
                },
            )
            .with_year(
                2024,
                FinancialYear {
                    revenue: Some(dec!(400_000)),
                    net_profit: Some(dec!(40_000)),
                    receivables: Some(dec!(200_000)),
                    employees: Some(5),
                    ..Default::default()
                },
            );
        let p = score_fraud_patterns(&record);
        assert_eq!(p.fraud_flags, vec![FraudFlag::RevenueSpike]);
        assert_eq!(p.details[&FraudFlag::RevenueSpike], "Cifră de afaceri 4.0x, personal ±0%");
    }

    #[test]
    fn test_negative_equity_needs_both_years() {
        let one_year = |eq_2023: Decimal, eq_2024: Decimal| {
            CompanyRecord::new("1")
                .with_year(
                    2023,
                    FinancialYear {
                        equity: Some(eq_2023),
                        ..Default::default()
                    },
                )
                .with_year(
                    2024,
                    FinancialYear {
                        equity: Some(eq_2024),
                        ..Default::default()
                    },
                )
        };
        for record in [
            one_year(dec!(-10), dec!(5)),
            one_year(dec!(5), dec!(-10)),
            one_year(Decimal::ZERO, dec!(-10)),
        ] {
            let p = score_fraud_patterns(&record);
            assert!(!p.fraud_flags.contains(&FraudFlag::NegativeEquity));
        }

        // 2023 not filed at all
        let only_2024 = filing(
            2024,
            FinancialYear {
                equity: Some(dec!(-10)),
                ..Default::default()
            },
        );
        assert!(score_fraud_patterns(&only_2024).fraud_flags.is_empty());
    }

    #[test]
    fn test_extreme_margin_is_anomaly() {
        let record = filing(
            2024,
            FinancialYear {
                revenue: Some(dec!(1)),
                net_profit: Some(dec!(10_000_000_000_000)),
                ..Default::default()
            },
        );
        let p = score_fraud_patterns(&record);
        assert_eq!(p.fraud_flags, vec![FraudFlag::ProfitMarginAnomaly]);
        assert_eq!(p.metrics.profit_margin, dec!(1_000_000_000_000_000));
    }

    #[test]
    fn test_cash_flow_mismatch() {
        let record = filing(
            2024,
            FinancialYear {
                revenue: Some(dec!(500_000)),
                net_profit: Some(dec!(50_000)),
                debt: Some(dec!(100_000)),
                receivables: Some(dec!(250_000)),
                ..Default::default()
            },
        );
        let p = score_fraud_patterns(&record);
        assert_eq!(p.fraud_flags, vec![FraudFlag::CashFlowMismatch]);
        assert_eq!(p.details[&FraudFlag::CashFlowMismatch], "Creanțe/Datorii: 2.5x");
    }

    #[test]
    fn test_efficiency_drop() {
        let record = CompanyRecord::new("1")
            .with_year(
                2023,
                FinancialYear {
                    revenue: Some(dec!(1_000_000)),
                    employees: Some(10),
                    ..Default::default()
                },
            )
            .with_year(
                2024,
                FinancialYear {
                    revenue: Some(dec!(500_000)),
                    net_profit: Some(dec!(50_000)),
                    receivables: Some(dec!(100_000)),
                    employees: Some(10),
                    ..Default::default()
                },
            );
        let p = score_fraud_patterns(&record);
        assert_eq!(p.fraud_flags, vec![FraudFlag::EfficiencyDrop]);
        assert_eq!(p.metrics.efficiency, dec!(50_000));
    }

    #[test]
    fn test_profit_margin_anomaly_high_and_low() {
        let high = filing(
            2024,
            FinancialYear {
                revenue: Some(dec!(100_000)),
                net_profit: Some(dec!(60_000)),
                ..Default::default()
            },
        );
        assert!(score_fraud_patterns(&high)
            .fraud_flags
            .contains(&FraudFlag::ProfitMarginAnomaly));

        let exactly_fifty = filing(
            2024,
            FinancialYear {
                revenue: Some(dec!(100_000)),
                net_profit: Some(dec!(50_000)),
                ..Default::default()
            },
        );
        assert!(!score_fraud_patterns(&exactly_fifty)
            .fraud_flags
            .contains(&FraudFlag::ProfitMarginAnomaly));
    }

    #[test]
    fn test_all_flags_is_critical_and_points_sum() {
        let total: u32 = FraudFlag::ALL.iter().map(FraudFlag::points).sum();
        assert_eq!(total, 130);
        assert_eq!(HealthStatus::from_score(total), HealthStatus::Critical);
    }

    #[test]
    fn test_status_boundaries_inclusive() {
        assert_eq!(HealthStatus::from_score(39), HealthStatus::Healthy);
        assert_eq!(HealthStatus::from_score(40), HealthStatus::Warning);
        assert_eq!(HealthStatus::from_score(74), HealthStatus::Warning);
        assert_eq!(HealthStatus::from_score(75), HealthStatus::Critical);
    }

    #[test]
    fn test_empty_record_is_clean() {
        let p = score_fraud_patterns(&CompanyRecord::new("1"));
        assert_eq!(p.risk_score, 0);
        assert!(p.fraud_flags.is_empty());
        assert!(p.details.is_empty());
        assert_eq!(p.metrics.efficiency, Decimal::ZERO);
    }

    #[test]
    fn test_flag_codes_match_serialization() {
        for flag in FraudFlag::ALL {
            let json = serde_json::to_string(&flag).unwrap();
            assert_eq!(json, format!("\"{}\"", flag.code()));
        }
    }
}
