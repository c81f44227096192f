//! Growth and decline trend analysis.
//!
//! Ranks the cohort by four-year revenue CAGR (2020→2024), by the
//! 2019→2020 COVID revenue shock and by 2023 net profit. Missing figures
//! yield neutral (zero) metrics; no company is dropped for lack of data.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::arithmetic::{cagr, pct_change, rank_top, CompanyKeyed, SortOrder};
use crate::model::{CompanyRecord, RecordSet};
use crate::types::{with_metadata, ComputationOutput, Money, Percent};

const BASE_YEAR: i32 = 2023;
const CAGR_START_YEAR: i32 = 2020;
const CAGR_END_YEAR: i32 = 2024;
const CAGR_YEARS: u32 = 4;
const PRE_COVID_YEAR: i32 = 2019;
const COVID_YEAR: i32 = 2020;
const EMPLOYEE_BASE_YEAR: i32 = 2013;

/// Size of the growth / decline / profitability lists.
pub const GROWTH_LIST_CAP: usize = 50;
/// Size of the COVID winners / losers lists.
pub const COVID_LIST_CAP: usize = 30;

// ---------------------------------------------------------------------------
// Input / Output
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompanyTrend {
    pub cif: String,
    pub name: String,
    /// 2024 revenue, or 2023 revenue when 2024 is not reported.
    pub revenue_2024: Money,
    pub revenue_2023: Money,
    pub revenue_2020: Money,
    pub revenue_2013: Money,
    pub cagr: Percent,
    pub covid_impact: Percent,
    pub profit_2023: Money,
    pub profit_2024: Money,
    pub employees_2024: u32,
    pub employee_change: i64,
}

impl CompanyKeyed for CompanyTrend {
    fn cif(&self) -> &str {
        &self.cif
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrendAnalysisOutput {
    pub fastest_growth: Vec<CompanyTrend>,
    pub fastest_decline: Vec<CompanyTrend>,
    pub covid_winners: Vec<CompanyTrend>,
    pub covid_losers: Vec<CompanyTrend>,
    pub most_profitable: Vec<CompanyTrend>,
    pub total_analyzed: usize,
}

// ---------------------------------------------------------------------------
// Core functions
// ---------------------------------------------------------------------------

/// Derive the trend metrics of a single company.
pub fn company_trend(record: &CompanyRecord) -> CompanyTrend {
    let revenue_2020 = record.revenue_or_zero(CAGR_START_YEAR);
    let revenue_2024 = match record.revenue_or_zero(CAGR_END_YEAR) {
        r if r.is_zero() => record.revenue_or_zero(BASE_YEAR),
        r => r,
    };

    let covid_impact = pct_change(
        record.revenue_or_zero(PRE_COVID_YEAR),
        record.revenue_or_zero(COVID_YEAR),
    );

    let employees_2024 = record.employees_or_zero(CAGR_END_YEAR);
    let employee_change =
        i64::from(employees_2024) - i64::from(record.employees_or_zero(EMPLOYEE_BASE_YEAR));

    CompanyTrend {
        cif: record.cif.clone(),
        name: record.display_name(),
        revenue_2024,
        revenue_2023: record.revenue_or_zero(BASE_YEAR),
        revenue_2020,
        revenue_2013: record.revenue_or_zero(EMPLOYEE_BASE_YEAR),
        cagr: cagr(revenue_2020, revenue_2024, CAGR_YEARS),
        covid_impact,
        profit_2023: record.net_profit(BASE_YEAR),
        profit_2024: record.net_profit(CAGR_END_YEAR),
        employees_2024,
        employee_change,
    }
}

/// Rank every company with a reported 2023 revenue by growth, COVID impact
/// and profitability.
pub fn analyze_trends(records: &RecordSet) -> ComputationOutput<TrendAnalysisOutput> {
    let companies: Vec<CompanyTrend> = records
        .with_revenue_in(BASE_YEAR)
        .map(company_trend)
        .collect();

    let profitable: Vec<CompanyTrend> = companies
        .iter()
        .filter(|c| c.profit_2023 > Decimal::ZERO)
        .cloned()
        .collect();

    let output = TrendAnalysisOutput {
        fastest_growth: rank_top(&companies, GROWTH_LIST_CAP, |c| c.cagr, SortOrder::Descending),
        fastest_decline: rank_top(&companies, GROWTH_LIST_CAP, |c| c.cagr, SortOrder::Ascending),
        covid_winners: rank_top(
            &companies,
            COVID_LIST_CAP,
            |c| c.covid_impact,
            SortOrder::Descending,
        ),
        covid_losers: rank_top(
            &companies,
            COVID_LIST_CAP,
            |c| c.covid_impact,
            SortOrder::Ascending,
        ),
        most_profitable: rank_top(
            &profitable,
            GROWTH_LIST_CAP,
            |c| c.profit_2023,
            SortOrder::Descending,
        ),
        total_analyzed: companies.len(),
    };

    tracing::debug!(
        records = records.len(),
        analyzed = output.total_analyzed,
        profitable = profitable.len(),
        "trend analysis complete"
    );

    let mut warnings = Vec::new();
    if companies.is_empty() {
        warnings.push("No company reports 2023 revenue; all trend lists are empty.".into());
    }

    let assumptions = json!({
        "cagr_window": format!("{CAGR_START_YEAR}-{CAGR_END_YEAR}"),
        "cagr_years": CAGR_YEARS,
        "covid_window": format!("{PRE_COVID_YEAR}-{COVID_YEAR}"),
        "growth_list_cap": GROWTH_LIST_CAP,
        "covid_list_cap": COVID_LIST_CAP,
        "tie_break": "cif ascending",
    });

    with_metadata(
        "Revenue CAGR 2020-2024 (2023 fallback), COVID impact 2019-2020, net profit ranking",
        &assumptions,
        warnings,
        output.total_analyzed,
        output,
    )
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::FinancialYear;
    use rust_decimal_macros::dec;

    fn revenue(value: Decimal) -> FinancialYear {
        FinancialYear {
            revenue: Some(value),
            ..Default::default()
        }
    }

    fn company(cif: &str, rev_2020: Decimal, rev_2024: Decimal) -> CompanyRecord {
        CompanyRecord::new(cif)
            .with_year(2020, revenue(rev_2020))
            .with_year(2023, revenue(rev_2020))
            .with_year(2024, revenue(rev_2024))
    }

    #[test]
    fn test_cagr_doubling() {
        let trend = company_trend(&company("1", dec!(1_000_000), dec!(2_000_000)));
        assert!((trend.cagr - dec!(18.92)).abs() < dec!(0.01));
    }

    #[test]
    fn test_revenue_2024_falls_back_to_2023() {
        let record = CompanyRecord::new("1")
            .with_year(2020, revenue(dec!(100)))
            .with_year(2023, revenue(dec!(300)));
        let trend = company_trend(&record);
        assert_eq!(trend.revenue_2024, dec!(300));
        assert!(trend.cagr > Decimal::ZERO);
    }

    #[test]
    fn test_missing_2020_gives_zero_cagr() {
        let record = CompanyRecord::new("1").with_year(2023, revenue(dec!(300)));
        assert_eq!(company_trend(&record).cagr, Decimal::ZERO);
    }

    #[test]
    fn test_covid_impact() {
        let record = CompanyRecord::new("1")
            .with_year(2019, revenue(dec!(200)))
            .with_year(2020, revenue(dec!(150)))
            .with_year(2023, revenue(dec!(150)));
        assert_eq!(company_trend(&record).covid_impact, dec!(-25));

        let no_2019 = CompanyRecord::new("2").with_year(2020, revenue(dec!(150)));
        assert_eq!(company_trend(&no_2019).covid_impact, Decimal::ZERO);
    }

    #[test]
    fn test_covid_lists_ordered_with_cif_ties() {
        let pandemic = |cif: &str, rev_2019: Decimal, rev_2020: Decimal| {
            CompanyRecord::new(cif)
                .with_year(2019, revenue(rev_2019))
                .with_year(2020, revenue(rev_2020))
                .with_year(2023, revenue(dec!(1)))
        };
        let set = RecordSet::new(vec![
            pandemic("d", dec!(200), dec!(300)),
            pandemic("b", dec!(100), dec!(50)),
            pandemic("c", dec!(100), dec!(100)),
            pandemic("a", dec!(100), dec!(150)),
        ])
        .unwrap();
        let out = analyze_trends(&set).result;

        let winners: Vec<&str> = out.covid_winners.iter().map(|c| c.cif.as_str()).collect();
        assert_eq!(winners, vec!["a", "d", "c", "b"]);
        let losers: Vec<&str> = out.covid_losers.iter().map(|c| c.cif.as_str()).collect();
        assert_eq!(losers, vec!["b", "c", "a", "d"]);
        assert_eq!(out.covid_losers[0].covid_impact, dec!(-50));
    }

    #[test]
    fn test_employee_change_treats_missing_as_zero() {
        let record = CompanyRecord::new("1").with_year(
            2024,
            FinancialYear {
                employees: Some(12),
                ..Default::default()
            },
        );
        let trend = company_trend(&record);
        assert_eq!(trend.employee_change, 12);

        let shrinking = CompanyRecord::new("2").with_year(
            2013,
            FinancialYear {
                employees: Some(40),
                ..Default::default()
            },
        );
        assert_eq!(company_trend(&shrinking).employee_change, -40);
    }

    #[test]
    fn test_analyze_trends_filters_on_2023_revenue() {
        let set = RecordSet::new(vec![
            company("1", dec!(100), dec!(400)),
            company("2", dec!(100), dec!(50)),
            CompanyRecord::new("3").with_year(2024, revenue(dec!(999))),
        ])
        .unwrap();
        let out = analyze_trends(&set).result;
        assert_eq!(out.total_analyzed, 2);
        assert_eq!(out.fastest_growth[0].cif, "1");
        assert_eq!(out.fastest_decline[0].cif, "2");
    }

    #[test]
    fn test_most_profitable_only_positive_profit() {
        let winner = company("1", dec!(100), dec!(100)).with_year(
            2023,
            FinancialYear {
                revenue: Some(dec!(100)),
                net_profit: Some(dec!(40)),
                ..Default::default()
            },
        );
        let loser = company("2", dec!(100), dec!(100)).with_year(
            2023,
            FinancialYear {
                revenue: Some(dec!(100)),
                net_loss: Some(dec!(10)),
                ..Default::default()
            },
        );
        let set = RecordSet::new(vec![loser, winner]).unwrap();
        let out = analyze_trends(&set).result;
        assert_eq!(out.most_profitable.len(), 1);
        assert_eq!(out.most_profitable[0].cif, "1");
        assert_eq!(out.most_profitable[0].profit_2023, dec!(40));
    }

    #[test]
    fn test_list_caps() {
        let records: Vec<CompanyRecord> = (0..60)
            .map(|i| company(&format!("{i:03}"), dec!(100), Decimal::from(100 + i)))
            .collect();
        let set = RecordSet::new(records).unwrap();
        let out = analyze_trends(&set).result;
        assert_eq!(out.fastest_growth.len(), GROWTH_LIST_CAP);
        assert_eq!(out.covid_winners.len(), COVID_LIST_CAP);
        assert_eq!(out.covid_losers.len(), COVID_LIST_CAP);
        assert_eq!(out.total_analyzed, 60);
    }

    #[test]
    fn test_empty_set_warns() {
        let out = analyze_trends(&RecordSet::default());
        assert_eq!(out.result.total_analyzed, 0);
        assert_eq!(out.warnings.len(), 1);
    }
}
