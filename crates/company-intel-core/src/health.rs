//! Financial health score (0-100) and risk category.
//!
//! Seven independent factors each award at most one tier of points:
//! profit margin (20), debt ratio (20), liquidity (15), three-year revenue
//! growth (15), positive equity (10), employee growth (10) and revenue per
//! employee (10). All figures are taken from the 2023 filing, with 2020 as
//! the growth baseline.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::arithmetic::{mean, median, percent_of, safe_div, sort_ranked, CompanyKeyed, SortOrder};
use crate::model::{CompanyRecord, Field, RecordSet};
use crate::types::{with_metadata, ComputationOutput, Money, Percent};

const SCORE_YEAR: i32 = 2023;
const BASELINE_YEAR: i32 = 2020;

/// Size of the top / bottom lists.
pub const RANKING_CAP: usize = 50;
/// Maximum number of reason strings kept per company.
pub const MAX_REASONS: usize = 5;

// Factor maxima; they sum to 100.
const MARGIN_POINTS: u32 = 20;
const DEBT_POINTS: u32 = 20;
const LIQUIDITY_POINTS: u32 = 15;
const GROWTH_POINTS: u32 = 15;
const EQUITY_POINTS: u32 = 10;
const EMPLOYEE_POINTS: u32 = 10;
const PRODUCTIVITY_POINTS: u32 = 10;

/// Highest achievable score.
pub const MAX_SCORE: u32 = MARGIN_POINTS
    + DEBT_POINTS
    + LIQUIDITY_POINTS
    + GROWTH_POINTS
    + EQUITY_POINTS
    + EMPLOYEE_POINTS
    + PRODUCTIVITY_POINTS;

// ---------------------------------------------------------------------------
// Category
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum HealthCategory {
    #[serde(rename = "EXCELENT")]
    Excelent,
    #[serde(rename = "BUN")]
    Bun,
    #[serde(rename = "MODERAT")]
    Moderat,
    #[serde(rename = "SLAB")]
    Slab,
    #[serde(rename = "RISC ÎNALT")]
    RiscInalt,
}

impl HealthCategory {
    pub fn label(&self) -> &'static str {
        match self {
            HealthCategory::Excelent => "EXCELENT",
            HealthCategory::Bun => "BUN",
            HealthCategory::Moderat => "MODERAT",
            HealthCategory::Slab => "SLAB",
            HealthCategory::RiscInalt => "RISC ÎNALT",
        }
    }

    /// Risk wording displayed next to the category.
    pub fn risk(&self) -> &'static str {
        match self {
            HealthCategory::Excelent => "Scăzut",
            HealthCategory::Bun => "Scăzut-Mediu",
            HealthCategory::Moderat => "Mediu",
            HealthCategory::Slab => "Ridicat",
            HealthCategory::RiscInalt => "Foarte Ridicat",
        }
    }
}

/// Map a score to its category. Non-decreasing in `score`.
pub fn classify_score(score: u32) -> HealthCategory {
    match score {
        80..=u32::MAX => HealthCategory::Excelent,
        60..=79 => HealthCategory::Bun,
        40..=59 => HealthCategory::Moderat,
        20..=39 => HealthCategory::Slab,
        0..=19 => HealthCategory::RiscInalt,
    }
}

// ---------------------------------------------------------------------------
// Input / Output
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthScore {
    pub cif: String,
    pub name: String,
    pub score: u32,
    pub category: HealthCategory,
    pub risk: String,
    pub revenue: Money,
    pub profit: Money,
    pub profit_margin: Percent,
    pub debt_ratio: Percent,
    pub employees: u32,
    pub reasons: Vec<String>,
}

impl CompanyKeyed for HealthScore {
    fn cif(&self) -> &str {
        &self.cif
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthScoreOutput {
    pub companies: Vec<HealthScore>,
    pub top_50: Vec<HealthScore>,
    pub bottom_50: Vec<HealthScore>,
    pub average_score: Decimal,
    pub median_score: Decimal,
    pub categories: BTreeMap<HealthCategory, usize>,
    pub total_analyzed: usize,
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn one_dp(value: Decimal) -> String {
    format!("{:.1}", value.round_dp(1))
}

fn no_dp(value: Decimal) -> String {
    format!("{:.0}", value.round_dp(0))
}

// ---------------------------------------------------------------------------
// Core functions
// ---------------------------------------------------------------------------

/// Score a single company from its 2023 filing.
pub fn score_company(record: &CompanyRecord) -> HealthScore {
    let revenue = record.revenue_or_zero(SCORE_YEAR);
    let profit = record.net_profit(SCORE_YEAR);
    let total_income = record.amount_or_zero(SCORE_YEAR, Field::TotalIncome);
    let debt = record.amount_or_zero(SCORE_YEAR, Field::Debt);
    let receivables = record.amount_or_zero(SCORE_YEAR, Field::Receivables);
    let equity = record.amount_or_zero(SCORE_YEAR, Field::Equity);
    let employees = record.employees_or_zero(SCORE_YEAR);
    let employees_2020 = record.employees_or_zero(BASELINE_YEAR);
    let revenue_2020 = record.revenue_or_zero(BASELINE_YEAR);

    let mut score = 0u32;
    let mut reasons: Vec<String> = Vec::new();

    // 1. Profit margin
    let profit_margin = percent_of(profit, revenue);
    if profit_margin > dec!(10) {
        score += MARGIN_POINTS;
        reasons.push(format!("Marjă profit >10% ({}%)", one_dp(profit_margin)));
    } else if profit_margin > dec!(5) {
        score += 15;
        reasons.push(format!("Marjă profit >5% ({}%)", one_dp(profit_margin)));
    } else if profit_margin > Decimal::ZERO {
        score += 10;
        reasons.push(format!("Profitabil ({}%)", one_dp(profit_margin)));
    }

    // 2. Debt ratio
    let debt_ratio = percent_of(debt, total_income);
    if debt_ratio < dec!(30) {
        score += DEBT_POINTS;
        reasons.push(format!("Datorii mici <30% ({}%)", one_dp(debt_ratio)));
    } else if debt_ratio < dec!(50) {
        score += 15;
        reasons.push(format!("Datorii moderate <50% ({}%)", one_dp(debt_ratio)));
    } else if debt_ratio < dec!(80) {
        score += 10;
    }

    // 3. Liquidity
    if receivables > debt {
        score += LIQUIDITY_POINTS;
        reasons.push("Creanțe > Datorii (lichiditate bună)".to_string());
    } else if receivables > debt * dec!(0.7) {
        score += 10;
    }

    // 4. Three-year growth
    if revenue_2020 > Decimal::ZERO {
        let growth = percent_of(revenue - revenue_2020, revenue_2020);
        if growth > dec!(20) {
            score += GROWTH_POINTS;
            reasons.push(format!("Creștere >20% (3 ani: {}%)", one_dp(growth)));
        } else if growth > dec!(10) {
            score += 10;
            reasons.push(format!("Creștere >10% (3 ani: {}%)", one_dp(growth)));
        } else if growth > Decimal::ZERO {
            score += 5;
        }
    }

    // 5. Positive equity
    if equity > Decimal::ZERO {
        score += EQUITY_POINTS;
        reasons.push("Capital pozitiv".to_string());
    }

    // 6. Employee growth
    if employees_2020 > 0 && employees > employees_2020 {
        score += EMPLOYEE_POINTS;
        let growth = percent_of(
            Decimal::from(employees - employees_2020),
            Decimal::from(employees_2020),
        );
        reasons.push(format!("Creștere angajați +{}%", no_dp(growth)));
    } else if employees >= employees_2020 {
        score += 5;
    }

    // 7. Revenue per employee
    if employees > 0 {
        let per_employee = safe_div(revenue, Decimal::from(employees), Decimal::ZERO);
        if per_employee > dec!(500_000) {
            score += PRODUCTIVITY_POINTS;
            reasons.push(format!(
                "Productivitate mare ({}k RON/ang.)",
                no_dp(per_employee / dec!(1000))
            ));
        } else if per_employee > dec!(200_000) {
            score += 5;
        }
    }

    reasons.truncate(MAX_REASONS);
    let category = classify_score(score);

    HealthScore {
        cif: record.cif.clone(),
        name: record.display_name(),
        score,
        category,
        risk: category.risk().to_string(),
        revenue,
        profit,
        profit_margin,
        debt_ratio,
        employees,
        reasons,
    }
}

/// Score every company with a reported 2023 revenue.
pub fn calculate_health_scores(records: &RecordSet) -> ComputationOutput<HealthScoreOutput> {
    let mut companies: Vec<HealthScore> =
        records.with_revenue_in(SCORE_YEAR).map(score_company).collect();
    sort_ranked(&mut companies, |c| Decimal::from(c.score), SortOrder::Descending);

    let scores: Vec<Decimal> = companies.iter().map(|c| Decimal::from(c.score)).collect();
    let mut categories: BTreeMap<HealthCategory, usize> = BTreeMap::new();
    for c in &companies {
        *categories.entry(c.category).or_insert(0) += 1;
    }

    let top_50: Vec<HealthScore> = companies.iter().take(RANKING_CAP).cloned().collect();
    let bottom_50: Vec<HealthScore> =
        companies[companies.len().saturating_sub(RANKING_CAP)..].to_vec();

    let mut warnings = Vec::new();
    if companies.is_empty() {
        warnings.push("No company reports 2023 revenue; no scores computed.".into());
    }

    let output = HealthScoreOutput {
        average_score: mean(&scores),
        median_score: median(&scores),
        total_analyzed: companies.len(),
        top_50,
        bottom_50,
        categories,
        companies,
    };

    tracing::debug!(
        analyzed = output.total_analyzed,
        average = %output.average_score,
        "health scoring complete"
    );

    let assumptions = json!({
        "score_year": SCORE_YEAR,
        "baseline_year": BASELINE_YEAR,
        "max_score": MAX_SCORE,
        "category_floors": { "EXCELENT": 80, "BUN": 60, "MODERAT": 40, "SLAB": 20, "RISC ÎNALT": 0 },
        "ranking_cap": RANKING_CAP,
        "max_reasons": MAX_REASONS,
    });

    with_metadata(
        "Seven-factor tiered health score (margin, debt, liquidity, growth, equity, staff, productivity)",
        &assumptions,
        warnings,
        output.total_analyzed,
        output,
    )
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
