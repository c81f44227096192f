//! County (județ) roll-ups and market-concentration classification.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::arithmetic::{percent_of, safe_div};
use crate::model::{CompanyRecord, Field, RecordSet};
use crate::types::{with_metadata, ComputationOutput, Money, Percent};

const STATS_YEAR: i32 = 2023;

/// Number of counties listed in `top_counties`.
pub const TOP_COUNTIES_CAP: usize = 20;

const MONOPOLY_THRESHOLD: Decimal = dec!(50);
const FRAGMENTED_THRESHOLD: Decimal = dec!(20);
const FRAGMENTED_MIN_COMPANIES: usize = 50;
const CONCENTRATION_MIN_COMPANIES: usize = 2;

// ---------------------------------------------------------------------------
// Input / Output
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CountyStats {
    pub judet: String,
    pub num_companies: usize,
    pub total_revenue: Money,
    pub avg_revenue: Money,
    pub total_employees: u64,
    pub avg_employees: Decimal,
    pub total_profit: Money,
    /// Revenue per company in the county (not per inhabitant).
    pub revenue_per_capita: Money,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MarketStructure {
    Monopolized,
    Fragmented,
    Unclassified,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CountyConcentration {
    pub judet: String,
    pub num_companies: usize,
    pub concentration: Percent,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeographyOutput {
    pub county_stats: Vec<CountyStats>,
    pub top_counties: Vec<CountyStats>,
    pub monopolized_counties: Vec<CountyConcentration>,
    pub fragmented_counties: Vec<CountyConcentration>,
    pub total_counties: usize,
}

// ---------------------------------------------------------------------------
// Accumulation
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
struct CountyTotals {
    companies: usize,
    revenue: Money,
    max_revenue: Money,
    employees: u64,
    /// Companies that report a 2023 headcount.
    staffed: usize,
    net_profit: Money,
    net_loss: Money,
}

impl CountyTotals {
    fn add(&mut self, record: &CompanyRecord) {
        let revenue = record.revenue_or_zero(STATS_YEAR);
        if self.companies == 0 || revenue > self.max_revenue {
            self.max_revenue = revenue;
        }
        self.companies += 1;
        self.revenue += revenue;
        if let Some(staff) = record.employees(STATS_YEAR) {
            self.employees += u64::from(staff);
            self.staffed += 1;
        }
        self.net_profit += record.amount_or_zero(STATS_YEAR, Field::NetProfit);
        self.net_loss += record.amount_or_zero(STATS_YEAR, Field::NetLoss);
    }

    fn stats(&self, judet: &str) -> CountyStats {
        let n = Decimal::from(self.companies as u64);
        let avg_revenue = safe_div(self.revenue, n, Decimal::ZERO);
        CountyStats {
            judet: judet.to_string(),
            num_companies: self.companies,
            total_revenue: self.revenue,
            avg_revenue,
            total_employees: self.employees,
            avg_employees: safe_div(
                Decimal::from(self.employees),
                Decimal::from(self.staffed as u64),
                Decimal::ZERO,
            ),
            total_profit: self.net_profit - self.net_loss,
            revenue_per_capita: avg_revenue,
        }
    }
}

fn county_of(record: &CompanyRecord) -> Option<&str> {
    record
        .judet
        .as_deref()
        .map(str::trim)
        .filter(|j| !j.is_empty())
}

/// Group companies by county; companies without a county are skipped.
fn group_by_county(records: &RecordSet) -> BTreeMap<&str, CountyTotals> {
    let mut counties: BTreeMap<&str, CountyTotals> = BTreeMap::new();
    for record in records.records() {
        if let Some(judet) = county_of(record) {
            counties.entry(judet).or_default().add(record);
        }
    }
    counties
}

// ---------------------------------------------------------------------------
// Core functions
// ---------------------------------------------------------------------------

/// Share of the largest company in the county's total revenue, in percent.
pub fn market_concentration(max_revenue: Money, total_revenue: Money) -> Percent {
    percent_of(max_revenue, total_revenue)
}

/// Classify a county's market from its company count and concentration.
pub fn classify_concentration(num_companies: usize, concentration: Percent) -> MarketStructure {
    if concentration > MONOPOLY_THRESHOLD {
        MarketStructure::Monopolized
    } else if num_companies > FRAGMENTED_MIN_COMPANIES && concentration < FRAGMENTED_THRESHOLD {
        MarketStructure::Fragmented
    } else {
        MarketStructure::Unclassified
    }
}

/// County roll-ups ordered by total revenue (descending, ties by name),
/// plus the monopolised / fragmented county lists.
pub fn analyze_geography(records: &RecordSet) -> ComputationOutput<GeographyOutput> {
    let counties = group_by_county(records);

    let mut county_stats: Vec<CountyStats> = counties
        .iter()
        .map(|(judet, totals)| totals.stats(judet))
        .collect();
    county_stats.sort_by(|a, b| {
        b.total_revenue
            .cmp(&a.total_revenue)
            .then_with(|| a.judet.cmp(&b.judet))
    });

    let mut monopolized_counties = Vec::new();
    let mut fragmented_counties = Vec::new();
    for stats in &county_stats {
        let Some(totals) = counties.get(stats.judet.as_str()) else {
            continue;
        };
        if totals.companies < CONCENTRATION_MIN_COMPANIES {
            continue;
        }
        let concentration = market_concentration(totals.max_revenue, totals.revenue);
        let entry = CountyConcentration {
            judet: stats.judet.clone(),
            num_companies: totals.companies,
            concentration,
        };
        match classify_concentration(totals.companies, concentration) {
            MarketStructure::Monopolized => monopolized_counties.push(entry),
            MarketStructure::Fragmented => fragmented_counties.push(entry),
            MarketStructure::Unclassified => {}
        }
    }

    let without_county = records.len() - counties.values().map(|t| t.companies).sum::<usize>();
    let mut warnings = Vec::new();
    if without_county > 0 {
        warnings.push(format!(
            "{without_county} companies have no county and are excluded from the geographic roll-up."
        ));
    }

    tracing::debug!(
        counties = county_stats.len(),
        monopolized = monopolized_counties.len(),
        fragmented = fragmented_counties.len(),
        without_county,
        "geographic analysis complete"
    );

    let analyzed = records.len() - without_county;
    let output = GeographyOutput {
        top_counties: county_stats.iter().take(TOP_COUNTIES_CAP).cloned().collect(),
        total_counties: county_stats.len(),
        county_stats,
        monopolized_counties,
        fragmented_counties,
    };

    let assumptions = json!({
        "stats_year": STATS_YEAR,
        "monopoly_concentration_above": MONOPOLY_THRESHOLD,
        "fragmented_concentration_below": FRAGMENTED_THRESHOLD,
        "fragmented_min_companies_above": FRAGMENTED_MIN_COMPANIES,
        "concentration_min_companies": CONCENTRATION_MIN_COMPANIES,
        "top_counties_cap": TOP_COUNTIES_CAP,
    });

    with_metadata(
        "County roll-up of 2023 filings with largest-company revenue share concentration",
        &assumptions,
        warnings,
        analyzed,
        output,
    )
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
