//! Per-company segment assignment and segment roll-ups.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::classification::{BusinessModel, SizeClass, Specialization};
use crate::arithmetic::{mean, percent_of, safe_div};
use crate::model::{CompanyRecord, RecordSet};
use crate::types::{with_metadata, ComputationOutput, Money, Percent};

const SEGMENT_YEAR: i32 = 2023;
const BASELINE_YEAR: i32 = 2020;

/// Number of STAR and CASH COW exemplars exposed.
pub const EXEMPLAR_CAP: usize = 20;

// ---------------------------------------------------------------------------
// Input / Output
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompanySegment {
    pub cif: String,
    pub name: String,
    pub revenue: Money,
    pub profit: Money,
    pub profit_margin: Percent,
    pub employees: u32,
    pub size: SizeClass,
    pub specialization: Specialization,
    /// First listed CAEN code.
    pub caen: String,
    pub business_model: BusinessModel,
    pub growth: Percent,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SizeStats {
    pub count: usize,
    pub total_revenue: Money,
    pub total_employees: u64,
    pub avg_revenue: Money,
    pub avg_employees: Decimal,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SpecializationStats {
    pub count: usize,
    pub total_revenue: Money,
    pub avg_revenue: Money,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BusinessModelStats {
    pub count: usize,
    pub avg_profit_margin: Percent,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SegmentationOutput {
    pub companies: Vec<CompanySegment>,
    pub size_distribution: BTreeMap<SizeClass, SizeStats>,
    pub specialization_distribution: BTreeMap<Specialization, SpecializationStats>,
    pub business_model_distribution: BTreeMap<BusinessModel, BusinessModelStats>,
    pub stars: Vec<CompanySegment>,
    pub cash_cows: Vec<CompanySegment>,
    pub total_analyzed: usize,
}

// ---------------------------------------------------------------------------
// Accumulation
// ---------------------------------------------------------------------------

/// Running totals for one reduction pass over the segmented companies.
#[derive(Debug, Default)]
struct SegmentTotals {
    sizes: BTreeMap<SizeClass, SizeStats>,
    specializations: BTreeMap<Specialization, SpecializationStats>,
    margins: BTreeMap<BusinessModel, Vec<Decimal>>,
}

impl SegmentTotals {
    fn add(mut self, c: &CompanySegment) -> Self {
        let size = self.sizes.entry(c.size).or_default();
        size.count += 1;
        size.total_revenue += c.revenue;
        size.total_employees += u64::from(c.employees);

        let spec = self.specializations.entry(c.specialization).or_default();
        spec.count += 1;
        spec.total_revenue += c.revenue;

        self.margins
            .entry(c.business_model)
            .or_default()
            .push(c.profit_margin);
        self
    }

    #[allow(clippy::type_complexity)]
    fn finish(
        self,
    ) -> (
        BTreeMap<SizeClass, SizeStats>,
        BTreeMap<Specialization, SpecializationStats>,
        BTreeMap<BusinessModel, BusinessModelStats>,
    ) {
        let mut sizes = self.sizes;
        for stats in sizes.values_mut() {
            let n = Decimal::from(stats.count as u64);
            stats.avg_revenue = safe_div(stats.total_revenue, n, Decimal::ZERO);
            stats.avg_employees = safe_div(Decimal::from(stats.total_employees), n, Decimal::ZERO);
        }

        let mut specializations = self.specializations;
        for stats in specializations.values_mut() {
            let n = Decimal::from(stats.count as u64);
            stats.avg_revenue = safe_div(stats.total_revenue, n, Decimal::ZERO);
        }

        let models = self
            .margins
            .into_iter()
            .map(|(model, margins)| {
                let stats = BusinessModelStats {
                    count: margins.len(),
                    avg_profit_margin: mean(&margins),
                };
                (model, stats)
            })
            .collect();

        (sizes, specializations, models)
    }
}

// ---------------------------------------------------------------------------
// Core functions
// ---------------------------------------------------------------------------

/// Assign size class, specialisation and business model to one company.
pub fn segment_company(record: &CompanyRecord) -> CompanySegment {
    let revenue = record.revenue_or_zero(SEGMENT_YEAR);
    let profit = record.net_profit(SEGMENT_YEAR);
    let employees = record.employees_or_zero(SEGMENT_YEAR);
    let revenue_2020 = record.revenue_or_zero(BASELINE_YEAR);

    let profit_margin = percent_of(profit, revenue);
    let growth = if revenue_2020 > Decimal::ZERO {
        percent_of(revenue - revenue_2020, revenue_2020)
    } else {
        Decimal::ZERO
    };

    CompanySegment {
        cif: record.cif.clone(),
        name: record.display_name(),
        revenue,
        profit,
        profit_margin,
        employees,
        size: SizeClass::classify(employees, revenue),
        specialization: Specialization::from_caen(record.caen.as_deref().unwrap_or("")),
        caen: record.main_caen(),
        business_model: BusinessModel::classify(profit_margin, growth),
        growth,
    }
}

/// Segment every company with a reported 2023 revenue and roll the
/// segments up.
pub fn segment_companies(records: &RecordSet) -> ComputationOutput<SegmentationOutput> {
    let companies: Vec<CompanySegment> = records
        .with_revenue_in(SEGMENT_YEAR)
        .map(segment_company)
        .collect();

    let (size_distribution, specialization_distribution, business_model_distribution) = companies
        .iter()
        .fold(SegmentTotals::default(), SegmentTotals::add)
        .finish();

    let exemplars = |model: BusinessModel| -> Vec<CompanySegment> {
        companies
            .iter()
            .filter(|c| c.business_model == model)
            .take(EXEMPLAR_CAP)
            .cloned()
            .collect()
    };
    let stars = exemplars(BusinessModel::Star);
    let cash_cows = exemplars(BusinessModel::CashCow);

    let mut warnings = Vec::new();
    if companies.is_empty() {
        warnings.push("No company reports 2023 revenue; no segments assigned.".into());
    }

    tracing::debug!(
        analyzed = companies.len(),
        stars = stars.len(),
        cash_cows = cash_cows.len(),
        "segmentation complete"
    );

    let output = SegmentationOutput {
        total_analyzed: companies.len(),
        size_distribution,
        specialization_distribution,
        business_model_distribution,
        stars,
        cash_cows,
        companies,
    };

    let assumptions = json!({
        "segment_year": SEGMENT_YEAR,
        "growth_baseline_year": BASELINE_YEAR,
        "size_ceilings": {
            "MICRO": { "employees": 10, "revenue": 500_000 },
            "MIC": { "employees": 50, "revenue": 5_000_000 },
            "MEDIU": { "employees": 250, "revenue": 50_000_000 },
        },
        "specialization_codes": ["3811", "3812", "3831", "3832", "4677"],
        "quadrant_thresholds": { "profit_margin": 5, "growth": 10 },
        "exemplar_cap": EXEMPLAR_CAP,
    });

    with_metadata(
        "Size cascade, CAEN specialisation and BCG quadrant with segment roll-ups",
        &assumptions,
        warnings,
        output.total_analyzed,
        output,
    )
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
