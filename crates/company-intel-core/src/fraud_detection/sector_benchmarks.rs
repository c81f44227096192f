//! Sector medians (and margin dispersion) over the 2024 filings.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::arithmetic::{median, percent_of, safe_div, sample_std_dev};
use crate::model::{Field, RecordSet};
use crate::types::{Money, Percent};

const BENCHMARK_YEAR: i32 = 2024;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SectorBenchmarks {
    pub profit_margin_median: Percent,
    /// Sample standard deviation; zero with fewer than two samples.
    pub profit_margin_stdev: Percent,
    pub debt_ratio_median: Percent,
    /// Median revenue per employee (RON).
    pub efficiency_median: Money,
    /// Companies with positive 2024 revenue.
    pub companies_sampled: usize,
}

/// Single full scan over every company with positive 2024 revenue.
///
/// Each distribution only takes companies that actually report the
/// underlying figure: margin needs a reported net profit, debt ratio a
/// reported debt, efficiency a positive headcount.
pub fn calculate_sector_benchmarks(records: &RecordSet) -> SectorBenchmarks {
    scan_benchmarks(records).0
}

/// The benchmark scan plus any warnings about figures it could not summarize.
pub(crate) fn scan_benchmarks(records: &RecordSet) -> (SectorBenchmarks, Vec<String>) {
    let mut margins: Vec<Decimal> = Vec::new();
    let mut debt_ratios: Vec<Decimal> = Vec::new();
    let mut efficiencies: Vec<Decimal> = Vec::new();
    let mut sampled = 0usize;

    for record in records.records() {
        let revenue = match record.revenue(BENCHMARK_YEAR) {
            Some(r) if r > Decimal::ZERO => r,
            _ => continue,
        };
        sampled += 1;

        if let Some(profit) = record.amount(BENCHMARK_YEAR, Field::NetProfit) {
            margins.push(percent_of(profit, revenue));
        }
        if let Some(debt) = record.amount(BENCHMARK_YEAR, Field::Debt) {
            debt_ratios.push(percent_of(debt, revenue));
        }
        match record.employees(BENCHMARK_YEAR) {
            Some(staff) if staff > 0 => {
                efficiencies.push(safe_div(revenue, Decimal::from(staff), Decimal::ZERO));
            }
            _ => {}
        }
    }

    tracing::debug!(
        sampled,
        margins = margins.len(),
        debt_ratios = debt_ratios.len(),
        efficiencies = efficiencies.len(),
        "sector benchmarks computed"
    );

    let mut warnings = Vec::new();
    let profit_margin_stdev = match sample_std_dev(&margins) {
        Some(stdev) => stdev,
        None if margins.len() >= 2 => {
            tracing::warn!(margins = margins.len(), "profit margin dispersion out of range");
            warnings.push(
                "Profit margin dispersion exceeds the representable range; reported as zero."
                    .into(),
            );
            Decimal::ZERO
        }
        None => Decimal::ZERO,
    };

    let benchmarks = SectorBenchmarks {
        profit_margin_median: median(&margins),
        profit_margin_stdev,
        debt_ratio_median: median(&debt_ratios),
        efficiency_median: median(&efficiencies),
        companies_sampled: sampled,
    };
    (benchmarks, warnings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{CompanyRecord, FinancialYear};
    use rust_decimal_macros::dec;

    fn filing(
        cif: &str,
        revenue: Decimal,
        profit: Option<Decimal>,
        debt: Option<Decimal>,
        employees: Option<u32>,
    ) -> CompanyRecord {
        CompanyRecord::new(cif).with_year(
            2024,
            FinancialYear {
                revenue: Some(revenue),
                net_profit: profit,
                debt,
                employees,
                ..Default::default()
            },
        )
    }

    #[test]
    fn test_benchmarks() {
        let set = RecordSet::new(vec![
            filing("1", dec!(1000), Some(dec!(100)), Some(dec!(500)), Some(2)),
            filing("2", dec!(2000), Some(dec!(100)), None, Some(0)),
            filing("3", dec!(1000), None, Some(dec!(100)), None),
            filing("4", Decimal::ZERO, Some(dec!(1)), Some(dec!(1)), Some(1)),
        ])
        .unwrap();
        let b = calculate_sector_benchmarks(&set);
        assert_eq!(b.companies_sampled, 3);
        // margins 10%, 5%
        assert_eq!(b.profit_margin_median, dec!(7.5));
        assert!((b.profit_margin_stdev - dec!(3.5355)).abs() < dec!(0.001));
        // debt ratios 50%, 10%
        assert_eq!(b.debt_ratio_median, dec!(30));
        assert_eq!(b.efficiency_median, dec!(500));
    }

    #[test]
    fn test_single_sample_has_zero_stdev() {
        let set = RecordSet::new(vec![filing("1", dec!(10), Some(dec!(1)), None, None)]).unwrap();
        let b = calculate_sector_benchmarks(&set);
        assert_eq!(b.profit_margin_stdev, Decimal::ZERO);
        assert_eq!(b.profit_margin_median, dec!(10));
    }

    #[test]
    fn test_extreme_margin_outlier() {
        // 1e13 profit on 1 RON revenue: a 1e15% margin
        let set = RecordSet::new(vec![
            filing("1", dec!(1), Some(dec!(10_000_000_000_000)), None, None),
            filing("2", dec!(1000), Some(Decimal::ZERO), None, None),
        ])
        .unwrap();
        let (b, warnings) = scan_benchmarks(&set);
        assert!(warnings.is_empty());
        assert_eq!(b.profit_margin_median, dec!(500_000_000_000_000));
        assert!(b.profit_margin_stdev > dec!(700_000_000_000_000));
    }

    #[test]
    fn test_unrepresentable_dispersion_warns() {
        let huge = dec!(10_000_000_000_000_000_000_000_000_000);
        let set = RecordSet::new(vec![
            filing("1", dec!(1), Some(huge), None, None),
            filing("2", dec!(1), Some(-huge), None, None),
        ])
        .unwrap();
        let (b, warnings) = scan_benchmarks(&set);
        assert_eq!(b.profit_margin_stdev, Decimal::ZERO);
        assert_eq!(warnings.len(), 1);
    }

    #[test]
    fn test_empty_cohort() {
        let b = calculate_sector_benchmarks(&RecordSet::default());
        assert_eq!(b, SectorBenchmarks::default());
    }
}
