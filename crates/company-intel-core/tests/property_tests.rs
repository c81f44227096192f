#![cfg(feature = "report")]

use company_intel_core::arithmetic::cagr;
use company_intel_core::fraud_detection::{FraudFlag, HealthStatus};
use company_intel_core::geography::analyze_geography;
use company_intel_core::health::{calculate_health_scores, classify_score, HealthCategory, MAX_SCORE};
use company_intel_core::report::run_full_report;
use company_intel_core::segmentation::{segment_companies, BusinessModel, SizeClass};
use company_intel_core::{CompanyIntelError, CompanyRecord, FinancialYear, RecordSet};
use pretty_assertions::assert_eq;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// A deterministic, varied cohort: growth, losses, counties and staff all
/// differ by index.
fn cohort(size: u32) -> RecordSet {
    let counties = ["ALBA", "CLUJ", "", "TIMIS", "BIHOR"];
    let records = (0..size)
        .map(|i| {
            let base = Decimal::from(10_000 + i * 7_919);
            let step = Decimal::from(i % 7) - dec!(2);
            let mut record = CompanyRecord::new(format!("RO{i:05}"))
                .with_caen(if i % 3 == 0 { "3811,3832" } else { "4677" });
            let judet = counties[(i as usize) % counties.len()];
            if !judet.is_empty() {
                record = record.with_judet(judet);
            }
            for (k, year) in (2019..=2024).enumerate() {
                let k = Decimal::from(k as u32);
                let revenue = (base + base * step * k / dec!(10)).max(Decimal::ZERO);
                let (net_profit, net_loss) = if i % 4 == 0 {
                    (None, Some(revenue / dec!(20)))
                } else {
                    (Some(revenue / dec!(8)), None)
                };
                record = record.with_year(
                    year,
                    FinancialYear {
                        revenue: Some(revenue),
                        net_profit,
                        net_loss,
                        total_income: Some(revenue),
                        debt: Some(revenue * Decimal::from(i % 5) / dec!(4)),
                        receivables: Some(revenue / dec!(3)),
                        equity: Some(revenue / dec!(2) - Decimal::from(i % 3) * base),
                        employees: Some(i % 60),
                        ..Default::default()
                    },
                );
            }
            record
        })
        .collect();
    RecordSet::new(records).unwrap()
}

#[test]
fn test_cagr_properties() {
    for x in [dec!(1), dec!(250_000), dec!(9_999_999)] {
        for n in 1..=10 {
            assert_eq!(cagr(x, x, n), Decimal::ZERO);
        }
        assert_eq!(cagr(Decimal::ZERO, x, 4), Decimal::ZERO);
        assert_eq!(cagr(-x, x, 4), Decimal::ZERO);
    }
}

#[test]
fn test_health_scores_bounded() {
    assert_eq!(MAX_SCORE, 100);
    let out = calculate_health_scores(&cohort(200)).result;
    assert!(out.companies.iter().all(|c| c.score <= 100));
    let categorized: usize = out.categories.values().sum();
    assert_eq!(categorized, out.total_analyzed);
}

#[test]
fn test_categories_partition_scores() {
    let rank = |c: HealthCategory| match c {
        HealthCategory::RiscInalt => 0,
        HealthCategory::Slab => 1,
        HealthCategory::Moderat => 2,
        HealthCategory::Bun => 3,
        HealthCategory::Excelent => 4,
    };
    let mut previous = rank(classify_score(0));
    for score in 1..=100 {
        let current = rank(classify_score(score));
        assert!(current >= previous, "category decreased at {score}");
        previous = current;
    }
    assert_eq!(classify_score(19), HealthCategory::RiscInalt);
    assert_eq!(classify_score(20), HealthCategory::Slab);
    assert_eq!(classify_score(80), HealthCategory::Excelent);
}

#[test]
fn test_size_and_quadrant_exhaustive() {
    let revenues = [
        dec!(0),
        dec!(499_999),
        dec!(500_000),
        dec!(4_999_999),
        dec!(5_000_000),
        dec!(49_999_999),
        dec!(50_000_000),
        dec!(60_000_000),
    ];
    for employees in [0, 9, 10, 49, 50, 249, 250, 10_000] {
        for revenue in revenues {
            let micro = employees < 10 && revenue < dec!(500_000);
            let mic = employees < 50 && revenue < dec!(5_000_000);
            let mediu = employees < 250 && revenue < dec!(50_000_000);
            let expected = if micro {
                SizeClass::Micro
            } else if mic {
                SizeClass::Mic
            } else if mediu {
                SizeClass::Mediu
            } else {
                SizeClass::Mare
            };
            assert_eq!(
                SizeClass::classify(employees, revenue),
                expected,
                "employees {employees} revenue {revenue}"
            );
        }
    }
    assert_eq!(SizeClass::classify(9, dec!(499_999)), SizeClass::Micro);
    assert_eq!(SizeClass::classify(9, dec!(500_000)), SizeClass::Mic);
    assert_eq!(SizeClass::classify(250, Decimal::ZERO), SizeClass::Mare);

    let axis = [dec!(-50), dec!(0), dec!(5), dec!(5.01), dec!(10), dec!(10.01), dec!(300)];
    for margin in axis {
        for growth in axis {
            let model = BusinessModel::classify(margin, growth);
            let expected = match (margin > dec!(5), growth > dec!(10)) {
                (true, true) => BusinessModel::Star,
                (true, false) => BusinessModel::CashCow,
                (false, true) => BusinessModel::QuestionMark,
                (false, false) => BusinessModel::Dog,
            };
            assert_eq!(model, expected, "margin {margin} growth {growth}");
        }
    }
}

#[test]
fn test_county_counts_sum_to_companies_with_county() {
    let set = cohort(137);
    let with_county = set
        .records()
        .iter()
        .filter(|r| r.judet.as_deref().is_some_and(|j| !j.trim().is_empty()))
        .count();
    let out = analyze_geography(&set).result;
    let counted: usize = out.county_stats.iter().map(|c| c.num_companies).sum();
    assert_eq!(counted, with_county);
    assert!(out.top_counties.len() <= 20);
}

#[test]
fn test_fraud_status_boundaries_and_monotonic_score() {
    assert_eq!(HealthStatus::from_score(40), HealthStatus::Warning);
    assert_eq!(HealthStatus::from_score(75), HealthStatus::Critical);

    let mut running = 0u32;
    for flag in FraudFlag::ALL {
        let next = running + flag.points();
        assert!(next > running);
        running = next;
    }
}

#[test]
fn test_segmentation_totals_match() {
    let out = segment_companies(&cohort(90)).result;
    let sized: usize = out.size_distribution.values().map(|s| s.count).sum();
    let modelled: usize = out.business_model_distribution.values().map(|s| s.count).sum();
    assert_eq!(sized, out.total_analyzed);
    assert_eq!(modelled, out.total_analyzed);
    assert!(out.stars.len() <= 20);
    assert!(out.stars.iter().all(|s| s.business_model == BusinessModel::Star));
}

#[test]
fn test_full_report_is_deterministic() {
    let set = cohort(300);
    let first = serde_json::to_vec(&run_full_report(&set, None)).unwrap();
    let second = serde_json::to_vec(&run_full_report(&set, None)).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_ranked_lists_respect_caps() {
    let out = run_full_report(&cohort(400), None).result;
    assert!(out.trends.fastest_growth.len() <= 50);
    assert!(out.trends.covid_winners.len() <= 30);
    assert!(out.financial_health.top_50.len() <= 50);
    assert!(out.timeseries.predictions_2025.len() <= 100);
    assert!(out.timeseries.anomalies.len() <= 50);
    let scores: Vec<u32> = out.fraud.companies.iter().map(|c| c.risk_score).collect();
    assert!(scores.windows(2).all(|w| w[0] >= w[1]));
}

#[test]
fn test_duplicate_cif_rejected() {
    let err = RecordSet::new(vec![CompanyRecord::new("X"), CompanyRecord::new("X")]).unwrap_err();
    assert!(matches!(err, CompanyIntelError::InvalidInput { .. }));
}

#[test]
fn test_record_set_from_json() {
    let json = r#"[
        {"cif": "RO1", "name": "Eco SRL", "judet": "CLUJ",
         "years": {"2023": {"revenue": "1000", "employees": 3}}}
    ]"#;
    let set: RecordSet = serde_json::from_str(json).unwrap();
    assert_eq!(set.len(), 1);
    assert_eq!(set.records()[0].revenue(2023), Some(dec!(1000)));

    let out_of_range = r#"[{"cif": "RO1", "years": {"2030": {}}}]"#;
    assert!(serde_json::from_str::<RecordSet>(out_of_range).is_err());
}
