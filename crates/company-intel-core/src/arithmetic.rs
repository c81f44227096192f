//! Safe-division, growth-rate and summary-statistic helpers shared by every
//! scorer. Nothing in here fails: undefined operations return a default.

use std::cmp::Ordering;

use rust_decimal::Decimal;
use rust_decimal::MathematicalOps;
use rust_decimal_macros::dec;

use crate::types::{Money, Percent};

const HUNDRED: Decimal = dec!(100);

/// `numerator / denominator`, or `default` when the denominator is zero.
pub fn safe_div(numerator: Decimal, denominator: Decimal, default: Decimal) -> Decimal {
    if denominator.is_zero() {
        return default;
    }
    numerator.checked_div(denominator).unwrap_or(default)
}

/// `numerator / denominator × 100`, zero when the denominator is zero.
/// Saturates at `±Decimal::MAX` when the ratio is too large to scale.
pub fn percent_of(numerator: Decimal, denominator: Decimal) -> Percent {
    let ratio = safe_div(numerator, denominator, Decimal::ZERO);
    ratio.checked_mul(HUNDRED).unwrap_or(if ratio.is_sign_negative() {
        Decimal::MIN
    } else {
        Decimal::MAX
    })
}

/// Relative change `(new − old) / old × 100`, zero when `old` is zero.
pub fn pct_change(old: Decimal, new: Decimal) -> Percent {
    percent_of(new - old, old)
}

/// Compound annual growth rate in percent.
///
/// Returns zero unless both values are strictly positive and `years > 0`.
pub fn cagr(start: Money, end: Money, years: u32) -> Percent {
    if start <= Decimal::ZERO || end <= Decimal::ZERO || years == 0 {
        return Decimal::ZERO;
    }
    if start == end {
        return Decimal::ZERO;
    }
    let ratio = safe_div(end, start, Decimal::ONE);
    let exponent = Decimal::ONE / Decimal::from(years);
    match ratio.checked_powd(exponent) {
        Some(growth) => percent_of(growth - Decimal::ONE, Decimal::ONE),
        None => Decimal::ZERO,
    }
}

pub fn mean(values: &[Decimal]) -> Decimal {
    if values.is_empty() {
        return Decimal::ZERO;
    }
    let n = Decimal::from(values.len() as u64);
    checked_sum(values.iter().copied())
        .map(|total| total / n)
        .or_else(|| checked_sum(values.iter().map(|&v| v / n)))
        .unwrap_or(if values[0].is_sign_negative() {
            Decimal::MIN
        } else {
            Decimal::MAX
        })
}

fn checked_sum(values: impl Iterator<Item = Decimal>) -> Option<Decimal> {
    values.fold(Some(Decimal::ZERO), |acc, v| acc?.checked_add(v))
}

/// Median; the average of the two middle values for an even count.
pub fn median(values: &[Decimal]) -> Decimal {
    let n = values.len();
    if n == 0 {
        return Decimal::ZERO;
    }
    let mut sorted = values.to_vec();
    sorted.sort();
    if n % 2 == 1 {
        sorted[n / 2]
    } else {
        let (lo, hi) = (sorted[n / 2 - 1], sorted[n / 2]);
        lo.checked_add(hi)
            .map(|total| total / dec!(2))
            // only reachable with both halves of one sign, so hi - lo fits
            .unwrap_or_else(|| lo + (hi - lo) / dec!(2))
    }
}

/// Sample standard deviation (n − 1). `None` below two samples, or when
/// the deviation itself exceeds the `Decimal` range.
///
/// Values too large to square are rescaled by the largest magnitude first,
/// so extreme outliers still produce a dispersion instead of overflowing.
pub fn sample_std_dev(values: &[Decimal]) -> Option<Decimal> {
    if values.len() < 2 {
        return None;
    }
    variance_std_dev(values).or_else(|| {
        let scale = values.iter().map(|v| v.abs()).max()?;
        if scale.is_zero() {
            return Some(Decimal::ZERO);
        }
        let scaled: Vec<Decimal> = values.iter().map(|&v| v / scale).collect();
        variance_std_dev(&scaled)?.checked_mul(scale)
    })
}

fn variance_std_dev(values: &[Decimal]) -> Option<Decimal> {
    let m = mean(values);
    let squares = values.iter().map(|&v| {
        let d = v.checked_sub(m)?;
        d.checked_mul(d)
    });
    let total = squares.fold(Some(Decimal::ZERO), |acc, sq| acc?.checked_add(sq?))?;
    (total / Decimal::from((values.len() - 1) as u64)).sqrt()
}

// ---------------------------------------------------------------------------
// Deterministic ranking
// ---------------------------------------------------------------------------

/// Anything that belongs to a single company and can be tie-broken by CIF.
pub trait CompanyKeyed {
    fn cif(&self) -> &str;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Ascending,
    Descending,
}

/// Sort in place by `key` in the given order, ties by ascending CIF.
pub fn sort_ranked<T: CompanyKeyed>(
    items: &mut [T],
    key: impl Fn(&T) -> Decimal,
    order: SortOrder,
) {
    items.sort_by(|a, b| {
        let primary = match order {
            SortOrder::Ascending => key(a).cmp(&key(b)),
            SortOrder::Descending => key(b).cmp(&key(a)),
        };
        match primary {
            Ordering::Equal => a.cif().cmp(b.cif()),
            other => other,
        }
    });
}

/// The first `n` items after [`sort_ranked`], leaving the input untouched.
pub fn rank_top<T: CompanyKeyed + Clone>(
    items: &[T],
    n: usize,
    key: impl Fn(&T) -> Decimal,
    order: SortOrder,
) -> Vec<T> {
    let mut ranked = items.to_vec();
    sort_ranked(&mut ranked, key, order);
    ranked.truncate(n);
    ranked
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
