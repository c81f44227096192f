//! Canonical per-company, per-year financial fact table.
//!
//! A [`CompanyRecord`] holds identity fields plus a sparse map of
//! [`FinancialYear`] entries keyed by the filing year. Any figure may be
//! absent; the engine treats an absent figure as zero unless a component
//! states otherwise.

use std::collections::{BTreeMap, HashSet};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::CompanyIntelError;
use crate::types::Money;
use crate::CompanyIntelResult;

/// First filing year covered by the dataset.
pub const FIRST_YEAR: i32 = 2013;
/// Last filing year covered by the dataset.
pub const LAST_YEAR: i32 = 2024;

// ---------------------------------------------------------------------------
// Financial year
// ---------------------------------------------------------------------------

/// Monetary fields of a filing. Closed set, so lookups are checked at
/// compile time instead of going through field-name strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Revenue,
    GrossProfit,
    GrossLoss,
    NetProfit,
    NetLoss,
    TotalIncome,
    TotalExpense,
    Debt,
    Receivables,
    Equity,
    FixedAssets,
}

/// One annual filing. Every figure is optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FinancialYear {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub revenue: Option<Money>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gross_profit: Option<Money>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gross_loss: Option<Money>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub net_profit: Option<Money>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub net_loss: Option<Money>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_income: Option<Money>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_expense: Option<Money>,
    /// Datorii
    #[serde(skip_serializing_if = "Option::is_none")]
    pub debt: Option<Money>,
    /// Creanțe
    #[serde(skip_serializing_if = "Option::is_none")]
    pub receivables: Option<Money>,
    /// Capitaluri totale. The only figure that is legitimately negative.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub equity: Option<Money>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fixed_assets: Option<Money>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub employees: Option<u32>,
}

impl FinancialYear {
    pub fn get(&self, field: Field) -> Option<Money> {
        match field {
            Field::Revenue => self.revenue,
            Field::GrossProfit => self.gross_profit,
            Field::GrossLoss => self.gross_loss,
            Field::NetProfit => self.net_profit,
            Field::NetLoss => self.net_loss,
            Field::TotalIncome => self.total_income,
            Field::TotalExpense => self.total_expense,
            Field::Debt => self.debt,
            Field::Receivables => self.receivables,
            Field::Equity => self.equity,
            Field::FixedAssets => self.fixed_assets,
        }
    }

    pub fn set(&mut self, field: Field, value: Option<Money>) {
        let slot = match field {
            Field::Revenue => &mut self.revenue,
            Field::GrossProfit => &mut self.gross_profit,
            Field::GrossLoss => &mut self.gross_loss,
            Field::NetProfit => &mut self.net_profit,
            Field::NetLoss => &mut self.net_loss,
            Field::TotalIncome => &mut self.total_income,
            Field::TotalExpense => &mut self.total_expense,
            Field::Debt => &mut self.debt,
            Field::Receivables => &mut self.receivables,
            Field::Equity => &mut self.equity,
            Field::FixedAssets => &mut self.fixed_assets,
        };
        *slot = value;
    }

    pub fn is_empty(&self) -> bool {
        *self == FinancialYear::default()
    }
}

// ---------------------------------------------------------------------------
// Company record
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompanyRecord {
    pub cif: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// One or more CAEN activity codes, comma separated.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub caen: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub judet: Option<String>,
    #[serde(default)]
    pub years: BTreeMap<i32, FinancialYear>,
}

impl CompanyRecord {
    pub fn new(cif: impl Into<String>) -> Self {
        CompanyRecord {
            cif: cif.into(),
            name: None,
            caen: None,
            judet: None,
            years: BTreeMap::new(),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_caen(mut self, caen: impl Into<String>) -> Self {
        self.caen = Some(caen.into());
        self
    }

    pub fn with_judet(mut self, judet: impl Into<String>) -> Self {
        self.judet = Some(judet.into());
        self
    }

    pub fn with_year(mut self, year: i32, data: FinancialYear) -> Self {
        self.years.insert(year, data);
        self
    }

    /// Name shown to end users; falls back to `"CIF {cif}"`.
    pub fn display_name(&self) -> String {
        match self.name.as_deref() {
            Some(n) if !n.trim().is_empty() => n.to_string(),
            _ => format!("CIF {}", self.cif),
        }
    }

    /// First listed CAEN code, trimmed. Empty when no code is recorded.
    pub fn main_caen(&self) -> String {
        self.caen
            .as_deref()
            .and_then(|c| c.split(',').next())
            .map(|c| c.trim().to_string())
            .unwrap_or_default()
    }

    pub fn year(&self, year: i32) -> Option<&FinancialYear> {
        self.years.get(&year)
    }

    pub fn amount(&self, year: i32, field: Field) -> Option<Money> {
        self.year(year).and_then(|y| y.get(field))
    }

    pub fn amount_or_zero(&self, year: i32, field: Field) -> Money {
        self.amount(year, field).unwrap_or(Decimal::ZERO)
    }

    pub fn revenue(&self, year: i32) -> Option<Money> {
        self.amount(year, Field::Revenue)
    }

    pub fn revenue_or_zero(&self, year: i32) -> Money {
        self.amount_or_zero(year, Field::Revenue)
    }

    pub fn has_revenue(&self, year: i32) -> bool {
        self.revenue(year).is_some()
    }

    /// `net_profit − net_loss`, both read independently with missing as zero.
    pub fn net_profit(&self, year: i32) -> Money {
        self.amount_or_zero(year, Field::NetProfit) - self.amount_or_zero(year, Field::NetLoss)
    }

    pub fn employees(&self, year: i32) -> Option<u32> {
        self.year(year).and_then(|y| y.employees)
    }

    pub fn employees_or_zero(&self, year: i32) -> u32 {
        self.employees(year).unwrap_or(0)
    }
}

// ---------------------------------------------------------------------------
// Record set
// ---------------------------------------------------------------------------

/// Validated, immutable snapshot of the cohort for one analysis run.
///
/// Guarantees: every `cif` is non-empty and unique, and every year key lies
/// in `[FIRST_YEAR, LAST_YEAR]`. Input order is preserved.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(try_from = "Vec<CompanyRecord>", into = "Vec<CompanyRecord>")]
pub struct RecordSet {
    records: Vec<CompanyRecord>,
}

impl RecordSet {
    pub fn new(records: Vec<CompanyRecord>) -> CompanyIntelResult<Self> {
        let mut seen: HashSet<&str> = HashSet::with_capacity(records.len());
        for (idx, record) in records.iter().enumerate() {
            let cif = record.cif.trim();
            if cif.is_empty() {
                return Err(CompanyIntelError::InvalidInput {
                    field: format!("records[{idx}].cif"),
                    reason: "CIF must not be empty".into(),
                });
            }
            if !seen.insert(cif) {
                return Err(CompanyIntelError::InvalidInput {
                    field: format!("records[{idx}].cif"),
                    reason: format!("Duplicate CIF {cif}"),
                });
            }
            if let Some(year) = record
                .years
                .keys()
                .find(|y| !(FIRST_YEAR..=LAST_YEAR).contains(*y))
            {
                return Err(CompanyIntelError::InvalidInput {
                    field: format!("records[{idx}].years"),
                    reason: format!(
                        "Year {year} for CIF {cif} is outside {FIRST_YEAR}-{LAST_YEAR}"
                    ),
                });
            }
        }
        Ok(RecordSet { records })
    }

    pub fn records(&self) -> &[CompanyRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Fails when the snapshot holds no company at all.
    pub fn ensure_not_empty(&self) -> CompanyIntelResult<()> {
        if self.records.is_empty() {
            return Err(CompanyIntelError::InsufficientData(
                "snapshot contains no companies".into(),
            ));
        }
        Ok(())
    }

    /// Records with a defined revenue figure for `year`, in snapshot order.
    pub fn with_revenue_in(&self, year: i32) -> impl Iterator<Item = &CompanyRecord> {
        self.records.iter().filter(move |r| r.has_revenue(year))
    }
}

impl TryFrom<Vec<CompanyRecord>> for RecordSet {
    type Error = CompanyIntelError;

    fn try_from(records: Vec<CompanyRecord>) -> Result<Self, Self::Error> {
        RecordSet::new(records)
    }
}

impl From<RecordSet> for Vec<CompanyRecord> {
    fn from(set: RecordSet) -> Self {
        set.records
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
