//! Closed classification taxonomies: size class, activity specialisation
//! and BCG-style business model. Each is a first-match-wins cascade.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::types::{Money, Percent};

// ---------------------------------------------------------------------------
// Size class
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum SizeClass {
    #[serde(rename = "MICRO")]
    Micro,
    #[serde(rename = "MIC")]
    Mic,
    #[serde(rename = "MEDIU")]
    Mediu,
    #[serde(rename = "MARE")]
    Mare,
}

/// `(class, employee ceiling, revenue ceiling)`, both bounds exclusive,
/// checked in order.
const SIZE_CEILINGS: [(SizeClass, u32, Decimal); 3] = [
    (SizeClass::Micro, 10, dec!(500_000)),
    (SizeClass::Mic, 50, dec!(5_000_000)),
    (SizeClass::Mediu, 250, dec!(50_000_000)),
];

impl SizeClass {
    /// First class whose employee and revenue ceilings are both respected;
    /// [`SizeClass::Mare`] otherwise.
    pub fn classify(employees: u32, revenue: Money) -> SizeClass {
        SIZE_CEILINGS
            .iter()
            .find(|(_, max_staff, max_revenue)| employees < *max_staff && revenue < *max_revenue)
            .map(|(class, _, _)| *class)
            .unwrap_or(SizeClass::Mare)
    }

    pub fn label(&self) -> &'static str {
        match self {
            SizeClass::Micro => "MICRO",
            SizeClass::Mic => "MIC",
            SizeClass::Mediu => "MEDIU",
            SizeClass::Mare => "MARE",
        }
    }
}

// ---------------------------------------------------------------------------
// Specialisation
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Specialization {
    #[serde(rename = "Colectare deșeuri nepericuloase")]
    NonHazardousWasteCollection,
    #[serde(rename = "Colectare deșeuri periculoase")]
    HazardousWasteCollection,
    #[serde(rename = "Demontare epave")]
    VehicleDismantling,
    #[serde(rename = "Recuperare materiale")]
    MaterialRecovery,
    #[serde(rename = "Comerț deșeuri metalice")]
    MetalScrapTrade,
    #[serde(rename = "Altele")]
    Other,
}

/// CAEN code fragments in priority order.
const SPECIALIZATION_CODES: [(&str, Specialization); 5] = [
    ("3811", Specialization::NonHazardousWasteCollection),
    ("3812", Specialization::HazardousWasteCollection),
    ("3831", Specialization::VehicleDismantling),
    ("3832", Specialization::MaterialRecovery),
    ("4677", Specialization::MetalScrapTrade),
];

impl Specialization {
    /// Substring match against the full CAEN string (all listed codes).
    pub fn from_caen(caen: &str) -> Specialization {
        SPECIALIZATION_CODES
            .iter()
            .find(|(code, _)| caen.contains(code))
            .map(|(_, spec)| *spec)
            .unwrap_or(Specialization::Other)
    }

    pub fn label(&self) -> &'static str {
        match self {
            Specialization::NonHazardousWasteCollection => "Colectare deșeuri nepericuloase",
            Specialization::HazardousWasteCollection => "Colectare deșeuri periculoase",
            Specialization::VehicleDismantling => "Demontare epave",
            Specialization::MaterialRecovery => "Recuperare materiale",
            Specialization::MetalScrapTrade => "Comerț deșeuri metalice",
            Specialization::Other => "Altele",
        }
    }
}

// ---------------------------------------------------------------------------
// Business model (BCG quadrant)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum BusinessModel {
    #[serde(rename = "STAR")]
    Star,
    #[serde(rename = "CASH COW")]
    CashCow,
    #[serde(rename = "QUESTION MARK")]
    QuestionMark,
    #[serde(rename = "DOG")]
    Dog,
}

const MARGIN_THRESHOLD: Decimal = dec!(5);
const GROWTH_THRESHOLD: Decimal = dec!(10);

impl BusinessModel {
    /// Quadrant from profit margin and three-year growth, both in percent.
    /// Total over the plane: each axis splits at a single strict threshold.
    pub fn classify(profit_margin: Percent, growth: Percent) -> BusinessModel {
        match (profit_margin > MARGIN_THRESHOLD, growth > GROWTH_THRESHOLD) {
            (true, true) => BusinessModel::Star,
            (true, false) => BusinessModel::CashCow,
            (false, true) => BusinessModel::QuestionMark,
            (false, false) => BusinessModel::Dog,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            BusinessModel::Star => "STAR",
            BusinessModel::CashCow => "CASH COW",
            BusinessModel::QuestionMark => "QUESTION MARK",
            BusinessModel::Dog => "DOG",
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
