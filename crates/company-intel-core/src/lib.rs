//! Analytics and scoring engine for a cohort of companies described by
//! twelve years (2013-2024) of annual financial filings.
//!
//! Every component consumes the same immutable [`model::RecordSet`] and
//! returns a self-contained, serialisable result wrapped in a
//! [`types::ComputationOutput`] envelope. Components do not depend on one
//! another and can run in any order.

pub mod arithmetic;
pub mod error;
pub mod model;
pub mod types;

#[cfg(feature = "trends")]
pub mod trends;

#[cfg(feature = "health")]
pub mod health;

#[cfg(feature = "segmentation")]
pub mod segmentation;

#[cfg(feature = "geography")]
pub mod geography;

#[cfg(feature = "forecasting")]
pub mod forecasting;

#[cfg(feature = "fraud_detection")]
pub mod fraud_detection;

#[cfg(feature = "report")]
pub mod report;

pub use error::CompanyIntelError;
pub use model::{CompanyRecord, FinancialYear, RecordSet};
pub use types::*;

/// Standard result type for all company-intel operations
pub type CompanyIntelResult<T> = Result<T, CompanyIntelError>;
