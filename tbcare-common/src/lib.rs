//! # TB Care Common Library
//!
//! Shared contract between the screening engine and its enclosing
//! collaborators (intake form, upload handler, result view):
//! - Patient record and screening report types
//! - Common error type
//! - Configuration loading

pub mod config;
pub mod error;
pub mod types;

pub use config::EngineConfig;
pub use error::{Error, Result};
pub use types::{PatientRecord, RiskClassification, ScreeningReport, Sex};
