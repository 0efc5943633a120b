//! Data quality diagnostics.
//!
//! This module reports missing values, exact duplicates and IQR outliers.
//! It never removes rows.

mod analyzer;
pub mod outliers;

pub use analyzer::DataQualityAnalyzer;
pub use outliers::{IqrBounds, quantile_linear};
