//! EV Charging-Session Cleaning Library
//!
//! Cleans raw EV charging-session CSV exports into an analysis-ready table,
//! built with Rust and Polars.
//!
//! # Overview
//!
//! - **Categorical normalization**: six free-text category columns are
//!   trimmed, lowercased, de-noised and mapped onto fixed canonical labels
//! - **Missing values**: per-column report, then every incomplete row is dropped
//! - **Type coercion**: start/end instants split into `Date` + `Time`, unit
//!   symbols stripped, measures cast to `Float64`, two derived features added
//! - **Diagnostics**: exact-duplicate count and IQR outlier counts
//!   (nothing is removed by either)
//! - **Charts**: chart-ready aggregated datasets written as JSON
//! - **Progress Reporting**: per-stage updates through a callback
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use ev_processing::{Pipeline, PipelineConfig};
//!
//! let config = PipelineConfig::builder()
//!     .output_dir("outputs")
//!     .generate_charts(true)
//!     .build()?;
//!
//! let result = Pipeline::builder()
//!     .config(config)
//!     .on_progress(|update| {
//!         println!("[{:.0}%] {}", update.progress * 100.0, update.message);
//!     })
//!     .build()?
//!     .process_file("data/ev_charging_patterns.csv")?;
//!
//! println!("{} rows kept", result.data.height());
//! println!("{} duplicates", result.report.duplicates.map_or(0, |d| d.duplicate_rows));
//! ```
//!
//! # Step-by-step use
//!
//! [`SessionProcessor`] exposes each cleaning step individually. Steps
//! called before a table is loaded fail with
//! [`PreprocessingError::NoDataLoaded`].
//!
//! ```rust,ignore
//! use ev_processing::{PipelineConfig, SessionProcessor};
//!
//! let mut processor = SessionProcessor::new(PipelineConfig::default());
//! processor
//!     .load("sessions.csv")?
//!     .rename_columns()?
//!     .drop_unused_columns()?
//!     .clean_categoricals()?;
//! ```

pub mod charts;
pub mod cleaner;
pub mod config;
pub mod error;
pub mod loader;
pub mod pipeline;
pub mod quality;
pub mod reporting;
pub mod schema;
pub mod types;
pub mod utils;

// Re-exports for convenient access
pub use charts::{Chart, ChartKind, ChartRenderer, DataPoint, DataSeries};
pub use cleaner::{CategoricalNormalizer, CategoryRules, DataCleaner, TypeCoercer};
pub use config::{ConfigValidationError, PipelineConfig, PipelineConfigBuilder};
pub use error::{PreprocessingError, Result as PreprocessingResult, ResultExt};
pub use pipeline::{
    ClosureProgressReporter, Pipeline, PipelineBuilder, PipelineStage, ProgressReporter,
    ProgressUpdate, SessionProcessor,
};
pub use quality::{DataQualityAnalyzer, IqrBounds};
pub use reporting::{ReportGenerator, RunReport};
pub use types::{
    ActionType, CategoricalCleaningStats, CleaningReport, ColumnDtype, DuplicateReport,
    MissingValueReport, OutlierReport, PipelineResult, ProcessingAction, UniqueValueListing,
};
