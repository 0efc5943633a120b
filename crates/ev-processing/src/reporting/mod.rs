//! Output writing.
//!
//! [`ReportGenerator`] saves the cleaned session table as CSV and the
//! [`CleaningReport`](crate::types::CleaningReport) as pretty JSON, both
//! into the configured output directory.
//!
//! # Example
//!
//! ```rust,ignore
//! use ev_processing::reporting::ReportGenerator;
//!
//! let generator = ReportGenerator::new(PathBuf::from("outputs"), None);
//! let csv_path = generator.write_dataset(&mut result.data)?;
//! let report_path = generator.write_report_to_file(&result.report, "sessions")?;
//! ```

mod generator;

pub use generator::{ReportGenerator, RunReport};
