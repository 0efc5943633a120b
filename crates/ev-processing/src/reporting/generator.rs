use crate::config::DEFAULT_OUTPUT_STEM;
use crate::error::Result;
use crate::types::CleaningReport;
use chrono::Local;
use polars::prelude::*;
use serde::Serialize;
use std::fs::{self, File};
use std::io::Write;
use std::path::PathBuf;
use tracing::info;

/// A cleaning report stamped with the time it was produced.
///
/// This is the shape written by `--emit-report` and printed by `--json`.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport<'a> {
    /// Local timestamp, `YYYY-MM-DD HH:MM:SS`
    pub generated_at: String,
    #[serde(flatten)]
    pub report: &'a CleaningReport,
}

impl<'a> RunReport<'a> {
    pub fn new(report: &'a CleaningReport) -> Self {
        Self {
            generated_at: Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
            report,
        }
    }
}

/// Writes pipeline outputs into one directory.
#[derive(Debug, Clone)]
pub struct ReportGenerator {
    output_dir: PathBuf,
    output_name: Option<String>,
}

impl Default for ReportGenerator {
    fn default() -> Self {
        Self::new(PathBuf::from("outputs"), None)
    }
}

impl ReportGenerator {
    pub fn new(output_dir: PathBuf, output_name: Option<String>) -> Self {
        Self {
            output_dir,
            output_name,
        }
    }

    pub fn output_dir(&self) -> &PathBuf {
        &self.output_dir
    }

    fn stem(&self) -> &str {
        self.output_name.as_deref().unwrap_or(DEFAULT_OUTPUT_STEM)
    }

    /// Save the cleaned table as `<stem>.csv` and return its path.
    ///
    /// Dates are written as `YYYY-MM-DD` and times as `HH:MM:SS`.
    pub fn write_dataset(&self, df: &mut DataFrame) -> Result<PathBuf> {
        fs::create_dir_all(&self.output_dir)?;
        let output_path = self.output_dir.join(format!("{}.csv", self.stem()));
        let mut file = File::create(&output_path)?;

        CsvWriter::new(&mut file)
            .include_header(true)
            .with_separator(b',')
            .with_quote_char(b'"')
            .with_date_format(Some("%Y-%m-%d".to_string()))
            .with_time_format(Some("%H:%M:%S".to_string()))
            .finish(df)?;

        info!("Dataset saved: {}", output_path.display());
        Ok(output_path)
    }

    /// Write the report as `<base_name>_report.json`.
    pub fn write_report_to_file(
        &self,
        report: &CleaningReport,
        report_base_name: &str,
    ) -> Result<PathBuf> {
        fs::create_dir_all(&self.output_dir)?;

        let report_path = self
            .output_dir
            .join(format!("{}_report.json", report_base_name));
        let mut file = File::create(&report_path)?;
        let envelope = RunReport::new(report);
        file.write_all(serde_json::to_string_pretty(&envelope)?.as_bytes())?;

        info!("Report saved: {}", report_path.display());
        Ok(report_path)
    }
}
