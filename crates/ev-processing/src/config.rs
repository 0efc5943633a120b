//! Configuration types for the charging-session pipeline.
//!
//! This module provides run options using the builder pattern. The column
//! contract itself (rename table, categorical rule tables) is fixed and lives
//! in [`crate::schema`] and [`crate::cleaner::categorical`].

use crate::schema::DEFAULT_DROPPED_COLUMNS;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Default multiplier applied to the interquartile range for outlier bounds.
pub const DEFAULT_IQR_MULTIPLIER: f64 = 1.5;

/// File stem used for outputs when no output name is configured.
pub const DEFAULT_OUTPUT_STEM: &str = "cleaned_sessions";

/// Configuration for the processing pipeline.
///
/// Use [`PipelineConfig::builder()`] to create a new configuration
/// with fluent API.
///
/// # Example
///
/// ```rust,ignore
/// use ev_processing::config::PipelineConfig;
///
/// let config = PipelineConfig::builder()
///     .iqr_multiplier(3.0)
///     .save_to_disk(false)
///     .build()?;
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Columns removed right after renaming.
    /// Default: ["UserId"]
    pub drop_columns: Vec<String>,

    /// Multiplier applied to the IQR when computing outlier bounds.
    /// Default: 1.5
    pub iqr_multiplier: f64,

    /// Whether to record unique-value listings of the categorical columns
    /// before and after cleaning.
    /// Default: true
    pub record_unique_values: bool,

    /// Output directory for the cleaned table, reports and chart datasets.
    /// Default: "outputs"
    pub output_dir: PathBuf,

    /// Custom output file name (without extension).
    /// If None, uses "cleaned_sessions".
    /// Default: None
    pub output_name: Option<String>,

    /// Whether to write the cleaned table to disk.
    /// Default: true
    pub save_to_disk: bool,

    /// Whether to build chart datasets from the cleaned table.
    /// Default: false
    pub generate_charts: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            drop_columns: DEFAULT_DROPPED_COLUMNS.iter().map(|s| s.to_string()).collect(),
            iqr_multiplier: DEFAULT_IQR_MULTIPLIER,
            record_unique_values: true,
            output_dir: PathBuf::from("outputs"),
            output_name: None,
            save_to_disk: true,
            generate_charts: false,
        }
    }
}

impl PipelineConfig {
    /// Create a new configuration builder.
    pub fn builder() -> PipelineConfigBuilder {
        PipelineConfigBuilder::default()
    }

    /// Validate the configuration and return errors if invalid.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if !self.iqr_multiplier.is_finite() || self.iqr_multiplier <= 0.0 {
            return Err(ConfigValidationError::InvalidIqrMultiplier(
                self.iqr_multiplier,
            ));
        }

        if let Some(name) = &self.output_name {
            if name.trim().is_empty() {
                return Err(ConfigValidationError::EmptyOutputName);
            }
        }

        Ok(())
    }
}

/// Errors that can occur during configuration validation.
#[derive(Debug, thiserror::Error)]
pub enum ConfigValidationError {
    #[error("Invalid IQR multiplier: {0} (must be a positive finite number)")]
    InvalidIqrMultiplier(f64),

    #[error("Output name must not be empty")]
    EmptyOutputName,
}

/// Builder for [`PipelineConfig`] with fluent API.
#[derive(Debug, Default)]
pub struct PipelineConfigBuilder {
    drop_columns: Option<Vec<String>>,
    iqr_multiplier: Option<f64>,
    record_unique_values: Option<bool>,
    output_dir: Option<PathBuf>,
    output_name: Option<String>,
    save_to_disk: Option<bool>,
    generate_charts: Option<bool>,
}

impl PipelineConfigBuilder {
    /// Set the columns dropped after renaming.
    ///
    /// Names that are not present in the table are ignored.
    pub fn drop_columns<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.drop_columns = Some(columns.into_iter().map(Into::into).collect());
        self
    }

    /// Set the multiplier applied to the IQR for outlier bounds.
    pub fn iqr_multiplier(mut self, multiplier: f64) -> Self {
        self.iqr_multiplier = Some(multiplier);
        self
    }

    /// Enable or disable the before/after unique-value listings.
    pub fn record_unique_values(mut self, record: bool) -> Self {
        self.record_unique_values = Some(record);
        self
    }

    /// Set the output directory.
    pub fn output_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.output_dir = Some(path.into());
        self
    }

    /// Set a custom output file name (without extension).
    pub fn output_name(mut self, name: impl Into<String>) -> Self {
        self.output_name = Some(name.into());
        self
    }

    /// Enable or disable writing the cleaned table to disk.
    ///
    /// When false, results are kept in memory only.
    pub fn save_to_disk(mut self, save: bool) -> Self {
        self.save_to_disk = Some(save);
        self
    }

    /// Enable or disable chart dataset generation.
    pub fn generate_charts(mut self, generate: bool) -> Self {
        self.generate_charts = Some(generate);
        self
    }

    /// Build the configuration.
    ///
    /// Returns a validated `PipelineConfig` or an error if validation fails.
    pub fn build(self) -> Result<PipelineConfig, ConfigValidationError> {
        let defaults = PipelineConfig::default();
        let config = PipelineConfig {
            drop_columns: self.drop_columns.unwrap_or(defaults.drop_columns),
            iqr_multiplier: self.iqr_multiplier.unwrap_or(defaults.iqr_multiplier),
            record_unique_values: self
                .record_unique_values
                .unwrap_or(defaults.record_unique_values),
            output_dir: self.output_dir.unwrap_or(defaults.output_dir),
            output_name: self.output_name,
            save_to_disk: self.save_to_disk.unwrap_or(defaults.save_to_disk),
            generate_charts: self.generate_charts.unwrap_or(defaults.generate_charts),
        };

        config.validate()?;
        Ok(config)
    }
}
