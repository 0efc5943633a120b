//! Step-by-step driver over one in-memory session table.
//!
//! [`SessionProcessor`] owns the table and the accumulating
//! [`CleaningReport`]. Each step mutates the table in place and records what
//! it did. Steps must run in the order they are declared here; categorical
//! cleaning in particular has to precede the missing-row drop because it can
//! introduce new missing cells.

use crate::cleaner::{CategoricalNormalizer, DataCleaner, TypeCoercer, dtype_listing, unique_values};
use crate::config::PipelineConfig;
use crate::error::{PreprocessingError, Result};
use crate::loader;
use crate::quality::DataQualityAnalyzer;
use crate::schema::CATEGORICAL_COLUMNS;
use crate::types::{ActionType, CleaningReport, ProcessingAction, UniqueValueListing};
use polars::prelude::*;
use std::path::Path;
use tracing::{debug, info, warn};

/// Owns the session table while it moves through the cleaning steps.
///
/// ```rust,ignore
/// let mut processor = SessionProcessor::new(PipelineConfig::default());
/// processor
///     .load("sessions.csv")?
///     .rename_columns()?
///     .drop_unused_columns()?
///     .clean_categoricals()?;
/// let (df, report) = processor.into_parts()?;
/// ```
#[derive(Debug)]
pub struct SessionProcessor {
    config: PipelineConfig,
    df: Option<DataFrame>,
    report: CleaningReport,
}

impl SessionProcessor {
    /// Create a processor with no table loaded.
    pub fn new(config: PipelineConfig) -> Self {
        Self {
            config,
            df: None,
            report: CleaningReport::new(),
        }
    }

    /// Create a processor over an already loaded table.
    pub fn with_dataframe(config: PipelineConfig, df: DataFrame) -> Self {
        let mut processor = Self::new(config);
        processor.set_dataframe(df);
        processor
    }

    /// Take ownership of an already loaded table, replacing any held one.
    pub fn set_dataframe(&mut self, df: DataFrame) -> &mut Self {
        self.report.rows_before = df.height();
        self.report.columns_before = df.width();
        self.report.add_step(format!(
            "Loaded {} rows x {} columns",
            df.height(),
            df.width()
        ));
        self.df = Some(df);
        self
    }

    fn frame(&self) -> Result<&DataFrame> {
        self.df.as_ref().ok_or(PreprocessingError::NoDataLoaded)
    }

    fn frame_mut(&mut self) -> Result<&mut DataFrame> {
        self.df.as_mut().ok_or(PreprocessingError::NoDataLoaded)
    }

    /// Read the sessions CSV at `path`, replacing any table already held.
    pub fn load(&mut self, path: impl AsRef<Path>) -> Result<&mut Self> {
        let path = path.as_ref();
        let df = loader::load_sessions_csv(path)?;
        self.report.input_path = Some(path.display().to_string());
        Ok(self.set_dataframe(df))
    }

    /// Apply the fixed header rename table.
    pub fn rename_columns(&mut self) -> Result<&mut Self> {
        let renamed = loader::rename_columns(self.frame_mut()?)?;

        self.report.add_step(format!("Renamed {renamed} columns to internal names"));
        if renamed > 0 {
            self.report.add_action(ProcessingAction::new(
                ActionType::ColumnRenamed,
                "dataset",
                format!("Renamed {renamed} source headers"),
            ));
        }
        Ok(self)
    }

    /// Drop the configured unused columns (`UserId` by default).
    pub fn drop_unused_columns(&mut self) -> Result<&mut Self> {
        let names = self.config.drop_columns.clone();
        let dropped = loader::drop_columns(self.frame_mut()?, &names)?;

        for column in &dropped {
            self.report.add_action(ProcessingAction::new(
                ActionType::ColumnRemoved,
                column.clone(),
                "Dropped unused column",
            ));
        }
        if !dropped.is_empty() {
            self.report.add_step(format!("Dropped columns: {}", dropped.join(", ")));
        }
        Ok(self)
    }

    fn categorical_listings(&self) -> Result<Vec<UniqueValueListing>> {
        let df = self.frame()?;
        CATEGORICAL_COLUMNS
            .iter()
            .map(|column| unique_values(df, column))
            .collect()
    }

    fn log_listings(label: &str, listings: &[UniqueValueListing]) {
        for listing in listings {
            info!(
                "Unique values in '{}' ({}): {:?}",
                listing.column, label, listing.values
            );
        }
    }

    /// Record the categorical unique-value listings before cleaning.
    pub fn record_uniques_raw(&mut self) -> Result<&mut Self> {
        self.frame()?;
        if !self.config.record_unique_values {
            return Ok(self);
        }

        let listings = self.categorical_listings()?;
        Self::log_listings("raw", &listings);
        self.report.unique_before = listings;
        Ok(self)
    }

    /// Normalize the six categorical columns.
    pub fn clean_categoricals(&mut self) -> Result<&mut Self> {
        let stats = CategoricalNormalizer.clean_all(self.frame_mut()?)?;

        for column_stats in &stats {
            if column_stats.values_changed > 0 || column_stats.values_made_missing > 0 {
                self.report.add_action(ProcessingAction::new(
                    ActionType::ValueCleaned,
                    column_stats.column.clone(),
                    format!(
                        "Normalized {} values, {} became missing",
                        column_stats.values_changed, column_stats.values_made_missing
                    ),
                ));
            }
        }
        self.report
            .add_step(format!("Cleaned {} categorical columns", stats.len()));
        self.report.categorical_stats = stats;
        Ok(self)
    }

    /// Record the categorical unique-value listings after cleaning.
    pub fn record_uniques_clean(&mut self) -> Result<&mut Self> {
        self.frame()?;
        if !self.config.record_unique_values {
            return Ok(self);
        }

        let listings = self.categorical_listings()?;
        Self::log_listings("clean", &listings);
        self.report.unique_after = listings;
        Ok(self)
    }

    /// Report missing values, then drop every row that has any.
    pub fn handle_missing_and_dropna(&mut self) -> Result<&mut Self> {
        let missing = DataQualityAnalyzer::missing_report(self.frame()?)?;
        info!(
            "Missing values: {} cells across {} columns",
            missing.total_missing(),
            missing.columns_with_missing().len()
        );
        info!(
            "Rows with all key columns missing: {} ({:.2}%)",
            missing.all_key_missing_rows, missing.all_key_missing_percentage
        );

        let df = self.df.take().ok_or(PreprocessingError::NoDataLoaded)?;
        let (df, removed) = DataCleaner.drop_incomplete_rows(df)?;
        self.df = Some(df);

        self.report.rows_dropped = removed;
        self.report.missing = Some(missing);
        self.report
            .add_step(format!("Dropped {removed} rows with missing values"));
        if removed > 0 {
            self.report.add_action(ProcessingAction::new(
                ActionType::RowsRemoved,
                "dataset",
                format!("Removed {removed} rows with at least one missing value"),
            ));
        }
        Ok(self)
    }

    /// Split the start and end instants into date and time columns.
    pub fn process_datetime_columns(&mut self) -> Result<&mut Self> {
        let steps = TypeCoercer.process_datetime_columns(self.frame_mut()?)?;

        for step in steps {
            self.report.add_action(ProcessingAction::new(
                ActionType::TypeCorrected,
                "dataset",
                step.clone(),
            ));
            self.report.add_step(step);
        }
        Ok(self)
    }

    /// Strip formatting symbols, cast measures and derive the two features.
    pub fn clean_symbols_and_features(&mut self) -> Result<&mut Self> {
        let steps = TypeCoercer.clean_symbols_and_features(self.frame_mut()?)?;
        let dtypes = dtype_listing(self.frame()?);

        for entry in &dtypes {
            debug!("  {}: {}", entry.column, entry.dtype);
        }

        self.report.add_action(ProcessingAction::new(
            ActionType::FeatureDerived,
            "dataset",
            "Added ChargeDifference% and ChargingDurationMinutes",
        ));
        for step in steps {
            self.report.add_step(step);
        }
        self.report.dtypes = dtypes;
        Ok(self)
    }

    /// Count exact duplicate rows. Nothing is removed.
    pub fn check_duplicates(&mut self) -> Result<&mut Self> {
        let duplicates = DataQualityAnalyzer::duplicate_report(self.frame()?)?;

        if duplicates.duplicate_rows > 0 {
            warn!(
                "Found {} duplicate rows in {} groups",
                duplicates.duplicate_rows, duplicates.duplicate_groups
            );
        } else {
            info!("No duplicate rows found");
        }
        self.report.add_step(format!(
            "Checked duplicates: {} rows",
            duplicates.duplicate_rows
        ));
        self.report.duplicates = Some(duplicates);
        Ok(self)
    }

    /// Count IQR outliers per numeric column. Nothing is removed.
    pub fn check_outliers(&mut self) -> Result<&mut Self> {
        let outliers =
            DataQualityAnalyzer::outlier_report(self.frame()?, self.config.iqr_multiplier)?;

        for column in outliers.columns.iter().filter(|c| c.outlier_count > 0) {
            info!("Outliers in '{}': {}", column.column, column.outlier_count);
        }
        self.report.add_step(format!(
            "Checked outliers: {} values across {} numeric columns",
            outliers.total_outliers(),
            outliers.columns.len()
        ));
        self.report.outliers = Some(outliers);
        Ok(self)
    }

    /// The table in its current state.
    pub fn dataframe(&self) -> Result<&DataFrame> {
        self.frame()
    }

    /// The report accumulated so far.
    pub fn report(&self) -> &CleaningReport {
        &self.report
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Hand over the table and the report, with the final shape filled in.
    pub fn into_parts(self) -> Result<(DataFrame, CleaningReport)> {
        let df = self.df.ok_or(PreprocessingError::NoDataLoaded)?;
        let mut report = self.report;
        report.rows_after = df.height();
        report.columns_after = df.width();
        Ok((df, report))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn raw_frame() -> DataFrame {
        df![
            "user id" => ["User_1", "User_2", "User_3"],
            "VehicleModel" => [Some("Tesla Model"), Some("nissan lea#"), None],
            "Charging StationLocation" => ["Houston", "new yor", "Chicago"],
            "TimeofDay" => ["Mornin", "Evening", "Night"],
            "DayofWeek" => ["Monda", "Tuesday", "Unknown"],
            "ChargerType" => ["DC Fast Charge", "Level 2", "Level 1"],
            "UserType" => ["Commute", "Long-Distance Travele", "Casual Driver"],
        ]
        .unwrap()
    }

    #[test]
    fn test_steps_before_load_fail() {
        let mut processor = SessionProcessor::new(PipelineConfig::default());

        let err = processor.rename_columns().unwrap_err();
        assert!(err.is_precondition());
        assert!(processor.clean_categoricals().unwrap_err().is_precondition());
        assert!(processor.record_uniques_raw().unwrap_err().is_precondition());
        assert!(processor.handle_missing_and_dropna().unwrap_err().is_precondition());
        assert!(processor.process_datetime_columns().unwrap_err().is_precondition());
        assert!(processor.check_duplicates().unwrap_err().is_precondition());
        assert!(processor.check_outliers().unwrap_err().is_precondition());
        assert!(processor.dataframe().unwrap_err().is_precondition());
    }

    #[test]
    fn test_into_parts_without_table() {
        let processor = SessionProcessor::new(PipelineConfig::default());
        let err = processor.into_parts().unwrap_err();
        assert_eq!(err.error_code(), "NO_DATA_LOADED");
    }

    #[test]
    fn test_rename_drop_and_clean() {
        let mut processor = SessionProcessor::with_dataframe(PipelineConfig::default(), raw_frame());
        processor
            .rename_columns()
            .unwrap()
            .drop_unused_columns()
            .unwrap()
            .record_uniques_raw()
            .unwrap()
            .clean_categoricals()
            .unwrap()
            .record_uniques_clean()
            .unwrap();

        let df = processor.dataframe().unwrap();
        assert!(df.column("UserId").is_err());

        let report = processor.report();
        assert_eq!(report.unique_before.len(), 6);
        assert_eq!(report.unique_after.len(), 6);

        let days = &report.unique_after[3];
        assert_eq!(days.column, "DayOfWeek");
        assert_eq!(
            days.values,
            vec![Some("Monday".to_string()), Some("Tuesday".to_string()), None]
        );
        assert_eq!(
            report.unrecognized_values(),
            vec![
                ("ChargingStationLocation", "houston"),
                ("UserType", "casual driver"),
            ]
        );
    }

    #[test]
    fn test_cleaning_happens_before_row_drop() {
        let mut processor = SessionProcessor::with_dataframe(PipelineConfig::default(), raw_frame());
        processor
            .rename_columns()
            .unwrap()
            .clean_categoricals()
            .unwrap()
            .handle_missing_and_dropna()
            .unwrap();

        // Row 3 lacks a vehicle model and its day became missing during cleaning
        let report = processor.report();
        assert_eq!(report.rows_dropped, 1);
        let missing = report.missing.as_ref().unwrap();
        assert_eq!(missing.missing_in("DayOfWeek"), Some(1));

        let (df, report) = processor.into_parts().unwrap();
        assert_eq!(df.height(), 2);
        assert_eq!(report.rows_before, 3);
        assert_eq!(report.rows_after, 2);
    }

    #[test]
    fn test_unique_listings_can_be_disabled() {
        let config = PipelineConfig::builder()
            .record_unique_values(false)
            .build()
            .unwrap();
        let mut processor = SessionProcessor::with_dataframe(config, raw_frame());
        processor
            .rename_columns()
            .unwrap()
            .record_uniques_raw()
            .unwrap();
        assert!(processor.report().unique_before.is_empty());
    }
}
