//! Report types produced by the charging-session pipeline.
//!
//! Everything here is serde-serializable so the CLI can emit the whole
//! [`CleaningReport`] as JSON.

use crate::quality::IqrBounds;
use polars::prelude::DataFrame;
use serde::{Deserialize, Serialize};

// ============================================================================
// Categorical cleaning
// ============================================================================

/// Unique values of one column, in order of first appearance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UniqueValueListing {
    pub column: String,
    /// `None` stands for a missing cell.
    pub values: Vec<Option<String>>,
}

impl UniqueValueListing {
    /// Number of distinct non-missing values.
    pub fn present_count(&self) -> usize {
        self.values.iter().filter(|v| v.is_some()).count()
    }

    /// Whether the listing contains a missing marker.
    pub fn has_missing(&self) -> bool {
        self.values.iter().any(|v| v.is_none())
    }
}

/// Outcome of cleaning one categorical column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoricalCleaningStats {
    pub column: String,
    /// Present values whose text changed.
    pub values_changed: usize,
    /// Present values that became missing (the `unknown` sentinel, `nan`, blanks).
    pub values_made_missing: usize,
    /// Missing cells after cleaning.
    pub missing_after: usize,
    /// Distinct values with no canonical label, in sorted order.
    pub unrecognized: Vec<String>,
}

impl CategoricalCleaningStats {
    pub fn new(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            values_changed: 0,
            values_made_missing: 0,
            missing_after: 0,
            unrecognized: Vec::new(),
        }
    }
}

// ============================================================================
// Diagnostics
// ============================================================================

/// Missing-cell count of one column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnMissing {
    pub column: String,
    pub missing: usize,
}

/// Missing-value diagnostics taken right before the row drop.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MissingValueReport {
    pub total_rows: usize,
    /// Per-column counts, in column order.
    pub columns: Vec<ColumnMissing>,
    /// Key columns that were present and checked.
    pub key_columns_checked: Vec<String>,
    /// Rows where every checked key column is missing.
    pub all_key_missing_rows: usize,
    pub all_key_missing_percentage: f64,
}

impl MissingValueReport {
    /// Sum of missing cells over all columns.
    pub fn total_missing(&self) -> usize {
        self.columns.iter().map(|c| c.missing).sum()
    }

    /// Columns with at least one missing cell.
    pub fn columns_with_missing(&self) -> Vec<&ColumnMissing> {
        self.columns.iter().filter(|c| c.missing > 0).collect()
    }

    /// Missing count of a single column.
    pub fn missing_in(&self, column: &str) -> Option<usize> {
        self.columns
            .iter()
            .find(|c| c.column == column)
            .map(|c| c.missing)
    }
}

/// Exact-duplicate rows, counted with every member of a group kept.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DuplicateReport {
    pub total_rows: usize,
    /// Rows that have at least one identical twin.
    pub duplicate_rows: usize,
    /// Distinct groups of identical rows.
    pub duplicate_groups: usize,
}

impl DuplicateReport {
    pub fn duplicate_percentage(&self) -> f64 {
        if self.total_rows == 0 {
            0.0
        } else {
            (self.duplicate_rows as f64 / self.total_rows as f64) * 100.0
        }
    }
}

/// IQR outlier count of one numeric column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnOutliers {
    pub column: String,
    pub outlier_count: usize,
    /// Non-null values examined.
    pub values_checked: usize,
    /// Absent for a column with no values.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bounds: Option<IqrBounds>,
}

/// IQR outlier counts over every numeric column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutlierReport {
    pub iqr_multiplier: f64,
    pub columns: Vec<ColumnOutliers>,
}

impl OutlierReport {
    pub fn total_outliers(&self) -> usize {
        self.columns.iter().map(|c| c.outlier_count).sum()
    }

    pub fn get(&self, column: &str) -> Option<&ColumnOutliers> {
        self.columns.iter().find(|c| c.column == column)
    }
}

/// Name and data type of one column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnDtype {
    pub column: String,
    pub dtype: String,
    /// Coarse category: numeric, datetime, string, binary or other.
    pub category: String,
}

// ============================================================================
// Audit trail
// ============================================================================

/// A single action taken during processing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessingAction {
    pub action_type: ActionType,
    /// Column name, or "dataset".
    pub target: String,
    pub description: String,
}

impl ProcessingAction {
    pub fn new(
        action_type: ActionType,
        target: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            action_type,
            target: target.into(),
            description: description.into(),
        }
    }
}

/// Types of actions that can be taken during processing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionType {
    ColumnRenamed,
    ColumnRemoved,
    ValueCleaned,
    RowsRemoved,
    TypeCorrected,
    FeatureDerived,
}

impl ActionType {
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::ColumnRenamed => "Column Renamed",
            Self::ColumnRemoved => "Column Removed",
            Self::ValueCleaned => "Value Cleaned",
            Self::RowsRemoved => "Rows Removed",
            Self::TypeCorrected => "Type Corrected",
            Self::FeatureDerived => "Feature Derived",
        }
    }
}

// ============================================================================
// Run report
// ============================================================================

/// Everything the pipeline learned while cleaning one file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CleaningReport {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub input_path: Option<String>,

    pub rows_before: usize,
    pub columns_before: usize,
    pub rows_after: usize,
    pub columns_after: usize,

    /// Categorical listings before cleaning.
    pub unique_before: Vec<UniqueValueListing>,
    /// Categorical listings after cleaning.
    pub unique_after: Vec<UniqueValueListing>,
    pub categorical_stats: Vec<CategoricalCleaningStats>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub missing: Option<MissingValueReport>,
    pub rows_dropped: usize,

    pub dtypes: Vec<ColumnDtype>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub duplicates: Option<DuplicateReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub outliers: Option<OutlierReport>,

    pub processing_steps: Vec<String>,
    pub actions: Vec<ProcessingAction>,

    pub duration_ms: u64,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub charts_path: Option<String>,
}

impl CleaningReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_step(&mut self, step: impl Into<String>) {
        self.processing_steps.push(step.into());
    }

    pub fn add_action(&mut self, action: ProcessingAction) {
        self.actions.push(action);
    }

    /// Percentage of input rows removed by the missing-row drop.
    pub fn rows_dropped_percentage(&self) -> f64 {
        if self.rows_before == 0 {
            0.0
        } else {
            (self.rows_dropped as f64 / self.rows_before as f64) * 100.0
        }
    }

    /// Unrecognized categorical values across all columns, as (column, value).
    pub fn unrecognized_values(&self) -> Vec<(&str, &str)> {
        self.categorical_stats
            .iter()
            .flat_map(|stats| {
                stats
                    .unrecognized
                    .iter()
                    .map(move |value| (stats.column.as_str(), value.as_str()))
            })
            .collect()
    }
}

/// Cleaned table plus the report describing how it was produced.
#[derive(Debug, Clone)]
pub struct PipelineResult {
    pub data: DataFrame,
    pub report: CleaningReport,
}

// ============================================================================
// Tests
// ============================================================================
