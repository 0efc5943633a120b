//! Custom error types for the charging-session pipeline.
//!
//! Every failure in the pipeline is fatal for the run: errors propagate to the
//! caller unrecovered. Errors are serializable so the CLI can embed them in a
//! JSON report.

use serde::Serialize;
use serde::ser::SerializeStruct;
use thiserror::Error;

/// The main error type for the processing pipeline.
#[derive(Error, Debug)]
pub enum PreprocessingError {
    /// A pipeline step was invoked before a table was loaded.
    #[error("DataFrame not loaded. Call load() first")]
    NoDataLoaded,

    /// Column was not found in the dataset.
    #[error("Column '{0}' not found in dataset")]
    ColumnNotFound(String),

    /// A cell could not be parsed into its target type.
    #[error("Failed to parse column '{column}' at row {row} (value {value:?}): {reason}")]
    ParseFailed {
        column: String,
        row: usize,
        value: String,
        reason: String,
    },

    /// Type conversion of a whole column failed.
    #[error("Failed to convert column '{column}' to {target_type}: {reason}")]
    TypeConversionFailed {
        column: String,
        target_type: String,
        reason: String,
    },

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Polars error wrapper.
    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error with context.
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<PreprocessingError>,
    },
}

impl PreprocessingError {
    /// Add context to an error.
    pub fn with_context(self, context: impl Into<String>) -> Self {
        PreprocessingError::WithContext {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// Shorthand for a cell-level parse failure.
    pub fn parse_failed(
        column: impl Into<String>,
        row: usize,
        value: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        PreprocessingError::ParseFailed {
            column: column.into(),
            row,
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Stable error code for machine-readable output.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::NoDataLoaded => "NO_DATA_LOADED",
            Self::ColumnNotFound(_) => "COLUMN_NOT_FOUND",
            Self::ParseFailed { .. } => "PARSE_FAILED",
            Self::TypeConversionFailed { .. } => "TYPE_CONVERSION_FAILED",
            Self::Io(_) => "IO_ERROR",
            Self::Polars(_) => "POLARS_ERROR",
            Self::Json(_) => "JSON_ERROR",
            Self::WithContext { source, .. } => source.error_code(),
        }
    }

    /// Check if this error is a precondition failure (no table loaded).
    pub fn is_precondition(&self) -> bool {
        match self {
            Self::NoDataLoaded => true,
            Self::WithContext { source, .. } => source.is_precondition(),
            _ => false,
        }
    }

    /// Check if this error came from malformed cell text.
    pub fn is_parse_error(&self) -> bool {
        match self {
            Self::ParseFailed { .. } | Self::TypeConversionFailed { .. } => true,
            Self::WithContext { source, .. } => source.is_parse_error(),
            _ => false,
        }
    }
}

/// Errors are serialized as a struct with `code` and `message` fields.
impl Serialize for PreprocessingError {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let mut state = serializer.serialize_struct("PreprocessingError", 2)?;
        state.serialize_field("code", &self.error_code())?;
        state.serialize_field("message", &self.to_string())?;
        state.end()
    }
}

/// Result type alias for pipeline operations.
pub type Result<T> = std::result::Result<T, PreprocessingError>;

/// Extension trait for adding context to Results.
pub trait ResultExt<T> {
    /// Add context to an error result.
    fn context(self, context: impl Into<String>) -> Result<T>;
}

impl<T> ResultExt<T> for Result<T> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.with_context(context))
    }
}

impl<T> ResultExt<T> for std::result::Result<T, polars::error::PolarsError> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| PreprocessingError::Polars(e).with_context(context))
    }
}
