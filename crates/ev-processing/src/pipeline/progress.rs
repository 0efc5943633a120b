//! Progress reporting for the session pipeline.
//!
//! Updates are delivered synchronously on the thread running the pipeline,
//! once at the start and once at the end of every stage.
//!
//! # Example
//!
//! ```rust,ignore
//! use ev_processing::Pipeline;
//!
//! let result = Pipeline::builder()
//!     .on_progress(|update| {
//!         println!("[{:.0}%] {}", update.progress * 100.0, update.message);
//!     })
//!     .build()?
//!     .process_file("sessions.csv")?;
//! ```

use serde::{Deserialize, Serialize};

/// Stages of the session pipeline, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PipelineStage {
    /// Reading the CSV
    Loading,
    /// Renaming headers and dropping unused columns
    Renaming,
    /// Normalizing the six categorical columns
    CategoricalCleaning,
    /// Missing-value report and row drop
    MissingValues,
    /// Splitting start/end instants into date and time
    DateTimeParsing,
    /// Stripping symbols, casting measures, deriving features
    TypeCoercion,
    /// Counting exact duplicates
    DuplicateCheck,
    /// Counting IQR outliers
    OutlierCheck,
    /// Pipeline completed successfully
    Complete,
    /// Pipeline failed with an error
    Failed,
}

impl PipelineStage {
    /// Returns a human-readable name for the stage.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Loading => "Loading Data",
            Self::Renaming => "Renaming Columns",
            Self::CategoricalCleaning => "Cleaning Categories",
            Self::MissingValues => "Handling Missing Values",
            Self::DateTimeParsing => "Parsing Dates and Times",
            Self::TypeCoercion => "Coercing Types",
            Self::DuplicateCheck => "Checking Duplicates",
            Self::OutlierCheck => "Checking Outliers",
            Self::Complete => "Complete",
            Self::Failed => "Failed",
        }
    }

    /// Returns the typical weight of this stage in the overall pipeline (0.0 - 1.0).
    pub fn weight(&self) -> f32 {
        match self {
            Self::Loading => 0.15,
            Self::Renaming => 0.05,
            Self::CategoricalCleaning => 0.25,
            Self::MissingValues => 0.10,
            Self::DateTimeParsing => 0.15,
            Self::TypeCoercion => 0.15,
            Self::DuplicateCheck => 0.05,
            Self::OutlierCheck => 0.10,
            Self::Complete => 0.0,
            Self::Failed => 0.0,
        }
    }

    /// Returns the cumulative progress at the start of this stage.
    pub fn base_progress(&self) -> f32 {
        match self {
            Self::Loading => 0.0,
            Self::Renaming => 0.15,
            Self::CategoricalCleaning => 0.20,
            Self::MissingValues => 0.45,
            Self::DateTimeParsing => 0.55,
            Self::TypeCoercion => 0.70,
            Self::DuplicateCheck => 0.85,
            Self::OutlierCheck => 0.90,
            Self::Complete => 1.0,
            Self::Failed => 0.0,
        }
    }
}

/// Progress update emitted by the pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgressUpdate {
    pub stage: PipelineStage,

    /// Overall progress (0.0 - 1.0)
    pub progress: f32,

    /// Progress within current stage (0.0 - 1.0)
    pub stage_progress: f32,

    pub message: String,
}

impl ProgressUpdate {
    pub fn new(stage: PipelineStage, stage_progress: f32, message: impl Into<String>) -> Self {
        let progress = stage.base_progress() + (stage.weight() * stage_progress);
        Self {
            stage,
            progress: progress.clamp(0.0, 1.0),
            stage_progress: stage_progress.clamp(0.0, 1.0),
            message: message.into(),
        }
    }

    pub fn complete(message: impl Into<String>) -> Self {
        Self {
            stage: PipelineStage::Complete,
            progress: 1.0,
            stage_progress: 1.0,
            message: message.into(),
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            stage: PipelineStage::Failed,
            progress: 0.0,
            stage_progress: 0.0,
            message: message.into(),
        }
    }
}

/// Trait for receiving progress updates from the pipeline.
///
/// Implementations must be `Send + Sync` so a built pipeline can be moved
/// to a worker thread.
pub trait ProgressReporter: Send + Sync {
    fn report(&self, update: ProgressUpdate);
}

/// Wrapper that implements [`ProgressReporter`] using a closure.
pub struct ClosureProgressReporter<F>
where
    F: Fn(ProgressUpdate) + Send + Sync,
{
    callback: F,
}

impl<F> ClosureProgressReporter<F>
where
    F: Fn(ProgressUpdate) + Send + Sync,
{
    pub fn new(callback: F) -> Self {
        Self { callback }
    }
}

impl<F> ProgressReporter for ClosureProgressReporter<F>
where
    F: Fn(ProgressUpdate) + Send + Sync,
{
    fn report(&self, update: ProgressUpdate) {
        (self.callback)(update);
    }
}

static_assertions::assert_impl_all!(ProgressUpdate: Send, Sync);
