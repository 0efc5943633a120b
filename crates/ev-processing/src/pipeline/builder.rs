//! Main pipeline module.
//!
//! This module provides the `Pipeline` struct and builder that run every
//! [`SessionProcessor`] step in order and optionally persist the results.

use crate::charts::ChartRenderer;
use crate::config::PipelineConfig;
use crate::error::Result;
use crate::pipeline::processor::SessionProcessor;
use crate::pipeline::progress::{
    ClosureProgressReporter, PipelineStage, ProgressReporter, ProgressUpdate,
};
use crate::reporting::ReportGenerator;
use crate::types::PipelineResult;
use polars::prelude::*;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;
use tracing::{error, info};

/// The charging-session cleaning pipeline.
///
/// Use [`Pipeline::builder()`] to create a new pipeline with custom configuration.
///
/// # Example
///
/// ```rust,ignore
/// use ev_processing::{Pipeline, PipelineConfig};
///
/// let result = Pipeline::builder()
///     .config(PipelineConfig::builder().save_to_disk(false).build()?)
///     .on_progress(|update| {
///         println!("[{:.0}%] {}", update.progress * 100.0, update.message);
///     })
///     .build()?
///     .process_file("data/ev_charging.csv")?;
///
/// println!("{} rows left", result.data.height());
/// ```
pub struct Pipeline {
    config: PipelineConfig,
    progress_reporter: Option<Arc<dyn ProgressReporter>>,
    reporter: ReportGenerator,
}

// Ensure Pipeline is Send (can be moved to another thread)
static_assertions::assert_impl_all!(Pipeline: Send);

impl Pipeline {
    /// Create a new pipeline builder.
    pub fn builder() -> PipelineBuilder {
        PipelineBuilder::default()
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Load the CSV at `path` and run every step.
    pub fn process_file(&self, path: impl AsRef<Path>) -> Result<PipelineResult> {
        let path = path.as_ref();
        self.finish(self.run(|processor| {
            processor.load(path)?;
            Ok(())
        }))
    }

    /// Run every step over an already loaded table.
    pub fn process(&self, df: DataFrame) -> Result<PipelineResult> {
        self.finish(self.run(move |processor| {
            processor.set_dataframe(df);
            Ok(())
        }))
    }

    fn finish(&self, result: Result<PipelineResult>) -> Result<PipelineResult> {
        match result {
            Ok(result) => {
                self.report_progress(ProgressUpdate::complete("Pipeline completed successfully"));
                Ok(result)
            }
            Err(e) => {
                self.report_progress(ProgressUpdate::failed(e.to_string()));
                error!("Pipeline error: {}", e);
                Err(e)
            }
        }
    }

    /// Report progress if a reporter is configured.
    fn report_progress(&self, update: ProgressUpdate) {
        if let Some(reporter) = &self.progress_reporter {
            reporter.report(update);
        }
    }

    fn stage<F>(&self, stage: PipelineStage, processor: &mut SessionProcessor, step: F) -> Result<()>
    where
        F: FnOnce(&mut SessionProcessor) -> Result<()>,
    {
        self.report_progress(ProgressUpdate::new(
            stage,
            0.0,
            format!("{}...", stage.display_name()),
        ));
        step(processor)?;
        self.report_progress(ProgressUpdate::new(
            stage,
            1.0,
            format!("{} done", stage.display_name()),
        ));
        Ok(())
    }

    fn run<L>(&self, load: L) -> Result<PipelineResult>
    where
        L: FnOnce(&mut SessionProcessor) -> Result<()>,
    {
        let start_time = Instant::now();
        info!("Starting charging-session pipeline...");

        let mut processor = SessionProcessor::new(self.config.clone());

        self.stage(PipelineStage::Loading, &mut processor, load)?;
        self.stage(PipelineStage::Renaming, &mut processor, |p| {
            p.rename_columns()?.drop_unused_columns()?;
            Ok(())
        })?;
        self.stage(PipelineStage::CategoricalCleaning, &mut processor, |p| {
            p.record_uniques_raw()?
                .clean_categoricals()?
                .record_uniques_clean()?;
            Ok(())
        })?;
        self.stage(PipelineStage::MissingValues, &mut processor, |p| {
            p.handle_missing_and_dropna()?;
            Ok(())
        })?;
        self.stage(PipelineStage::DateTimeParsing, &mut processor, |p| {
            p.process_datetime_columns()?;
            Ok(())
        })?;
        self.stage(PipelineStage::TypeCoercion, &mut processor, |p| {
            p.clean_symbols_and_features()?;
            Ok(())
        })?;
        self.stage(PipelineStage::DuplicateCheck, &mut processor, |p| {
            p.check_duplicates()?;
            Ok(())
        })?;
        self.stage(PipelineStage::OutlierCheck, &mut processor, |p| {
            p.check_outliers()?;
            Ok(())
        })?;

        let (mut data, mut report) = processor.into_parts()?;

        if self.config.save_to_disk {
            let path = self.reporter.write_dataset(&mut data)?;
            report.output_path = Some(path.display().to_string());
        }

        if self.config.generate_charts {
            let charts = ChartRenderer::build_all(&data)?;
            let path = ChartRenderer::write_json(&charts, &self.config.output_dir)?;
            report.charts_path = Some(path.display().to_string());
        }

        report.duration_ms = start_time.elapsed().as_millis() as u64;
        info!(
            "Pipeline finished in {}ms: {} -> {} rows",
            report.duration_ms, report.rows_before, report.rows_after
        );

        Ok(PipelineResult { data, report })
    }
}

/// Builder for creating a [`Pipeline`] with custom configuration.
#[derive(Default)]
pub struct PipelineBuilder {
    config: Option<PipelineConfig>,
    progress_reporter: Option<Arc<dyn ProgressReporter>>,
}

// Ensure PipelineBuilder is Send (can be moved to another thread during construction)
static_assertions::assert_impl_all!(PipelineBuilder: Send);

impl PipelineBuilder {
    /// Set the pipeline configuration.
    pub fn config(mut self, config: PipelineConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Set a progress reporter for receiving updates during processing.
    pub fn progress_reporter(mut self, reporter: Arc<dyn ProgressReporter>) -> Self {
        self.progress_reporter = Some(reporter);
        self
    }

    /// Set a progress callback closure.
    ///
    /// For more complex scenarios, use [`progress_reporter`](Self::progress_reporter).
    pub fn on_progress<F>(mut self, callback: F) -> Self
    where
        F: Fn(ProgressUpdate) + Send + Sync + 'static,
    {
        self.progress_reporter = Some(Arc::new(ClosureProgressReporter::new(callback)));
        self
    }

    /// Build the pipeline.
    ///
    /// Returns an error if the configuration is invalid.
    pub fn build(self) -> std::result::Result<Pipeline, crate::config::ConfigValidationError> {
        let config = self.config.unwrap_or_default();
        config.validate()?;

        let reporter = ReportGenerator::new(config.output_dir.clone(), config.output_name.clone());

        Ok(Pipeline {
            config,
            progress_reporter: self.progress_reporter,
            reporter,
        })
    }
}
