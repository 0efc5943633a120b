//! Pipeline module.
//!
//! [`SessionProcessor`] holds the table and runs individual cleaning steps;
//! [`Pipeline`] drives every step in order with progress reporting and
//! writes the outputs.

mod builder;
pub mod processor;
pub mod progress;

pub use builder::{Pipeline, PipelineBuilder};
pub use processor::SessionProcessor;
pub use progress::{ClosureProgressReporter, PipelineStage, ProgressReporter, ProgressUpdate};
