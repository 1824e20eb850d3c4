//! Pipeline module.
//!
//! [`CleaningSession`] runs the stages on one table and owns its original
//! snapshot and working copy; [`CleaningPipeline`] wraps a configuration and
//! progress reporting around full runs.

mod builder;
pub mod progress;
mod session;

pub use builder::{CleaningPipeline, CleaningPipelineBuilder};
pub use progress::{CleaningStage, ClosureProgressReporter, ProgressReporter, ProgressUpdate};
pub use session::{CleaningResult, CleaningSession};
