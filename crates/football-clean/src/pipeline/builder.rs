//! Reusable cleaning pipeline and its builder.

use crate::config::{CleaningConfig, ConfigValidationError};
use crate::error::Result;
use crate::pipeline::progress::{
    ClosureProgressReporter, CleaningStage, ProgressReporter, ProgressUpdate,
};
use crate::pipeline::session::{CleaningResult, CleaningSession};
use polars::prelude::*;
use std::sync::Arc;
use tracing::error;

/// A configured cleaning run that can be applied to many tables.
///
/// Use [`CleaningPipeline::builder()`] to create a pipeline.
///
/// # Example
///
/// ```rust,ignore
/// use football_clean::{CleaningConfig, CleaningPipeline};
///
/// let result = CleaningPipeline::builder()
///     .config(CleaningConfig::builder().sample_rows(5).build()?)
///     .on_progress(|update| {
///         println!("[{:.0}%] {}", update.progress * 100.0, update.message);
///     })
///     .build()?
///     .process(dataframe)?;
/// ```
pub struct CleaningPipeline {
    config: CleaningConfig,
    progress_reporter: Option<Arc<dyn ProgressReporter>>,
}

// Must be movable to a worker thread
static_assertions::assert_impl_all!(CleaningPipeline: Send);

impl CleaningPipeline {
    /// Create a new pipeline builder.
    pub fn builder() -> CleaningPipelineBuilder {
        CleaningPipelineBuilder::default()
    }

    pub fn config(&self) -> &CleaningConfig {
        &self.config
    }

    /// Run the full cleaning process on a table.
    pub fn process(&self, df: DataFrame) -> Result<CleaningResult> {
        match self.process_internal(df) {
            Ok(result) => {
                self.report_progress(ProgressUpdate::complete(format!(
                    "Cleaned {} rows",
                    result.data.height()
                )));
                Ok(result)
            }
            Err(e) => {
                self.report_progress(ProgressUpdate::failed(e.to_string()));
                error!("Cleaning failed: {}", e);
                Err(e)
            }
        }
    }

    fn report_progress(&self, update: ProgressUpdate) {
        if let Some(reporter) = &self.progress_reporter {
            reporter.report(update);
        }
    }

    fn process_internal(&self, df: DataFrame) -> Result<CleaningResult> {
        self.report_progress(ProgressUpdate::new(
            CleaningStage::Initializing,
            0.0,
            format!("Validating {} rows x {} columns", df.height(), df.width()),
        ));
        let session = CleaningSession::with_config(df, self.config.clone())?;
        session.run_with(&|update| self.report_progress(update))
    }
}

/// Builder for [`CleaningPipeline`].
#[derive(Default)]
pub struct CleaningPipelineBuilder {
    config: Option<CleaningConfig>,
    progress_reporter: Option<Arc<dyn ProgressReporter>>,
}

static_assertions::assert_impl_all!(CleaningPipelineBuilder: Send);

impl CleaningPipelineBuilder {
    /// Set the cleaning configuration.
    pub fn config(mut self, config: CleaningConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Set a custom progress reporter.
    pub fn progress_reporter(mut self, reporter: Arc<dyn ProgressReporter>) -> Self {
        self.progress_reporter = Some(reporter);
        self
    }

    /// Set a progress callback closure.
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
    pub fn build(self) -> std::result::Result<CleaningPipeline, ConfigValidationError> {
        let config = self.config.unwrap_or_default();
        config.validate()?;

        Ok(CleaningPipeline {
            config,
            progress_reporter: self.progress_reporter,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    fn matches() -> DataFrame {
        df![
            "date" => ["2022-12-18", "2022-12-14"],
            "home_team" => ["Argentina", "Argentina"],
            "away_team" => ["France", "Croatia"],
            "home_score" => [Some("3"), None],
            "away_score" => ["3", "0"],
            "tournament" => ["FIFA World Cup", ""],
            "city" => ["Lusail", "Lusail"],
            "country" => ["Qatar", "Qatar"],
            "neutral" => ["TRUE", "TRUE"],
        ]
        .unwrap()
    }

    #[test]
    fn test_pipeline_builder_default() {
        let pipeline = CleaningPipeline::builder().build().unwrap();
        assert_eq!(pipeline.config().sample_rows, 10);
        assert!(pipeline.progress_reporter.is_none());
    }

    #[test]
    fn test_pipeline_builder_rejects_invalid_config() {
        let mut config = CleaningConfig::default();
        config.neutral_default = "maybe".to_string();
        assert!(CleaningPipeline::builder().config(config).build().is_err());
    }

    #[test]
    fn test_pipeline_reports_stages_in_order() {
        let stages = Arc::new(Mutex::new(Vec::new()));
        let stages_clone = stages.clone();

        let pipeline = CleaningPipeline::builder()
            .on_progress(move |update| {
                stages_clone.lock().unwrap().push(update.stage);
            })
            .build()
            .unwrap();

        let result = pipeline.process(matches()).unwrap();
        assert_eq!(result.data.height(), 2);

        // remediation and normalization also report their completion
        let mut stages = stages.lock().unwrap().clone();
        assert_eq!(stages.len(), 9);
        stages.dedup();
        assert_eq!(
            stages,
            vec![
                CleaningStage::Initializing,
                CleaningStage::Auditing,
                CleaningStage::Remediating,
                CleaningStage::Normalizing,
                CleaningStage::Summarizing,
                CleaningStage::Verifying,
                CleaningStage::Complete,
            ]
        );
    }

    #[test]
    fn test_pipeline_reports_failure() {
        let stages = Arc::new(Mutex::new(Vec::new()));
        let stages_clone = stages.clone();

        let pipeline = CleaningPipeline::builder()
            .on_progress(move |update| {
                stages_clone.lock().unwrap().push(update.stage);
            })
            .build()
            .unwrap();

        let df = matches().drop("neutral").unwrap();
        let err = pipeline.process(df).unwrap_err();
        assert_eq!(err.error_code(), "COLUMN_NOT_FOUND");
        assert_eq!(stages.lock().unwrap().last(), Some(&CleaningStage::Failed));
    }

    #[test]
    fn test_pipeline_runs_on_worker_thread() {
        let pipeline = CleaningPipeline::builder().build().unwrap();
        let handle = std::thread::spawn(move || pipeline.process(matches()).map(|r| r.data.height()));
        assert_eq!(handle.join().unwrap().unwrap(), 2);
    }
}
