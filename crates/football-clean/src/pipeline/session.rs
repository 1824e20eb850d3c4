//! Cleaning session: the original snapshot plus the working table.

use crate::auditor::{MissingValueAuditor, MissingValueReport};
use crate::config::CleaningConfig;
use crate::error::{CleaningError, Result};
use crate::normalizer::TypeNormalizer;
use crate::pipeline::progress::{CleaningStage, ProgressUpdate};
use crate::remediator::MissingValueRemediator;
use crate::reporting::{self, CleaningReport, CleaningSummary};
use crate::schema::conform;
use crate::types::{NormalizationOutcome, RemediationOutcome};
use polars::prelude::*;
use std::path::Path;
use std::time::Instant;
use tracing::{debug, error, info};

/// Cleaned table and the report of the run that produced it.
#[derive(Debug)]
pub struct CleaningResult {
    pub data: DataFrame,
    pub report: CleaningReport,
}

/// A cleaning session over one match table.
///
/// The session keeps an immutable snapshot of the validated input next to
/// the working table the stages mutate. Every stage preserves the row count
/// and the column set of the snapshot.
///
/// # Example
///
/// ```rust,ignore
/// use football_clean::CleaningSession;
///
/// let mut session = CleaningSession::new(df)?;
/// println!("{}", session.audit_report()?);
/// session.remediate()?;
/// session.normalize_types()?;
/// println!("{}", session.summary()?);
/// let cleaned = session.into_data();
/// ```
#[derive(Debug)]
pub struct CleaningSession {
    original: DataFrame,
    working: DataFrame,
    config: CleaningConfig,
    remediated: bool,
}

impl CleaningSession {
    /// Start a session with the default configuration.
    pub fn new(df: DataFrame) -> Result<Self> {
        Self::with_config(df, CleaningConfig::default())
    }

    /// Start a session, validating the configuration and the input schema.
    pub fn with_config(df: DataFrame, config: CleaningConfig) -> Result<Self> {
        config
            .validate()
            .map_err(|e| CleaningError::InvalidConfig(e.to_string()))?;
        let df = conform(df)?;
        info!(
            "Cleaning session started: {} rows x {} columns",
            df.height(),
            df.width()
        );

        Ok(Self {
            original: df.clone(),
            working: df,
            config,
            remediated: false,
        })
    }

    /// The validated input, as captured when the session started.
    pub fn original(&self) -> &DataFrame {
        &self.original
    }

    /// The working table in its current state.
    pub fn data(&self) -> &DataFrame {
        &self.working
    }

    pub fn config(&self) -> &CleaningConfig {
        &self.config
    }

    /// Audit storage-level nulls of the working table.
    pub fn audit_report(&self) -> Result<MissingValueReport> {
        let auditor = MissingValueAuditor::new(self.config.sample_rows);
        Ok(auditor.audit(&self.working)?)
    }

    /// Audit the working table and log the rendered report at `debug`.
    ///
    /// The caller decides whether the report is shown to the user.
    pub fn display_missing_data_report(&self) -> Result<MissingValueReport> {
        let report = self.audit_report()?;
        info!(
            "Audit: {} missing values in {} rows",
            report.total_missing(),
            report.rows_with_any_missing
        );
        debug!("\n{}", report);
        Ok(report)
    }

    /// Fill missing values in the working table.
    pub fn remediate(&mut self) -> Result<RemediationOutcome> {
        let outcome = MissingValueRemediator::new(&self.config).remediate(&mut self.working)?;
        self.check_invariants("remediation")?;
        self.remediated = true;
        Ok(outcome)
    }

    /// Convert the working table's columns to their semantic types.
    ///
    /// Fails with [`CleaningError::StageOrder`] if remediation has not run.
    pub fn normalize_types(&mut self) -> Result<NormalizationOutcome> {
        if !self.remediated {
            return Err(CleaningError::StageOrder(
                "type normalization requires remediation to run first".to_string(),
            ));
        }
        let outcome = TypeNormalizer::new(&self.config).normalize(&mut self.working)?;
        self.check_invariants("normalization")?;
        Ok(outcome)
    }

    /// Compare the working table with the original snapshot.
    ///
    /// A changed row count is an engine defect and is returned as
    /// [`CleaningError::Internal`].
    pub fn summary(&self) -> Result<CleaningSummary> {
        let summary = CleaningSummary::summarize(&self.original, &self.working);
        if !summary.rows_preserved {
            error!(
                "Row count changed during cleaning: {} -> {}",
                summary.original_shape.0, summary.current_shape.0
            );
            return Err(CleaningError::Internal(format!(
                "row count changed from {} to {}",
                summary.original_shape.0, summary.current_shape.0
            )));
        }
        Ok(summary)
    }

    /// Run every stage: audit, remediation, normalization, summary and a
    /// final verification audit.
    pub fn full_cleaning_process(self) -> Result<CleaningResult> {
        self.run_with(&|_| {})
    }

    pub(crate) fn run_with(mut self, progress: &dyn Fn(ProgressUpdate)) -> Result<CleaningResult> {
        let start_time = Instant::now();
        info!("Starting full cleaning process");

        progress(ProgressUpdate::new(
            CleaningStage::Auditing,
            0.0,
            "Auditing missing values...",
        ));
        let initial_audit = self.display_missing_data_report()?;

        progress(ProgressUpdate::new(
            CleaningStage::Remediating,
            0.0,
            "Filling missing values...",
        ));
        let remediation = self.remediate()?;
        progress(ProgressUpdate::with_sub_stage(
            CleaningStage::Remediating,
            format!("{} columns filled", remediation.actions.len()),
            1.0,
            format!("{} cells filled", remediation.cells_changed()),
        ));

        progress(ProgressUpdate::new(
            CleaningStage::Normalizing,
            0.0,
            "Normalizing column types...",
        ));
        let normalization = self.normalize_types()?;
        progress(ProgressUpdate::with_sub_stage(
            CleaningStage::Normalizing,
            format!("{} columns converted", normalization.conversions.len()),
            1.0,
            format!("{} issues recovered", normalization.issues.len()),
        ));

        progress(ProgressUpdate::new(
            CleaningStage::Summarizing,
            0.0,
            "Summarizing changes...",
        ));
        let summary = self.summary()?;
        debug!("\n{}", summary);

        progress(ProgressUpdate::new(
            CleaningStage::Verifying,
            0.0,
            "Verifying cleaned data...",
        ));
        let final_audit = self.display_missing_data_report()?;

        let duration_ms = start_time.elapsed().as_millis() as u64;
        info!(
            "Cleaning process completed in {}ms: {} values cleaned, {} issues",
            duration_ms,
            summary.values_cleaned,
            remediation.issues.len() + normalization.issues.len()
        );

        Ok(CleaningResult {
            data: self.working,
            report: CleaningReport {
                initial_audit,
                remediation,
                normalization,
                summary,
                final_audit,
                duration_ms,
            },
        })
    }

    /// Write the working table to a CSV file.
    pub fn export_csv(&mut self, path: impl AsRef<Path>) -> Result<()> {
        reporting::export_csv(&mut self.working, path)
    }

    /// End the session, handing the working table to the caller.
    pub fn into_data(self) -> DataFrame {
        self.working
    }

    fn check_invariants(&self, stage: &str) -> Result<()> {
        if self.working.height() != self.original.height() {
            error!(
                "{} changed the row count: {} -> {}",
                stage,
                self.original.height(),
                self.working.height()
            );
            return Err(CleaningError::Internal(format!(
                "{} changed the row count from {} to {}",
                stage,
                self.original.height(),
                self.working.height()
            )));
        }
        if self.working.get_column_names() != self.original.get_column_names() {
            error!("{} changed the column set", stage);
            return Err(CleaningError::Internal(format!(
                "{} changed the column set",
                stage
            )));
        }
        Ok(())
    }
}
