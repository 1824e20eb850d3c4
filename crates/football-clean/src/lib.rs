//! Football Match Cleaning Library
//!
//! A cleaning engine for historical international football results, built
//! with Rust and Polars.
//!
//! # Overview
//!
//! A table of match records (date, teams, scores, tournament, location and
//! a neutral-venue flag) goes through four stages:
//!
//! - **Auditing**: storage-level null counts, percentages and sample rows
//! - **Remediation**: score defaults, the neutral default, mode imputation
//!   for categorical columns and a fallback sweep over every text column
//! - **Type Normalization**: integer scores, calendar dates, boolean flags
//!   and trimmed text with known encoding artifacts repaired
//! - **Summary**: before/after comparison and a final verification audit
//!
//! Rows are never dropped. Values the engine cannot interpret are replaced
//! or marked and reported as [`CleaningIssue`]s instead of failing the run.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use football_clean::{CleaningSession, extract::read_matches_csv};
//!
//! let df = read_matches_csv("data/results.csv")?;
//! let mut result = CleaningSession::new(df)?.full_cleaning_process()?;
//!
//! println!("{}", result.report.summary);
//! football_clean::reporting::export_csv(&mut result.data, "output/results_clean.csv")?;
//! ```
//!
//! # Configuration
//!
//! ```rust,ignore
//! use football_clean::{CleaningConfig, CleaningPipeline};
//!
//! let config = CleaningConfig::builder()
//!     .tournament_fallback("Unknown Competition")
//!     .date_formats(["%Y-%m-%d", "%d/%m/%Y"])
//!     .build()?;
//!
//! let result = CleaningPipeline::builder()
//!     .config(config)
//!     .on_progress(|update| println!("[{:?}] {}", update.stage, update.message))
//!     .build()?
//!     .process(df)?;
//! ```

pub mod auditor;
pub mod config;
pub mod error;
pub mod extract;
pub mod normalizer;
pub mod pipeline;
pub mod remediator;
pub mod reporting;
pub mod schema;
pub mod types;
pub mod utils;

// Re-exports for convenient access
pub use auditor::{ColumnMissing, MissingValueAuditor, MissingValueReport, SampleRow};
pub use config::{CleaningConfig, CleaningConfigBuilder, ConfigValidationError};
pub use error::{CleaningError, ResultExt};
pub use normalizer::{DateParser, TypeNormalizer};
pub use pipeline::{
    CleaningPipeline, CleaningPipelineBuilder, CleaningResult, CleaningSession, CleaningStage,
    ClosureProgressReporter, ProgressReporter, ProgressUpdate,
};
pub use remediator::MissingValueRemediator;
pub use reporting::{CleaningReport, CleaningSummary, ColumnType, export_csv};
pub use schema::{ColumnRole, MatchColumn};
pub use types::{
    CleaningIssue, ColumnConversion, FillAction, FillPolicy, IssueKind, NormalizationOutcome,
    RemediationOutcome,
};
pub use utils::{DEFAULT_NULL_TOKENS, NullTokens};
