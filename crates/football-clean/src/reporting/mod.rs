//! Cleaning summary and report output.
//!
//! [`CleaningReport`] gathers every stage output of a full cleaning run:
//!
//! - JSON output to stdout (`--json` CLI flag)
//! - JSON file output (`--emit-report` CLI flag)
//! - Programmatic access in library mode
//!
//! # Example
//!
//! ```rust,ignore
//! use football_clean::reporting::export_csv;
//!
//! let mut result = session.full_cleaning_process()?;
//! result.report.write_json("output/report.json")?;
//! export_csv(&mut result.data, "output/matches_clean.csv")?;
//! ```

mod export;
mod summary;

pub use export::{export_csv, write_json};
pub use summary::{CleaningSummary, ColumnType};

use crate::auditor::MissingValueReport;
use crate::error::Result;
use crate::types::{CleaningIssue, NormalizationOutcome, RemediationOutcome};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Every stage output of a full cleaning run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CleaningReport {
    pub initial_audit: MissingValueReport,
    pub remediation: RemediationOutcome,
    pub normalization: NormalizationOutcome,
    pub summary: CleaningSummary,
    /// Audit of the cleaned table.
    pub final_audit: MissingValueReport,
    pub duration_ms: u64,
}

impl CleaningReport {
    /// All recovered issues, remediation first.
    pub fn issues(&self) -> impl Iterator<Item = &CleaningIssue> {
        self.remediation
            .issues
            .iter()
            .chain(self.normalization.issues.iter())
    }

    /// Write the report as pretty JSON.
    pub fn write_json(&self, path: impl AsRef<Path>) -> Result<()> {
        write_json(self, path)
    }
}
