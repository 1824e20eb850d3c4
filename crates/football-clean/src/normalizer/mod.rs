//! Type normalization for the match columns.
//!
//! Brings every expected column to its semantic type after remediation:
//! scores to `Int64`, `date` to `Date`, `neutral` to `Boolean`, and text
//! columns trimmed with known encoding artifacts repaired. Each column is
//! normalized independently; a column that fails is reported and left as it
//! was.

mod converters;

pub use converters::DateParser;

use crate::config::CleaningConfig;
use crate::error::Result;
use crate::schema::MatchColumn;
use crate::types::{CleaningIssue, ColumnConversion, IssueKind, NormalizationOutcome};
use converters::{Converted, to_clean_text, to_date, to_flag, to_score};
use polars::prelude::*;
use tracing::{debug, info, warn};

/// Normalizer converting match columns to their semantic types.
pub struct TypeNormalizer<'a> {
    config: &'a CleaningConfig,
    date_parser: DateParser,
}

impl<'a> TypeNormalizer<'a> {
    pub fn new(config: &'a CleaningConfig) -> Self {
        Self {
            config,
            date_parser: DateParser::new(&config.date_formats, &config.datetime_formats),
        }
    }

    /// Normalize the table in place.
    ///
    /// Only errors from replacing a converted column propagate; conversion
    /// failures become [`IssueKind::ColumnFailed`] issues.
    pub fn normalize(&self, df: &mut DataFrame) -> Result<NormalizationOutcome> {
        info!("Normalizing column types for {} rows", df.height());
        let mut outcome = NormalizationOutcome::default();

        for column in MatchColumn::SCORES {
            self.normalize_column(df, column, "Int64", &mut outcome, |s| {
                to_score(s, self.config.score_default)
            })?;
        }

        self.normalize_column(df, MatchColumn::Date, "Date", &mut outcome, |s| {
            to_date(s, &self.date_parser)
        })?;

        self.normalize_column(df, MatchColumn::Neutral, "Boolean", &mut outcome, to_flag)?;

        for column in MatchColumn::TEXT {
            self.normalize_column(df, column, "String", &mut outcome, |s| {
                to_clean_text(s, self.config.repair_encoding)
            })?;
        }

        for issue in &outcome.issues {
            match issue.kind {
                IssueKind::UnmappedBoolean => warn!("{} (row {:?})", issue.message, issue.row),
                IssueKind::ColumnFailed => {}
                _ => debug!("{}: {} (row {:?})", issue.column, issue.message, issue.row),
            }
        }

        info!(
            "Normalized {} columns with {} issues",
            outcome.conversions.len(),
            outcome.issues.len()
        );
        Ok(outcome)
    }

    fn normalize_column(
        &self,
        df: &mut DataFrame,
        column: MatchColumn,
        target_type: &str,
        outcome: &mut NormalizationOutcome,
        convert: impl FnOnce(&Series) -> Result<Converted>,
    ) -> Result<()> {
        let name = column.name();
        let Ok(existing) = df.column(name) else {
            debug!("Column '{}' not present, skipping", name);
            return Ok(());
        };
        let series = existing.as_materialized_series().clone();

        match convert(&series) {
            Ok(converted) => {
                df.replace(name, converted.series)?;
                debug!(
                    "Column '{}' converted to {} ({} cells changed)",
                    name, target_type, converted.cells_changed
                );
                outcome.conversions.push(ColumnConversion {
                    column: name.to_string(),
                    target_type: target_type.to_string(),
                    cells_changed: converted.cells_changed,
                });
                outcome.issues.extend(converted.issues);
            }
            Err(e) => {
                warn!("Failed to normalize column '{}': {}", name, e);
                outcome.issues.push(CleaningIssue::new(
                    name,
                    IssueKind::ColumnFailed,
                    format!("Could not convert '{}' to {}: {}", name, target_type, e),
                ));
            }
        }
        Ok(())
    }
}
