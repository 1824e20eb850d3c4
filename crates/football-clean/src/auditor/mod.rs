//! Missing-value auditing.
//!
//! The auditor is read-only: it counts storage-level nulls per column and
//! samples the rows that contain them. Missing-value tokens such as `"N/A"`
//! are not nulls at this level; they are the remediator's concern.

mod report;

pub use report::{ColumnMissing, MissingValueReport, SampleRow};

use crate::schema::MatchColumn;
use crate::utils::cell_to_string;
use polars::prelude::*;
use tracing::debug;

/// Auditor for storage-level missing values.
pub struct MissingValueAuditor {
    sample_rows: usize,
}

impl Default for MissingValueAuditor {
    fn default() -> Self {
        Self { sample_rows: 10 }
    }
}

impl MissingValueAuditor {
    pub fn new(sample_rows: usize) -> Self {
        Self { sample_rows }
    }

    /// Audit a table without modifying it.
    pub fn audit(&self, df: &DataFrame) -> PolarsResult<MissingValueReport> {
        let total_rows = df.height();
        let mut columns = Vec::with_capacity(df.width());
        let mut row_has_missing = vec![false; total_rows];

        for col in df.get_columns() {
            let series = col.as_materialized_series();
            let null_count = series.null_count();
            let null_percentage = if total_rows > 0 {
                (null_count as f64 / total_rows as f64) * 100.0
            } else {
                0.0
            };

            if null_count > 0 {
                for (row, is_null) in series.is_null().into_iter().enumerate() {
                    if is_null.unwrap_or(false) {
                        row_has_missing[row] = true;
                    }
                }
            }

            columns.push(ColumnMissing {
                name: series.name().to_string(),
                null_count,
                null_percentage,
            });
        }

        let rows_with_any_missing = row_has_missing.iter().filter(|m| **m).count();

        let sample_columns: Vec<String> = MatchColumn::SAMPLE
            .iter()
            .map(|c| c.name())
            .filter(|name| df.column(name).is_ok())
            .map(str::to_string)
            .collect();

        let mut sample_rows = Vec::new();
        for row in row_has_missing
            .iter()
            .enumerate()
            .filter(|(_, missing)| **missing)
            .map(|(row, _)| row)
            .take(self.sample_rows)
        {
            let mut values = Vec::with_capacity(sample_columns.len());
            for name in &sample_columns {
                let value = df.column(name)?.get(row)?;
                values.push(cell_to_string(&value));
            }
            sample_rows.push(SampleRow { row, values });
        }

        debug!(
            "Audited {} rows: {} with missing values",
            total_rows, rows_with_any_missing
        );

        Ok(MissingValueReport {
            total_rows,
            columns,
            rows_with_any_missing,
            sample_columns,
            sample_rows,
        })
    }
}

/// Total number of storage-level nulls in a table.
pub fn count_missing(df: &DataFrame) -> usize {
    df.get_columns().iter().map(|col| col.null_count()).sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matches_with_gaps() -> DataFrame {
        df![
            "date" => [Some("2001-05-01"), Some("2001-05-02"), None, Some("2001-05-04")],
            "home_team" => [Some("Chile"), None, Some("Peru"), Some("Peru")],
            "away_team" => [Some("Peru"), Some("Chile"), Some("Chile"), Some("Chile")],
            "home_score" => [Some("1"), Some("0"), Some("2"), None],
            "away_score" => [Some("1"), Some("3"), Some("0"), Some("0")],
            "tournament" => [Some("Copa América"); 4],
            "city" => [Some("Lima"), Some("Santiago"), Some("Lima"), Some("Lima")],
            "country" => [Some("Peru"), Some("Chile"), Some("Peru"), Some("Peru")],
            "neutral" => [Some("FALSE"), Some("FALSE"), Some("TRUE"), Some("FALSE")],
        ]
        .unwrap()
    }

    #[test]
    fn test_audit_counts_and_percentages() {
        let df = matches_with_gaps();
        let report = MissingValueAuditor::default().audit(&df).unwrap();

        assert_eq!(report.total_rows, 4);
        assert_eq!(report.columns.len(), 9);
        assert_eq!(report.null_count("home_team"), Some(1));
        assert_eq!(report.null_count("neutral"), Some(0));
        assert_eq!(report.rows_with_any_missing, 3);
        assert_eq!(report.total_missing(), 3);

        let home = report.columns.iter().find(|c| c.name == "home_team").unwrap();
        assert_eq!(home.null_percentage, 25.0);
    }

    #[test]
    fn test_audit_samples_in_row_order() {
        let df = matches_with_gaps();
        let report = MissingValueAuditor::default().audit(&df).unwrap();

        let rows: Vec<usize> = report.sample_rows.iter().map(|s| s.row).collect();
        assert_eq!(rows, vec![1, 2, 3]);
        // neutral is not an identifying column
        assert_eq!(report.sample_columns.len(), 8);
        assert_eq!(report.sample_rows[0].values[1], "null");
        assert_eq!(report.sample_rows[1].values[0], "null");
    }

    #[test]
    fn test_audit_sample_limit() {
        let df = matches_with_gaps();
        let report = MissingValueAuditor::new(2).audit(&df).unwrap();
        assert_eq!(report.sample_rows.len(), 2);
        assert_eq!(report.rows_with_any_missing, 3);
    }

    #[test]
    fn test_audit_does_not_count_tokens() {
        let df = df![
            "city" => ["N/A", "", "Quito"],
        ]
        .unwrap();
        let report = MissingValueAuditor::default().audit(&df).unwrap();
        assert!(report.is_clean());
        assert!(report.sample_rows.is_empty());
        assert_eq!(report.sample_columns, vec!["city".to_string()]);
    }

    #[test]
    fn test_audit_empty_table() {
        let df = df![
            "city" => Vec::<String>::new(),
        ]
        .unwrap();
        let report = MissingValueAuditor::default().audit(&df).unwrap();
        assert_eq!(report.total_rows, 0);
        assert_eq!(report.columns[0].null_percentage, 0.0);
    }

    #[test]
    fn test_count_missing() {
        assert_eq!(count_missing(&matches_with_gaps()), 3);
    }
}
