//! Missing-value report produced by the auditor.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Null statistics of a single column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnMissing {
    pub name: String,
    pub null_count: usize,
    /// `null_count / total_rows * 100`, 0.0 for an empty table.
    pub null_percentage: f64,
}

/// A row that has at least one null, projected onto the sample columns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SampleRow {
    /// Row index in the audited table.
    pub row: usize,
    pub values: Vec<String>,
}

/// Storage-level null audit of a table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MissingValueReport {
    pub total_rows: usize,
    /// One entry per column, in table order.
    pub columns: Vec<ColumnMissing>,
    pub rows_with_any_missing: usize,
    /// Header of the sample rows.
    pub sample_columns: Vec<String>,
    /// Up to the configured number of rows with nulls, in row order.
    pub sample_rows: Vec<SampleRow>,
}

impl MissingValueReport {
    /// Sum of nulls over all columns.
    pub fn total_missing(&self) -> usize {
        self.columns.iter().map(|c| c.null_count).sum()
    }

    /// Null count of one column, if the column was audited.
    pub fn null_count(&self, column: &str) -> Option<usize> {
        self.columns
            .iter()
            .find(|c| c.name == column)
            .map(|c| c.null_count)
    }

    pub fn is_clean(&self) -> bool {
        self.total_missing() == 0
    }
}

impl fmt::Display for MissingValueReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", "=".repeat(50))?;
        writeln!(f, "MISSING DATA REPORT - FOOTBALL MATCHES")?;
        writeln!(f, "{}", "=".repeat(50))?;
        writeln!(f, "Total rows: {}", self.total_rows)?;
        writeln!(f, "Rows with missing data: {}", self.rows_with_any_missing)?;
        writeln!(f)?;

        writeln!(f, "Null values per column:")?;
        writeln!(f, "{}", "-".repeat(30))?;
        for col in &self.columns {
            if col.null_count > 0 {
                writeln!(
                    f,
                    "{}: {} ({:.2}%)",
                    col.name, col.null_count, col.null_percentage
                )?;
            } else {
                writeln!(f, "{}: 0", col.name)?;
            }
        }

        writeln!(f)?;
        writeln!(f, "First rows with missing values:")?;
        writeln!(f, "{}", "-".repeat(30))?;
        if self.sample_rows.is_empty() {
            write!(f, "No rows with missing values")?;
            return Ok(());
        }

        writeln!(f, "{:>6}  {}", "row", self.sample_columns.join(" | "))?;
        for (i, sample) in self.sample_rows.iter().enumerate() {
            write!(f, "{:>6}  {}", sample.row, sample.values.join(" | "))?;
            if i + 1 < self.sample_rows.len() {
                writeln!(f)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report() -> MissingValueReport {
        MissingValueReport {
            total_rows: 4,
            columns: vec![
                ColumnMissing {
                    name: "city".to_string(),
                    null_count: 1,
                    null_percentage: 25.0,
                },
                ColumnMissing {
                    name: "country".to_string(),
                    null_count: 0,
                    null_percentage: 0.0,
                },
            ],
            rows_with_any_missing: 1,
            sample_columns: vec!["city".to_string(), "country".to_string()],
            sample_rows: vec![SampleRow {
                row: 2,
                values: vec!["null".to_string(), "Peru".to_string()],
            }],
        }
    }

    #[test]
    fn test_totals() {
        let report = report();
        assert_eq!(report.total_missing(), 1);
        assert_eq!(report.null_count("city"), Some(1));
        assert_eq!(report.null_count("stadium"), None);
        assert!(!report.is_clean());
    }

    #[test]
    fn test_display_lists_every_column() {
        let text = report().to_string();
        assert!(text.contains("city: 1 (25.00%)"));
        assert!(text.contains("country: 0"));
        assert!(text.contains("null | Peru"));
    }

    #[test]
    fn test_display_without_samples() {
        let mut report = report();
        report.sample_rows.clear();
        assert!(report.to_string().ends_with("No rows with missing values"));
    }
}
