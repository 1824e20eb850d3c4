//! Before/after comparison of a cleaning session.

use crate::auditor::count_missing;
use crate::utils::dtype_category_str;
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Dtype of one column of the cleaned table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnType {
    pub name: String,
    pub dtype: String,
    /// "numeric", "datetime", "boolean", "string" or "other".
    pub category: String,
}

/// Summary comparing the original snapshot with the working table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CleaningSummary {
    pub original_missing_total: usize,
    pub current_missing_total: usize,
    /// `original_missing_total - current_missing_total`.
    ///
    /// Negative when normalization introduced more invalid-value markers
    /// than remediation removed.
    pub values_cleaned: i64,
    /// `(rows, columns)`
    pub original_shape: (usize, usize),
    pub current_shape: (usize, usize),
    pub rows_preserved: bool,
    pub columns: Vec<String>,
    pub column_types: Vec<ColumnType>,
}

impl CleaningSummary {
    pub fn summarize(original: &DataFrame, current: &DataFrame) -> Self {
        let original_missing_total = count_missing(original);
        let current_missing_total = count_missing(current);

        let column_types = current
            .get_columns()
            .iter()
            .map(|col| ColumnType {
                name: col.name().to_string(),
                dtype: col.dtype().to_string(),
                category: dtype_category_str(col.dtype()).to_string(),
            })
            .collect();

        Self {
            original_missing_total,
            current_missing_total,
            values_cleaned: original_missing_total as i64 - current_missing_total as i64,
            original_shape: original.shape(),
            current_shape: current.shape(),
            rows_preserved: original.height() == current.height(),
            columns: current
                .get_column_names()
                .iter()
                .map(|n| n.to_string())
                .collect(),
            column_types,
        }
    }
}

impl fmt::Display for CleaningSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", "=".repeat(50))?;
        writeln!(f, "CLEANING SUMMARY")?;
        writeln!(f, "{}", "=".repeat(50))?;
        writeln!(f, "Original missing values: {}", self.original_missing_total)?;
        writeln!(f, "Current missing values:  {}", self.current_missing_total)?;
        writeln!(f, "Values cleaned:          {}", self.values_cleaned)?;
        writeln!(
            f,
            "Original shape:          {} rows x {} columns",
            self.original_shape.0, self.original_shape.1
        )?;
        writeln!(
            f,
            "Current shape:           {} rows x {} columns",
            self.current_shape.0, self.current_shape.1
        )?;
        writeln!(
            f,
            "Rows preserved:          {}",
            if self.rows_preserved { "yes" } else { "NO" }
        )?;
        writeln!(f)?;
        write!(f, "Column types:")?;
        for column in &self.column_types {
            write!(f, "\n  {:<12} {}", column.name, column.dtype)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_counts() {
        let original = df![
            "city" => [Some("Lima"), None, None],
            "home_score" => [Some("1"), None, Some("2")],
        ]
        .unwrap();
        let current = df![
            "city" => ["Lima", "Lima", "Lima"],
            "home_score" => [1i64, 0, 2],
        ]
        .unwrap();

        let summary = CleaningSummary::summarize(&original, &current);
        assert_eq!(summary.original_missing_total, 3);
        assert_eq!(summary.current_missing_total, 0);
        assert_eq!(summary.values_cleaned, 3);
        assert_eq!(summary.original_shape, (3, 2));
        assert!(summary.rows_preserved);
        assert_eq!(summary.columns, vec!["city", "home_score"]);
        assert_eq!(summary.column_types[1].category, "numeric");
    }

    #[test]
    fn test_values_cleaned_can_be_negative() {
        let original = df!["date" => ["2001-01-01", "garbage"]].unwrap();
        let current = df!["date" => [Some(1i32), None]].unwrap();

        let summary = CleaningSummary::summarize(&original, &current);
        assert_eq!(summary.values_cleaned, -1);
    }

    #[test]
    fn test_rows_not_preserved_detected() {
        let original = df!["city" => ["Lima", "Quito"]].unwrap();
        let current = df!["city" => ["Lima"]].unwrap();
        let summary = CleaningSummary::summarize(&original, &current);
        assert!(!summary.rows_preserved);
        assert!(summary.to_string().contains("Rows preserved:          NO"));
    }
}
