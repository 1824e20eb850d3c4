//! Expected column set of the match dataset and input validation.

use crate::error::{CleaningError, Result};
use crate::utils::is_numeric_dtype;
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Semantic role of a match column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnRole {
    /// Calendar date of the match
    Date,
    /// Free category text (teams, competition, location)
    Category,
    /// Non-negative goal count
    Score,
    /// Two-valued flag
    Flag,
}

/// The columns every match dataset must carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchColumn {
    Date,
    HomeTeam,
    AwayTeam,
    HomeScore,
    AwayScore,
    Tournament,
    City,
    Country,
    Neutral,
}

impl MatchColumn {
    /// All expected columns, in source file order.
    pub const ALL: [MatchColumn; 9] = [
        MatchColumn::Date,
        MatchColumn::HomeTeam,
        MatchColumn::AwayTeam,
        MatchColumn::HomeScore,
        MatchColumn::AwayScore,
        MatchColumn::Tournament,
        MatchColumn::City,
        MatchColumn::Country,
        MatchColumn::Neutral,
    ];

    /// Goal count columns.
    pub const SCORES: [MatchColumn; 2] = [MatchColumn::HomeScore, MatchColumn::AwayScore];

    /// Columns filled by mode imputation, in the order they are processed.
    pub const CATEGORICAL: [MatchColumn; 5] = [
        MatchColumn::HomeTeam,
        MatchColumn::AwayTeam,
        MatchColumn::Tournament,
        MatchColumn::Country,
        MatchColumn::City,
    ];

    /// Columns trimmed and repaired by the normalizer.
    pub const TEXT: [MatchColumn; 5] = [
        MatchColumn::HomeTeam,
        MatchColumn::AwayTeam,
        MatchColumn::Tournament,
        MatchColumn::City,
        MatchColumn::Country,
    ];

    /// Identifying columns shown when sampling rows with missing values.
    pub const SAMPLE: [MatchColumn; 8] = [
        MatchColumn::Date,
        MatchColumn::HomeTeam,
        MatchColumn::AwayTeam,
        MatchColumn::HomeScore,
        MatchColumn::AwayScore,
        MatchColumn::Tournament,
        MatchColumn::City,
        MatchColumn::Country,
    ];

    /// Column name as it appears in the dataset header.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Date => "date",
            Self::HomeTeam => "home_team",
            Self::AwayTeam => "away_team",
            Self::HomeScore => "home_score",
            Self::AwayScore => "away_score",
            Self::Tournament => "tournament",
            Self::City => "city",
            Self::Country => "country",
            Self::Neutral => "neutral",
        }
    }

    /// Look up an expected column by header name.
    pub fn from_name(name: &str) -> Option<MatchColumn> {
        Self::ALL.into_iter().find(|c| c.name() == name)
    }

    pub fn role(&self) -> ColumnRole {
        match self {
            Self::Date => ColumnRole::Date,
            Self::HomeScore | Self::AwayScore => ColumnRole::Score,
            Self::Neutral => ColumnRole::Flag,
            Self::HomeTeam | Self::AwayTeam | Self::Tournament | Self::City | Self::Country => {
                ColumnRole::Category
            }
        }
    }
}

impl std::fmt::Display for MatchColumn {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

fn is_nested_dtype(dtype: &DataType) -> bool {
    matches!(
        dtype,
        DataType::List(_) | DataType::Array(_, _) | DataType::Struct(_)
    )
}

/// Validate the input table and bring every expected column to an accepted
/// input dtype.
///
/// - category columns and `date` (unless already a date) become `String`
/// - `Datetime` dates are truncated to `Date`
/// - `neutral` stays `Boolean` or becomes `String`
/// - scores stay numeric, anything else becomes `String`
///
/// Nested dtypes are rejected with [`CleaningError::SchemaMismatch`].
pub fn conform(mut df: DataFrame) -> Result<DataFrame> {
    for column in MatchColumn::ALL {
        let name = column.name();
        let series = df
            .column(name)
            .map_err(|_| CleaningError::ColumnNotFound(name.to_string()))?
            .as_materialized_series()
            .clone();
        let dtype = series.dtype().clone();

        if is_nested_dtype(&dtype) {
            return Err(CleaningError::SchemaMismatch {
                column: name.to_string(),
                expected: expected_input(column).to_string(),
                found: dtype.to_string(),
            });
        }

        let target = match column.role() {
            ColumnRole::Category => DataType::String,
            ColumnRole::Date => match dtype {
                DataType::Date => DataType::Date,
                DataType::Datetime(_, _) => DataType::Date,
                _ => DataType::String,
            },
            ColumnRole::Flag => match dtype {
                DataType::Boolean => DataType::Boolean,
                _ => DataType::String,
            },
            ColumnRole::Score => {
                if is_numeric_dtype(&dtype) {
                    dtype.clone()
                } else {
                    DataType::String
                }
            }
        };

        if target != dtype {
            debug!("Conforming column '{}' from {} to {}", name, dtype, target);
            let converted = series.cast(&target)?;
            df.replace(name, converted)?;
        }
    }

    Ok(df)
}

fn expected_input(column: MatchColumn) -> &'static str {
    match column.role() {
        ColumnRole::Category => "str",
        ColumnRole::Date => "str or date",
        ColumnRole::Flag => "bool or str",
        ColumnRole::Score => "numeric or str",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn complete_frame() -> DataFrame {
        df![
            "date" => ["2020-01-01"],
            "home_team" => ["Spain"],
            "away_team" => ["France"],
            "home_score" => [2i64],
            "away_score" => [1i64],
            "tournament" => ["Friendly"],
            "city" => ["Madrid"],
            "country" => ["Spain"],
            "neutral" => [false],
        ]
        .unwrap()
    }

    #[test]
    fn test_name_round_trip() {
        for column in MatchColumn::ALL {
            assert_eq!(MatchColumn::from_name(column.name()), Some(column));
        }
        assert_eq!(MatchColumn::from_name("attendance"), None);
    }

    #[test]
    fn test_roles() {
        assert_eq!(MatchColumn::Date.role(), ColumnRole::Date);
        assert_eq!(MatchColumn::AwayScore.role(), ColumnRole::Score);
        assert_eq!(MatchColumn::Neutral.role(), ColumnRole::Flag);
        assert_eq!(MatchColumn::City.role(), ColumnRole::Category);
    }

    #[test]
    fn test_conform_keeps_native_types() {
        let df = conform(complete_frame()).unwrap();
        assert_eq!(df.column("home_score").unwrap().dtype(), &DataType::Int64);
        assert_eq!(df.column("neutral").unwrap().dtype(), &DataType::Boolean);
        assert_eq!(df.column("date").unwrap().dtype(), &DataType::String);
    }

    #[test]
    fn test_conform_missing_column() {
        let df = complete_frame().drop("country").unwrap();
        let err = conform(df).unwrap_err();
        assert!(matches!(err, CleaningError::ColumnNotFound(ref c) if c == "country"));
    }

    #[test]
    fn test_conform_casts_null_and_numeric_categories() {
        let mut df = complete_frame();
        df.replace(
            "tournament",
            Series::new_null("tournament".into(), 1),
        )
        .unwrap();
        df.replace("city", Series::new("city".into(), [7i64])).unwrap();

        let df = conform(df).unwrap();
        assert_eq!(df.column("tournament").unwrap().dtype(), &DataType::String);
        assert_eq!(df.column("tournament").unwrap().null_count(), 1);
        assert_eq!(df.column("city").unwrap().dtype(), &DataType::String);
    }

    #[test]
    fn test_conform_allows_extra_columns() {
        let mut df = complete_frame();
        df.with_column(Series::new("attendance".into(), ["50000"]))
            .unwrap();
        let df = conform(df).unwrap();
        assert_eq!(df.width(), 10);
    }
}
