//! Column converters used by the type normalizer.
//!
//! Each converter maps one series to its target dtype and reports how many
//! cell values changed along with the issues it recovered from.

use crate::error::Result;
use crate::types::{CleaningIssue, IssueKind};
use crate::utils::{is_numeric_dtype, parse_score, repair_mojibake};
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use polars::prelude::*;

/// Output of a single column conversion.
#[derive(Debug)]
pub(crate) struct Converted {
    pub series: Series,
    pub cells_changed: usize,
    pub issues: Vec<CleaningIssue>,
}

impl Converted {
    fn unchanged(series: Series) -> Self {
        Self {
            series,
            cells_changed: 0,
            issues: Vec::new(),
        }
    }
}

// =============================================================================
// Scores
// =============================================================================

/// Convert a goal count column to `Int64`.
///
/// Float-like values are truncated. Missing, unparseable, non-finite,
/// negative and out-of-range values become `default` and are reported as
/// score coercions.
pub(crate) fn to_score(series: &Series, default: i64) -> Result<Converted> {
    let name = series.name().to_string();
    let mut cells_changed = 0;
    let mut issues = Vec::new();
    let mut values: Vec<Option<i64>> = Vec::with_capacity(series.len());

    let mut coerce = |row: usize, parsed: Option<f64>, raw: Option<String>| {
        match parsed {
            Some(v) if v.is_finite() && v >= 0.0 && v < i64::MAX as f64 => {
                let truncated = v.trunc() as i64;
                if truncated as f64 != v {
                    cells_changed += 1;
                }
                values.push(Some(truncated));
            }
            _ => {
                cells_changed += 1;
                values.push(Some(default));
                let shown = raw.clone().unwrap_or_else(|| "null".to_string());
                let mut issue = CleaningIssue::new(
                    name.as_str(),
                    IssueKind::ScoreCoercion,
                    format!("'{}' is not a valid goal count, replaced with {}", shown, default),
                )
                .at_row(row);
                if let Some(raw) = raw {
                    issue = issue.with_value(raw);
                }
                issues.push(issue);
            }
        }
    };

    match series.dtype() {
        DataType::String => {
            for (row, opt_val) in series.str()?.into_iter().enumerate() {
                coerce(row, opt_val.and_then(parse_score), opt_val.map(str::to_string));
            }
        }
        DataType::Int64 => {
            for (row, opt_val) in series.i64()?.into_iter().enumerate() {
                coerce(row, opt_val.map(|v| v as f64), opt_val.map(|v| v.to_string()));
            }
        }
        dtype if is_numeric_dtype(dtype) => {
            let floats = series.cast(&DataType::Float64)?;
            for (row, opt_val) in floats.f64()?.into_iter().enumerate() {
                coerce(row, opt_val, opt_val.map(|v| v.to_string()));
            }
        }
        other => {
            return Err(crate::error::CleaningError::SchemaMismatch {
                column: name.clone(),
                expected: "numeric or str".to_string(),
                found: other.to_string(),
            });
        }
    }

    Ok(Converted {
        series: Series::new(name.as_str().into(), values),
        cells_changed,
        issues,
    })
}

// =============================================================================
// Dates
// =============================================================================

/// Tolerant date parser over an ordered list of formats.
#[derive(Debug, Clone)]
pub struct DateParser {
    date_formats: Vec<String>,
    datetime_formats: Vec<String>,
}

impl DateParser {
    pub fn new(date_formats: &[String], datetime_formats: &[String]) -> Self {
        Self {
            date_formats: date_formats.to_vec(),
            datetime_formats: datetime_formats.to_vec(),
        }
    }

    /// Parse a calendar date: plain date formats first, then date-time
    /// formats, then RFC 3339.
    pub fn parse(&self, value: &str) -> Option<NaiveDate> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return None;
        }

        self.date_formats
            .iter()
            .find_map(|fmt| NaiveDate::parse_from_str(trimmed, fmt).ok())
            .or_else(|| {
                self.datetime_formats
                    .iter()
                    .find_map(|fmt| NaiveDateTime::parse_from_str(trimmed, fmt).ok())
                    .map(|dt| dt.date())
            })
            .or_else(|| {
                DateTime::parse_from_rfc3339(trimmed)
                    .ok()
                    .map(|dt| dt.date_naive())
            })
    }
}

/// Convert the `date` column to `Date`.
///
/// Unparseable values become null and are reported; nulls stay null.
pub(crate) fn to_date(series: &Series, parser: &DateParser) -> Result<Converted> {
    match series.dtype() {
        DataType::Date => return Ok(Converted::unchanged(series.clone())),
        DataType::Datetime(_, _) => {
            return Ok(Converted::unchanged(series.cast(&DataType::Date)?));
        }
        _ => {}
    }

    let name = series.name().to_string();
    let text = series.cast(&DataType::String)?;
    let mut issues = Vec::new();
    let mut dates: Vec<Option<NaiveDate>> = Vec::with_capacity(text.len());

    for (row, opt_val) in text.str()?.into_iter().enumerate() {
        match opt_val {
            Some(raw) => match parser.parse(raw) {
                Some(date) => dates.push(Some(date)),
                None => {
                    dates.push(None);
                    issues.push(
                        CleaningIssue::new(
                            name.as_str(),
                            IssueKind::UnparseableDate,
                            format!("'{}' is not a recognizable date", raw),
                        )
                        .at_row(row)
                        .with_value(raw),
                    );
                }
            },
            None => dates.push(None),
        }
    }

    Ok(Converted {
        series: Series::new(name.as_str().into(), dates),
        cells_changed: issues.len(),
        issues,
    })
}

// =============================================================================
// Flags
// =============================================================================

/// Convert the `neutral` column to `Boolean`.
///
/// Only the exact literals `"TRUE"` and `"FALSE"` are mapped. Anything else
/// becomes null and is reported with its original value.
pub(crate) fn to_flag(series: &Series) -> Result<Converted> {
    match series.dtype() {
        DataType::Boolean => return Ok(Converted::unchanged(series.clone())),
        DataType::String => {}
        other => {
            return Err(crate::error::CleaningError::SchemaMismatch {
                column: series.name().to_string(),
                expected: "bool or str".to_string(),
                found: other.to_string(),
            });
        }
    }

    let name = series.name().to_string();
    let mut issues = Vec::new();
    let mut values: Vec<Option<bool>> = Vec::with_capacity(series.len());

    for (row, opt_val) in series.str()?.into_iter().enumerate() {
        match opt_val {
            Some("TRUE") => values.push(Some(true)),
            Some("FALSE") => values.push(Some(false)),
            Some(raw) => {
                values.push(None);
                issues.push(
                    CleaningIssue::new(
                        name.as_str(),
                        IssueKind::UnmappedBoolean,
                        format!("'{}' is neither TRUE nor FALSE", raw),
                    )
                    .at_row(row)
                    .with_value(raw),
                );
            }
            None => values.push(None),
        }
    }

    Ok(Converted {
        series: Series::new(name.as_str().into(), values),
        cells_changed: issues.len(),
        issues,
    })
}

// =============================================================================
// Text
// =============================================================================

/// Trim a text column and, when `repair` is set, undo known mojibake.
pub(crate) fn to_clean_text(series: &Series, repair: bool) -> Result<Converted> {
    let str_series = series.str()?;
    let mut cells_changed = 0;
    let mut values: Vec<Option<String>> = Vec::with_capacity(str_series.len());

    for opt_val in str_series.into_iter() {
        match opt_val {
            Some(raw) => {
                let trimmed = raw.trim();
                let cleaned = if repair {
                    repair_mojibake(trimmed).into_owned()
                } else {
                    trimmed.to_string()
                };
                if cleaned != raw {
                    cells_changed += 1;
                }
                values.push(Some(cleaned));
            }
            None => values.push(None),
        }
    }

    Ok(Converted {
        series: Series::new(series.name().clone(), values),
        cells_changed,
        issues: Vec::new(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{DEFAULT_DATE_FORMATS, DEFAULT_DATETIME_FORMATS};

    fn parser() -> DateParser {
        let dates: Vec<String> = DEFAULT_DATE_FORMATS.iter().map(|s| s.to_string()).collect();
        let datetimes: Vec<String> = DEFAULT_DATETIME_FORMATS
            .iter()
            .map(|s| s.to_string())
            .collect();
        DateParser::new(&dates, &datetimes)
    }

    fn ints(series: &Series) -> Vec<Option<i64>> {
        series.i64().unwrap().into_iter().collect()
    }

    // ========================================================================
    // to_score() tests
    // ========================================================================

    #[test]
    fn test_to_score_from_floats() {
        let series = Series::new("home_score".into(), &[Some(2.0), Some(0.0), Some(3.0)]);
        let converted = to_score(&series, 0).unwrap();

        assert_eq!(converted.series.dtype(), &DataType::Int64);
        assert_eq!(ints(&converted.series), vec![Some(2), Some(0), Some(3)]);
        assert_eq!(converted.cells_changed, 0);
        assert!(converted.issues.is_empty());
    }

    #[test]
    fn test_to_score_truncates_float_like_values() {
        let series = Series::new("away_score".into(), &["1.0", "2.7", " 4 "]);
        let converted = to_score(&series, 0).unwrap();
        assert_eq!(ints(&converted.series), vec![Some(1), Some(2), Some(4)]);
        assert_eq!(converted.cells_changed, 1);
    }

    #[test]
    fn test_to_score_negative_and_non_finite() {
        let series = Series::new(
            "home_score".into(),
            &[Some(-1.0), Some(f64::INFINITY), Some(f64::NAN), None],
        );
        let converted = to_score(&series, 0).unwrap();
        assert_eq!(ints(&converted.series), vec![Some(0); 4]);
        assert_eq!(converted.issues.len(), 4);
        assert!(
            converted
                .issues
                .iter()
                .all(|i| i.kind == IssueKind::ScoreCoercion)
        );
        assert_eq!(converted.issues[0].value.as_deref(), Some("-1"));
        assert_eq!(converted.issues[3].value, None);
    }

    #[test]
    fn test_to_score_out_of_range_values() {
        let series = Series::new("away_score".into(), &["1e30", "3"]);
        let converted = to_score(&series, 0).unwrap();
        assert_eq!(ints(&converted.series), vec![Some(0), Some(3)]);
        assert_eq!(converted.issues.len(), 1);
        assert_eq!(converted.issues[0].kind, IssueKind::ScoreCoercion);
        assert_eq!(converted.issues[0].value.as_deref(), Some("1e30"));
    }

    #[test]
    fn test_to_score_int_passthrough() {
        let series = Series::new("home_score".into(), &[1i64, 5]);
        let converted = to_score(&series, 0).unwrap();
        assert_eq!(ints(&converted.series), vec![Some(1), Some(5)]);
        assert_eq!(converted.cells_changed, 0);
    }

    #[test]
    fn test_to_score_rejects_boolean_column() {
        let series = Series::new("home_score".into(), &[true, false]);
        assert!(to_score(&series, 0).is_err());
    }

    // ========================================================================
    // DateParser / to_date() tests
    // ========================================================================

    #[test]
    fn test_date_parser_formats() {
        let parser = parser();
        let expected = NaiveDate::from_ymd_opt(1998, 7, 12);
        assert_eq!(parser.parse("1998-07-12"), expected);
        assert_eq!(parser.parse("1998/07/12"), expected);
        assert_eq!(parser.parse("12/07/1998"), expected);
        assert_eq!(parser.parse("12.07.1998"), expected);
        assert_eq!(parser.parse(" 1998-07-12 "), expected);
        assert_eq!(parser.parse("1998-07-12 21:00:00"), expected);
        assert_eq!(parser.parse("1998-07-12T21:00:00+02:00"), expected);
        assert_eq!(parser.parse("not a date"), None);
        assert_eq!(parser.parse("1998-13-45"), None);
        assert_eq!(parser.parse(""), None);
    }

    #[test]
    fn test_to_date_marks_invalid_values() {
        let series = Series::new("date".into(), &[Some("1872-11-30"), Some("Unknown"), None]);
        let converted = to_date(&series, &parser()).unwrap();

        assert_eq!(converted.series.dtype(), &DataType::Date);
        assert_eq!(converted.series.null_count(), 2);
        assert_eq!(converted.issues.len(), 1);
        assert_eq!(converted.issues[0].kind, IssueKind::UnparseableDate);
        assert_eq!(converted.issues[0].row, Some(1));
        assert_eq!(converted.cells_changed, 1);
    }

    #[test]
    fn test_to_date_calendar_values() {
        let series = Series::new("date".into(), &["1970-01-02", "1872-11-30"]);
        let converted = to_date(&series, &parser()).unwrap();
        let dates: Vec<Option<NaiveDate>> = converted
            .series
            .date()
            .unwrap()
            .as_date_iter()
            .collect();
        assert_eq!(
            dates,
            vec![NaiveDate::from_ymd_opt(1970, 1, 2), NaiveDate::from_ymd_opt(1872, 11, 30)]
        );
    }

    #[test]
    fn test_to_date_passthrough() {
        let series = Series::new("date".into(), &[Some(0i32), None])
            .cast(&DataType::Date)
            .unwrap();
        let converted = to_date(&series, &parser()).unwrap();
        assert!(converted.issues.is_empty());
        assert_eq!(converted.series.null_count(), 1);
    }

    // ========================================================================
    // to_flag() tests
    // ========================================================================

    #[test]
    fn test_to_flag_strict_mapping() {
        let series = Series::new("neutral".into(), &["TRUE", "FALSE", "FALSE"]);
        let converted = to_flag(&series).unwrap();
        let values: Vec<Option<bool>> = converted.series.bool().unwrap().into_iter().collect();
        assert_eq!(values, vec![Some(true), Some(false), Some(false)]);
        assert!(converted.issues.is_empty());
    }

    #[test]
    fn test_to_flag_unmapped_values_flagged() {
        let series = Series::new("neutral".into(), &["TRUE", "yes", "true"]);
        let converted = to_flag(&series).unwrap();
        assert_eq!(converted.series.null_count(), 2);
        assert_eq!(converted.issues.len(), 2);
        assert_eq!(converted.issues[0].value.as_deref(), Some("yes"));
        assert_eq!(converted.issues[1].kind, IssueKind::UnmappedBoolean);
    }

    #[test]
    fn test_to_flag_boolean_passthrough() {
        let series = Series::new("neutral".into(), &[true, false]);
        let converted = to_flag(&series).unwrap();
        assert_eq!(converted.cells_changed, 0);
        assert_eq!(converted.series.dtype(), &DataType::Boolean);
    }

    // ========================================================================
    // to_clean_text() tests
    // ========================================================================

    #[test]
    fn test_to_clean_text_trims_and_repairs() {
        let series = Series::new(
            "city".into(),
            &[Some(" MontrÃ©al "), Some("Lima"), Some("  GÃ¶teborg"), None],
        );
        let converted = to_clean_text(&series, true).unwrap();
        let values: Vec<Option<&str>> = converted.series.str().unwrap().into_iter().collect();
        assert_eq!(
            values,
            vec![Some("Montréal"), Some("Lima"), Some("Göteborg"), None]
        );
        assert_eq!(converted.cells_changed, 2);
    }

    #[test]
    fn test_to_clean_text_without_repair() {
        let series = Series::new("city".into(), &["MontrÃ©al "]);
        let converted = to_clean_text(&series, false).unwrap();
        assert_eq!(converted.series.str().unwrap().get(0), Some("MontrÃ©al"));
    }
}
