//! Shared utilities for the cleaning stages.
//!
//! This module contains the helpers several stages rely on: dtype
//! classification, missing-token detection, mode computation, score parsing
//! and the mojibake repair table.

use polars::prelude::*;
use std::borrow::Cow;
use std::collections::{HashMap, HashSet};

// =============================================================================
// Data Type Utilities
// =============================================================================

/// Category of a data type for reporting purposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DtypeCategory {
    /// Integer or floating point numbers
    Numeric,
    /// Date or datetime types
    Datetime,
    /// Boolean type
    Boolean,
    /// String/text type
    String,
    /// Other/unknown types
    Other,
}

/// Check if a DataType is numeric (integer or float).
#[inline]
pub fn is_numeric_dtype(dtype: &DataType) -> bool {
    matches!(
        dtype,
        DataType::Int8
            | DataType::Int16
            | DataType::Int32
            | DataType::Int64
            | DataType::UInt8
            | DataType::UInt16
            | DataType::UInt32
            | DataType::UInt64
            | DataType::Float32
            | DataType::Float64
    )
}

/// Check if a DataType is a datetime type.
#[inline]
pub fn is_datetime_dtype(dtype: &DataType) -> bool {
    matches!(
        dtype,
        DataType::Datetime(_, _) | DataType::Date | DataType::Time
    )
}

/// Get the category of a DataType.
pub fn get_dtype_category(dtype: &DataType) -> DtypeCategory {
    if is_numeric_dtype(dtype) {
        DtypeCategory::Numeric
    } else if is_datetime_dtype(dtype) {
        DtypeCategory::Datetime
    } else if matches!(dtype, DataType::Boolean) {
        DtypeCategory::Boolean
    } else if matches!(dtype, DataType::String | DataType::Categorical(_, _)) {
        DtypeCategory::String
    } else {
        DtypeCategory::Other
    }
}

/// Get the dtype category as a string.
pub fn dtype_category_str(dtype: &DataType) -> &'static str {
    match get_dtype_category(dtype) {
        DtypeCategory::Numeric => "numeric",
        DtypeCategory::Datetime => "datetime",
        DtypeCategory::Boolean => "boolean",
        DtypeCategory::String => "string",
        DtypeCategory::Other => "other",
    }
}

// =============================================================================
// Missing Value Utilities
// =============================================================================

/// Text literals conventionally used to represent absent data.
///
/// Matching is case-sensitive and ignores surrounding whitespace.
pub const DEFAULT_NULL_TOKENS: [&str; 11] = [
    "", "null", "NULL", "Null", "nan", "NaN", "NAN", "n/a", "N/A", "None", "NONE",
];

/// Set of missing-value tokens used by the remediator.
#[derive(Debug, Clone)]
pub struct NullTokens {
    tokens: HashSet<String>,
}

impl NullTokens {
    pub fn new<I, S>(tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            tokens: tokens.into_iter().map(Into::into).collect(),
        }
    }

    /// True if the value, once trimmed, is one of the tokens.
    ///
    /// Text columns are trimmed during normalization, so `"   "` and
    /// `" N/A "` are missing here too.
    pub fn contains(&self, value: &str) -> bool {
        self.tokens.contains(value) || self.tokens.contains(value.trim())
    }

    /// True for a storage-level null or a token.
    pub fn is_missing(&self, value: Option<&str>) -> bool {
        match value {
            Some(v) => self.contains(v),
            None => true,
        }
    }
}

impl Default for NullTokens {
    fn default() -> Self {
        Self::new(DEFAULT_NULL_TOKENS)
    }
}

// =============================================================================
// Series Statistics Utilities
// =============================================================================

/// Calculate the mode (most frequent value) of a sequence of text values.
///
/// Among equally frequent values the one encountered first wins, so the
/// result only depends on row order.
pub fn string_mode<'a, I>(values: I) -> Option<String>
where
    I: IntoIterator<Item = &'a str>,
{
    // value -> (count, first position)
    let mut value_counts: HashMap<&'a str, (usize, usize)> = HashMap::new();
    for (position, val) in values.into_iter().enumerate() {
        value_counts
            .entry(val)
            .and_modify(|(count, _)| *count += 1)
            .or_insert((1, position));
    }

    value_counts
        .into_iter()
        .max_by(|(_, (count_a, first_a)), (_, (count_b, first_b))| {
            count_a.cmp(count_b).then(first_b.cmp(first_a))
        })
        .map(|(val, _)| val.to_string())
}

/// Mode of the values of a string series that are neither null nor tokens.
pub fn valid_string_mode(series: &Series, tokens: &NullTokens) -> PolarsResult<Option<String>> {
    let str_series = series.str()?;
    Ok(string_mode(
        str_series
            .into_iter()
            .flatten()
            .filter(|v| !tokens.contains(v)),
    ))
}

// =============================================================================
// Series Transformation Utilities
// =============================================================================

/// Replace every masked cell of a string series with `fill_value`.
///
/// Returns the new series and the number of cells replaced.
pub fn fill_string_where(
    series: &Series,
    fill_value: &str,
    mut is_target: impl FnMut(Option<&str>) -> bool,
) -> PolarsResult<(Series, usize)> {
    let str_series = series.str()?;
    let mut replaced = 0;
    let mut result_vec: Vec<Option<String>> = Vec::with_capacity(str_series.len());

    for opt_val in str_series.into_iter() {
        if is_target(opt_val) {
            replaced += 1;
            result_vec.push(Some(fill_value.to_string()));
        } else {
            result_vec.push(opt_val.map(|v| v.to_string()));
        }
    }

    Ok((Series::new(series.name().clone(), result_vec), replaced))
}

/// Render a cell for human-readable output (strings without quotes).
pub fn cell_to_string(value: &AnyValue<'_>) -> String {
    match value {
        AnyValue::Null => "null".to_string(),
        AnyValue::String(s) => s.to_string(),
        AnyValue::StringOwned(s) => s.to_string(),
        other => format!("{}", other),
    }
}

// =============================================================================
// Parsing Utilities
// =============================================================================

/// Parse a goal count written as integer or float-like text.
///
/// Returns `None` for empty, unparseable and non-finite input.
pub fn parse_score(s: &str) -> Option<f64> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// UTF-8 sequences that were decoded as Latin-1, and their repair.
pub const MOJIBAKE_REPAIRS: [(&str, &str); 10] = [
    ("Ã©", "é"),
    ("Ã¤", "ä"),
    ("Ã¶", "ö"),
    ("Ã¼", "ü"),
    ("Ã±", "ñ"),
    ("Ã¡", "á"),
    ("Ã³", "ó"),
    ("Ãº", "ú"),
    ("Ã¨", "è"),
    ("Ã§", "ç"),
];

/// Undo the known UTF-8-as-Latin-1 artifacts in a value.
pub fn repair_mojibake(value: &str) -> Cow<'_, str> {
    if !value.contains('Ã') {
        return Cow::Borrowed(value);
    }
    let mut repaired = value.to_string();
    for (broken, fixed) in MOJIBAKE_REPAIRS {
        if repaired.contains(broken) {
            repaired = repaired.replace(broken, fixed);
        }
    }
    Cow::Owned(repaired)
}

// =============================================================================
// Tests
// =============================================================================
