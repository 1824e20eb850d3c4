//! Configuration types for the cleaning engine.
//!
//! This module provides configuration options using the builder pattern.
//! Every default reproduces the reference cleaning policy for the match
//! dataset; callers only override what their source file does differently.

use crate::schema::MatchColumn;
use crate::utils::{DEFAULT_NULL_TOKENS, NullTokens};
use serde::{Deserialize, Serialize};

/// Date formats tried, in order, when parsing the `date` column.
pub const DEFAULT_DATE_FORMATS: [&str; 6] = [
    "%Y-%m-%d", "%Y/%m/%d", "%d/%m/%Y", "%m/%d/%Y", "%d-%m-%Y", "%d.%m.%Y",
];

/// Date-time formats tried after the plain date formats.
pub const DEFAULT_DATETIME_FORMATS: [&str; 3] =
    ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M"];

/// Configuration for a cleaning session.
///
/// Use [`CleaningConfig::builder()`] to create a new configuration
/// with fluent API.
///
/// # Example
///
/// ```rust,ignore
/// use football_clean::config::CleaningConfig;
///
/// let config = CleaningConfig::builder()
///     .sample_rows(5)
///     .tournament_fallback("Unknown Competition")
///     .build()?;
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CleaningConfig {
    /// Text literals treated as missing, in addition to nulls.
    /// Matching is exact and case-sensitive.
    pub null_tokens: Vec<String>,

    /// Goal count used when a score is missing or cannot be parsed.
    /// Default: 0
    pub score_default: i64,

    /// Literal written into missing `neutral` cells before type normalization.
    /// Default: "FALSE"
    pub neutral_default: String,

    /// Fallback for `home_team`/`away_team` when the column has no valid value.
    /// Default: "Unknown Team"
    pub team_fallback: String,

    /// Fallback for `tournament` when the column has no valid value.
    /// Default: "Friendly"
    pub tournament_fallback: String,

    /// Fallback for `city`/`country` when the column has no valid value.
    /// Default: "Unknown"
    pub location_fallback: String,

    /// Fallback for any other text column.
    /// Default: "Unknown"
    pub generic_fallback: String,

    /// Maximum number of rows with missing values shown in the audit report.
    /// Default: 10
    pub sample_rows: usize,

    /// `chrono` formats tried, in order, for the `date` column.
    pub date_formats: Vec<String>,

    /// `chrono` date-time formats tried after `date_formats`.
    pub datetime_formats: Vec<String>,

    /// Whether to repair UTF-8-as-Latin-1 artifacts in text columns.
    /// Default: true
    pub repair_encoding: bool,
}

impl Default for CleaningConfig {
    fn default() -> Self {
        Self {
            null_tokens: DEFAULT_NULL_TOKENS.iter().map(|s| s.to_string()).collect(),
            score_default: 0,
            neutral_default: "FALSE".to_string(),
            team_fallback: "Unknown Team".to_string(),
            tournament_fallback: "Friendly".to_string(),
            location_fallback: "Unknown".to_string(),
            generic_fallback: "Unknown".to_string(),
            sample_rows: 10,
            date_formats: DEFAULT_DATE_FORMATS.iter().map(|s| s.to_string()).collect(),
            datetime_formats: DEFAULT_DATETIME_FORMATS
                .iter()
                .map(|s| s.to_string())
                .collect(),
            repair_encoding: true,
        }
    }
}

impl CleaningConfig {
    /// Create a new configuration builder.
    pub fn builder() -> CleaningConfigBuilder {
        CleaningConfigBuilder::default()
    }

    /// The configured missing-value tokens as a lookup set.
    pub fn tokens(&self) -> NullTokens {
        NullTokens::new(self.null_tokens.iter().cloned())
    }

    /// Value used by the generic sweep when a text column has no valid value.
    pub fn fallback_for(&self, column: &str) -> &str {
        match MatchColumn::from_name(column) {
            Some(MatchColumn::HomeTeam | MatchColumn::AwayTeam) => &self.team_fallback,
            Some(MatchColumn::Tournament) => &self.tournament_fallback,
            Some(MatchColumn::City | MatchColumn::Country) => &self.location_fallback,
            Some(MatchColumn::Neutral) => &self.neutral_default,
            _ => &self.generic_fallback,
        }
    }

    /// Validate the configuration and return errors if invalid.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if self.score_default < 0 {
            return Err(ConfigValidationError::NegativeScoreDefault(
                self.score_default,
            ));
        }

        if self.neutral_default != "TRUE" && self.neutral_default != "FALSE" {
            return Err(ConfigValidationError::InvalidNeutralDefault(
                self.neutral_default.clone(),
            ));
        }

        let tokens = self.tokens();
        for (field, value) in [
            ("team_fallback", &self.team_fallback),
            ("tournament_fallback", &self.tournament_fallback),
            ("location_fallback", &self.location_fallback),
            ("generic_fallback", &self.generic_fallback),
        ] {
            if tokens.contains(value) {
                return Err(ConfigValidationError::FallbackIsNullToken {
                    field: field.to_string(),
                    value: value.clone(),
                });
            }
        }

        if self.sample_rows == 0 {
            return Err(ConfigValidationError::InvalidSampleRows(self.sample_rows));
        }

        if self.date_formats.is_empty() {
            return Err(ConfigValidationError::NoDateFormats);
        }

        Ok(())
    }
}

/// Errors that can occur during configuration validation.
#[derive(Debug, thiserror::Error)]
pub enum ConfigValidationError {
    #[error("Invalid score default: {0} (goal counts cannot be negative)")]
    NegativeScoreDefault(i64),

    #[error("Invalid neutral default: '{0}' (must be \"TRUE\" or \"FALSE\")")]
    InvalidNeutralDefault(String),

    #[error("Fallback '{field}' is itself a missing-value token: '{value}'")]
    FallbackIsNullToken { field: String, value: String },

    #[error("Invalid sample rows: {0} (must be at least 1)")]
    InvalidSampleRows(usize),

    #[error("At least one date format is required")]
    NoDateFormats,
}

/// Builder for [`CleaningConfig`] with fluent API.
#[derive(Debug, Default)]
pub struct CleaningConfigBuilder {
    null_tokens: Option<Vec<String>>,
    score_default: Option<i64>,
    neutral_default: Option<String>,
    team_fallback: Option<String>,
    tournament_fallback: Option<String>,
    location_fallback: Option<String>,
    generic_fallback: Option<String>,
    sample_rows: Option<usize>,
    date_formats: Option<Vec<String>>,
    datetime_formats: Option<Vec<String>>,
    repair_encoding: Option<bool>,
}

impl CleaningConfigBuilder {
    /// Replace the set of text literals treated as missing.
    pub fn null_tokens<I, S>(mut self, tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.null_tokens = Some(tokens.into_iter().map(Into::into).collect());
        self
    }

    /// Set the goal count used for missing or unparseable scores.
    pub fn score_default(mut self, value: i64) -> Self {
        self.score_default = Some(value);
        self
    }

    /// Set the literal written into missing `neutral` cells.
    pub fn neutral_default(mut self, value: impl Into<String>) -> Self {
        self.neutral_default = Some(value.into());
        self
    }

    pub fn team_fallback(mut self, value: impl Into<String>) -> Self {
        self.team_fallback = Some(value.into());
        self
    }

    pub fn tournament_fallback(mut self, value: impl Into<String>) -> Self {
        self.tournament_fallback = Some(value.into());
        self
    }

    pub fn location_fallback(mut self, value: impl Into<String>) -> Self {
        self.location_fallback = Some(value.into());
        self
    }

    pub fn generic_fallback(mut self, value: impl Into<String>) -> Self {
        self.generic_fallback = Some(value.into());
        self
    }

    /// Set how many rows with missing values the audit report shows.
    pub fn sample_rows(mut self, rows: usize) -> Self {
        self.sample_rows = Some(rows);
        self
    }

    /// Replace the list of date formats tried for the `date` column.
    ///
    /// Formats use `chrono` syntax and are tried in order.
    pub fn date_formats<I, S>(mut self, formats: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.date_formats = Some(formats.into_iter().map(Into::into).collect());
        self
    }

    pub fn datetime_formats<I, S>(mut self, formats: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.datetime_formats = Some(formats.into_iter().map(Into::into).collect());
        self
    }

    /// Enable or disable the mojibake repair of text columns.
    pub fn repair_encoding(mut self, enable: bool) -> Self {
        self.repair_encoding = Some(enable);
        self
    }

    /// Build the configuration.
    ///
    /// Returns a validated `CleaningConfig` or an error if validation fails.
    pub fn build(self) -> Result<CleaningConfig, ConfigValidationError> {
        let defaults = CleaningConfig::default();
        let config = CleaningConfig {
            null_tokens: self.null_tokens.unwrap_or(defaults.null_tokens),
            score_default: self.score_default.unwrap_or(defaults.score_default),
            neutral_default: self.neutral_default.unwrap_or(defaults.neutral_default),
            team_fallback: self.team_fallback.unwrap_or(defaults.team_fallback),
            tournament_fallback: self
                .tournament_fallback
                .unwrap_or(defaults.tournament_fallback),
            location_fallback: self.location_fallback.unwrap_or(defaults.location_fallback),
            generic_fallback: self.generic_fallback.unwrap_or(defaults.generic_fallback),
            sample_rows: self.sample_rows.unwrap_or(defaults.sample_rows),
            date_formats: self.date_formats.unwrap_or(defaults.date_formats),
            datetime_formats: self.datetime_formats.unwrap_or(defaults.datetime_formats),
            repair_encoding: self.repair_encoding.unwrap_or(defaults.repair_encoding),
        };

        config.validate()?;
        Ok(config)
    }
}
