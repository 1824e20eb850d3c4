//! Missing-value remediation.
//!
//! Fills storage nulls and missing-value tokens column by column, in a fixed
//! order:
//!
//! 1. scores: numeric coercion, missing or unparseable values become the
//!    score default
//! 2. `neutral`: nulls become the false token
//! 3. categorical columns: nulls and tokens become the column mode
//! 4. every text column except `date`: whatever is still missing becomes the
//!    column mode, or the column default when no valid value exists
//!
//! Missing dates are never imputed; normalization turns them into nulls.
//!
//! Rows are never added or removed.

use crate::config::CleaningConfig;
use crate::error::Result;
use crate::schema::MatchColumn;
use crate::types::{CleaningIssue, FillAction, FillPolicy, IssueKind, RemediationOutcome};
use crate::utils::{NullTokens, fill_string_where, is_numeric_dtype, parse_score, valid_string_mode};
use polars::prelude::*;
use tracing::{debug, info, warn};

/// Remediator that replaces missing values using column-specific policies.
pub struct MissingValueRemediator<'a> {
    config: &'a CleaningConfig,
    tokens: NullTokens,
}

impl<'a> MissingValueRemediator<'a> {
    pub fn new(config: &'a CleaningConfig) -> Self {
        Self {
            config,
            tokens: config.tokens(),
        }
    }

    /// Remediate the table in place.
    ///
    /// Running this twice on the same table changes nothing the second time.
    pub fn remediate(&self, df: &mut DataFrame) -> Result<RemediationOutcome> {
        info!("Starting missing-value remediation for {} rows", df.height());
        let mut outcome = RemediationOutcome::default();

        for column in MatchColumn::SCORES {
            self.fill_scores(df, column.name(), &mut outcome)?;
        }

        self.fill_neutral(df, &mut outcome)?;

        for column in MatchColumn::CATEGORICAL {
            self.fill_with_mode(df, column.name(), &mut outcome)?;
        }

        self.sweep_text_columns(df, &mut outcome)?;

        info!(
            "Remediation complete: {} cells changed in {} steps",
            outcome.cells_changed(),
            outcome.actions.len()
        );
        Ok(outcome)
    }

    /// Step 1: coerce a score column to numbers, replacing what cannot be read.
    fn fill_scores(
        &self,
        df: &mut DataFrame,
        name: &str,
        outcome: &mut RemediationOutcome,
    ) -> Result<()> {
        let Ok(column) = df.column(name) else {
            debug!("Score column '{}' not present, skipping", name);
            return Ok(());
        };
        let series = column.as_materialized_series().clone();
        let default = self.config.score_default;
        let mut replaced = 0;

        let filled = match series.dtype() {
            DataType::String => {
                let mut values: Vec<Option<f64>> = Vec::with_capacity(series.len());
                for (row, opt_val) in series.str()?.into_iter().enumerate() {
                    match opt_val {
                        Some(raw) if !self.tokens.contains(raw) => match parse_score(raw) {
                            Some(v) => values.push(Some(v)),
                            None => {
                                replaced += 1;
                                values.push(Some(default as f64));
                                outcome.issues.push(
                                    CleaningIssue::new(
                                        name,
                                        IssueKind::ScoreCoercion,
                                        format!("'{}' is not a number, replaced with {}", raw, default),
                                    )
                                    .at_row(row)
                                    .with_value(raw),
                                );
                            }
                        },
                        _ => {
                            replaced += 1;
                            values.push(Some(default as f64));
                        }
                    }
                }
                Series::new(series.name().clone(), values)
            }
            DataType::Float32 | DataType::Float64 => {
                let floats = series.cast(&DataType::Float64)?;
                let values: Vec<Option<f64>> = floats
                    .f64()?
                    .into_iter()
                    .map(|opt_val| match opt_val {
                        Some(v) if !v.is_nan() => Some(v),
                        _ => {
                            replaced += 1;
                            Some(default as f64)
                        }
                    })
                    .collect();
                Series::new(series.name().clone(), values)
            }
            dtype if is_numeric_dtype(dtype) => {
                let ints = series.cast(&DataType::Int64)?;
                let values: Vec<Option<i64>> = ints
                    .i64()?
                    .into_iter()
                    .map(|opt_val| {
                        Some(opt_val.unwrap_or_else(|| {
                            replaced += 1;
                            default
                        }))
                    })
                    .collect();
                Series::new(series.name().clone(), values)
            }
            other => {
                debug!("Score column '{}' has dtype {}, skipping", name, other);
                return Ok(());
            }
        };

        df.replace(name, filled)?;
        if replaced > 0 {
            self.record(
                outcome,
                FillAction {
                    column: name.to_string(),
                    policy: FillPolicy::NumericDefault,
                    cells_changed: replaced,
                    fill_value: default.to_string(),
                },
            );
        } else {
            debug!("No missing values in '{}'", name);
        }
        Ok(())
    }

    /// Step 2: nulls in `neutral` become the false token.
    ///
    /// Tokens such as `"N/A"` are left for the sweep.
    fn fill_neutral(&self, df: &mut DataFrame, outcome: &mut RemediationOutcome) -> Result<()> {
        let name = MatchColumn::Neutral.name();
        let Ok(column) = df.column(name) else {
            return Ok(());
        };
        let series = column.as_materialized_series().clone();
        if series.null_count() == 0 {
            debug!("No missing values in '{}'", name);
            return Ok(());
        }

        let fill_token = self.config.neutral_default.as_str();
        let (filled, replaced) = match series.dtype() {
            DataType::Boolean => {
                let fill = fill_token == "TRUE";
                let mut replaced = 0;
                let values: Vec<Option<bool>> = series
                    .bool()?
                    .into_iter()
                    .map(|opt_val| {
                        Some(opt_val.unwrap_or_else(|| {
                            replaced += 1;
                            fill
                        }))
                    })
                    .collect();
                (Series::new(series.name().clone(), values), replaced)
            }
            DataType::String => fill_string_where(&series, fill_token, |v| v.is_none())?,
            other => {
                debug!("Column '{}' has dtype {}, skipping", name, other);
                return Ok(());
            }
        };

        df.replace(name, filled)?;
        self.record(
            outcome,
            FillAction {
                column: name.to_string(),
                policy: FillPolicy::BooleanDefault,
                cells_changed: replaced,
                fill_value: fill_token.to_string(),
            },
        );
        Ok(())
    }

    /// Step 3: nulls and tokens in a categorical column become its mode.
    fn fill_with_mode(
        &self,
        df: &mut DataFrame,
        name: &str,
        outcome: &mut RemediationOutcome,
    ) -> Result<()> {
        let Some(series) = self.text_column(df, name) else {
            return Ok(());
        };
        if self.count_missing(&series)? == 0 {
            debug!("No missing values in '{}'", name);
            return Ok(());
        }

        match valid_string_mode(&series, &self.tokens)? {
            Some(mode) => {
                let (filled, replaced) =
                    fill_string_where(&series, &mode, |v| self.tokens.is_missing(v))?;
                df.replace(name, filled)?;
                self.record(
                    outcome,
                    FillAction {
                        column: name.to_string(),
                        policy: FillPolicy::Mode,
                        cells_changed: replaced,
                        fill_value: mode,
                    },
                );
            }
            None => {
                warn!("No valid values in '{}' to compute the mode", name);
                outcome.issues.push(CleaningIssue::new(
                    name,
                    IssueKind::UndefinedMode,
                    format!("'{}' has no valid values, mode is undefined", name),
                ));
            }
        }
        Ok(())
    }

    /// Step 4: fill whatever is still missing in every text column but `date`.
    fn sweep_text_columns(&self, df: &mut DataFrame, outcome: &mut RemediationOutcome) -> Result<()> {
        let text_columns: Vec<String> = df
            .get_columns()
            .iter()
            .filter(|col| col.dtype() == &DataType::String)
            .filter(|col| col.name().as_str() != MatchColumn::Date.name())
            .map(|col| col.name().to_string())
            .collect();

        for name in &text_columns {
            let Some(series) = self.text_column(df, name) else {
                continue;
            };
            if self.count_missing(&series)? == 0 {
                continue;
            }

            let (fill_value, policy) = match valid_string_mode(&series, &self.tokens)? {
                Some(mode) => (mode, FillPolicy::Mode),
                None => (
                    self.config.fallback_for(name).to_string(),
                    FillPolicy::ColumnDefault,
                ),
            };

            let (filled, replaced) =
                fill_string_where(&series, &fill_value, |v| self.tokens.is_missing(v))?;
            df.replace(name, filled)?;
            self.record(
                outcome,
                FillAction {
                    column: name.clone(),
                    policy,
                    cells_changed: replaced,
                    fill_value,
                },
            );
        }
        Ok(())
    }

    fn text_column(&self, df: &DataFrame, name: &str) -> Option<Series> {
        let column = df.column(name).ok()?;
        if column.dtype() != &DataType::String {
            debug!("Column '{}' is not text, skipping", name);
            return None;
        }
        Some(column.as_materialized_series().clone())
    }

    fn count_missing(&self, series: &Series) -> Result<usize> {
        Ok(series
            .str()?
            .into_iter()
            .filter(|v| self.tokens.is_missing(*v))
            .count())
    }

    fn record(&self, outcome: &mut RemediationOutcome, action: FillAction) {
        info!("{}", action);
        outcome.actions.push(action);
    }
}
