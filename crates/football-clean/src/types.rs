use serde::{Deserialize, Serialize};

// ============================================================================
// Recoverable Issues
// ============================================================================

/// Kind of a condition the engine recovered from without failing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueKind {
    /// A score could not be read as a non-negative number and was replaced.
    ScoreCoercion,
    /// A categorical column had no valid value to take the mode of.
    UndefinedMode,
    /// A date could not be parsed and now holds the invalid-date marker.
    UnparseableDate,
    /// A `neutral` value was neither `TRUE` nor `FALSE`.
    UnmappedBoolean,
    /// Normalizing a whole column failed; the column was left unchanged.
    ColumnFailed,
}

/// A recovered condition, tied to the column and row it occurred in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CleaningIssue {
    pub column: String,
    /// Row index in the working table, absent for column-wide issues.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub row: Option<usize>,
    pub kind: IssueKind,
    /// The offending value as it appeared before recovery.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    pub message: String,
}

impl CleaningIssue {
    pub fn new(column: impl Into<String>, kind: IssueKind, message: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            row: None,
            kind,
            value: None,
            message: message.into(),
        }
    }

    pub fn at_row(mut self, row: usize) -> Self {
        self.row = Some(row);
        self
    }

    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into());
        self
    }
}

// ============================================================================
// Remediation
// ============================================================================

/// Fill policy the remediator applied to a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FillPolicy {
    /// Missing or unparseable scores replaced by the score default.
    NumericDefault,
    /// Missing flags replaced by the false token.
    BooleanDefault,
    /// Missing categories replaced by the column mode.
    Mode,
    /// No valid value in the column; the column-specific default was used.
    ColumnDefault,
}

/// One column the remediator acted upon.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FillAction {
    pub column: String,
    pub policy: FillPolicy,
    pub cells_changed: usize,
    pub fill_value: String,
}

impl std::fmt::Display for FillAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let how = match self.policy {
            FillPolicy::NumericDefault => "default",
            FillPolicy::BooleanDefault => "default",
            FillPolicy::Mode => "mode",
            FillPolicy::ColumnDefault => "column default",
        };
        write!(
            f,
            "Replaced {} missing values in '{}' with {}: '{}'",
            self.cells_changed, self.column, how, self.fill_value
        )
    }
}

/// Result of the remediation stage.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RemediationOutcome {
    pub actions: Vec<FillAction>,
    pub issues: Vec<CleaningIssue>,
}

impl RemediationOutcome {
    /// Total number of cells rewritten.
    pub fn cells_changed(&self) -> usize {
        self.actions.iter().map(|a| a.cells_changed).sum()
    }
}

// ============================================================================
// Normalization
// ============================================================================

/// One column the normalizer converted or rewrote.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnConversion {
    pub column: String,
    pub target_type: String,
    /// Cells whose value differs from the pre-normalization value
    /// (type changes alone do not count).
    pub cells_changed: usize,
}

/// Result of the normalization stage.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NormalizationOutcome {
    pub conversions: Vec<ColumnConversion>,
    pub issues: Vec<CleaningIssue>,
}

impl NormalizationOutcome {
    /// Number of issues of one kind.
    pub fn count(&self, kind: IssueKind) -> usize {
        self.issues.iter().filter(|i| i.kind == kind).count()
    }
}
