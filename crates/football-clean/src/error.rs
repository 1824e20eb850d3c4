//! Custom error types for the match cleaning engine.
//!
//! Only conditions the engine cannot recover from are errors. Coercion
//! failures, undefined modes and unmapped flags are recovered in place and
//! surface as [`crate::types::CleaningIssue`] entries instead.
//!
//! Errors serialize as `{ code, message }` so they can be embedded in the
//! JSON report.

use serde::Serialize;
use serde::ser::SerializeStruct;
use thiserror::Error;

/// The main error type for the cleaning engine.
#[derive(Error, Debug)]
pub enum CleaningError {
    /// A required column is absent from the input table.
    #[error("Column '{0}' not found in dataset")]
    ColumnNotFound(String),

    /// Invalid configuration provided.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// A column has a dtype that cannot be brought into the expected schema.
    #[error("Column '{column}' has type {found}, expected {expected}")]
    SchemaMismatch {
        column: String,
        expected: String,
        found: String,
    },

    /// A session stage was invoked before the stage it depends on.
    #[error("Stage order violated: {0}")]
    StageOrder(String),

    /// A broken engine invariant (e.g. a stage changed the row count).
    #[error("Internal error: {0}")]
    Internal(String),

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Polars error wrapper.
    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error with context.
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<CleaningError>,
    },
}

impl CleaningError {
    /// Add context to an error.
    pub fn with_context(self, context: impl Into<String>) -> Self {
        CleaningError::WithContext {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// Stable error code, preserved through [`CleaningError::with_context`].
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::ColumnNotFound(_) => "COLUMN_NOT_FOUND",
            Self::InvalidConfig(_) => "INVALID_CONFIG",
            Self::SchemaMismatch { .. } => "SCHEMA_MISMATCH",
            Self::StageOrder(_) => "STAGE_ORDER",
            Self::Internal(_) => "INTERNAL_ERROR",
            Self::Io(_) => "IO_ERROR",
            Self::Polars(_) => "POLARS_ERROR",
            Self::Json(_) => "JSON_ERROR",
            Self::WithContext { source, .. } => source.error_code(),
        }
    }

    /// Whether the error was caused by the input rather than by the engine.
    pub fn is_input_error(&self) -> bool {
        match self {
            Self::ColumnNotFound(_) | Self::SchemaMismatch { .. } | Self::InvalidConfig(_) => {
                true
            }
            Self::WithContext { source, .. } => source.is_input_error(),
            _ => false,
        }
    }
}

impl Serialize for CleaningError {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let mut state = serializer.serialize_struct("CleaningError", 2)?;
        state.serialize_field("code", &self.error_code())?;
        state.serialize_field("message", &self.to_string())?;
        state.end()
    }
}

/// Result type alias for cleaning operations.
pub type Result<T> = std::result::Result<T, CleaningError>;

/// Extension trait for adding context to Results.
pub trait ResultExt<T> {
    /// Add context to an error result.
    fn context(self, context: impl Into<String>) -> Result<T>;
}

impl<T> ResultExt<T> for Result<T> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.with_context(context))
    }
}

impl<T> ResultExt<T> for std::result::Result<T, polars::error::PolarsError> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| CleaningError::Polars(e).with_context(context))
    }
}

impl<T> ResultExt<T> for std::result::Result<T, std::io::Error> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| CleaningError::Io(e).with_context(context))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code() {
        assert_eq!(
            CleaningError::ColumnNotFound("date".to_string()).error_code(),
            "COLUMN_NOT_FOUND"
        );
        assert_eq!(
            CleaningError::Internal("rows lost".to_string()).error_code(),
            "INTERNAL_ERROR"
        );
    }

    #[test]
    fn test_is_input_error() {
        assert!(CleaningError::ColumnNotFound("city".to_string()).is_input_error());
        assert!(
            CleaningError::SchemaMismatch {
                column: "neutral".to_string(),
                expected: "bool or str".to_string(),
                found: "list[i64]".to_string(),
            }
            .is_input_error()
        );
        assert!(!CleaningError::Internal("x".to_string()).is_input_error());
    }

    #[test]
    fn test_error_serialization() {
        let error = CleaningError::ColumnNotFound("home_team".to_string());
        let json = serde_json::to_string(&error).unwrap();
        assert!(json.contains("COLUMN_NOT_FOUND"));
        assert!(json.contains("home_team"));
    }

    #[test]
    fn test_with_context() {
        let error = CleaningError::ColumnNotFound("date".to_string())
            .with_context("While validating input schema");
        assert!(error.to_string().contains("While validating input schema"));
        assert_eq!(error.error_code(), "COLUMN_NOT_FOUND");
        assert!(error.is_input_error());
    }

    #[test]
    fn test_io_context() {
        let io: std::result::Result<(), std::io::Error> = Err(std::io::Error::new(
            std::io::ErrorKind::PermissionDenied,
            "read-only",
        ));
        let err = io.context("Exporting cleaned data").unwrap_err();
        assert_eq!(err.error_code(), "IO_ERROR");
        assert!(err.to_string().starts_with("Exporting cleaned data"));
    }
}
