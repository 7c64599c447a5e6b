//! Custom error types for the catalog pipeline.
//!
//! This module provides the error hierarchy using `thiserror`. Record-level
//! faults carry the zero-based input row index so a terminating error always
//! identifies the offending record, and [`ResultExt::context`] attaches the
//! failing stage.
//!
//! Errors are serializable so a presentation layer can display them as
//! `{ code, message }`.

use serde::Serialize;
use serde::ser::SerializeStruct;
use thiserror::Error;

/// The main error type for the catalog pipeline.
#[derive(Error, Debug)]
pub enum CatalogError {
    /// Mode imputation was required on a column with no observed values.
    #[error("Column '{column}' has no non-missing values to impute from")]
    EmptyColumn { column: String },

    /// Duration text matched neither a digit run nor a season form.
    #[error("Row {row}: unparsable duration '{value}'")]
    UnparsableDuration { row: usize, value: String },

    /// Content type outside the known variants.
    #[error("Row {row}: unmapped content type '{value}'")]
    UnmappedType { row: usize, value: String },

    /// A field that cannot be repaired was absent.
    #[error("Row {row}: required field '{column}' is missing")]
    MissingRequiredField { row: usize, column: String },

    /// Column was not found in the input frame.
    #[error("Column '{0}' not found in dataset")]
    ColumnNotFound(String),

    /// Invalid configuration provided.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Internal error.
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
        source: Box<CatalogError>,
    },
}

impl CatalogError {
    /// Add context to an error.
    pub fn with_context(self, context: impl Into<String>) -> Self {
        CatalogError::WithContext {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// Get error code for frontend handling.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::EmptyColumn { .. } => "EMPTY_COLUMN",
            Self::UnparsableDuration { .. } => "UNPARSABLE_DURATION",
            Self::UnmappedType { .. } => "UNMAPPED_TYPE",
            Self::MissingRequiredField { .. } => "MISSING_REQUIRED_FIELD",
            Self::ColumnNotFound(_) => "COLUMN_NOT_FOUND",
            Self::InvalidConfig(_) => "INVALID_CONFIG",
            Self::Internal(_) => "INTERNAL_ERROR",
            Self::Io(_) => "IO_ERROR",
            Self::Polars(_) => "POLARS_ERROR",
            Self::Json(_) => "JSON_ERROR",
            Self::WithContext { source, .. } => source.error_code(),
        }
    }

    /// Row index of the offending record, if the error concerns one record.
    pub fn row(&self) -> Option<usize> {
        match self {
            Self::UnparsableDuration { row, .. }
            | Self::UnmappedType { row, .. }
            | Self::MissingRequiredField { row, .. } => Some(*row),
            Self::WithContext { source, .. } => source.row(),
            _ => None,
        }
    }

    /// Check if this error concerns a single record.
    ///
    /// Record faults may be dropped and reported under
    /// [`ErrorMode::Lenient`](crate::config::ErrorMode::Lenient); everything
    /// else always terminates the run.
    pub fn is_record_fault(&self) -> bool {
        self.row().is_some()
    }
}

/// Serialize implementation for presentation-layer display.
///
/// Errors are serialized as a struct with `code` and `message` fields.
impl Serialize for CatalogError {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let mut state = serializer.serialize_struct("CatalogError", 2)?;
        state.serialize_field("code", &self.error_code())?;
        state.serialize_field("message", &self.to_string())?;
        state.end()
    }
}

/// Result type alias for catalog operations.
pub type Result<T> = std::result::Result<T, CatalogError>;

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
        self.map_err(|e| CatalogError::Polars(e).with_context(context))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code() {
        assert_eq!(
            CatalogError::EmptyColumn {
                column: "country".to_string()
            }
            .error_code(),
            "EMPTY_COLUMN"
        );
        assert_eq!(
            CatalogError::ColumnNotFound("title".to_string()).error_code(),
            "COLUMN_NOT_FOUND"
        );
    }

    #[test]
    fn test_record_fault_detection() {
        let fault = CatalogError::UnmappedType {
            row: 4,
            value: "Podcast".to_string(),
        };
        assert!(fault.is_record_fault());
        assert_eq!(fault.row(), Some(4));

        let run_level = CatalogError::EmptyColumn {
            column: "country".to_string(),
        };
        assert!(!run_level.is_record_fault());
    }

    #[test]
    fn test_error_serialization() {
        let error = CatalogError::UnparsableDuration {
            row: 2,
            value: "forever".to_string(),
        };
        let json = serde_json::to_string(&error).unwrap();
        assert!(json.contains("UNPARSABLE_DURATION"));
        assert!(json.contains("forever"));
    }

    #[test]
    fn test_with_context() {
        let error = CatalogError::MissingRequiredField {
            row: 7,
            column: "title".to_string(),
        }
        .with_context("During field repair");
        assert!(error.to_string().contains("During field repair"));
        assert!(error.to_string().contains("Row 7"));
        // Context preserves the original code and row
        assert_eq!(error.error_code(), "MISSING_REQUIRED_FIELD");
        assert_eq!(error.row(), Some(7));
    }
}
