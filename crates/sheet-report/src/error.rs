//! Error types for spreadsheet analysis and report generation.
//!
//! Every fallible operation in the crate returns [`AnalysisError`]. Errors
//! serialize to a `{ code, message }` struct so they can be emitted as JSON
//! from the CLI next to the statistics output.

use serde::Serialize;
use serde::ser::SerializeStruct;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// The main error type for loading, charting and reporting.
#[derive(Error, Debug)]
pub enum AnalysisError {
    /// Path is missing, unreadable, or not writable.
    #[error("File error for '{}': {reason}", path.display())]
    File { path: PathBuf, reason: String },

    /// The workbook was opened but its sheet could not be read as a table.
    #[error("Format error in '{}': {reason}", path.display())]
    Format { path: PathBuf, reason: String },

    /// Invalid configuration provided.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Column was not found in the table.
    #[error("Column '{0}' not found in table")]
    ColumnNotFound(String),

    /// Drawing or encoding a chart failed.
    #[error("Failed to render {chart}: {reason}")]
    Render { chart: String, reason: String },

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Polars error wrapper.
    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error with context.
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<AnalysisError>,
    },
}

impl AnalysisError {
    /// Build a [`AnalysisError::File`] for `path`.
    pub fn file(path: impl AsRef<Path>, reason: impl ToString) -> Self {
        AnalysisError::File {
            path: path.as_ref().to_path_buf(),
            reason: reason.to_string(),
        }
    }

    /// Build a [`AnalysisError::Format`] for `path`.
    pub fn format(path: impl AsRef<Path>, reason: impl ToString) -> Self {
        AnalysisError::Format {
            path: path.as_ref().to_path_buf(),
            reason: reason.to_string(),
        }
    }

    /// Add context to an error.
    pub fn with_context(self, context: impl Into<String>) -> Self {
        AnalysisError::WithContext {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// Get a stable error code for machine-readable output.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::File { .. } => "FILE_ERROR",
            Self::Format { .. } => "FORMAT_ERROR",
            Self::InvalidConfig(_) => "INVALID_CONFIG",
            Self::ColumnNotFound(_) => "COLUMN_NOT_FOUND",
            Self::Render { .. } => "RENDER_FAILED",
            Self::Io(_) => "IO_ERROR",
            Self::Polars(_) => "POLARS_ERROR",
            Self::Json(_) => "JSON_ERROR",
            Self::WithContext { source, .. } => source.error_code(),
        }
    }

    /// Check if this error is a file error, looking through context wrappers.
    pub fn is_file_error(&self) -> bool {
        match self {
            Self::File { .. } => true,
            Self::WithContext { source, .. } => source.is_file_error(),
            _ => false,
        }
    }

    /// Check if this error is a format error, looking through context wrappers.
    pub fn is_format_error(&self) -> bool {
        match self {
            Self::Format { .. } => true,
            Self::WithContext { source, .. } => source.is_format_error(),
            _ => false,
        }
    }
}

impl Serialize for AnalysisError {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let mut state = serializer.serialize_struct("AnalysisError", 2)?;
        state.serialize_field("code", &self.error_code())?;
        state.serialize_field("message", &self.to_string())?;
        state.end()
    }
}

/// Result type alias for analysis operations.
pub type Result<T> = std::result::Result<T, AnalysisError>;

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
        self.map_err(|e| AnalysisError::Polars(e).with_context(context))
    }
}

impl<T> ResultExt<T> for std::io::Result<T> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| AnalysisError::Io(e).with_context(context))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code() {
        assert_eq!(
            AnalysisError::file("data.xlsx", "missing").error_code(),
            "FILE_ERROR"
        );
        assert_eq!(
            AnalysisError::ColumnNotFound("date".to_string()).error_code(),
            "COLUMN_NOT_FOUND"
        );
    }

    #[test]
    fn test_file_error_message_names_path() {
        let error = AnalysisError::file("reports/final_report.md", "permission denied");
        let message = error.to_string();
        assert!(message.contains("reports/final_report.md"));
        assert!(message.contains("permission denied"));
    }

    #[test]
    fn test_kind_checks_see_through_context() {
        let error =
            AnalysisError::format("book.xlsx", "no worksheet").with_context("Loading table");
        assert!(error.is_format_error());
        assert!(!error.is_file_error());
        assert_eq!(error.error_code(), "FORMAT_ERROR");
    }

    #[test]
    fn test_error_serialization() {
        let error = AnalysisError::Render {
            chart: "pie_chart".to_string(),
            reason: "backend closed".to_string(),
        };
        let json = serde_json::to_string(&error).unwrap();
        assert!(json.contains("RENDER_FAILED"));
        assert!(json.contains("pie_chart"));
    }

    #[test]
    fn test_io_result_context() {
        let result: std::io::Result<()> =
            Err(std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"));
        let error = result.context("Writing stats.json").unwrap_err();
        assert_eq!(error.error_code(), "IO_ERROR");
        assert!(error.to_string().contains("Writing stats.json"));
    }

    #[test]
    fn test_with_context() {
        let error =
            AnalysisError::InvalidConfig("bins".to_string()).with_context("Building config");
        assert!(error.to_string().contains("Building config"));
        assert_eq!(error.error_code(), "INVALID_CONFIG");
    }
}
