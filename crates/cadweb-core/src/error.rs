//! Error types for cadweb-core
//!
//! Every failure while loading or querying a data file maps to a
//! [`CoreError`], which carries a stable [`ErrorCode`] for API responses.

use cadweb_parser::ParseError;
use polars::prelude::PolarsError;
use thiserror::Error;
use serde::{Deserialize, Serialize};
use std::io;

/// Error codes for programmatic error handling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Data file does not exist
    FileNotFound,
    /// Data file could not be read or parsed
    ParseError,
    /// A referenced column is not in the file header
    MissingColumn,
    /// page/limit out of range
    InvalidPagination,
    /// Configuration error
    ConfigError,
    /// IO error
    IoError,
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorCode::FileNotFound => write!(f, "FILE_NOT_FOUND"),
            ErrorCode::ParseError => write!(f, "PARSE_ERROR"),
            ErrorCode::MissingColumn => write!(f, "MISSING_COLUMN"),
            ErrorCode::InvalidPagination => write!(f, "INVALID_PAGINATION"),
            ErrorCode::ConfigError => write!(f, "CONFIG_ERROR"),
            ErrorCode::IoError => write!(f, "IO_ERROR"),
        }
    }
}

/// Detailed error information for API responses
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorDetails {
    /// Error code
    pub code: ErrorCode,
    /// Human-readable message
    pub message: String,
    /// Additional details
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
    /// Suggestions for resolution
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub suggestions: Vec<String>,
}

impl ErrorDetails {
    /// Create a new error detail
    pub fn new(code: ErrorCode, message: String) -> Self {
        Self {
            code,
            message,
            details: None,
            suggestions: vec![],
        }
    }

    /// Add detail information
    pub fn with_detail(mut self, detail: serde_json::Value) -> Self {
        self.details = Some(detail);
        self
    }

    /// Add a suggestion
    pub fn with_suggestion(mut self, suggestion: String) -> Self {
        self.suggestions.push(suggestion);
        self
    }
}

/// Error severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorSeverity {
    /// Caller mistake, service is fine
    Warning,
    /// Request failed because of data or environment
    Error,
}

/// Main error type for cadweb-core
#[derive(Error, Debug)]
pub enum CoreError {
    #[error("File not found: {path}")]
    FileNotFound { path: String },

    #[error("Parse error: {message}")]
    ParseError { message: String },

    #[error("Column not found: {column}")]
    MissingColumn { column: String, available: Vec<String> },

    #[error("Invalid {field}: {reason}")]
    InvalidPagination { field: String, reason: String },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("IO error: {0}")]
    IoError(#[from] io::Error),
}

impl CoreError {
    /// Get the error code
    pub fn code(&self) -> ErrorCode {
        match self {
            CoreError::FileNotFound { .. } => ErrorCode::FileNotFound,
            CoreError::ParseError { .. } => ErrorCode::ParseError,
            CoreError::MissingColumn { .. } => ErrorCode::MissingColumn,
            CoreError::InvalidPagination { .. } => ErrorCode::InvalidPagination,
            CoreError::ConfigError { .. } => ErrorCode::ConfigError,
            CoreError::IoError(_) => ErrorCode::IoError,
        }
    }

    /// Get the severity level
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            CoreError::InvalidPagination { .. } => ErrorSeverity::Warning,
            _ => ErrorSeverity::Error,
        }
    }

    /// Convert to detailed error info
    pub fn to_details(&self) -> ErrorDetails {
        let mut details = ErrorDetails::new(self.code(), self.to_string());

        match self {
            CoreError::FileNotFound { path } => {
                details = details.with_suggestion(format!(
                    "Place '{}' in the data directory or set data.path in the config.",
                    path
                ));
            }
            CoreError::ParseError { .. } => {
                details = details.with_suggestion(
                    "Check the delimiter and encoding candidates under loader.candidates.".to_string()
                );
            }
            CoreError::MissingColumn { available, .. } => {
                details = details.with_detail(serde_json::json!({ "available_columns": available }));
            }
            CoreError::InvalidPagination { field, .. } => {
                details = details.with_detail(serde_json::json!({ "field": field }));
            }
            _ => {}
        }

        details
    }
}

/// Result type with CoreError
pub type CoreResult<T> = Result<T, CoreError>;

impl From<ParseError> for CoreError {
    fn from(error: ParseError) -> Self {
        match error {
            ParseError::Io { path, source } if source.kind() == io::ErrorKind::NotFound => {
                CoreError::FileNotFound { path }
            }
            ParseError::Io { source, .. } => CoreError::IoError(source),
            other => CoreError::ParseError { message: other.to_string() },
        }
    }
}

impl From<PolarsError> for CoreError {
    fn from(error: PolarsError) -> Self {
        CoreError::ParseError { message: error.to_string() }
    }
}

// ==================== Tests ====================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_display() {
        assert_eq!(ErrorCode::FileNotFound.to_string(), "FILE_NOT_FOUND");
        assert_eq!(ErrorCode::MissingColumn.to_string(), "MISSING_COLUMN");
        assert_eq!(ErrorCode::InvalidPagination.to_string(), "INVALID_PAGINATION");
    }

    #[test]
    fn test_core_error_severity() {
        let error = CoreError::InvalidPagination {
            field: "page".to_string(),
            reason: "must be at least 1".to_string(),
        };
        assert_eq!(error.severity(), ErrorSeverity::Warning);

        let error = CoreError::MissingColumn { column: "UF".to_string(), available: vec![] };
        assert_eq!(error.severity(), ErrorSeverity::Error);
    }

    #[test]
    fn test_missing_column_details() {
        let error = CoreError::MissingColumn {
            column: "Modalidade".to_string(),
            available: vec!["CNPJ".to_string(), "UF".to_string()],
        };
        let details = error.to_details();

        assert_eq!(details.code, ErrorCode::MissingColumn);
        assert!(details.message.contains("Modalidade"));
        assert_eq!(
            details.details,
            Some(serde_json::json!({ "available_columns": ["CNPJ", "UF"] }))
        );
    }

    #[test]
    fn test_from_parse_error() {
        let not_found = ParseError::Io {
            path: "Relatorio_Cadop.csv".to_string(),
            source: io::Error::new(io::ErrorKind::NotFound, "missing"),
        };
        match CoreError::from(not_found) {
            CoreError::FileNotFound { path } => assert_eq!(path, "Relatorio_Cadop.csv"),
            other => panic!("unexpected error: {:?}", other),
        }

        let denied = ParseError::Io {
            path: "consolidado.csv".to_string(),
            source: io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        };
        assert_eq!(CoreError::from(denied).code(), ErrorCode::IoError);

        assert_eq!(CoreError::from(ParseError::EmptyInput).code(), ErrorCode::ParseError);
    }
}
