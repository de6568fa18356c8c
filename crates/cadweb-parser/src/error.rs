//! Error types for cadweb-parser

use polars::prelude::PolarsError;
use thiserror::Error;
use std::io;

use crate::format::CsvFormat;

/// One failed candidate format and why it failed
#[derive(Debug, Clone, PartialEq)]
pub struct FormatAttempt {
    pub format: CsvFormat,
    pub message: String,
}

fn describe_attempts(attempts: &[FormatAttempt]) -> String {
    attempts
        .iter()
        .map(|a| format!("[{}] {}", a.format, a.message))
        .collect::<Vec<_>>()
        .join("; ")
}

#[derive(Error, Debug)]
pub enum ParseError {
    #[error("IO error reading {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: io::Error,
    },

    #[error("No header row found")]
    EmptyInput,

    #[error("Malformed delimited text: {0}")]
    Frame(#[from] PolarsError),

    #[error("Invalid {encoding} text: {message}")]
    Encoding { encoding: String, message: String },

    #[error("Unsupported encoding: {label}")]
    UnsupportedEncoding { label: String },

    #[error("Invalid delimiter '{delimiter}': must be a single ASCII character")]
    InvalidDelimiter { delimiter: String },

    #[error("No loader formats configured")]
    NoFormats,

    #[error("Unable to parse {path}: {}", describe_attempts(.attempts))]
    Unparseable {
        path: String,
        attempts: Vec<FormatAttempt>,
    },
}
