//! Delimiter and text encoding of a candidate file format

use std::fmt;
use std::str::FromStr;

use crate::error::ParseError;

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Text encoding of a delimited file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Encoding {
    /// ISO-8859-1, one byte per code point
    Latin1,
    Utf8,
}

impl Encoding {
    /// Decode raw file bytes. A leading UTF-8 byte-order mark is dropped.
    pub fn decode(&self, bytes: &[u8]) -> Result<String, ParseError> {
        let bytes = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);
        match self {
            Encoding::Latin1 => Ok(bytes.iter().map(|&b| b as char).collect()),
            Encoding::Utf8 => String::from_utf8(bytes.to_vec()).map_err(|e| ParseError::Encoding {
                encoding: self.to_string(),
                message: e.to_string(),
            }),
        }
    }
}

impl FromStr for Encoding {
    type Err = ParseError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "latin-1" | "latin1" | "iso-8859-1" => Ok(Encoding::Latin1),
            "utf-8" | "utf8" => Ok(Encoding::Utf8),
            _ => Err(ParseError::UnsupportedEncoding { label: s.to_string() }),
        }
    }
}

impl fmt::Display for Encoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Encoding::Latin1 => write!(f, "latin-1"),
            Encoding::Utf8 => write!(f, "utf-8"),
        }
    }
}

/// A delimiter/encoding pair the loader can try
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CsvFormat {
    pub delimiter: u8,
    pub encoding: Encoding,
}

impl CsvFormat {
    pub const fn new(delimiter: u8, encoding: Encoding) -> Self {
        Self { delimiter, encoding }
    }

    /// Semicolon-separated Latin-1, the layout ANS publishes
    pub const fn semicolon_latin1() -> Self {
        Self::new(b';', Encoding::Latin1)
    }

    pub const fn comma_latin1() -> Self {
        Self::new(b',', Encoding::Latin1)
    }

    /// Build a format from textual labels as they appear in configuration
    pub fn from_labels(delimiter: &str, encoding: &str) -> Result<Self, ParseError> {
        let bytes = delimiter.as_bytes();
        if bytes.len() != 1 || !bytes[0].is_ascii() {
            return Err(ParseError::InvalidDelimiter {
                delimiter: delimiter.to_string(),
            });
        }
        Ok(Self::new(bytes[0], encoding.parse()?))
    }
}

impl fmt::Display for CsvFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "'{}' {}", self.delimiter as char, self.encoding)
    }
}
