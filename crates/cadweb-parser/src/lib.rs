//! Delimited text loader
//!
//! Reads registry and expense CSV files into an in-memory [`Table`], trying an
//! ordered list of delimiter/encoding candidates until one parses.

use async_trait::async_trait;
use std::path::Path;
use std::sync::Arc;

pub mod error;
pub mod format;
pub mod parser;
pub mod types;

pub use error::{FormatAttempt, ParseError};
pub use format::{CsvFormat, Encoding};
pub use parser::DelimitedParser;
pub use types::{Cell, Table};

// ==================== Loader Trait ====================

/// Loader reference type
pub type LoaderRef = Arc<dyn TableLoader>;

/// Trait for table loaders
#[async_trait]
pub trait TableLoader: Send + Sync {
    /// Read and parse a whole file. Nothing is cached between calls.
    async fn load(&self, path: &Path) -> Result<Table, ParseError>;
}

/// Loader that tries each candidate format in order
#[derive(Debug, Clone)]
pub struct DelimitedLoader {
    formats: Vec<CsvFormat>,
    trim: bool,
}

impl Default for DelimitedLoader {
    fn default() -> Self {
        Self::new(vec![CsvFormat::semicolon_latin1(), CsvFormat::comma_latin1()])
    }
}

impl DelimitedLoader {
    pub fn new(formats: Vec<CsvFormat>) -> Self {
        Self { formats, trim: true }
    }

    pub fn with_trim(mut self, trim: bool) -> Self {
        self.trim = trim;
        self
    }

    pub fn formats(&self) -> &[CsvFormat] {
        &self.formats
    }

    /// Parse in-memory bytes; `source` only names the input in errors and logs.
    pub fn parse_bytes(&self, bytes: &[u8], source: &str) -> Result<Table, ParseError> {
        if self.formats.is_empty() {
            return Err(ParseError::NoFormats);
        }

        let mut attempts = Vec::new();
        for format in &self.formats {
            match DelimitedParser::parse_bytes(bytes, *format, self.trim) {
                Ok(table) => {
                    if !attempts.is_empty() {
                        log::warn!(
                            "{}: parsed with fallback format {} after {} failed attempt(s)",
                            source,
                            format,
                            attempts.len()
                        );
                    }
                    log::debug!(
                        "{}: {} rows, {} columns ({})",
                        source,
                        table.len(),
                        table.columns().len(),
                        format
                    );
                    return Ok(table);
                }
                Err(e) => {
                    log::debug!("{}: format {} failed: {}", source, format, e);
                    attempts.push(FormatAttempt {
                        format: *format,
                        message: e.to_string(),
                    });
                }
            }
        }

        Err(ParseError::Unparseable {
            path: source.to_string(),
            attempts,
        })
    }
}

#[async_trait]
impl TableLoader for DelimitedLoader {
    async fn load(&self, path: &Path) -> Result<Table, ParseError> {
        let bytes = tokio::fs::read(path).await.map_err(|e| ParseError::Io {
            path: path.to_string_lossy().to_string(),
            source: e,
        })?;
        self.parse_bytes(&bytes, &path.to_string_lossy())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_temp(content: &[u8]) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(content).unwrap();
        file
    }

    #[tokio::test]
    async fn test_load_semicolon_file() {
        let file = write_temp(b"CNPJ;UF\n111;SP\n222;RJ\n");
        let table = DelimitedLoader::default().load(file.path()).await.unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.columns(), ["CNPJ", "UF"]);
    }

    #[tokio::test]
    async fn test_falls_back_to_comma() {
        // The unquoted ';' in the value gives row two more fields than the
        // single-field ';' header.
        let content = b"RazaoSocial,CNPJ,ValorDespesas\nOperadora 1,111,10;5\n";
        let file = write_temp(content);
        let table = DelimitedLoader::default().load(file.path()).await.unwrap();
        assert_eq!(table.columns(), ["RazaoSocial", "CNPJ", "ValorDespesas"]);
        assert_eq!(table.get(0, "ValorDespesas"), Some(Cell::Text("10;5".into())));

        let comma_only = DelimitedParser::parse_bytes(content, CsvFormat::comma_latin1(), true).unwrap();
        assert_eq!(table, comma_only);
    }

    #[tokio::test]
    async fn test_unparseable_lists_every_attempt() {
        let file = write_temp(b"A\n1;2,3\n");
        let err = DelimitedLoader::default().load(file.path()).await.unwrap_err();
        match err {
            ParseError::Unparseable { attempts, .. } => {
                assert_eq!(attempts.len(), 2);
                assert_eq!(attempts[0].format, CsvFormat::semicolon_latin1());
                assert_eq!(attempts[1].format, CsvFormat::comma_latin1());
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_missing_file_is_io_error() {
        let err = DelimitedLoader::default()
            .load(Path::new("/nonexistent/Relatorio_Cadop.csv"))
            .await
            .unwrap_err();
        assert!(matches!(err, ParseError::Io { .. }));
    }

    #[tokio::test]
    async fn test_load_is_idempotent() {
        let file = write_temp(b"CNPJ;Modalidade\n111;Medicina de Grupo\n222;Autogest\xe3o\n");
        let loader = DelimitedLoader::default();
        let first = loader.load(file.path()).await.unwrap();
        let second = loader.load(file.path()).await.unwrap();
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_utf8_candidate_falls_through_to_latin1() {
        let loader = DelimitedLoader::new(vec![
            CsvFormat::new(b';', Encoding::Utf8),
            CsvFormat::semicolon_latin1(),
        ]);
        let file = write_temp(b"UF;Nome\nSP;S\xe3o Paulo\n");
        let table = loader.load(file.path()).await.unwrap();
        assert_eq!(table.get(0, "Nome"), Some(Cell::Text("São Paulo".into())));
    }

    #[test]
    fn test_no_formats() {
        let loader = DelimitedLoader::new(vec![]);
        assert!(matches!(loader.parse_bytes(b"A\n1\n", "mem"), Err(ParseError::NoFormats)));
    }
}
