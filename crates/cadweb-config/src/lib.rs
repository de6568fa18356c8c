//! Configuration management for cadweb
//!
//! This module handles loading, validation, and management of
//! cadweb configuration from YAML files.

pub mod error;

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub use error::{ConfigError, ConfigErrorCode, ConfigResult};

// ==================== Configuration Types ====================

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,
    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8000
}

/// Data file configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataConfig {
    /// Directory holding the CSV files
    #[serde(default = "default_data_path")]
    pub path: PathBuf,
    /// Operator registry file name
    #[serde(default = "default_operadoras_file")]
    pub operadoras_file: String,
    /// Consolidated expense file name
    #[serde(default = "default_despesas_file")]
    pub despesas_file: String,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            path: default_data_path(),
            operadoras_file: default_operadoras_file(),
            despesas_file: default_despesas_file(),
        }
    }
}

fn default_data_path() -> PathBuf {
    PathBuf::from(".")
}

fn default_operadoras_file() -> String {
    "Relatorio_Cadop.csv".to_string()
}

fn default_despesas_file() -> String {
    "consolidado.csv".to_string()
}

/// One delimiter/encoding combination the loader may try
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormatCandidate {
    /// Field delimiter, a single ASCII character
    pub delimiter: String,
    /// Text encoding label ("latin-1" or "utf-8")
    #[serde(default = "default_encoding")]
    pub encoding: String,
}

impl FormatCandidate {
    pub fn new(delimiter: &str, encoding: &str) -> Self {
        Self {
            delimiter: delimiter.to_string(),
            encoding: encoding.to_string(),
        }
    }
}

fn default_encoding() -> String {
    "latin-1".to_string()
}

/// Loader settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoaderConfig {
    /// Candidates tried in order; the first successful parse wins
    #[serde(default = "default_candidates")]
    pub candidates: Vec<FormatCandidate>,
    /// Trim whitespace around fields and headers
    #[serde(default = "default_true")]
    pub trim: bool,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            candidates: default_candidates(),
            trim: true,
        }
    }
}

fn default_candidates() -> Vec<FormatCandidate> {
    vec![
        FormatCandidate::new(";", "latin-1"),
        FormatCandidate::new(",", "latin-1"),
    ]
}

fn default_true() -> bool {
    true
}

/// Pagination settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaginationConfig {
    /// Page used when the request has none
    #[serde(default = "default_page")]
    pub default_page: i64,
    /// Page size used when the request has none
    #[serde(default = "default_limit")]
    pub default_limit: i64,
    /// Largest page size a request may ask for
    #[serde(default = "default_max_limit")]
    pub max_limit: i64,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            default_page: default_page(),
            default_limit: default_limit(),
            max_limit: default_max_limit(),
        }
    }
}

fn default_page() -> i64 {
    1
}

fn default_limit() -> i64 {
    10
}

fn default_max_limit() -> i64 {
    1000
}

/// Statistics endpoint settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatisticsConfig {
    /// Column counted in full for the modality breakdown
    #[serde(default = "default_modality_column")]
    pub modality_column: String,
    /// Column counted for the state ranking
    #[serde(default = "default_state_column")]
    pub state_column: String,
    /// Number of states kept in the ranking
    #[serde(default = "default_top_states")]
    pub top_states: usize,
}

impl Default for StatisticsConfig {
    fn default() -> Self {
        Self {
            modality_column: default_modality_column(),
            state_column: default_state_column(),
            top_states: default_top_states(),
        }
    }
}

fn default_modality_column() -> String {
    "Modalidade".to_string()
}

fn default_state_column() -> String {
    "UF".to_string()
}

fn default_top_states() -> usize {
    5
}

/// Cross-origin policy
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorsConfig {
    /// Allowed origins; "*" allows any origin
    #[serde(default = "default_allowed_origins")]
    pub allowed_origins: Vec<String>,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origins: default_allowed_origins(),
        }
    }
}

fn default_allowed_origins() -> Vec<String> {
    vec!["*".to_string()]
}

impl CorsConfig {
    /// Whether any origin is accepted
    pub fn allows_any_origin(&self) -> bool {
        self.allowed_origins.iter().any(|o| o == "*")
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level: trace, debug, info, warn, error
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Server settings
    #[serde(default)]
    pub server: ServerConfig,
    /// Data file settings
    #[serde(default)]
    pub data: DataConfig,
    /// Loader settings
    #[serde(default)]
    pub loader: LoaderConfig,
    /// Pagination settings
    #[serde(default)]
    pub pagination: PaginationConfig,
    /// Statistics settings
    #[serde(default)]
    pub statistics: StatisticsConfig,
    /// CORS settings
    #[serde(default)]
    pub cors: CorsConfig,
    /// Logging settings
    #[serde(default)]
    pub logging: LoggingConfig,
}

const KNOWN_ENCODINGS: &[&str] = &["latin-1", "latin1", "iso-8859-1", "utf-8", "utf8"];
const KNOWN_LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error", "off"];

impl Config {
    /// Load configuration from a YAML file
    pub fn load(path: PathBuf) -> ConfigResult<Self> {
        if !path.exists() {
            return Err(ConfigError::FileNotFound {
                path: path.to_string_lossy().to_string(),
            });
        }

        let content = std::fs::read_to_string(&path)?;
        let config = Self::from_yaml(&content)?;
        log::debug!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Load configuration, falling back to defaults when the file is absent
    pub fn load_or_default(path: PathBuf) -> ConfigResult<Self> {
        match Self::load(path) {
            Err(ConfigError::FileNotFound { .. }) => Ok(Self::default()),
            other => other,
        }
    }

    /// Parse and validate configuration from YAML text
    pub fn from_yaml(content: &str) -> ConfigResult<Self> {
        let config: Config = serde_yaml::from_str(content)
            .map_err(|e| ConfigError::InvalidYaml { message: e.to_string() })?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration values
    pub fn validate(&self) -> ConfigResult<()> {
        if self.server.port == 0 {
            return Err(ConfigError::InvalidValue {
                field: "server.port".to_string(),
                reason: "Port must be greater than 0".to_string(),
            });
        }

        if self.data.operadoras_file.trim().is_empty() {
            return Err(ConfigError::MissingField {
                field: "data.operadoras_file".to_string(),
            });
        }

        if self.data.despesas_file.trim().is_empty() {
            return Err(ConfigError::MissingField {
                field: "data.despesas_file".to_string(),
            });
        }

        if self.loader.candidates.is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "loader.candidates".to_string(),
                reason: "At least one delimiter/encoding candidate is required".to_string(),
            });
        }

        for (i, candidate) in self.loader.candidates.iter().enumerate() {
            let bytes = candidate.delimiter.as_bytes();
            if bytes.len() != 1 || !bytes[0].is_ascii() {
                return Err(ConfigError::InvalidValue {
                    field: format!("loader.candidates[{}].delimiter", i),
                    reason: "Delimiter must be a single ASCII character".to_string(),
                });
            }
            if !KNOWN_ENCODINGS.contains(&candidate.encoding.to_lowercase().as_str()) {
                return Err(ConfigError::InvalidValue {
                    field: format!("loader.candidates[{}].encoding", i),
                    reason: format!("Unknown encoding '{}', expected latin-1 or utf-8", candidate.encoding),
                });
            }
        }

        if self.pagination.default_page < 1 {
            return Err(ConfigError::InvalidValue {
                field: "pagination.default_page".to_string(),
                reason: "Default page must be at least 1".to_string(),
            });
        }

        if self.pagination.max_limit < 1 {
            return Err(ConfigError::InvalidValue {
                field: "pagination.max_limit".to_string(),
                reason: "Max limit must be at least 1".to_string(),
            });
        }

        if self.pagination.default_limit < 1 || self.pagination.default_limit > self.pagination.max_limit {
            return Err(ConfigError::InvalidValue {
                field: "pagination.default_limit".to_string(),
                reason: "Default limit must be between 1 and pagination.max_limit".to_string(),
            });
        }

        if self.statistics.top_states == 0 {
            return Err(ConfigError::InvalidValue {
                field: "statistics.top_states".to_string(),
                reason: "Top states count must be greater than 0".to_string(),
            });
        }

        if self.cors.allowed_origins.is_empty() {
            return Err(ConfigError::ValidationError {
                message: "cors.allowed_origins is empty; no browser client could call the API".to_string(),
            });
        }

        if !KNOWN_LOG_LEVELS.contains(&self.logging.level.to_lowercase().as_str()) {
            return Err(ConfigError::InvalidValue {
                field: "logging.level".to_string(),
                reason: format!("Unknown log level '{}'", self.logging.level),
            });
        }

        Ok(())
    }

    /// Generate a default configuration file
    pub fn generate_default() -> &'static str {
        include_str!("../templates/default_config.yaml")
    }

    /// Full path to the operator registry file
    pub fn operadoras_path(&self) -> PathBuf {
        self.data.path.join(&self.data.operadoras_file)
    }

    /// Full path to the expense file
    pub fn despesas_path(&self) -> PathBuf {
        self.data.path.join(&self.data.despesas_file)
    }

    /// Listen address in `host:port` form
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

// ==================== Tests ====================

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.server.port, 8000);
        assert_eq!(config.data.operadoras_file, "Relatorio_Cadop.csv");
        assert_eq!(config.data.despesas_file, "consolidado.csv");
        assert_eq!(config.loader.candidates.len(), 2);
        assert_eq!(config.loader.candidates[0].delimiter, ";");
        assert_eq!(config.loader.candidates[1].delimiter, ",");
        assert_eq!(config.pagination.default_page, 1);
        assert_eq!(config.pagination.default_limit, 10);
        assert_eq!(config.statistics.top_states, 5);
        assert!(config.cors.allows_any_origin());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_default_template_parses() {
        let config = Config::from_yaml(Config::generate_default()).unwrap();
        assert_eq!(config.server.port, 8000);
        assert_eq!(config.statistics.modality_column, "Modalidade");
        assert_eq!(config.loader.candidates, default_candidates());
    }

    #[test]
    fn test_partial_yaml_fills_defaults() {
        let config = Config::from_yaml("server:\n  port: 9000\n").unwrap();
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.pagination.default_limit, 10);
    }

    #[test]
    fn test_invalid_yaml() {
        let err = Config::from_yaml("server: [unclosed").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidYaml { .. }));
    }

    #[test]
    fn test_rejects_zero_port() {
        let err = Config::from_yaml("server:\n  port: 0\n").unwrap_err();
        match err {
            ConfigError::InvalidValue { field, .. } => assert_eq!(field, "server.port"),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_rejects_multi_char_delimiter() {
        let yaml = "loader:\n  candidates:\n    - delimiter: \";;\"\n";
        let err = Config::from_yaml(yaml).unwrap_err();
        match err {
            ConfigError::InvalidValue { field, .. } => {
                assert_eq!(field, "loader.candidates[0].delimiter")
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_rejects_unknown_encoding() {
        let yaml = "loader:\n  candidates:\n    - delimiter: \";\"\n      encoding: ebcdic\n";
        assert!(Config::from_yaml(yaml).is_err());
    }

    #[test]
    fn test_rejects_limit_above_max() {
        let yaml = "pagination:\n  default_limit: 50\n  max_limit: 20\n";
        assert!(Config::from_yaml(yaml).is_err());
    }

    #[test]
    fn test_load_missing_file() {
        let err = Config::load(PathBuf::from("/nonexistent/cadweb.yaml")).unwrap_err();
        assert!(matches!(err, ConfigError::FileNotFound { .. }));

        let config = Config::load_or_default(PathBuf::from("/nonexistent/cadweb.yaml")).unwrap();
        assert_eq!(config.server.port, 8000);
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "data:\n  path: /srv/ans\n  operadoras_file: cadop.csv").unwrap();

        let config = Config::load(file.path().to_path_buf()).unwrap();
        assert_eq!(config.operadoras_path(), PathBuf::from("/srv/ans/cadop.csv"));
        assert_eq!(config.despesas_path(), PathBuf::from("/srv/ans/consolidado.csv"));
    }

    #[test]
    fn test_load_or_default_keeps_invalid_file_errors() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "server:\n  port: 0").unwrap();

        let err = Config::load_or_default(file.path().to_path_buf()).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { .. }));
    }
}
