//! Registry queries over the ANS operator and expense files
//!
//! [`Registry`] resolves file paths from the configuration and reloads the
//! relevant file on every call; the query functions in [`query`] work on the
//! loaded [`Table`].

pub mod error;
pub mod models;
pub mod query;

use cadweb_config::Config;
use cadweb_parser::{CsvFormat, DelimitedLoader, LoaderRef, Table};
use std::path::Path;
use std::sync::Arc;

pub use error::{CoreError, CoreResult, ErrorCode, ErrorDetails, ErrorSeverity};
pub use models::{Estatisticas, FrequencyTable, OperadorasPage};
pub use query::{filter_contains, paginate, value_counts, PageRequest};

/// Build the default loader from `loader.candidates`
pub fn loader_from_config(config: &Config) -> CoreResult<DelimitedLoader> {
    let formats = config
        .loader
        .candidates
        .iter()
        .map(|c| CsvFormat::from_labels(&c.delimiter, &c.encoding))
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| CoreError::ConfigError { message: e.to_string() })?;
    Ok(DelimitedLoader::new(formats).with_trim(config.loader.trim))
}

/// Read-only view of the registry and expense files
#[derive(Clone)]
pub struct Registry {
    config: Config,
    loader: LoaderRef,
}

impl Registry {
    /// Create a registry with config and loader
    pub fn new(config: Config, loader: LoaderRef) -> Self {
        Self { config, loader }
    }

    /// Create a registry using the loader described by the configuration
    pub fn from_config(config: Config) -> CoreResult<Self> {
        let loader = loader_from_config(&config)?;
        Ok(Self::new(config, Arc::new(loader)))
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    async fn load(&self, path: &Path) -> CoreResult<Table> {
        let table = self.loader.load(path).await?;
        log::debug!("Loaded {} ({} rows)", path.display(), table.len());
        Ok(table)
    }

    /// Fresh copy of the operator registry
    pub async fn operadoras(&self) -> CoreResult<Table> {
        self.load(&self.config.operadoras_path()).await
    }

    /// Fresh copy of the expense history
    pub async fn despesas(&self) -> CoreResult<Table> {
        self.load(&self.config.despesas_path()).await
    }

    /// Page through the registry. Missing arguments fall back to the
    /// configured defaults; out-of-range values are rejected before any I/O.
    pub async fn list_operadoras(&self, page: Option<i64>, limit: Option<i64>) -> CoreResult<OperadorasPage> {
        let request = PageRequest::new(
            page.unwrap_or(self.config.pagination.default_page),
            limit.unwrap_or(self.config.pagination.default_limit),
        );
        request.validate(self.config.pagination.max_limit)?;

        let table = self.operadoras().await?;
        Ok(paginate(&table, request))
    }

    /// Expense rows where any column contains `cnpj`
    pub async fn historico_despesas(&self, cnpj: &str) -> CoreResult<Table> {
        let table = self.despesas().await?;
        let matches = filter_contains(&table, cnpj)?;
        log::debug!("{} of {} expense rows match '{}'", matches.len(), table.len(), cnpj);
        Ok(matches)
    }

    /// Row count, modality breakdown and most common states
    pub async fn estatisticas(&self) -> CoreResult<Estatisticas> {
        let table = self.operadoras().await?;
        let stats = &self.config.statistics;
        Ok(Estatisticas {
            total_operadoras: table.len(),
            modalidades: value_counts(&table, &stats.modality_column)?,
            top_5_estados: value_counts(&table, &stats.state_column)?.head(stats.top_states),
        })
    }
}

// ==================== Tests ====================
