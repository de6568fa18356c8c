//! Response models for the registry queries

use cadweb_parser::Table;
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

/// One page of the operator registry
#[derive(Debug, Clone, Serialize)]
pub struct OperadorasPage {
    /// Rows of the requested page
    pub data: Table,
    /// Row count of the whole file
    pub total: usize,
    pub page: i64,
    pub limit: i64,
}

/// Value -> count pairs, most frequent first.
///
/// Serializes as a JSON object whose keys keep this order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FrequencyTable {
    entries: Vec<(String, usize)>,
}

impl FrequencyTable {
    pub fn new(entries: Vec<(String, usize)>) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &[(String, usize)] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, value: &str) -> Option<usize> {
        self.entries.iter().find(|(v, _)| v == value).map(|(_, c)| *c)
    }

    /// Sum of all counts
    pub fn total(&self) -> usize {
        self.entries.iter().map(|(_, c)| c).sum()
    }

    /// The `n` most frequent entries
    pub fn head(mut self, n: usize) -> Self {
        self.entries.truncate(n);
        self
    }
}

impl Serialize for FrequencyTable {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (value, count) in &self.entries {
            map.serialize_entry(value, count)?;
        }
        map.end()
    }
}

/// Summary counts over the operator registry
#[derive(Debug, Clone, Serialize)]
pub struct Estatisticas {
    pub total_operadoras: usize,
    pub modalidades: FrequencyTable,
    pub top_5_estados: FrequencyTable,
}
