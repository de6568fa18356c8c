//! Route modules for the API server
//!
//! - operadoras: registry pagination and per-CNPJ expense history
//! - estatisticas: summary counts
//!
//! Each module keeps its JSON endpoints in api.rs.

pub mod estatisticas;
pub mod operadoras;
