//! Operator routes - Registry list with pagination, expense history
//!
//! Structure:
//! - api.rs: JSON API endpoints

pub mod api;

pub use api::{api_historico_despesas, api_operadoras};
