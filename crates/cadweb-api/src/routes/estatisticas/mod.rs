//! Statistics routes - registry summary counts

pub mod api;

pub use api::api_estatisticas;
