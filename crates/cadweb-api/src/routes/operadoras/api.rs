//! Operator API endpoints
//!
//! Endpoints:
//! - api_operadoras: One page of the registry (JSON)
//! - api_historico_despesas: Expense rows matching a CNPJ (JSON)

use crate::{ApiError, AppState};
use axum::extract::{Path, Query, State};
use axum::Json;
use cadweb_core::OperadorasPage;
use cadweb_parser::Table;
use std::collections::HashMap;

/// Parse an optional integer query parameter
fn int_param(params: &HashMap<String, String>, name: &str) -> Result<Option<i64>, ApiError> {
    match params.get(name).map(|s| s.trim()) {
        None | Some("") => Ok(None),
        Some(raw) => raw.parse().map(Some).map_err(|_| ApiError::BadRequest {
            message: format!("'{}' must be an integer, got '{}'", name, raw),
        }),
    }
}

/// Get operators with pagination (JSON API)
pub async fn api_operadoras(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<OperadorasPage>, ApiError> {
    let page = int_param(&params, "page")?;
    let limit = int_param(&params, "limit")?;
    let result = state.registry.list_operadoras(page, limit).await?;
    Ok(Json(result))
}

/// Get expense history for a CNPJ (JSON API)
pub async fn api_historico_despesas(
    State(state): State<AppState>,
    Path(cnpj): Path<String>,
) -> Result<Json<Table>, ApiError> {
    let rows = state.registry.historico_despesas(&cnpj).await?;
    Ok(Json(rows))
}
