//! Statistics API endpoint

use crate::{ApiError, AppState};
use axum::extract::State;
use axum::Json;
use cadweb_core::Estatisticas;

/// Total operators, modality breakdown and top states (JSON API)
pub async fn api_estatisticas(State(state): State<AppState>) -> Result<Json<Estatisticas>, ApiError> {
    Ok(Json(state.registry.estatisticas().await?))
}
