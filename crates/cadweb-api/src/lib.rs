//! HTTP JSON API server
//!
//! Routes are organized into modules:
//! - routes::operadoras: Registry pagination and expense history
//! - routes::estatisticas: Summary counts

pub mod error;
pub mod routes;

use axum::http::HeaderValue;
use axum::{routing::get, Router};
use cadweb_config::{Config, CorsConfig};
use cadweb_core::Registry;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};

pub use error::ApiError;

/// Application state, built once at startup and cloned into each request
#[derive(Clone)]
pub struct AppState {
    pub registry: Arc<Registry>,
}

impl AppState {
    pub fn new(registry: Registry) -> Self {
        Self {
            registry: Arc::new(registry),
        }
    }

    pub fn config(&self) -> &Config {
        self.registry.config()
    }
}

/// Build the CORS layer. Methods and headers are always unrestricted.
pub fn cors_layer(cors: &CorsConfig) -> CorsLayer {
    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);
    if cors.allows_any_origin() {
        return layer.allow_origin(Any);
    }

    let origins: Vec<HeaderValue> = cors
        .allowed_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                log::warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();
    layer.allow_origin(AllowOrigin::list(origins))
}

/// Create the application router
pub fn create_router(state: AppState) -> Router {
    use routes::estatisticas::api_estatisticas;
    use routes::operadoras::{api_historico_despesas, api_operadoras};

    let cors = cors_layer(&state.config().cors);

    Router::new()
        .route("/api/health", get(health_check))
        .route("/api/operadoras", get(api_operadoras))
        .route("/api/operadoras/:cnpj/despesas", get(api_historico_despesas))
        .route("/api/estatisticas", get(api_estatisticas))
        .layer(cors)
        .with_state(state)
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}

/// Start the HTTP server
///
/// Binds to the configured address and serves until the process is
/// interrupted.
///
/// # Arguments
///
/// * `registry` - Registry holding the application configuration
pub async fn start_server(registry: Registry) -> anyhow::Result<()> {
    let addr = registry.config().bind_address();
    let state = AppState::new(registry);
    let router = create_router(state);

    let listener = TcpListener::bind(&addr).await?;
    log::info!("Starting cadweb server on http://{}", addr);
    log::info!("Available routes:");
    log::info!("  - GET /api/operadoras?page=&limit=");
    log::info!("  - GET /api/operadoras/{{cnpj}}/despesas");
    log::info!("  - GET /api/estatisticas");
    log::info!("  - GET /api/health");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    log::info!("Server stopped gracefully");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        log::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
}
