//! Error types for cadweb-api

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use cadweb_core::{CoreError, ErrorCode, ErrorSeverity};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Bad request: {message}")]
    BadRequest { message: String },

    #[error(transparent)]
    Core(#[from] CoreError),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            ApiError::Core(e) if e.code() == ErrorCode::InvalidPagination => StatusCode::BAD_REQUEST,
            ApiError::Core(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match &self {
            ApiError::BadRequest { message } => {
                log::warn!(target: "cadweb::api", "{}", self);
                serde_json::json!({ "code": "BAD_REQUEST", "message": message })
            }
            ApiError::Core(e) => {
                match e.severity() {
                    ErrorSeverity::Warning => log::warn!(target: "cadweb::api", "[{}] {}", e.code(), e),
                    ErrorSeverity::Error => log::error!(target: "cadweb::api", "[{}] {}", e.code(), e),
                }
                serde_json::to_value(e.to_details()).unwrap_or_else(|_| {
                    serde_json::json!({ "code": e.code().to_string(), "message": e.to_string() })
                })
            }
        };
        (status, Json(body)).into_response()
    }
}
