//! API handlers for the token server.

use crate::AppState;
use axum::{
    extract::Extension,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::Arc;
use thiserror::Error;

/// Response body for token issuance. The shape is exactly
/// `{"token": "<string>"}` — browser playground clients parse this
/// field by name, so it must not change.
#[derive(Debug, Serialize, Deserialize)]
pub struct TokenResponse {
    pub token: String,
}

/// API error type mapping to HTTP status codes.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("internal server error: {0}")]
    InternalServerError(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::InternalServerError(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };

        let body = Json(json!({
            "error": message
        }));

        (status, body).into_response()
    }
}

/// Handler for `GET /token`.
///
/// Issues a signed access token carrying the deployment's fixed identity
/// and room grant. The caller is deliberately not authenticated and no
/// input is accepted; this mirrors the playground contract this endpoint
/// replaces.
pub async fn token_handler(
    Extension(state): Extension<Arc<AppState>>,
) -> Result<Json<TokenResponse>, ApiError> {
    let token = state
        .voice_service
        .generate_access_token()
        .map_err(|e| ApiError::InternalServerError(format!("token generation failed: {}", e)))?;

    Ok(Json(TokenResponse { token }))
}

/// Health check handler.
///
/// Returns `200 OK` with server status and version. Used by load
/// balancers, monitoring, and CI to verify the server is running.
pub async fn health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": "0.1.0"
    }))
}
