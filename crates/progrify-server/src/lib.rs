//! Token server library logic.

pub mod api;
pub mod config;

use axum::{routing::get, Extension, Router};
use progrify_voice::VoiceService;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

/// Application state shared across all request handlers.
#[derive(Clone)]
pub struct AppState {
    /// LiveKit token signing and Room Service calls.
    pub voice_service: Arc<VoiceService>,
}

/// Builds the application router with all routes.
///
/// CORS is wide open: the token endpoint is fetched directly from the
/// browser playground, which runs on a different origin in every
/// deployment.
pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/token", get(api::token_handler))
        .route("/health", get(api::health))
        .layer(Extension(Arc::new(state)))
        .layer(cors)
}
