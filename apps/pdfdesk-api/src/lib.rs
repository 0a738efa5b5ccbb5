//! pdfdesk API: axum application wiring.
//!
//! The router is built here so integration tests can drive the full stack
//! with `tower::ServiceExt::oneshot` instead of a live socket.

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub mod config;
pub mod error;
pub mod handlers;
pub mod models;
pub mod state;

pub use config::Config;
pub use state::AppState;

// Multipart framing and text fields ride alongside the capped file payloads;
// the request body limit sits above the per-file cap so an oversized file
// reaches the handler's own size check and its 413 response.
const BODY_LIMIT_HEADROOM: usize = 1024 * 1024;

pub fn app(state: Arc<AppState>) -> Router {
    let cors = cors_layer(&state.config.cors_origins);
    let body_limit = state.config.max_body_bytes() + BODY_LIMIT_HEADROOM;

    Router::new()
        .route("/api/health", get(handlers::health))
        // Page operations
        .route("/api/merge", post(handlers::merge))
        .route("/api/split", post(handlers::split))
        .route("/api/compress", post(handlers::compress))
        .route("/api/rotate", post(handlers::rotate))
        .route("/api/reorder", post(handlers::reorder))
        .route("/api/add-watermark", post(handlers::add_watermark))
        .route("/api/add-page-numbers", post(handlers::add_page_numbers))
        // Format conversions
        .route("/api/pdf-to-jpg", post(handlers::pdf_to_jpg))
        .route("/api/jpg-to-pdf", post(handlers::jpg_to_pdf))
        .route("/api/pdf-to-word", post(handlers::pdf_to_word))
        .route("/api/word-to-pdf", post(handlers::word_to_pdf))
        .route("/api/excel-to-pdf", post(handlers::excel_to_pdf))
        // Artifact delivery
        .route("/api/download/:name", get(handlers::download))
        // Middleware
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    if origins.is_empty() || origins.iter().any(|o| o == "*") {
        return CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);
    }

    let parsed: Vec<_> = origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();
    CorsLayer::new()
        .allow_origin(AllowOrigin::list(parsed))
        .allow_methods(Any)
        .allow_headers(Any)
}
