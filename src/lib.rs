//! Wardrobe stylist relay.
//!
//! Composes outfit prompts from a user's wardrobe, preferences, style profile
//! and weather, relays them to an AI text and image generation API, and builds
//! shop search links for wardrobe gaps.

pub mod config;
pub mod mock;
pub mod models;
pub mod openai;
pub mod prompts;
pub mod routes;
pub mod shop;
pub mod stylist;
pub mod wardrobe;

use std::path::PathBuf;
use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    services::ServeDir,
    trace::TraceLayer,
};

pub use routes::AppState;

use config::OpenAiConfig;
use mock::MockBackend;
use openai::{ModelBackend, OpenAiClient};

/// Upper bound for multipart photo uploads.
const UPLOAD_LIMIT_BYTES: usize = 20 * 1024 * 1024;

/// Canned replies when `mock_model` is set, otherwise the real API client.
pub fn model_backend(openai: OpenAiConfig, mock_model: bool) -> Arc<dyn ModelBackend> {
    if mock_model {
        tracing::warn!("MOCK_MODEL is set, answering model calls with canned replies");
        Arc::new(MockBackend::new())
    } else {
        Arc::new(OpenAiClient::new(openai))
    }
}

pub fn build_app(state: AppState, static_dir: Option<PathBuf>) -> Router {
    let api = Router::new()
        .route("/api/test", get(routes::health))
        .route("/api/analyze-image", post(routes::analyze_image))
        .route("/api/analyze-style-images", post(routes::analyze_style_images))
        .route("/api/generate-outfit", post(routes::generate_outfit))
        .route("/api/wardrobe-gaps", post(routes::wardrobe_gaps))
        .route("/api/shop-suggestions", post(routes::shop_suggestions))
        .layer(DefaultBodyLimit::max(UPLOAD_LIMIT_BYTES))
        .with_state(state);

    let app = match static_dir {
        Some(dir) => {
            tracing::info!("Serving static files from {}", dir.display());
            api.fallback_service(ServeDir::new(dir))
        }
        None => api.fallback(routes::not_found),
    };

    app.layer(
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any),
    )
    .layer(
        TraceLayer::new_for_http()
            .make_span_with(|req: &axum::http::Request<_>| {
                let method = req.method().clone();
                let uri = req.uri().clone();
                tracing::info_span!("http_request", %method, uri = %uri)
            })
            .on_response(
                |res: &axum::http::Response<_>, _latency: std::time::Duration, _span: &tracing::Span| {
                    let status = res.status();
                    if status.is_server_error() {
                        tracing::error!(%status, "response");
                    } else {
                        tracing::info!(%status, "response");
                    }
                },
            ),
    )
}
