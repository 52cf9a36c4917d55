use std::net::SocketAddr;

use tracing_subscriber::{fmt, EnvFilter};
use wardrobe_stylist::{build_app, config::AppConfig, model_backend, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenv::dotenv().ok();

    // Init tracing
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt().with_env_filter(filter).init();

    let config = AppConfig::from_env();
    if config.openai.api_key.is_none() && !config.mock_model {
        tracing::warn!("OPENAI_API_KEY is not set, model calls will fail with fallback responses");
    }
    tracing::info!(
        "Using API key {} against {} (text: {}, vision: {}, image: {})",
        config.openai.masked_key(),
        config.openai.base_url,
        config.openai.text_model,
        config.openai.vision_model,
        config.openai.image_model,
    );

    let backend = model_backend(config.openai, config.mock_model);
    let state = AppState::new(backend, config.shop);
    let app = build_app(state, config.static_dir);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!(%addr, "Starting server");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
