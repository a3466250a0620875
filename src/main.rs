use axum::extract::DefaultBodyLimit;
use axum::http::HeaderValue;
use axum::{
    routing::{get, post},
    Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod api;
mod config;
mod constants;
mod error;
mod integrations;
mod locales;
mod models;
mod services;

use config::Config;
use constants::{API_VERSION, MAX_UPLOAD_BYTES};
use integrations::{AgmarkClient, GroqClient, InferenceClient};
use services::advisory::TextGenerator;
use services::{AdvisoryService, MarketService};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "agrisense_backend=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::from_env()?;
    config.validate()?;

    tracing::info!("Starting AgriSense Backend Server");
    tracing::info!("Environment: {}", config.environment);
    tracing::info!("API Version: {}", API_VERSION);

    // The generation credential is optional; without it the advisory
    // pipeline serves canned fallbacks for every request.
    let generator: Option<Arc<dyn TextGenerator>> = config
        .groq_api_key
        .clone()
        .map(|key| Arc::new(GroqClient::new(key, config.groq_api_url.clone())) as _);

    let app_state = api::AppState {
        scorer: Arc::new(InferenceClient::new(config.model_server_url.clone())),
        advisor: Arc::new(AdvisoryService::new(generator)),
        market: Arc::new(MarketService::new(Arc::new(AgmarkClient::new(
            config.market_api_key.clone(),
            config.market_api_url.clone(),
        )))),
        config,
    };

    // Build router
    let app = build_router(app_state.clone());

    // Start server
    let addr: SocketAddr = format!("{}:{}", app_state.config.host, app_state.config.port).parse()?;

    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

fn build_router(state: api::AppState) -> Router {
    // CORS configuration
    let cors = cors_from_config(&state.config);

    Router::new()
        .route("/", get(api::health::home))
        .route("/health", get(api::health::health_check))
        // Prediction & advisory
        .route("/api/predict", post(api::predict::predict))
        .route("/api/chat", post(api::chat::chat))
        // Market prices
        .route("/api/market-prices", get(api::market::get_market_prices))
        .route(
            "/api/market-prices/trending",
            get(api::market::get_trending_crops),
        )
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

fn cors_from_config(config: &Config) -> CorsLayer {
    let raw = config.cors_allowed_origins.trim();
    if raw.is_empty() || raw == "*" {
        return CorsLayer::very_permissive();
    }

    let allowed: Vec<HeaderValue> = raw
        .split(',')
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .filter_map(|s| s.parse::<HeaderValue>().ok())
        .collect();

    if allowed.is_empty() {
        tracing::warn!("No valid CORS origins parsed; falling back to permissive");
        return CorsLayer::very_permissive();
    }

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(allowed))
        .allow_methods(Any)
        .allow_headers(Any)
}
