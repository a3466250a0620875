use axum::{extract::State, Json};
use serde::Serialize;

use super::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub advisor: String,
    pub model_server: String,
    pub checked_at: chrono::DateTime<chrono::Utc>,
}

pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    // Advisor mode depends only on whether a generation credential exists
    let advisor = if state.advisor.is_generative() {
        "generative".to_string()
    } else {
        "fallback".to_string()
    };

    let model_server = if state.config.model_server_url.trim().is_empty() {
        "unconfigured".to_string()
    } else {
        "configured".to_string()
    };

    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        advisor,
        model_server,
        checked_at: chrono::Utc::now(),
    })
}

#[derive(Serialize)]
pub struct WelcomeResponse {
    pub message: String,
}

/// GET /
pub async fn home() -> Json<WelcomeResponse> {
    Json(WelcomeResponse {
        message: "Welcome to the Crop Disease Classification API".to_string(),
    })
}
