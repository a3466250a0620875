use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

use super::AppState;

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub question: String,
    #[serde(default = "default_language")]
    pub language: String,
}

fn default_language() -> String {
    "en".to_string()
}

#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub answer: String,
    pub language: String,
}

/// POST /api/chat
pub async fn chat(
    State(state): State<AppState>,
    Json(request): Json<ChatRequest>,
) -> Result<Json<ChatResponse>> {
    let question = request.question.trim();
    if question.is_empty() {
        return Err(AppError::BadRequest("Question must not be empty".to_string()));
    }

    let reply = state.advisor.chat_answer(question, &request.language).await;
    tracing::debug!(provenance = reply.provenance.as_str(), "Resolved chat answer");

    Ok(Json(ChatResponse {
        answer: reply.answer,
        language: request.language,
    }))
}
