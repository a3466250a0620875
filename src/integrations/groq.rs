use std::time::Duration;

use async_trait::async_trait;
use serde_json::{json, Value};

use crate::{
    constants::{
        CONNECT_TIMEOUT_SECS, GENERATION_MAX_TOKENS, GENERATION_MODEL, GENERATION_TEMPERATURE,
        GENERATION_TIMEOUT_SECS,
    },
    error::{AppError, Result},
    services::advisory::TextGenerator,
};

/// Client for the OpenAI-compatible chat-completions endpoint serving the
/// advisory model. One request per pipeline invocation, hard timeout.
#[derive(Debug, Clone)]
pub struct GroqClient {
    api_key: String,
    api_url: String,
}

impl GroqClient {
    pub fn new(api_key: String, api_url: String) -> Self {
        Self { api_key, api_url }
    }

    fn http_client(&self) -> Result<reqwest::Client> {
        let timeout_secs = std::env::var("GENERATION_TIMEOUT_SECS")
            .ok()
            .and_then(|raw| raw.parse::<u64>().ok())
            .filter(|value| *value > 0)
            .unwrap_or(GENERATION_TIMEOUT_SECS);
        reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| AppError::Internal(format!("Generation HTTP client init failed: {}", e)))
    }
}

#[async_trait]
impl TextGenerator for GroqClient {
    async fn generate(&self, system: &str, user: &str) -> Result<String> {
        let body = json!({
            "model": GENERATION_MODEL,
            "temperature": GENERATION_TEMPERATURE,
            "max_tokens": GENERATION_MAX_TOKENS,
            "messages": [
                { "role": "system", "content": system },
                { "role": "user", "content": user },
            ],
        });

        let response = self
            .http_client()?
            .post(&self.api_url)
            .bearer_auth(self.api_key.trim())
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                AppError::UpstreamUnavailable(format!("Generation request failed: {}", e))
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::UpstreamUnavailable(format!(
                "Generation service returned {}: {}",
                status,
                truncate_for_log(&body)
            )));
        }

        let payload: Value = response.json().await.map_err(|e| {
            AppError::MalformedUpstream(format!("Generation response parse failed: {}", e))
        })?;

        payload
            .get("choices")
            .and_then(|choices| choices.get(0))
            .and_then(|choice| choice.get("message"))
            .and_then(|message| message.get("content"))
            .and_then(|content| content.as_str())
            .map(|content| content.trim().to_string())
            .ok_or_else(|| {
                AppError::MalformedUpstream("Generation response missing message content".to_string())
            })
    }
}

fn truncate_for_log(body: &str) -> String {
    body.chars().take(200).collect()
}
