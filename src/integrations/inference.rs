use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;

use crate::{
    constants::{CONNECT_TIMEOUT_SECS, SCORER_TIMEOUT_SECS},
    error::{AppError, Result},
    services::classifier::ImageScorer,
};

/// Client for the model-serving endpoint hosting the disease classifier.
/// Preprocessing and inference live behind that endpoint; this side only
/// ships bytes and reads back the score vector.
#[derive(Debug, Clone)]
pub struct InferenceClient {
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct ScoreResponse {
    scores: Vec<f32>,
}

impl InferenceClient {
    pub fn new(base_url: String) -> Self {
        Self { base_url }
    }

    fn score_url(&self) -> String {
        format!("{}/score", self.base_url.trim_end_matches('/'))
    }
}

#[async_trait]
impl ImageScorer for InferenceClient {
    async fn score(&self, image: &[u8]) -> Result<Vec<f32>> {
        let client = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
            .timeout(Duration::from_secs(SCORER_TIMEOUT_SECS))
            .build()
            .map_err(|e| AppError::Internal(format!("Scorer HTTP client init failed: {}", e)))?;

        let response = client
            .post(self.score_url())
            .header(reqwest::header::CONTENT_TYPE, "application/octet-stream")
            .body(image.to_vec())
            .send()
            .await
            .map_err(|e| {
                AppError::UpstreamUnavailable(format!("Model server request failed: {}", e))
            })?;

        if !response.status().is_success() {
            return Err(AppError::UpstreamUnavailable(format!(
                "Model server returned {}",
                response.status()
            )));
        }

        let payload: ScoreResponse = response.json().await.map_err(|e| {
            AppError::MalformedUpstream(format!("Model server response parse failed: {}", e))
        })?;

        Ok(payload.scores)
    }
}
