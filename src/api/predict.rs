use axum::{
    extract::{Multipart, Query, State},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::{
    constants::CLASS_SEPARATOR,
    error::{AppError, Result},
    locales,
    models::ClassificationResult,
    services::classifier,
};

use super::AppState;

#[derive(Debug, Deserialize)]
pub struct PredictQuery {
    pub language: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct PredictResponse {
    pub predicted_class: String,
    pub predicted_crop: String,
    #[serde(rename = "isHealthy")]
    pub is_healthy: &'static str,
    pub predicted_diseases: String,
    pub confidence_percentage: f32,
    pub recommendations: Vec<String>,
}

/// POST /api/predict
///
/// Multipart upload: `file` carries the image, `language` (field or query
/// param) selects the recommendation language.
pub async fn predict(
    State(state): State<AppState>,
    Query(query): Query<PredictQuery>,
    mut multipart: Multipart,
) -> Result<Json<PredictResponse>> {
    let mut image: Option<Vec<u8>> = None;
    let mut language = query.language.unwrap_or_else(|| "en".to_string());

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(format!("Invalid multipart payload: {}", e)))?
    {
        let name = field.name().map(|name| name.to_string());
        match name.as_deref() {
            Some("file") => {
                let bytes = field.bytes().await.map_err(|e| {
                    AppError::BadRequest(format!("Failed to read image field: {}", e))
                })?;
                image = Some(bytes.to_vec());
            }
            Some("language") => {
                if let Ok(value) = field.text().await {
                    let value = value.trim().to_string();
                    if !value.is_empty() {
                        language = value;
                    }
                }
            }
            _ => {}
        }
    }

    let image = image
        .filter(|bytes| !bytes.is_empty())
        .ok_or_else(|| AppError::BadRequest("Missing image file".to_string()))?;

    let scores = state.scorer.score(&image).await?;
    let result = classifier::decode_default(&scores)?;

    tracing::info!(
        crop = %result.crop,
        disease = %result.disease,
        confidence = result.confidence,
        "Classified uploaded image"
    );

    // Healthy plants never reach the generative pipeline
    if result.is_healthy() {
        return Ok(Json(healthy_response(result, &language)));
    }

    let advice = state
        .advisor
        .disease_advice(&result.crop, &result.disease, &language)
        .await;
    tracing::debug!(provenance = advice.provenance.as_str(), "Resolved disease advice");

    Ok(Json(diseased_response(result, advice.reasons)))
}

fn predicted_class(result: &ClassificationResult) -> String {
    format!("{}{}{}", result.crop, CLASS_SEPARATOR, result.disease)
}

fn healthy_response(result: ClassificationResult, language: &str) -> PredictResponse {
    PredictResponse {
        predicted_class: predicted_class(&result),
        recommendations: locales::healthy_recommendations(&result.crop, language),
        predicted_crop: result.crop,
        is_healthy: "Healthy",
        predicted_diseases: "Null".to_string(),
        confidence_percentage: result.confidence,
    }
}

fn diseased_response(result: ClassificationResult, recommendations: Vec<String>) -> PredictResponse {
    PredictResponse {
        predicted_class: predicted_class(&result),
        predicted_crop: result.crop,
        is_healthy: "Unhealthy",
        predicted_diseases: result.disease,
        confidence_percentage: result.confidence,
        recommendations,
    }
}
