use async_trait::async_trait;

use crate::{
    constants::{CLASS_LABELS, CLASS_SEPARATOR},
    error::{AppError, Result},
    models::ClassificationResult,
};

/// Capability seam for the external image-scoring model. The model is opaque:
/// it takes raw image bytes and returns one score per known disease class.
#[async_trait]
pub trait ImageScorer: Send + Sync {
    async fn score(&self, image: &[u8]) -> Result<Vec<f32>>;
}

/// Decode a raw score vector against an ordered class-label table.
///
/// Pure function: selects the arg-max index (ties resolve to the lowest
/// index), reports confidence as `100 * score[argmax]`, and splits the
/// winning label into its crop and disease components.
pub fn decode(scores: &[f32], labels: &[&str]) -> Result<ClassificationResult> {
    if scores.is_empty() || scores.len() != labels.len() {
        return Err(AppError::ShapeMismatch {
            expected: labels.len(),
            actual: scores.len(),
        });
    }

    let mut best = 0usize;
    for (idx, score) in scores.iter().enumerate() {
        if *score > scores[best] {
            best = idx;
        }
    }

    let label = labels[best];
    let (crop, disease) = label.split_once(CLASS_SEPARATOR).unwrap_or((label, ""));

    Ok(ClassificationResult {
        crop: crop.to_string(),
        disease: disease.to_string(),
        confidence: scores[best] * 100.0,
    })
}

/// Decode against the built-in disease model's label table.
pub fn decode_default(scores: &[f32]) -> Result<ClassificationResult> {
    decode(scores, &CLASS_LABELS)
}
