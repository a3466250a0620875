use std::sync::Arc;

use async_trait::async_trait;

use crate::{
    constants::{MAX_RECOMMENDATIONS, MIN_RECOMMENDATION_CHARS},
    error::Result,
    locales,
    models::{Advice, ChatReply, Provenance},
};

/// Capability seam for the external text-generation service. Implementations
/// issue one role-structured request and return the raw completion text.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, system: &str, user: &str) -> Result<String>;
}

const ADVISOR_FRAMING: &str =
    "You are an expert agricultural advisor providing disease treatment advice to farmers.";

/// Advisory resolution pipeline.
///
/// Single pass per request: generate, then structured parse, then heuristic
/// parse, then the canned fallback bank. Every stage either yields a usable
/// result or hands off to the next; callers always receive content and never
/// see an error from this service.
pub struct AdvisoryService {
    generator: Option<Arc<dyn TextGenerator>>,
}

impl AdvisoryService {
    pub fn new(generator: Option<Arc<dyn TextGenerator>>) -> Self {
        Self { generator }
    }

    /// Whether a generation backend is configured at all. Without one the
    /// pipeline runs in permanent fallback mode.
    pub fn is_generative(&self) -> bool {
        self.generator.is_some()
    }

    /// Resolve treatment advice for a diagnosed disease. Yields between one
    /// and six recommendations in the requested language.
    pub async fn disease_advice(&self, crop: &str, disease: &str, language: &str) -> Advice {
        let Some(generator) = &self.generator else {
            return fallback_advice(crop, disease, language);
        };

        let prompt = disease_prompt(crop, disease, language);
        let text = match generator.generate(ADVISOR_FRAMING, &prompt).await {
            Ok(text) => text,
            Err(err) => {
                tracing::warn!("Recommendation generation failed: {}", err);
                return fallback_advice(crop, disease, language);
            }
        };

        if let Some(reasons) = parse_structured(&text) {
            return Advice {
                reasons,
                provenance: Provenance::Generated,
            };
        }

        let reasons = parse_heuristic(&text);
        if !reasons.is_empty() {
            return Advice {
                reasons,
                provenance: Provenance::GeneratedHeuristic,
            };
        }

        tracing::debug!("Generated text yielded no usable recommendations");
        fallback_advice(crop, disease, language)
    }

    /// Answer a free-text farming question. Generated text is accepted as-is
    /// when non-empty; everything else degrades to the canned reply.
    pub async fn chat_answer(&self, question: &str, language: &str) -> ChatReply {
        let Some(generator) = &self.generator else {
            return fallback_reply(question, language);
        };

        let prompt = chat_prompt(question, language);
        match generator.generate(ADVISOR_FRAMING, &prompt).await {
            Ok(text) => {
                let answer = text.trim();
                if answer.is_empty() {
                    fallback_reply(question, language)
                } else {
                    ChatReply {
                        answer: answer.to_string(),
                        provenance: Provenance::Generated,
                    }
                }
            }
            Err(err) => {
                tracing::warn!("Chat generation failed: {}", err);
                fallback_reply(question, language)
            }
        }
    }
}

fn fallback_advice(crop: &str, disease: &str, language: &str) -> Advice {
    Advice {
        reasons: locales::fallback_recommendations(crop, disease, language),
        provenance: Provenance::Fallback,
    }
}

fn fallback_reply(question: &str, language: &str) -> ChatReply {
    ChatReply {
        answer: locales::fallback_answer(question, language),
        provenance: Provenance::Fallback,
    }
}

fn disease_prompt(crop: &str, disease: &str, language: &str) -> String {
    let lang_name = locales::language_name(language);
    format!(
        "You are an expert agricultural advisor. A farmer has detected {disease} on their {crop} plant.\n\n\
         Provide 5-6 specific, actionable recommendations for treating this disease in {lang_name}.\n\n\
         Requirements:\n\
         - Each recommendation should be 1-2 sentences\n\
         - Focus on immediate actions, treatment methods, and prevention\n\
         - Be specific to {crop} and {disease}\n\
         - Use clear, farmer-friendly language\n\
         - Return ONLY a JSON array of strings (no other text)\n\n\
         Example format: [\"Recommendation 1\", \"Recommendation 2\", ...]"
    )
}

fn chat_prompt(question: &str, language: &str) -> String {
    let lang_name = locales::language_name(language);
    format!(
        "A farmer asks: {question}\n\n\
         Answer in {lang_name} with practical, farmer-friendly advice. \
         Keep it to a few short sentences focused on what the farmer should do."
    )
}

/// Structured parse stage: the completion is expected to be a JSON array of
/// strings. Empty arrays do not count as a result.
fn parse_structured(text: &str) -> Option<Vec<String>> {
    let reasons: Vec<String> = serde_json::from_str(text.trim()).ok()?;
    if reasons.is_empty() {
        return None;
    }
    Some(reasons.into_iter().take(MAX_RECOMMENDATIONS).collect())
}

/// Heuristic parse stage: salvage a line-oriented completion by stripping
/// list markers and dropping lines too short to be a real recommendation.
fn parse_heuristic(text: &str) -> Vec<String> {
    text.lines()
        .map(strip_list_marker)
        .filter(|line| !line.is_empty())
        .filter(|line| !line.starts_with('[') && !line.starts_with(']'))
        .filter(|line| line.chars().count() >= MIN_RECOMMENDATION_CHARS)
        .map(|line| line.to_string())
        .take(MAX_RECOMMENDATIONS)
        .collect()
}

fn strip_list_marker(line: &str) -> &str {
    line.trim()
        .trim_start_matches(|c: char| {
            c == '-' || c == '•' || c == '*' || c == '.' || c.is_ascii_digit()
        })
        .trim()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;

    struct FixedGenerator(&'static str);

    #[async_trait]
    impl TextGenerator for FixedGenerator {
        async fn generate(&self, _system: &str, _user: &str) -> Result<String> {
            Ok(self.0.to_string())
        }
    }

    struct FailingGenerator;

    #[async_trait]
    impl TextGenerator for FailingGenerator {
        async fn generate(&self, _system: &str, _user: &str) -> Result<String> {
            Err(AppError::UpstreamUnavailable("service down".to_string()))
        }
    }

    fn service_with(generator: impl TextGenerator + 'static) -> AdvisoryService {
        AdvisoryService::new(Some(Arc::new(generator)))
    }

    #[test]
    fn parse_structured_truncates_to_six() {
        // An 8-entry array comes back as exactly 6 recommendations
        let text = r#"["r1 text","r2 text","r3 text","r4 text","r5 text","r6 text","r7 text","r8 text"]"#;
        let reasons = parse_structured(text).unwrap();
        assert_eq!(reasons.len(), 6);
        assert_eq!(reasons[0], "r1 text");
        assert_eq!(reasons[5], "r6 text");
    }

    #[test]
    fn parse_structured_rejects_empty_and_non_arrays() {
        assert!(parse_structured("[]").is_none());
        assert!(parse_structured("not json at all").is_none());
        assert!(parse_structured(r#"{"reasons": []}"#).is_none());
    }

    #[test]
    fn parse_heuristic_strips_list_markers() {
        let text = "1. Spray copper fungicide weekly\n- Remove fallen leaves promptly\n• Rotate crops next season";
        let reasons = parse_heuristic(text);
        assert_eq!(
            reasons,
            vec![
                "Spray copper fungicide weekly",
                "Remove fallen leaves promptly",
                "Rotate crops next season",
            ]
        );
    }

    #[test]
    fn parse_heuristic_drops_short_and_bracket_lines() {
        // Short fragments and array-bracket lines never survive the filter
        let text = "[\nshort one\nApply neem oil every five days\n]";
        let reasons = parse_heuristic(text);
        assert_eq!(reasons, vec!["Apply neem oil every five days"]);
    }

    #[test]
    fn parse_heuristic_keeps_at_most_six_lines() {
        let text = (1..=9)
            .map(|i| format!("Recommendation number {i}"))
            .collect::<Vec<_>>()
            .join("\n");
        assert_eq!(parse_heuristic(&text).len(), 6);
    }

    #[tokio::test]
    async fn unconfigured_pipeline_serves_the_canned_bank() {
        // No credential: the fallback bank answers, deterministically
        let service = AdvisoryService::new(None);
        let advice = service.disease_advice("Apple", "Black_rot", "en").await;
        assert_eq!(advice.provenance, Provenance::Fallback);
        assert_eq!(
            advice.reasons,
            locales::fallback_recommendations("Apple", "Black_rot", "en")
        );
    }

    #[tokio::test]
    async fn failing_generator_degrades_to_fallback() {
        let service = service_with(FailingGenerator);
        let advice = service.disease_advice("Tomato", "Leaf_Mold", "en").await;
        assert_eq!(advice.provenance, Provenance::Fallback);
        assert!(!advice.reasons.is_empty());
    }

    #[tokio::test]
    async fn unparsable_text_that_fails_the_line_filter_falls_back() {
        // Invalid JSON whose lines are all too short ends at the bank
        let service = service_with(FixedGenerator("ok\nno\n[]"));
        let advice = service.disease_advice("Grape", "Black_rot", "hi").await;
        assert_eq!(advice.provenance, Provenance::Fallback);
        assert_eq!(
            advice.reasons,
            locales::fallback_recommendations("Grape", "Black_rot", "hi")
        );
    }

    #[tokio::test]
    async fn structured_response_is_accepted_and_truncated() {
        let service = service_with(FixedGenerator(
            r#"["a1 long enough","a2 long enough","a3 long enough","a4 long enough","a5 long enough","a6 long enough","a7 long enough","a8 long enough"]"#,
        ));
        let advice = service.disease_advice("Apple", "Apple_scab", "en").await;
        assert_eq!(advice.provenance, Provenance::Generated);
        assert_eq!(advice.reasons.len(), 6);
    }

    #[tokio::test]
    async fn line_oriented_response_is_salvaged_heuristically() {
        let service = service_with(FixedGenerator(
            "Here are my recommendations:\n1. Prune infected branches right away\n2. Apply sulfur dust after rain",
        ));
        let advice = service.disease_advice("Peach", "Bacterial_spot", "en").await;
        assert_eq!(advice.provenance, Provenance::GeneratedHeuristic);
        assert_eq!(advice.reasons.len(), 3);
    }

    #[tokio::test]
    async fn chat_accepts_raw_text_unconditionally() {
        // The chat branch does not require JSON, only non-empty text
        let service = service_with(FixedGenerator("  Sow wheat after the first rains.  "));
        let reply = service.chat_answer("When should I sow wheat?", "en").await;
        assert_eq!(reply.provenance, Provenance::Generated);
        assert_eq!(reply.answer, "Sow wheat after the first rains.");
    }

    #[tokio::test]
    async fn empty_chat_completion_falls_back() {
        let service = service_with(FixedGenerator("   \n  "));
        let reply = service.chat_answer("How much urea per acre?", "en").await;
        assert_eq!(reply.provenance, Provenance::Fallback);
        assert!(reply.answer.contains("How much urea per acre?"));
    }

    #[tokio::test]
    async fn unknown_language_uses_english_fallback() {
        let service = AdvisoryService::new(None);
        let advice = service.disease_advice("Apple", "Black_rot", "xx").await;
        assert_eq!(
            advice.reasons,
            locales::fallback_recommendations("Apple", "Black_rot", "en")
        );
    }

    #[tokio::test]
    async fn decoder_output_round_trips_into_bounded_advice() {
        // Any (crop, disease) pair from the decoder yields 1..=6 reasons
        let service = AdvisoryService::new(None);
        let decoded =
            crate::services::classifier::decode(&[0.9, 0.1], &["Apple___Black_rot", "Apple___healthy"])
                .unwrap();
        let advice = service
            .disease_advice(&decoded.crop, &decoded.disease, "en")
            .await;
        assert!((1..=6).contains(&advice.reasons.len()));
    }
}
