use crate::constants::HEALTHY_SENTINEL;

/// Outcome of decoding one score vector: the winning class split into its
/// crop and disease components, with the winning score as a percentage.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassificationResult {
    pub crop: String,
    pub disease: String,
    pub confidence: f32,
}

impl ClassificationResult {
    pub fn is_healthy(&self) -> bool {
        self.disease == HEALTHY_SENTINEL
    }
}

/// Which stage of the advisory pipeline produced the result. Logged for
/// diagnostics; never serialized to callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provenance {
    Generated,
    GeneratedHeuristic,
    Fallback,
}

impl Provenance {
    pub fn as_str(&self) -> &'static str {
        match self {
            Provenance::Generated => "generated",
            Provenance::GeneratedHeuristic => "generated-heuristic",
            Provenance::Fallback => "fallback",
        }
    }
}

/// Treatment advice for a diagnosed disease: one to six recommendations.
#[derive(Debug, Clone)]
pub struct Advice {
    pub reasons: Vec<String>,
    pub provenance: Provenance,
}

/// Answer to a free-text farming question.
#[derive(Debug, Clone)]
pub struct ChatReply {
    pub answer: String,
    pub provenance: Provenance,
}
