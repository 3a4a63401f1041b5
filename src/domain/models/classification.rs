use serde::{Deserialize, Serialize};

/// Routing category assigned to an incoming question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QueryCategory {
    Rag,
    Weather,
    Math,
    General,
}

impl QueryCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Rag => "rag",
            Self::Weather => "weather",
            Self::Math => "math",
            Self::General => "general",
        }
    }

    /// Unknown labels fall back to `Rag`, the category with its own
    /// downstream empty-result fallback.
    pub fn parse(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "weather" => Self::Weather,
            "math" => Self::Math,
            "general" => Self::General,
            _ => Self::Rag,
        }
    }
}

impl std::fmt::Display for QueryCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One classification per question; created by the classifier, consumed by
/// the orchestrator, discarded after routing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Classification {
    category: QueryCategory,
    confidence: f32,
    reasoning: String,
}

impl Classification {
    pub fn new(category: QueryCategory, confidence: f32, reasoning: impl Into<String>) -> Self {
        Self {
            category,
            confidence: confidence.clamp(0.0, 1.0),
            reasoning: reasoning.into(),
        }
    }

    /// The classification used whenever the classifier cannot produce one.
    pub fn fallback() -> Self {
        Self::new(
            QueryCategory::Rag,
            0.5,
            "default: classification failed",
        )
    }

    pub fn category(&self) -> QueryCategory {
        self.category
    }

    pub fn confidence(&self) -> f32 {
        self.confidence
    }

    pub fn reasoning(&self) -> &str {
        &self.reasoning
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_maps_known_labels() {
        assert_eq!(QueryCategory::parse("weather"), QueryCategory::Weather);
        assert_eq!(QueryCategory::parse("MATH"), QueryCategory::Math);
        assert_eq!(QueryCategory::parse(" general "), QueryCategory::General);
        assert_eq!(QueryCategory::parse("rag"), QueryCategory::Rag);
    }

    #[test]
    fn parse_defaults_unknown_labels_to_rag() {
        assert_eq!(QueryCategory::parse("chitchat"), QueryCategory::Rag);
        assert_eq!(QueryCategory::parse(""), QueryCategory::Rag);
    }

    #[test]
    fn confidence_is_clamped() {
        let c = Classification::new(QueryCategory::Math, 1.7, "sure");
        assert_eq!(c.confidence(), 1.0);
        let c = Classification::new(QueryCategory::Math, -0.2, "unsure");
        assert_eq!(c.confidence(), 0.0);
    }

    #[test]
    fn fallback_is_rag_at_half_confidence() {
        let c = Classification::fallback();
        assert_eq!(c.category(), QueryCategory::Rag);
        assert_eq!(c.confidence(), 0.5);
    }
}
