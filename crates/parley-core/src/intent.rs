use serde::{Deserialize, Serialize};

/// One scored interpretation of an utterance, as produced by a parser.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParsedIntent {
    /// Intent label (e.g. "get_weather").
    pub name: String,
    /// Confidence in [0, 1]. Missing confidence counts as 0.
    #[serde(default)]
    pub confidence: f64,
    /// Extracted slots, keyed by slot name.
    #[serde(default, skip_serializing_if = "serde_json::Map::is_empty")]
    pub entities: serde_json::Map<String, serde_json::Value>,
}

impl ParsedIntent {
    pub fn new(name: impl Into<String>, confidence: f64) -> Self {
        Self {
            name: name.into(),
            confidence,
            entities: serde_json::Map::new(),
        }
    }

    pub fn with_entities(mut self, entities: serde_json::Map<String, serde_json::Value>) -> Self {
        self.entities = entities;
        self
    }
}

/// Pick the highest-confidence intent. Ties keep the first one seen.
pub fn best_intent(intents: &[ParsedIntent]) -> Option<&ParsedIntent> {
    intents.iter().fold(None, |best: Option<&ParsedIntent>, candidate| match best {
        Some(b) if candidate.confidence <= b.confidence => Some(b),
        _ => Some(candidate),
    })
}
