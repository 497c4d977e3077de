//! Per-consumer configuration values.
//!
//! Each consumer (connector, parser, skill) has a small set of recognized keys.
//! Everything else lands in the flattened `settings` map and is passed through untouched.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::error::{ParleyError, Result};

/// A delay in seconds: either a fixed value or a `[min, max]` range.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DelaySpec {
    Fixed(f64),
    Range([f64; 2]),
}

impl DelaySpec {
    /// Draw a value in seconds. Ranges are sampled uniformly from `[min, max]`.
    pub fn sample(&self) -> f64 {
        match *self {
            DelaySpec::Fixed(secs) => secs,
            DelaySpec::Range([min, max]) => {
                if max <= min {
                    return min;
                }
                let drawn = min + rand::random::<f64>() * (max - min);
                drawn.clamp(min, max)
            }
        }
    }

    /// Reject negative, non-finite and inverted values.
    pub fn validate(&self, field: &str) -> Result<()> {
        let invalid = |reason: String| ParleyError::ConfigValidation {
            field: field.to_string(),
            reason,
        };
        match *self {
            DelaySpec::Fixed(secs) => {
                if !secs.is_finite() || secs < 0.0 {
                    return Err(invalid(format!("delay {secs} must be a non-negative number")));
                }
            }
            DelaySpec::Range([min, max]) => {
                if !min.is_finite() || !max.is_finite() || min < 0.0 || max < 0.0 {
                    return Err(invalid(format!(
                        "delay range [{min}, {max}] must contain non-negative numbers"
                    )));
                }
                if min > max {
                    return Err(invalid(format!("delay range [{min}, {max}] has min > max")));
                }
            }
        }
        Ok(())
    }
}

// ── Connectors ─────────────────────────────────────────────────

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ConnectorConfig {
    /// Connector instance name (e.g. "shell").
    #[serde(default)]
    pub name: String,
    /// Adapter type; defaults to the name when empty.
    #[serde(default, rename = "type")]
    pub connector_type: Option<String>,
    /// Pause before every response, in seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thinking_delay: Option<DelaySpec>,
    /// Seconds per character of the response.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub typing_delay: Option<DelaySpec>,
    /// Room used when a reply does not name one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_room: Option<String>,
    /// Adapter-specific settings.
    #[serde(flatten)]
    pub settings: HashMap<String, serde_json::Value>,
}

impl ConnectorConfig {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_thinking_delay(mut self, delay: DelaySpec) -> Self {
        self.thinking_delay = Some(delay);
        self
    }

    pub fn with_typing_delay(mut self, delay: DelaySpec) -> Self {
        self.typing_delay = Some(delay);
        self
    }

    /// The adapter type, falling back to the instance name.
    pub fn kind(&self) -> &str {
        self.connector_type.as_deref().unwrap_or(&self.name)
    }

    pub fn validate(&self) -> Result<()> {
        if let Some(ref d) = self.thinking_delay {
            d.validate(&format!("connectors.{}.thinking-delay", self.name))?;
        }
        if let Some(ref d) = self.typing_delay {
            d.validate(&format!("connectors.{}.typing-delay", self.name))?;
        }
        Ok(())
    }
}

// ── Parsers ────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ParserConfig {
    /// Parser name (e.g. "witai", "regex").
    pub name: String,
    /// Minimum confidence an intent needs to match. Unset means no threshold.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_score: Option<f64>,
    /// Bearer credential for the backend.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(flatten)]
    pub settings: HashMap<String, serde_json::Value>,
}

fn default_true() -> bool {
    true
}

impl ParserConfig {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            min_score: None,
            access_token: None,
            enabled: true,
            settings: HashMap::new(),
        }
    }

    pub fn with_min_score(mut self, min_score: f64) -> Self {
        self.min_score = Some(min_score);
        self
    }

    pub fn with_access_token(mut self, token: impl Into<String>) -> Self {
        self.access_token = Some(token.into());
        self
    }

    /// Whether `confidence` clears the configured threshold (inclusive).
    pub fn passes(&self, confidence: f64) -> bool {
        match self.min_score {
            Some(min) => confidence >= min,
            None => true,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if let Some(min) = self.min_score {
            if !(0.0..=1.0).contains(&min) {
                return Err(ParleyError::ConfigValidation {
                    field: format!("parsers.{}.min-score", self.name),
                    reason: format!("{min} is outside [0, 1]"),
                });
            }
        }
        Ok(())
    }
}

// ── Skills ─────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SkillConfig {
    #[serde(default)]
    pub name: String,
    #[serde(flatten)]
    pub settings: HashMap<String, serde_json::Value>,
}

impl SkillConfig {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            settings: HashMap::new(),
        }
    }

    /// Look up an opaque setting.
    pub fn get(&self, key: &str) -> Option<&serde_json::Value> {
        self.settings.get(key)
    }
}
