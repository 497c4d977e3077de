//! Thinking and typing pauses executed before a response goes out.

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

use crate::settings::{ConnectorConfig, DelaySpec};

/// The suspension primitive used for response pauses.
#[async_trait]
pub trait Sleeper: Send + Sync {
    async fn sleep(&self, duration: Duration);
}

/// Suspends on the tokio timer.
#[derive(Debug, Default, Clone, Copy)]
pub struct TokioSleeper;

#[async_trait]
impl Sleeper for TokioSleeper {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// Response pacing for one connector instance.
#[derive(Clone)]
pub struct ResponseDelays {
    thinking: Option<DelaySpec>,
    typing: Option<DelaySpec>,
    sleeper: Arc<dyn Sleeper>,
}

impl std::fmt::Debug for ResponseDelays {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResponseDelays")
            .field("thinking", &self.thinking)
            .field("typing", &self.typing)
            .finish()
    }
}

impl Default for ResponseDelays {
    fn default() -> Self {
        Self {
            thinking: None,
            typing: None,
            sleeper: Arc::new(TokioSleeper),
        }
    }
}

impl ResponseDelays {
    pub fn new(thinking: Option<DelaySpec>, typing: Option<DelaySpec>) -> Self {
        Self {
            thinking,
            typing,
            ..Default::default()
        }
    }

    pub fn from_config(config: &ConnectorConfig) -> Self {
        Self::new(config.thinking_delay, config.typing_delay)
    }

    /// Replace the suspension primitive (tests use a recording sleeper).
    pub fn with_sleeper(mut self, sleeper: Arc<dyn Sleeper>) -> Self {
        self.sleeper = sleeper;
        self
    }

    pub fn has_thinking(&self) -> bool {
        self.thinking.is_some()
    }

    pub fn has_typing(&self) -> bool {
        self.typing.is_some()
    }

    /// Flat pause before responding. No-op when `thinking-delay` is unset.
    pub async fn thinking(&self) {
        let Some(spec) = self.thinking else {
            return;
        };
        let Some(duration) = pause(spec.sample(), "thinking") else {
            return;
        };
        debug!(seconds = duration.as_secs_f64(), "thinking delay");
        self.sleeper.sleep(duration).await;
    }

    /// Pause proportional to the response length. No-op when `typing-delay` is unset.
    pub async fn typing(&self, text: &str) {
        let Some(duration) = self.typing_duration(text) else {
            return;
        };
        debug!(seconds = duration.as_secs_f64(), "typing delay");
        self.sleeper.sleep(duration).await;
    }

    /// Typing pause for `text`: characters times seconds-per-character.
    ///
    /// `None` when unset or when the product is not a representable duration.
    pub fn typing_duration(&self, text: &str) -> Option<Duration> {
        let per_char = self.typing?.sample();
        let chars = text.chars().count() as f64;
        pause(per_char * chars, "typing")
    }
}

/// Convert sampled seconds into a pause. Negative, NaN and overflowing values skip it.
fn pause(secs: f64, kind: &'static str) -> Option<Duration> {
    match Duration::try_from_secs_f64(secs) {
        Ok(duration) => Some(duration),
        Err(e) => {
            warn!(seconds = secs, delay = kind, error = %e, "unusable delay, skipping pause");
            None
        }
    }
}
