//! Mock intent backend for deterministic testing.
//!
//! Returns pre-configured results without making any HTTP calls.

use async_trait::async_trait;
use parking_lot::Mutex;
use parley_core::{Message, ParleyError, Result};
use std::collections::VecDeque;
use std::sync::Arc;

use crate::backend::IntentBackend;

/// One queued backend outcome.
#[derive(Debug, Clone)]
pub enum MockReply {
    Json(serde_json::Value),
    /// Surface as a transport failure.
    Transport(String),
}

/// A mock backend that replays queued results in order.
///
/// # Example
/// ```
/// use parley_parsers::mock::MockBackend;
/// let backend = MockBackend::new()
///     .with_intent("get_weather", 0.9);
/// ```
#[derive(Default)]
pub struct MockBackend {
    replies: Mutex<VecDeque<MockReply>>,
    /// Texts of every message the backend was asked about.
    pub calls: Arc<Mutex<Vec<String>>>,
}

impl MockBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a raw JSON result.
    pub fn with_json(self, value: serde_json::Value) -> Self {
        self.replies.lock().push_back(MockReply::Json(value));
        self
    }

    /// Queue a wit.ai-shaped result with a single intent.
    pub fn with_intent(self, name: &str, confidence: f64) -> Self {
        self.with_json(serde_json::json!({
            "msg_id": "mock",
            "_text": "",
            "entities": {
                "intent": [{ "confidence": confidence, "value": name }]
            }
        }))
    }

    /// Queue a transport failure.
    pub fn with_transport_error(self, reason: &str) -> Self {
        self.replies
            .lock()
            .push_back(MockReply::Transport(reason.to_string()));
        self
    }

    /// How many times the backend was called.
    pub fn call_count(&self) -> usize {
        self.calls.lock().len()
    }
}

#[async_trait]
impl IntentBackend for MockBackend {
    async fn call(&self, message: &Message) -> Result<serde_json::Value> {
        self.calls.lock().push(message.text().to_string());
        match self.replies.lock().pop_front() {
            Some(MockReply::Json(value)) => Ok(value),
            Some(MockReply::Transport(reason)) => Err(ParleyError::BackendTransport {
                parser: "mock".into(),
                reason,
            }),
            None => Ok(serde_json::json!({ "entities": {} })),
        }
    }
}
