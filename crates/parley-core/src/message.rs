use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;
use uuid::Uuid;

use crate::connector::Connector;
use crate::error::Result;
use crate::intent::ParsedIntent;

/// One inbound utterance plus where it came from.
///
/// `text`, `user` and `room` are fixed at construction. Replies go through the
/// owning connector and never touch them.
pub struct Message {
    id: Uuid,
    text: String,
    user: String,
    room: String,
    connector: Arc<dyn Connector>,
    /// Transport provenance (timestamps, platform ids, ...).
    raw: Option<serde_json::Map<String, serde_json::Value>>,
    received_at: DateTime<Utc>,
    /// Intent context attached by parsers, keyed by parser name.
    intents: RwLock<HashMap<String, ParsedIntent>>,
}

impl std::fmt::Debug for Message {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Message")
            .field("id", &self.id)
            .field("text", &self.text)
            .field("user", &self.user)
            .field("room", &self.room)
            .field("connector", &self.connector.name())
            .field("raw", &self.raw)
            .finish()
    }
}

impl Message {
    pub fn new(
        text: impl Into<String>,
        user: impl Into<String>,
        room: impl Into<String>,
        connector: Arc<dyn Connector>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            text: text.into(),
            user: user.into(),
            room: room.into(),
            connector,
            raw: None,
            received_at: Utc::now(),
            intents: RwLock::new(HashMap::new()),
        }
    }

    pub fn with_raw(mut self, raw: serde_json::Map<String, serde_json::Value>) -> Self {
        self.raw = Some(raw);
        self
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn user(&self) -> &str {
        &self.user
    }

    pub fn room(&self) -> &str {
        &self.room
    }

    pub fn connector(&self) -> &Arc<dyn Connector> {
        &self.connector
    }

    pub fn raw(&self) -> Option<&serde_json::Map<String, serde_json::Value>> {
        self.raw.as_ref()
    }

    pub fn received_at(&self) -> DateTime<Utc> {
        self.received_at
    }

    /// Record the intent a parser selected. Only the first write per parser sticks.
    pub fn attach_intent(&self, parser: &str, intent: ParsedIntent) -> bool {
        let mut intents = self.intents.write();
        if intents.contains_key(parser) {
            return false;
        }
        intents.insert(parser.to_string(), intent);
        true
    }

    /// The intent `parser` selected for this message, if any.
    pub fn intent(&self, parser: &str) -> Option<ParsedIntent> {
        self.intents.read().get(parser).cloned()
    }

    /// Reply in the message's own room.
    pub async fn respond(&self, text: &str) -> Result<()> {
        self.respond_in(text, None).await
    }

    /// Reply in `room`, or the message's room when `None`.
    ///
    /// Runs the connector's thinking pause, then its typing pause, then sends.
    pub async fn respond_in(&self, text: &str, room: Option<&str>) -> Result<()> {
        let delays = self.connector.delays();
        delays.thinking().await;

        if delays.has_typing() {
            self.signal_typing(true).await;
            delays.typing(text).await;
            self.signal_typing(false).await;
        }

        let room = room.unwrap_or(self.room.as_str());
        self.connector.respond(self, text, room).await
    }

    /// React with an emoji. Best-effort: returns `false` when the connector can't.
    pub async fn react(&self, emoji: &str) -> Result<bool> {
        self.connector.delays().thinking().await;
        self.connector.react(self, emoji).await
    }

    async fn signal_typing(&self, trigger: bool) {
        if let Err(e) = self.connector.user_typing(trigger).await {
            debug!(connector = %self.connector.name(), error = %e, "typing indicator failed");
        }
    }
}
