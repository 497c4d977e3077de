//! The transport capability set.
//!
//! A concrete transport implements [`Connector`]; the runtime only depends on this contract.
//! Unimplemented capabilities fail with [`ParleyError::NotImplemented`], except the
//! best-effort ones (`react`, `user_typing`) which quietly do nothing.

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::debug;

use crate::delay::{ResponseDelays, Sleeper};
use crate::error::{ParleyError, Result};
use crate::message::Message;
use crate::settings::ConnectorConfig;

/// Trait implemented by each transport.
#[async_trait]
pub trait Connector: Send + Sync {
    /// Instance configuration (name, delays, adapter settings).
    fn config(&self) -> &ConnectorConfig;

    /// Instance name, e.g. "shell".
    fn name(&self) -> &str {
        &self.config().name
    }

    /// Room used for messages that arrive without one.
    fn default_room(&self) -> Option<&str> {
        self.config().default_room.as_deref()
    }

    /// Response pacing for this connector.
    fn delays(&self) -> ResponseDelays {
        ResponseDelays::from_config(self.config())
    }

    /// Open the connection to the platform.
    async fn connect(&self) -> Result<()> {
        Err(ParleyError::not_implemented("connect"))
    }

    /// Produce inbound messages into `inbox` until disconnected.
    async fn listen(&self, _inbox: Inbox) -> Result<()> {
        Err(ParleyError::not_implemented("listen"))
    }

    /// Deliver `text` to `room` in reply to `message`.
    async fn respond(&self, _message: &Message, _text: &str, _room: &str) -> Result<()> {
        Err(ParleyError::not_implemented("respond"))
    }

    /// Acknowledge `message` with an emoji. Returns whether a reaction was performed.
    async fn react(&self, _message: &Message, _emoji: &str) -> Result<bool> {
        Ok(false)
    }

    /// Signal an outbound typing indicator.
    async fn user_typing(&self, _trigger: bool) -> Result<()> {
        Ok(())
    }

    /// Close the connection.
    async fn disconnect(&self) -> Result<()> {
        Err(ParleyError::not_implemented("disconnect"))
    }
}

/// Reference connector that overrides nothing. Useful for exercising the contract.
#[derive(Debug, Default)]
pub struct BaseConnector {
    config: ConnectorConfig,
    delays: ResponseDelays,
}

impl BaseConnector {
    pub fn new(config: ConnectorConfig) -> Self {
        let delays = ResponseDelays::from_config(&config);
        Self { config, delays }
    }

    pub fn with_sleeper(mut self, sleeper: Arc<dyn Sleeper>) -> Self {
        self.delays = self.delays.with_sleeper(sleeper);
        self
    }
}

#[async_trait]
impl Connector for BaseConnector {
    fn config(&self) -> &ConnectorConfig {
        &self.config
    }

    fn delays(&self) -> ResponseDelays {
        self.delays.clone()
    }
}

/// Hand-off point between a listening connector and the runtime.
///
/// Messages built through the inbox are bound to the connector that owns it.
#[derive(Clone)]
pub struct Inbox {
    connector: Arc<dyn Connector>,
    tx: mpsc::Sender<Message>,
}

impl Inbox {
    pub fn new(connector: Arc<dyn Connector>, tx: mpsc::Sender<Message>) -> Self {
        Self { connector, tx }
    }

    pub fn connector(&self) -> &Arc<dyn Connector> {
        &self.connector
    }

    /// Build a message bound to this inbox's connector.
    /// An empty room falls back to the connector's default room.
    pub fn message(
        &self,
        text: impl Into<String>,
        user: impl Into<String>,
        room: impl Into<String>,
    ) -> Message {
        let mut room = room.into();
        if room.is_empty() {
            if let Some(default) = self.connector.default_room() {
                room = default.to_string();
            }
        }
        Message::new(text, user, room, Arc::clone(&self.connector))
    }

    /// Forward a message to the runtime.
    pub async fn deliver(&self, message: Message) -> Result<()> {
        debug!(connector = %self.connector.name(), message_id = %message.id(), "inbound message");
        self.tx.send(message).await.map_err(|_| ParleyError::Connector {
            connector: self.connector.name().to_string(),
            reason: "runtime inbox closed".into(),
        })
    }

    /// Whether the runtime has stopped accepting messages.
    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}
