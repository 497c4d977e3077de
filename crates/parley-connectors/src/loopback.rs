use async_trait::async_trait;
use parking_lot::Mutex;
use parley_core::{
    Connector, ConnectorConfig, Inbox, Message, ParleyError, ResponseDelays, Result, Sleeper,
};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

/// An utterance injected into the loopback connector.
#[derive(Debug, Clone, PartialEq)]
pub struct Incoming {
    pub text: String,
    pub user: String,
    /// Empty means the connector's default room.
    pub room: String,
}

/// A reply the bot sent through the loopback connector.
#[derive(Debug, Clone, PartialEq)]
pub struct Reply {
    pub text: String,
    pub room: String,
    /// User of the message being answered.
    pub user: String,
}

/// In-process connector: messages are injected through a sender and replies
/// come back on a receiver. Used by tests and when embedding the runtime.
pub struct LoopbackConnector {
    config: ConnectorConfig,
    delays: ResponseDelays,
    connected: AtomicBool,
    shutdown: CancellationToken,
    incoming_tx: mpsc::Sender<Incoming>,
    incoming_rx: Mutex<Option<mpsc::Receiver<Incoming>>>,
    outgoing_tx: mpsc::Sender<Reply>,
    outgoing_rx: Mutex<Option<mpsc::Receiver<Reply>>>,
    reactions: Mutex<Vec<String>>,
    typing: Mutex<Vec<bool>>,
}

impl LoopbackConnector {
    pub fn new(config: ConnectorConfig) -> Self {
        let (incoming_tx, incoming_rx) = mpsc::channel(256);
        let (outgoing_tx, outgoing_rx) = mpsc::channel(256);
        let delays = ResponseDelays::from_config(&config);
        Self {
            config,
            delays,
            connected: AtomicBool::new(false),
            shutdown: CancellationToken::new(),
            incoming_tx,
            incoming_rx: Mutex::new(Some(incoming_rx)),
            outgoing_tx,
            outgoing_rx: Mutex::new(Some(outgoing_rx)),
            reactions: Mutex::new(Vec::new()),
            typing: Mutex::new(Vec::new()),
        }
    }

    pub fn with_sleeper(mut self, sleeper: Arc<dyn Sleeper>) -> Self {
        self.delays = self.delays.with_sleeper(sleeper);
        self
    }

    /// Sender for injecting inbound utterances.
    pub fn injector(&self) -> mpsc::Sender<Incoming> {
        self.incoming_tx.clone()
    }

    /// Inject one utterance.
    pub async fn inject(
        &self,
        text: impl Into<String>,
        user: impl Into<String>,
        room: impl Into<String>,
    ) -> Result<()> {
        let incoming = Incoming {
            text: text.into(),
            user: user.into(),
            room: room.into(),
        };
        self.incoming_tx
            .send(incoming)
            .await
            .map_err(|e| self.error(e))
    }

    /// Take the reply receiver. Only the first caller gets it.
    pub fn take_replies(&self) -> Option<mpsc::Receiver<Reply>> {
        self.outgoing_rx.lock().take()
    }

    /// Emoji reactions performed so far.
    pub fn reactions(&self) -> Vec<String> {
        self.reactions.lock().clone()
    }

    /// Typing signals received so far, in order.
    pub fn typing_signals(&self) -> Vec<bool> {
        self.typing.lock().clone()
    }

    pub fn is_connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }

    fn error(&self, reason: impl ToString) -> ParleyError {
        ParleyError::Connector {
            connector: self.config.name.clone(),
            reason: reason.to_string(),
        }
    }
}

#[async_trait]
impl Connector for LoopbackConnector {
    fn config(&self) -> &ConnectorConfig {
        &self.config
    }

    fn delays(&self) -> ResponseDelays {
        self.delays.clone()
    }

    async fn connect(&self) -> Result<()> {
        self.connected.store(true, Ordering::SeqCst);
        info!(connector = %self.config.name, "loopback connected");
        Ok(())
    }

    async fn listen(&self, inbox: Inbox) -> Result<()> {
        let mut rx = self
            .incoming_rx
            .lock()
            .take()
            .ok_or_else(|| self.error("already listening"))?;

        loop {
            let incoming = tokio::select! {
                _ = self.shutdown.cancelled() => break,
                incoming = rx.recv() => match incoming {
                    Some(incoming) => incoming,
                    None => break,
                },
            };
            let message = inbox.message(incoming.text, incoming.user, incoming.room);
            inbox.deliver(message).await?;
        }
        debug!(connector = %self.config.name, "loopback stopped listening");
        Ok(())
    }

    async fn respond(&self, message: &Message, text: &str, room: &str) -> Result<()> {
        let reply = Reply {
            text: text.to_string(),
            room: room.to_string(),
            user: message.user().to_string(),
        };
        self.outgoing_tx.send(reply).await.map_err(|e| self.error(e))
    }

    async fn react(&self, _message: &Message, emoji: &str) -> Result<bool> {
        self.reactions.lock().push(emoji.to_string());
        Ok(true)
    }

    async fn user_typing(&self, trigger: bool) -> Result<()> {
        self.typing.lock().push(trigger);
        Ok(())
    }

    async fn disconnect(&self) -> Result<()> {
        self.connected.store(false, Ordering::SeqCst);
        self.shutdown.cancel();
        info!(connector = %self.config.name, "loopback disconnected");
        Ok(())
    }
}
