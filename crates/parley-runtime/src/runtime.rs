use parley_config::ParleyConfig;
use parley_connectors::build_connector;
use parley_core::{Connector, CoreContext, Inbox, Message, Result};
use parley_parsers::{Parser, build_parser};
use parley_skills::SkillRegistry;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::dispatch::Dispatcher;

/// Inbound queue depth shared by all connectors.
const INBOX_CAPACITY: usize = 512;

/// Owns the connectors and the dispatcher, and moves messages between them.
pub struct Runtime {
    dispatcher: Arc<Dispatcher>,
}

impl Runtime {
    pub fn new(dispatcher: Dispatcher) -> Self {
        Self {
            dispatcher: Arc::new(dispatcher),
        }
    }

    /// Build connectors and parsers from config around a finished registry.
    pub fn from_config(config: &ParleyConfig, skills: SkillRegistry) -> Result<Self> {
        let connectors = config
            .connectors
            .iter()
            .map(build_connector)
            .collect::<Result<Vec<Arc<dyn Connector>>>>()?;

        let mut parsers: Vec<Arc<dyn Parser>> = Vec::new();
        for parser_config in &config.parsers {
            match build_parser(parser_config)? {
                Some(parser) => parsers.push(parser),
                None => debug!(parser = %parser_config.name, "parser disabled"),
            }
        }

        info!(
            connectors = connectors.len(),
            parsers = parsers.len(),
            skills = skills.count(),
            "runtime assembled"
        );
        let core = Arc::new(CoreContext::new(connectors));
        Ok(Self::new(Dispatcher::new(core, Arc::new(skills), parsers)))
    }

    pub fn dispatcher(&self) -> &Arc<Dispatcher> {
        &self.dispatcher
    }

    /// Connect every connector, listen, and dispatch each inbound message in
    /// its own task until `shutdown` fires or every listener has stopped.
    pub async fn run(&self, shutdown: CancellationToken) -> Result<()> {
        let (tx, mut rx) = mpsc::channel::<Message>(INBOX_CAPACITY);
        let mut listeners = JoinSet::new();
        let mut connected: Vec<Arc<dyn Connector>> = Vec::new();

        for connector in self.dispatcher.core().connectors() {
            let name = connector.name().to_string();
            if let Err(e) = connector.connect().await {
                error!(connector = %name, error = %e, "failed to connect");
                continue;
            }
            info!(connector = %name, "connector connected");
            connected.push(Arc::clone(connector));

            let inbox = Inbox::new(Arc::clone(connector), tx.clone());
            let connector = Arc::clone(connector);
            listeners.spawn(async move {
                if let Err(e) = connector.listen(inbox).await {
                    error!(connector = %name, error = %e, "listener stopped with an error");
                }
            });
        }
        drop(tx);

        if connected.is_empty() {
            warn!("no connector could be started");
        }

        let mut in_flight = JoinSet::new();
        loop {
            tokio::select! {
                _ = shutdown.cancelled() => {
                    info!("shutdown requested");
                    break;
                }
                next = rx.recv() => {
                    let Some(message) = next else {
                        info!("all listeners stopped");
                        break;
                    };
                    let dispatcher = Arc::clone(&self.dispatcher);
                    in_flight.spawn(async move {
                        dispatcher.dispatch(message).await;
                    });
                }
            }
            while in_flight.try_join_next().is_some() {}
        }

        while in_flight.join_next().await.is_some() {}
        for connector in &connected {
            match connector.disconnect().await {
                Ok(()) => info!(connector = %connector.name(), "connector disconnected"),
                Err(e) if e.is_not_implemented() => {
                    debug!(connector = %connector.name(), "connector has no disconnect")
                }
                Err(e) => error!(connector = %connector.name(), error = %e, "disconnect failed"),
            }
        }
        listeners.shutdown().await;
        Ok(())
    }
}
