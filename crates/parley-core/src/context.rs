use chrono::{DateTime, Utc};
use std::sync::Arc;

use crate::connector::Connector;

/// What a skill sees of the running bot.
pub struct CoreContext {
    connectors: Vec<Arc<dyn Connector>>,
    started_at: DateTime<Utc>,
}

impl CoreContext {
    pub fn new(connectors: Vec<Arc<dyn Connector>>) -> Self {
        Self {
            connectors,
            started_at: Utc::now(),
        }
    }

    /// A context with no connectors (for tests and one-shot parsing).
    pub fn empty() -> Self {
        Self::new(vec![])
    }

    pub fn connectors(&self) -> &[Arc<dyn Connector>] {
        &self.connectors
    }

    /// Find a connector by instance name.
    pub fn connector(&self, name: &str) -> Option<&Arc<dyn Connector>> {
        self.connectors.iter().find(|c| c.name() == name)
    }

    /// The first configured connector.
    pub fn default_connector(&self) -> Option<&Arc<dyn Connector>> {
        self.connectors.first()
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }
}
