//! # parley-connectors
//!
//! Transport adapters. Each one implements the `Connector` capability set from
//! `parley-core` and is built from a `[[connectors]]` config entry.
//!
//! | Type       | Transport                                  |
//! |------------|--------------------------------------------|
//! | `shell`    | stdin lines in, stdout replies out         |
//! | `loopback` | in-process channels, for tests and embedding |
//!
//! The connector type comes from the entry's `type` key, falling back to its name.

pub mod loopback;
pub mod shell;

pub use loopback::{Incoming, LoopbackConnector, Reply};
pub use shell::ShellConnector;

use parley_core::{Connector, ConnectorConfig, ParleyError, Result};
use std::sync::Arc;

/// Build the connector a config entry describes.
pub fn build_connector(config: &ConnectorConfig) -> Result<Arc<dyn Connector>> {
    config.validate()?;
    match config.kind() {
        "shell" => Ok(Arc::new(ShellConnector::new(config.clone()))),
        "loopback" => Ok(Arc::new(LoopbackConnector::new(config.clone()))),
        other => Err(ParleyError::Config(format!(
            "unknown connector type '{other}' for '{}'",
            config.name
        ))),
    }
}
