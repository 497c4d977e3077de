//! # parley-core
//!
//! Core types and traits for the Parley dispatch runtime: messages, the connector
//! capability set, response pacing, parsed intents, per-consumer configuration
//! and the shared error type. Every other crate in the workspace builds on these.

pub mod connector;
pub mod context;
pub mod delay;
pub mod error;
pub mod intent;
pub mod message;
pub mod settings;

pub use connector::{BaseConnector, Connector, Inbox};
pub use context::CoreContext;
pub use delay::{ResponseDelays, Sleeper, TokioSleeper};
pub use error::{ParleyError, Result};
pub use intent::{ParsedIntent, best_intent};
pub use message::Message;
pub use settings::{ConnectorConfig, DelaySpec, ParserConfig, SkillConfig};
