//! # parley-config
//!
//! Configuration system for the Parley runtime. Reads `parley.toml`, then
//! applies environment overrides on top.

pub mod loader;
pub mod schema;

pub use loader::ConfigLoader;
pub use schema::{ConfigWarning, LoggingConfig, ParleyConfig, WarningSeverity};
