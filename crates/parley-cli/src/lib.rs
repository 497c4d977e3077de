//! # parley-cli
//!
//! Command-line interface for the Parley runtime.
//!
//! ## Commands
//!
//! - `parley start`: Connect every connector and serve messages
//! - `parley parse <text>`: Show which skills a text would trigger
//! - `parley config`: Show the validated configuration
//! - `parley skills`: List registered skills

pub mod builtin;
pub mod commands;

pub use commands::Cli;
