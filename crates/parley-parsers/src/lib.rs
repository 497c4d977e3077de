//! # parley-parsers
//!
//! NLU parsers that turn a message into the skills it should run. Each parser
//! owns its config, calls its backend at most once per message, and reports
//! backend faults as "no match" instead of failing.

pub mod backend;
pub mod mock;
pub mod parser;
pub mod pattern;
pub mod witai;

pub use backend::IntentBackend;
pub use mock::MockBackend;
pub use parser::Parser;
pub use pattern::PatternParser;
pub use witai::{WitAiClient, WitAiParser};

use parley_core::{ParleyError, ParserConfig, Result};
use std::sync::Arc;

/// Build the parser a config entry names. Disabled entries yield `None`.
pub fn build_parser(config: &ParserConfig) -> Result<Option<Arc<dyn Parser>>> {
    if !config.enabled {
        return Ok(None);
    }
    config.validate()?;
    let parser: Arc<dyn Parser> = match config.name.as_str() {
        "witai" => Arc::new(WitAiParser::new(config.clone())),
        "regex" => Arc::new(PatternParser::new(config.clone())),
        other => {
            return Err(ParleyError::Config(format!("unknown parser '{other}'")));
        }
    };
    Ok(Some(parser))
}
