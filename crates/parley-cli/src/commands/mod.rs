use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::fmt::writer::BoxMakeWriter;

use parley_config::{ConfigLoader, LoggingConfig};
use parley_core::ParleyError;

mod config;
mod parse;
mod skills;
mod start;

/// Parley chat-bot runtime: parse messages, match skills, reply
#[derive(Parser, Debug)]
#[command(name = "parley", version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to parley.toml config file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Log level override (e.g. debug, info, warn, error)
    #[arg(short, long, global = true)]
    log_level: Option<String>,

    /// Enable verbose output (debug logging)
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    verbose: bool,

    /// Suppress all log output (errors only)
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug, PartialEq)]
enum Commands {
    /// Start the bot: connect every connector and dispatch messages
    Start,
    /// Run the parsers against a text and print what would match
    Parse {
        /// The utterance to parse
        text: String,
        /// User the message is attributed to
        #[arg(short, long, default_value = "cli")]
        user: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show the validated configuration
    Config {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// List registered skills
    Skills,
}

impl Cli {
    pub async fn run(self) -> parley_core::Result<()> {
        // Load config first so we can use it for log format
        let config_loader = ConfigLoader::load(self.config.as_deref())?;
        let config = config_loader.get();

        init_tracing(&config.logging, self.log_level_override())?;
        config_loader.log_warnings();

        match self.command {
            Commands::Start => start::cmd_start(config).await,
            Commands::Parse { text, user, json } => {
                parse::cmd_parse(config, &text, &user, json).await
            }
            Commands::Config { json } => config::cmd_config(&config_loader, json),
            Commands::Skills => skills::cmd_skills(&config),
        }
    }

    /// Resolve log level: --verbose > --quiet > --log-level > config.
    fn log_level_override(&self) -> Option<&str> {
        if self.verbose {
            Some("debug")
        } else if self.quiet {
            Some("error")
        } else {
            self.log_level.as_deref()
        }
    }
}

/// Install the global subscriber. `RUST_LOG` wins over everything else.
///
/// Logs go to stderr (or `logging.file`) so stdout stays free for the shell
/// connector.
fn init_tracing(logging: &LoggingConfig, level: Option<&str>) -> parley_core::Result<()> {
    let level = level.unwrap_or(logging.level.as_str());
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    let writer = match logging.file {
        Some(ref path) => {
            let file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .map_err(|e| {
                    ParleyError::Config(format!("cannot open log file {}: {e}", path.display()))
                })?;
            BoxMakeWriter::new(Arc::new(file))
        }
        None => BoxMakeWriter::new(std::io::stderr),
    };

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer);
    match logging.format.as_str() {
        "json" => builder.json().with_target(true).init(),
        "compact" => builder.compact().with_target(false).init(),
        _ => builder.with_target(false).init(),
    }
    Ok(())
}
