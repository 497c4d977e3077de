use parley_config::ParleyConfig;
use parley_core::{BaseConnector, Connector, ConnectorConfig, CoreContext, Message};
use parley_parsers::{Parser, build_parser};
use parley_runtime::Dispatcher;
use parley_skills::MatchResult;
use std::sync::Arc;

use crate::builtin;

/// Parse without executing: every match is printed, no skill runs.
pub(super) async fn cmd_parse(
    config: ParleyConfig,
    text: &str,
    user: &str,
    json: bool,
) -> parley_core::Result<()> {
    let mut parsers: Vec<Arc<dyn Parser>> = Vec::new();
    for parser_config in &config.parsers {
        if let Some(parser) = build_parser(parser_config)? {
            parsers.push(parser);
        }
    }
    let dispatcher = Dispatcher::new(
        Arc::new(CoreContext::empty()),
        Arc::new(builtin::registry(&config)?),
        parsers,
    );

    let connector: Arc<dyn Connector> = Arc::new(BaseConnector::new(ConnectorConfig::named("cli")));
    let message = Arc::new(Message::new(text, user, "", connector));
    let matches = dispatcher.parse(&message).await;

    if json {
        let rows: Vec<_> = matches.iter().map(match_json).collect();
        println!("{}", serde_json::to_string_pretty(&rows)?);
        return Ok(());
    }

    if matches.is_empty() {
        println!("no skill matched \"{text}\"");
        return Ok(());
    }
    for m in &matches {
        println!(
            "{:<8} {:<16} intent={} score={:.3}",
            m.parser,
            m.skill.name(),
            m.intent.name,
            m.score()
        );
        for (slot, value) in &m.intent.entities {
            println!("{:<8} {:<16}   {slot} = {value}", "", "");
        }
    }
    Ok(())
}

fn match_json(m: &MatchResult) -> serde_json::Value {
    serde_json::json!({
        "parser": m.parser,
        "skill": m.skill.name(),
        "intent": m.intent,
    })
}
