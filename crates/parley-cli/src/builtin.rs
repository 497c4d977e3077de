//! Skills that ship with the binary.

use parley_config::ParleyConfig;
use parley_core::{CoreContext, Message, SkillConfig};
use parley_skills::{SkillRegistry, match_intent, match_regex};
use std::sync::Arc;

const GREETING_PATTERN: &str = r"(?i)^\s*(hi|hello|hey)\b";

/// Registry holding every built-in skill, configured from `[[skills]]`.
pub fn registry(config: &ParleyConfig) -> parley_core::Result<SkillRegistry> {
    let mut skills = SkillRegistry::new();
    skills.register(
        match_regex(GREETING_PATTERN)?
            .with_config(config.skill("hello"))
            .handler(hello),
    );
    skills.register(
        match_intent("ping")
            .with_config(config.skill("ping"))
            .handler(ping),
    );
    Ok(skills)
}

/// Greets the sender. `greeting` overrides the salutation.
async fn hello(
    _core: Arc<CoreContext>,
    config: SkillConfig,
    message: Arc<Message>,
) -> anyhow::Result<()> {
    let greeting = config
        .get("greeting")
        .and_then(|v| v.as_str())
        .unwrap_or("Hello");
    message
        .respond(&format!("{greeting}, {}!", message.user()))
        .await?;
    Ok(())
}

/// Liveness check over NLU: answers the `ping` intent.
async fn ping(
    core: Arc<CoreContext>,
    _config: SkillConfig,
    message: Arc<Message>,
) -> anyhow::Result<()> {
    message.react("🏓").await?;
    let uptime = chrono::Utc::now() - core.started_at();
    message
        .respond(&format!("pong (up {}s)", uptime.num_seconds()))
        .await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use parley_connectors::LoopbackConnector;
    use parley_core::{Connector, ConnectorConfig};
    use serde_json::json;

    fn loopback() -> Arc<LoopbackConnector> {
        Arc::new(LoopbackConnector::new(ConnectorConfig::named("loopback")))
    }

    #[test]
    fn registers_both_builtins() {
        let skills = registry(&ParleyConfig::default()).unwrap();
        let names: Vec<_> = skills.list().iter().map(|s| s.name()).collect();
        assert_eq!(names, vec!["hello", "ping"]);
    }

    #[test]
    fn greeting_pattern_matches_leading_salutation_only() {
        let re = regex::Regex::new(GREETING_PATTERN).unwrap();
        assert!(re.is_match("Hello there"));
        assert!(re.is_match("  hey"));
        assert!(!re.is_match("they said hi"));
        assert!(!re.is_match("hillo"));
    }

    #[tokio::test]
    async fn hello_uses_configured_greeting() {
        let connector = loopback();
        let mut replies = connector.take_replies().unwrap();
        let mut config = SkillConfig::named("hello");
        config.settings.insert("greeting".into(), json!("Howdy"));
        let message = Arc::new(Message::new("hi", "ada", "room", connector.clone()));

        hello(Arc::new(CoreContext::empty()), config, message)
            .await
            .unwrap();
        assert_eq!(replies.recv().await.unwrap().text, "Howdy, ada!");
    }

    #[tokio::test]
    async fn ping_reacts_and_answers() {
        let connector = loopback();
        let mut replies = connector.take_replies().unwrap();
        let connectors: Vec<Arc<dyn Connector>> = vec![connector.clone()];
        let message = Arc::new(Message::new("ping", "ada", "room", connector.clone()));

        ping(
            Arc::new(CoreContext::new(connectors)),
            SkillConfig::named("ping"),
            message,
        )
        .await
        .unwrap();
        assert!(replies.recv().await.unwrap().text.starts_with("pong"));
        assert_eq!(connector.reactions(), vec!["🏓"]);
    }
}
