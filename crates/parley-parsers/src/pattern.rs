use async_trait::async_trait;
use parley_core::{CoreContext, Message, ParsedIntent, ParserConfig};
use parley_skills::{MatchResult, Predicate, SkillRegistry};
use std::sync::Arc;
use tracing::debug;

use crate::parser::Parser;

/// Matches `match_regex` skills against the message text.
///
/// Every hit scores 1.0. Named capture groups become entities.
pub struct PatternParser {
    config: ParserConfig,
}

impl PatternParser {
    pub fn new(config: ParserConfig) -> Self {
        Self { config }
    }
}

impl Default for PatternParser {
    fn default() -> Self {
        Self::new(ParserConfig::named("regex"))
    }
}

#[async_trait]
impl Parser for PatternParser {
    fn config(&self) -> &ParserConfig {
        &self.config
    }

    async fn parse(
        &self,
        _core: &CoreContext,
        skills: &SkillRegistry,
        message: &Arc<Message>,
    ) -> Vec<MatchResult> {
        let mut matched = Vec::new();
        for skill in skills.regex_skills() {
            let Predicate::Regex(re) = skill.predicate() else {
                continue;
            };
            let Some(caps) = re.captures(message.text()) else {
                continue;
            };

            let mut entities = serde_json::Map::new();
            for name in re.capture_names().flatten() {
                if let Some(m) = caps.name(name) {
                    entities.insert(name.to_string(), serde_json::Value::from(m.as_str()));
                }
            }
            let intent = ParsedIntent::new(re.as_str(), 1.0).with_entities(entities);
            debug!(parser = %self.config.name, skill = %skill.name(), "pattern matched");

            message.attach_intent(&self.config.name, intent.clone());
            matched.push(MatchResult {
                skill: Arc::clone(skill),
                message: Arc::clone(message),
                parser: self.config.name.clone(),
                intent,
            });
        }
        matched
    }
}
