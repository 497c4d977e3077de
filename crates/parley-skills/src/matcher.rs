//! Matcher constructors and the unit of work they produce.

use parley_core::{Message, ParleyError, ParsedIntent, SkillConfig};
use regex::Regex;
use std::future::Future;
use std::sync::Arc;

use crate::registry::SkillRegistration;
use crate::skill::{Skill, skill_fn};

/// What a skill waits for.
#[derive(Debug, Clone)]
pub enum Predicate {
    /// An NLU intent with this exact name.
    Intent(String),
    /// A regular expression found anywhere in the message text.
    Regex(Regex),
}

impl Predicate {
    pub fn matches_intent(&self, name: &str) -> bool {
        matches!(self, Predicate::Intent(intent) if intent == name)
    }

    /// Short label used in logs and as a fallback skill name.
    pub fn describe(&self) -> String {
        match self {
            Predicate::Intent(name) => format!("intent:{name}"),
            Predicate::Regex(re) => format!("regex:{}", re.as_str()),
        }
    }
}

/// A predicate waiting for its handler.
#[derive(Debug, Clone)]
pub struct Matcher {
    predicate: Predicate,
    config: SkillConfig,
}

/// Match when an NLU parser selects the intent `name`.
pub fn match_intent(name: impl Into<String>) -> Matcher {
    Matcher::new(Predicate::Intent(name.into()))
}

/// Match when `pattern` is found in the message text.
pub fn match_regex(pattern: &str) -> parley_core::Result<Matcher> {
    let re = Regex::new(pattern).map_err(|e| ParleyError::ConfigValidation {
        field: "match_regex".into(),
        reason: format!("invalid pattern '{pattern}': {e}"),
    })?;
    Ok(Matcher::new(Predicate::Regex(re)))
}

impl Matcher {
    pub fn new(predicate: Predicate) -> Self {
        Self {
            predicate,
            config: SkillConfig::default(),
        }
    }

    pub fn predicate(&self) -> &Predicate {
        &self.predicate
    }

    /// Config handed to the skill on every invocation.
    pub fn with_config(mut self, config: SkillConfig) -> Self {
        self.config = config;
        self
    }

    /// Attach a handler, producing a registration ready for the registry.
    pub fn skill<S: Skill + 'static>(self, skill: S) -> SkillRegistration {
        SkillRegistration::new(self.predicate, Arc::new(skill), self.config)
    }

    /// Attach an async closure as the handler.
    pub fn handler<F, Fut>(self, f: F) -> SkillRegistration
    where
        F: Fn(Arc<parley_core::CoreContext>, SkillConfig, Arc<Message>) -> Fut
            + Send
            + Sync
            + 'static,
        Fut: Future<Output = anyhow::Result<()>> + Send + 'static,
    {
        self.skill(skill_fn(f))
    }
}

/// A matched skill queued for invocation.
#[derive(Clone)]
pub struct MatchResult {
    pub skill: Arc<SkillRegistration>,
    pub message: Arc<Message>,
    /// Name of the parser that produced the match.
    pub parser: String,
    /// The interpretation that matched.
    pub intent: ParsedIntent,
}

impl MatchResult {
    pub fn score(&self) -> f64 {
        self.intent.confidence
    }
}

impl std::fmt::Debug for MatchResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MatchResult")
            .field("skill", &self.skill.name())
            .field("message", &self.message.id())
            .field("parser", &self.parser)
            .field("intent", &self.intent)
            .finish()
    }
}
