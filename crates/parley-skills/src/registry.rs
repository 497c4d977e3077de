use parley_core::SkillConfig;
use std::sync::Arc;
use tracing::{debug, info};

use crate::matcher::Predicate;
use crate::skill::Skill;

/// A predicate bound to its handler and config.
pub struct SkillRegistration {
    predicate: Predicate,
    handler: Arc<dyn Skill>,
    config: SkillConfig,
}

impl SkillRegistration {
    pub fn new(predicate: Predicate, handler: Arc<dyn Skill>, config: SkillConfig) -> Self {
        Self {
            predicate,
            handler,
            config,
        }
    }

    pub fn predicate(&self) -> &Predicate {
        &self.predicate
    }

    pub fn handler(&self) -> &Arc<dyn Skill> {
        &self.handler
    }

    pub fn config(&self) -> &SkillConfig {
        &self.config
    }

    /// Identity used in logs: the configured name, else the predicate.
    pub fn name(&self) -> String {
        if self.config.name.is_empty() {
            self.predicate.describe()
        } else {
            self.config.name.clone()
        }
    }
}

/// Every skill the bot knows, in registration order.
///
/// Built once at startup, then shared read-only with the dispatcher.
/// Registration order drives iteration, not priority.
#[derive(Default)]
pub struct SkillRegistry {
    skills: Vec<Arc<SkillRegistration>>,
}

impl SkillRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a registration.
    pub fn register(&mut self, registration: SkillRegistration) -> &mut Self {
        info!(skill = %registration.name(), predicate = %registration.predicate().describe(), "registered skill");
        self.skills.push(Arc::new(registration));
        self
    }

    /// All registrations, in insertion order.
    pub fn list(&self) -> &[Arc<SkillRegistration>] {
        &self.skills
    }

    /// Registrations waiting for the intent `name`, in insertion order.
    pub fn matching_intent<'a>(
        &'a self,
        name: &'a str,
    ) -> impl Iterator<Item = &'a Arc<SkillRegistration>> + 'a {
        let matched = self
            .skills
            .iter()
            .filter(move |s| s.predicate().matches_intent(name));
        debug!(intent = name, "matching registered skills");
        matched
    }

    /// Registrations with a regex predicate, in insertion order.
    pub fn regex_skills(&self) -> impl Iterator<Item = &Arc<SkillRegistration>> {
        self.skills
            .iter()
            .filter(|s| matches!(s.predicate(), Predicate::Regex(_)))
    }

    pub fn count(&self) -> usize {
        self.skills.len()
    }

    pub fn is_empty(&self) -> bool {
        self.skills.is_empty()
    }
}
