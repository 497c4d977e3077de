use async_trait::async_trait;
use parley_core::{CoreContext, Message, ParserConfig};
use parley_skills::{MatchResult, SkillRegistry};
use std::sync::Arc;

/// Trait implemented by each NLU parser (wit.ai, regex, ...).
///
/// `parse` never fails: backend faults are logged and reported as "no match".
#[async_trait]
pub trait Parser: Send + Sync {
    /// Name used for logging and as the key of attached intent context.
    fn name(&self) -> &str {
        &self.config().name
    }

    fn config(&self) -> &ParserConfig;

    /// Turn one message into the skills it should run, in registration order.
    async fn parse(
        &self,
        core: &CoreContext,
        skills: &SkillRegistry,
        message: &Arc<Message>,
    ) -> Vec<MatchResult>;
}
