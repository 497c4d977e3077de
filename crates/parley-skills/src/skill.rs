use async_trait::async_trait;
use parley_core::{CoreContext, Message, SkillConfig};
use std::future::Future;
use std::sync::Arc;

/// A handler invoked when its predicate matches.
///
/// Skills talk to the user through [`Message::respond`]; the return value only
/// tells the dispatcher whether the run failed.
#[async_trait]
pub trait Skill: Send + Sync {
    async fn run(
        &self,
        core: Arc<CoreContext>,
        config: SkillConfig,
        message: Arc<Message>,
    ) -> anyhow::Result<()>;
}

/// Adapts an async closure into a [`Skill`].
pub struct FnSkill<F>(F);

/// Wrap an async closure `|core, config, message| async move { .. }` as a skill.
pub fn skill_fn<F, Fut>(f: F) -> FnSkill<F>
where
    F: Fn(Arc<CoreContext>, SkillConfig, Arc<Message>) -> Fut + Send + Sync,
    Fut: Future<Output = anyhow::Result<()>> + Send + 'static,
{
    FnSkill(f)
}

#[async_trait]
impl<F, Fut> Skill for FnSkill<F>
where
    F: Fn(Arc<CoreContext>, SkillConfig, Arc<Message>) -> Fut + Send + Sync,
    Fut: Future<Output = anyhow::Result<()>> + Send + 'static,
{
    async fn run(
        &self,
        core: Arc<CoreContext>,
        config: SkillConfig,
        message: Arc<Message>,
    ) -> anyhow::Result<()> {
        (self.0)(core, config, message).await
    }
}
