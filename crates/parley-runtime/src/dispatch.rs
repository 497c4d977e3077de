use futures::FutureExt;
use parley_core::{CoreContext, Message, ParleyError};
use parley_parsers::Parser;
use parley_skills::{MatchResult, SkillRegistry};
use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use tracing::{debug, error, info};
use uuid::Uuid;

/// How one skill invocation ended.
#[derive(Debug)]
pub enum SkillOutcome {
    Completed,
    /// The handler returned an error or panicked.
    Failed(ParleyError),
}

impl SkillOutcome {
    pub fn is_completed(&self) -> bool {
        matches!(self, SkillOutcome::Completed)
    }
}

/// Summary of one dispatched message.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DispatchReport {
    pub message_id: Uuid,
    /// Number of skills matched across every parser.
    pub matched: usize,
    /// Names of skills that failed, in invocation order.
    pub failed: Vec<String>,
}

impl DispatchReport {
    pub fn completed(&self) -> usize {
        self.matched - self.failed.len()
    }
}

/// Runs parsers over a message and invokes what they match.
///
/// The registry and parser list are frozen at construction and shared
/// read-only by every dispatch.
pub struct Dispatcher {
    core: Arc<CoreContext>,
    skills: Arc<SkillRegistry>,
    parsers: Vec<Arc<dyn Parser>>,
}

impl Dispatcher {
    pub fn new(
        core: Arc<CoreContext>,
        skills: Arc<SkillRegistry>,
        parsers: Vec<Arc<dyn Parser>>,
    ) -> Self {
        Self {
            core,
            skills,
            parsers,
        }
    }

    pub fn core(&self) -> &Arc<CoreContext> {
        &self.core
    }

    pub fn skills(&self) -> &Arc<SkillRegistry> {
        &self.skills
    }

    pub fn parsers(&self) -> &[Arc<dyn Parser>] {
        &self.parsers
    }

    /// Run every parser in configured order and collect their matches.
    pub async fn parse(&self, message: &Arc<Message>) -> Vec<MatchResult> {
        let mut matched = Vec::new();
        for parser in &self.parsers {
            let results = parser.parse(&self.core, &self.skills, message).await;
            debug!(parser = %parser.name(), matches = results.len(), "parser finished");
            matched.extend(results);
        }
        matched
    }

    /// Invoke one matched skill. Errors and panics are logged and reported,
    /// never propagated.
    pub async fn run_skill(&self, matched: &MatchResult) -> SkillOutcome {
        let skill = matched.skill.name();
        let handler = Arc::clone(matched.skill.handler());
        let config = matched.skill.config().clone();
        let run = handler.run(Arc::clone(&self.core), config, Arc::clone(&matched.message));

        let reason = match AssertUnwindSafe(run).catch_unwind().await {
            Ok(Ok(())) => {
                debug!(skill = %skill, parser = %matched.parser, "skill completed");
                return SkillOutcome::Completed;
            }
            Ok(Err(e)) => format!("{e:#}"),
            Err(panic) => format!("panicked: {}", panic_message(panic.as_ref())),
        };

        error!(
            skill = %skill,
            parser = %matched.parser,
            message_id = %matched.message.id(),
            error = %reason,
            "exception when running skill"
        );
        SkillOutcome::Failed(ParleyError::SkillExecution { skill, reason })
    }

    /// Parse a message, then run each match in production order.
    pub async fn dispatch(&self, message: Message) -> DispatchReport {
        let message = Arc::new(message);
        let matched = self.parse(&message).await;

        let mut report = DispatchReport {
            message_id: message.id(),
            matched: matched.len(),
            failed: Vec::new(),
        };
        if matched.is_empty() {
            debug!(message_id = %message.id(), "no skill matched");
            return report;
        }

        for m in &matched {
            if let SkillOutcome::Failed(_) = self.run_skill(m).await {
                report.failed.push(m.skill.name());
            }
        }
        info!(
            message_id = %message.id(),
            matched = report.matched,
            failed = report.failed.len(),
            "message dispatched"
        );
        report
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
