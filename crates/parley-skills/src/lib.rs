//! # parley-skills
//!
//! Skills are handlers invoked when their predicate matches a parsed message.
//! Registration is explicit: build a matcher, attach a handler, append the
//! result to the [`SkillRegistry`] that the dispatcher owns.
//!
//! ```ignore
//! let mut registry = SkillRegistry::new();
//! registry.register(match_intent("get_weather").handler(|_core, _config, message| async move {
//!     message.respond("Looks sunny.").await?;
//!     anyhow::Ok(())
//! }));
//! ```
//!
//! Matching never runs a handler. Parsers turn predicates into [`MatchResult`]s;
//! the dispatcher decides when to invoke them.

pub mod matcher;
pub mod registry;
pub mod skill;

pub use matcher::{MatchResult, Matcher, Predicate, match_intent, match_regex};
pub use registry::{SkillRegistration, SkillRegistry};
pub use skill::{FnSkill, Skill, skill_fn};
