//! # parley-runtime
//!
//! The dispatch loop that connects connectors, parsers and skills.
//!
//! ```text
//!              ┌──────────────┐
//!              │  Connectors  │  ← shell, loopback, ...
//!              └──────┬───────┘
//!                     │ Message
//!                     ▼
//!              ┌──────────────┐
//!              │  Dispatcher  │
//!              │              │
//!              │  1. Parse    │  ← every parser, in configured order
//!              │  2. Match    │  ← skill predicates
//!              │  3. Run      │  ← each skill, errors and panics contained
//!              └──────────────┘
//!                     │
//!                     ▼
//!              message.respond(..) → connector
//! ```
//!
//! Each inbound message is dispatched in its own task.

pub mod dispatch;
pub mod runtime;

pub use dispatch::{DispatchReport, Dispatcher, SkillOutcome};
pub use runtime::Runtime;
