//! Ordered conversation log with stable turn identity.
//!
//! The log is the single source of truth for turn order and content. Every
//! mutation queues a [`LogEvent`] for exactly the turn it touched (or one
//! [`LogEvent::Cleared`] for a reset) so presentation layers can follow the
//! log without diffing it.

mod error;
mod ids;
mod log;
mod turn;

pub use error::LogError;
pub use ids::{FallbackIdGenerator, IdGenerator, RandomIdGenerator, SequentialIdGenerator, TurnId};
pub use log::{LogEvent, MessageLog};
pub use turn::{Role, Turn, TurnPatch};
