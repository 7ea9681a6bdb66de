//! Topic-based event bus for duel events.
//!
//! Events are published to specific topics, and observers (front-ends, tests,
//! bots) subscribe only to the topics they need. Publishing is best-effort and
//! never blocks the engine.

mod bus;
mod types;

pub use bus::{Event, EventBus, Topic};
pub use types::{CastEvent, MatchEvent, RoundEvent};
