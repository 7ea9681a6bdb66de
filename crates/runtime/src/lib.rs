//! Async orchestration for a two-sided spell duel.
//!
//! This crate wires the pure rules of `duel-core` to the outside world: a chat
//! [`Transport`] that delivers each caster's commands, a [`UserRepository`]
//! holding persisted HP/MP, and the two cast loops that race each other into
//! the [`Resolver`]. Consumers build a [`BattleSession`] and call
//! [`BattleSession::start`] once per duel.
//!
//! Modules are organized by responsibility:
//! - [`session`] hosts the entry point and its builder
//! - [`api`] exposes the contracts and error types clients implement against
//! - [`events`] provides the topic-based event bus for observers
//! - [`repository`] and [`transport`] provide in-memory collaborators
//! - `workers` holds the cast loops, the resolver, and reward settlement
pub mod api;
pub mod events;
pub mod notices;
pub mod repository;
pub mod rng;
pub mod session;
pub mod transport;

mod workers;

pub use api::{
    CastError, DuelError, InboundMessage, MessageFilter, Result, SendOptions, Transport,
    TransportError,
};
pub use events::{CastEvent, Event, EventBus, MatchEvent, RoundEvent, Topic};
pub use repository::{InMemoryUserRepo, RepositoryError, UserRepository};
pub use rng::StdRewardRng;
pub use session::{BattleSession, BattleSessionBuilder, MatchReport, SessionConfig};
pub use transport::{MemoryTransport, OutboundMessage};
pub use workers::{
    CastLoop, CastStage, LoopExit, Resolver, RewardSettlement, RewardSettler, Submission,
};
