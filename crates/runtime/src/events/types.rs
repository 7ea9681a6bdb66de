//! Event types for different topics.

use duel_core::{Exchange, MatchOutcome, ResourcePool, Side};
use serde::Serialize;

use crate::workers::{CastStage, LoopExit, RewardSettlement};

/// Events emitted by the cast loops.
#[derive(Debug, Clone, Serialize)]
pub enum CastEvent {
    /// A finished spell reached the resolver.
    SpellSubmitted {
        side: Side,
        round: u64,
        /// Whether this submission opened the resolution window.
        opened_window: bool,
    },

    /// A cast attempt ended without a spell; the loop keeps running.
    AttemptAborted {
        side: Side,
        stage: CastStage,
        reason: String,
    },

    /// A cast loop stopped for good.
    LoopExited { side: Side, exit: LoopExit },
}

/// A resolved round (lightweight).
#[derive(Debug, Clone, Serialize)]
pub struct RoundEvent {
    pub round: u64,
    pub exchange: Exchange,
    /// Pools after damage, indexed by [`Side::index`].
    pub pools: [ResourcePool; 2],
}

/// Events concerning the match as a whole.
#[derive(Debug, Clone, Serialize)]
pub enum MatchEvent {
    /// Published exactly once per match, after any reward was paid.
    Finished { outcome: MatchOutcome, rounds: u64 },

    /// The winner's reward was persisted.
    RewardSettled(RewardSettlement),
}
