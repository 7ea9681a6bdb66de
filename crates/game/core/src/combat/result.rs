//! Match termination rules.

use crate::resources::ResourcePool;
use crate::side::Side;

/// Final result of a duel.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MatchOutcome {
    /// Both sides fell in the same round. No reward is paid.
    Draw,
    /// One side fell.
    Victory { winner: Side },
}

impl MatchOutcome {
    pub const fn winner(&self) -> Option<Side> {
        match self {
            MatchOutcome::Draw => None,
            MatchOutcome::Victory { winner } => Some(*winner),
        }
    }
}

/// Decide whether the match is over after a round's damage was applied.
///
/// `pools` is indexed by [`Side::index`]. Returns `None` while both sides are
/// still standing.
pub fn evaluate_outcome(pools: &[ResourcePool; 2]) -> Option<MatchOutcome> {
    let alpha_down = pools[Side::Alpha.index()].is_defeated();
    let beta_down = pools[Side::Beta.index()].is_defeated();

    match (alpha_down, beta_down) {
        (true, true) => Some(MatchOutcome::Draw),
        (true, false) => Some(MatchOutcome::Victory { winner: Side::Beta }),
        (false, true) => Some(MatchOutcome::Victory {
            winner: Side::Alpha,
        }),
        (false, false) => None,
    }
}
