//! Post-match reward table.
//!
//! The winner takes a share of one of the loser's persisted resources. The
//! share depends on how lopsided the match was on paper: the ratio of the
//! winner's persisted total to the loser's.
//!
//! ```text
//! ratio = (winner.hp + winner.mp) / (loser.hp + loser.mp)
//! gain  = floor(loser[axis] * gain_rate * (unit + 1))    unit in [0, 1)
//! loss  = floor(loser[axis] * loss_rate)
//! ```
//!
//! An underdog win (low ratio) pays the most.

use crate::resources::{ResourceAxis, ResourcePool};

// ============================================================================
// Randomness
// ============================================================================

/// Source of the two random draws made by the reward step.
///
/// Injected so callers can fix both draws in tests or replays.
pub trait RewardRng: Send + Sync {
    /// Pick the resource the transfer is applied to, HP or MP with equal odds.
    fn pick_axis(&self) -> ResourceAxis;

    /// A value in `[0, 1)` used to scale the winner's gain.
    fn unit(&self) -> f64;
}

/// [`RewardRng`] that always returns the same draws.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FixedRewardRng {
    pub axis: ResourceAxis,
    pub unit: f64,
}

impl FixedRewardRng {
    pub const fn new(axis: ResourceAxis, unit: f64) -> Self {
        Self { axis, unit }
    }
}

impl RewardRng for FixedRewardRng {
    fn pick_axis(&self) -> ResourceAxis {
        self.axis
    }

    fn unit(&self) -> f64 {
        self.unit
    }
}

// ============================================================================
// Bracket Table
// ============================================================================

/// One row of the reward table.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RewardBracket {
    /// Inclusive upper bound of the ratio; `None` for the catch-all row.
    pub max_ratio: Option<f64>,
    pub gain_rate: f64,
    pub loss_rate: f64,
}

impl RewardBracket {
    const fn upto(max_ratio: f64, rate: f64) -> Self {
        Self {
            max_ratio: Some(max_ratio),
            gain_rate: rate,
            loss_rate: rate,
        }
    }

    fn contains(&self, ratio: f64) -> bool {
        self.max_ratio.is_none_or(|max| ratio <= max)
    }
}

/// Reward rows, evaluated low-to-high; the first row that contains the ratio
/// wins.
pub const REWARD_BRACKETS: [RewardBracket; 6] = [
    RewardBracket::upto(0.5, 0.15),
    RewardBracket::upto(0.6, 0.12),
    RewardBracket::upto(0.7, 0.10),
    RewardBracket::upto(0.8, 0.07),
    RewardBracket::upto(0.9, 0.06),
    RewardBracket {
        max_ratio: None,
        gain_rate: 0.05,
        loss_rate: 0.05,
    },
];

/// Select the bracket for `ratio`.
pub fn bracket_for(ratio: f64) -> RewardBracket {
    REWARD_BRACKETS
        .iter()
        .copied()
        .find(|bracket| bracket.contains(ratio))
        .unwrap_or(REWARD_BRACKETS[REWARD_BRACKETS.len() - 1])
}

/// Strength ratio of the winner over the loser on persisted records.
///
/// A loser with no positive total makes the ratio unbounded, which lands in
/// the catch-all bracket.
pub fn reward_ratio(winner: &ResourcePool, loser: &ResourcePool) -> f64 {
    let loser_total = loser.total();
    if loser_total <= 0 {
        return f64::INFINITY;
    }
    winner.total() as f64 / loser_total as f64
}

// ============================================================================
// Reward Plan
// ============================================================================

/// Resolved transfer for one finished match.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RewardPlan {
    pub axis: ResourceAxis,
    pub ratio: f64,
    /// Amount added to the winner's axis.
    pub gain: i64,
    /// Amount removed from the loser's axis.
    pub loss: i64,
}

impl RewardPlan {
    /// Winner's record after the transfer.
    pub fn winner_after(&self, winner: ResourcePool) -> ResourcePool {
        winner.with(self.axis, winner.get(self.axis) + self.gain)
    }

    /// Loser's record after the transfer, optionally clamped at zero.
    pub fn loser_after(&self, loser: ResourcePool, clamp: bool) -> ResourcePool {
        let mut value = loser.get(self.axis) - self.loss;
        if clamp {
            value = value.max(0);
        }
        loser.with(self.axis, value)
    }
}

/// Compute the transfer for a finished match from both persisted records.
pub fn plan_reward(
    winner: &ResourcePool,
    loser: &ResourcePool,
    rng: &(impl RewardRng + ?Sized),
) -> RewardPlan {
    let axis = rng.pick_axis();
    let ratio = reward_ratio(winner, loser);
    let bracket = bracket_for(ratio);

    let base = loser.get(axis) as f64;
    let gain = (base * bracket.gain_rate * (rng.unit() + 1.0)).floor() as i64;
    let loss = (base * bracket.loss_rate).floor() as i64;

    RewardPlan {
        axis,
        ratio,
        gain,
        loss,
    }
}
