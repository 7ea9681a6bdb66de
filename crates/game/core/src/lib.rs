//! Pure duel rules shared by the runtime and front-ends.
//!
//! `duel-core` defines the canonical rules of a two-sided spell duel: resource
//! pools, the spell contract, the simultaneous damage exchange, termination,
//! and the post-match reward table. Nothing here performs I/O or awaits; the
//! async orchestration lives in `duel-runtime`.
pub mod combat;
pub mod config;
pub mod resources;
pub mod reward;
pub mod side;
pub mod spell;

pub use combat::{Exchange, MatchOutcome, calculate_damage, evaluate_outcome};
pub use config::DuelConfig;
pub use resources::{ResourceAxis, ResourcePool};
pub use reward::{
    FixedRewardRng, REWARD_BRACKETS, RewardBracket, RewardPlan, RewardRng, bracket_for,
    plan_reward, reward_ratio,
};
pub use side::{ChannelId, Combatant, Side, UserId};
pub use spell::{Spell, SpellFactory};
