//! Round resolution rules.
//!
//! Pure functions for turning the spells cast in one round into a damage
//! exchange and a termination verdict. All functions are side-effect free.
//!
//! # Core Functions
//!
//! - `calculate_damage`: one direction of the exchange
//! - `Exchange::between`: both directions, computed from pre-round values
//! - `evaluate_outcome`: draw / victory / continue after damage is applied

pub mod damage;
pub mod result;

pub use damage::calculate_damage;
pub use result::{MatchOutcome, evaluate_outcome};

use crate::resources::ResourcePool;
use crate::side::Side;
use crate::spell::Spell;

/// Damage dealt in both directions during one round.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Exchange {
    pub alpha_to_beta: i64,
    pub beta_to_alpha: i64,
}

impl Exchange {
    /// Compute the exchange for the spells pending on each side.
    ///
    /// `pending` is indexed by [`Side::index`]; a missing spell deals nothing.
    pub fn between(pending: &[Option<Box<dyn Spell>>; 2]) -> Self {
        let alpha = pending[Side::Alpha.index()].as_deref();
        let beta = pending[Side::Beta.index()].as_deref();

        Self {
            alpha_to_beta: calculate_damage(alpha, beta),
            beta_to_alpha: calculate_damage(beta, alpha),
        }
    }

    /// Damage dealt by `side`.
    pub const fn dealt_by(&self, side: Side) -> i64 {
        match side {
            Side::Alpha => self.alpha_to_beta,
            Side::Beta => self.beta_to_alpha,
        }
    }

    /// Apply both directions at once.
    pub fn apply(&self, pools: &mut [ResourcePool; 2]) {
        pools[Side::Beta.index()].take_damage(self.alpha_to_beta);
        pools[Side::Alpha.index()].take_damage(self.beta_to_alpha);
    }
}
