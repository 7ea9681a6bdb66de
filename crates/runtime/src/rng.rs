//! Process randomness for the reward step.

use std::sync::{Mutex, PoisonError};

use duel_core::{ResourceAxis, RewardRng};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// [`RewardRng`] backed by [`StdRng`].
///
/// Seed it for reproducible rewards, or draw from OS entropy in production.
pub struct StdRewardRng {
    rng: Mutex<StdRng>,
}

impl StdRewardRng {
    pub fn from_entropy() -> Self {
        Self {
            rng: Mutex::new(StdRng::from_entropy()),
        }
    }

    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }

    fn with_rng<T>(&self, f: impl FnOnce(&mut StdRng) -> T) -> T {
        let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut rng)
    }
}

impl RewardRng for StdRewardRng {
    fn pick_axis(&self) -> ResourceAxis {
        if self.with_rng(|rng| rng.gen_bool(0.5)) {
            ResourceAxis::Hp
        } else {
            ResourceAxis::Mp
        }
    }

    fn unit(&self) -> f64 {
        self.with_rng(|rng| rng.gen_range(0.0..1.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unit_stays_in_half_open_range() {
        let rng = StdRewardRng::seeded(7);
        for _ in 0..1_000 {
            let value = rng.unit();
            assert!((0.0..1.0).contains(&value));
        }
    }

    #[test]
    fn seeded_draws_repeat() {
        let a = StdRewardRng::seeded(42);
        let b = StdRewardRng::seeded(42);
        for _ in 0..16 {
            assert_eq!(a.pick_axis(), b.pick_axis());
            assert_eq!(a.unit(), b.unit());
        }
    }

    #[test]
    fn both_axes_are_drawn() {
        let rng = StdRewardRng::seeded(1);
        let draws: Vec<_> = (0..64).map(|_| rng.pick_axis()).collect();
        assert!(draws.contains(&ResourceAxis::Hp));
        assert!(draws.contains(&ResourceAxis::Mp));
    }
}
