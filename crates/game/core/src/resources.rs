//! Resource pools (HP and MP) carried by each combatant.
//!
//! The same shape is used for the in-battle counters and for the persisted
//! user record, so the reward step can read both without conversion.

// ============================================================================
// Resource Axis
// ============================================================================

/// Which resource a reward transfer is applied to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::AsRefStr)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ResourceAxis {
    /// Health points.
    #[strum(serialize = "HP")]
    Hp,
    /// Magic points.
    #[strum(serialize = "MP")]
    Mp,
}

// ============================================================================
// Resource Pool
// ============================================================================

/// HP/MP counters for one combatant.
///
/// MP is only changed through [`ResourcePool::spend`] and never becomes
/// negative. HP is only lowered by damage and may go below zero for the
/// remainder of the round in which the combatant is defeated.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ResourcePool {
    pub hp: i64,
    pub mp: i64,
}

impl ResourcePool {
    /// Starting values for users the store has never seen.
    pub const STARTING: ResourcePool = ResourcePool { hp: 100, mp: 100 };

    pub const fn new(hp: i64, mp: i64) -> Self {
        Self { hp, mp }
    }

    /// Spend `amount` MP.
    ///
    /// Returns `false` when `amount` exceeds the current MP; the counter is
    /// then clamped to zero rather than rolled back.
    pub fn spend(&mut self, amount: u32) -> bool {
        self.mp = self.mp.saturating_sub(i64::from(amount));
        if self.mp < 0 {
            self.mp = 0;
            return false;
        }
        true
    }

    /// Lower HP by `amount`. Only saturates at the `i64` bounds.
    pub fn take_damage(&mut self, amount: i64) {
        self.hp = self.hp.saturating_sub(amount);
    }

    pub const fn is_defeated(&self) -> bool {
        self.hp <= 0
    }

    /// Sum of both counters, used for the reward ratio.
    pub const fn total(&self) -> i64 {
        self.hp + self.mp
    }

    pub const fn get(&self, axis: ResourceAxis) -> i64 {
        match axis {
            ResourceAxis::Hp => self.hp,
            ResourceAxis::Mp => self.mp,
        }
    }

    /// Copy of this pool with `axis` replaced by `value`.
    pub const fn with(self, axis: ResourceAxis, value: i64) -> Self {
        match axis {
            ResourceAxis::Hp => Self { hp: value, ..self },
            ResourceAxis::Mp => Self { mp: value, ..self },
        }
    }
}
