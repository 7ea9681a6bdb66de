//! Demo spell for hot-seat play.
//!
//! `ignite` adds fire, `barrier` adds a shield. Each command must follow the
//! previous one (or element generation) within the command gap, so a caster
//! who dawdles loses the spell.
use chrono::{DateTime, TimeDelta, Utc};
use duel_core::Spell;

const IGNITE: &str = "ignite";
const BARRIER: &str = "barrier";

const IGNITE_COST: u32 = 3;
const IGNITE_DAMAGE: i64 = 12;
const BARRIER_COST: u32 = 2;
const BARRIER_DEFENCE: i64 = 6;

/// Bonus when the opponent stood unguarded this round.
const UNOPPOSED_BONUS: i64 = 4;

pub struct EmberSpell {
    last_command_at: DateTime<Utc>,
    gap: TimeDelta,
    ignitions: i64,
    barriers: i64,
}

impl EmberSpell {
    pub const DEFAULT_GAP_SECS: i64 = 10;

    pub fn new() -> Self {
        Self::with_gap(TimeDelta::seconds(Self::DEFAULT_GAP_SECS), Utc::now())
    }

    pub fn with_gap(gap: TimeDelta, started_at: DateTime<Utc>) -> Self {
        Self {
            last_command_at: started_at,
            gap,
            ignitions: 0,
            barriers: 0,
        }
    }

    pub fn boxed() -> Box<dyn Spell> {
        Box::new(Self::new())
    }
}

impl Spell for EmberSpell {
    fn can_cast_at(&self, at: DateTime<Utc>) -> bool {
        at - self.last_command_at <= self.gap
    }

    fn receive_command(&mut self, content: &str, at: DateTime<Utc>) -> Option<u32> {
        let cost = match content.to_ascii_lowercase().as_str() {
            IGNITE => {
                self.ignitions += 1;
                IGNITE_COST
            }
            BARRIER => {
                self.barriers += 1;
                BARRIER_COST
            }
            _ => return None,
        };
        self.last_command_at = at;
        Some(cost)
    }

    fn calculate_damage(&self, opponent: Option<&dyn Spell>) -> i64 {
        let base = self.ignitions * IGNITE_DAMAGE;
        match opponent {
            Some(_) => base,
            None if base > 0 => base + UNOPPOSED_BONUS,
            None => 0,
        }
    }

    fn calculate_defence(&self, _opponent: &dyn Spell) -> i64 {
        self.barriers * BARRIER_DEFENCE
    }
}
