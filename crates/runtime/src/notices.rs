//! Texts the engine posts to the duel channel.

use duel_core::{Combatant, ResourceAxis, ResourcePool};

pub const GAME_START: &str = "Game start!";
pub const CASTING_STARTED: &str = "Casting started.";
pub const CASTING_FAILED: &str = "Casting failed.";
pub const MP_EXHAUSTED: &str = "MP exhausted.";
pub const ELEMENTS_GENERATED: &str = "Element generation complete.";
pub const COMMAND_RECEIVED: &str = "Command received.";
pub const SPELL_RELEASED: &str = "Releasing the spell.";
pub const DRAW: &str = "Mutual defeat! Both sides reached 0 HP, so the match is a draw.";

/// Prefix a cast-loop notice with the caster it concerns.
pub fn to_caster(caster: &Combatant, notice: &str) -> String {
    format!("{} {}", caster.mention, notice)
}

pub fn damage(from: &Combatant, to: &Combatant, amount: i64) -> String {
    format!("{} deals {} damage to {}!", from.mention, amount, to.mention)
}

pub fn victory(winner: &Combatant) -> String {
    format!("{} wins!", winner.mention)
}

pub fn status(combatant: &Combatant, pool: &ResourcePool) -> String {
    format!(
        "{}\n HP: {}\n MP: {}",
        combatant.mention, pool.hp, pool.mp
    )
}

pub fn transfer(combatant: &Combatant, axis: ResourceAxis, before: i64, after: i64) -> String {
    format!("{}, {}: {} -> {}", combatant.mention, axis, before, after)
}
