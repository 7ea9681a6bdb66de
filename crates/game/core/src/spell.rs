//! Contract for the spell builder driven by a cast attempt.
//!
//! The concrete grammar of a spell (elements, combinations, formulas) belongs
//! to the implementor. The engine only needs to feed it commands, ask whether
//! a command arrived in time, and read damage and defence once it is finished.

use chrono::{DateTime, Utc};

/// A spell under construction, and later the finished artifact of a cast.
///
/// One instance is created per cast attempt via [`SpellFactory`], fed commands
/// until the caster executes it, then handed to the resolver.
pub trait Spell: Send {
    /// Whether a command stamped `at` still falls inside the legal casting
    /// window of this spell.
    fn can_cast_at(&self, at: DateTime<Utc>) -> bool;

    /// Offer a command to the builder.
    ///
    /// Returns the MP cost of the command when it is recognized, `None`
    /// otherwise. A cost of zero is a recognized free command.
    fn receive_command(&mut self, content: &str, at: DateTime<Utc>) -> Option<u32>;

    /// Damage dealt by this spell against `opponent`, or against nothing when
    /// the other side did not cast this round.
    fn calculate_damage(&self, opponent: Option<&dyn Spell>) -> i64;

    /// Damage absorbed by this spell when hit by `opponent`.
    fn calculate_defence(&self, opponent: &dyn Spell) -> i64;
}

/// Creates a fresh [`Spell`] for every cast attempt.
pub trait SpellFactory: Send + Sync {
    fn create(&self) -> Box<dyn Spell>;
}

impl<F> SpellFactory for F
where
    F: Fn() -> Box<dyn Spell> + Send + Sync,
{
    fn create(&self) -> Box<dyn Spell> {
        self()
    }
}
