//! Identity types for the two sides of a duel.

use std::fmt;

/// Opaque identifier of a user in the chat platform and the user store.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct UserId(pub u64);

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Opaque identifier of the channel a duel is fought in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ChannelId(pub u64);

/// One of the two seats in a duel.
///
/// Alpha is the challenger and Beta the challenged; the engine treats both
/// symmetrically apart from reporting order.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::EnumString, strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum Side {
    Alpha,
    Beta,
}

impl Side {
    /// Both sides in reporting order.
    pub const ALL: [Side; 2] = [Side::Alpha, Side::Beta];

    /// Index into per-side arrays.
    pub const fn index(self) -> usize {
        match self {
            Side::Alpha => 0,
            Side::Beta => 1,
        }
    }

    pub const fn opponent(self) -> Side {
        match self {
            Side::Alpha => Side::Beta,
            Side::Beta => Side::Alpha,
        }
    }
}

/// A participant in a duel: identity plus the handle used to address them.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Combatant {
    pub id: UserId,
    /// Mention or display handle, inserted verbatim into outbound messages.
    pub mention: String,
}

impl Combatant {
    pub fn new(id: UserId, mention: impl Into<String>) -> Self {
        Self {
            id,
            mention: mention.into(),
        }
    }
}
