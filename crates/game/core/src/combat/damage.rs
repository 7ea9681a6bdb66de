//! Damage calculation for one direction of the exchange.

use crate::spell::Spell;

/// Calculate the damage `mine` deals to the side that cast `theirs`.
///
/// # Formula
///
/// ```text
/// mine absent            => 0
/// theirs absent          => mine.damage(None)
/// otherwise              => max(0, mine.damage(theirs) - theirs.defence(mine))
/// ```
///
/// An unopposed spell is not reduced by any defence and is not clamped.
pub fn calculate_damage(mine: Option<&dyn Spell>, theirs: Option<&dyn Spell>) -> i64 {
    let Some(mine) = mine else {
        return 0;
    };

    match theirs {
        None => mine.calculate_damage(None),
        Some(theirs) => {
            let raw = mine
                .calculate_damage(Some(theirs))
                .saturating_sub(theirs.calculate_defence(mine));
            raw.max(0)
        }
    }
}
