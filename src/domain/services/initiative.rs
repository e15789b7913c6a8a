//! Initiative rolls

use rand::Rng;

/// Roll d20 + Dexterity modifier.
///
/// A natural 1 always yields 1, and a total below 1 is raised to 1 so every
/// rolled combatant ends up in the turn order.
pub fn roll_initiative<R: Rng + ?Sized>(dexterity_modifier: i32, rng: &mut R) -> i32 {
    let natural: i32 = rng.gen_range(1..=20);
    if natural == 1 {
        return 1;
    }
    natural.saturating_add(dexterity_modifier).max(1)
}
