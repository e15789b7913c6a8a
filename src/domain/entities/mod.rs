//! Domain entities - Core business objects with identity

mod character;
mod combatant;
mod encounter;
mod monster;

pub use character::Character;
pub use combatant::{Combatant, CombatantKind, MonsterInstance};
pub use encounter::Encounter;
pub use monster::MonsterTemplate;
