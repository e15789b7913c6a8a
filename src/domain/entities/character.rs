//! Character entity - Player characters as read from the campaign records

use serde::{Deserialize, Serialize};

use crate::domain::value_objects::{CharacterId, MAX_LEVEL, MIN_LEVEL};

/// A player character taking part in encounters
///
/// Read-only to the combat core; HP fields are the persisted values and are
/// shadowed by live overrides during combat.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Character {
    pub id: CharacterId,
    pub name: String,
    /// Raw level from the record; may be out of range
    pub level: i64,
    pub max_hit_points: i32,
    pub current_hit_points: i32,
    pub temporary_hit_points: i32,
    pub armor_class: Option<i32>,
    /// Dexterity ability score
    pub dexterity: Option<i32>,
    pub experience_points: Option<i64>,
}

impl Character {
    pub fn new(id: impl Into<CharacterId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            level: 1,
            max_hit_points: 0,
            current_hit_points: 0,
            temporary_hit_points: 0,
            armor_class: None,
            dexterity: None,
            experience_points: None,
        }
    }

    pub fn with_level(mut self, level: i64) -> Self {
        self.level = level;
        self
    }

    pub fn with_hit_points(mut self, current: i32, max: i32) -> Self {
        self.current_hit_points = current;
        self.max_hit_points = max;
        self
    }

    pub fn with_temporary_hit_points(mut self, temp: i32) -> Self {
        self.temporary_hit_points = temp;
        self
    }

    pub fn with_armor_class(mut self, armor_class: i32) -> Self {
        self.armor_class = Some(armor_class);
        self
    }

    pub fn with_dexterity(mut self, score: i32) -> Self {
        self.dexterity = Some(score);
        self
    }

    /// Level used for threshold lookups, clamped to 1..=20
    pub fn effective_level(&self) -> i64 {
        self.level.clamp(MIN_LEVEL, MAX_LEVEL)
    }

    pub fn dexterity_modifier(&self) -> i32 {
        self.dexterity
            .map(|score| (score - 10).div_euclid(2))
            .unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_character_defaults() {
        let character = Character::new("char_1", "Aria");
        assert_eq!(character.level, 1);
        assert_eq!(character.dexterity_modifier(), 0);
        assert!(character.armor_class.is_none());
    }

    #[test]
    fn test_effective_level_clamps() {
        assert_eq!(Character::new("a", "A").with_level(0).effective_level(), 1);
        assert_eq!(Character::new("a", "A").with_level(27).effective_level(), 20);
        assert_eq!(Character::new("a", "A").with_level(7).effective_level(), 7);
    }

    #[test]
    fn test_dexterity_modifier_rounds_down() {
        assert_eq!(Character::new("a", "A").with_dexterity(14).dexterity_modifier(), 2);
        assert_eq!(Character::new("a", "A").with_dexterity(15).dexterity_modifier(), 2);
        assert_eq!(Character::new("a", "A").with_dexterity(9).dexterity_modifier(), -1);
        assert_eq!(Character::new("a", "A").with_dexterity(8).dexterity_modifier(), -1);
    }
}
