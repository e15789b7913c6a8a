//! Combatant entity - A participant in a live combat
//!
//! Combatants are derived views built from the encounter records plus the
//! live overrides; they are rebuilt on every change and never stored.

use serde::{Deserialize, Serialize};

use super::MonsterTemplate;
use crate::domain::value_objects::{CharacterId, CombatantId, MonsterId};

/// One placed copy of a monster template within an encounter
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonsterInstance {
    /// `"<template id>-<occurrence>"`, stable for a given encounter
    pub instance_id: CombatantId,
    pub display_name: String,
    pub template: MonsterTemplate,
}

/// What kind of participant a combatant is
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CombatantKind {
    Character {
        character_id: CharacterId,
        level: i64,
    },
    Monster {
        template_id: MonsterId,
        /// Raw hit point notation, rolled on demand
        hit_points: String,
        challenge_xp: u32,
    },
}

/// A participant in the initiative order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Combatant {
    pub id: CombatantId,
    pub name: String,
    pub kind: CombatantKind,
    pub initiative: Option<i32>,
    /// `None` for monsters whose hit points have not been rolled yet
    pub current_hp: Option<i32>,
    pub max_hp: Option<i32>,
    /// Characters only
    pub temp_hp: Option<i32>,
    pub armor_class: Option<i32>,
    pub dexterity_modifier: i32,
}

impl Combatant {
    /// Whether this combatant takes turns; unset or non-positive initiative sits out
    pub fn is_in_turn_order(&self) -> bool {
        matches!(self.initiative, Some(value) if value > 0)
    }

    /// Down combatants stay listed but their turns are skipped.
    /// Unrolled hit points do not count as down.
    pub fn is_incapacitated(&self) -> bool {
        matches!(self.current_hp, Some(hp) if hp <= 0)
    }

    pub fn is_character(&self) -> bool {
        matches!(self.kind, CombatantKind::Character { .. })
    }

    pub fn is_monster(&self) -> bool {
        matches!(self.kind, CombatantKind::Monster { .. })
    }

    /// Remaining health for health bars, 100 when the maximum is unknown
    pub fn hp_percentage(&self) -> f64 {
        match (self.current_hp, self.max_hp) {
            (Some(current), Some(max)) if max > 0 => f64::from(current) / f64::from(max) * 100.0,
            _ => 100.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn goblin(initiative: Option<i32>, current_hp: Option<i32>) -> Combatant {
        Combatant {
            id: CombatantId::new("goblin-1"),
            name: "Goblin".to_string(),
            kind: CombatantKind::Monster {
                template_id: MonsterId::new("goblin"),
                hit_points: "7 (2d6)".to_string(),
                challenge_xp: 50,
            },
            initiative,
            current_hp,
            max_hp: current_hp.map(|_| 8),
            temp_hp: None,
            armor_class: Some(15),
            dexterity_modifier: 2,
        }
    }

    #[test]
    fn test_turn_order_membership() {
        assert!(goblin(Some(12), None).is_in_turn_order());
        assert!(!goblin(Some(0), None).is_in_turn_order());
        assert!(!goblin(Some(-3), None).is_in_turn_order());
        assert!(!goblin(None, None).is_in_turn_order());
    }

    #[test]
    fn test_incapacitation() {
        assert!(goblin(Some(5), Some(0)).is_incapacitated());
        assert!(goblin(Some(5), Some(-4)).is_incapacitated());
        assert!(!goblin(Some(5), Some(1)).is_incapacitated());
        assert!(!goblin(Some(5), None).is_incapacitated());
    }

    #[test]
    fn test_hp_percentage() {
        assert_eq!(goblin(None, Some(4)).hp_percentage(), 50.0);
        assert_eq!(goblin(None, None).hp_percentage(), 100.0);
    }

    #[test]
    fn test_kind_serializes_with_tag() {
        let json = serde_json::to_value(goblin(Some(3), None)).unwrap();
        assert_eq!(json["kind"]["type"], "monster");
        assert_eq!(json["kind"]["challenge_xp"], 50);
    }
}
