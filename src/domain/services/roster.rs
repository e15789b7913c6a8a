//! Combatant roster construction
//!
//! Expands an encounter's monster placements into uniquely identified
//! instances and merges the live overrides over the record values.

use std::collections::HashMap;

use crate::domain::entities::{Character, Combatant, CombatantKind, MonsterInstance, MonsterTemplate};
use crate::domain::value_objects::{CombatantId, LiveOverrides, MonsterId};

/// Expand monster placements into instances.
///
/// The n-th placement of a template gets the id `"<template id>-<n>"`. When a
/// template is placed more than once every copy gets a letter suffix in
/// placement order (`"Goblin A"`, `"Goblin B"`, ...). The result depends only
/// on the placement list, so rebuilding it yields the same ids.
pub fn expand_monsters(placements: &[MonsterTemplate]) -> Vec<MonsterInstance> {
    let mut totals: HashMap<&MonsterId, usize> = HashMap::new();
    for template in placements {
        *totals.entry(&template.id).or_default() += 1;
    }

    let mut seen: HashMap<&MonsterId, usize> = HashMap::new();
    placements
        .iter()
        .map(|template| {
            let occurrence = seen.entry(&template.id).or_default();
            *occurrence += 1;

            let display_name = if totals.get(&template.id).copied().unwrap_or(0) > 1 {
                format!("{} {}", template.name, letter_suffix(*occurrence))
            } else {
                template.name.clone()
            };

            MonsterInstance {
                instance_id: CombatantId::new(format!("{}-{}", template.id, occurrence)),
                display_name,
                template: template.clone(),
            }
        })
        .collect()
}

/// Build the full combatant list: characters first, then monsters in
/// placement order, with live overrides applied.
pub fn build(
    characters: &[Character],
    monsters: &[MonsterInstance],
    overrides: &LiveOverrides,
) -> Vec<Combatant> {
    let characters = characters.iter().map(|character| {
        let id = CombatantId::from(&character.id);
        let live = overrides.get(&id).cloned().unwrap_or_default();
        Combatant {
            name: character.name.clone(),
            kind: CombatantKind::Character {
                character_id: character.id.clone(),
                level: character.level,
            },
            initiative: live.initiative,
            current_hp: live.current_hp.or(Some(character.current_hit_points)),
            max_hp: live.max_hp.or(Some(character.max_hit_points)),
            temp_hp: live.temp_hp.or(Some(character.temporary_hit_points)),
            armor_class: character.armor_class,
            dexterity_modifier: character.dexterity_modifier(),
            id,
        }
    });

    let monsters = monsters.iter().map(|instance| {
        let live = overrides
            .get(&instance.instance_id)
            .cloned()
            .unwrap_or_default();
        let template = &instance.template;
        Combatant {
            id: instance.instance_id.clone(),
            name: instance.display_name.clone(),
            kind: CombatantKind::Monster {
                template_id: template.id.clone(),
                hit_points: template.hp.clone(),
                challenge_xp: template.challenge_xp(),
            },
            initiative: live.initiative,
            current_hp: live.current_hp.or(live.max_hp),
            max_hp: live.max_hp,
            temp_hp: None,
            armor_class: template.armor_class(),
            dexterity_modifier: template.dexterity_modifier(),
        }
    });

    characters.chain(monsters).collect()
}

/// Spreadsheet-style letters: 1 is A, 26 is Z, 27 is AA
fn letter_suffix(mut occurrence: usize) -> String {
    let mut letters = Vec::new();
    while occurrence > 0 {
        occurrence -= 1;
        letters.push(char::from(b'A' + (occurrence % 26) as u8));
        occurrence /= 26;
    }
    letters.iter().rev().collect()
}
