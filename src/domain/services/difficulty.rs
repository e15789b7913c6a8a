//! Encounter difficulty evaluation
//!
//! Scores a party against a monster roster with the encounter-building
//! tables: party thresholds are summed per tier, monster XP is scaled by a
//! count-based multiplier (shifted one step for small or large parties), and
//! the adjusted total is placed in the first tier whose threshold it stays
//! strictly below.

use serde::Serialize;

use crate::domain::entities::{Character, MonsterInstance};
use crate::domain::value_objects::{
    step_index_for_count, Multiplier, XpThresholds, ENCOUNTER_MULTIPLIERS,
};

/// Parties smaller than this use the next multiplier up
pub const SMALL_PARTY: usize = 3;
/// Parties of at least this size use the next multiplier down
pub const LARGE_PARTY: usize = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DifficultyClass {
    None,
    Easy,
    Medium,
    Difficult,
    Deadly,
    Extreme,
}

impl DifficultyClass {
    /// Place an adjusted XP value against summed party thresholds
    pub fn classify(adjusted_xp: f64, group: &XpThresholds) -> Self {
        if adjusted_xp <= 0.0 {
            Self::None
        } else if adjusted_xp < f64::from(group.easy) {
            Self::Easy
        } else if adjusted_xp < f64::from(group.medium) {
            Self::Medium
        } else if adjusted_xp < f64::from(group.difficult) {
            Self::Difficult
        } else if adjusted_xp < f64::from(group.deadly) {
            Self::Deadly
        } else {
            Self::Extreme
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Easy => "easy",
            Self::Medium => "medium",
            Self::Difficult => "difficult",
            Self::Deadly => "deadly",
            Self::Extreme => "extreme",
        }
    }
}

impl std::fmt::Display for DifficultyClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why an evaluation stopped before classifying
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DifficultyNotice {
    NoCharacters,
    NoMonsters,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlayerThresholds {
    pub name: String,
    /// Level after clamping to the table range
    pub level: i64,
    pub thresholds: XpThresholds,
}

/// Threshold interval the adjusted XP falls in, for progress bars
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct ThresholdBand {
    pub lower: f64,
    pub upper: f64,
}

impl ThresholdBand {
    fn for_class(class: DifficultyClass, group: &XpThresholds, adjusted_xp: f64) -> Self {
        let (lower, upper) = match class {
            DifficultyClass::None | DifficultyClass::Easy => (0, group.easy),
            DifficultyClass::Medium => (group.easy, group.medium),
            DifficultyClass::Difficult => (group.medium, group.difficult),
            DifficultyClass::Deadly => (group.difficult, group.deadly),
            DifficultyClass::Extreme => {
                return Self {
                    lower: f64::from(group.deadly),
                    upper: adjusted_xp,
                }
            }
        };
        Self {
            lower: f64::from(lower),
            upper: f64::from(upper),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DifficultyResult {
    pub classification: DifficultyClass,
    pub notice: Option<DifficultyNotice>,
    pub adjusted_xp: f64,
    pub total_monster_xp: u32,
    pub multiplier: Multiplier,
    pub multiplier_explanation: String,
    pub group_thresholds: XpThresholds,
    pub player_thresholds: Vec<PlayerThresholds>,
    pub current_band: ThresholdBand,
}

impl DifficultyResult {
    fn stopped(notice: DifficultyNotice, explanation: &str) -> Self {
        Self {
            classification: DifficultyClass::None,
            notice: Some(notice),
            adjusted_xp: 0.0,
            total_monster_xp: 0,
            multiplier: Multiplier::ZERO,
            multiplier_explanation: explanation.to_string(),
            group_thresholds: XpThresholds::default(),
            player_thresholds: Vec::new(),
            current_band: ThresholdBand::default(),
        }
    }
}

/// Score a party against a monster roster. Pure and deterministic.
pub fn evaluate(characters: &[Character], monsters: &[MonsterInstance]) -> DifficultyResult {
    if characters.is_empty() {
        return DifficultyResult::stopped(DifficultyNotice::NoCharacters, "No characters");
    }

    let mut group_thresholds = XpThresholds::default();
    let player_thresholds: Vec<PlayerThresholds> = characters
        .iter()
        .map(|character| {
            let level = character.effective_level();
            let thresholds = XpThresholds::for_level(level);
            group_thresholds += thresholds;
            PlayerThresholds {
                name: character.name.clone(),
                level,
                thresholds,
            }
        })
        .collect();

    let Some(base_index) = step_index_for_count(monsters.len()) else {
        return DifficultyResult {
            group_thresholds,
            player_thresholds,
            current_band: ThresholdBand::for_class(DifficultyClass::None, &group_thresholds, 0.0),
            ..DifficultyResult::stopped(DifficultyNotice::NoMonsters, "Base: 0 monsters -> 0")
        };
    };

    let total_monster_xp: u32 = monsters
        .iter()
        .map(|instance| instance.template.challenge_xp())
        .fold(0, u32::saturating_add);

    let (multiplier, multiplier_explanation) =
        party_adjusted_multiplier(base_index, monsters.len(), characters.len());
    let adjusted_xp = multiplier.apply(total_monster_xp);
    let classification = DifficultyClass::classify(adjusted_xp, &group_thresholds);

    DifficultyResult {
        classification,
        notice: None,
        adjusted_xp,
        total_monster_xp,
        multiplier,
        multiplier_explanation,
        group_thresholds,
        player_thresholds,
        current_band: ThresholdBand::for_class(classification, &group_thresholds, adjusted_xp),
    }
}

fn party_adjusted_multiplier(
    base_index: usize,
    monster_count: usize,
    party_size: usize,
) -> (Multiplier, String) {
    let base = ENCOUNTER_MULTIPLIERS[base_index];
    let noun = if monster_count == 1 { "monster" } else { "monsters" };
    let mut explanation = format!(
        "Base: {monster_count} {noun} -> {} (rule: {} or more)",
        base.multiplier, base.min_count
    );

    let last = ENCOUNTER_MULTIPLIERS.len() - 1;
    let final_index = if party_size < SMALL_PARTY {
        (base_index + 1).min(last)
    } else if party_size >= LARGE_PARTY {
        base_index.saturating_sub(1)
    } else {
        base_index
    };

    let multiplier = ENCOUNTER_MULTIPLIERS[final_index].multiplier;
    if final_index > base_index {
        explanation.push_str(&format!(
            " (party smaller than {SMALL_PARTY}: next multiplier up, now {multiplier})"
        ));
    } else if final_index < base_index {
        explanation.push_str(&format!(
            " (party of {LARGE_PARTY} or more: next multiplier down, now {multiplier})"
        ));
    }

    (multiplier, explanation)
}
