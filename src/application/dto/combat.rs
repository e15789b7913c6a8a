use serde::{Deserialize, Serialize};

use crate::domain::aggregates::{CombatSession, HitPointChange};
use crate::domain::entities::{Combatant, CombatantKind};
use crate::domain::services::DifficultyResult;
use crate::domain::value_objects::TokenPlacement;

// ============================================================================
// View DTOs
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CombatantKindDto {
    Character,
    Monster,
}

impl From<&CombatantKind> for CombatantKindDto {
    fn from(value: &CombatantKind) -> Self {
        match value {
            CombatantKind::Character { .. } => CombatantKindDto::Character,
            CombatantKind::Monster { .. } => CombatantKindDto::Monster,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct TokenPlacementDto {
    pub x: f64,
    pub y: f64,
    pub on_map: bool,
}

impl From<TokenPlacement> for TokenPlacementDto {
    fn from(value: TokenPlacement) -> Self {
        Self {
            x: value.x,
            y: value.y,
            on_map: value.on_map,
        }
    }
}

impl From<TokenPlacementDto> for TokenPlacement {
    fn from(value: TokenPlacementDto) -> Self {
        Self {
            x: value.x,
            y: value.y,
            on_map: value.on_map,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CombatantDto {
    pub id: String,
    pub name: String,
    pub kind: CombatantKindDto,
    /// Template or character record the combatant was built from
    pub source_id: String,
    pub initiative: Option<i32>,
    pub current_hp: Option<i32>,
    pub max_hp: Option<i32>,
    pub temp_hp: Option<i32>,
    pub armor_class: Option<i32>,
    pub hp_percentage: f64,
    pub in_turn_order: bool,
    pub incapacitated: bool,
    pub token: TokenPlacementDto,
}

impl CombatantDto {
    fn from_combatant(combatant: &Combatant, token: TokenPlacement) -> Self {
        let source_id = match &combatant.kind {
            CombatantKind::Character { character_id, .. } => character_id.to_string(),
            CombatantKind::Monster { template_id, .. } => template_id.to_string(),
        };
        Self {
            id: combatant.id.to_string(),
            name: combatant.name.clone(),
            kind: CombatantKindDto::from(&combatant.kind),
            source_id,
            initiative: combatant.initiative,
            current_hp: combatant.current_hp,
            max_hp: combatant.max_hp,
            temp_hp: combatant.temp_hp,
            armor_class: combatant.armor_class,
            hp_percentage: combatant.hp_percentage(),
            in_turn_order: combatant.is_in_turn_order(),
            incapacitated: combatant.is_incapacitated(),
            token: token.into(),
        }
    }
}

/// Everything the operator screen and the player display need to draw a combat
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CombatView {
    pub encounter_id: String,
    pub encounter_name: String,
    pub round: u32,
    pub visible_turn: u32,
    pub current_turn_index: usize,
    pub current_combatant_id: Option<String>,
    pub manually_selected_combatant_id: Option<String>,
    pub map_id: Option<String>,
    /// Turn order first, then combatants without initiative in roster order
    pub combatants: Vec<CombatantDto>,
    pub difficulty: DifficultyResult,
}

impl CombatView {
    pub fn from_session(session: &CombatSession) -> Self {
        let turn = session.turn();
        let waiting = session
            .combatants()
            .iter()
            .filter(|c| !c.is_in_turn_order());
        let combatants = session
            .turn_order()
            .iter()
            .chain(waiting)
            .map(|c| CombatantDto::from_combatant(c, session.token(&c.id)))
            .collect();

        Self {
            encounter_id: session.encounter_id().to_string(),
            encounter_name: session.encounter().name.clone(),
            round: turn.current_round,
            visible_turn: turn.visible_turn_number,
            current_turn_index: turn.current_turn_index,
            current_combatant_id: session.current_combatant().map(|c| c.id.to_string()),
            manually_selected_combatant_id: session.manually_selected().map(|c| c.id.to_string()),
            map_id: session.map_id().map(ToString::to_string),
            combatants,
            difficulty: session.difficulty().clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct XpParticipantDto {
    pub character_id: String,
    pub name: String,
    pub experience_points: Option<i64>,
}

/// Adjusted XP of the fight and who took part; splitting and saving the award is up to the caller
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct XpAwardSummaryDto {
    pub encounter_id: String,
    pub adjusted_xp: f64,
    pub participants: Vec<XpParticipantDto>,
}

impl XpAwardSummaryDto {
    pub fn from_session(session: &CombatSession) -> Self {
        Self {
            encounter_id: session.encounter_id().to_string(),
            adjusted_xp: session.difficulty().adjusted_xp,
            participants: session
                .participating_characters()
                .into_iter()
                .map(|character| XpParticipantDto {
                    character_id: character.id.to_string(),
                    name: character.name.clone(),
                    experience_points: character.experience_points,
                })
                .collect(),
        }
    }
}

// ============================================================================
// Request DTOs
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct SelectEncounterRequestDto {
    pub encounter_id: String,
}

/// `null` or a missing value clears the initiative
#[derive(Debug, Deserialize)]
pub struct SetInitiativeRequestDto {
    #[serde(default)]
    pub initiative: Option<i32>,
}

#[derive(Debug, Default, Deserialize)]
pub struct SetHitPointsRequestDto {
    #[serde(default)]
    pub current: Option<i32>,
    #[serde(default)]
    pub max: Option<i32>,
    #[serde(default)]
    pub temp: Option<i32>,
}

impl From<SetHitPointsRequestDto> for HitPointChange {
    fn from(value: SetHitPointsRequestDto) -> Self {
        Self {
            current: value.current,
            max: value.max,
            temp: value.temp,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ShowMapRequestDto {
    #[serde(default)]
    pub map_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct MoveTokenRequestDto {
    pub x: f64,
    pub y: f64,
    #[serde(default = "default_on_map")]
    pub on_map: bool,
}

fn default_on_map() -> bool {
    true
}

impl From<MoveTokenRequestDto> for TokenPlacement {
    fn from(value: MoveTokenRequestDto) -> Self {
        Self {
            x: value.x,
            y: value.y,
            on_map: value.on_map,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::{Character, Encounter, MonsterTemplate};
    use crate::domain::value_objects::CombatantId;

    fn session() -> CombatSession {
        let encounter = Encounter::new("enc-1", "Crypt")
            .with_character(Character::new("ana", "Ana").with_level(2).with_hit_points(10, 20))
            .with_character(Character::new("bo", "Bo").with_level(2).with_hit_points(12, 12))
            .with_monster(MonsterTemplate::new("skeleton", "Skeleton").with_xp("50"));
        CombatSession::start(encounter)
    }

    #[test]
    fn test_view_lists_turn_order_first() {
        let mut session = session();
        session.set_initiative(&CombatantId::new("bo"), Some(11)).unwrap();
        session
            .set_initiative(&CombatantId::new("skeleton-1"), Some(14))
            .unwrap();

        let view = CombatView::from_session(&session);
        let ids: Vec<&str> = view.combatants.iter().map(|c| c.id.as_str()).collect();

        assert_eq!(ids, vec!["skeleton-1", "bo", "ana"]);
        assert_eq!(view.current_combatant_id.as_deref(), Some("skeleton-1"));
        assert!(!view.combatants[2].in_turn_order);
        assert_eq!(view.combatants[2].hp_percentage, 50.0);
        assert_eq!(view.combatants[0].kind, CombatantKindDto::Monster);
        assert_eq!(view.combatants[0].source_id, "skeleton");
    }

    #[test]
    fn test_view_serializes_difficulty() {
        let view = CombatView::from_session(&session());
        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json["difficulty"]["classification"], "none");
        assert_eq!(json["round"], 1);
    }

    #[test]
    fn test_xp_award_lists_participants_only() {
        let mut session = session();
        session.set_initiative(&CombatantId::new("ana"), Some(9)).unwrap();
        session
            .set_initiative(&CombatantId::new("skeleton-1"), Some(3))
            .unwrap();

        let summary = XpAwardSummaryDto::from_session(&session);

        assert_eq!(summary.participants.len(), 1);
        assert_eq!(summary.participants[0].name, "Ana");
        assert_eq!(summary.adjusted_xp, 75.0);
    }

    #[test]
    fn test_move_token_defaults_onto_map() {
        let request: MoveTokenRequestDto = serde_json::from_str(r#"{"x": 3.0, "y": 4.5}"#).unwrap();
        assert!(request.on_map);
    }
}
