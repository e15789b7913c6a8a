//! Transient combat bookkeeping: turn pointer, live overrides, token placement

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ids::{CombatantId, MapId};

/// Position of the turn machine within an encounter
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnState {
    /// Index into the initiative-sorted combatant list
    pub current_turn_index: usize,
    /// Starts at 1, never drops below 1
    pub current_round: u32,
    /// 1-based count of turns taken in the current round
    pub visible_turn_number: u32,
    /// Operator's inspection pointer; independent of the turn pointer and never persisted
    #[serde(skip)]
    pub manual_selection: Option<CombatantId>,
}

impl Default for TurnState {
    fn default() -> Self {
        Self {
            current_turn_index: 0,
            current_round: 1,
            visible_turn_number: 1,
            manual_selection: None,
        }
    }
}

/// Values entered or rolled during combat that shadow the record fields
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CombatantOverride {
    #[serde(default)]
    pub initiative: Option<i32>,
    #[serde(default)]
    pub current_hp: Option<i32>,
    #[serde(default)]
    pub max_hp: Option<i32>,
    #[serde(default)]
    pub temp_hp: Option<i32>,
}

/// Live overrides keyed by stable combatant id
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LiveOverrides(HashMap<CombatantId, CombatantOverride>);

impl LiveOverrides {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: &CombatantId) -> Option<&CombatantOverride> {
        self.0.get(id)
    }

    pub fn entry(&mut self, id: CombatantId) -> &mut CombatantOverride {
        self.0.entry(id).or_default()
    }

    pub fn initiative(&self, id: &CombatantId) -> Option<i32> {
        self.get(id).and_then(|o| o.initiative)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Drop overrides for ids that no longer belong to the roster
    pub fn retain_ids(&mut self, keep: impl Fn(&CombatantId) -> bool) {
        self.0.retain(|id, _| keep(id));
    }
}

/// Where a combatant's token sits on the shown map
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct TokenPlacement {
    pub x: f64,
    pub y: f64,
    pub on_map: bool,
}

/// Everything about one encounter's combat that outlives a page switch
///
/// Stored as an opaque blob keyed by encounter id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CombatStateSnapshot {
    #[serde(default)]
    pub overrides: LiveOverrides,
    #[serde(default)]
    pub turn: TurnState,
    #[serde(default)]
    pub tokens: HashMap<CombatantId, TokenPlacement>,
    #[serde(default)]
    pub map_id: Option<MapId>,
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_turn_state_defaults_to_first_turn() {
        let state = TurnState::default();
        assert_eq!(state.current_turn_index, 0);
        assert_eq!(state.current_round, 1);
        assert_eq!(state.visible_turn_number, 1);
        assert!(state.manual_selection.is_none());
    }

    #[test]
    fn test_manual_selection_is_not_persisted() {
        let state = TurnState {
            current_turn_index: 2,
            current_round: 3,
            visible_turn_number: 2,
            manual_selection: Some(CombatantId::new("goblin-1")),
        };

        let json = serde_json::to_string(&state).unwrap();
        let restored: TurnState = serde_json::from_str(&json).unwrap();

        assert_eq!(restored.current_turn_index, 2);
        assert_eq!(restored.current_round, 3);
        assert!(restored.manual_selection.is_none());
    }

    #[test]
    fn test_override_entry_creates_default() {
        let mut overrides = LiveOverrides::new();
        overrides.entry(CombatantId::new("goblin-1")).initiative = Some(12);

        assert_eq!(overrides.initiative(&CombatantId::new("goblin-1")), Some(12));
        assert_eq!(overrides.initiative(&CombatantId::new("goblin-2")), None);
        assert_eq!(overrides.len(), 1);
    }

    #[test]
    fn test_snapshot_tolerates_missing_fields() {
        let snapshot: CombatStateSnapshot =
            serde_json::from_str(r#"{"updated_at":"2024-05-01T12:00:00Z"}"#).unwrap();
        assert!(snapshot.overrides.is_empty());
        assert_eq!(snapshot.turn, TurnState::default());
        assert!(snapshot.map_id.is_none());
    }
}
