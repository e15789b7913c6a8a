//! Combat Session Aggregate - The live combat of one encounter
//!
//! Owns the live overrides, turn pointer and display placement for the
//! selected encounter. Combatants, the turn order and the difficulty score
//! are derived from those after every change and are never edited directly.

use std::collections::HashMap;

use chrono::Utc;
use rand::Rng;

use crate::domain::entities::{Character, Combatant, Encounter, MonsterInstance};
use crate::domain::services::{difficulty, hit_points, initiative, roster, turn_cycle};
use crate::domain::services::DifficultyResult;
use crate::domain::value_objects::{
    CombatStateSnapshot, CombatantId, EncounterId, LiveOverrides, MapId, TokenPlacement,
    TurnState,
};

/// Hit point fields to overwrite; `None` leaves a field as it is
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HitPointChange {
    pub current: Option<i32>,
    pub max: Option<i32>,
    pub temp: Option<i32>,
}

/// The Combat Session Aggregate Root
#[derive(Debug, Clone)]
pub struct CombatSession {
    encounter: Encounter,
    monsters: Vec<MonsterInstance>,
    overrides: LiveOverrides,
    turn: TurnState,
    tokens: HashMap<CombatantId, TokenPlacement>,
    map_id: Option<MapId>,

    // Derived on every change
    combatants: Vec<Combatant>,
    order: Vec<Combatant>,
    difficulty: DifficultyResult,
}

impl CombatSession {
    /// Start a fresh combat at round 1 with no live values
    pub fn start(encounter: Encounter) -> Self {
        let monsters = roster::expand_monsters(&encounter.monsters);
        let mut session = Self {
            difficulty: difficulty::evaluate(&[], &[]),
            encounter,
            monsters,
            overrides: LiveOverrides::new(),
            turn: TurnState::default(),
            tokens: HashMap::new(),
            map_id: None,
            combatants: Vec::new(),
            order: Vec::new(),
        };
        session.reset();
        session
    }

    /// Resume a combat from its stored state.
    ///
    /// Values for combatants no longer in the encounter are dropped.
    pub fn resume(encounter: Encounter, snapshot: CombatStateSnapshot) -> Self {
        let mut session = Self::start(encounter);

        let known: Vec<CombatantId> = session.combatants.iter().map(|c| c.id.clone()).collect();
        let mut overrides = snapshot.overrides;
        overrides.retain_ids(|id| known.contains(id));
        let mut tokens = snapshot.tokens;
        tokens.retain(|id, _| known.contains(id));

        session.overrides = overrides;
        session.tokens = tokens;
        session.map_id = snapshot.map_id;
        session.turn = TurnState {
            manual_selection: None,
            ..snapshot.turn
        };
        session.refresh();
        session
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    pub fn encounter_id(&self) -> &EncounterId {
        &self.encounter.id
    }

    pub fn encounter(&self) -> &Encounter {
        &self.encounter
    }

    /// Every participant, characters first, whether or not they take turns
    pub fn combatants(&self) -> &[Combatant] {
        &self.combatants
    }

    /// Participants that take turns, in initiative order
    pub fn turn_order(&self) -> &[Combatant] {
        &self.order
    }

    pub fn turn(&self) -> &TurnState {
        &self.turn
    }

    pub fn difficulty(&self) -> &DifficultyResult {
        &self.difficulty
    }

    pub fn token(&self, id: &CombatantId) -> TokenPlacement {
        self.tokens.get(id).copied().unwrap_or_default()
    }

    pub fn map_id(&self) -> Option<&MapId> {
        self.map_id.as_ref()
    }

    pub fn current_combatant(&self) -> Option<&Combatant> {
        turn_cycle::current(&self.turn, &self.order)
    }

    pub fn manually_selected(&self) -> Option<&Combatant> {
        let id = self.turn.manual_selection.as_ref()?;
        self.combatant(id)
    }

    pub fn combatant(&self, id: &CombatantId) -> Option<&Combatant> {
        self.combatants.iter().find(|c| &c.id == id)
    }

    /// Characters counted in the difficulty score
    pub fn participating_characters(&self) -> Vec<&Character> {
        self.encounter
            .characters
            .iter()
            .filter(|character| {
                self.overrides
                    .initiative(&CombatantId::from(&character.id))
                    .is_some()
            })
            .collect()
    }

    // ========================================================================
    // Turn movement
    // ========================================================================

    pub fn advance(&mut self) {
        turn_cycle::advance(&mut self.turn, &self.order);
    }

    pub fn retreat(&mut self) {
        turn_cycle::retreat(&mut self.turn, &self.order);
    }

    pub fn select_manually(&mut self, id: &CombatantId) -> Result<(), AggregateError> {
        self.require(id)?;
        turn_cycle::select_manually(&mut self.turn, &self.order, id);
        Ok(())
    }

    // ========================================================================
    // Live values
    // ========================================================================

    /// Enter or clear an initiative. Clearing takes the combatant out of the turn order.
    pub fn set_initiative(
        &mut self,
        id: &CombatantId,
        value: Option<i32>,
    ) -> Result<(), AggregateError> {
        self.require(id)?;
        self.overrides.entry(id.clone()).initiative = value;
        self.refresh();
        Ok(())
    }

    pub fn set_hit_points(
        &mut self,
        id: &CombatantId,
        change: HitPointChange,
    ) -> Result<(), AggregateError> {
        let combatant = self.require(id)?;
        if change.temp.is_some() && combatant.is_monster() {
            return Err(AggregateError::TemporaryHitPointsOnMonster(id.clone()));
        }

        let entry = self.overrides.entry(id.clone());
        if let Some(current) = change.current {
            entry.current_hp = Some(current);
        }
        if let Some(max) = change.max {
            entry.max_hp = Some(max);
        }
        if let Some(temp) = change.temp {
            entry.temp_hp = Some(temp);
        }
        self.refresh();
        Ok(())
    }

    /// Roll d20 + Dexterity modifier for every monster
    pub fn roll_monster_initiatives<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        for instance in &self.monsters {
            let value = initiative::roll_initiative(instance.template.dexterity_modifier(), rng);
            self.overrides.entry(instance.instance_id.clone()).initiative = Some(value);
        }
        self.refresh();
    }

    /// Roll hit points for every monster, setting both current and max
    pub fn roll_monster_hit_points<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        for instance in &self.monsters {
            let value = hit_points::resolve(&instance.template.hp, rng);
            let entry = self.overrides.entry(instance.instance_id.clone());
            entry.current_hp = Some(value);
            entry.max_hp = Some(value);
        }
        self.refresh();
    }

    // ========================================================================
    // Display placement
    // ========================================================================

    pub fn show_map(&mut self, map_id: Option<MapId>) {
        self.map_id = map_id;
    }

    pub fn move_token(
        &mut self,
        id: &CombatantId,
        placement: TokenPlacement,
    ) -> Result<(), AggregateError> {
        self.require(id)?;
        self.tokens.insert(id.clone(), placement);
        Ok(())
    }

    /// Back to the first turn of round 1 with every live value dropped
    pub fn reset(&mut self) {
        self.overrides = LiveOverrides::new();
        self.tokens.clear();
        self.map_id = None;
        turn_cycle::reset(&mut self.turn);
        self.refresh();
    }

    /// State to keep across encounter switches
    pub fn snapshot(&self) -> CombatStateSnapshot {
        CombatStateSnapshot {
            overrides: self.overrides.clone(),
            turn: TurnState {
                manual_selection: None,
                ..self.turn.clone()
            },
            tokens: self.tokens.clone(),
            map_id: self.map_id.clone(),
            updated_at: Utc::now(),
        }
    }

    fn require(&self, id: &CombatantId) -> Result<&Combatant, AggregateError> {
        self.combatant(id)
            .ok_or_else(|| AggregateError::UnknownCombatant(id.clone()))
    }

    fn refresh(&mut self) {
        self.combatants = roster::build(&self.encounter.characters, &self.monsters, &self.overrides);
        self.order = turn_cycle::turn_order(&self.combatants);

        let characters: Vec<Character> = self
            .participating_characters()
            .into_iter()
            .cloned()
            .collect();
        let monsters: Vec<MonsterInstance> = self
            .monsters
            .iter()
            .filter(|instance| self.overrides.initiative(&instance.instance_id).is_some())
            .cloned()
            .collect();
        self.difficulty = difficulty::evaluate(&characters, &monsters);
    }
}

/// Errors from combat session operations
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AggregateError {
    #[error("Combatant not found: {0}")]
    UnknownCombatant(CombatantId),

    #[error("Monsters have no temporary hit points: {0}")]
    TemporaryHitPointsOnMonster(CombatantId),
}
