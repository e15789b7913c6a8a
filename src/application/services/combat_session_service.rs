//! Combat Session Service - Runs the single live combat
//!
//! Holds the active [`CombatSession`] behind one async mutex. Every operation
//! names the encounter it targets and is refused when that encounter is not
//! the active one, so a request issued before a selection change can never
//! touch the new combat. After each change the state is written to the
//! combat state store and the new view is pushed to the display; failures of
//! either are returned to the caller without undoing the change.

use std::sync::Arc;

use rand::rngs::StdRng;
use rand::SeedableRng;
use tokio::sync::Mutex;
use tracing::{debug, info, instrument, warn};

use crate::application::dto::{CombatView, XpAwardSummaryDto};
use crate::application::ports::outbound::{
    CombatStateError, CombatStatePort, DisplayError, DisplayPort, EncounterRepositoryPort,
};
use crate::domain::aggregates::{AggregateError, CombatSession, HitPointChange};
use crate::domain::services::DifficultyResult;
use crate::domain::value_objects::{CombatantId, EncounterId, MapId, TokenPlacement};

#[derive(Debug, thiserror::Error)]
pub enum CombatError {
    #[error("No encounter is selected for combat")]
    NoActiveCombat,

    #[error("Encounter {requested} is not the active combat (active: {active})")]
    StaleEncounter {
        requested: EncounterId,
        active: EncounterId,
    },

    #[error("Encounter not found: {0}")]
    EncounterNotFound(EncounterId),

    #[error(transparent)]
    Session(#[from] AggregateError),

    #[error("Combat state error: {0}")]
    State(#[from] CombatStateError),

    #[error("Display error: {0}")]
    Display(#[from] DisplayError),

    #[error("Campaign records error: {0}")]
    Records(String),
}

struct ActiveCombat {
    session: Option<CombatSession>,
    rng: StdRng,
}

pub struct CombatSessionService {
    encounters: Arc<dyn EncounterRepositoryPort>,
    state_store: Arc<dyn CombatStatePort>,
    display: Arc<dyn DisplayPort>,
    active: Mutex<ActiveCombat>,
}

impl CombatSessionService {
    pub fn new(
        encounters: Arc<dyn EncounterRepositoryPort>,
        state_store: Arc<dyn CombatStatePort>,
        display: Arc<dyn DisplayPort>,
    ) -> Self {
        Self::with_rng(encounters, state_store, display, StdRng::from_entropy())
    }

    /// Use a specific dice source, e.g. a seeded one in tests
    pub fn with_rng(
        encounters: Arc<dyn EncounterRepositoryPort>,
        state_store: Arc<dyn CombatStatePort>,
        display: Arc<dyn DisplayPort>,
        rng: StdRng,
    ) -> Self {
        Self {
            encounters,
            state_store,
            display,
            active: Mutex::new(ActiveCombat { session: None, rng }),
        }
    }

    /// Current view of the active combat, if any
    pub async fn current_view(&self) -> Option<CombatView> {
        let active = self.active.lock().await;
        active.session.as_ref().map(CombatView::from_session)
    }

    /// Make an encounter the active combat.
    ///
    /// Resumes from the stored state when the encounter was fought before in
    /// this session, otherwise starts at round 1. Re-selecting the active
    /// encounter reloads its records and keeps the current position.
    #[instrument(skip(self))]
    pub async fn select_encounter(&self, encounter_id: EncounterId) -> Result<CombatView, CombatError> {
        let encounter = self
            .encounters
            .get(&encounter_id)
            .await
            .map_err(|e| CombatError::Records(format!("{e:#}")))?
            .ok_or_else(|| CombatError::EncounterNotFound(encounter_id.clone()))?;

        let mut active = self.active.lock().await;

        let carried = active
            .session
            .as_ref()
            .filter(|session| session.encounter_id() == &encounter_id)
            .map(CombatSession::snapshot);
        let stored = match carried {
            Some(snapshot) => Some(snapshot),
            None => self.state_store.load(&encounter_id).await?,
        };

        let session = match stored {
            Some(snapshot) => {
                debug!(round = snapshot.turn.current_round, "Resuming combat");
                CombatSession::resume(encounter, snapshot)
            }
            None => {
                debug!("Starting new combat");
                CombatSession::start(encounter)
            }
        };
        let view = CombatView::from_session(&session);
        active.session = Some(session);

        info!(
            combatants = view.combatants.len(),
            round = view.round,
            "Encounter selected for combat"
        );
        self.display.push(Some(&view)).await?;
        Ok(view)
    }

    /// Drop the active combat. Its stored state is kept for a later resume.
    #[instrument(skip(self))]
    pub async fn clear_selection(&self) -> Result<(), CombatError> {
        let mut active = self.active.lock().await;
        if let Some(session) = active.session.take() {
            info!(encounter_id = %session.encounter_id(), "Combat selection cleared");
        }
        self.display.push(None).await?;
        Ok(())
    }

    /// Start the active encounter over: stored state is discarded and the
    /// records are reloaded.
    #[instrument(skip(self))]
    pub async fn reset_combat(&self, encounter_id: &EncounterId) -> Result<CombatView, CombatError> {
        let encounter = self
            .encounters
            .get(encounter_id)
            .await
            .map_err(|e| CombatError::Records(format!("{e:#}")))?
            .ok_or_else(|| CombatError::EncounterNotFound(encounter_id.clone()))?;

        let mut active = self.active.lock().await;
        Self::targeted(active.session.as_ref(), encounter_id)?;

        let session = CombatSession::start(encounter);
        let view = CombatView::from_session(&session);
        active.session = Some(session);

        self.state_store.clear(encounter_id).await?;
        info!("Combat reset");
        self.display.push(Some(&view)).await?;
        Ok(view)
    }

    pub async fn difficulty(&self, encounter_id: &EncounterId) -> Result<DifficultyResult, CombatError> {
        self.read(encounter_id, |session| session.difficulty().clone())
            .await
    }

    pub async fn xp_award(&self, encounter_id: &EncounterId) -> Result<XpAwardSummaryDto, CombatError> {
        self.read(encounter_id, XpAwardSummaryDto::from_session).await
    }

    #[instrument(skip(self))]
    pub async fn advance(&self, encounter_id: &EncounterId) -> Result<CombatView, CombatError> {
        self.apply(encounter_id, |session, _| {
            session.advance();
            Ok(())
        })
        .await
    }

    #[instrument(skip(self))]
    pub async fn retreat(&self, encounter_id: &EncounterId) -> Result<CombatView, CombatError> {
        self.apply(encounter_id, |session, _| {
            session.retreat();
            Ok(())
        })
        .await
    }

    #[instrument(skip(self))]
    pub async fn select_manually(
        &self,
        encounter_id: &EncounterId,
        combatant_id: &CombatantId,
    ) -> Result<CombatView, CombatError> {
        self.apply(encounter_id, |session, _| session.select_manually(combatant_id))
            .await
    }

    #[instrument(skip(self))]
    pub async fn set_initiative(
        &self,
        encounter_id: &EncounterId,
        combatant_id: &CombatantId,
        initiative: Option<i32>,
    ) -> Result<CombatView, CombatError> {
        self.apply(encounter_id, |session, _| {
            session.set_initiative(combatant_id, initiative)
        })
        .await
    }

    #[instrument(skip(self))]
    pub async fn set_hit_points(
        &self,
        encounter_id: &EncounterId,
        combatant_id: &CombatantId,
        change: HitPointChange,
    ) -> Result<CombatView, CombatError> {
        self.apply(encounter_id, |session, _| {
            session.set_hit_points(combatant_id, change)
        })
        .await
    }

    #[instrument(skip(self))]
    pub async fn roll_monster_initiatives(
        &self,
        encounter_id: &EncounterId,
    ) -> Result<CombatView, CombatError> {
        self.apply(encounter_id, |session, rng| {
            session.roll_monster_initiatives(rng);
            Ok(())
        })
        .await
    }

    #[instrument(skip(self))]
    pub async fn roll_monster_hit_points(
        &self,
        encounter_id: &EncounterId,
    ) -> Result<CombatView, CombatError> {
        self.apply(encounter_id, |session, rng| {
            session.roll_monster_hit_points(rng);
            Ok(())
        })
        .await
    }

    #[instrument(skip(self))]
    pub async fn show_map(
        &self,
        encounter_id: &EncounterId,
        map_id: Option<MapId>,
    ) -> Result<CombatView, CombatError> {
        self.apply(encounter_id, |session, _| {
            session.show_map(map_id);
            Ok(())
        })
        .await
    }

    #[instrument(skip(self))]
    pub async fn move_token(
        &self,
        encounter_id: &EncounterId,
        combatant_id: &CombatantId,
        placement: TokenPlacement,
    ) -> Result<CombatView, CombatError> {
        self.apply(encounter_id, |session, _| {
            session.move_token(combatant_id, placement)
        })
        .await
    }

    async fn read<T>(
        &self,
        encounter_id: &EncounterId,
        f: impl FnOnce(&CombatSession) -> T,
    ) -> Result<T, CombatError> {
        let active = self.active.lock().await;
        let session = Self::targeted(active.session.as_ref(), encounter_id)?;
        Ok(f(session))
    }

    async fn apply<F>(&self, encounter_id: &EncounterId, change: F) -> Result<CombatView, CombatError>
    where
        F: FnOnce(&mut CombatSession, &mut StdRng) -> Result<(), AggregateError>,
    {
        let mut active = self.active.lock().await;
        let ActiveCombat { session, rng } = &mut *active;

        Self::targeted(session.as_ref(), encounter_id)?;
        let Some(session) = session.as_mut() else {
            return Err(CombatError::NoActiveCombat);
        };

        change(session, rng)?;

        let snapshot = session.snapshot();
        let view = CombatView::from_session(session);
        debug!(
            round = view.round,
            turn = view.visible_turn,
            current = ?view.current_combatant_id,
            "Combat updated"
        );

        if let Err(e) = self.state_store.save(encounter_id, &snapshot).await {
            warn!(error = %e, "Failed to store combat state");
            return Err(e.into());
        }
        self.display.push(Some(&view)).await?;
        Ok(view)
    }

    fn targeted<'a>(
        session: Option<&'a CombatSession>,
        encounter_id: &EncounterId,
    ) -> Result<&'a CombatSession, CombatError> {
        let session = session.ok_or(CombatError::NoActiveCombat)?;
        if session.encounter_id() != encounter_id {
            return Err(CombatError::StaleEncounter {
                requested: encounter_id.clone(),
                active: session.encounter_id().clone(),
            });
        }
        Ok(session)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex as StdMutex;

    use async_trait::async_trait;

    use crate::domain::entities::{Character, Encounter, MonsterTemplate};
    use crate::domain::value_objects::CombatStateSnapshot;

    struct MockEncounters {
        encounters: HashMap<EncounterId, Encounter>,
    }

    #[async_trait]
    impl EncounterRepositoryPort for MockEncounters {
        async fn get(&self, id: &EncounterId) -> anyhow::Result<Option<Encounter>> {
            Ok(self.encounters.get(id).cloned())
        }
    }

    #[derive(Default)]
    struct MockStateStore {
        blobs: StdMutex<HashMap<EncounterId, CombatStateSnapshot>>,
        fail_saves: bool,
    }

    #[async_trait]
    impl CombatStatePort for MockStateStore {
        async fn load(
            &self,
            encounter_id: &EncounterId,
        ) -> Result<Option<CombatStateSnapshot>, CombatStateError> {
            Ok(self.blobs.lock().unwrap().get(encounter_id).cloned())
        }

        async fn save(
            &self,
            encounter_id: &EncounterId,
            snapshot: &CombatStateSnapshot,
        ) -> Result<(), CombatStateError> {
            if self.fail_saves {
                return Err(CombatStateError::Database("disk full".to_string()));
            }
            self.blobs
                .lock()
                .unwrap()
                .insert(encounter_id.clone(), snapshot.clone());
            Ok(())
        }

        async fn clear(&self, encounter_id: &EncounterId) -> Result<(), CombatStateError> {
            self.blobs.lock().unwrap().remove(encounter_id);
            Ok(())
        }
    }

    #[derive(Default)]
    struct RecordingDisplay {
        pushed: StdMutex<Vec<Option<CombatView>>>,
    }

    #[async_trait]
    impl DisplayPort for RecordingDisplay {
        async fn push(&self, view: Option<&CombatView>) -> Result<(), DisplayError> {
            self.pushed.lock().unwrap().push(view.cloned());
            Ok(())
        }
    }

    fn ambush() -> Encounter {
        Encounter::new("ambush", "Ambush")
            .with_character(Character::new("ana", "Ana").with_level(3).with_hit_points(20, 20))
            .with_character(Character::new("bo", "Bo").with_level(3).with_hit_points(15, 15))
            .with_monster(
                MonsterTemplate::new("wolf", "Wolf")
                    .with_xp("50")
                    .with_hit_points("11 (2d8+2)")
                    .with_dexterity("15 (+2)"),
            )
            .with_monster(
                MonsterTemplate::new("wolf", "Wolf")
                    .with_xp("50")
                    .with_hit_points("11 (2d8+2)")
                    .with_dexterity("15 (+2)"),
            )
    }

    fn crypt() -> Encounter {
        Encounter::new("crypt", "Crypt")
            .with_character(Character::new("ana", "Ana").with_level(3).with_hit_points(20, 20))
            .with_monster(MonsterTemplate::new("ghoul", "Ghoul").with_xp("200"))
    }

    struct Harness {
        service: CombatSessionService,
        store: Arc<MockStateStore>,
        display: Arc<RecordingDisplay>,
    }

    fn harness_with_store(store: MockStateStore) -> Harness {
        let encounters = Arc::new(MockEncounters {
            encounters: [ambush(), crypt()]
                .into_iter()
                .map(|e| (e.id.clone(), e))
                .collect(),
        });
        let store = Arc::new(store);
        let display = Arc::new(RecordingDisplay::default());
        let service = CombatSessionService::with_rng(
            encounters,
            store.clone(),
            display.clone(),
            StdRng::seed_from_u64(42),
        );
        Harness {
            service,
            store,
            display,
        }
    }

    fn harness() -> Harness {
        harness_with_store(MockStateStore::default())
    }

    fn eid(value: &str) -> EncounterId {
        EncounterId::new(value)
    }

    fn cid(value: &str) -> CombatantId {
        CombatantId::new(value)
    }

    async fn start_ambush(h: &Harness) {
        h.service.select_encounter(eid("ambush")).await.unwrap();
        h.service
            .set_initiative(&eid("ambush"), &cid("ana"), Some(18))
            .await
            .unwrap();
        h.service
            .set_initiative(&eid("ambush"), &cid("bo"), Some(7))
            .await
            .unwrap();
        h.service
            .roll_monster_initiatives(&eid("ambush"))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_select_unknown_encounter() {
        let h = harness();
        let result = h.service.select_encounter(eid("nowhere")).await;
        assert!(matches!(result, Err(CombatError::EncounterNotFound(_))));
        assert!(h.service.current_view().await.is_none());
    }

    #[tokio::test]
    async fn test_operations_require_selection() {
        let h = harness();
        let result = h.service.advance(&eid("ambush")).await;
        assert!(matches!(result, Err(CombatError::NoActiveCombat)));
    }

    #[tokio::test]
    async fn test_stale_encounter_is_rejected() {
        let h = harness();
        start_ambush(&h).await;
        h.service.select_encounter(eid("crypt")).await.unwrap();

        let result = h.service.advance(&eid("ambush")).await;
        assert!(matches!(
            result,
            Err(CombatError::StaleEncounter { ref requested, ref active })
                if requested.as_str() == "ambush" && active.as_str() == "crypt"
        ));

        let view = h.service.current_view().await.unwrap();
        assert_eq!(view.encounter_id, "crypt");
        assert_eq!(view.round, 1);
    }

    #[tokio::test]
    async fn test_turns_persist_across_encounter_switch() {
        let h = harness();
        start_ambush(&h).await;
        for _ in 0..5 {
            h.service.advance(&eid("ambush")).await.unwrap();
        }
        let before = h.service.current_view().await.unwrap();
        assert_eq!(before.round, 2);

        h.service.select_encounter(eid("crypt")).await.unwrap();
        let resumed = h.service.select_encounter(eid("ambush")).await.unwrap();

        assert_eq!(resumed.round, before.round);
        assert_eq!(resumed.current_turn_index, before.current_turn_index);
        assert_eq!(resumed.current_combatant_id, before.current_combatant_id);
    }

    #[tokio::test]
    async fn test_every_change_is_stored_and_pushed() {
        let h = harness();
        start_ambush(&h).await;
        h.service
            .select_manually(&eid("ambush"), &cid("bo"))
            .await
            .unwrap();

        let stored = h.store.load(&eid("ambush")).await.unwrap().unwrap();
        assert_eq!(stored.overrides.initiative(&cid("ana")), Some(18));
        assert!(stored.overrides.initiative(&cid("wolf-1")).is_some());

        let pushed = h.display.pushed.lock().unwrap();
        assert_eq!(pushed.len(), 5);
        let last = pushed.last().unwrap().as_ref().unwrap();
        assert_eq!(last.manually_selected_combatant_id.as_deref(), Some("bo"));
    }

    #[tokio::test]
    async fn test_difficulty_and_xp_award() {
        let h = harness();
        start_ambush(&h).await;

        let difficulty = h.service.difficulty(&eid("ambush")).await.unwrap();
        // two wolves at x1.5, shifted up to x2 for a party of two
        assert_eq!(difficulty.adjusted_xp, 200.0);

        let award = h.service.xp_award(&eid("ambush")).await.unwrap();
        assert_eq!(award.adjusted_xp, 200.0);
        assert_eq!(award.participants.len(), 2);
    }

    #[tokio::test]
    async fn test_monster_hit_point_roll() {
        let h = harness();
        h.service.select_encounter(eid("ambush")).await.unwrap();
        let view = h
            .service
            .roll_monster_hit_points(&eid("ambush"))
            .await
            .unwrap();

        for wolf in view.combatants.iter().filter(|c| c.source_id == "wolf") {
            let hp = wolf.max_hp.unwrap();
            assert!((4..=18).contains(&hp));
            assert_eq!(wolf.current_hp, Some(hp));
        }
    }

    #[tokio::test]
    async fn test_unknown_combatant() {
        let h = harness();
        h.service.select_encounter(eid("ambush")).await.unwrap();
        let result = h
            .service
            .set_initiative(&eid("ambush"), &cid("wolf-9"), Some(3))
            .await;
        assert!(matches!(
            result,
            Err(CombatError::Session(AggregateError::UnknownCombatant(_)))
        ));
    }

    #[tokio::test]
    async fn test_store_failure_is_surfaced_after_change() {
        let h = harness_with_store(MockStateStore {
            fail_saves: true,
            ..Default::default()
        });
        h.service.select_encounter(eid("ambush")).await.unwrap();

        let result = h
            .service
            .set_initiative(&eid("ambush"), &cid("ana"), Some(12))
            .await;
        assert!(matches!(result, Err(CombatError::State(_))));

        let view = h.service.current_view().await.unwrap();
        assert_eq!(view.current_combatant_id.as_deref(), Some("ana"));
    }

    #[tokio::test]
    async fn test_reset_combat_starts_over() {
        let h = harness();
        start_ambush(&h).await;
        h.service.advance(&eid("ambush")).await.unwrap();

        let view = h.service.reset_combat(&eid("ambush")).await.unwrap();

        assert_eq!(view.round, 1);
        assert_eq!(view.current_turn_index, 0);
        assert!(view.current_combatant_id.is_none());
        assert!(view.combatants.iter().all(|c| c.initiative.is_none()));
        assert!(h.store.load(&eid("ambush")).await.unwrap().is_none());

        let stale = h.service.reset_combat(&eid("crypt")).await;
        assert!(matches!(stale, Err(CombatError::StaleEncounter { .. })));
    }

    #[tokio::test]
    async fn test_clear_selection() {
        let h = harness();
        start_ambush(&h).await;
        h.service.clear_selection().await.unwrap();

        assert!(h.service.current_view().await.is_none());
        assert!(h.display.pushed.lock().unwrap().last().unwrap().is_none());
        assert!(h.store.load(&eid("ambush")).await.unwrap().is_some());
    }
}
