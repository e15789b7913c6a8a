use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::application::ports::outbound::{CombatStateError, CombatStatePort};
use crate::domain::value_objects::{CombatStateSnapshot, EncounterId};

/// Combat state held for the lifetime of the process
#[derive(Default)]
pub struct InMemoryCombatStateStore {
    states: RwLock<HashMap<EncounterId, CombatStateSnapshot>>,
}

impl InMemoryCombatStateStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CombatStatePort for InMemoryCombatStateStore {
    async fn load(
        &self,
        encounter_id: &EncounterId,
    ) -> Result<Option<CombatStateSnapshot>, CombatStateError> {
        Ok(self.states.read().await.get(encounter_id).cloned())
    }

    async fn save(
        &self,
        encounter_id: &EncounterId,
        snapshot: &CombatStateSnapshot,
    ) -> Result<(), CombatStateError> {
        self.states
            .write()
            .await
            .insert(encounter_id.clone(), snapshot.clone());
        Ok(())
    }

    async fn clear(&self, encounter_id: &EncounterId) -> Result<(), CombatStateError> {
        self.states.write().await.remove(encounter_id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    use crate::domain::value_objects::TurnState;

    fn snapshot(round: u32) -> CombatStateSnapshot {
        CombatStateSnapshot {
            overrides: Default::default(),
            turn: TurnState {
                current_round: round,
                ..TurnState::default()
            },
            tokens: Default::default(),
            map_id: None,
            updated_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_states_are_kept_per_encounter() {
        let store = InMemoryCombatStateStore::new();
        store.save(&EncounterId::new("a"), &snapshot(2)).await.unwrap();
        store.save(&EncounterId::new("b"), &snapshot(4)).await.unwrap();

        let a = store.load(&EncounterId::new("a")).await.unwrap().unwrap();
        assert_eq!(a.turn.current_round, 2);

        store.clear(&EncounterId::new("a")).await.unwrap();
        assert!(store.load(&EncounterId::new("a")).await.unwrap().is_none());
        assert!(store.load(&EncounterId::new("b")).await.unwrap().is_some());
    }
}
