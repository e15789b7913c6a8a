//! Encounter Service - Difficulty previews outside a live combat

use std::sync::Arc;

use anyhow::Result;
use tracing::{debug, instrument};

use crate::application::ports::outbound::EncounterRepositoryPort;
use crate::domain::services::{difficulty, roster, DifficultyResult};
use crate::domain::value_objects::EncounterId;

pub struct EncounterService {
    repository: Arc<dyn EncounterRepositoryPort>,
}

impl EncounterService {
    pub fn new(repository: Arc<dyn EncounterRepositoryPort>) -> Self {
        Self { repository }
    }

    /// Score an encounter with every character and every placed monster.
    ///
    /// Returns `None` when the encounter does not exist.
    #[instrument(skip(self))]
    pub async fn evaluate_encounter(&self, id: &EncounterId) -> Result<Option<DifficultyResult>> {
        let Some(encounter) = self.repository.get(id).await? else {
            return Ok(None);
        };

        let monsters = roster::expand_monsters(&encounter.monsters);
        let result = difficulty::evaluate(&encounter.characters, &monsters);
        debug!(
            classification = %result.classification,
            adjusted_xp = result.adjusted_xp,
            "Encounter evaluated"
        );
        Ok(Some(result))
    }
}
