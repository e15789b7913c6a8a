use async_trait::async_trait;

use crate::domain::value_objects::{CombatStateSnapshot, EncounterId};

#[derive(Debug, thiserror::Error)]
pub enum CombatStateError {
    #[error("Database error: {0}")]
    Database(String),
    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Session-lifetime storage of combat state, one blob per encounter
#[async_trait]
pub trait CombatStatePort: Send + Sync {
    async fn load(&self, encounter_id: &EncounterId)
        -> Result<Option<CombatStateSnapshot>, CombatStateError>;
    async fn save(
        &self,
        encounter_id: &EncounterId,
        snapshot: &CombatStateSnapshot,
    ) -> Result<(), CombatStateError>;
    async fn clear(&self, encounter_id: &EncounterId) -> Result<(), CombatStateError>;
}
