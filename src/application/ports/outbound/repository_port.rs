//! Repository ports - Read access to the campaign records
//!
//! Campaign records are edited elsewhere; combat only reads them.

use anyhow::Result;
use async_trait::async_trait;

use crate::domain::entities::Encounter;
use crate::domain::value_objects::EncounterId;

/// Repository port for encounters with their participants resolved
#[async_trait]
pub trait EncounterRepositoryPort: Send + Sync {
    /// Get an encounter by ID.
    ///
    /// Monsters are returned once per placement, in placement order.
    async fn get(&self, id: &EncounterId) -> Result<Option<Encounter>>;
}
