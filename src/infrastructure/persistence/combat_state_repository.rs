use async_trait::async_trait;
use sqlx::SqlitePool;

use crate::application::ports::outbound::{CombatStateError, CombatStatePort};
use crate::domain::value_objects::{CombatStateSnapshot, EncounterId};

/// Combat state kept in SQLite as one JSON blob per encounter
pub struct SqliteCombatStateRepository {
    pool: SqlitePool,
}

impl SqliteCombatStateRepository {
    pub async fn new(pool: SqlitePool) -> Result<Self, sqlx::Error> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS combat_state (
                encounter_id TEXT PRIMARY KEY,
                state TEXT NOT NULL,
                updated_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP
            )
            "#,
        )
        .execute(&pool)
        .await?;

        Ok(Self { pool })
    }
}

#[async_trait]
impl CombatStatePort for SqliteCombatStateRepository {
    async fn load(
        &self,
        encounter_id: &EncounterId,
    ) -> Result<Option<CombatStateSnapshot>, CombatStateError> {
        let row: Option<(String,)> =
            sqlx::query_as("SELECT state FROM combat_state WHERE encounter_id = ?")
                .bind(encounter_id.as_str())
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| CombatStateError::Database(e.to_string()))?;

        row.map(|(json,)| {
            serde_json::from_str(&json).map_err(|e| CombatStateError::Serialization(e.to_string()))
        })
        .transpose()
    }

    async fn save(
        &self,
        encounter_id: &EncounterId,
        snapshot: &CombatStateSnapshot,
    ) -> Result<(), CombatStateError> {
        let json = serde_json::to_string(snapshot)
            .map_err(|e| CombatStateError::Serialization(e.to_string()))?;

        sqlx::query(
            "INSERT OR REPLACE INTO combat_state (encounter_id, state, updated_at) VALUES (?, ?, CURRENT_TIMESTAMP)",
        )
        .bind(encounter_id.as_str())
        .bind(json)
        .execute(&self.pool)
        .await
        .map_err(|e| CombatStateError::Database(e.to_string()))?;

        Ok(())
    }

    async fn clear(&self, encounter_id: &EncounterId) -> Result<(), CombatStateError> {
        sqlx::query("DELETE FROM combat_state WHERE encounter_id = ?")
            .bind(encounter_id.as_str())
            .execute(&self.pool)
            .await
            .map_err(|e| CombatStateError::Database(e.to_string()))?;

        Ok(())
    }
}
