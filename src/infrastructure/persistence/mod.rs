//! SQLite and in-memory persistence adapters
//!
//! The campaign database is opened read-only. Combat state goes to a
//! backend chosen at start-up.

mod combat_state_repository;
mod encounter_repository;
mod memory_combat_state;

pub use combat_state_repository::SqliteCombatStateRepository;
pub use encounter_repository::SqliteEncounterRepository;
pub use memory_combat_state::InMemoryCombatStateStore;

use std::str::FromStr;

use anyhow::{Context, Result};
use async_trait::async_trait;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};

use crate::application::ports::outbound::{CombatStateError, CombatStatePort};
use crate::domain::value_objects::{CombatStateSnapshot, EncounterId};
use crate::infrastructure::config::AppConfig;

/// Open the campaign database without write access
pub async fn connect_campaign_database(url: &str) -> Result<SqlitePool> {
    let options = SqliteConnectOptions::from_str(url)
        .with_context(|| format!("Invalid campaign database URL: {}", url))?
        .read_only(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await
        .with_context(|| format!("Failed to open campaign database: {}", url))?;
    tracing::info!("Connected to campaign database: {}", url);
    Ok(pool)
}

/// Enum wrapper for combat state backends to enable runtime selection
pub enum CombatStateBackendEnum {
    Memory(InMemoryCombatStateStore),
    Sqlite(SqliteCombatStateRepository),
}

impl CombatStateBackendEnum {
    /// Build the backend named by `COMBAT_STATE_BACKEND`
    pub async fn from_config(config: &AppConfig) -> Result<Self> {
        match config.combat_state_backend.as_str() {
            "memory" => Ok(Self::Memory(InMemoryCombatStateStore::new())),
            "sqlite" => {
                let options = SqliteConnectOptions::from_str(&config.combat_state_database_url)
                    .context("Invalid COMBAT_STATE_DATABASE_URL")?
                    .create_if_missing(true);

                if let Some(parent) = options.get_filename().parent() {
                    if !parent.as_os_str().is_empty() {
                        std::fs::create_dir_all(parent)
                            .context("Failed to create combat state database directory")?;
                    }
                }

                let pool = SqlitePoolOptions::new()
                    .max_connections(1)
                    .connect_with(options)
                    .await
                    .context("Failed to connect to SQLite combat state database")?;
                tracing::info!(
                    "Connected to SQLite combat state database: {}",
                    config.combat_state_database_url
                );

                let repository = SqliteCombatStateRepository::new(pool)
                    .await
                    .context("Failed to create combat_state table")?;
                Ok(Self::Sqlite(repository))
            }
            backend => anyhow::bail!("Unsupported combat state backend: {}", backend),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Memory(_) => "memory",
            Self::Sqlite(_) => "sqlite",
        }
    }
}

#[async_trait]
impl CombatStatePort for CombatStateBackendEnum {
    async fn load(
        &self,
        encounter_id: &EncounterId,
    ) -> Result<Option<CombatStateSnapshot>, CombatStateError> {
        match self {
            Self::Memory(store) => store.load(encounter_id).await,
            Self::Sqlite(store) => store.load(encounter_id).await,
        }
    }

    async fn save(
        &self,
        encounter_id: &EncounterId,
        snapshot: &CombatStateSnapshot,
    ) -> Result<(), CombatStateError> {
        match self {
            Self::Memory(store) => store.save(encounter_id, snapshot).await,
            Self::Sqlite(store) => store.save(encounter_id, snapshot).await,
        }
    }

    async fn clear(&self, encounter_id: &EncounterId) -> Result<(), CombatStateError> {
        match self {
            Self::Memory(store) => store.clear(encounter_id).await,
            Self::Sqlite(store) => store.clear(encounter_id).await,
        }
    }
}
