//! Shared application state

use std::sync::Arc;

use anyhow::Result;

use crate::application::ports::outbound::{CombatStatePort, EncounterRepositoryPort};
use crate::application::services::{CombatSessionService, EncounterService};
use crate::infrastructure::config::AppConfig;
use crate::infrastructure::display_hub::DisplayHub;
use crate::infrastructure::persistence::{
    connect_campaign_database, CombatStateBackendEnum, SqliteEncounterRepository,
};

/// Shared application state
pub struct AppState {
    pub config: AppConfig,
    /// Connected player displays
    pub display: Arc<DisplayHub>,
    // Application services
    pub encounter_service: EncounterService,
    pub combat_service: CombatSessionService,
}

impl AppState {
    pub async fn new(config: AppConfig) -> Result<Self> {
        let pool = connect_campaign_database(&config.campaign_database_url).await?;
        let encounters: Arc<dyn EncounterRepositoryPort> =
            Arc::new(SqliteEncounterRepository::new(pool));

        let backend = CombatStateBackendEnum::from_config(&config).await?;
        tracing::info!("Combat state backend: {}", backend.name());

        Ok(Self::from_parts(config, encounters, Arc::new(backend)))
    }

    /// Wire services over already-built adapters
    pub fn from_parts(
        config: AppConfig,
        encounters: Arc<dyn EncounterRepositoryPort>,
        state_store: Arc<dyn CombatStatePort>,
    ) -> Self {
        let display = Arc::new(DisplayHub::new());
        let encounter_service = EncounterService::new(encounters.clone());
        let combat_service = CombatSessionService::new(encounters, state_store, display.clone());

        Self {
            config,
            display,
            encounter_service,
            combat_service,
        }
    }
}
