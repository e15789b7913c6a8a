//! Application configuration

use std::env;

use anyhow::{Context, Result};

/// Application configuration loaded from environment
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// SQLite URL of the campaign database (characters, monsters, encounters)
    pub campaign_database_url: String,

    /// Combat state backend: "memory" or "sqlite"
    pub combat_state_backend: String,
    /// SQLite URL used when the combat state backend is "sqlite"
    pub combat_state_database_url: String,

    /// HTTP/WebSocket server port
    pub server_port: u16,
}

impl AppConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            campaign_database_url: env::var("CAMPAIGN_DATABASE_URL")
                .unwrap_or_else(|_| "sqlite://data/dms_tool.db".to_string()),

            combat_state_backend: env::var("COMBAT_STATE_BACKEND")
                .unwrap_or_else(|_| "memory".to_string())
                .to_lowercase(),
            combat_state_database_url: env::var("COMBAT_STATE_DATABASE_URL")
                .unwrap_or_else(|_| "sqlite://data/combat_state.db".to_string()),

            server_port: env::var("SERVER_PORT")
                .unwrap_or_else(|_| "3001".to_string())
                .parse()
                .context("SERVER_PORT must be a valid port number")?,
        })
    }
}
