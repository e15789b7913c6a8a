//! Display port - One-way push to the player-facing display

use async_trait::async_trait;

use crate::application::dto::CombatView;

#[derive(Debug, thiserror::Error)]
pub enum DisplayError {
    #[error("Serialization error: {0}")]
    Serialization(String),
    #[error("Display unavailable: {0}")]
    Unavailable(String),
}

/// Receives the current combat view after every change. No acknowledgment is awaited.
#[async_trait]
pub trait DisplayPort: Send + Sync {
    async fn push(&self, view: Option<&CombatView>) -> Result<(), DisplayError>;
}
