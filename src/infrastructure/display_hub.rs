//! Display hub - Fans combat views out to connected player displays
//!
//! Each display connection registers an unbounded channel. The latest
//! message is remembered so a display that connects mid-combat is brought up
//! to date immediately.

use std::collections::HashMap;

use async_trait::async_trait;
use serde::Serialize;
use tokio::sync::{mpsc, RwLock};

use crate::application::dto::CombatView;
use crate::application::ports::outbound::{DisplayError, DisplayPort};

/// Unique identifier for a connected display
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ClientId(uuid::Uuid);

impl ClientId {
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4())
    }
}

impl Default for ClientId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ClientId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Messages from the engine to a player display
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type")]
pub enum DisplayMessage {
    /// Combat state changed
    CombatUpdate { view: CombatView },
    /// No encounter is selected any more
    CombatCleared,
    Pong,
    Error { code: String, message: String },
}

impl DisplayMessage {
    pub fn encode(&self) -> Result<String, DisplayError> {
        serde_json::to_string(self).map_err(|e| DisplayError::Serialization(e.to_string()))
    }
}

/// Encoded messages ready to write to a socket
pub type DisplaySender = mpsc::UnboundedSender<String>;

#[derive(Default)]
pub struct DisplayHub {
    clients: RwLock<HashMap<ClientId, DisplaySender>>,
    latest: RwLock<Option<String>>,
}

impl DisplayHub {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a display and queue the latest combat message for it
    pub async fn register(&self, client_id: ClientId, sender: DisplaySender) {
        if let Some(latest) = self.latest.read().await.as_ref() {
            let _ = sender.send(latest.clone());
        }
        self.clients.write().await.insert(client_id, sender);
        tracing::debug!("Display {} registered", client_id);
    }

    pub async fn unregister(&self, client_id: ClientId) {
        if self.clients.write().await.remove(&client_id).is_some() {
            tracing::debug!("Display {} unregistered", client_id);
        }
    }

    pub async fn client_count(&self) -> usize {
        self.clients.read().await.len()
    }

    async fn broadcast(&self, json: String) {
        let mut clients = self.clients.write().await;
        clients.retain(|client_id, sender| {
            let delivered = sender.send(json.clone()).is_ok();
            if !delivered {
                tracing::warn!("Dropping closed display connection {}", client_id);
            }
            delivered
        });
    }
}

#[async_trait]
impl DisplayPort for DisplayHub {
    async fn push(&self, view: Option<&CombatView>) -> Result<(), DisplayError> {
        let message = match view {
            Some(view) => DisplayMessage::CombatUpdate { view: view.clone() },
            None => DisplayMessage::CombatCleared,
        };
        let json = message.encode()?;

        *self.latest.write().await = Some(json.clone());
        self.broadcast(json).await;
        Ok(())
    }
}
