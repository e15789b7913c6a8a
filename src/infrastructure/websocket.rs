//! WebSocket handler for player display connections
//!
//! Displays are passive: they receive [`DisplayMessage`]s and may only ping.

use std::sync::Arc;

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::IntoResponse,
};
use futures_util::{SinkExt, StreamExt};
use serde::Deserialize;
use tokio::sync::mpsc;

use crate::infrastructure::display_hub::{ClientId, DisplayMessage};
use crate::infrastructure::state::AppState;

/// Messages from a display to the engine
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type")]
pub enum DisplayClientMessage {
    Ping,
}

/// WebSocket upgrade handler
pub async fn ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

/// Handle an individual display connection
async fn handle_socket(socket: WebSocket, state: Arc<AppState>) {
    let (mut ws_sender, mut ws_receiver) = socket.split();
    let client_id = ClientId::new();
    let (tx, mut rx) = mpsc::unbounded_channel::<String>();

    tracing::info!("Display connected: {}", client_id);

    let send_task = tokio::spawn(async move {
        while let Some(json) = rx.recv().await {
            if ws_sender.send(Message::Text(json.into())).await.is_err() {
                break;
            }
        }
    });

    state.display.register(client_id, tx.clone()).await;

    while let Some(result) = ws_receiver.next().await {
        match result {
            Ok(Message::Text(text)) => {
                let reply = match serde_json::from_str::<DisplayClientMessage>(&text) {
                    Ok(DisplayClientMessage::Ping) => DisplayMessage::Pong,
                    Err(e) => {
                        tracing::warn!("Failed to parse display message: {}", e);
                        DisplayMessage::Error {
                            code: "PARSE_ERROR".to_string(),
                            message: format!("Invalid message format: {}", e),
                        }
                    }
                };
                match reply.encode() {
                    Ok(json) => {
                        if tx.send(json).is_err() {
                            break;
                        }
                    }
                    Err(e) => tracing::error!("Failed to encode display reply: {}", e),
                }
            }
            Ok(Message::Close(_)) => {
                tracing::info!("Display closed the connection: {}", client_id);
                break;
            }
            Err(e) => {
                tracing::error!("WebSocket error for display {}: {}", client_id, e);
                break;
            }
            _ => {}
        }
    }

    state.display.unregister(client_id).await;
    send_task.abort();

    tracing::info!("Display disconnected: {}", client_id);
}
