//! Encounter API routes

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;

use crate::domain::services::DifficultyResult;
use crate::domain::value_objects::EncounterId;
use crate::infrastructure::state::AppState;

/// Difficulty of an encounter with its whole roster taking part
pub async fn evaluate_encounter(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<DifficultyResult>, (StatusCode, String)> {
    let encounter_id = EncounterId::new(id);
    state
        .encounter_service
        .evaluate_encounter(&encounter_id)
        .await
        .map_err(|e| (StatusCode::BAD_GATEWAY, e.to_string()))?
        .map(Json)
        .ok_or_else(|| (StatusCode::NOT_FOUND, format!("Encounter not found: {}", encounter_id)))
}
