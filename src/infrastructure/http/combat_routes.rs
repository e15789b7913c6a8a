//! Combat tracker API routes

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;

use crate::application::dto::{
    CombatView, MoveTokenRequestDto, SelectEncounterRequestDto, SetHitPointsRequestDto,
    SetInitiativeRequestDto, ShowMapRequestDto, XpAwardSummaryDto,
};
use crate::application::services::CombatError;
use crate::domain::aggregates::AggregateError;
use crate::domain::services::DifficultyResult;
use crate::domain::value_objects::{CombatantId, EncounterId, MapId};
use crate::infrastructure::state::AppState;

type ApiResult<T> = Result<Json<T>, (StatusCode, String)>;

fn error_response(error: CombatError) -> (StatusCode, String) {
    let status = match &error {
        CombatError::NoActiveCombat | CombatError::StaleEncounter { .. } => StatusCode::CONFLICT,
        CombatError::EncounterNotFound(_) => StatusCode::NOT_FOUND,
        CombatError::Session(AggregateError::UnknownCombatant(_)) => StatusCode::NOT_FOUND,
        CombatError::Session(AggregateError::TemporaryHitPointsOnMonster(_)) => {
            StatusCode::UNPROCESSABLE_ENTITY
        }
        CombatError::Records(_) => StatusCode::BAD_GATEWAY,
        CombatError::State(_) | CombatError::Display(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    if status.is_server_error() {
        tracing::error!("Combat request failed: {}", error);
    }
    (status, error.to_string())
}

/// The active combat, or `null` when nothing is selected
pub async fn get_combat(State(state): State<Arc<AppState>>) -> Json<Option<CombatView>> {
    Json(state.combat_service.current_view().await)
}

pub async fn select_encounter(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SelectEncounterRequestDto>,
) -> ApiResult<CombatView> {
    state
        .combat_service
        .select_encounter(EncounterId::new(req.encounter_id))
        .await
        .map(Json)
        .map_err(error_response)
}

pub async fn clear_selection(
    State(state): State<Arc<AppState>>,
) -> Result<StatusCode, (StatusCode, String)> {
    state
        .combat_service
        .clear_selection()
        .await
        .map_err(error_response)?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn reset_combat(
    State(state): State<Arc<AppState>>,
    Path(encounter_id): Path<String>,
) -> ApiResult<CombatView> {
    state
        .combat_service
        .reset_combat(&EncounterId::new(encounter_id))
        .await
        .map(Json)
        .map_err(error_response)
}

pub async fn get_difficulty(
    State(state): State<Arc<AppState>>,
    Path(encounter_id): Path<String>,
) -> ApiResult<DifficultyResult> {
    state
        .combat_service
        .difficulty(&EncounterId::new(encounter_id))
        .await
        .map(Json)
        .map_err(error_response)
}

pub async fn get_xp_award(
    State(state): State<Arc<AppState>>,
    Path(encounter_id): Path<String>,
) -> ApiResult<XpAwardSummaryDto> {
    state
        .combat_service
        .xp_award(&EncounterId::new(encounter_id))
        .await
        .map(Json)
        .map_err(error_response)
}

// ============================================================================
// Turn cycle
// ============================================================================

pub async fn next_turn(
    State(state): State<Arc<AppState>>,
    Path(encounter_id): Path<String>,
) -> ApiResult<CombatView> {
    state
        .combat_service
        .advance(&EncounterId::new(encounter_id))
        .await
        .map(Json)
        .map_err(error_response)
}

pub async fn previous_turn(
    State(state): State<Arc<AppState>>,
    Path(encounter_id): Path<String>,
) -> ApiResult<CombatView> {
    state
        .combat_service
        .retreat(&EncounterId::new(encounter_id))
        .await
        .map(Json)
        .map_err(error_response)
}

pub async fn inspect_combatant(
    State(state): State<Arc<AppState>>,
    Path((encounter_id, combatant_id)): Path<(String, String)>,
) -> ApiResult<CombatView> {
    state
        .combat_service
        .select_manually(
            &EncounterId::new(encounter_id),
            &CombatantId::new(combatant_id),
        )
        .await
        .map(Json)
        .map_err(error_response)
}

// ============================================================================
// Combatant edits
// ============================================================================

pub async fn set_initiative(
    State(state): State<Arc<AppState>>,
    Path((encounter_id, combatant_id)): Path<(String, String)>,
    Json(req): Json<SetInitiativeRequestDto>,
) -> ApiResult<CombatView> {
    state
        .combat_service
        .set_initiative(
            &EncounterId::new(encounter_id),
            &CombatantId::new(combatant_id),
            req.initiative,
        )
        .await
        .map(Json)
        .map_err(error_response)
}

pub async fn set_hit_points(
    State(state): State<Arc<AppState>>,
    Path((encounter_id, combatant_id)): Path<(String, String)>,
    Json(req): Json<SetHitPointsRequestDto>,
) -> ApiResult<CombatView> {
    state
        .combat_service
        .set_hit_points(
            &EncounterId::new(encounter_id),
            &CombatantId::new(combatant_id),
            req.into(),
        )
        .await
        .map(Json)
        .map_err(error_response)
}

pub async fn roll_monster_initiatives(
    State(state): State<Arc<AppState>>,
    Path(encounter_id): Path<String>,
) -> ApiResult<CombatView> {
    state
        .combat_service
        .roll_monster_initiatives(&EncounterId::new(encounter_id))
        .await
        .map(Json)
        .map_err(error_response)
}

pub async fn roll_monster_hit_points(
    State(state): State<Arc<AppState>>,
    Path(encounter_id): Path<String>,
) -> ApiResult<CombatView> {
    state
        .combat_service
        .roll_monster_hit_points(&EncounterId::new(encounter_id))
        .await
        .map(Json)
        .map_err(error_response)
}

// ============================================================================
// Map and tokens
// ============================================================================

pub async fn show_map(
    State(state): State<Arc<AppState>>,
    Path(encounter_id): Path<String>,
    Json(req): Json<ShowMapRequestDto>,
) -> ApiResult<CombatView> {
    state
        .combat_service
        .show_map(&EncounterId::new(encounter_id), req.map_id.map(MapId::new))
        .await
        .map(Json)
        .map_err(error_response)
}

pub async fn move_token(
    State(state): State<Arc<AppState>>,
    Path((encounter_id, combatant_id)): Path<(String, String)>,
    Json(req): Json<MoveTokenRequestDto>,
) -> ApiResult<CombatView> {
    state
        .combat_service
        .move_token(
            &EncounterId::new(encounter_id),
            &CombatantId::new(combatant_id),
            req.into(),
        )
        .await
        .map(Json)
        .map_err(error_response)
}
