//! HTTP REST API routes

mod combat_routes;
mod encounter_routes;

use axum::{
    routing::{get, post, put},
    Router,
};
use std::sync::Arc;

use crate::infrastructure::state::AppState;

/// Create all API routes
pub fn create_routes() -> Router<Arc<AppState>> {
    Router::new()
        // Encounter routes
        .route(
            "/api/encounters/{id}/difficulty",
            get(encounter_routes::evaluate_encounter),
        )
        // Combat selection
        .route(
            "/api/combat",
            get(combat_routes::get_combat)
                .put(combat_routes::select_encounter)
                .delete(combat_routes::clear_selection),
        )
        .route(
            "/api/combat/{encounter_id}/reset",
            post(combat_routes::reset_combat),
        )
        .route(
            "/api/combat/{encounter_id}/difficulty",
            get(combat_routes::get_difficulty),
        )
        .route(
            "/api/combat/{encounter_id}/xp-award",
            get(combat_routes::get_xp_award),
        )
        // Turn cycle
        .route(
            "/api/combat/{encounter_id}/turn/next",
            post(combat_routes::next_turn),
        )
        .route(
            "/api/combat/{encounter_id}/turn/previous",
            post(combat_routes::previous_turn),
        )
        .route(
            "/api/combat/{encounter_id}/combatants/{combatant_id}/inspect",
            post(combat_routes::inspect_combatant),
        )
        // Combatant edits
        .route(
            "/api/combat/{encounter_id}/combatants/{combatant_id}/initiative",
            put(combat_routes::set_initiative),
        )
        .route(
            "/api/combat/{encounter_id}/combatants/{combatant_id}/hit-points",
            put(combat_routes::set_hit_points),
        )
        .route(
            "/api/combat/{encounter_id}/monsters/initiative",
            post(combat_routes::roll_monster_initiatives),
        )
        .route(
            "/api/combat/{encounter_id}/monsters/hit-points",
            post(combat_routes::roll_monster_hit_points),
        )
        // Map and tokens
        .route("/api/combat/{encounter_id}/map", put(combat_routes::show_map))
        .route(
            "/api/combat/{encounter_id}/tokens/{combatant_id}",
            put(combat_routes::move_token),
        )
}
