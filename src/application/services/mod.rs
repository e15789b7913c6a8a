//! Application services - Use case implementations
//!
//! Services accept port implementations and return domain results or DTOs.

pub mod combat_session_service;
pub mod encounter_service;

pub use combat_session_service::{CombatError, CombatSessionService};
pub use encounter_service::EncounterService;
