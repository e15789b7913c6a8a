//! Outbound ports - Interfaces that the application requires from external systems

mod combat_state_port;
mod display_port;
mod repository_port;

pub use combat_state_port::{CombatStateError, CombatStatePort};
pub use display_port::{DisplayError, DisplayPort};
pub use repository_port::EncounterRepositoryPort;
