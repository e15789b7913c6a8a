//! Value objects - Immutable objects defined by their attributes

mod combat_state;
mod ids;
mod xp_thresholds;

pub use combat_state::{
    CombatStateSnapshot, CombatantOverride, LiveOverrides, TokenPlacement, TurnState,
};
pub use ids::*;
pub use xp_thresholds::{
    multiplier_for_count, step_index_for_count, Multiplier, MultiplierStep, XpThresholds,
    ENCOUNTER_MULTIPLIERS, MAX_LEVEL, MIN_LEVEL,
};
