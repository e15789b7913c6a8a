//! Domain services - Pure computations over domain entities

pub mod difficulty;
pub mod hit_points;
pub mod initiative;
pub mod roster;
pub mod turn_cycle;

pub use difficulty::{
    DifficultyClass, DifficultyNotice, DifficultyResult, PlayerThresholds, ThresholdBand,
};
