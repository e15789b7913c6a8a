//! Aggregates - Cluster of domain objects treated as a single unit

pub mod combat_session;

pub use combat_session::{AggregateError, CombatSession, HitPointChange};
