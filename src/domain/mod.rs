//! Domain layer - Core business logic with no external dependencies
//!
//! This layer contains:
//! - Entities: Character, MonsterTemplate, Encounter, Combatant
//! - Value Objects: ids, XP tables, turn and override state
//! - Aggregates: the live combat session
//! - Domain Services: difficulty scoring, stat parsing, roster and turn logic

pub mod aggregates;
pub mod entities;
pub mod services;
pub mod value_objects;
