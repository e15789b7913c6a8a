//! Infrastructure layer - External adapters and implementations
//!
//! This layer contains:
//! - Persistence: SQLite campaign records and combat state stores
//! - HTTP: REST API routes
//! - WebSocket: One-way combat updates to player displays
//! - Config and shared application state

pub mod config;
pub mod display_hub;
pub mod http;
pub mod persistence;
pub mod state;
pub mod websocket;
