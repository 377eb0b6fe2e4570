// Creature Arena Schema - Shared type definitions
// This crate contains the static enums and data tables that are shared between
// the battle engine, the prefab team data and any roster persistence layer.

// Re-export the main types
pub use element_types::*;
pub use roster_data::*;

pub mod element_types;
pub mod roster_data;
