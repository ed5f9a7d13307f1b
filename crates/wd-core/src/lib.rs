//! Core entity types for Wildwuchs: ids, kinds, components, and the entity store.
//!
//! This crate is the read/write contract between the world engine and the
//! collaborators that drive creatures (AI, combat, rendering). It knows
//! nothing about terrain or chunks.

/// Typed component data (position, AI state, race, appearance).
pub mod component;
/// Entity identifiers, kinds, and the entity struct.
pub mod entity;
/// Error types used throughout the crate.
pub mod error;
/// Tile positions and cardinal directions.
pub mod geometry;
/// The entity store that owns all entities.
pub mod store;

/// Re-export component types.
pub use component::{AiMode, AiState, Appearance, ComponentSet, Race};
/// Re-export core entity types.
pub use entity::{Entity, EntityId, EntityKind};
/// Re-export error types.
pub use error::{WdError, WdResult};
/// Re-export geometry types.
pub use geometry::{Direction, Position};
/// Re-export the entity store.
pub use store::EntityStore;
