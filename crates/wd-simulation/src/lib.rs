//! Chunked, level-of-detail world simulation for Wildwuchs.
//!
//! Chunks are generated on first touch by a [`wd_worldgen::WorldGenerator`]
//! and cached in a [`ChunkStore`]. Each tick the viewport decides which
//! chunk runs at full fidelity, which run coarse random movement, and which
//! barely move at all. All randomness flows from one seeded RNG, so a run
//! replays exactly from its seed.

/// Chunk coordinates, levels, and materialized chunks.
pub mod chunk;
/// The chunk cache and entity index.
pub mod chunk_store;
/// Simulation clock.
pub mod clock;
/// Configuration types for simulation runs.
pub mod config;
/// Mutable context passed to systems each tick.
pub mod context;
/// Error types for the simulation crate.
pub mod error;
/// Simulation event types and the event log.
pub mod event;
/// Rooms-and-corridors layouts written over generated terrain.
pub mod layout;
/// Level-of-detail assignment from the viewport.
pub mod lod;
/// Level-dependent creature movement.
pub mod movement;
/// Tile legality checks.
pub mod occupancy;
/// Top-level simulation orchestrator.
pub mod simulation;
/// The trait that all simulation systems implement.
pub mod system;
/// The on-screen window of tiles.
pub mod viewport;
/// Entities, chunks, and viewport bundled for systems.
pub mod world;

/// Re-exports of chunk types.
pub use chunk::{Chunk, ChunkCoord, SimLevel};
/// Re-export of [`chunk_store::ChunkStore`].
pub use chunk_store::ChunkStore;
/// Re-export of [`clock::SimClock`].
pub use clock::SimClock;
/// Re-exports of configuration types.
pub use config::{EvictionPolicy, SimConfig};
/// Re-export of [`context::SimContext`].
pub use context::SimContext;
/// Re-exports of [`error::SimError`] and [`error::SimResult`].
pub use error::{SimError, SimResult};
/// Re-exports of [`event::EventLog`], [`event::SimEvent`], and [`event::SimEventKind`].
pub use event::{EventLog, SimEvent, SimEventKind};
/// Re-exports of layout types.
pub use layout::{DungeonLayout, Room};
/// Re-exports of the level-of-detail system.
pub use lod::{LodSystem, update_simulation_levels};
/// Re-export of [`movement::MovementSystem`].
pub use movement::MovementSystem;
/// Re-exports of occupancy types.
pub use occupancy::{BlockReason, TileOccupancy, WalkCheck};
/// Re-export of [`simulation::Simulation`].
pub use simulation::Simulation;
/// Re-export of [`system::System`].
pub use system::System;
/// Re-export of [`viewport::Viewport`].
pub use viewport::Viewport;
/// Re-export of [`world::World`].
pub use world::World;
