//! Deterministic procedural world generation for Wildwuchs.
//!
//! Scalar noise fields (height, moisture, temperature) feed a range-based
//! biome resolver, whose result drives the terrain and vegetation
//! painters. Everything is a pure function of the seed and the tile
//! coordinates, so any chunk can be regenerated at any time.

/// Biome definitions, the standard catalog, and resolvers.
pub mod biome;
/// World generation configuration.
pub mod config;
/// Error types for generator construction.
pub mod error;
/// Height, moisture, and temperature fields.
pub mod field;
/// Chunk generation pipeline.
pub mod generator;
/// Value noise and fractal octaves.
pub mod noise;
/// Terrain and vegetation painters.
pub mod painter;
/// Mulberry32 pseudo-random generator.
pub mod rng;
/// Seeds and sub-seed derivation.
pub mod seed;
/// Terrain and vegetation tile types.
pub mod tile;

pub use biome::{BiomeCatalog, BiomeDefinition, BiomeId, BiomeResolver, RangeBiomeResolver};
pub use config::WorldGenConfig;
pub use error::{GenError, GenResult};
pub use generator::{
    CellSample, ChunkGrids, ProceduralGenerator, UniformGenerator, WorldBounds, WorldGenerator,
};
pub use seed::Seed;
pub use tile::{TerrainKind, VegetationKind, VegetationTile};
