//! Per-tile painting: climate plus biome in, terrain and vegetation out.

mod terrain;
mod vegetation;

use std::fmt::Debug;

use crate::biome::BiomeDefinition;
use crate::tile::{TerrainKind, VegetationTile};

pub use terrain::DefaultTerrainPainter;
pub use vegetation::{NoiseVegetationPainter, VegetationConfig};

/// Inputs for painting the ground of one tile. Climate values are in `[0, 1]`.
#[derive(Debug, Clone, Copy)]
pub struct TerrainContext<'a> {
    pub altitude: f64,
    pub moisture: f64,
    pub temperature: f64,
    pub biome: &'a BiomeDefinition,
}

/// Inputs for painting the vegetation of one tile.
///
/// Coordinates are global world tiles, not chunk-local.
#[derive(Debug, Clone, Copy)]
pub struct VegetationContext<'a> {
    pub world_x: i32,
    pub world_y: i32,
    pub altitude: f64,
    pub moisture: f64,
    pub temperature: f64,
    pub biome: &'a BiomeDefinition,
    /// Ground already painted for this tile.
    pub terrain: TerrainKind,
}

/// Chooses the ground for a tile.
pub trait TerrainPainter: Debug {
    /// Paint one tile.
    fn paint(&self, ctx: &TerrainContext<'_>) -> TerrainKind;
}

/// Chooses what grows on a tile.
pub trait VegetationPainter: Debug {
    /// Paint one tile.
    fn paint(&self, ctx: &VegetationContext<'_>) -> VegetationTile;
}
