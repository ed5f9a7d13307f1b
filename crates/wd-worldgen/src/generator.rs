use std::fmt::Debug;

use serde::Serialize;
use tracing::instrument;

use crate::biome::{BiomeId, BiomeResolver, RangeBiomeResolver};
use crate::config::WorldGenConfig;
use crate::error::{GenError, GenResult};
use crate::field::{ClimateTemperatureField, NoiseField, ScalarField, TemperatureField};
use crate::painter::{
    DefaultTerrainPainter, NoiseVegetationPainter, TerrainContext, TerrainPainter,
    VegetationContext, VegetationPainter,
};
use crate::tile::{TerrainKind, VegetationTile};

/// The rectangle `[0, width) x [0, height)` of tiles that exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct WorldBounds {
    pub width: u32,
    pub height: u32,
}

impl WorldBounds {
    /// Shorthand constructor.
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Whether the tile `(x, y)` lies inside the world.
    pub fn contains(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && (x as u32) < self.width && (y as u32) < self.height
    }
}

/// Terrain and vegetation for one chunk, row-major (`index = ly * size + lx`).
#[derive(Debug, Clone, PartialEq)]
pub struct ChunkGrids {
    pub size: u32,
    pub terrain: Vec<TerrainKind>,
    pub vegetation: Vec<VegetationTile>,
}

impl ChunkGrids {
    /// A chunk filled with one terrain and no vegetation.
    pub fn filled(size: u32, terrain: TerrainKind) -> Self {
        let cells = (size as usize) * (size as usize);
        Self {
            size,
            terrain: vec![terrain; cells],
            vegetation: vec![VegetationTile::NONE; cells],
        }
    }

    fn index(&self, lx: u32, ly: u32) -> Option<usize> {
        if lx < self.size && ly < self.size {
            Some((ly as usize) * (self.size as usize) + lx as usize)
        } else {
            None
        }
    }

    /// Terrain at a chunk-local coordinate.
    pub fn terrain(&self, lx: u32, ly: u32) -> Option<TerrainKind> {
        self.index(lx, ly).map(|i| self.terrain[i])
    }

    /// Vegetation at a chunk-local coordinate.
    pub fn vegetation(&self, lx: u32, ly: u32) -> Option<VegetationTile> {
        self.index(lx, ly).map(|i| self.vegetation[i])
    }

    /// Overwrite the terrain at a chunk-local coordinate. Ignored out of range.
    pub fn set_terrain(&mut self, lx: u32, ly: u32, terrain: TerrainKind) {
        if let Some(i) = self.index(lx, ly) {
            self.terrain[i] = terrain;
        }
    }

    /// Overwrite the vegetation at a chunk-local coordinate. Ignored out of range.
    pub fn set_vegetation(&mut self, lx: u32, ly: u32, vegetation: VegetationTile) {
        if let Some(i) = self.index(lx, ly) {
            self.vegetation[i] = vegetation;
        }
    }
}

/// Produces chunk contents on demand.
pub trait WorldGenerator: Debug {
    /// Chunk edge length in tiles.
    fn chunk_size(&self) -> u32;

    /// The tiles that exist.
    fn bounds(&self) -> WorldBounds;

    /// Contents of chunk `(cx, cy)`. Tiles outside the world are `Wall`
    /// with no vegetation. Must be deterministic.
    fn generate_chunk(&self, cx: i32, cy: i32) -> ChunkGrids;
}

/// Everything computed for one world tile.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CellSample {
    pub altitude: f64,
    pub moisture: f64,
    pub temperature: f64,
    pub biome: BiomeId,
    pub terrain: TerrainKind,
    pub vegetation: VegetationTile,
}

/// The noise → biome → painter pipeline.
///
/// Each stage is a trait object so that any one of them can be swapped
/// without touching the others.
#[derive(Debug)]
pub struct ProceduralGenerator {
    bounds: WorldBounds,
    chunk_size: u32,
    height: Box<dyn ScalarField>,
    moisture: Box<dyn ScalarField>,
    temperature: Box<dyn TemperatureField>,
    biomes: Box<dyn BiomeResolver>,
    terrain: Box<dyn TerrainPainter>,
    vegetation: Box<dyn VegetationPainter>,
}

impl ProceduralGenerator {
    /// Build the default pipeline. Fails on any invalid parameter.
    pub fn from_config(config: &WorldGenConfig) -> GenResult<Self> {
        config.validate()?;
        Ok(Self {
            bounds: WorldBounds::new(config.world_width, config.world_height),
            chunk_size: config.chunk_size,
            height: Box::new(NoiseField::height(config.seed, config.height)?),
            moisture: Box::new(NoiseField::moisture(config.seed, config.moisture)?),
            temperature: Box::new(ClimateTemperatureField::new(
                config.seed,
                config.temperature,
                config.world_height,
            )?),
            biomes: Box::new(RangeBiomeResolver::default()),
            terrain: Box::new(DefaultTerrainPainter::new(config.sea_level)),
            vegetation: Box::new(NoiseVegetationPainter::new(
                config.seed,
                config.vegetation,
            )?),
        })
    }

    /// Replace the altitude field.
    pub fn with_height_field(mut self, field: impl ScalarField + 'static) -> Self {
        self.height = Box::new(field);
        self
    }

    /// Replace the moisture field.
    pub fn with_moisture_field(mut self, field: impl ScalarField + 'static) -> Self {
        self.moisture = Box::new(field);
        self
    }

    /// Replace the temperature field.
    pub fn with_temperature_field(mut self, field: impl TemperatureField + 'static) -> Self {
        self.temperature = Box::new(field);
        self
    }

    /// Replace the biome resolver.
    pub fn with_biome_resolver(mut self, resolver: impl BiomeResolver + 'static) -> Self {
        self.biomes = Box::new(resolver);
        self
    }

    /// Replace the terrain painter.
    pub fn with_terrain_painter(mut self, painter: impl TerrainPainter + 'static) -> Self {
        self.terrain = Box::new(painter);
        self
    }

    /// Replace the vegetation painter.
    pub fn with_vegetation_painter(mut self, painter: impl VegetationPainter + 'static) -> Self {
        self.vegetation = Box::new(painter);
        self
    }

    /// Run the full pipeline for one in-world tile.
    pub fn sample_cell(&self, x: i32, y: i32) -> CellSample {
        let (fx, fy) = (f64::from(x), f64::from(y));
        let altitude = self.height.sample(fx, fy);
        let moisture = self.moisture.sample(fx, fy);
        let temperature = self.temperature.sample(fx, fy, altitude);
        let biome = self.biomes.pick_biome(altitude, moisture, temperature);

        let terrain = self.terrain.paint(&TerrainContext {
            altitude,
            moisture,
            temperature,
            biome,
        });
        let vegetation = self.vegetation.paint(&VegetationContext {
            world_x: x,
            world_y: y,
            altitude,
            moisture,
            temperature,
            biome,
            terrain,
        });

        CellSample {
            altitude,
            moisture,
            temperature,
            biome: biome.id,
            terrain,
            vegetation,
        }
    }
}

impl WorldGenerator for ProceduralGenerator {
    fn chunk_size(&self) -> u32 {
        self.chunk_size
    }

    fn bounds(&self) -> WorldBounds {
        self.bounds
    }

    #[instrument(level = "debug", skip(self))]
    fn generate_chunk(&self, cx: i32, cy: i32) -> ChunkGrids {
        let size = self.chunk_size;
        let mut grids = ChunkGrids::filled(size, TerrainKind::Wall);
        let origin_x = cx.wrapping_mul(size as i32);
        let origin_y = cy.wrapping_mul(size as i32);

        for ly in 0..size {
            for lx in 0..size {
                let x = origin_x.wrapping_add(lx as i32);
                let y = origin_y.wrapping_add(ly as i32);
                if !self.bounds.contains(x, y) {
                    continue;
                }
                let cell = self.sample_cell(x, y);
                grids.set_terrain(lx, ly, cell.terrain);
                grids.set_vegetation(lx, ly, cell.vegetation);
            }
        }
        grids
    }
}

/// A world of one terrain kind and no vegetation.
///
/// Starting point for hand-built layouts that are then carved through the
/// chunk store's setters.
#[derive(Debug, Clone)]
pub struct UniformGenerator {
    bounds: WorldBounds,
    chunk_size: u32,
    fill: TerrainKind,
}

impl UniformGenerator {
    /// Generator filling every in-world tile with `fill`.
    pub fn new(bounds: WorldBounds, chunk_size: u32, fill: TerrainKind) -> GenResult<Self> {
        if bounds.width == 0 || bounds.height == 0 {
            return Err(GenError::InvalidWorldSize {
                width: bounds.width,
                height: bounds.height,
            });
        }
        if chunk_size == 0 {
            return Err(GenError::InvalidChunkSize);
        }
        Ok(Self {
            bounds,
            chunk_size,
            fill,
        })
    }
}

impl WorldGenerator for UniformGenerator {
    fn chunk_size(&self) -> u32 {
        self.chunk_size
    }

    fn bounds(&self) -> WorldBounds {
        self.bounds
    }

    fn generate_chunk(&self, cx: i32, cy: i32) -> ChunkGrids {
        let size = self.chunk_size;
        let mut grids = ChunkGrids::filled(size, TerrainKind::Wall);
        for ly in 0..size {
            for lx in 0..size {
                let x = cx.wrapping_mul(size as i32).wrapping_add(lx as i32);
                let y = cy.wrapping_mul(size as i32).wrapping_add(ly as i32);
                if self.bounds.contains(x, y) {
                    grids.set_terrain(lx, ly, self.fill);
                }
            }
        }
        grids
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::biome::BiomeDefinition;
    use crate::seed::Seed;

    fn small_config(seed: u32) -> WorldGenConfig {
        WorldGenConfig::default()
            .with_seed(Seed(seed))
            .with_world_size(96, 96)
            .with_chunk_size(32)
    }

    #[test]
    fn generation_is_deterministic() {
        let a = ProceduralGenerator::from_config(&small_config(42)).unwrap();
        let b = ProceduralGenerator::from_config(&small_config(42)).unwrap();
        assert_eq!(a.generate_chunk(1, 2), b.generate_chunk(1, 2));
        assert_eq!(a.generate_chunk(0, 0), a.generate_chunk(0, 0));
    }

    #[test]
    fn different_seeds_differ() {
        let a = ProceduralGenerator::from_config(&small_config(1)).unwrap();
        let b = ProceduralGenerator::from_config(&small_config(2)).unwrap();
        let differs = (0..3).any(|c| a.generate_chunk(c, c) != b.generate_chunk(c, c));
        assert!(differs);
    }

    #[test]
    fn out_of_world_tiles_are_walls() {
        let generator = ProceduralGenerator::from_config(&small_config(7)).unwrap();
        for (cx, cy) in [(-1, 0), (0, -1), (3, 0), (0, 3)] {
            let grids = generator.generate_chunk(cx, cy);
            assert!(grids.terrain.iter().all(|t| *t == TerrainKind::Wall));
            assert!(grids.vegetation.iter().all(|v| !v.is_present()));
        }
    }

    #[test]
    fn partial_chunks_wall_off_the_edge() {
        let config = small_config(7).with_world_size(40, 40);
        let generator = ProceduralGenerator::from_config(&config).unwrap();
        let grids = generator.generate_chunk(1, 1);
        // local (8, 8) is world (40, 40): outside
        assert_eq!(grids.terrain(8, 8), Some(TerrainKind::Wall));
        assert_eq!(grids.terrain(31, 0), Some(TerrainKind::Wall));
        // local (7, 7) is world (39, 39): painted from climate
        let cell = generator.sample_cell(39, 39);
        assert_eq!(grids.terrain(7, 7), Some(cell.terrain));
    }

    #[test]
    fn grids_are_row_major() {
        let generator = ProceduralGenerator::from_config(&small_config(3)).unwrap();
        let grids = generator.generate_chunk(0, 0);
        assert_eq!(grids.terrain.len(), 32 * 32);
        let cell = generator.sample_cell(5, 2);
        assert_eq!(grids.terrain[2 * 32 + 5], cell.terrain);
        assert_eq!(grids.vegetation[2 * 32 + 5], cell.vegetation);
    }

    #[test]
    fn invalid_config_fails_fast() {
        let config = small_config(1).with_chunk_size(0);
        assert_eq!(
            ProceduralGenerator::from_config(&config).unwrap_err(),
            GenError::InvalidChunkSize
        );
    }

    #[derive(Debug)]
    struct Constant(f64);

    impl ScalarField for Constant {
        fn sample(&self, _x: f64, _y: f64) -> f64 {
            self.0
        }
    }

    #[test]
    fn swapped_height_field_drives_the_sea() {
        let generator = ProceduralGenerator::from_config(&small_config(1))
            .unwrap()
            .with_height_field(Constant(0.0));
        let grids = generator.generate_chunk(0, 0);
        assert!(grids.terrain.iter().all(|t| *t == TerrainKind::Water));
    }

    #[derive(Debug)]
    struct AlwaysDesert(BiomeDefinition);

    impl BiomeResolver for AlwaysDesert {
        fn pick_biome(&self, _a: f64, _m: f64, _t: f64) -> &BiomeDefinition {
            &self.0
        }
    }

    #[test]
    fn swapped_resolver_paints_its_biome() {
        let desert = crate::biome::BiomeCatalog::standard()
            .get(BiomeId::Desert)
            .cloned()
            .unwrap();
        let generator = ProceduralGenerator::from_config(&small_config(1))
            .unwrap()
            .with_height_field(Constant(0.5))
            .with_biome_resolver(AlwaysDesert(desert));
        let cell = generator.sample_cell(10, 10);
        assert_eq!(cell.biome, BiomeId::Desert);
        assert_eq!(cell.terrain, TerrainKind::Sand);
        assert!(!cell.vegetation.is_present());
    }

    #[test]
    fn uniform_generator_fills_inside_only() {
        let generator =
            UniformGenerator::new(WorldBounds::new(10, 10), 8, TerrainKind::Grass).unwrap();
        let grids = generator.generate_chunk(1, 1);
        assert_eq!(grids.terrain(1, 1), Some(TerrainKind::Grass));
        assert_eq!(grids.terrain(2, 1), Some(TerrainKind::Wall));
        assert!(UniformGenerator::new(WorldBounds::new(0, 1), 8, TerrainKind::Grass).is_err());
    }

    #[test]
    fn bounds_contains() {
        let bounds = WorldBounds::new(4, 3);
        assert!(bounds.contains(0, 0));
        assert!(bounds.contains(3, 2));
        assert!(!bounds.contains(4, 0));
        assert!(!bounds.contains(-1, 0));
        assert!(!bounds.contains(0, 3));
    }
}
