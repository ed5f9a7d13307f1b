use serde::{Deserialize, Serialize};

use crate::error::{GenError, GenResult};
use crate::field::TemperatureConfig;
use crate::noise::FractalConfig;
use crate::painter::{DefaultTerrainPainter, VegetationConfig};
use crate::seed::Seed;

/// Everything needed to regenerate a world.
///
/// A world is never persisted: the same config always produces the same
/// tiles. Missing fields in a deserialized config take their defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldGenConfig {
    /// Root seed.
    pub seed: Seed,
    /// World width in tiles.
    pub world_width: u32,
    /// World height in tiles.
    pub world_height: u32,
    /// Chunk edge length in tiles.
    pub chunk_size: u32,
    /// Altitude below which the sea is painted.
    pub sea_level: f64,
    /// Altitude noise.
    pub height: FractalConfig,
    /// Moisture noise.
    pub moisture: FractalConfig,
    /// Temperature noise and climate blend.
    pub temperature: TemperatureConfig,
    /// Vegetation placement.
    pub vegetation: VegetationConfig,
}

impl Default for WorldGenConfig {
    fn default() -> Self {
        Self {
            seed: Seed::default(),
            world_width: 2048,
            world_height: 2048,
            chunk_size: 64,
            sea_level: DefaultTerrainPainter::DEFAULT_SEA_LEVEL,
            height: FractalConfig::new(800.0, 3, 0.5, 2.0),
            moisture: FractalConfig::new(500.0, 3, 0.5, 2.1),
            temperature: TemperatureConfig::default(),
            vegetation: VegetationConfig::default(),
        }
    }
}

impl WorldGenConfig {
    /// Set the root seed.
    pub fn with_seed(mut self, seed: Seed) -> Self {
        self.seed = seed;
        self
    }

    /// Set the world size in tiles.
    pub fn with_world_size(mut self, width: u32, height: u32) -> Self {
        self.world_width = width;
        self.world_height = height;
        self
    }

    /// Set the chunk edge length.
    pub fn with_chunk_size(mut self, size: u32) -> Self {
        self.chunk_size = size;
        self
    }

    /// Set the sea level.
    pub fn with_sea_level(mut self, sea_level: f64) -> Self {
        self.sea_level = sea_level;
        self
    }

    /// Check every parameter a generator would reject.
    pub fn validate(&self) -> GenResult<()> {
        if self.world_width == 0 || self.world_height == 0 {
            return Err(GenError::InvalidWorldSize {
                width: self.world_width,
                height: self.world_height,
            });
        }
        if self.chunk_size == 0 {
            return Err(GenError::InvalidChunkSize);
        }
        self.height.validate("height")?;
        self.moisture.validate("moisture")?;
        self.temperature.noise.validate("temperature")?;
        if self.vegetation.noise_scale.is_nan() || self.vegetation.noise_scale <= 0.0 {
            return Err(GenError::InvalidScale {
                field: "vegetation",
                value: self.vegetation.noise_scale,
            });
        }
        Ok(())
    }
}
