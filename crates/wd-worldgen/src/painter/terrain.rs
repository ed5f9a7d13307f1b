use super::{TerrainContext, TerrainPainter};
use crate::noise::clamp01;
use crate::tile::TerrainKind;

/// Sea level with the biome's dominant terrain on dry land.
///
/// Low altitudes become water regardless of biome, and mountain rock turns
/// to snow near the peaks.
#[derive(Debug, Clone, Copy)]
pub struct DefaultTerrainPainter {
    sea_level: f64,
}

impl DefaultTerrainPainter {
    /// Default sea level.
    pub const DEFAULT_SEA_LEVEL: f64 = 0.25;
    /// Rock above this altitude is painted as snow.
    pub const SNOW_LINE: f64 = 0.85;

    /// Painter with the given sea level.
    pub fn new(sea_level: f64) -> Self {
        Self { sea_level }
    }

    /// Altitude below which the sea is painted.
    pub fn sea_level(&self) -> f64 {
        self.sea_level
    }
}

impl Default for DefaultTerrainPainter {
    fn default() -> Self {
        Self::new(Self::DEFAULT_SEA_LEVEL)
    }
}

impl TerrainPainter for DefaultTerrainPainter {
    fn paint(&self, ctx: &TerrainContext<'_>) -> TerrainKind {
        let altitude = clamp01(ctx.altitude);

        if altitude < self.sea_level * 0.6 {
            return TerrainKind::Water;
        }
        if altitude < self.sea_level {
            return TerrainKind::ShallowWater;
        }
        match ctx.biome.terrain {
            TerrainKind::Rock if altitude > Self::SNOW_LINE => TerrainKind::Snow,
            terrain => terrain,
        }
    }
}
