use std::fmt::Debug;

use serde::{Deserialize, Serialize};

use crate::error::{GenError, GenResult};
use crate::noise::{FractalConfig, FractalNoise, clamp01};
use crate::seed::Seed;

/// A pure function from world coordinates to `[0, 1]`.
pub trait ScalarField: Debug {
    /// Sample the field at a world coordinate.
    fn sample(&self, x: f64, y: f64) -> f64;
}

/// A temperature field also depends on the altitude at the sample point.
pub trait TemperatureField: Debug {
    /// Sample temperature at a world coordinate with the given altitude.
    fn sample(&self, x: f64, y: f64, altitude: f64) -> f64;
}

/// Fractal noise reshaped with a power curve.
///
/// Heights use `h^1.2` (flatter lowlands, sharper peaks); moisture uses
/// `m^1.1`.
#[derive(Debug, Clone)]
pub struct NoiseField {
    noise: FractalNoise,
    exponent: f64,
}

impl NoiseField {
    /// Exponent applied to height samples.
    pub const HEIGHT_EXPONENT: f64 = 1.2;
    /// Exponent applied to moisture samples.
    pub const MOISTURE_EXPONENT: f64 = 1.1;

    /// Altitude field seeded from the `height` sub-seed.
    pub fn height(seed: Seed, config: FractalConfig) -> GenResult<Self> {
        Ok(Self {
            noise: FractalNoise::new(seed.derive("height"), config, "height")?,
            exponent: Self::HEIGHT_EXPONENT,
        })
    }

    /// Moisture field seeded from the `moisture` sub-seed.
    pub fn moisture(seed: Seed, config: FractalConfig) -> GenResult<Self> {
        Ok(Self {
            noise: FractalNoise::new(seed.derive("moisture"), config, "moisture")?,
            exponent: Self::MOISTURE_EXPONENT,
        })
    }
}

impl ScalarField for NoiseField {
    fn sample(&self, x: f64, y: f64) -> f64 {
        self.noise.sample(x, y).powf(self.exponent)
    }
}

/// Climate blend settings for [`ClimateTemperatureField`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TemperatureConfig {
    /// Noise octaves for local variation.
    #[serde(flatten)]
    pub noise: FractalConfig,
    /// Weight of the latitude term (warm equator, cold poles).
    pub latitude_weight: f64,
    /// Weight of the altitude term (cold peaks).
    pub altitude_weight: f64,
    /// How much of the final value comes from noise, clamped to `[0, 1]`.
    pub noise_strength: f64,
}

impl Default for TemperatureConfig {
    fn default() -> Self {
        Self {
            noise: FractalConfig::new(600.0, 4, 0.55, 2.2),
            latitude_weight: 0.7,
            altitude_weight: 0.3,
            noise_strength: 0.22,
        }
    }
}

/// Temperature from latitude and altitude, perturbed by fractal noise.
///
/// The equator runs along the middle row of the world.
#[derive(Debug, Clone)]
pub struct ClimateTemperatureField {
    noise: FractalNoise,
    config: TemperatureConfig,
    world_height: u32,
}

impl ClimateTemperatureField {
    /// Exponent applied after blending.
    pub const EXPONENT: f64 = 0.95;

    /// Build the field for a world `world_height` tiles tall.
    pub fn new(seed: Seed, config: TemperatureConfig, world_height: u32) -> GenResult<Self> {
        if world_height == 0 {
            return Err(GenError::InvalidWorldSize {
                width: 0,
                height: world_height,
            });
        }
        Ok(Self {
            noise: FractalNoise::new(seed.derive("temperature"), config.noise, "temperature")?,
            config,
            world_height,
        })
    }

    fn climate(&self, y: f64, altitude: f64) -> f64 {
        let lat_norm = if self.world_height > 1 {
            y / f64::from(self.world_height - 1)
        } else {
            0.5
        };
        let latitude = 1.0 - 2.0 * (lat_norm - 0.5).abs();
        let cold_peaks = 1.0 - clamp01(altitude);

        let TemperatureConfig {
            latitude_weight,
            altitude_weight,
            ..
        } = self.config;
        let total = latitude_weight + altitude_weight;
        if total > 0.0 {
            (latitude * latitude_weight + cold_peaks * altitude_weight) / total
        } else {
            latitude
        }
    }
}

impl TemperatureField for ClimateTemperatureField {
    fn sample(&self, x: f64, y: f64, altitude: f64) -> f64 {
        let ns = clamp01(self.config.noise_strength);
        let blended = self.climate(y, altitude) * (1.0 - ns) + self.noise.sample(x, y) * ns;
        clamp01(blended).powf(Self::EXPONENT)
    }
}
