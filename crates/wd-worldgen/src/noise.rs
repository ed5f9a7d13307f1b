use serde::{Deserialize, Serialize};

use crate::error::{GenError, GenResult};
use crate::rng::Mulberry32;

/// Lattice value noise: one pseudo-random value per integer grid point,
/// smoothstep-interpolated in between. Output lies in `[0, 1)`.
#[derive(Debug, Clone, Copy)]
pub struct ValueNoise {
    seed: u32,
}

impl ValueNoise {
    /// Build the noise for one sub-seed.
    pub fn new(seed: u32) -> Self {
        Self { seed }
    }

    /// Raw value at an integer lattice point.
    pub fn lattice(&self, xi: i32, yi: i32) -> f64 {
        let cell = xi
            .wrapping_mul(374_761_393)
            .wrapping_add(yi.wrapping_mul(668_265_263));
        let cell_seed = (cell as u32) ^ self.seed;
        Mulberry32::new(cell_seed).next_f64()
    }

    /// Interpolated value at a real coordinate.
    pub fn sample(&self, x: f64, y: f64) -> f64 {
        let x0 = x.floor();
        let y0 = y.floor();
        let sx = smoothstep(x - x0);
        let sy = smoothstep(y - y0);

        let (xi, yi) = (x0 as i32, y0 as i32);
        let n00 = self.lattice(xi, yi);
        let n10 = self.lattice(xi.wrapping_add(1), yi);
        let n01 = self.lattice(xi, yi.wrapping_add(1));
        let n11 = self.lattice(xi.wrapping_add(1), yi.wrapping_add(1));

        let top = n00 + (n10 - n00) * sx;
        let bottom = n01 + (n11 - n01) * sx;
        top + (bottom - top) * sy
    }
}

fn smoothstep(t: f64) -> f64 {
    t * t * (3.0 - 2.0 * t)
}

/// Clamp to `[0, 1]`, mapping NaN to 0.
pub fn clamp01(value: f64) -> f64 {
    if value.is_nan() { 0.0 } else { value.clamp(0.0, 1.0) }
}

/// Octave parameters for fractal (fBm) noise.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FractalConfig {
    /// World units per base-octave lattice cell. Must be positive.
    pub scale: f64,
    /// Number of summed octaves. Must be at least one.
    pub octaves: u32,
    /// Amplitude multiplier per octave.
    pub persistence: f64,
    /// Frequency multiplier per octave.
    pub lacunarity: f64,
}

impl FractalConfig {
    /// Shorthand constructor.
    pub const fn new(scale: f64, octaves: u32, persistence: f64, lacunarity: f64) -> Self {
        Self {
            scale,
            octaves,
            persistence,
            lacunarity,
        }
    }

    /// Reject configurations that cannot produce a field. `field` names the
    /// block in error messages.
    pub fn validate(&self, field: &'static str) -> GenResult<()> {
        if self.scale.is_nan() || self.scale <= 0.0 {
            return Err(GenError::InvalidScale {
                field,
                value: self.scale,
            });
        }
        if self.octaves == 0 {
            return Err(GenError::InvalidOctaves { field });
        }
        Ok(())
    }
}

/// Fractal Brownian motion over [`ValueNoise`], normalized by the total
/// amplitude and clamped to `[0, 1]`.
#[derive(Debug, Clone)]
pub struct FractalNoise {
    base: ValueNoise,
    config: FractalConfig,
}

impl FractalNoise {
    /// Validate `config` and bind it to a sub-seed.
    pub fn new(seed: u32, config: FractalConfig, field: &'static str) -> GenResult<Self> {
        config.validate(field)?;
        Ok(Self {
            base: ValueNoise::new(seed),
            config,
        })
    }

    /// The octave parameters in use.
    pub fn config(&self) -> &FractalConfig {
        &self.config
    }

    /// Sample at a world coordinate.
    pub fn sample(&self, x: f64, y: f64) -> f64 {
        let FractalConfig {
            scale,
            octaves,
            persistence,
            lacunarity,
        } = self.config;

        let mut amplitude = 1.0;
        let mut frequency = 1.0;
        let mut max_amplitude = 0.0;
        let mut sum = 0.0;

        for _ in 0..octaves {
            let nx = (x / scale) * frequency;
            let ny = (y / scale) * frequency;
            sum += self.base.sample(nx, ny) * amplitude;
            max_amplitude += amplitude;
            amplitude *= persistence;
            frequency *= lacunarity;
        }

        if max_amplitude <= 0.0 {
            return 0.0;
        }
        clamp01(sum / max_amplitude)
    }
}
