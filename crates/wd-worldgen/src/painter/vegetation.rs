use serde::{Deserialize, Serialize};

use super::{VegetationContext, VegetationPainter};
use crate::error::{GenError, GenResult};
use crate::noise::{ValueNoise, clamp01};
use crate::seed::Seed;
use crate::tile::{VegetationKind, VegetationTile};

const TYPE_OFFSET: (f64, f64) = (37.21, 91.73);
const DETAIL_OFFSET: (f64, f64) = (123.45, 678.9);

/// Tuning for [`NoiseVegetationPainter`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VegetationConfig {
    /// Divisor applied to world coordinates before sampling. Must be positive.
    pub noise_scale: f64,
    /// Presence noise below this leaves the tile bare.
    pub density_threshold: f64,
}

impl Default for VegetationConfig {
    fn default() -> Self {
        Self {
            noise_scale: 0.35,
            density_threshold: 0.25,
        }
    }
}

/// Biome profiles decide which plants can grow; three decorrelated noise
/// samples decide whether one does, which one, and how big it gets.
#[derive(Debug, Clone)]
pub struct NoiseVegetationPainter {
    noise: ValueNoise,
    config: VegetationConfig,
}

impl NoiseVegetationPainter {
    /// Painter seeded from the `vegetation` sub-seed.
    pub fn new(seed: Seed, config: VegetationConfig) -> GenResult<Self> {
        if config.noise_scale.is_nan() || config.noise_scale <= 0.0 {
            return Err(GenError::InvalidScale {
                field: "vegetation",
                value: config.noise_scale,
            });
        }
        Ok(Self {
            noise: ValueNoise::new(seed.derive("vegetation")),
            config,
        })
    }
}

/// Weighted roulette over a profile. `roll` is in `[0, 1]`.
///
/// Non-positive weights never win. Falls back to the last entry when
/// rounding leaves the roll past the final cumulative weight.
pub fn pick_vegetation(profile: &[(VegetationKind, f64)], roll: f64) -> VegetationKind {
    let total: f64 = profile.iter().map(|(_, w)| *w).filter(|w| *w > 0.0).sum();
    if total <= 0.0 {
        return VegetationKind::None;
    }

    let target = roll * total;
    let mut acc = 0.0;
    for (kind, weight) in profile.iter().filter(|(_, w)| *w > 0.0) {
        acc += weight;
        if target <= acc {
            return *kind;
        }
    }
    profile
        .last()
        .map(|(kind, _)| *kind)
        .unwrap_or(VegetationKind::None)
}

impl VegetationPainter for NoiseVegetationPainter {
    fn paint(&self, ctx: &VegetationContext<'_>) -> VegetationTile {
        let profile = &ctx.biome.vegetation;
        if profile.is_empty() {
            return VegetationTile::NONE;
        }

        let nx = f64::from(ctx.world_x) / self.config.noise_scale;
        let ny = f64::from(ctx.world_y) / self.config.noise_scale;

        if self.noise.sample(nx, ny) < self.config.density_threshold {
            return VegetationTile::NONE;
        }

        let roll = self.noise.sample(nx + TYPE_OFFSET.0, ny + TYPE_OFFSET.1);
        let kind = pick_vegetation(profile, roll);
        if kind == VegetationKind::None {
            return VegetationTile::NONE;
        }

        let detail = self
            .noise
            .sample(nx + DETAIL_OFFSET.0, ny + DETAIL_OFFSET.1);
        let (base_density, base_height) = kind.canonical();
        let moisture_factor = 0.5 + clamp01(ctx.moisture) * 0.5;

        VegetationTile {
            kind,
            height: clamp01(base_height * (0.75 + detail * 0.5)),
            density: clamp01(base_density * (0.5 + detail * 0.5) * moisture_factor),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::biome::{BiomeCatalog, BiomeDefinition, BiomeId};

    fn ctx(biome: &BiomeDefinition, x: i32, y: i32) -> VegetationContext<'_> {
        VegetationContext {
            world_x: x,
            world_y: y,
            altitude: 0.5,
            moisture: 0.8,
            temperature: 0.5,
            biome,
            terrain: biome.terrain,
        }
    }

    #[test]
    fn rejects_non_positive_noise_scale() {
        let config = VegetationConfig {
            noise_scale: 0.0,
            ..VegetationConfig::default()
        };
        assert!(matches!(
            NoiseVegetationPainter::new(Seed(1), config),
            Err(GenError::InvalidScale { field: "vegetation", .. })
        ));
    }

    #[test]
    fn roulette_walks_cumulative_weights() {
        let profile = [
            (VegetationKind::Tree, 0.5),
            (VegetationKind::Bush, 0.0),
            (VegetationKind::Grass, 0.5),
        ];
        assert_eq!(pick_vegetation(&profile, 0.0), VegetationKind::Tree);
        assert_eq!(pick_vegetation(&profile, 0.5), VegetationKind::Tree);
        assert_eq!(pick_vegetation(&profile, 0.51), VegetationKind::Grass);
        assert_eq!(pick_vegetation(&profile, 1.0), VegetationKind::Grass);
    }

    #[test]
    fn roulette_with_no_positive_weight_is_none() {
        let profile = [(VegetationKind::Tree, 0.0), (VegetationKind::Bush, -1.0)];
        assert_eq!(pick_vegetation(&profile, 0.3), VegetationKind::None);
    }

    #[test]
    fn roulette_falls_back_to_last_entry() {
        let profile = [(VegetationKind::Tree, 0.2), (VegetationKind::Reed, 0.0)];
        // roll beyond 1.0 overshoots every cumulative weight
        assert_eq!(pick_vegetation(&profile, 2.0), VegetationKind::Reed);
    }

    #[test]
    fn empty_profile_paints_nothing() {
        let mut biome = BiomeCatalog::standard().biomes()[0].clone();
        biome.vegetation.clear();
        let painter = NoiseVegetationPainter::new(Seed(1), VegetationConfig::default()).unwrap();
        for x in 0..50 {
            assert_eq!(painter.paint(&ctx(&biome, x, 3)), VegetationTile::NONE);
        }
    }

    #[test]
    fn desert_stays_bare() {
        let catalog = BiomeCatalog::standard();
        let desert = catalog.get(BiomeId::Desert).unwrap();
        let painter = NoiseVegetationPainter::new(Seed(5), VegetationConfig::default()).unwrap();
        for x in 0..100 {
            assert!(!painter.paint(&ctx(desert, x, x * 2)).is_present());
        }
    }

    #[test]
    fn threshold_above_one_paints_nothing() {
        let catalog = BiomeCatalog::standard();
        let forest = catalog.get(BiomeId::TemperateForest).unwrap();
        let config = VegetationConfig {
            density_threshold: 1.01,
            ..VegetationConfig::default()
        };
        let painter = NoiseVegetationPainter::new(Seed(5), config).unwrap();
        for x in 0..100 {
            assert!(!painter.paint(&ctx(forest, x, 7)).is_present());
        }
    }

    #[test]
    fn forest_grows_profile_species_within_bounds() {
        let catalog = BiomeCatalog::standard();
        let forest = catalog.get(BiomeId::TemperateForest).unwrap();
        let allowed: Vec<_> = forest.vegetation.iter().map(|(k, _)| *k).collect();
        let painter = NoiseVegetationPainter::new(Seed(11), VegetationConfig::default()).unwrap();

        let mut grown = 0;
        for x in 0..40 {
            for y in 0..40 {
                let tile = painter.paint(&ctx(forest, x, y));
                if tile.is_present() {
                    grown += 1;
                    assert!(allowed.contains(&tile.kind));
                    assert!((0.0..=1.0).contains(&tile.height));
                    assert!((0.0..=1.0).contains(&tile.density));
                }
            }
        }
        assert!(grown > 0);
    }

    #[test]
    fn painting_is_deterministic() {
        let catalog = BiomeCatalog::standard();
        let swamp = catalog.get(BiomeId::Swamp).unwrap();
        let a = NoiseVegetationPainter::new(Seed(3), VegetationConfig::default()).unwrap();
        let b = NoiseVegetationPainter::new(Seed(3), VegetationConfig::default()).unwrap();
        for x in -20..20 {
            assert_eq!(a.paint(&ctx(swamp, x, -x)), b.paint(&ctx(swamp, x, -x)));
        }
    }
}
