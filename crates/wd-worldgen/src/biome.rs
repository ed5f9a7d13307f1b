use std::fmt::{self, Debug};

use serde::{Deserialize, Serialize};

use crate::error::{GenError, GenResult};
use crate::tile::{TerrainKind, VegetationKind};

/// Identifier of a biome in the standard catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BiomeId {
    Tundra,
    Taiga,
    TemperateForest,
    Grassland,
    Savanna,
    Desert,
    Swamp,
    TropicalForest,
    Mountain,
    ShallowWater,
    DeepWater,
}

impl BiomeId {
    /// Stable snake_case name.
    pub fn as_str(self) -> &'static str {
        match self {
            BiomeId::Tundra => "tundra",
            BiomeId::Taiga => "taiga",
            BiomeId::TemperateForest => "temperate_forest",
            BiomeId::Grassland => "grassland",
            BiomeId::Savanna => "savanna",
            BiomeId::Desert => "desert",
            BiomeId::Swamp => "swamp",
            BiomeId::TropicalForest => "tropical_forest",
            BiomeId::Mountain => "mountain",
            BiomeId::ShallowWater => "shallow_water",
            BiomeId::DeepWater => "deep_water",
        }
    }
}

impl fmt::Display for BiomeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Inclusive interval on one climate axis. Bounds given in the wrong order
/// are treated as if swapped.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ValueRange {
    pub min: f64,
    pub max: f64,
}

impl ValueRange {
    /// Shorthand constructor.
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// How badly `value` fits this range.
    ///
    /// Outside the range the penalty is the distance to the nearest bound.
    /// Inside it is a small pull towards the midpoint, so overlapping
    /// biomes prefer the one whose center is closest.
    pub fn penalty(&self, value: f64) -> f64 {
        let (min, max) = if self.min > self.max {
            (self.max, self.min)
        } else {
            (self.min, self.max)
        };
        if value < min {
            min - value
        } else if value > max {
            value - max
        } else {
            (value - (min + max) / 2.0).abs() * 0.1
        }
    }
}

/// Climate envelope and painting hints for one biome.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BiomeDefinition {
    pub id: BiomeId,
    /// Human-readable name.
    pub name: String,
    pub temperature: ValueRange,
    pub moisture: ValueRange,
    pub altitude: ValueRange,
    #[serde(default)]
    pub is_water: bool,
    #[serde(default)]
    pub is_mountain: bool,
    /// Dominant ground for tiles of this biome.
    pub terrain: TerrainKind,
    /// Ordered vegetation weights. Weights need not sum to 1 and
    /// `VegetationKind::None` is a legal entry.
    pub vegetation: Vec<(VegetationKind, f64)>,
}

impl BiomeDefinition {
    /// Total penalty for a climate triple.
    pub fn score(&self, altitude: f64, moisture: f64, temperature: f64) -> f64 {
        self.temperature.penalty(temperature)
            + self.moisture.penalty(moisture)
            + self.altitude.penalty(altitude)
    }
}

/// Immutable, ordered list of biomes. Order breaks ties.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BiomeCatalog {
    biomes: Vec<BiomeDefinition>,
}

impl BiomeCatalog {
    /// Wrap a list of biomes. Fails on an empty list.
    pub fn new(biomes: Vec<BiomeDefinition>) -> GenResult<Self> {
        if biomes.is_empty() {
            return Err(GenError::EmptyCatalog);
        }
        Ok(Self { biomes })
    }

    /// Biomes in catalog order.
    pub fn biomes(&self) -> &[BiomeDefinition] {
        &self.biomes
    }

    /// Look a biome up by id.
    pub fn get(&self, id: BiomeId) -> Option<&BiomeDefinition> {
        self.biomes.iter().find(|b| b.id == id)
    }

    /// The eleven built-in biomes.
    pub fn standard() -> Self {
        use TerrainKind as T;
        use VegetationKind as V;

        let biome = |id: BiomeId,
                     name: &str,
                     temperature: (f64, f64),
                     moisture: (f64, f64),
                     altitude: (f64, f64),
                     terrain: TerrainKind,
                     vegetation: &[(VegetationKind, f64)]| BiomeDefinition {
            id,
            name: name.to_string(),
            temperature: ValueRange::new(temperature.0, temperature.1),
            moisture: ValueRange::new(moisture.0, moisture.1),
            altitude: ValueRange::new(altitude.0, altitude.1),
            is_water: false,
            is_mountain: false,
            terrain,
            vegetation: vegetation.to_vec(),
        };

        let biomes = vec![
            biome(
                BiomeId::Tundra,
                "Tundra",
                (0.0, 0.25),
                (0.2, 0.8),
                (0.0, 0.6),
                T::Snow,
                &[(V::Grass, 0.1), (V::TallGrass, 0.05), (V::Bush, 0.05)],
            ),
            biome(
                BiomeId::Taiga,
                "Taiga (Conifer Forest)",
                (0.15, 0.45),
                (0.3, 0.9),
                (0.0, 0.7),
                T::Grass,
                &[
                    (V::PineTree, 0.5),
                    (V::Bush, 0.2),
                    (V::TallGrass, 0.2),
                    (V::Grass, 0.1),
                ],
            ),
            biome(
                BiomeId::TemperateForest,
                "Temperate Forest",
                (0.3, 0.7),
                (0.4, 1.0),
                (0.0, 0.7),
                T::Grass,
                &[
                    (V::Tree, 0.4),
                    (V::Bush, 0.2),
                    (V::TallGrass, 0.2),
                    (V::Grass, 0.2),
                ],
            ),
            biome(
                BiomeId::Grassland,
                "Grassland / Plains",
                (0.3, 0.8),
                (0.2, 0.6),
                (0.0, 0.6),
                T::Grass,
                &[(V::Grass, 0.6), (V::TallGrass, 0.3), (V::Flower, 0.1)],
            ),
            biome(
                BiomeId::Savanna,
                "Savanna",
                (0.6, 1.0),
                (0.1, 0.4),
                (0.0, 0.6),
                T::Dirt,
                &[(V::TallGrass, 0.5), (V::Bush, 0.3), (V::Grass, 0.2)],
            ),
            biome(
                BiomeId::Desert,
                "Desert",
                (0.7, 1.0),
                (0.0, 0.2),
                (0.0, 0.8),
                T::Sand,
                &[(V::None, 1.0)],
            ),
            biome(
                BiomeId::Swamp,
                "Swamp",
                (0.4, 0.9),
                (0.6, 1.0),
                (0.0, 0.4),
                T::Swamp,
                &[(V::Reed, 0.6), (V::Lily, 0.3), (V::Bush, 0.1)],
            ),
            biome(
                BiomeId::TropicalForest,
                "Tropical Forest / Jungle",
                (0.6, 1.0),
                (0.6, 1.0),
                (0.0, 0.6),
                T::Grass,
                &[
                    (V::Tree, 0.4),
                    (V::PineTree, 0.05),
                    (V::TallGrass, 0.25),
                    (V::Bush, 0.2),
                    (V::Flower, 0.1),
                ],
            ),
            BiomeDefinition {
                is_mountain: true,
                ..biome(
                    BiomeId::Mountain,
                    "Mountain",
                    (0.0, 0.6),
                    (0.0, 0.7),
                    (0.6, 1.0),
                    T::Rock,
                    &[(V::Grass, 0.1), (V::Bush, 0.05)],
                )
            },
            BiomeDefinition {
                is_water: true,
                ..biome(
                    BiomeId::ShallowWater,
                    "Shallow Water",
                    (0.0, 1.0),
                    (0.9, 1.0),
                    (0.10, 0.25),
                    T::ShallowWater,
                    &[(V::Lily, 0.4), (V::Reed, 0.2)],
                )
            },
            BiomeDefinition {
                is_water: true,
                ..biome(
                    BiomeId::DeepWater,
                    "Deep Water",
                    (0.0, 1.0),
                    (0.9, 1.0),
                    (0.0, 0.10),
                    T::Water,
                    &[(V::None, 1.0)],
                )
            },
        ];
        Self { biomes }
    }
}

/// Classifies a climate triple into a biome.
pub trait BiomeResolver: Debug {
    /// Best-fitting biome. Never fails: some biome always fits best.
    fn pick_biome(&self, altitude: f64, moisture: f64, temperature: f64) -> &BiomeDefinition;
}

/// Lowest total range penalty wins; ties go to the earlier catalog entry.
#[derive(Debug, Clone)]
pub struct RangeBiomeResolver {
    catalog: BiomeCatalog,
}

impl RangeBiomeResolver {
    /// Resolve against the given catalog.
    pub fn new(catalog: BiomeCatalog) -> Self {
        Self { catalog }
    }

    /// The catalog in use.
    pub fn catalog(&self) -> &BiomeCatalog {
        &self.catalog
    }
}

impl Default for RangeBiomeResolver {
    fn default() -> Self {
        Self::new(BiomeCatalog::standard())
    }
}

impl BiomeResolver for RangeBiomeResolver {
    fn pick_biome(&self, altitude: f64, moisture: f64, temperature: f64) -> &BiomeDefinition {
        let biomes = self.catalog.biomes();
        // The catalog is non-empty by construction.
        let mut best = &biomes[0];
        let mut best_score = best.score(altitude, moisture, temperature);
        for biome in &biomes[1..] {
            let score = biome.score(altitude, moisture, temperature);
            if score < best_score {
                best = biome;
                best_score = score;
            }
        }
        best
    }
}
