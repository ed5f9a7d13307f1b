use std::fmt;

use serde::{Deserialize, Serialize};

/// Ground layer of a tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TerrainKind {
    /// Unpainted floor. Walkable.
    #[default]
    Empty,
    /// Map boundary and carved-out rock.
    Wall,
    Grass,
    Dirt,
    Sand,
    Water,
    ShallowWater,
    Swamp,
    Rock,
    Snow,
}

impl TerrainKind {
    /// Every terrain kind.
    pub const ALL: [TerrainKind; 10] = [
        TerrainKind::Empty,
        TerrainKind::Wall,
        TerrainKind::Grass,
        TerrainKind::Dirt,
        TerrainKind::Sand,
        TerrainKind::Water,
        TerrainKind::ShallowWater,
        TerrainKind::Swamp,
        TerrainKind::Rock,
        TerrainKind::Snow,
    ];

    /// Whether a creature may stand on this terrain.
    pub fn is_walkable(self) -> bool {
        match self {
            TerrainKind::Grass
            | TerrainKind::Dirt
            | TerrainKind::Sand
            | TerrainKind::Snow
            | TerrainKind::Empty => true,
            TerrainKind::Water
            | TerrainKind::ShallowWater
            | TerrainKind::Swamp
            | TerrainKind::Wall
            | TerrainKind::Rock => false,
        }
    }

    /// ASCII rendering glyph.
    pub fn glyph(self) -> char {
        match self {
            TerrainKind::Empty => ' ',
            TerrainKind::Wall => '#',
            TerrainKind::Grass => ',',
            TerrainKind::Dirt => '.',
            TerrainKind::Sand => ':',
            TerrainKind::Water => '~',
            TerrainKind::ShallowWater => '≈',
            TerrainKind::Swamp => '%',
            TerrainKind::Rock => '^',
            TerrainKind::Snow => '*',
        }
    }

    /// Stable snake_case name.
    pub fn as_str(self) -> &'static str {
        match self {
            TerrainKind::Empty => "empty",
            TerrainKind::Wall => "wall",
            TerrainKind::Grass => "grass",
            TerrainKind::Dirt => "dirt",
            TerrainKind::Sand => "sand",
            TerrainKind::Water => "water",
            TerrainKind::ShallowWater => "shallow_water",
            TerrainKind::Swamp => "swamp",
            TerrainKind::Rock => "rock",
            TerrainKind::Snow => "snow",
        }
    }
}

impl fmt::Display for TerrainKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Plant species occupying a tile. `None` marks bare ground.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VegetationKind {
    #[default]
    None,
    Grass,
    TallGrass,
    Flower,
    Bush,
    BerryBush,
    Tree,
    PineTree,
    Lily,
    Reed,
}

impl VegetationKind {
    /// Base `(density, height)` before per-tile variation.
    pub fn canonical(self) -> (f64, f64) {
        match self {
            VegetationKind::None => (0.0, 0.0),
            VegetationKind::Grass => (0.2, 0.1),
            VegetationKind::TallGrass => (0.4, 0.3),
            VegetationKind::Flower => (0.3, 0.2),
            VegetationKind::Bush => (0.6, 0.4),
            VegetationKind::BerryBush => (0.7, 0.5),
            VegetationKind::Tree => (0.9, 0.9),
            VegetationKind::PineTree => (0.9, 1.0),
            VegetationKind::Lily => (0.3, 0.1),
            VegetationKind::Reed => (0.7, 0.5),
        }
    }

    /// Trunks block movement.
    pub fn is_solid(self) -> bool {
        matches!(self, VegetationKind::Tree | VegetationKind::PineTree)
    }

    /// ASCII rendering glyph, `None` for bare ground.
    pub fn glyph(self) -> Option<char> {
        let glyph = match self {
            VegetationKind::None => return None,
            VegetationKind::Grass => ',',
            VegetationKind::TallGrass => '"',
            VegetationKind::Flower => '❀',
            VegetationKind::Bush => '&',
            VegetationKind::BerryBush => '%',
            VegetationKind::Tree => '♣',
            VegetationKind::PineTree => 'Λ',
            VegetationKind::Lily => '⁕',
            VegetationKind::Reed => '|',
        };
        Some(glyph)
    }

    /// Stable snake_case name.
    pub fn as_str(self) -> &'static str {
        match self {
            VegetationKind::None => "none",
            VegetationKind::Grass => "grass",
            VegetationKind::TallGrass => "tall_grass",
            VegetationKind::Flower => "flower",
            VegetationKind::Bush => "bush",
            VegetationKind::BerryBush => "berry_bush",
            VegetationKind::Tree => "tree",
            VegetationKind::PineTree => "pine_tree",
            VegetationKind::Lily => "lily",
            VegetationKind::Reed => "reed",
        }
    }
}

impl fmt::Display for VegetationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Vegetation layer of a tile. `density` and `height` lie in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct VegetationTile {
    pub kind: VegetationKind,
    pub density: f64,
    pub height: f64,
}

impl VegetationTile {
    /// Bare ground.
    pub const NONE: VegetationTile = VegetationTile {
        kind: VegetationKind::None,
        density: 0.0,
        height: 0.0,
    };

    /// A tile with the kind's canonical density and height.
    pub fn canonical(kind: VegetationKind) -> Self {
        let (density, height) = kind.canonical();
        Self {
            kind,
            density,
            height,
        }
    }

    /// Whether anything grows here.
    pub fn is_present(&self) -> bool {
        self.kind != VegetationKind::None
    }

    /// Whether this vegetation blocks movement.
    pub fn is_solid(&self) -> bool {
        self.kind.is_solid()
    }

    /// Whether this vegetation blocks line of sight. Trees always do;
    /// bushes and reeds only once tall and dense enough.
    pub fn is_opaque(&self) -> bool {
        match self.kind {
            VegetationKind::Tree | VegetationKind::PineTree => true,
            VegetationKind::Bush | VegetationKind::BerryBush | VegetationKind::Reed => {
                self.height >= 0.4 && self.density >= 0.5
            }
            _ => false,
        }
    }
}
