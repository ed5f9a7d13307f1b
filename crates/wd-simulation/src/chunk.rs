use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};
use wd_core::{EntityId, Position};
use wd_worldgen::{ChunkGrids, TerrainKind, VegetationTile};

/// Chunk-grid coordinate. Chunk `(cx, cy)` covers world tiles
/// `[cx*N, cx*N + N) x [cy*N, cy*N + N)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ChunkCoord {
    pub cx: i32,
    pub cy: i32,
}

impl ChunkCoord {
    /// Shorthand constructor.
    pub const fn new(cx: i32, cy: i32) -> Self {
        Self { cx, cy }
    }
}

impl fmt::Display for ChunkCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.cx, self.cy)
    }
}

/// Simulation fidelity of a chunk, from most to least detailed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SimLevel {
    /// The chunk under the viewport center: AI-driven movement.
    Full,
    /// Visible but off-center: occasional random steps.
    Macro,
    /// Off-screen: rare, silent random steps.
    #[default]
    Summary,
}

impl fmt::Display for SimLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Full => write!(f, "full"),
            Self::Macro => write!(f, "macro"),
            Self::Summary => write!(f, "summary"),
        }
    }
}

/// A materialized N x N region of the world.
#[derive(Debug, Clone)]
pub struct Chunk {
    pub coord: ChunkCoord,
    /// World coordinate of the top-left tile.
    pub origin: Position,
    pub(crate) grids: ChunkGrids,
    pub(crate) entities: BTreeSet<EntityId>,
    pub level: SimLevel,
    /// Last tick on which the movement dispatcher ran for this chunk.
    pub last_updated_tick: u64,
    /// Last tick on which anything read or wrote this chunk.
    pub last_accessed_tick: u64,
    pub(crate) edited: bool,
}

impl Chunk {
    pub(crate) fn new(coord: ChunkCoord, grids: ChunkGrids, tick: u64) -> Self {
        let size = grids.size as i32;
        Self {
            coord,
            origin: Position::new(coord.cx.wrapping_mul(size), coord.cy.wrapping_mul(size)),
            grids,
            entities: BTreeSet::new(),
            level: SimLevel::Summary,
            last_updated_tick: 0,
            last_accessed_tick: tick,
            edited: false,
        }
    }

    /// Edge length in tiles.
    pub fn size(&self) -> u32 {
        self.grids.size
    }

    /// Terrain at a chunk-local coordinate.
    pub fn terrain(&self, lx: u32, ly: u32) -> Option<TerrainKind> {
        self.grids.terrain(lx, ly)
    }

    /// Vegetation at a chunk-local coordinate.
    pub fn vegetation(&self, lx: u32, ly: u32) -> Option<VegetationTile> {
        self.grids.vegetation(lx, ly)
    }

    /// Ids of the entities indexed in this chunk, ascending.
    pub fn entities(&self) -> impl Iterator<Item = EntityId> + '_ {
        self.entities.iter().copied()
    }

    /// Number of indexed entities.
    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    /// Whether a layout has written to this chunk since it was generated.
    pub fn is_edited(&self) -> bool {
        self.edited
    }
}
