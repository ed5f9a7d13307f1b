use std::fmt;

use serde::Serialize;
use wd_core::{EntityId, EntityStore};
use wd_worldgen::{TerrainKind, VegetationTile};

use crate::chunk_store::ChunkStore;

/// Why a tile cannot be entered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BlockReason {
    OutOfBounds,
    Terrain,
    Vegetation,
    Entity,
}

impl fmt::Display for BlockReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::OutOfBounds => "out_of_bounds",
            Self::Terrain => "terrain",
            Self::Vegetation => "vegetation",
            Self::Entity => "entity",
        };
        f.write_str(s)
    }
}

/// Everything standing on one tile.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TileOccupancy {
    pub blocked: bool,
    /// In order: terrain, vegetation, entity. Just `OutOfBounds` outside
    /// the world.
    pub reasons: Vec<BlockReason>,
    pub terrain: Option<TerrainKind>,
    pub vegetation: Option<VegetationTile>,
    /// Every entity on the tile, blocking or not, ascending by id.
    pub entities: Vec<EntityId>,
}

impl TileOccupancy {
    fn out_of_bounds() -> Self {
        Self {
            blocked: true,
            reasons: vec![BlockReason::OutOfBounds],
            terrain: None,
            vegetation: None,
            entities: Vec::new(),
        }
    }
}

/// Result of asking whether an entity may step onto a tile.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WalkCheck {
    pub ok: bool,
    pub reasons: Vec<BlockReason>,
    pub occupancy: TileOccupancy,
}

impl WalkCheck {
    /// The reason reported in a `MoveBlocked` event.
    pub fn first_reason(&self) -> Option<BlockReason> {
        self.reasons.first().copied()
    }
}

/// Inspect the tile at `(x, y)`, generating its chunk if needed.
pub fn tile_occupancy(
    chunks: &mut ChunkStore,
    entities: &EntityStore,
    x: i32,
    y: i32,
) -> TileOccupancy {
    occupancy_excluding(chunks, entities, None, x, y)
}

/// Whether `mover` may step onto `(x, y)`.
///
/// The mover never blocks itself. Pass `None` to test a tile for a new
/// arrival such as a spawn.
pub fn can_entity_walk_to(
    chunks: &mut ChunkStore,
    entities: &EntityStore,
    mover: Option<EntityId>,
    x: i32,
    y: i32,
) -> WalkCheck {
    let occupancy = occupancy_excluding(chunks, entities, mover, x, y);
    WalkCheck {
        ok: !occupancy.blocked,
        reasons: occupancy.reasons.clone(),
        occupancy,
    }
}

fn occupancy_excluding(
    chunks: &mut ChunkStore,
    entities: &EntityStore,
    mover: Option<EntityId>,
    x: i32,
    y: i32,
) -> TileOccupancy {
    if !chunks.in_world(x, y) {
        return TileOccupancy::out_of_bounds();
    }

    let terrain = chunks.terrain_at(x, y);
    let vegetation = chunks.vegetation_at(x, y);
    let occupants = chunks.entities_at(entities, x, y);

    let mut reasons = Vec::new();
    if terrain.is_some_and(|t| !t.is_walkable()) {
        reasons.push(BlockReason::Terrain);
    }
    if vegetation.is_some_and(|v| v.is_solid()) {
        reasons.push(BlockReason::Vegetation);
    }
    let entity_blocks = occupants.iter().any(|id| {
        Some(*id) != mover && entities.kind(*id).is_some_and(|kind| kind.is_blocking())
    });
    if entity_blocks {
        reasons.push(BlockReason::Entity);
    }

    TileOccupancy {
        blocked: !reasons.is_empty(),
        reasons,
        terrain,
        vegetation,
        entities: occupants,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wd_core::{EntityKind, Position};
    use wd_worldgen::{UniformGenerator, VegetationKind, WorldBounds};

    fn setup() -> (ChunkStore, EntityStore) {
        let chunks = ChunkStore::new(
            UniformGenerator::new(WorldBounds::new(32, 32), 8, TerrainKind::Grass).unwrap(),
        );
        (chunks, EntityStore::new())
    }

    fn place(
        chunks: &mut ChunkStore,
        entities: &mut EntityStore,
        kind: EntityKind,
        x: i32,
        y: i32,
    ) -> EntityId {
        let id = entities.spawn(kind, "thing");
        let pos = Position::new(x, y);
        entities.set_position(id, pos).unwrap();
        chunks.add_entity(id, pos);
        id
    }

    #[test]
    fn open_grass_is_walkable() {
        let (mut chunks, entities) = setup();
        let check = can_entity_walk_to(&mut chunks, &entities, None, 4, 4);
        assert!(check.ok);
        assert!(check.reasons.is_empty());
        assert_eq!(check.occupancy.terrain, Some(TerrainKind::Grass));
    }

    #[test]
    fn outside_world_reports_only_out_of_bounds() {
        let (mut chunks, entities) = setup();
        for (x, y) in [(-1, 0), (0, -1), (32, 0), (0, 32)] {
            let occ = tile_occupancy(&mut chunks, &entities, x, y);
            assert!(occ.blocked);
            assert_eq!(occ.reasons, vec![BlockReason::OutOfBounds]);
            assert_eq!(occ.terrain, None);
        }
        assert_eq!(chunks.cached_len(), 0);
    }

    #[test]
    fn reasons_accumulate_in_order() {
        let (mut chunks, mut entities) = setup();
        chunks.set_terrain_at(5, 5, TerrainKind::Wall);
        chunks.set_vegetation_at(5, 5, VegetationTile::canonical(VegetationKind::Tree));
        place(&mut chunks, &mut entities, EntityKind::Structure, 5, 5);

        let check = can_entity_walk_to(&mut chunks, &entities, None, 5, 5);
        assert!(!check.ok);
        assert_eq!(
            check.reasons,
            vec![
                BlockReason::Terrain,
                BlockReason::Vegetation,
                BlockReason::Entity
            ]
        );
        assert_eq!(check.first_reason(), Some(BlockReason::Terrain));
    }

    #[test]
    fn creature_blocks_with_entity_reason() {
        let (mut chunks, mut entities) = setup();
        let blocker = place(&mut chunks, &mut entities, EntityKind::Creature, 3, 3);
        let occ = tile_occupancy(&mut chunks, &entities, 3, 3);
        assert!(occ.blocked);
        assert_eq!(occ.reasons, vec![BlockReason::Entity]);
        assert_eq!(occ.entities, vec![blocker]);
    }

    #[test]
    fn non_blocking_kinds_share_tiles() {
        let (mut chunks, mut entities) = setup();
        place(&mut chunks, &mut entities, EntityKind::Item, 3, 3);
        place(&mut chunks, &mut entities, EntityKind::Corpse, 3, 3);
        let occ = tile_occupancy(&mut chunks, &entities, 3, 3);
        assert!(!occ.blocked);
        assert_eq!(occ.entities.len(), 2);
    }

    #[test]
    fn mover_does_not_block_itself() {
        let (mut chunks, mut entities) = setup();
        let me = place(&mut chunks, &mut entities, EntityKind::Creature, 6, 6);
        assert!(can_entity_walk_to(&mut chunks, &entities, Some(me), 6, 6).ok);
        assert!(!can_entity_walk_to(&mut chunks, &entities, None, 6, 6).ok);
    }

    #[test]
    fn shrubs_do_not_block_trees_do() {
        let (mut chunks, entities) = setup();
        chunks.set_vegetation_at(1, 1, VegetationTile::canonical(VegetationKind::Bush));
        chunks.set_vegetation_at(2, 1, VegetationTile::canonical(VegetationKind::Tree));
        assert!(can_entity_walk_to(&mut chunks, &entities, None, 1, 1).ok);
        let check = can_entity_walk_to(&mut chunks, &entities, None, 2, 1);
        assert_eq!(check.reasons, vec![BlockReason::Vegetation]);
    }

    #[test]
    fn block_reason_names() {
        assert_eq!(BlockReason::OutOfBounds.to_string(), "out_of_bounds");
        assert_eq!(BlockReason::Entity.to_string(), "entity");
    }
}
