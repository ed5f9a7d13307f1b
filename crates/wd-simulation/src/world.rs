use wd_core::{EntityId, EntityStore, Position, WdError};
use wd_worldgen::{TerrainKind, VegetationTile};

use crate::chunk_store::ChunkStore;
use crate::error::SimResult;
use crate::occupancy::{self, TileOccupancy, WalkCheck};
use crate::viewport::Viewport;

/// Everything a system may read or change during a tick: entities, the
/// chunk cache, and the viewport.
#[derive(Debug)]
pub struct World {
    pub entities: EntityStore,
    pub chunks: ChunkStore,
    pub viewport: Viewport,
}

impl World {
    /// Bundle an entity store and chunk cache with a viewport of the given
    /// size at the world origin.
    pub fn new(entities: EntityStore, chunks: ChunkStore, width: u32, height: u32) -> Self {
        let viewport = Viewport::new(width, height, chunks.bounds());
        Self {
            entities,
            chunks,
            viewport,
        }
    }

    /// See [`occupancy::tile_occupancy`].
    pub fn tile_occupancy(&mut self, x: i32, y: i32) -> TileOccupancy {
        occupancy::tile_occupancy(&mut self.chunks, &self.entities, x, y)
    }

    /// See [`occupancy::can_entity_walk_to`].
    pub fn can_entity_walk_to(&mut self, mover: Option<EntityId>, x: i32, y: i32) -> WalkCheck {
        occupancy::can_entity_walk_to(&mut self.chunks, &self.entities, mover, x, y)
    }

    /// Terrain at `(x, y)`, or `None` outside the world.
    pub fn terrain_at(&mut self, x: i32, y: i32) -> Option<TerrainKind> {
        self.chunks.terrain_at(x, y)
    }

    /// Vegetation at `(x, y)`, or `None` outside the world.
    pub fn vegetation_at(&mut self, x: i32, y: i32) -> Option<VegetationTile> {
        self.chunks.vegetation_at(x, y)
    }

    /// Entities standing exactly on `(x, y)`, ascending by id.
    pub fn entities_at(&mut self, x: i32, y: i32) -> Vec<EntityId> {
        self.chunks.entities_at(&self.entities, x, y)
    }

    /// Give `id` a position and index it in the owning chunk. Tiles
    /// outside the world are refused and leave the entity untouched.
    pub fn place_entity(&mut self, id: EntityId, at: Position) -> SimResult<()> {
        if !self.chunks.in_world(at.x, at.y) {
            return Err(WdError::OutOfBounds(id, at).into());
        }
        if let Some(old) = self.entities.position(id) {
            self.entities.set_position(id, at)?;
            self.chunks.move_entity(id, old, at);
        } else {
            self.entities.set_position(id, at)?;
            self.chunks.add_entity(id, at);
        }
        Ok(())
    }

    /// Move `id` to `to`, keeping the position and the chunk index in step.
    /// Only the world boundary is checked; terrain and occupants are not.
    pub fn move_entity(&mut self, id: EntityId, to: Position) -> SimResult<()> {
        let from = self
            .entities
            .position(id)
            .ok_or(WdError::MissingPosition(id))?;
        if !self.chunks.in_world(to.x, to.y) {
            return Err(WdError::OutOfBounds(id, to).into());
        }
        self.entities.set_position(id, to)?;
        self.chunks.move_entity(id, from, to);
        Ok(())
    }

    /// Remove `id` from the store and the chunk index.
    pub fn despawn(&mut self, id: EntityId) -> SimResult<()> {
        self.entities.remove(id)?;
        self.chunks.remove_entity(id);
        Ok(())
    }

    /// Move the viewport by `(dx, dy)` tiles.
    pub fn pan_viewport(&mut self, dx: i32, dy: i32) {
        let bounds = self.chunks.bounds();
        self.viewport.move_by(dx, dy, bounds);
    }

    /// Center the viewport on `target`.
    pub fn center_viewport_on(&mut self, target: Position) {
        let bounds = self.chunks.bounds();
        self.viewport.center_on(target, bounds);
    }
}
