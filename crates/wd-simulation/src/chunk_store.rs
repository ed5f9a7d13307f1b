use std::collections::HashMap;
use std::collections::hash_map::Entry;

use tracing::debug;
use wd_core::{EntityId, EntityStore, Position};
use wd_worldgen::{TerrainKind, VegetationTile, WorldBounds, WorldGenerator};

use crate::chunk::{Chunk, ChunkCoord};
use crate::config::EvictionPolicy;
use crate::viewport::Viewport;

/// Lazily materialized chunk cache plus the entity → chunk index.
///
/// A chunk is generated the first time anything touches it and then kept
/// until the eviction policy drops it. Every read of a tile goes through
/// here, so tile queries take `&mut self`.
#[derive(Debug)]
pub struct ChunkStore {
    generator: Box<dyn WorldGenerator>,
    chunk_size: i32,
    bounds: WorldBounds,
    chunks: HashMap<ChunkCoord, Chunk>,
    entity_chunks: HashMap<EntityId, ChunkCoord>,
    generated: u64,
    tick: u64,
    eviction: EvictionPolicy,
}

impl ChunkStore {
    /// An empty cache backed by `generator`.
    pub fn new(generator: impl WorldGenerator + 'static) -> Self {
        Self::from_boxed(Box::new(generator))
    }

    /// An empty cache backed by an already boxed generator.
    pub fn from_boxed(generator: Box<dyn WorldGenerator>) -> Self {
        let chunk_size = generator.chunk_size().max(1) as i32;
        let bounds = generator.bounds();
        Self {
            generator,
            chunk_size,
            bounds,
            chunks: HashMap::new(),
            entity_chunks: HashMap::new(),
            generated: 0,
            tick: 0,
            eviction: EvictionPolicy::Never,
        }
    }

    /// Set the cache policy.
    pub fn with_eviction(mut self, eviction: EvictionPolicy) -> Self {
        self.eviction = eviction;
        self
    }

    /// Chunk edge length in tiles.
    pub fn chunk_size(&self) -> u32 {
        self.chunk_size as u32
    }

    /// The tiles that exist.
    pub fn bounds(&self) -> WorldBounds {
        self.bounds
    }

    /// Whether `(x, y)` is inside the world.
    pub fn in_world(&self, x: i32, y: i32) -> bool {
        self.bounds.contains(x, y)
    }

    // -----------------------------------------------------------------------
    // Coordinates
    // -----------------------------------------------------------------------

    /// The chunk containing world tile `(x, y)`. Negative tiles map to
    /// negative chunks.
    pub fn world_to_chunk(&self, x: i32, y: i32) -> ChunkCoord {
        ChunkCoord::new(x.div_euclid(self.chunk_size), y.div_euclid(self.chunk_size))
    }

    /// The chunk containing `(x, y)` and the tile's offset inside it.
    pub fn world_to_local(&self, x: i32, y: i32) -> (ChunkCoord, u32, u32) {
        (
            self.world_to_chunk(x, y),
            x.rem_euclid(self.chunk_size) as u32,
            y.rem_euclid(self.chunk_size) as u32,
        )
    }

    // -----------------------------------------------------------------------
    // Chunk access
    // -----------------------------------------------------------------------

    /// The chunk at `coord`, generating it on first access.
    pub fn get_chunk(&mut self, coord: ChunkCoord) -> &Chunk {
        self.chunk_mut(coord)
    }

    /// The chunk containing world tile `(x, y)`.
    pub fn chunk_for_tile(&mut self, x: i32, y: i32) -> &Chunk {
        let coord = self.world_to_chunk(x, y);
        self.chunk_mut(coord)
    }

    /// The chunk at `coord` if it is cached. Never generates.
    pub fn peek(&self, coord: ChunkCoord) -> Option<&Chunk> {
        self.chunks.get(&coord)
    }

    /// Whether `coord` is currently cached.
    pub fn is_cached(&self, coord: ChunkCoord) -> bool {
        self.chunks.contains_key(&coord)
    }

    /// Number of cached chunks.
    pub fn cached_len(&self) -> usize {
        self.chunks.len()
    }

    /// How many times the generator has run.
    pub fn generated_count(&self) -> u64 {
        self.generated
    }

    /// Cached chunk coordinates, sorted.
    pub fn cached_coords(&self) -> Vec<ChunkCoord> {
        let mut coords: Vec<_> = self.chunks.keys().copied().collect();
        coords.sort();
        coords
    }

    pub(crate) fn chunk_mut(&mut self, coord: ChunkCoord) -> &mut Chunk {
        let tick = self.tick;
        let chunk = match self.chunks.entry(coord) {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => {
                debug!(chunk = %coord, "materializing chunk");
                self.generated += 1;
                let grids = self.generator.generate_chunk(coord.cx, coord.cy);
                entry.insert(Chunk::new(coord, grids, tick))
            }
        };
        chunk.last_accessed_tick = tick;
        chunk
    }

    pub(crate) fn chunks_mut(&mut self) -> impl Iterator<Item = &mut Chunk> {
        self.chunks.values_mut()
    }

    /// Coordinates of every chunk overlapping the viewport, row by row.
    /// Generates any that are missing.
    pub fn visible_chunks(&mut self, viewport: &Viewport) -> Vec<ChunkCoord> {
        let (min, max) = viewport.bounds();
        let start = self.world_to_chunk(min.x, min.y);
        let end = self.world_to_chunk(max.x, max.y);

        let mut coords = Vec::new();
        for cy in start.cy..=end.cy {
            for cx in start.cx..=end.cx {
                let coord = ChunkCoord::new(cx, cy);
                self.chunk_mut(coord);
                coords.push(coord);
            }
        }
        coords
    }

    // -----------------------------------------------------------------------
    // Tiles
    // -----------------------------------------------------------------------

    /// Terrain at `(x, y)`, `None` outside the world.
    pub fn terrain_at(&mut self, x: i32, y: i32) -> Option<TerrainKind> {
        if !self.in_world(x, y) {
            return None;
        }
        let (coord, lx, ly) = self.world_to_local(x, y);
        self.chunk_mut(coord).terrain(lx, ly)
    }

    /// Vegetation at `(x, y)`, `None` outside the world.
    pub fn vegetation_at(&mut self, x: i32, y: i32) -> Option<VegetationTile> {
        if !self.in_world(x, y) {
            return None;
        }
        let (coord, lx, ly) = self.world_to_local(x, y);
        self.chunk_mut(coord).vegetation(lx, ly)
    }

    /// Overwrite terrain for hand-built layouts. Ignored outside the world.
    pub fn set_terrain_at(&mut self, x: i32, y: i32, terrain: TerrainKind) {
        if !self.in_world(x, y) {
            return;
        }
        let (coord, lx, ly) = self.world_to_local(x, y);
        let chunk = self.chunk_mut(coord);
        chunk.grids.set_terrain(lx, ly, terrain);
        chunk.edited = true;
    }

    /// Overwrite vegetation for hand-built layouts. Ignored outside the world.
    pub fn set_vegetation_at(&mut self, x: i32, y: i32, vegetation: VegetationTile) {
        if !self.in_world(x, y) {
            return;
        }
        let (coord, lx, ly) = self.world_to_local(x, y);
        let chunk = self.chunk_mut(coord);
        chunk.grids.set_vegetation(lx, ly, vegetation);
        chunk.edited = true;
    }

    // -----------------------------------------------------------------------
    // Entity index
    // -----------------------------------------------------------------------

    /// Index `id` in the chunk containing `pos`. Returns `false` and does
    /// nothing when `pos` is outside the world.
    pub fn add_entity(&mut self, id: EntityId, pos: Position) -> bool {
        if !self.in_world(pos.x, pos.y) {
            return false;
        }
        let coord = self.world_to_chunk(pos.x, pos.y);
        self.chunk_mut(coord).entities.insert(id);
        self.entity_chunks.insert(id, coord);
        true
    }

    /// Re-index `id` after it moved from `from` to `to`. Moves within one
    /// chunk leave the index untouched. Returns `false` and does nothing
    /// when `to` is outside the world.
    pub fn move_entity(&mut self, id: EntityId, from: Position, to: Position) -> bool {
        if !self.in_world(to.x, to.y) {
            return false;
        }
        let old = self.world_to_chunk(from.x, from.y);
        let new = self.world_to_chunk(to.x, to.y);
        if old == new {
            return true;
        }
        if let Some(chunk) = self.chunks.get_mut(&old) {
            chunk.entities.remove(&id);
        }
        self.chunk_mut(new).entities.insert(id);
        self.entity_chunks.insert(id, new);
        true
    }

    /// Drop `id` from the index, returning the chunk it was in.
    pub fn remove_entity(&mut self, id: EntityId) -> Option<ChunkCoord> {
        let coord = self.entity_chunks.remove(&id)?;
        if let Some(chunk) = self.chunks.get_mut(&coord) {
            chunk.entities.remove(&id);
        }
        Some(coord)
    }

    /// The chunk `id` is indexed in.
    pub fn chunk_of(&self, id: EntityId) -> Option<ChunkCoord> {
        self.entity_chunks.get(&id).copied()
    }

    /// Entities whose current position is exactly `(x, y)`, ascending by id.
    ///
    /// Scans the chunk's entity set; empty outside the world.
    pub fn entities_at(&mut self, entities: &EntityStore, x: i32, y: i32) -> Vec<EntityId> {
        if !self.in_world(x, y) {
            return Vec::new();
        }
        let target = Position::new(x, y);
        let coord = self.world_to_chunk(x, y);
        self.chunk_mut(coord)
            .entities()
            .filter(|id| entities.position(*id) == Some(target))
            .collect()
    }

    // -----------------------------------------------------------------------
    // Bookkeeping
    // -----------------------------------------------------------------------

    /// Tick stamped on chunks as they are accessed.
    pub fn set_tick(&mut self, tick: u64) {
        self.tick = tick;
    }

    /// Record that movement ran for `coord` on `tick`.
    pub fn mark_updated(&mut self, coord: ChunkCoord, tick: u64) {
        if let Some(chunk) = self.chunks.get_mut(&coord) {
            chunk.last_updated_tick = tick;
        }
    }

    /// Apply the eviction policy. Returns how many chunks were dropped.
    ///
    /// Only summary chunks with no indexed entities and no manual edits are
    /// candidates, least recently accessed first.
    pub fn evict(&mut self) -> usize {
        let EvictionPolicy::LeastRecentlyUsed { max_chunks } = self.eviction else {
            return 0;
        };
        if self.chunks.len() <= max_chunks {
            return 0;
        }

        let mut candidates: Vec<(u64, ChunkCoord)> = self
            .chunks
            .values()
            .filter(|c| {
                c.level == crate::chunk::SimLevel::Summary && c.entities.is_empty() && !c.edited
            })
            .map(|c| (c.last_accessed_tick, c.coord))
            .collect();
        candidates.sort();

        let excess = self.chunks.len() - max_chunks;
        let mut dropped = 0;
        for (_, coord) in candidates.into_iter().take(excess) {
            self.chunks.remove(&coord);
            dropped += 1;
        }
        if dropped > 0 {
            debug!(dropped, cached = self.chunks.len(), "evicted chunks");
        }
        dropped
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chunk::SimLevel;
    use proptest::prelude::*;
    use wd_core::EntityKind;
    use wd_worldgen::{ProceduralGenerator, Seed, UniformGenerator, WorldGenConfig};

    fn grass_store() -> ChunkStore {
        ChunkStore::new(
            UniformGenerator::new(WorldBounds::new(64, 64), 16, TerrainKind::Grass).unwrap(),
        )
    }

    #[test]
    fn chunks_are_generated_once() {
        let mut store = grass_store();
        let coord = ChunkCoord::new(1, 1);
        let first = store.get_chunk(coord).grids.clone();
        let second = store.get_chunk(coord).grids.clone();
        assert_eq!(first, second);
        assert_eq!(store.generated_count(), 1);
        assert_eq!(store.cached_len(), 1);
    }

    #[test]
    fn procedural_chunks_are_idempotent() {
        let config = WorldGenConfig::default()
            .with_seed(Seed(5))
            .with_world_size(128, 128)
            .with_chunk_size(32);
        let mut store = ChunkStore::new(ProceduralGenerator::from_config(&config).unwrap());
        let a = store.get_chunk(ChunkCoord::new(2, 1)).grids.clone();
        store.get_chunk(ChunkCoord::new(0, 0));
        let b = store.get_chunk(ChunkCoord::new(2, 1)).grids.clone();
        assert_eq!(a, b);
        assert_eq!(store.generated_count(), 2);
    }

    #[test]
    fn coordinates_use_floor_division() {
        let store = grass_store();
        assert_eq!(store.world_to_chunk(0, 15), ChunkCoord::new(0, 0));
        assert_eq!(store.world_to_chunk(16, 31), ChunkCoord::new(1, 1));
        assert_eq!(store.world_to_chunk(-1, -16), ChunkCoord::new(-1, -1));
        assert_eq!(store.world_to_chunk(-17, 0), ChunkCoord::new(-2, 0));
        assert_eq!(
            store.world_to_local(-1, 17),
            (ChunkCoord::new(-1, 1), 15, 1)
        );
    }

    #[test]
    fn out_of_world_tiles_are_none() {
        let mut store = grass_store();
        assert_eq!(store.terrain_at(-1, 0), None);
        assert_eq!(store.terrain_at(64, 0), None);
        assert_eq!(store.vegetation_at(0, 64), None);
        assert_eq!(store.terrain_at(63, 63), Some(TerrainKind::Grass));
    }

    #[test]
    fn setters_mark_edits_and_ignore_out_of_world() {
        let mut store = grass_store();
        store.set_terrain_at(3, 3, TerrainKind::Wall);
        assert_eq!(store.terrain_at(3, 3), Some(TerrainKind::Wall));
        assert!(store.peek(ChunkCoord::new(0, 0)).unwrap().is_edited());

        store.set_terrain_at(-3, 3, TerrainKind::Wall);
        store.set_vegetation_at(99, 3, VegetationTile::NONE);
        assert!(!store.is_cached(ChunkCoord::new(-1, 0)));
        assert!(!store.is_cached(ChunkCoord::new(6, 0)));
    }

    #[test]
    fn entity_index_follows_moves() {
        let mut store = grass_store();
        let id = EntityId(1);
        assert!(store.add_entity(id, Position::new(15, 0)));
        assert_eq!(store.chunk_of(id), Some(ChunkCoord::new(0, 0)));

        assert!(store.move_entity(id, Position::new(15, 0), Position::new(14, 0)));
        assert_eq!(store.chunk_of(id), Some(ChunkCoord::new(0, 0)));

        assert!(!store.move_entity(id, Position::new(14, 0), Position::new(-1, 0)));
        assert_eq!(store.chunk_of(id), Some(ChunkCoord::new(0, 0)));

        assert!(store.move_entity(id, Position::new(14, 0), Position::new(16, 0)));
        assert_eq!(store.chunk_of(id), Some(ChunkCoord::new(1, 0)));
        assert_eq!(store.peek(ChunkCoord::new(0, 0)).unwrap().entity_count(), 0);
        assert_eq!(store.peek(ChunkCoord::new(1, 0)).unwrap().entity_count(), 1);

        assert_eq!(store.remove_entity(id), Some(ChunkCoord::new(1, 0)));
        assert_eq!(store.chunk_of(id), None);
        assert_eq!(store.peek(ChunkCoord::new(1, 0)).unwrap().entity_count(), 0);
    }

    #[test]
    fn add_entity_outside_world_is_ignored() {
        let mut store = grass_store();
        assert!(!store.add_entity(EntityId(1), Position::new(-1, 0)));
        assert_eq!(store.chunk_of(EntityId(1)), None);
        assert_eq!(store.cached_len(), 0);
    }

    #[test]
    fn entities_at_filters_by_exact_position() {
        let mut store = grass_store();
        let mut entities = EntityStore::new();
        let a = entities.spawn(EntityKind::Creature, "a");
        let b = entities.spawn(EntityKind::Creature, "b");
        entities.set_position(a, Position::new(2, 2)).unwrap();
        entities.set_position(b, Position::new(3, 2)).unwrap();
        store.add_entity(a, Position::new(2, 2));
        store.add_entity(b, Position::new(3, 2));

        assert_eq!(store.entities_at(&entities, 2, 2), vec![a]);
        assert_eq!(store.entities_at(&entities, 4, 2), Vec::<EntityId>::new());
        assert!(store.entities_at(&entities, -2, 2).is_empty());
    }

    #[test]
    fn visible_chunks_cover_the_viewport() {
        let mut store = grass_store();
        let viewport = Viewport {
            x: 10,
            y: 10,
            width: 10,
            height: 10,
        };
        assert_eq!(
            store.visible_chunks(&viewport),
            vec![
                ChunkCoord::new(0, 0),
                ChunkCoord::new(1, 0),
                ChunkCoord::new(0, 1),
                ChunkCoord::new(1, 1),
            ]
        );
        assert_eq!(store.cached_len(), 4);
    }

    #[test]
    fn never_policy_keeps_everything() {
        let mut store = grass_store();
        for cx in 0..4 {
            store.get_chunk(ChunkCoord::new(cx, 0));
        }
        assert_eq!(store.evict(), 0);
        assert_eq!(store.cached_len(), 4);
    }

    #[test]
    fn lru_policy_drops_oldest_idle_summary_chunks() {
        let mut store =
            grass_store().with_eviction(EvictionPolicy::LeastRecentlyUsed { max_chunks: 3 });
        for (tick, cx) in (1..=4).zip(0..4) {
            store.set_tick(tick);
            store.get_chunk(ChunkCoord::new(cx, 0));
        }
        // chunk 0 holds an entity, chunk 1 has been edited
        store.add_entity(EntityId(1), Position::new(1, 1));
        store.set_terrain_at(17, 1, TerrainKind::Dirt);
        store.set_tick(10);
        store.get_chunk(ChunkCoord::new(3, 0));

        assert_eq!(store.evict(), 1);
        assert!(!store.is_cached(ChunkCoord::new(2, 0)));
        assert!(store.is_cached(ChunkCoord::new(0, 0)));
        assert!(store.is_cached(ChunkCoord::new(1, 0)));
        assert!(store.is_cached(ChunkCoord::new(3, 0)));
    }

    #[test]
    fn lru_policy_spares_active_chunks() {
        let mut store =
            grass_store().with_eviction(EvictionPolicy::LeastRecentlyUsed { max_chunks: 0 });
        store.get_chunk(ChunkCoord::new(0, 0));
        store.chunk_mut(ChunkCoord::new(0, 0)).level = SimLevel::Full;
        store.get_chunk(ChunkCoord::new(1, 0));
        assert_eq!(store.evict(), 1);
        assert!(store.is_cached(ChunkCoord::new(0, 0)));
    }

    #[test]
    fn evicted_chunks_regenerate_identically() {
        let mut store =
            grass_store().with_eviction(EvictionPolicy::LeastRecentlyUsed { max_chunks: 0 });
        let before = store.get_chunk(ChunkCoord::new(1, 1)).grids.clone();
        store.evict();
        assert!(!store.is_cached(ChunkCoord::new(1, 1)));
        let after = store.get_chunk(ChunkCoord::new(1, 1)).grids.clone();
        assert_eq!(before, after);
        assert_eq!(store.generated_count(), 2);
    }

    proptest! {
        #[test]
        fn local_offsets_recombine(x in -10_000i32..10_000, y in -10_000i32..10_000) {
            let store = grass_store();
            let (coord, lx, ly) = store.world_to_local(x, y);
            prop_assert!(lx < 16 && ly < 16);
            prop_assert_eq!(coord.cx * 16 + lx as i32, x);
            prop_assert_eq!(coord.cy * 16 + ly as i32, y);
        }
    }
}
