//! Per-entity movement, dispatched on the level of the chunk each entity
//! stands in.

mod full;
mod macro_step;
mod summary;

use std::collections::BTreeSet;

use rand::Rng;
use rand::rngs::StdRng;
use tracing::trace;
use wd_core::{Direction, EntityId, Position};

use crate::chunk::SimLevel;
use crate::config::SimConfig;
use crate::context::SimContext;
use crate::error::SimResult;
use crate::event::SimEventKind;
use crate::system::System;

pub use full::{chase_directions, flee_directions};

/// Moves every creature once per tick according to its chunk's level.
#[derive(Debug, Clone)]
pub struct MovementSystem {
    macro_idle_chance: f64,
    summary_idle_chance: f64,
}

impl Default for MovementSystem {
    fn default() -> Self {
        Self::new(0.7, 0.95)
    }
}

impl MovementSystem {
    /// A system with the given chances of standing still in macro and
    /// summary chunks.
    pub fn new(macro_idle_chance: f64, summary_idle_chance: f64) -> Self {
        Self {
            macro_idle_chance,
            summary_idle_chance,
        }
    }

    pub fn from_config(config: &SimConfig) -> Self {
        Self::new(config.macro_idle_chance, config.summary_idle_chance)
    }
}

impl System for MovementSystem {
    fn name(&self) -> &str {
        "movement"
    }

    fn tick(&mut self, ctx: &mut SimContext<'_>) -> SimResult<()> {
        let tick = ctx.tick();
        let mut touched = BTreeSet::new();

        for id in ctx.world.entities.positioned_ids() {
            let Some(pos) = ctx.world.entities.position(id) else {
                continue;
            };
            let chunk = ctx.world.chunks.chunk_for_tile(pos.x, pos.y);
            let (coord, level) = (chunk.coord, chunk.level);
            touched.insert(coord);

            if !ctx.world.entities.kind(id).is_some_and(|k| k.is_movable()) {
                continue;
            }
            match level {
                SimLevel::Full => full::step(ctx, id, pos)?,
                SimLevel::Macro => macro_step::step(ctx, id, pos, self.macro_idle_chance)?,
                SimLevel::Summary => summary::step(ctx, id, pos, self.summary_idle_chance)?,
            }
        }

        for coord in touched {
            ctx.world.chunks.mark_updated(coord, tick);
        }
        Ok(())
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn std::any::Any {
        self
    }
}

/// One of the four cardinal directions, uniformly.
pub(crate) fn random_direction(rng: &mut StdRng) -> Direction {
    Direction::CARDINALS[rng.random_range(0..Direction::CARDINALS.len())]
}

/// Try to step `id` from `from` towards `dir`. Moves the entity if the
/// target tile is free. With `emit`, reports the outcome as an event.
/// Returns whether the entity moved.
pub(crate) fn attempt_step(
    ctx: &mut SimContext<'_>,
    id: EntityId,
    from: Position,
    dir: Direction,
    emit: bool,
) -> SimResult<bool> {
    let to = from.step(dir);
    let check = ctx.world.can_entity_walk_to(Some(id), to.x, to.y);

    if check.ok {
        ctx.world.move_entity(id, to)?;
        if emit {
            ctx.emit(
                SimEventKind::Moved {
                    entity: id,
                    from,
                    to,
                },
                format!("{id} moved {from} -> {to}"),
            );
        }
        return Ok(true);
    }

    if !emit {
        return Ok(false);
    }
    trace!(entity = %id, %from, %to, reasons = ?check.reasons, "step blocked");
    if let Some(reason) = check.first_reason() {
        ctx.emit(
            SimEventKind::MoveBlocked {
                entity: id,
                from,
                to,
                reason,
            },
            format!("{id} blocked at {to} ({reason})"),
        );
    }
    Ok(false)
}


#[cfg(test)]
mod tests {
    use super::harness::Harness;
    use super::*;
    use crate::chunk::ChunkCoord;
    use crate::occupancy::BlockReason;
    use wd_core::{AiMode, AiState, EntityKind};
    use wd_worldgen::{TerrainKind, VegetationKind, VegetationTile};

    fn block_reasons(h: &Harness, id: EntityId) -> Vec<BlockReason> {
        h.events
            .events_for_entity(id)
            .iter()
            .filter_map(|e| match e.kind {
                SimEventKind::MoveBlocked { reason, .. } => Some(reason),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn blocked_step_reports_first_reason() {
        let mut h = Harness::new(1);
        let id = h.creature(5, 5, AiState::default());
        h.world.chunks.set_terrain_at(6, 5, TerrainKind::Water);
        let moved = attempt_step(&mut h.ctx(), id, Position::new(5, 5), Direction::East, true)
            .unwrap();
        assert!(!moved);
        assert_eq!(h.position(id), Position::new(5, 5));
        match &h.events.events()[0].kind {
            SimEventKind::MoveBlocked { reason, to, .. } => {
                assert_eq!(*reason, BlockReason::Terrain);
                assert_eq!(*to, Position::new(6, 5));
            }
            other => panic!("unexpected event {other:?}"),
        }
    }

    #[test]
    fn step_off_the_map_is_out_of_bounds() {
        let mut h = Harness::new(1);
        let id = h.creature(0, 0, AiState::default());
        attempt_step(&mut h.ctx(), id, Position::new(0, 0), Direction::North, true).unwrap();
        assert!(matches!(
            h.events.events()[0].kind,
            SimEventKind::MoveBlocked {
                reason: BlockReason::OutOfBounds,
                ..
            }
        ));
    }

    #[test]
    fn non_creatures_never_move() {
        let mut h = Harness::new(3);
        let hut = h.world.entities.spawn(EntityKind::Structure, "hut");
        h.world.place_entity(hut, Position::new(8, 8)).unwrap();
        let mut system = MovementSystem::new(0.0, 0.0);
        for _ in 0..20 {
            system.tick(&mut h.ctx()).unwrap();
        }
        assert_eq!(h.position(hut), Position::new(8, 8));
    }

    #[test]
    fn tick_stamps_chunks_with_entities() {
        let mut h = Harness::new(3);
        h.creature(40, 40, AiState::default());
        h.clock.advance();
        MovementSystem::default().tick(&mut h.ctx()).unwrap();
        let chunk = h.world.chunks.peek(ChunkCoord::new(2, 2)).unwrap();
        assert_eq!(chunk.last_updated_tick, 2);
    }

    #[test]
    fn chunk_index_tracks_every_step() {
        let mut h = Harness::new(11);
        let ids: Vec<_> = (0..6)
            .map(|i| h.creature(10 + i * 7, 20, AiState::default()))
            .collect();
        let mut system = MovementSystem::new(0.0, 0.0);
        for _ in 0..50 {
            system.tick(&mut h.ctx()).unwrap();
        }
        for id in ids {
            let pos = h.position(id);
            assert_eq!(
                h.world.chunks.chunk_of(id),
                Some(h.world.chunks.world_to_chunk(pos.x, pos.y))
            );
            assert!(h.world.chunks.in_world(pos.x, pos.y));
        }
    }

    #[test]
    fn creature_in_the_way_blocks_a_full_step() {
        let mut h = Harness::new(5);
        h.set_level(20, 20, SimLevel::Full);
        let prey = h.creature(22, 20, AiState::default());
        let chaser = h.creature(20, 20, AiState::targeting(AiMode::Chase, prey));
        let wall = h.creature(21, 20, AiState::targeting(AiMode::Engaged, prey));
        h.world
            .entities
            .set_ai(prey, AiState::targeting(AiMode::Engaged, chaser))
            .unwrap();
        for (x, y) in [(19, 20), (20, 19), (20, 21)] {
            let hut = h.world.entities.spawn(EntityKind::Structure, "hut");
            h.world.place_entity(hut, Position::new(x, y)).unwrap();
        }

        MovementSystem::default().tick(&mut h.ctx()).unwrap();

        assert_eq!(h.position(chaser), Position::new(20, 20));
        assert_eq!(h.position(wall), Position::new(21, 20));
        assert_eq!(block_reasons(&h, chaser), vec![BlockReason::Entity]);
    }

    #[test]
    fn creature_in_the_way_blocks_a_macro_step() {
        let mut h = Harness::new(9);
        h.set_level(30, 30, SimLevel::Macro);
        let id = h.creature(30, 30, AiState::default());
        for (x, y) in [(31, 30), (29, 30), (30, 31), (30, 29)] {
            h.creature(x, y, AiState::default());
        }

        macro_step::step(&mut h.ctx(), id, Position::new(30, 30), 0.0).unwrap();

        assert_eq!(h.position(id), Position::new(30, 30));
        assert_eq!(block_reasons(&h, id), vec![BlockReason::Entity]);
    }

    #[test]
    fn trees_on_grass_block_every_step() {
        let mut h = Harness::new(2);
        h.set_level(10, 10, SimLevel::Macro);
        let id = h.creature(10, 10, AiState::default());
        let tree = VegetationTile::canonical(VegetationKind::Tree);
        for (x, y) in [(11, 10), (9, 10), (10, 11), (10, 9)] {
            h.world.chunks.set_vegetation_at(x, y, tree);
            assert_eq!(h.world.terrain_at(x, y), Some(TerrainKind::Grass));
        }

        let mut system = MovementSystem::new(0.0, 0.0);
        for _ in 0..3 {
            system.tick(&mut h.ctx()).unwrap();
        }

        assert_eq!(h.position(id), Position::new(10, 10));
        assert_eq!(block_reasons(&h, id), vec![BlockReason::Vegetation; 3]);
    }

    #[test]
    fn blocked_summary_steps_stay_silent() {
        let mut h = Harness::new(4);
        let id = h.creature(50, 50, AiState::default());
        for (x, y) in [(51, 50), (49, 50), (50, 51), (50, 49)] {
            h.world.chunks.set_terrain_at(x, y, TerrainKind::Rock);
        }
        let mut system = MovementSystem::new(0.0, 0.0);
        for _ in 0..5 {
            system.tick(&mut h.ctx()).unwrap();
        }
        assert_eq!(h.position(id), Position::new(50, 50));
        assert!(h.events.is_empty());
    }
}
