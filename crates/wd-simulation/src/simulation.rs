use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, info};
use wd_core::{AiState, Appearance, EntityId, EntityKind, EntityStore, Position, Race};
use wd_worldgen::{ProceduralGenerator, WorldGenerator};

use crate::chunk::ChunkCoord;
use crate::chunk_store::ChunkStore;
use crate::clock::SimClock;
use crate::config::SimConfig;
use crate::context::SimContext;
use crate::error::SimResult;
use crate::event::{EventLog, SimEvent, SimEventKind};
use crate::layout::{DungeonLayout, Room};
use crate::lod::{LodSystem, update_simulation_levels};
use crate::movement::MovementSystem;
use crate::system::System;
use crate::viewport::Viewport;
use crate::world::World;

/// Random tiles tried by [`Simulation::spawn_random_creature`].
const SPAWN_ATTEMPTS: usize = 10;

/// The top-level simulation orchestrator.
///
/// Owns the world, clock, RNG, event log, and registered systems.
/// Drives the tick loop: level-of-detail assignment, then movement, then
/// chunk eviction.
pub struct Simulation {
    world: World,
    clock: SimClock,
    rng: StdRng,
    events: EventLog,
    systems: Vec<Box<dyn System>>,
    initialized: bool,
}

impl std::fmt::Debug for Simulation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Simulation")
            .field("tick", &self.clock.tick())
            .field("systems", &self.systems.len())
            .field("entities", &self.world.entities.len())
            .field("chunks", &self.world.chunks.cached_len())
            .field("events", &self.events.len())
            .finish()
    }
}

impl Simulation {
    /// Create a simulation over the procedural world described by `config`.
    pub fn new(config: SimConfig) -> SimResult<Self> {
        let generator = ProceduralGenerator::from_config(&config.world)?;
        Ok(Self::with_generator(generator, config))
    }

    /// Create a simulation over any generator. The world size and chunk
    /// size come from the generator; the rest from `config`.
    pub fn with_generator(generator: impl WorldGenerator + 'static, config: SimConfig) -> Self {
        let chunks = ChunkStore::new(generator).with_eviction(config.eviction);
        let bounds = chunks.bounds();
        info!(
            seed = %config.world.seed,
            width = bounds.width,
            height = bounds.height,
            chunk_size = chunks.chunk_size(),
            "creating simulation"
        );

        let world = World::new(
            EntityStore::new(),
            chunks,
            config.viewport_width,
            config.viewport_height,
        );
        let rng = StdRng::seed_from_u64(u64::from(config.world.seed.derive("simulation")));

        let mut sim = Self {
            world,
            clock: SimClock::new(),
            rng,
            events: EventLog::new(config.max_events),
            systems: Vec::new(),
            initialized: false,
        };
        sim.add_system(LodSystem::new());
        sim.add_system(MovementSystem::from_config(&config));
        sim
    }

    /// Register a system. Systems are ticked in registration order, after
    /// the built-in level-of-detail and movement systems.
    pub fn add_system<S: System + 'static>(&mut self, system: S) {
        self.systems.push(Box::new(system));
    }

    /// Initialize all registered systems.
    pub fn init(&mut self) -> SimResult<()> {
        if self.initialized {
            return Ok(());
        }
        for i in 0..self.systems.len() {
            let mut system = std::mem::replace(&mut self.systems[i], Box::new(NoopSystem));
            let mut ctx = SimContext {
                world: &mut self.world,
                clock: &self.clock,
                events: &mut self.events,
                rng: &mut self.rng,
            };
            let result = system.init(&mut ctx);
            self.systems[i] = system;
            result?;
        }
        self.initialized = true;
        Ok(())
    }

    /// Advance the simulation by one tick.
    pub fn tick(&mut self) -> SimResult<()> {
        if !self.initialized {
            self.init()?;
        }

        let tick = self.clock.advance();
        self.world.chunks.set_tick(tick);

        for i in 0..self.systems.len() {
            let mut system = std::mem::replace(&mut self.systems[i], Box::new(NoopSystem));
            let mut ctx = SimContext {
                world: &mut self.world,
                clock: &self.clock,
                events: &mut self.events,
                rng: &mut self.rng,
            };
            let result = system.tick(&mut ctx);
            self.systems[i] = system;
            result?;
        }

        self.world.chunks.evict();
        Ok(())
    }

    /// Advance the simulation by `n` ticks.
    pub fn run(&mut self, n: u64) -> SimResult<()> {
        for _ in 0..n {
            self.tick()?;
        }
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Population
    // -----------------------------------------------------------------------

    /// Place a new idle creature of `race` at `at`. Returns `None` if the
    /// tile cannot be walked onto.
    pub fn spawn_creature(&mut self, at: Position, race: Race) -> SimResult<Option<EntityId>> {
        if !self.world.can_entity_walk_to(None, at.x, at.y).ok {
            return Ok(None);
        }

        let id = self
            .world
            .entities
            .spawn(EntityKind::Creature, race.to_string());
        if let Some(entity) = self.world.entities.get_mut(id) {
            entity.components.race = Some(race);
            entity.components.appearance = Some(Appearance { glyph: race.glyph() });
            entity.components.ai = Some(AiState::default());
        }
        self.world.place_entity(id, at)?;

        debug!(entity = %id, %race, %at, "spawned creature");
        self.events.push(SimEvent::new(
            self.clock.tick(),
            SimEventKind::Spawned { entity: id, at },
            format!("{race} {id} appeared at {at}"),
        ));
        Ok(Some(id))
    }

    /// Spawn a creature on a random walkable tile, trying a handful of
    /// tiles before giving up. A random race is picked when `race` is
    /// `None`.
    pub fn spawn_random_creature(&mut self, race: Option<Race>) -> SimResult<Option<EntityId>> {
        let race = race.unwrap_or_else(|| Race::ALL[self.rng.random_range(0..Race::ALL.len())]);
        let bounds = self.world.chunks.bounds();
        if bounds.width == 0 || bounds.height == 0 {
            return Ok(None);
        }

        for _ in 0..SPAWN_ATTEMPTS {
            let x = self.rng.random_range(0..bounds.width) as i32;
            let y = self.rng.random_range(0..bounds.height) as i32;
            if let Some(id) = self.spawn_creature(Position::new(x, y), race)? {
                return Ok(Some(id));
            }
        }
        Ok(None)
    }

    /// Overwrite the world with a rooms-and-corridors map drawn from the
    /// simulation RNG.
    pub fn apply_layout(&mut self, layout: &DungeonLayout) -> Vec<Room> {
        layout.apply(&mut self.world.chunks, &mut self.rng)
    }

    // -----------------------------------------------------------------------
    // Viewport
    // -----------------------------------------------------------------------

    pub fn viewport(&self) -> &Viewport {
        &self.world.viewport
    }

    /// Center the viewport on `target`. Levels change on the next tick.
    pub fn center_viewport_on(&mut self, target: Position) {
        self.world.center_viewport_on(target);
    }

    /// Move the viewport by `(dx, dy)` tiles.
    pub fn pan_viewport(&mut self, dx: i32, dy: i32) {
        self.world.pan_viewport(dx, dy);
    }

    /// Reassign chunk levels right away instead of waiting for a tick.
    pub fn update_levels(&mut self) -> ChunkCoord {
        let viewport = self.world.viewport;
        update_simulation_levels(&mut self.world.chunks, &viewport)
    }

    // -----------------------------------------------------------------------
    // Accessors
    // -----------------------------------------------------------------------

    /// Entities, chunks and viewport.
    pub fn world(&self) -> &World {
        &self.world
    }

    /// Mutable access to the world, for hand-placed entities and edits.
    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    /// The tick counter.
    pub fn clock(&self) -> &SimClock {
        &self.clock
    }

    /// Events emitted so far, oldest first.
    pub fn events(&self) -> &EventLog {
        &self.events
    }

    /// Access a system by downcasting to a concrete type.
    pub fn get_system<T: System + 'static>(&self) -> Option<&T> {
        self.systems
            .iter()
            .find_map(|s| s.as_any().downcast_ref::<T>())
    }

    /// Access a system mutably by downcasting to a concrete type.
    pub fn get_system_mut<T: System + 'static>(&mut self) -> Option<&mut T> {
        self.systems
            .iter_mut()
            .find_map(|s| s.as_any_mut().downcast_mut::<T>())
    }

    pub fn current_tick(&self) -> u64 {
        self.clock.tick()
    }
}

/// Placeholder system used during the swap-and-tick pattern.
#[derive(Debug)]
struct NoopSystem;

impl System for NoopSystem {
    fn name(&self) -> &str {
        "noop"
    }
    fn tick(&mut self, _ctx: &mut SimContext<'_>) -> SimResult<()> {
        Ok(())
    }
    fn as_any(&self) -> &dyn std::any::Any {
        self
    }
    fn as_any_mut(&mut self) -> &mut dyn std::any::Any {
        self
    }
}
