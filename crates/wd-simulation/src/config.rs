use serde::{Deserialize, Serialize};
use wd_worldgen::{Seed, WorldGenConfig};

/// When cached chunks may be dropped.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "policy")]
pub enum EvictionPolicy {
    /// Keep every chunk for the lifetime of the simulation.
    #[default]
    Never,
    /// Once more than `max_chunks` are cached, drop the least recently
    /// accessed summary chunks that hold no entities and no manual edits.
    LeastRecentlyUsed {
        /// Soft cap on cached chunks.
        max_chunks: usize,
    },
}

/// Configuration for a simulation run.
#[derive(Debug, Clone)]
pub struct SimConfig {
    /// World generation parameters, including the root seed.
    pub world: WorldGenConfig,
    /// Maximum event log size (oldest events dropped when exceeded). 0 = unlimited.
    pub max_events: usize,
    /// Chance that a creature in a macro chunk stays put on a tick.
    pub macro_idle_chance: f64,
    /// Chance that a creature in a summary chunk stays put on a tick.
    pub summary_idle_chance: f64,
    /// Chunk cache policy.
    pub eviction: EvictionPolicy,
    /// Viewport width in tiles, clamped to the world.
    pub viewport_width: u32,
    /// Viewport height in tiles, clamped to the world.
    pub viewport_height: u32,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            world: WorldGenConfig::default(),
            max_events: 0,
            macro_idle_chance: 0.7,
            summary_idle_chance: 0.95,
            eviction: EvictionPolicy::Never,
            viewport_width: 25,
            viewport_height: 25,
        }
    }
}

impl SimConfig {
    /// Set the root seed for world generation and all simulation randomness.
    pub fn with_seed(mut self, seed: Seed) -> Self {
        self.world.seed = seed;
        self
    }

    /// Replace the world generation parameters.
    pub fn with_world(mut self, world: WorldGenConfig) -> Self {
        self.world = world;
        self
    }

    /// Set the maximum event log size (0 = unlimited).
    pub fn with_max_events(mut self, max: usize) -> Self {
        self.max_events = max;
        self
    }

    /// Set the per-tick idle chances for macro and summary chunks.
    pub fn with_idle_chances(mut self, macro_idle: f64, summary_idle: f64) -> Self {
        self.macro_idle_chance = macro_idle;
        self.summary_idle_chance = summary_idle;
        self
    }

    /// Set the chunk cache policy.
    pub fn with_eviction(mut self, eviction: EvictionPolicy) -> Self {
        self.eviction = eviction;
        self
    }

    /// Set the viewport size.
    pub fn with_viewport_size(mut self, width: u32, height: u32) -> Self {
        self.viewport_width = width;
        self.viewport_height = height;
        self
    }
}
