use rand::Rng;
use rand::rngs::StdRng;

use crate::clock::SimClock;
use crate::event::{EventLog, SimEvent, SimEventKind};
use crate::world::World;

/// Mutable context passed to each system during a tick.
pub struct SimContext<'a> {
    pub world: &'a mut World,
    pub clock: &'a SimClock,
    pub events: &'a mut EventLog,
    /// The single stream every stochastic decision draws from.
    pub rng: &'a mut StdRng,
}

impl SimContext<'_> {
    /// Emit a simulation event at the current tick.
    pub fn emit(&mut self, kind: SimEventKind, description: impl Into<String>) {
        self.events
            .push(SimEvent::new(self.clock.tick(), kind, description));
    }

    pub fn tick(&self) -> u64 {
        self.clock.tick()
    }

    /// Draw once from the run's RNG; true with probability `chance`.
    pub fn roll(&mut self, chance: f64) -> bool {
        self.rng.random::<f64>() < chance
    }
}
