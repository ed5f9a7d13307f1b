use std::collections::VecDeque;

use wd_core::{EntityId, Position};

use crate::occupancy::BlockReason;

/// What kind of simulation event occurred.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SimEventKind {
    // Movement
    /// An entity stepped onto a new tile.
    Moved {
        /// The entity that moved.
        entity: EntityId,
        /// The tile it left.
        from: Position,
        /// The tile it now stands on.
        to: Position,
    },
    /// An entity tried to step and could not.
    MoveBlocked {
        /// The entity that stayed put.
        entity: EntityId,
        /// Its current tile.
        from: Position,
        /// The tile it tried to enter.
        to: Position,
        /// The first reason the move was refused.
        reason: BlockReason,
    },

    // Lifecycle
    /// An entity was placed in the world.
    Spawned {
        /// The new entity.
        entity: EntityId,
        /// Where it appeared.
        at: Position,
    },

    // Custom
    /// A user-defined event.
    Custom {
        /// A label identifying the custom event type.
        label: String,
        /// The entities involved in this custom event.
        entities: Vec<EntityId>,
    },
}

impl SimEventKind {
    /// Check whether a given entity is involved in this event.
    pub fn involves(&self, id: EntityId) -> bool {
        match self {
            Self::Moved { entity, .. }
            | Self::MoveBlocked { entity, .. }
            | Self::Spawned { entity, .. } => *entity == id,
            Self::Custom { entities, .. } => entities.contains(&id),
        }
    }
}

/// One entry in the event log.
#[derive(Debug, Clone)]
pub struct SimEvent {
    /// Tick on which the event was emitted. Spawns before the first tick
    /// are stamped 0.
    pub tick: u64,
    pub kind: SimEventKind,
    /// One-line rendering for logs and the CLI.
    pub description: String,
}

impl SimEvent {
    pub fn new(tick: u64, kind: SimEventKind, description: impl Into<String>) -> Self {
        Self {
            tick,
            kind,
            description: description.into(),
        }
    }
}

/// Bounded, append-only record of simulation events, oldest first.
#[derive(Debug, Default)]
pub struct EventLog {
    events: VecDeque<SimEvent>,
    /// 0 keeps everything.
    capacity: usize,
}

impl EventLog {
    /// A log that keeps at most `capacity` events (0 = unbounded).
    pub fn new(capacity: usize) -> Self {
        Self {
            events: VecDeque::new(),
            capacity,
        }
    }

    /// Append `event`, discarding the oldest entry once full.
    pub fn push(&mut self, event: SimEvent) {
        if self.capacity > 0 && self.events.len() == self.capacity {
            self.events.pop_front();
        }
        self.events.push_back(event);
    }

    /// Every retained event, oldest first.
    pub fn events(&self) -> &VecDeque<SimEvent> {
        &self.events
    }

    pub fn last(&self) -> Option<&SimEvent> {
        self.events.back()
    }

    pub fn events_at_tick(&self, tick: u64) -> Vec<&SimEvent> {
        self.events.iter().filter(|e| e.tick == tick).collect()
    }

    pub fn events_for_entity(&self, id: EntityId) -> Vec<&SimEvent> {
        self.events.iter().filter(|e| e.kind.involves(id)).collect()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }
}
