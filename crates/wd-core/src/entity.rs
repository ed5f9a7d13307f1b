use std::fmt;

use serde::{Deserialize, Serialize};

use crate::component::ComponentSet;

/// Identifier for every entity in the world.
///
/// Ids are handed out sequentially by the [`EntityStore`](crate::store::EntityStore),
/// so ordering by id is the same as ordering by spawn time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EntityId(pub u64);

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// The kind of an entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    /// A living, moving creature.
    Creature,
    /// A static construction that occupies its tile.
    Structure,
    /// The remains of a creature.
    Corpse,
    /// A loose object lying on a tile.
    Item,
    /// A transient visual or magical effect.
    Effect,
}

impl EntityKind {
    /// Whether entities of this kind are moved by the movement systems.
    pub fn is_movable(self) -> bool {
        matches!(self, Self::Creature)
    }

    /// Whether entities of this kind prevent others from entering their tile.
    pub fn is_blocking(self) -> bool {
        matches!(self, Self::Creature | Self::Structure)
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Creature => write!(f, "creature"),
            Self::Structure => write!(f, "structure"),
            Self::Corpse => write!(f, "corpse"),
            Self::Item => write!(f, "item"),
            Self::Effect => write!(f, "effect"),
        }
    }
}

/// Core entity struct. Every world object is an Entity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Entity {
    /// Unique identifier for this entity.
    pub id: EntityId,
    /// The kind (type) of this entity.
    pub kind: EntityKind,
    /// Display name of the entity.
    pub name: String,
    /// Typed component data attached to this entity.
    pub components: ComponentSet,
}

impl Entity {
    /// Create an entity with a pre-assigned ID and no components.
    pub fn with_id(id: EntityId, kind: EntityKind, name: impl Into<String>) -> Self {
        Self {
            id,
            kind,
            name: name.into(),
            components: ComponentSet::default(),
        }
    }
}
