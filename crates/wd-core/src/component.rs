use std::fmt;

use serde::{Deserialize, Serialize};

use crate::entity::EntityId;
use crate::geometry::Position;

/// The set of typed components attached to an entity.
/// Entities can hold any combination.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ComponentSet {
    /// Where the entity stands. Entities without a position are off-map.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<Position>,
    /// Decision state written by the AI collaborator.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ai: Option<AiState>,
    /// Creature race, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub race: Option<Race>,
    /// How the entity is drawn.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub appearance: Option<Appearance>,
}

// ---------------------------------------------------------------------------
// AI
// ---------------------------------------------------------------------------

/// High-level behaviour mode chosen by the AI collaborator.
///
/// Typical lifecycle: `Idle -> Chase/Flee -> Engaged -> Idle`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AiMode {
    /// Wandering with no target.
    #[default]
    Idle,
    /// Closing in on the target.
    Chase,
    /// Running away from the target.
    Flee,
    /// Locked in melee; held in place.
    Engaged,
}

impl fmt::Display for AiMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => write!(f, "idle"),
            Self::Chase => write!(f, "chase"),
            Self::Flee => write!(f, "flee"),
            Self::Engaged => write!(f, "engaged"),
        }
    }
}

/// AI mode plus the entity it is directed at.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AiState {
    /// Current behaviour mode.
    pub mode: AiMode,
    /// The chased entity or the threat being fled from.
    pub target: Option<EntityId>,
}

impl AiState {
    /// An AI state with the given mode directed at `target`.
    pub fn targeting(mode: AiMode, target: EntityId) -> Self {
        Self {
            mode,
            target: Some(target),
        }
    }
}

// ---------------------------------------------------------------------------
// Race & appearance
// ---------------------------------------------------------------------------

/// Playable creature races.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Race {
    /// Humans.
    Human,
    /// Dwarves.
    Dwarf,
    /// Orcs.
    Orc,
}

impl Race {
    /// Every race, in spawn-table order.
    pub const ALL: [Race; 3] = [Race::Human, Race::Dwarf, Race::Orc];

    /// Single-character glyph used by the ASCII renderer.
    pub fn glyph(self) -> char {
        match self {
            Self::Human => 'h',
            Self::Dwarf => 'd',
            Self::Orc => 'o',
        }
    }
}

impl fmt::Display for Race {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Human => write!(f, "human"),
            Self::Dwarf => write!(f, "dwarf"),
            Self::Orc => write!(f, "orc"),
        }
    }
}

/// Visual representation of an entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Appearance {
    /// Glyph drawn on the entity's tile.
    pub glyph: char,
}
