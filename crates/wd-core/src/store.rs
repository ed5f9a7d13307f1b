use std::collections::{BTreeMap, HashMap};

use crate::component::AiState;
use crate::entity::{Entity, EntityId, EntityKind};
use crate::error::{WdError, WdResult};
use crate::geometry::Position;

/// Owns every entity and its components.
///
/// Entities are kept in id order so that systems iterating the store visit
/// them in the same order on every run.
#[derive(Debug, Clone, Default)]
pub struct EntityStore {
    entities: BTreeMap<EntityId, Entity>,
    next_id: u64,

    // Indexes
    by_kind: HashMap<EntityKind, Vec<EntityId>>,
}

impl EntityStore {
    /// Create an empty store. The first spawned entity gets id `#1`.
    pub fn new() -> Self {
        Self {
            entities: BTreeMap::new(),
            next_id: 1,
            by_kind: HashMap::new(),
        }
    }

    // -----------------------------------------------------------------------
    // Entity CRUD
    // -----------------------------------------------------------------------

    /// Allocate a fresh id and store a component-less entity under it.
    pub fn spawn(&mut self, kind: EntityKind, name: impl Into<String>) -> EntityId {
        let id = self.allocate_id();
        let entity = Entity::with_id(id, kind, name);
        self.index(&entity);
        self.entities.insert(id, entity);
        id
    }

    /// Add a pre-built entity. Fails if its id is already taken.
    pub fn insert(&mut self, entity: Entity) -> WdResult<EntityId> {
        let id = entity.id;
        if self.entities.contains_key(&id) {
            return Err(WdError::DuplicateEntity(id));
        }
        self.next_id = self.next_id.max(id.0 + 1);
        self.index(&entity);
        self.entities.insert(id, entity);
        Ok(id)
    }

    /// Get a reference to an entity by ID.
    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        self.entities.get(&id)
    }

    /// Get a mutable reference to an entity by ID.
    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.entities.get_mut(&id)
    }

    /// Remove an entity, returning it.
    pub fn remove(&mut self, id: EntityId) -> WdResult<Entity> {
        let entity = self
            .entities
            .remove(&id)
            .ok_or(WdError::EntityNotFound(id))?;
        if let Some(ids) = self.by_kind.get_mut(&entity.kind) {
            ids.retain(|eid| *eid != id);
        }
        Ok(entity)
    }

    fn allocate_id(&mut self) -> EntityId {
        let id = EntityId(self.next_id.max(1));
        self.next_id = id.0 + 1;
        id
    }

    fn index(&mut self, entity: &Entity) {
        self.by_kind.entry(entity.kind).or_default().push(entity.id);
    }

    // -----------------------------------------------------------------------
    // Component access
    // -----------------------------------------------------------------------

    /// The kind of an entity, if it exists.
    pub fn kind(&self, id: EntityId) -> Option<EntityKind> {
        self.entities.get(&id).map(|e| e.kind)
    }

    /// The current position of an entity, if it exists and is on the map.
    pub fn position(&self, id: EntityId) -> Option<Position> {
        self.entities.get(&id).and_then(|e| e.components.position)
    }

    /// Overwrite an entity's position.
    pub fn set_position(&mut self, id: EntityId, position: Position) -> WdResult<()> {
        let entity = self
            .entities
            .get_mut(&id)
            .ok_or(WdError::EntityNotFound(id))?;
        entity.components.position = Some(position);
        Ok(())
    }

    /// The AI state of an entity, if any.
    pub fn ai(&self, id: EntityId) -> Option<AiState> {
        self.entities.get(&id).and_then(|e| e.components.ai)
    }

    /// Replace an entity's AI state.
    pub fn set_ai(&mut self, id: EntityId, ai: AiState) -> WdResult<()> {
        let entity = self
            .entities
            .get_mut(&id)
            .ok_or(WdError::EntityNotFound(id))?;
        entity.components.ai = Some(ai);
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------------

    /// Ids of all entities that currently have a position, in id order.
    pub fn positioned_ids(&self) -> Vec<EntityId> {
        self.entities
            .values()
            .filter(|e| e.components.position.is_some())
            .map(|e| e.id)
            .collect()
    }

    /// Get all entities of a specific kind.
    pub fn entities_by_kind(&self, kind: EntityKind) -> Vec<&Entity> {
        self.by_kind
            .get(&kind)
            .map(|ids| ids.iter().filter_map(|id| self.entities.get(id)).collect())
            .unwrap_or_default()
    }

    /// Iterate all entities in id order.
    pub fn iter(&self) -> impl Iterator<Item = &Entity> {
        self.entities.values()
    }

    /// Number of stored entities.
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    /// Whether the store holds no entities.
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::component::AiMode;

    #[test]
    fn spawn_assigns_sequential_ids() {
        let mut store = EntityStore::new();
        let a = store.spawn(EntityKind::Creature, "a");
        let b = store.spawn(EntityKind::Structure, "b");
        assert_eq!(a, EntityId(1));
        assert_eq!(b, EntityId(2));
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn insert_rejects_duplicate_ids() {
        let mut store = EntityStore::new();
        store
            .insert(Entity::with_id(EntityId(5), EntityKind::Item, "coin"))
            .unwrap();
        let result = store.insert(Entity::with_id(EntityId(5), EntityKind::Item, "gem"));
        assert!(matches!(result, Err(WdError::DuplicateEntity(EntityId(5)))));
    }

    #[test]
    fn insert_bumps_next_id_past_explicit_ids() {
        let mut store = EntityStore::new();
        store
            .insert(Entity::with_id(EntityId(10), EntityKind::Item, "coin"))
            .unwrap();
        assert_eq!(store.spawn(EntityKind::Creature, "grusk"), EntityId(11));
    }

    #[test]
    fn positions_round_trip() {
        let mut store = EntityStore::new();
        let id = store.spawn(EntityKind::Creature, "grusk");
        assert!(store.position(id).is_none());
        store.set_position(id, Position::new(3, 4)).unwrap();
        assert_eq!(store.position(id), Some(Position::new(3, 4)));
    }

    #[test]
    fn set_position_on_missing_entity_fails() {
        let mut store = EntityStore::new();
        let result = store.set_position(EntityId(99), Position::new(0, 0));
        assert!(matches!(result, Err(WdError::EntityNotFound(_))));
    }

    #[test]
    fn positioned_ids_skip_off_map_entities_in_id_order() {
        let mut store = EntityStore::new();
        let a = store.spawn(EntityKind::Creature, "a");
        let _off_map = store.spawn(EntityKind::Item, "b");
        let c = store.spawn(EntityKind::Creature, "c");
        store.set_position(c, Position::new(1, 1)).unwrap();
        store.set_position(a, Position::new(0, 0)).unwrap();
        assert_eq!(store.positioned_ids(), vec![a, c]);
    }

    #[test]
    fn remove_updates_kind_index() {
        let mut store = EntityStore::new();
        let a = store.spawn(EntityKind::Creature, "a");
        store.spawn(EntityKind::Creature, "b");
        store.remove(a).unwrap();
        assert_eq!(store.entities_by_kind(EntityKind::Creature).len(), 1);
        assert!(store.get(a).is_none());
        assert!(store.remove(a).is_err());
    }

    #[test]
    fn ai_state_round_trips() {
        let mut store = EntityStore::new();
        let hunter = store.spawn(EntityKind::Creature, "hunter");
        let prey = store.spawn(EntityKind::Creature, "prey");
        store
            .set_ai(hunter, AiState::targeting(AiMode::Chase, prey))
            .unwrap();
        let ai = store.ai(hunter).unwrap();
        assert_eq!(ai.mode, AiMode::Chase);
        assert_eq!(ai.target, Some(prey));
        assert!(store.ai(prey).is_none());
    }
}
