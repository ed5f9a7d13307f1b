use crate::entity::EntityId;
use crate::geometry::Position;

/// Alias for `Result<T, WdError>`.
pub type WdResult<T> = Result<T, WdError>;

/// Errors that can occur when manipulating the entity store.
#[derive(Debug, thiserror::Error)]
pub enum WdError {
    /// The requested entity ID does not exist.
    #[error("entity not found: {0}")]
    EntityNotFound(EntityId),

    /// An entity with the same ID is already stored.
    #[error("entity already exists: {0}")]
    DuplicateEntity(EntityId),

    /// The operation needs the entity to have a position.
    #[error("entity {0} has no position")]
    MissingPosition(EntityId),

    /// The entity cannot stand on a tile outside the world.
    #[error("entity {0} cannot be placed at {1}: outside the world")]
    OutOfBounds(EntityId, Position),
}
