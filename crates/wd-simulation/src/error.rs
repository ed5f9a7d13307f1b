use wd_core::WdError;
use wd_worldgen::GenError;

/// Alias for `Result<T, SimError>`.
pub type SimResult<T> = Result<T, SimError>;

/// Errors surfaced by simulation construction and ticking.
///
/// Blocked moves are not errors; they are reported as events.
#[derive(Debug, thiserror::Error)]
pub enum SimError {
    /// The world generator rejected its configuration.
    #[error("world generation: {0}")]
    Generation(#[from] GenError),

    /// An entity-store operation failed.
    #[error(transparent)]
    Entity(#[from] WdError),
}
