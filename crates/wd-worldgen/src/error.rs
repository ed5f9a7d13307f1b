/// Alias for `Result<T, GenError>`.
pub type GenResult<T> = Result<T, GenError>;

/// Generator misconfiguration detected at construction time.
///
/// None of these can happen once a generator has been built: sampling and
/// chunk generation are infallible.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GenError {
    /// A noise scale was zero, negative, or not a number.
    #[error("{field} scale must be greater than 0 (got {value})")]
    InvalidScale {
        /// Which configuration block the scale belongs to.
        field: &'static str,
        /// The rejected value.
        value: f64,
    },

    /// A fractal noise was configured with no octaves.
    #[error("{field} noise needs at least one octave")]
    InvalidOctaves {
        /// Which configuration block the octave count belongs to.
        field: &'static str,
    },

    /// The world has no area.
    #[error("world size must be positive (got {width}x{height})")]
    InvalidWorldSize {
        /// Configured width in tiles.
        width: u32,
        /// Configured height in tiles.
        height: u32,
    },

    /// Chunks must hold at least one tile.
    #[error("chunk size must be greater than 0")]
    InvalidChunkSize,

    /// The biome catalog has no entries to choose from.
    #[error("biome catalog is empty")]
    EmptyCatalog,
}
