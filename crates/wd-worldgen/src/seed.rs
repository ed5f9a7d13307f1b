use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

const FNV_OFFSET_BASIS: u32 = 2_166_136_261;
const FNV_PRIME: u32 = 16_777_619;

/// 32-bit FNV-1a hash.
pub fn fnv1a(bytes: &[u8]) -> u32 {
    bytes.iter().fold(FNV_OFFSET_BASIS, |h, b| {
        (h ^ u32::from(*b)).wrapping_mul(FNV_PRIME)
    })
}

/// Root of all determinism. Every noise field, painter, and simulation
/// random stream derives its own sub-seed from this value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Seed(pub u32);

impl Seed {
    /// Hash an arbitrary phrase into a seed.
    pub fn from_phrase(phrase: &str) -> Self {
        Self(fnv1a(phrase.as_bytes()))
    }

    /// Sub-seed for one named consumer, e.g. `"moisture"`.
    ///
    /// Hashes `"<seed>|<label>"`, so different labels give decorrelated
    /// streams from the same root seed.
    pub fn derive(self, label: &str) -> u32 {
        fnv1a(format!("{}|{label}", self.0).as_bytes())
    }

    /// Deterministic per-chunk seed.
    pub fn chunk_seed(self, cx: i32, cy: i32) -> u32 {
        let mut h = fnv1a(self.0.to_string().as_bytes());
        h = (h ^ cx as u32).wrapping_mul(FNV_PRIME);
        h = (h ^ cy as u32).wrapping_mul(FNV_PRIME);
        h
    }
}

impl Default for Seed {
    fn default() -> Self {
        Self(123)
    }
}

impl fmt::Display for Seed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Seed {
    type Err = std::convert::Infallible;

    /// Numeric strings are used verbatim; anything else is hashed.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(s.trim()
            .parse::<u32>()
            .map(Self)
            .unwrap_or_else(|_| Self::from_phrase(s)))
    }
}
