pub mod biome;
pub mod chunk;
pub mod config;
pub mod inspect;
pub mod simulate;

use std::fs;
use std::path::Path;

use colored::{ColoredString, Colorize};
use tracing::debug;
use wd_worldgen::{Seed, TerrainKind, VegetationTile, WorldGenConfig};

/// Read a world config from `path` (or take the defaults), then apply the
/// seed override.
fn load_config(path: Option<&Path>, seed: Option<Seed>) -> Result<WorldGenConfig, String> {
    let mut config = match path {
        Some(path) => {
            let text = fs::read_to_string(path)
                .map_err(|e| format!("cannot read {}: {e}", path.display()))?;
            serde_json::from_str(&text)
                .map_err(|e| format!("invalid config {}: {e}", path.display()))?
        }
        None => WorldGenConfig::default(),
    };
    if let Some(seed) = seed {
        config.seed = seed;
    }
    config.validate().map_err(|e| e.to_string())?;
    debug!(
        seed = %config.seed,
        width = config.world_width,
        height = config.world_height,
        chunk_size = config.chunk_size,
        from_file = path.is_some(),
        "loaded world config"
    );
    Ok(config)
}

/// Parse `X,Y` into a tile coordinate.
pub fn parse_point(s: &str) -> Result<(i32, i32), String> {
    let (x, y) = s
        .split_once(',')
        .ok_or_else(|| format!("expected X,Y but got '{s}'"))?;
    let x = x.trim().parse().map_err(|e| format!("bad X '{x}': {e}"))?;
    let y = y.trim().parse().map_err(|e| format!("bad Y '{y}': {e}"))?;
    Ok((x, y))
}

/// The glyph drawn for a tile: vegetation over terrain.
fn tile_glyph(terrain: TerrainKind, vegetation: Option<VegetationTile>) -> ColoredString {
    if let Some(glyph) = vegetation.and_then(|v| v.kind.glyph()) {
        return glyph.to_string().green();
    }
    let glyph = terrain.glyph().to_string();
    match terrain {
        TerrainKind::Water | TerrainKind::ShallowWater => glyph.blue(),
        TerrainKind::Sand => glyph.yellow(),
        TerrainKind::Swamp => glyph.cyan(),
        TerrainKind::Rock | TerrainKind::Wall => glyph.dimmed(),
        TerrainKind::Snow => glyph.white().bold(),
        _ => glyph.normal(),
    }
}
