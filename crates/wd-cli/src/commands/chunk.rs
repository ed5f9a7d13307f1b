use std::collections::BTreeMap;
use std::path::Path;

use colored::Colorize;
use comfy_table::{ContentArrangement, Table};
use tracing::debug;
use wd_worldgen::{ProceduralGenerator, Seed, WorldGenerator};

pub fn run(
    cx: i32,
    cy: i32,
    seed: Option<Seed>,
    terrain_only: bool,
    config: Option<&Path>,
) -> Result<(), String> {
    let config = super::load_config(config, seed)?;
    let generator = ProceduralGenerator::from_config(&config).map_err(|e| e.to_string())?;
    let chunk_seed = config.seed.chunk_seed(cx, cy);
    debug!(cx, cy, chunk_seed, "rendering chunk");
    let grids = generator.generate_chunk(cx, cy);
    let size = grids.size;

    println!(
        "  {} [{cx}, {cy}] {}",
        "Chunk".bold(),
        format!(
            "({size}x{size}, seed={}, chunk seed={chunk_seed}, origin=({}, {}))",
            config.seed,
            i64::from(cx) * i64::from(size),
            i64::from(cy) * i64::from(size)
        )
        .dimmed()
    );
    println!();

    let mut counts = BTreeMap::new();
    for ly in 0..size {
        let mut line = String::with_capacity(size as usize);
        for lx in 0..size {
            let Some(terrain) = grids.terrain(lx, ly) else {
                continue;
            };
            *counts.entry(terrain.as_str()).or_insert(0usize) += 1;
            let vegetation = if terrain_only {
                None
            } else {
                grids.vegetation(lx, ly)
            };
            line.push_str(&super::tile_glyph(terrain, vegetation).to_string());
        }
        println!("  {line}");
    }
    println!();

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Terrain", "Tiles"]);
    for (name, count) in counts {
        table.add_row(vec![name.to_string(), count.to_string()]);
    }
    println!("{table}");
    Ok(())
}
