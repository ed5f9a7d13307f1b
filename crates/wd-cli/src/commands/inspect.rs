use std::path::Path;

use colored::Colorize;
use comfy_table::{ContentArrangement, Table};
use wd_worldgen::{ProceduralGenerator, Seed, WorldBounds};

pub fn run(
    x: i32,
    y: i32,
    seed: Option<Seed>,
    json: bool,
    config: Option<&Path>,
) -> Result<(), String> {
    let config = super::load_config(config, seed)?;
    let bounds = WorldBounds::new(config.world_width, config.world_height);
    if !bounds.contains(x, y) {
        return Err(format!(
            "({x}, {y}) is outside the {}x{} world",
            bounds.width, bounds.height
        ));
    }

    let generator = ProceduralGenerator::from_config(&config).map_err(|e| e.to_string())?;
    let cell = generator.sample_cell(x, y);

    if json {
        let text = serde_json::to_string_pretty(&cell).map_err(|e| e.to_string())?;
        println!("{text}");
        return Ok(());
    }

    println!(
        "  {} ({x}, {y}) {}",
        "Tile".bold(),
        format!("(seed={})", config.seed).dimmed()
    );
    println!();

    let walkable = cell.terrain.is_walkable() && !cell.vegetation.is_solid();
    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Layer", "Value"]);
    table.add_row(vec!["altitude".to_string(), format!("{:.3}", cell.altitude)]);
    table.add_row(vec!["moisture".to_string(), format!("{:.3}", cell.moisture)]);
    table.add_row(vec![
        "temperature".to_string(),
        format!("{:.3}", cell.temperature),
    ]);
    table.add_row(vec!["biome".to_string(), cell.biome.to_string()]);
    table.add_row(vec!["terrain".to_string(), cell.terrain.to_string()]);
    table.add_row(vec![
        "vegetation".to_string(),
        format!(
            "{} (density {:.2}, height {:.2})",
            cell.vegetation.kind, cell.vegetation.density, cell.vegetation.height
        ),
    ]);
    table.add_row(vec!["walkable".to_string(), walkable.to_string()]);
    table.add_row(vec![
        "opaque".to_string(),
        cell.vegetation.is_opaque().to_string(),
    ]);
    println!("{table}");
    Ok(())
}
