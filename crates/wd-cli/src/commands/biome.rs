use colored::Colorize;
use comfy_table::{ContentArrangement, Table};
use wd_worldgen::{BiomeResolver, RangeBiomeResolver};

pub fn run(altitude: f64, moisture: f64, temperature: f64, all: bool) -> Result<(), String> {
    for (name, value) in [
        ("altitude", altitude),
        ("moisture", moisture),
        ("temperature", temperature),
    ] {
        if !(0.0..=1.0).contains(&value) {
            return Err(format!("{name} must lie in [0, 1], got {value}"));
        }
    }

    let resolver = RangeBiomeResolver::default();
    let biome = resolver.pick_biome(altitude, moisture, temperature);
    println!(
        "  {} {}",
        biome.name.bold(),
        format!("({})", biome.id).dimmed()
    );
    println!("  terrain: {}", biome.terrain);

    if all {
        let mut scored: Vec<_> = resolver
            .catalog()
            .biomes()
            .iter()
            .map(|b| (b, b.score(altitude, moisture, temperature)))
            .collect();
        scored.sort_by(|a, b| a.1.total_cmp(&b.1));

        let mut table = Table::new();
        table.set_content_arrangement(ContentArrangement::Dynamic);
        table.set_header(vec!["Biome", "Penalty", "Terrain"]);
        for (b, score) in scored {
            table.add_row(vec![
                b.id.to_string(),
                format!("{score:.3}"),
                b.terrain.to_string(),
            ]);
        }
        println!();
        println!("{table}");
    }
    Ok(())
}
