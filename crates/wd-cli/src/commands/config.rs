use std::path::Path;

use wd_worldgen::Seed;

pub fn run(seed: Option<Seed>, path: Option<&Path>) -> Result<(), String> {
    let config = super::load_config(path, seed)?;
    let json = serde_json::to_string_pretty(&config).map_err(|e| e.to_string())?;
    println!("{json}");
    Ok(())
}
