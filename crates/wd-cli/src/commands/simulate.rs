use std::collections::BTreeMap;
use std::path::PathBuf;

use colored::Colorize;
use comfy_table::{ContentArrangement, Table};
use tracing::info;
use wd_core::{EntityKind, Position};
use wd_simulation::{DungeonLayout, SimConfig, SimEventKind, SimLevel, Simulation};
use wd_worldgen::{Seed, TerrainKind, UniformGenerator, WorldBounds};

pub struct SimulateArgs {
    pub ticks: u64,
    pub seed: Option<Seed>,
    pub creatures: usize,
    pub center: Option<(i32, i32)>,
    pub dungeon: bool,
    pub events: bool,
    pub map: bool,
    pub config: Option<PathBuf>,
}

pub fn run(args: SimulateArgs) -> Result<(), String> {
    let world = super::load_config(args.config.as_deref(), args.seed)?;
    let seed = world.seed;
    let config = SimConfig::default()
        .with_world(world.clone())
        .with_max_events(10_000);

    let mut sim = if args.dungeon {
        let generator = UniformGenerator::new(
            WorldBounds::new(world.world_width, world.world_height),
            world.chunk_size,
            TerrainKind::Wall,
        )
        .map_err(|e| e.to_string())?;
        let mut sim = Simulation::with_generator(generator, config);
        let rooms = sim.apply_layout(&DungeonLayout::default());
        println!("  Carved {} rooms", rooms.len());
        sim
    } else {
        Simulation::new(config).map_err(|e| format!("cannot build world: {e}"))?
    };

    let mut placed = 0;
    for _ in 0..args.creatures {
        if sim
            .spawn_random_creature(None)
            .map_err(|e| format!("spawn failed: {e}"))?
            .is_some()
        {
            placed += 1;
        }
    }

    let focus = match args.center {
        Some((x, y)) => Some(Position::new(x, y)),
        None => sim
            .world()
            .entities
            .entities_by_kind(EntityKind::Creature)
            .first()
            .and_then(|e| e.components.position),
    };
    if let Some(pos) = focus {
        sim.center_viewport_on(pos);
    }

    info!(
        ticks = args.ticks,
        creatures = placed,
        dungeon = args.dungeon,
        "running simulation"
    );
    sim.run(args.ticks)
        .map_err(|e| format!("simulation error: {e}"))?;
    info!(
        events = sim.events().len(),
        chunks = sim.world().chunks.cached_len(),
        "simulation finished"
    );

    // Header
    let vp = *sim.viewport();
    println!(
        "  {} {}",
        "Simulation".bold(),
        format!("({} ticks, seed={seed})", args.ticks).dimmed()
    );
    println!(
        "  {placed}/{} creatures placed, {} events logged, {} chunks cached",
        args.creatures,
        sim.events().len(),
        sim.world().chunks.cached_len()
    );
    println!(
        "  Viewport at ({}, {}), {}x{}",
        vp.x, vp.y, vp.width, vp.height
    );
    println!();

    if args.events {
        println!("  {}", "Event Log".bold().underline());
        println!();
        for event in sim.events().events() {
            let tick_label = format!("[tick {:>3}]", event.tick).dimmed();
            let desc = colorize_event(&event.kind, &event.description);
            println!("  {tick_label} {desc}");
        }
        if sim.events().is_empty() {
            println!("  {}", "(no events)".dimmed());
        }
        println!();
    }

    print_creatures(&sim);
    print_levels(&sim);

    if args.map {
        print_map(&mut sim);
    }
    Ok(())
}

fn print_creatures(sim: &Simulation) {
    let world = sim.world();
    let creatures = world.entities.entities_by_kind(EntityKind::Creature);
    if creatures.is_empty() {
        println!("  No creatures could be placed.");
        println!();
        return;
    }

    println!("  {}", "Creatures".bold().underline());
    println!();

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Id", "Race", "Position", "Chunk", "Level", "Steps"]);

    for entity in creatures {
        let race = entity
            .components
            .race
            .map(|r| r.to_string())
            .unwrap_or_else(|| "--".to_string());
        let position = entity
            .components
            .position
            .map(|p| p.to_string())
            .unwrap_or_else(|| "--".to_string());
        let chunk = world.chunks.chunk_of(entity.id);
        let level = chunk
            .and_then(|c| world.chunks.peek(c))
            .map(|c| c.level.to_string())
            .unwrap_or_else(|| "--".to_string());
        let steps = sim
            .events()
            .events_for_entity(entity.id)
            .iter()
            .filter(|e| matches!(e.kind, SimEventKind::Moved { .. }))
            .count();

        table.add_row(vec![
            entity.id.to_string(),
            race,
            position,
            chunk.map(|c| c.to_string()).unwrap_or_else(|| "--".into()),
            level,
            steps.to_string(),
        ]);
    }

    println!("{table}");
    println!();
}

fn print_levels(sim: &Simulation) {
    let chunks = &sim.world().chunks;
    let mut counts: BTreeMap<String, usize> = BTreeMap::new();
    for coord in chunks.cached_coords() {
        if let Some(chunk) = chunks.peek(coord) {
            *counts.entry(chunk.level.to_string()).or_default() += 1;
        }
    }

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Level", "Chunks"]);
    for level in [SimLevel::Full, SimLevel::Macro, SimLevel::Summary] {
        let name = level.to_string();
        let count = counts.get(&name).copied().unwrap_or(0);
        table.add_row(vec![name, count.to_string()]);
    }
    println!("{table}");
    println!();
}

fn print_map(sim: &mut Simulation) {
    let vp = *sim.viewport();
    let (min, max) = vp.bounds();
    let world = sim.world_mut();

    println!("  {}", "Viewport".bold().underline());
    println!();
    for y in min.y..=max.y {
        let mut line = String::new();
        for x in min.x..=max.x {
            let creature = world
                .entities_at(x, y)
                .into_iter()
                .find_map(|id| world.entities.get(id).and_then(|e| e.components.appearance));
            if let Some(appearance) = creature {
                line.push_str(&appearance.glyph.to_string().red().bold().to_string());
                continue;
            }
            let terrain = world.terrain_at(x, y).unwrap_or_default();
            let vegetation = world.vegetation_at(x, y);
            line.push_str(&super::tile_glyph(terrain, vegetation).to_string());
        }
        println!("  {line}");
    }
    println!();
}

fn colorize_event(kind: &SimEventKind, description: &str) -> colored::ColoredString {
    match kind {
        SimEventKind::Moved { .. } => description.normal(),
        SimEventKind::MoveBlocked { .. } => description.yellow(),
        SimEventKind::Spawned { .. } => description.green(),
        SimEventKind::Custom { .. } => description.cyan(),
    }
}
