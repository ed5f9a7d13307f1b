//! CLI frontend for the Wildwuchs world engine.

mod commands;

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};
use wd_worldgen::Seed;

#[derive(Parser)]
#[command(
    name = "wd",
    about = "Wildwuchs: an endless, chunked, procedurally grown world",
    version,
    propagate_version = true
)]
struct Cli {
    /// Log more (-v debug, -vv trace). RUST_LOG overrides.
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Populate a world with creatures and run it for a number of ticks
    Simulate {
        /// Number of ticks to run
        #[arg(short, long, default_value = "100")]
        ticks: u64,

        /// Seed: a number, or any phrase to hash
        #[arg(short, long)]
        seed: Option<Seed>,

        /// Number of creatures to spawn
        #[arg(short, long, default_value = "10")]
        creatures: usize,

        /// Center the viewport on this tile, as X,Y
        #[arg(long, value_parser = commands::parse_point, allow_hyphen_values = true)]
        center: Option<(i32, i32)>,

        /// Replace the terrain with a rooms-and-corridors layout
        #[arg(long)]
        dungeon: bool,

        /// List every event
        #[arg(short, long)]
        events: bool,

        /// Draw the viewport after the run
        #[arg(short, long)]
        map: bool,

        /// World generation config (JSON)
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Render one chunk as ASCII
    #[command(allow_negative_numbers = true)]
    Chunk {
        /// Chunk column
        cx: i32,

        /// Chunk row
        cy: i32,

        /// Seed: a number, or any phrase to hash
        #[arg(short, long)]
        seed: Option<Seed>,

        /// Draw terrain only, without vegetation
        #[arg(long)]
        terrain_only: bool,

        /// World generation config (JSON)
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Show every generated layer at one tile
    #[command(allow_negative_numbers = true)]
    Inspect {
        /// Tile column
        x: i32,

        /// Tile row
        y: i32,

        /// Seed: a number, or any phrase to hash
        #[arg(short, long)]
        seed: Option<Seed>,

        /// Print as JSON
        #[arg(long)]
        json: bool,

        /// World generation config (JSON)
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Resolve a climate triple to a biome
    Biome {
        /// Altitude in [0, 1]
        altitude: f64,

        /// Moisture in [0, 1]
        moisture: f64,

        /// Temperature in [0, 1]
        temperature: f64,

        /// Also list the score of every biome
        #[arg(long)]
        all: bool,
    },

    /// Print the world generation config as JSON
    Config {
        /// Seed: a number, or any phrase to hash
        #[arg(short, long)]
        seed: Option<Seed>,

        /// Start from this file instead of the defaults
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).compact())
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Simulate {
            ticks,
            seed,
            creatures,
            center,
            dungeon,
            events,
            map,
            config,
        } => commands::simulate::run(commands::simulate::SimulateArgs {
            ticks,
            seed,
            creatures,
            center,
            dungeon,
            events,
            map,
            config,
        }),
        Commands::Chunk {
            cx,
            cy,
            seed,
            terrain_only,
            config,
        } => commands::chunk::run(cx, cy, seed, terrain_only, config.as_deref()),
        Commands::Inspect {
            x,
            y,
            seed,
            json,
            config,
        } => commands::inspect::run(x, y, seed, json, config.as_deref()),
        Commands::Biome {
            altitude,
            moisture,
            temperature,
            all,
        } => commands::biome::run(altitude, moisture, temperature, all),
        Commands::Config { seed, config } => commands::config::run(seed, config.as_deref()),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        process::exit(1);
    }
}
