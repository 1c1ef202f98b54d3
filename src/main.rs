use bevy::log::{Level, LogPlugin};
use bevy::prelude::*;
use clap::Parser;
use jewelbots::components::{GridPosition, Robot, Speed};
use jewelbots::config::{load_config, load_config_from, save_config};
use jewelbots::game_logic::spawning::spawn_fleet;
use jewelbots::resources::TickCounter;
use jewelbots::{install_simulation, JewelColor, JewelLedger, JewelbotsError, JewelbotsResult, WarehouseMap};
use std::path::PathBuf;

#[derive(Parser, Clone)]
#[command(name = "jewelbots")]
#[command(about = "Run the jewel collecting robot simulation headless")]
struct Args {
    /// Map file, either a path or a name inside the maps/ directory (.toml or bincode)
    #[arg(long)]
    map: Option<String>,

    /// Number of ticks to simulate
    #[arg(long, default_value = "500")]
    ticks: u64,

    /// Dispatch seed, overrides the config file
    #[arg(long)]
    seed: Option<u64>,

    /// Number of robots to spawn
    #[arg(long, default_value = "3")]
    robots: usize,

    /// Read settings from this file instead of the platform config directory
    #[arg(long)]
    config: Option<PathBuf>,

    /// Write the effective settings to the platform config directory
    #[arg(long)]
    save_config: bool,

    /// Log pathfinding and dispatch decisions
    #[arg(long)]
    verbose: bool,
}

fn main() -> JewelbotsResult<()> {
    let args = Args::parse();

    let mut app = App::new();
    app.add_plugins(LogPlugin {
        level: if args.verbose { Level::DEBUG } else { Level::INFO },
        ..default()
    });

    let mut config = match &args.config {
        Some(path) => load_config_from(path)?,
        None => load_config(),
    };
    if let Some(seed) = args.seed {
        config.seed = seed;
    }
    if args.save_config {
        let path = save_config(&config)?;
        info!("Wrote settings to {}", path.display());
    }

    let map_name = args
        .map
        .clone()
        .unwrap_or_else(|| config.settings.map_file_path.clone());
    let map = match WarehouseMap::load_from_file(&map_name) {
        Ok(map) => map,
        Err(JewelbotsError::MapFileNotFound { path }) => {
            warn!(
                "Map file {} not found, using the built-in demo warehouse",
                path.display()
            );
            WarehouseMap::demo()
        }
        Err(e) => return Err(e),
    };

    install_simulation(&mut app, &map, &config)?;
    let speed = Speed::new(config.settings.robot_speed.get());
    let robots = spawn_fleet(app.world_mut(), &map, args.robots, speed)?;

    info!(
        "Running '{}' for {} ticks with {} robots (seed {})",
        map.name,
        args.ticks,
        robots.len(),
        config.seed
    );

    for _ in 0..args.ticks {
        app.update();
    }

    log_summary(&mut app);
    Ok(())
}

fn log_summary(app: &mut App) {
    let world = app.world_mut();

    let tick = world.resource::<TickCounter>().tick;
    let ledger = world.resource::<JewelLedger>();
    let delivered: Vec<String> = JewelColor::ALL
        .iter()
        .map(|color| format!("{color}: {}", ledger.delivered(*color)))
        .collect();

    info!("Finished after {tick} ticks");
    info!(
        "Delivered {} jewels ({}), {} still on the floor",
        ledger.total_delivered(),
        delivered.join(", "),
        ledger.remaining_count()
    );

    let mut robots = world.query::<(&Robot, &GridPosition)>();
    let mut rows: Vec<_> = robots.iter(world).collect();
    rows.sort_by_key(|(robot, _)| robot.id);
    for (robot, grid_pos) in rows {
        match robot.carrying {
            Some(color) => info!("  {} at {} carrying {color}", robot.id, grid_pos.0),
            None => info!("  {} at {}", robot.id, grid_pos.0),
        }
    }
}
