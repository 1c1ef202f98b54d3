use clap::Parser;
use jewelbots::game_logic::errors::JewelbotsResult;
use jewelbots::map::WarehouseMap;
use jewelbots::CellType;

mod mapgen {
    pub mod cli_utils;
    pub mod layout;
}

use mapgen::cli_utils::*;
use mapgen::layout::{LayoutConfig, WarehouseGenerator};

#[derive(Parser, Clone)]
#[command(name = "mapgen")]
#[command(about = "Generate warehouse map files for jewelbots")]
struct Args {
    /// Map name
    #[arg(long, default_value = "generated_warehouse")]
    name: String,

    /// Warehouse size in grid cells, walls included (format: WIDTHxHEIGHT)
    #[arg(long, default_value = "24x16")]
    size: String,

    /// Output file relative to the maps/ directory. A .toml extension writes
    /// a hand-editable map, anything else writes bincode.
    #[arg(long)]
    output: Option<String>,

    /// World-space corner of cell (0, 0) (format: X,Y,Z)
    #[arg(long, default_value = "0.0,0.0,0.0")]
    origin: String,

    /// World units per grid cell
    #[arg(long, default_value = "1.0")]
    cell_size: f32,

    /// Random seed for reproducible generation
    #[arg(long, default_value = "0")]
    seed: u64,

    /// Fraction of rack slots that get a shelf (0.0-1.0)
    #[arg(long, default_value = "0.8")]
    shelves: f32,

    /// Number of jewels to scatter
    #[arg(long, default_value = "10")]
    jewels: usize,

    /// Number of delivery zone cells
    #[arg(long, default_value = "3")]
    zones: usize,

    /// Number of robot spawn cells
    #[arg(long, default_value = "4")]
    robots: usize,
}

fn layout_config(args: &Args) -> JewelbotsResult<LayoutConfig> {
    let (width, height) = parse_size(&args.size)?;

    Ok(LayoutConfig {
        name: args.name.clone(),
        width,
        height,
        seed: args.seed,
        cell_size: args.cell_size,
        origin: parse_origin(&args.origin)?,
        shelf_density: validate_density(args.shelves),
        jewels: args.jewels,
        zones: args.zones,
        robots: args.robots,
    })
}

fn main() -> JewelbotsResult<()> {
    let args = Args::parse();

    let output_filename = args
        .output
        .clone()
        .unwrap_or_else(|| format!("{}.bin", args.name));
    validate_output_path(&output_filename)?;

    let map = WarehouseGenerator::generate(&layout_config(&args)?)?;
    let full_path = map.save_to_file(&output_filename)?;

    print_map_summary(&map, &full_path);
    Ok(())
}

fn print_map_summary(map: &WarehouseMap, full_path: &std::path::Path) {
    println!("Map saved successfully to: {}", full_path.display());
    println!("\nMap summary:");
    println!("  Name: {}", map.name);
    println!(
        "  Size: {}x{} cells at {} world units per cell",
        map.width(),
        map.height(),
        map.cell_size
    );
    println!("  Jewels: {}", map.jewels.len());
    println!("  Robot spawns: {}", map.robot_spawns().len());

    if let Ok(grid) = map.build_grid() {
        println!(
            "  Shelves: {}, zones: {}",
            grid.count_cells(CellType::Shelf),
            grid.count_cells(CellType::Zone)
        );
    }

    println!();
    for row in &map.rows {
        println!("  {row}");
    }
}
