use jewelbots::game_logic::errors::{JewelbotsError, JewelbotsResult};
use jewelbots::map::{JewelPlacement, WarehouseMap};
use jewelbots::{CellType, JewelColor};
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg64;

pub struct LayoutConfig {
    pub name: String,
    pub width: u32,
    pub height: u32,
    pub seed: u64,
    pub cell_size: f32,
    pub origin: [f32; 3],
    pub shelf_density: f32,
    pub jewels: usize,
    pub zones: usize,
    pub robots: usize,
}

/// Generates walled warehouses with shelf racks.
///
/// Racks run along every third column and are cut by a cross aisle every
/// fourth row. A one-cell aisle runs inside the outer wall, so every floor
/// cell stays reachable no matter which rack cells are left out.
pub struct WarehouseGenerator;

impl WarehouseGenerator {
    pub fn generate(config: &LayoutConfig) -> JewelbotsResult<WarehouseMap> {
        let (width, height) = (config.width as usize, config.height as usize);
        let mut rng = Pcg64::seed_from_u64(config.seed);

        // cells[y][x], y = 0 is the bottom row
        let mut cells = vec![vec![CellType::Empty; width]; height];
        for (y, row) in cells.iter_mut().enumerate() {
            for (x, cell) in row.iter_mut().enumerate() {
                if x == 0 || y == 0 || x == width - 1 || y == height - 1 {
                    *cell = CellType::Wall;
                } else if Self::is_rack_slot(x, y, width, height)
                    && rng.gen_bool(config.shelf_density as f64)
                {
                    *cell = CellType::Shelf;
                }
            }
        }

        let mut floor: Vec<(usize, usize)> = (0..height)
            .flat_map(|y| (0..width).map(move |x| (x, y)))
            .filter(|&(x, y)| cells[y][x] == CellType::Empty)
            .collect();
        let needed = config.zones + config.jewels + config.robots;
        if floor.len() < needed {
            return Err(JewelbotsError::InvalidMapData {
                reason: format!(
                    "Only {} floor cells for {needed} zones, jewels and robots",
                    floor.len()
                ),
            });
        }
        floor.shuffle(&mut rng);

        let mut picks = floor.into_iter();
        let mut jewels = Vec::with_capacity(config.jewels);
        for (cell_type, count) in [
            (CellType::Zone, config.zones),
            (CellType::Jewel, config.jewels),
            (CellType::RobotSpawn, config.robots),
        ] {
            for (x, y) in picks.by_ref().take(count) {
                cells[y][x] = cell_type;
                if cell_type == CellType::Jewel {
                    let color = JewelColor::ALL[rng.gen_range(0..JewelColor::ALL.len())];
                    jewels.push(JewelPlacement {
                        x: x as i32,
                        y: y as i32,
                        color,
                    });
                }
            }
        }

        let rows: Vec<String> = cells
            .iter()
            .rev()
            .map(|row| row.iter().map(|cell| cell.symbol()).collect())
            .collect();

        let mut map = WarehouseMap::new(config.name.clone(), config.cell_size, rows)?;
        map.origin = config.origin;
        map.jewels = jewels;
        map.check()?;
        Ok(map)
    }

    fn is_rack_slot(x: usize, y: usize, width: usize, height: usize) -> bool {
        let inside_aisle_ring = x >= 2 && y >= 2 && x + 2 < width && y + 2 < height;
        inside_aisle_ring && (x - 1) % 3 == 1 && (y - 1) % 4 != 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jewelbots::{find_path, GridNode, PathfindingConfig};

    fn config(seed: u64) -> LayoutConfig {
        LayoutConfig {
            name: "generated".to_string(),
            width: 24,
            height: 16,
            seed,
            cell_size: 1.0,
            origin: [0.0; 3],
            shelf_density: 1.0,
            jewels: 8,
            zones: 3,
            robots: 4,
        }
    }

    #[test]
    fn test_generates_requested_counts() {
        let map = WarehouseGenerator::generate(&config(1)).unwrap();
        let grid = map.build_grid().unwrap();

        assert_eq!(map.width(), 24);
        assert_eq!(map.height(), 16);
        assert_eq!(grid.count_cells(CellType::Jewel), 8);
        assert_eq!(grid.count_cells(CellType::Zone), 3);
        assert_eq!(grid.count_cells(CellType::RobotSpawn), 4);
        assert_eq!(map.jewels.len(), 8);
        assert!(grid.count_cells(CellType::Shelf) > 0);
    }

    #[test]
    fn test_same_seed_same_layout() {
        let a = WarehouseGenerator::generate(&config(99)).unwrap();
        let b = WarehouseGenerator::generate(&config(99)).unwrap();
        let c = WarehouseGenerator::generate(&config(100)).unwrap();

        assert_eq!(a, b);
        assert_ne!(a.rows, c.rows);
    }

    #[test]
    fn test_every_target_is_reachable() {
        let map = WarehouseGenerator::generate(&config(5)).unwrap();
        let (world, ledger) = map.build_world().unwrap();
        let pathfinding = PathfindingConfig::default();
        let spawn = map.robot_spawns()[0];

        let targets: Vec<GridNode> = ledger
            .remaining()
            .map(|(cell, _)| cell)
            .chain(map.robot_spawns())
            .collect();
        for target in targets {
            assert!(
                find_path(&world, spawn, target, &pathfinding).is_some(),
                "{target} unreachable from {spawn}"
            );
        }
    }

    #[test]
    fn test_too_small_for_contents() {
        let mut small = config(1);
        small.width = 5;
        small.height = 5;
        small.jewels = 20;

        let result = WarehouseGenerator::generate(&small);
        assert!(matches!(result, Err(JewelbotsError::InvalidMapData { .. })));
    }
}
