use crate::game_logic::errors::{JewelbotsError, JewelbotsResult};
use crate::game_logic::jewels::{JewelColor, JewelLedger};
use crate::grid::{Cell, CellOccupant, CellType, Grid, GridNode};
use crate::world::WorldAccess;
use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use validator::Validate;

/// A warehouse layout as drawn by hand.
///
/// `rows[0]` is the top row of the drawing, i.e. grid row `height - 1`, so
/// the file reads the same way the warehouse looks from above with +y
/// pointing up the page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate, Resource)]
pub struct WarehouseMap {
    #[validate(length(min = 1, max = 64))]
    pub name: String,
    #[validate(range(min = 0.1, max = 100.0))]
    pub cell_size: f32,
    /// World-space corner of cell (0, 0)
    #[serde(default)]
    pub origin: [f32; 3],
    #[validate(length(min = 1, max = 1024))]
    pub rows: Vec<String>,
    /// Colors for the `J` cells. Unlisted jewels cycle through the palette.
    #[serde(default)]
    pub jewels: Vec<JewelPlacement>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct JewelPlacement {
    pub x: i32,
    pub y: i32,
    pub color: JewelColor,
}

impl WarehouseMap {
    /// Create a new map with validation
    pub fn new(name: impl Into<String>, cell_size: f32, rows: Vec<String>) -> JewelbotsResult<Self> {
        let map = Self {
            name: name.into(),
            cell_size,
            origin: [0.0; 3],
            rows,
            jewels: Vec::new(),
        };
        map.check()?;
        Ok(map)
    }

    pub fn from_toml_str(contents: &str) -> JewelbotsResult<Self> {
        let map: WarehouseMap = toml::from_str(contents)?;
        map.check()?;
        Ok(map)
    }

    /// Small built-in warehouse used when no map file is available
    pub fn demo() -> Self {
        let rows = [
            "############",
            "#R...SS..J.#",
            "#..J.......#",
            "#R..SS.SS..#",
            "#.....J....#",
            "#R..SS.SS.Z#",
            "#J.......ZZ#",
            "############",
        ];

        Self {
            name: "demo".to_string(),
            cell_size: 1.0,
            origin: [0.0; 3],
            rows: rows.iter().map(|row| row.to_string()).collect(),
            jewels: vec![
                JewelPlacement {
                    x: 9,
                    y: 6,
                    color: JewelColor::Blue,
                },
                JewelPlacement {
                    x: 1,
                    y: 1,
                    color: JewelColor::Green,
                },
            ],
        }
    }

    pub fn width(&self) -> u32 {
        self.rows
            .first()
            .map(|row| row.chars().count() as u32)
            .unwrap_or(0)
    }

    pub fn height(&self) -> u32 {
        self.rows.len() as u32
    }

    /// Field-level validation followed by the layout checks derive can't express
    pub fn check(&self) -> JewelbotsResult<()> {
        self.validate().map_err(|validation_errors| {
            let error_details = validation_errors
                .field_errors()
                .iter()
                .map(|(field, errors)| {
                    let error_msgs: Vec<String> = errors.iter().map(|e| e.to_string()).collect();
                    format!("{field}: {}", error_msgs.join(", "))
                })
                .collect::<Vec<String>>()
                .join("; ");

            JewelbotsError::MapValidationFailed {
                reason: format!("Map validation failed: {error_details}"),
            }
        })?;

        let width = self.width();
        if width == 0 || width > 1024 {
            return Err(JewelbotsError::InvalidMapData {
                reason: format!("Map rows must be 1 to 1024 cells wide, got {width}"),
            });
        }

        for (index, row) in self.rows.iter().enumerate() {
            let row_width = row.chars().count() as u32;
            if row_width != width {
                return Err(JewelbotsError::InvalidMapData {
                    reason: format!("Row {index} is {row_width} cells wide, expected {width}"),
                });
            }
            if let Some(symbol) = row.chars().find(|c| CellType::from_symbol(*c).is_none()) {
                return Err(JewelbotsError::InvalidMapData {
                    reason: format!("Unknown map symbol '{symbol}' in row {index}"),
                });
            }
        }

        for placement in &self.jewels {
            let cell = GridNode::new(placement.x, placement.y);
            if self.cell_type_at(cell) != Some(CellType::Jewel) {
                return Err(JewelbotsError::InvalidMapData {
                    reason: format!("Jewel color given for {cell}, which is not a jewel cell"),
                });
            }
        }

        Ok(())
    }

    /// Static type of a cell as drawn, `None` outside the map
    pub fn cell_type_at(&self, cell: GridNode) -> Option<CellType> {
        let x = usize::try_from(cell.x).ok()?;
        let y = u32::try_from(cell.y).ok()?;
        if y >= self.height() {
            return None;
        }
        let row = &self.rows[(self.height() - 1 - y) as usize];
        row.chars().nth(x).and_then(CellType::from_symbol)
    }

    fn cells_of_type(&self, cell_type: CellType) -> Vec<GridNode> {
        let mut cells = Vec::new();
        for y in 0..self.height() as i32 {
            for x in 0..self.width() as i32 {
                let cell = GridNode::new(x, y);
                if self.cell_type_at(cell) == Some(cell_type) {
                    cells.push(cell);
                }
            }
        }
        cells
    }

    /// Robot spawn cells in row-major order
    pub fn robot_spawns(&self) -> Vec<GridNode> {
        self.cells_of_type(CellType::RobotSpawn)
    }

    /// Stamp the static cell types into a fresh grid
    pub fn build_grid(&self) -> JewelbotsResult<Grid> {
        self.check()?;

        let mut grid = Grid::new(self.width(), self.height())?;
        for y in 0..self.height() as i32 {
            for x in 0..self.width() as i32 {
                let cell_type = self
                    .cell_type_at(GridNode::new(x, y))
                    .unwrap_or(CellType::Empty);
                grid.set_cell(x, y, Cell::new(cell_type))?;
            }
        }
        Ok(grid)
    }

    /// Build the world facade with zone markers and jewels in place
    pub fn build_world(&self) -> JewelbotsResult<(WorldAccess, JewelLedger)> {
        let grid = self.build_grid()?;
        let mut world = WorldAccess::new(grid, Vec3::from_array(self.origin), self.cell_size)?;
        let mut ledger = JewelLedger::default();

        for zone in self.cells_of_type(CellType::Zone) {
            world.add_occupant(zone, CellOccupant::ZONE);
        }

        let colors: HashMap<GridNode, JewelColor> = self
            .jewels
            .iter()
            .map(|p| (GridNode::new(p.x, p.y), p.color))
            .collect();
        let palette = JewelColor::ALL.iter().copied().cycle();

        for (cell, fallback) in self.cells_of_type(CellType::Jewel).into_iter().zip(palette) {
            let color = colors.get(&cell).copied().unwrap_or(fallback);
            ledger.place(&mut world, cell, color);
        }

        info!(
            "Built map '{}': {}x{} cells, {} jewels, {} robot spawns",
            self.name,
            self.width(),
            self.height(),
            ledger.remaining_count(),
            self.robot_spawns().len()
        );

        Ok((world, ledger))
    }

    /// Get the maps directory path
    pub fn get_maps_dir() -> JewelbotsResult<PathBuf> {
        Ok(std::env::current_dir()?.join("maps"))
    }

    /// Load a map by name from the maps directory, or from a path that exists as given
    pub fn load_from_file<P: AsRef<Path>>(filename: P) -> JewelbotsResult<Self> {
        let filename = filename.as_ref();
        let file_path = if filename.exists() {
            filename.to_path_buf()
        } else {
            Self::get_maps_dir()?.join(filename)
        };
        Self::load_from_path(&file_path)
    }

    /// Load a map, reading TOML for `.toml` files and bincode otherwise
    pub fn load_from_path(file_path: &Path) -> JewelbotsResult<Self> {
        if !file_path.exists() {
            return Err(JewelbotsError::MapFileNotFound {
                path: file_path.to_path_buf(),
            });
        }

        if is_toml(file_path) {
            let contents = std::fs::read_to_string(file_path)?;
            return Self::from_toml_str(&contents);
        }

        let data = std::fs::read(file_path)?;
        let (map, _): (WarehouseMap, usize) =
            bincode::serde::decode_from_slice(&data, bincode::config::standard()).map_err(|e| {
                JewelbotsError::CorruptedMapFile {
                    reason: format!("Failed to deserialize map data: {e}"),
                }
            })?;

        map.check()?;
        Ok(map)
    }

    /// Save the map to the maps directory
    pub fn save_to_file<P: AsRef<Path>>(&self, filename: P) -> JewelbotsResult<PathBuf> {
        let file_path = Self::get_maps_dir()?.join(filename);
        self.save_to_path(&file_path)?;
        Ok(file_path)
    }

    pub fn save_to_path(&self, file_path: &Path) -> JewelbotsResult<()> {
        // Validate before saving
        self.check()?;

        // Create parent directories for the file path if they don't exist
        if let Some(parent) = file_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let data = if is_toml(file_path) {
            toml::to_string_pretty(self)?.into_bytes()
        } else {
            bincode::serde::encode_to_vec(self, bincode::config::standard()).map_err(|e| {
                JewelbotsError::InvalidMapData {
                    reason: format!("Failed to serialize map: {e}"),
                }
            })?
        };

        std::fs::write(file_path, data)?;
        Ok(())
    }
}

fn is_toml(path: &Path) -> bool {
    path.extension().and_then(|ext| ext.to_str()) == Some("toml")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rows(lines: &[&str]) -> Vec<String> {
        lines.iter().map(|line| line.to_string()).collect()
    }

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("jewelbots-map-{}-{name}", std::process::id()))
    }

    #[test]
    fn test_demo_map_is_valid() {
        let map = WarehouseMap::demo();
        map.check().unwrap();

        assert_eq!(map.width(), 12);
        assert_eq!(map.height(), 8);
        assert_eq!(map.robot_spawns().len(), 3);
    }

    #[test]
    fn test_first_row_is_top_of_grid() {
        let map = WarehouseMap::new("flip", 1.0, rows(&["R..", "...", "..#"])).unwrap();

        assert_eq!(map.cell_type_at(GridNode::new(0, 2)), Some(CellType::RobotSpawn));
        assert_eq!(map.cell_type_at(GridNode::new(2, 0)), Some(CellType::Wall));
        assert_eq!(map.cell_type_at(GridNode::new(3, 0)), None);
        assert_eq!(map.cell_type_at(GridNode::new(0, -1)), None);

        let grid = map.build_grid().unwrap();
        assert_eq!(grid.get_cell(0, 2).unwrap().cell_type(), CellType::RobotSpawn);
        assert_eq!(grid.get_cell(2, 0).unwrap().cell_type(), CellType::Wall);
    }

    #[test]
    fn test_ragged_rows_rejected() {
        let result = WarehouseMap::new("ragged", 1.0, rows(&["....", "..."]));
        assert!(matches!(result, Err(JewelbotsError::InvalidMapData { .. })));
    }

    #[test]
    fn test_unknown_symbol_rejected() {
        let result = WarehouseMap::new("bad", 1.0, rows(&["..x."]));
        let err = result.unwrap_err();
        assert!(err.to_string().contains("'x'"));
    }

    #[test]
    fn test_field_validation() {
        let result = WarehouseMap::new("tiny cells", 0.0, rows(&["..."]));
        assert!(matches!(
            result,
            Err(JewelbotsError::MapValidationFailed { .. })
        ));

        let result = WarehouseMap::new("", 1.0, rows(&["..."]));
        assert!(result.is_err());

        let result = WarehouseMap::new("no rows", 1.0, Vec::new());
        assert!(result.is_err());
    }

    #[test]
    fn test_jewel_color_must_target_jewel_cell() {
        let mut map = WarehouseMap::new("colors", 1.0, rows(&["J.", ".."])).unwrap();
        map.jewels.push(JewelPlacement {
            x: 1,
            y: 1,
            color: JewelColor::Red,
        });

        assert!(map.check().is_err());
    }

    #[test]
    fn test_build_world_places_markers() {
        let map = WarehouseMap::demo();

        let (world, ledger) = map.build_world().unwrap();

        assert_eq!(world.cells_with_occupant(CellOccupant::ZONE).len(), 3);
        assert_eq!(ledger.remaining_count(), 4);
        assert_eq!(ledger.jewel_at(GridNode::new(9, 6)), Some(JewelColor::Blue));
        assert_eq!(ledger.jewel_at(GridNode::new(1, 1)), Some(JewelColor::Green));
        assert!(world.cells_with_occupant(CellOccupant::ROBOT).is_empty());
    }

    #[test]
    fn test_parse_toml_map() {
        let text = r#"
name = "aisle"
cell_size = 2.0
origin = [10.0, 0.0, 20.0]
rows = [
    "Z.S",
    "R.J",
]
jewels = [{ x = 2, y = 0, color = "yellow" }]
"#;

        let map = WarehouseMap::from_toml_str(text).unwrap();
        let (world, ledger) = map.build_world().unwrap();

        assert_eq!(world.cell_size(), 2.0);
        assert_eq!(world.cell_to_world(GridNode::new(0, 0)), Vec3::new(11.0, 0.0, 21.0));
        assert_eq!(map.robot_spawns(), vec![GridNode::new(0, 0)]);
        assert_eq!(ledger.jewel_at(GridNode::new(2, 0)), Some(JewelColor::Yellow));
        assert!(world.has_occupant(GridNode::new(0, 1), CellOccupant::ZONE));
        assert!(!world.is_walkable(GridNode::new(2, 1)));
    }

    #[test]
    fn test_shipped_warehouse_map() {
        let map = WarehouseMap::from_toml_str(include_str!("../../maps/warehouse.toml")).unwrap();
        let (world, ledger) = map.build_world().unwrap();

        assert_eq!((map.width(), map.height()), (20, 12));
        assert_eq!(map.robot_spawns().len(), 4);
        assert_eq!(ledger.remaining_count(), 4);
        assert_eq!(ledger.jewel_at(GridNode::new(7, 10)), Some(JewelColor::Red));
        assert_eq!(world.cells_with_occupant(CellOccupant::ZONE).len(), 3);
    }

    #[test]
    fn test_save_and_load_binary() {
        let path = temp_path("demo.bin");
        let map = WarehouseMap::demo();

        map.save_to_path(&path).unwrap();
        let loaded = WarehouseMap::load_from_path(&path).unwrap();
        std::fs::remove_file(&path).unwrap();

        assert_eq!(loaded, map);
    }

    #[test]
    fn test_save_and_load_toml() {
        let path = temp_path("demo.toml");
        let map = WarehouseMap::demo();

        map.save_to_path(&path).unwrap();
        let loaded = WarehouseMap::load_from_path(&path).unwrap();
        std::fs::remove_file(&path).unwrap();

        assert_eq!(loaded, map);
    }

    #[test]
    fn test_corrupted_binary_rejected() {
        let path = temp_path("garbage.bin");
        std::fs::write(&path, [0xff, 0xfe, 0x00]).unwrap();

        let result = WarehouseMap::load_from_path(&path);
        std::fs::remove_file(&path).unwrap();

        assert!(matches!(
            result,
            Err(JewelbotsError::CorruptedMapFile { .. })
        ));
    }

    #[test]
    fn test_missing_map_file() {
        let result = WarehouseMap::load_from_path(&temp_path("nope.bin"));
        assert!(matches!(result, Err(JewelbotsError::MapFileNotFound { .. })));
    }
}
