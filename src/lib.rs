pub mod components;
pub mod config;
pub mod game_logic;
pub mod grid;
pub mod map;
pub mod pathfinding;
pub mod plugins;
pub mod resources;
pub mod world;

// Selective re-exports for external consumers

// Plugins - main.rs installs the simulation through these
pub use plugins::*;

// Game logic - errors and the jewel types
pub use game_logic::errors::{GridError, JewelbotsError, JewelbotsResult};
pub use game_logic::jewels::{JewelColor, JewelLedger};

// Core grid and navigation types
pub use grid::{Cell, CellOccupant, CellType, Grid, GridNode};
pub use map::WarehouseMap;
pub use pathfinding::{find_path, Path, PathFollower, PathfindingConfig};
pub use world::{HeldReservation, WorldAccess};
