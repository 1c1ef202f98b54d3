//! World access facade: coordinate conversion, walkability and occupancy
//! queries, and the cell reservation protocol.
//!
//! Queries here never fail on out-of-range cells. Agents routinely query
//! targets that may lie outside the warehouse, so those come back as
//! `false` or `None` instead of an error.

use crate::game_logic::errors::GridError;
use crate::grid::{Cell, CellOccupant, CellType, Grid, GridNode};
use bevy::prelude::*;

pub mod reservation;

pub use reservation::HeldReservation;

#[derive(Debug, Clone, Resource)]
pub struct WorldAccess {
    grid: Grid,
    /// World-space anchor of the corner of cell (0, 0)
    origin: Vec3,
    cell_size: f32,
}

impl WorldAccess {
    pub fn new(grid: Grid, origin: Vec3, cell_size: f32) -> Result<Self, GridError> {
        if !cell_size.is_finite() || cell_size <= 0.0 {
            return Err(GridError::InvalidArgument {
                reason: format!("Cell size must be a positive finite number, got {cell_size}"),
            });
        }

        Ok(Self {
            grid,
            origin,
            cell_size,
        })
    }

    /// Facade with one world unit per cell
    pub fn with_unit_cells(grid: Grid, origin: Vec3) -> Self {
        Self {
            grid,
            origin,
            cell_size: 1.0,
        }
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn origin(&self) -> Vec3 {
        self.origin
    }

    pub fn cell_size(&self) -> f32 {
        self.cell_size
    }

    pub fn is_inside(&self, cell: GridNode) -> bool {
        self.grid.in_bounds(cell.x, cell.y)
    }

    pub fn is_walkable(&self, cell: GridNode) -> bool {
        self.cell(cell).is_some_and(Cell::is_walkable_now)
    }

    pub fn cell(&self, cell: GridNode) -> Option<&Cell> {
        self.grid.get_cell(cell.x, cell.y).ok()
    }

    fn cell_mut(&mut self, cell: GridNode) -> Option<&mut Cell> {
        self.grid.get_cell_mut(cell.x, cell.y).ok()
    }

    pub fn neighbors4(&self, cell: GridNode) -> impl Iterator<Item = GridNode> + '_ {
        self.grid.neighbors4(cell.x, cell.y)
    }

    /// Center of the cell in world space. Grid y maps onto world Z.
    pub fn cell_to_world(&self, cell: GridNode) -> Vec3 {
        Vec3::new(
            self.origin.x + (cell.x as f32 + 0.5) * self.cell_size,
            self.origin.y,
            self.origin.z + (cell.y as f32 + 0.5) * self.cell_size,
        )
    }

    /// Cell containing the world position (floor division, world Y ignored).
    ///
    /// A NaN coordinate maps to `i32::MIN`, which is never inside the grid.
    pub fn world_to_cell(&self, world_pos: Vec3) -> GridNode {
        let index = |offset: f32| {
            let scaled = (offset / self.cell_size).floor();
            if scaled.is_nan() { i32::MIN } else { scaled as i32 }
        };
        GridNode::new(
            index(world_pos.x - self.origin.x),
            index(world_pos.z - self.origin.z),
        )
    }

    pub fn add_occupant(&mut self, cell: GridNode, occupant: CellOccupant) -> bool {
        let Some(target) = self.cell_mut(cell) else {
            return false;
        };
        target.add_occupant(occupant);
        true
    }

    pub fn remove_occupant(&mut self, cell: GridNode, occupant: CellOccupant) -> bool {
        let Some(target) = self.cell_mut(cell) else {
            return false;
        };
        target.remove_occupant(occupant);
        true
    }

    pub fn has_occupant(&self, cell: GridNode, occupant: CellOccupant) -> bool {
        self.cell(cell)
            .is_some_and(|target| target.has_occupant(occupant))
    }

    /// Claim a cell so that nobody else can step onto it until released.
    ///
    /// Fails without side effects when the cell is outside the grid or
    /// already holds a robot or a reservation.
    pub fn try_reserve(&mut self, cell: GridNode) -> bool {
        let Some(target) = self.cell_mut(cell) else {
            return false;
        };
        if target.is_blocked_by_occupant() {
            return false;
        }
        target.add_occupant(CellOccupant::RESERVED);
        true
    }

    /// Clear a reservation. Returns whether the cell is inside the grid,
    /// not whether it was actually reserved.
    pub fn release_reserve(&mut self, cell: GridNode) -> bool {
        self.remove_occupant(cell, CellOccupant::RESERVED)
    }

    /// Restamp the static type of a cell at runtime
    pub fn set_cell_type(&mut self, cell: GridNode, cell_type: CellType) -> bool {
        let Some(target) = self.cell_mut(cell) else {
            return false;
        };
        target.set_type(cell_type);
        true
    }

    /// Cells carrying the given occupant, in row-major order
    pub fn cells_with_occupant(&self, occupant: CellOccupant) -> Vec<GridNode> {
        self.grid
            .iter()
            .filter(|(_, cell)| cell.has_occupant(occupant))
            .map(|(node, _)| node)
            .collect()
    }
}
