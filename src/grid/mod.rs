//! Fixed-size cell storage with bounds checking and 4-neighbor enumeration.

use crate::game_logic::errors::GridError;
use std::fmt;

pub mod cell;

pub use cell::{Cell, CellOccupant, CellType};

/// Offsets in neighbor order: up, right, down, left.
///
/// Search tie-breaking depends on this order staying fixed.
const NEIGHBOR_OFFSETS: [(i32, i32); 4] = [(0, 1), (1, 0), (0, -1), (-1, 0)];

/// A discrete cell coordinate.
///
/// Coordinates are signed so that callers can address positions outside the
/// grid (for example a floor-divided world position left of the origin).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct GridNode {
    pub x: i32,
    pub y: i32,
}

impl GridNode {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Manhattan distance to another node (heuristic for A*)
    pub fn manhattan_distance(&self, other: &GridNode) -> u32 {
        self.x.abs_diff(other.x) + self.y.abs_diff(other.y)
    }

    /// Node shifted by the given offset, or `None` on coordinate overflow
    pub fn offset(self, dx: i32, dy: i32) -> Option<GridNode> {
        Some(GridNode::new(
            self.x.checked_add(dx)?,
            self.y.checked_add(dy)?,
        ))
    }
}

impl fmt::Display for GridNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    width: u32,
    height: u32,
    cells: Vec<Cell>,
}

impl Grid {
    /// Create a grid with every cell `Empty` and unoccupied.
    pub fn new(width: u32, height: u32) -> Result<Self, GridError> {
        if width == 0 || height == 0 {
            return Err(GridError::InvalidArgument {
                reason: format!("Grid dimensions must be positive, got {width}x{height}"),
            });
        }

        if i32::try_from(width).is_err() || i32::try_from(height).is_err() {
            return Err(GridError::InvalidArgument {
                reason: format!("Grid dimensions {width}x{height} exceed the coordinate range"),
            });
        }

        let cell_count = (width as usize)
            .checked_mul(height as usize)
            .ok_or_else(|| GridError::InvalidArgument {
                reason: format!("Grid of {width}x{height} cells is too large"),
            })?;

        Ok(Self {
            width,
            height,
            cells: vec![Cell::default(); cell_count],
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn in_bounds(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && (x as u32) < self.width && (y as u32) < self.height
    }

    fn index(&self, x: i32, y: i32) -> Result<usize, GridError> {
        if !self.in_bounds(x, y) {
            return Err(GridError::OutOfRange {
                x,
                y,
                width: self.width,
                height: self.height,
            });
        }
        Ok(y as usize * self.width as usize + x as usize)
    }

    pub fn get_cell(&self, x: i32, y: i32) -> Result<&Cell, GridError> {
        let index = self.index(x, y)?;
        Ok(&self.cells[index])
    }

    pub fn get_cell_mut(&mut self, x: i32, y: i32) -> Result<&mut Cell, GridError> {
        let index = self.index(x, y)?;
        Ok(&mut self.cells[index])
    }

    pub fn set_cell(&mut self, x: i32, y: i32, cell: Cell) -> Result<(), GridError> {
        let index = self.index(x, y)?;
        self.cells[index] = cell;
        Ok(())
    }

    /// In-bounds axis-aligned neighbors in up, right, down, left order.
    ///
    /// Yields 4 nodes for interior cells, 3 on an edge and 2 in a corner.
    pub fn neighbors4(&self, x: i32, y: i32) -> impl Iterator<Item = GridNode> + '_ {
        let origin = GridNode::new(x, y);
        NEIGHBOR_OFFSETS
            .into_iter()
            .filter_map(move |(dx, dy)| origin.offset(dx, dy))
            .filter(|node| self.in_bounds(node.x, node.y))
    }

    /// All cells in row-major order (y outer, x inner)
    pub fn iter(&self) -> impl Iterator<Item = (GridNode, &Cell)> + '_ {
        let width = self.width as usize;
        self.cells.iter().enumerate().map(move |(index, cell)| {
            let node = GridNode::new((index % width) as i32, (index / width) as i32);
            (node, cell)
        })
    }

    pub fn count_cells(&self, cell_type: CellType) -> usize {
        self.cells
            .iter()
            .filter(|cell| cell.cell_type() == cell_type)
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grid_creation() {
        let grid = Grid::new(5, 3).unwrap();
        assert_eq!(grid.width(), 5);
        assert_eq!(grid.height(), 3);
        assert_eq!(grid.count_cells(CellType::Empty), 15);
        assert!(grid.iter().all(|(_, cell)| *cell == Cell::default()));
    }

    #[test]
    fn test_grid_rejects_zero_dimensions() {
        assert!(matches!(
            Grid::new(0, 3),
            Err(GridError::InvalidArgument { .. })
        ));
        assert!(matches!(
            Grid::new(3, 0),
            Err(GridError::InvalidArgument { .. })
        ));
        assert!(matches!(
            Grid::new(u32::MAX, 1),
            Err(GridError::InvalidArgument { .. })
        ));
    }

    #[test]
    fn test_in_bounds_matches_dimensions() {
        let grid = Grid::new(4, 3).unwrap();
        for y in -2..6 {
            for x in -2..7 {
                let expected = (0..4).contains(&x) && (0..3).contains(&y);
                assert_eq!(grid.in_bounds(x, y), expected, "({x}, {y})");
            }
        }
        assert!(!grid.in_bounds(i32::MIN, 0));
        assert!(!grid.in_bounds(0, i32::MAX));
    }

    #[test]
    fn test_cell_access_out_of_range() {
        let mut grid = Grid::new(2, 2).unwrap();

        assert_eq!(
            grid.get_cell(2, 0),
            Err(GridError::OutOfRange {
                x: 2,
                y: 0,
                width: 2,
                height: 2
            })
        );
        assert!(grid.get_cell(0, -1).is_err());
        assert!(grid.get_cell_mut(-1, 0).is_err());
        assert!(grid.set_cell(0, 2, Cell::new(CellType::Wall)).is_err());
    }

    #[test]
    fn test_set_and_get_cell() {
        let mut grid = Grid::new(3, 3).unwrap();
        grid.set_cell(1, 2, Cell::new(CellType::Shelf)).unwrap();

        assert_eq!(grid.get_cell(1, 2).unwrap().cell_type(), CellType::Shelf);
        assert_eq!(grid.get_cell(2, 1).unwrap().cell_type(), CellType::Empty);

        grid.get_cell_mut(0, 0)
            .unwrap()
            .add_occupant(CellOccupant::JEWEL);
        assert!(grid.get_cell(0, 0).unwrap().has_occupant(CellOccupant::JEWEL));
    }

    #[test]
    fn test_neighbors_order_interior() {
        let grid = Grid::new(5, 3).unwrap();
        let neighbors: Vec<_> = grid.neighbors4(2, 1).collect();

        assert_eq!(
            neighbors,
            vec![
                GridNode::new(2, 2),
                GridNode::new(3, 1),
                GridNode::new(2, 0),
                GridNode::new(1, 1),
            ]
        );
    }

    #[test]
    fn test_neighbor_counts() {
        let grid = Grid::new(5, 3).unwrap();

        assert_eq!(grid.neighbors4(2, 1).count(), 4); // interior
        assert_eq!(grid.neighbors4(2, 0).count(), 3); // bottom edge
        assert_eq!(grid.neighbors4(4, 1).count(), 3); // right edge
        assert_eq!(grid.neighbors4(0, 0).count(), 2); // corner
        assert_eq!(grid.neighbors4(4, 2).count(), 2); // corner

        let corner: Vec<_> = grid.neighbors4(0, 0).collect();
        assert_eq!(corner, vec![GridNode::new(0, 1), GridNode::new(1, 0)]);
    }

    #[test]
    fn test_neighbors_of_outside_cell() {
        let grid = Grid::new(3, 3).unwrap();
        let neighbors: Vec<_> = grid.neighbors4(-1, 0).collect();
        assert_eq!(neighbors, vec![GridNode::new(0, 0)]);

        assert_eq!(grid.neighbors4(i32::MAX, i32::MAX).count(), 0);
    }

    #[test]
    fn test_iter_is_row_major() {
        let grid = Grid::new(3, 2).unwrap();
        let nodes: Vec<_> = grid.iter().map(|(node, _)| node).collect();
        assert_eq!(nodes[0], GridNode::new(0, 0));
        assert_eq!(nodes[2], GridNode::new(2, 0));
        assert_eq!(nodes[3], GridNode::new(0, 1));
        assert_eq!(nodes.len(), 6);
    }

    #[test]
    fn test_manhattan_distance() {
        let node1 = GridNode::new(0, 0);
        let node2 = GridNode::new(3, -4);

        assert_eq!(node1.manhattan_distance(&node2), 7);
        assert_eq!(node2.manhattan_distance(&node1), 7);
    }
}
