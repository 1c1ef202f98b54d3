//! The atomic grid unit: a static type plus dynamic occupant markers.

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

/// Static classification of a cell, stamped once when the warehouse is built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum CellType {
    #[default]
    Empty,
    Wall,
    Shelf,
    Jewel,
    Zone,
    RobotSpawn,
}

impl CellType {
    /// Walls and shelves are permanently impassable
    pub fn is_walkable(self) -> bool {
        !matches!(self, CellType::Wall | CellType::Shelf)
    }

    /// Map legend symbol for this type
    pub fn symbol(self) -> char {
        match self {
            CellType::Empty => '.',
            CellType::Wall => '#',
            CellType::Shelf => 'S',
            CellType::Jewel => 'J',
            CellType::Zone => 'Z',
            CellType::RobotSpawn => 'R',
        }
    }

    pub fn from_symbol(symbol: char) -> Option<Self> {
        match symbol {
            '.' => Some(CellType::Empty),
            '#' => Some(CellType::Wall),
            'S' => Some(CellType::Shelf),
            'J' => Some(CellType::Jewel),
            'Z' => Some(CellType::Zone),
            'R' => Some(CellType::RobotSpawn),
            _ => None,
        }
    }
}

bitflags! {
    /// Dynamic markers on a cell. Any combination may be present at once.
    ///
    /// Only `ROBOT` and `RESERVED` block movement; `JEWEL` and `ZONE` are
    /// markers that coexist with passage.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    pub struct CellOccupant: u8 {
        const ROBOT    = 1 << 0;
        const JEWEL    = 1 << 1;
        const ZONE     = 1 << 2;
        const RESERVED = 1 << 3;
    }
}

impl CellOccupant {
    pub const NONE: Self = Self::empty();

    /// Occupants that stop another robot from entering the cell.
    pub const BLOCKING: Self = Self::ROBOT.union(Self::RESERVED);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Cell {
    cell_type: CellType,
    occupants: CellOccupant,
}

impl Cell {
    pub fn new(cell_type: CellType) -> Self {
        Self {
            cell_type,
            occupants: CellOccupant::NONE,
        }
    }

    pub fn cell_type(&self) -> CellType {
        self.cell_type
    }

    pub fn occupants(&self) -> CellOccupant {
        self.occupants
    }

    /// Overwrites the static type; occupants are left untouched.
    pub fn set_type(&mut self, cell_type: CellType) {
        self.cell_type = cell_type;
    }

    pub fn add_occupant(&mut self, occupant: CellOccupant) {
        self.occupants.insert(occupant);
    }

    pub fn remove_occupant(&mut self, occupant: CellOccupant) {
        self.occupants.remove(occupant);
    }

    pub fn has_occupant(&self, occupant: CellOccupant) -> bool {
        self.occupants.contains(occupant)
    }

    pub fn is_walkable_by_type(&self) -> bool {
        self.cell_type.is_walkable()
    }

    pub fn is_blocked_by_occupant(&self) -> bool {
        self.occupants.intersects(CellOccupant::BLOCKING)
    }

    /// Walkability used by pathfinding.
    ///
    /// Occupants are not part of this predicate: robots and reservations are
    /// resolved when a robot commits to a step, not when a route is planned.
    pub fn is_walkable_now(&self) -> bool {
        self.is_walkable_by_type()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_cell_is_empty() {
        let cell = Cell::default();
        assert_eq!(cell.cell_type(), CellType::Empty);
        assert_eq!(cell.occupants(), CellOccupant::NONE);
        assert!(cell.is_walkable_now());
        assert!(!cell.is_blocked_by_occupant());
    }

    #[test]
    fn test_occupant_add_remove_is_idempotent() {
        let mut cell = Cell::new(CellType::Empty);

        cell.add_occupant(CellOccupant::JEWEL);
        cell.add_occupant(CellOccupant::JEWEL);
        assert!(cell.has_occupant(CellOccupant::JEWEL));
        assert_eq!(cell.occupants(), CellOccupant::JEWEL);

        cell.remove_occupant(CellOccupant::JEWEL);
        cell.remove_occupant(CellOccupant::JEWEL);
        assert!(!cell.has_occupant(CellOccupant::JEWEL));

        // Removing something never added is a no-op
        cell.remove_occupant(CellOccupant::ROBOT);
        assert_eq!(cell.occupants(), CellOccupant::NONE);
    }

    #[test]
    fn test_occupants_coexist() {
        let mut cell = Cell::new(CellType::Zone);
        cell.add_occupant(CellOccupant::ZONE);
        cell.add_occupant(CellOccupant::ROBOT);

        assert!(cell.has_occupant(CellOccupant::ZONE));
        assert!(cell.has_occupant(CellOccupant::ROBOT));
        assert!(cell.has_occupant(CellOccupant::ZONE | CellOccupant::ROBOT));
        assert!(!cell.has_occupant(CellOccupant::JEWEL));
    }

    #[test]
    fn test_only_robot_and_reserved_block() {
        let mut cell = Cell::default();
        cell.add_occupant(CellOccupant::JEWEL | CellOccupant::ZONE);
        assert!(!cell.is_blocked_by_occupant());

        cell.add_occupant(CellOccupant::RESERVED);
        assert!(cell.is_blocked_by_occupant());

        cell.remove_occupant(CellOccupant::RESERVED);
        cell.add_occupant(CellOccupant::ROBOT);
        assert!(cell.is_blocked_by_occupant());
    }

    #[test]
    fn test_walkability_composition() {
        let mut wall = Cell::new(CellType::Wall);
        assert!(!wall.is_walkable_now());
        wall.add_occupant(CellOccupant::ZONE);
        assert!(!wall.is_walkable_now());

        assert!(!Cell::new(CellType::Shelf).is_walkable_now());

        for cell_type in [
            CellType::Empty,
            CellType::Jewel,
            CellType::Zone,
            CellType::RobotSpawn,
        ] {
            assert!(Cell::new(cell_type).is_walkable_now(), "{cell_type:?}");
        }

        // Blocking occupants do not feed into planning walkability
        let mut occupied = Cell::new(CellType::Empty);
        occupied.add_occupant(CellOccupant::ROBOT);
        assert!(occupied.is_walkable_now());
    }

    #[test]
    fn test_set_type_keeps_occupants() {
        let mut cell = Cell::new(CellType::Empty);
        cell.add_occupant(CellOccupant::RESERVED);
        cell.set_type(CellType::Wall);

        assert_eq!(cell.cell_type(), CellType::Wall);
        assert!(cell.has_occupant(CellOccupant::RESERVED));
    }

    #[test]
    fn test_symbol_legend_round_trips() {
        for cell_type in [
            CellType::Empty,
            CellType::Wall,
            CellType::Shelf,
            CellType::Jewel,
            CellType::Zone,
            CellType::RobotSpawn,
        ] {
            assert_eq!(CellType::from_symbol(cell_type.symbol()), Some(cell_type));
        }
        assert_eq!(CellType::from_symbol('x'), None);
    }
}
