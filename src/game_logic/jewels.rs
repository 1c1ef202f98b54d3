//! Jewel bookkeeping on top of the cell occupant flags.
//!
//! The `JEWEL` and `ZONE` occupants on the grid say *where* things are; the
//! ledger adds what the flags cannot hold: the color of each loose jewel and
//! the running delivery tally.

use crate::grid::{CellOccupant, GridNode};
use crate::world::WorldAccess;
use bevy::prelude::*;
use derive_more::Display;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Display, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum JewelColor {
    #[default]
    Red,
    Green,
    Blue,
    Yellow,
}

impl JewelColor {
    pub const ALL: [JewelColor; 4] = [
        JewelColor::Red,
        JewelColor::Green,
        JewelColor::Blue,
        JewelColor::Yellow,
    ];
}

#[derive(Resource, Debug, Clone, Default)]
pub struct JewelLedger {
    jewels: BTreeMap<GridNode, JewelColor>,
    delivered: BTreeMap<JewelColor, u32>,
}

impl JewelLedger {
    /// Put a loose jewel on a cell. Refused outside the grid, on cells a
    /// robot could never reach, and on cells that already hold a jewel.
    pub fn place(&mut self, world: &mut WorldAccess, cell: GridNode, color: JewelColor) -> bool {
        let placeable = world
            .cell(cell)
            .is_some_and(|c| c.is_walkable_by_type() && !c.has_occupant(CellOccupant::JEWEL));
        if !placeable {
            return false;
        }

        world.add_occupant(cell, CellOccupant::JEWEL);
        self.jewels.insert(cell, color);
        true
    }

    /// Take the jewel lying on `cell`, if any
    pub fn try_pick_up(&mut self, world: &mut WorldAccess, cell: GridNode) -> Option<JewelColor> {
        if !world.has_occupant(cell, CellOccupant::JEWEL) {
            return None;
        }

        let Some(color) = self.jewels.remove(&cell) else {
            warn!("Cell {cell} is flagged as holding a jewel but has no ledger entry");
            return None;
        };
        world.remove_occupant(cell, CellOccupant::JEWEL);
        Some(color)
    }

    /// Deliver a carried jewel. Only succeeds on a cell marked as a zone.
    pub fn try_drop(&mut self, world: &WorldAccess, cell: GridNode, color: JewelColor) -> bool {
        if !world.has_occupant(cell, CellOccupant::ZONE) {
            return false;
        }

        *self.delivered.entry(color).or_default() += 1;
        true
    }

    pub fn jewel_at(&self, cell: GridNode) -> Option<JewelColor> {
        self.jewels.get(&cell).copied()
    }

    /// Loose jewels still on the floor, ordered by cell
    pub fn remaining(&self) -> impl Iterator<Item = (GridNode, JewelColor)> + '_ {
        self.jewels.iter().map(|(cell, color)| (*cell, *color))
    }

    pub fn remaining_count(&self) -> usize {
        self.jewels.len()
    }

    pub fn delivered(&self, color: JewelColor) -> u32 {
        self.delivered.get(&color).copied().unwrap_or(0)
    }

    pub fn total_delivered(&self) -> u32 {
        self.delivered.values().sum()
    }
}
