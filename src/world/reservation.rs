use crate::grid::GridNode;
use crate::world::WorldAccess;
use bevy::prelude::*;

/// The single cell an agent has claimed for its next step.
///
/// Agents reserve through this component rather than calling
/// [`WorldAccess::try_reserve`] directly, so at most one reservation is held
/// per agent and every hold has a matching release.
#[derive(Component, Debug, Default, Clone, PartialEq, Eq)]
pub struct HeldReservation {
    cell: Option<GridNode>,
}

impl HeldReservation {
    pub fn cell(&self) -> Option<GridNode> {
        self.cell
    }

    pub fn is_holding(&self, cell: GridNode) -> bool {
        self.cell == Some(cell)
    }

    /// Reserve `cell`, replacing any previous hold.
    ///
    /// On refusal the previous hold is kept and the world is unchanged.
    pub fn acquire(&mut self, world: &mut WorldAccess, cell: GridNode) -> bool {
        if self.is_holding(cell) {
            return true;
        }
        if !world.try_reserve(cell) {
            return false;
        }
        self.release(world);
        self.cell = Some(cell);
        true
    }

    /// Give up the held cell. Returns whether anything was held.
    pub fn release(&mut self, world: &mut WorldAccess) -> bool {
        match self.cell.take() {
            Some(cell) => {
                world.release_reserve(cell);
                true
            }
            None => false,
        }
    }
}
