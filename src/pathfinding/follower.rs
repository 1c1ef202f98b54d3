use super::{find_path, Path, PathfindingConfig};
use crate::grid::GridNode;
use crate::world::WorldAccess;
use bevy::prelude::*;

/// Per-agent path state: the current route and how far along it the agent is.
#[derive(Component, Debug, Clone, Default)]
pub struct PathFollower {
    path: Option<Path>,
    current_index: usize,
}

impl PathFollower {
    pub fn new() -> Self {
        Self::default()
    }

    /// True while there is a waypoint left to consume
    pub fn has_path(&self) -> bool {
        self.path
            .as_ref()
            .is_some_and(|path| self.current_index < path.len())
    }

    pub fn next_waypoint(&self) -> Option<GridNode> {
        self.path.as_ref()?.get(self.current_index)
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_ref()
    }

    /// Waypoints not yet consumed, starting with the next one
    pub fn remaining(&self) -> &[GridNode] {
        self.path
            .as_ref()
            .and_then(|path| path.cells().get(self.current_index..))
            .unwrap_or(&[])
    }

    /// Replace the current path with a fresh search from `start` to `goal`.
    ///
    /// Any existing path is dropped first, so a failed request leaves the
    /// follower with no path rather than a stale one.
    pub fn request_path_to_cell(
        &mut self,
        world: &WorldAccess,
        config: &PathfindingConfig,
        start: GridNode,
        goal: GridNode,
    ) -> bool {
        self.clear_path();

        match find_path(world, start, goal, config) {
            Some(path) => {
                debug!(
                    "Planned path {start} -> {goal}: {} waypoints, cost {:.1}",
                    path.len(),
                    path.cost()
                );
                self.path = Some(path);
                self.current_index = 0;
                true
            }
            None => false,
        }
    }

    pub fn request_path_to_world(
        &mut self,
        world: &WorldAccess,
        config: &PathfindingConfig,
        current_world: Vec3,
        target_world: Vec3,
    ) -> bool {
        let start = world.world_to_cell(current_world);
        let goal = world.world_to_cell(target_world);
        self.request_path_to_cell(world, config, start, goal)
    }

    /// Move on to the following waypoint. Returns whether one remains.
    pub fn advance_to_next_waypoint(&mut self) -> bool {
        if self.path.is_none() {
            return false;
        }
        self.current_index += 1;
        self.has_path()
    }

    pub fn clear_path(&mut self) {
        self.path = None;
        self.current_index = 0;
    }

    pub fn next_waypoint_world_position(&self, world: &WorldAccess) -> Option<Vec3> {
        self.next_waypoint().map(|cell| world.cell_to_world(cell))
    }

    /// Check the next waypoint before stepping onto it, replanning from the
    /// agent's current cell to `final_goal` if it is no longer walkable.
    ///
    /// Returns whether the follower ends up with a usable path.
    pub fn validate_and_replan_if_needed(
        &mut self,
        world: &WorldAccess,
        config: &PathfindingConfig,
        current_world: Vec3,
        final_goal: GridNode,
    ) -> bool {
        let Some(next) = self.next_waypoint() else {
            return false;
        };

        if world.is_walkable(next) {
            return true;
        }

        let current = world.world_to_cell(current_world);
        info!("Waypoint {next} is blocked, replanning from {current} to {final_goal}");

        if self.request_path_to_cell(world, config, current, final_goal) {
            true
        } else {
            warn!("Replanning from {current} to {final_goal} failed");
            false
        }
    }
}
