use crate::grid::GridNode;
use crate::world::WorldAccess;
use bevy::prelude::*;
use std::collections::{HashMap, HashSet};

pub mod follower;

pub use follower::PathFollower;

/// Configuration for A* searches
#[derive(Debug, Clone, Copy, PartialEq, Resource)]
pub struct PathfindingConfig {
    /// Toll added to every step on top of the unit move cost
    pub extra_cost: f32,
    /// Maximum number of nodes expanded before a search gives up
    pub max_iterations: usize,
}

impl Default for PathfindingConfig {
    fn default() -> Self {
        Self {
            extra_cost: 0.0,
            max_iterations: 1000,
        }
    }
}

impl PathfindingConfig {
    /// Cost of a single grid step
    pub fn step_cost(&self) -> f32 {
        1.0 + self.extra_cost.max(0.0)
    }
}

/// An ordered cell sequence from start to goal, both inclusive.
#[derive(Debug, Clone, PartialEq)]
pub struct Path {
    cells: Vec<GridNode>,
    cost: f32,
}

impl Path {
    fn single(cell: GridNode) -> Self {
        Self {
            cells: vec![cell],
            cost: 0.0,
        }
    }

    pub fn cells(&self) -> &[GridNode] {
        &self.cells
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<GridNode> {
        self.cells.get(index).copied()
    }

    pub fn start(&self) -> Option<GridNode> {
        self.cells.first().copied()
    }

    pub fn goal(&self) -> Option<GridNode> {
        self.cells.last().copied()
    }

    /// Total cost including the per-step extra cost
    pub fn cost(&self) -> f32 {
        self.cost
    }
}

/// A search node. Costs are counted in whole steps: every edge costs the
/// same, so the configured step cost only scales the reported total.
#[derive(Debug, Clone, Copy)]
struct PathNode {
    position: GridNode,
    g_cost: u32,
    h_cost: u32,
    parent: Option<usize>,
}

impl PathNode {
    fn f_cost(&self) -> u32 {
        self.g_cost + self.h_cost
    }
}

/// Find a path between two cells using A* over the 4-connected grid.
///
/// Returns `None` when either endpoint is outside the grid or not walkable,
/// when the goal is unreachable, or when the search expands
/// `config.max_iterations` nodes without reaching it. A request whose start
/// equals its goal always succeeds with a single-cell path.
///
/// Ties on F cost go to the lower H cost, then to the node that entered the
/// open list first, so identical inputs always give identical paths.
///
/// # Examples
/// ```
/// use bevy::prelude::Vec3;
/// use jewelbots::grid::{Grid, GridNode};
/// use jewelbots::pathfinding::{find_path, PathfindingConfig};
/// use jewelbots::world::WorldAccess;
///
/// let world = WorldAccess::with_unit_cells(Grid::new(5, 5).unwrap(), Vec3::ZERO);
/// let path = find_path(
///     &world,
///     GridNode::new(0, 0),
///     GridNode::new(3, 0),
///     &PathfindingConfig::default(),
/// )
/// .unwrap();
/// assert_eq!(path.len(), 4);
/// assert_eq!(path.cost(), 3.0);
/// ```
pub fn find_path(
    world: &WorldAccess,
    start: GridNode,
    goal: GridNode,
    config: &PathfindingConfig,
) -> Option<Path> {
    if start == goal {
        return Some(Path::single(start));
    }

    if !world.is_inside(start) || !world.is_inside(goal) {
        debug!("Pathfinding: {start} -> {goal} rejected, endpoint outside grid");
        return None;
    }

    if !world.is_walkable(start) || !world.is_walkable(goal) {
        debug!(
            "Pathfinding: {start} -> {goal} rejected, start_walkable={} goal_walkable={}",
            world.is_walkable(start),
            world.is_walkable(goal)
        );
        return None;
    }

    let mut nodes = vec![PathNode {
        position: start,
        g_cost: 0,
        h_cost: start.manhattan_distance(&goal),
        parent: None,
    }];
    let mut open: Vec<usize> = vec![0];
    let mut open_lookup: HashMap<GridNode, usize> = HashMap::from([(start, 0)]);
    let mut closed: HashSet<GridNode> = HashSet::new();
    let mut iterations = 0;

    while iterations < config.max_iterations {
        let Some(slot) = lowest_cost_slot(&open, &nodes) else {
            break;
        };
        iterations += 1;

        let current = open.remove(slot);
        let position = nodes[current].position;
        open_lookup.remove(&position);

        if position == goal {
            let path = reconstruct(&nodes, current, config.step_cost());
            trace!(
                "Pathfinding: {start} -> {goal} found {} cells in {iterations} iterations",
                path.len()
            );
            return Some(path);
        }

        closed.insert(position);
        let tentative_g = nodes[current].g_cost + 1;

        for neighbor in world.neighbors4(position) {
            if closed.contains(&neighbor) || !world.is_walkable(neighbor) {
                continue;
            }

            match open_lookup.get(&neighbor) {
                Some(&existing) => {
                    let node = &mut nodes[existing];
                    if tentative_g < node.g_cost {
                        node.g_cost = tentative_g;
                        node.parent = Some(current);
                    }
                }
                None => {
                    nodes.push(PathNode {
                        position: neighbor,
                        g_cost: tentative_g,
                        h_cost: neighbor.manhattan_distance(&goal),
                        parent: Some(current),
                    });
                    let id = nodes.len() - 1;
                    open.push(id);
                    open_lookup.insert(neighbor, id);
                }
            }
        }
    }

    debug!(
        "Pathfinding: {start} -> {goal} failed after {iterations} iterations (open={}, closed={})",
        open.len(),
        closed.len()
    );
    None
}

/// Position in the open list of the node to expand next
fn lowest_cost_slot(open: &[usize], nodes: &[PathNode]) -> Option<usize> {
    // min_by_key keeps the first of equal keys, preserving insertion order
    open.iter()
        .enumerate()
        .min_by_key(|&(_, &id)| (nodes[id].f_cost(), nodes[id].h_cost))
        .map(|(slot, _)| slot)
}

fn reconstruct(nodes: &[PathNode], goal_id: usize, step_cost: f32) -> Path {
    let mut cells = Vec::new();
    let mut current = Some(goal_id);
    while let Some(id) = current {
        cells.push(nodes[id].position);
        current = nodes[id].parent;
    }
    cells.reverse();

    Path {
        cost: nodes[goal_id].g_cost as f32 * step_cost,
        cells,
    }
}
