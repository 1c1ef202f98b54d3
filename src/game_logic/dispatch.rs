//! Seeded assignment of destinations to idle robots.

use crate::components::{Arrived, Destination, GridPosition, Robot};
use crate::game_logic::jewels::JewelLedger;
use crate::grid::{CellOccupant, GridNode};
use crate::plugins::simulation::SimulationSet;
use crate::world::WorldAccess;
use bevy::prelude::*;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg64;
use std::collections::BTreeSet;

#[derive(Resource, Debug, Clone)]
pub struct Dispatcher {
    rng: Pcg64,
}

impl Dispatcher {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Pcg64::seed_from_u64(seed),
        }
    }

    /// Pick the next destination for an idle robot standing on `at`.
    ///
    /// A loaded robot heads for the nearest zone, preferring zones no robot
    /// is parked on. An empty robot picks a random loose jewel that nobody
    /// else is already heading for.
    pub fn choose_target(
        &mut self,
        robot: &Robot,
        at: GridNode,
        world: &WorldAccess,
        ledger: &JewelLedger,
        claimed: &BTreeSet<GridNode>,
    ) -> Option<GridNode> {
        if robot.is_carrying() {
            let zones = world.cells_with_occupant(CellOccupant::ZONE);
            let nearest = |free_only: bool| {
                zones
                    .iter()
                    .copied()
                    .filter(|zone| {
                        !free_only || *zone == at || !world.has_occupant(*zone, CellOccupant::ROBOT)
                    })
                    .min_by_key(|zone| (zone.manhattan_distance(&at), *zone))
            };
            return nearest(true).or_else(|| nearest(false));
        }

        let candidates: Vec<GridNode> = ledger
            .remaining()
            .map(|(cell, _)| cell)
            .filter(|cell| !claimed.contains(cell))
            .collect();
        if candidates.is_empty() {
            return None;
        }

        let index = self.rng.gen_range(0..candidates.len());
        Some(candidates[index])
    }
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self::new(0)
    }
}

pub struct DispatchPlugin;

impl Plugin for DispatchPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<Dispatcher>()
            .add_systems(Update, dispatch_idle_robots.in_set(SimulationSet::Dispatch));
    }
}

fn dispatch_idle_robots(
    mut commands: Commands,
    mut dispatcher: ResMut<Dispatcher>,
    world: Res<WorldAccess>,
    ledger: Res<JewelLedger>,
    idle_query: Query<(Entity, &Robot, &GridPosition), (Without<Destination>, Without<Arrived>)>,
    busy_query: Query<&Destination>,
) {
    let mut claimed: BTreeSet<GridNode> = busy_query.iter().map(|dest| dest.0).collect();

    let mut idle: Vec<_> = idle_query.iter().collect();
    idle.sort_by_key(|(_, robot, _)| robot.id);

    for (entity, robot, grid_pos) in idle {
        let Some(target) =
            dispatcher.choose_target(robot, grid_pos.0, &world, &ledger, &claimed)
        else {
            continue;
        };

        debug!("Dispatching {} from {} to {target}", robot.id, grid_pos.0);
        if !robot.is_carrying() {
            claimed.insert(target);
        }
        commands.entity(entity).insert(Destination(target));
    }
}
