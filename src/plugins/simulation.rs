use crate::components::*;
use crate::game_logic::dispatch::{DispatchPlugin, Dispatcher};
use crate::game_logic::errors::JewelbotsResult;
use crate::game_logic::jewels::JewelLedger;
use crate::game_logic::movement::{calculate_movement, MovementConfig};
use crate::grid::{CellOccupant, GridNode};
use crate::map::WarehouseMap;
use crate::pathfinding::{PathFollower, PathfindingConfig};
use crate::resources::*;
use crate::world::{HeldReservation, WorldAccess};
use bevy::prelude::*;

/// Phases of a tick, run in this order
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SimulationSet {
    Dispatch,
    Plan,
    Step,
    Arrive,
    Advance,
}

pub struct SimulationPlugin;

impl Plugin for SimulationPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<TickCounter>()
            .configure_sets(
                Update,
                (
                    SimulationSet::Dispatch,
                    SimulationSet::Plan,
                    SimulationSet::Step,
                    SimulationSet::Arrive,
                    SimulationSet::Advance,
                )
                    .chain(),
            )
            .add_systems(
                Update,
                (
                    plan_paths.in_set(SimulationSet::Plan),
                    step_robots.in_set(SimulationSet::Step),
                    handle_arrivals.in_set(SimulationSet::Arrive),
                    advance_tick.in_set(SimulationSet::Advance),
                ),
            );
    }
}

/// Build the world from `map` and register everything a tick needs.
pub fn install_simulation(app: &mut App, map: &WarehouseMap, config: &SimConfig) -> JewelbotsResult<()> {
    let (world, ledger) = map.build_world()?;

    app.insert_resource(world)
        .insert_resource(ledger)
        .insert_resource(config.settings.pathfinding_config())
        .insert_resource(config.settings.clone())
        .insert_resource(Dispatcher::new(config.seed))
        .insert_resource(map.clone())
        .add_plugins((SimulationPlugin, DispatchPlugin));

    Ok(())
}

/// Robots sorted by id, so that earlier robots in a tick always act first
fn in_id_order<'a>(robots: impl Iterator<Item = (Entity, &'a Robot)>) -> Vec<Entity> {
    let mut order: Vec<(RobotId, Entity)> = robots.map(|(entity, robot)| (robot.id, entity)).collect();
    order.sort();
    order.into_iter().map(|(_, entity)| entity).collect()
}

fn plan_paths(
    mut commands: Commands,
    mut world: ResMut<WorldAccess>,
    pathfinding: Res<PathfindingConfig>,
    mut robot_query: Query<(
        Entity,
        &Robot,
        &GridPosition,
        &Destination,
        &mut WorldPosition,
        &mut PathFollower,
        &mut HeldReservation,
    )>,
) {
    let order = in_id_order(robot_query.iter().map(|(entity, robot, ..)| (entity, robot)));

    for entity in order {
        let Ok((
            entity,
            robot,
            grid_pos,
            destination,
            mut world_pos,
            mut follower,
            mut reservation,
        )) = robot_query.get_mut(entity)
        else {
            continue;
        };

        let up_to_date = follower.has_path()
            && follower.path().and_then(|path| path.goal()) == Some(destination.0);
        if up_to_date {
            continue;
        }

        if !follower.request_path_to_cell(&world, &pathfinding, grid_pos.0, destination.0) {
            warn!(
                "{} found no path from {} to {}",
                robot.id, grid_pos.0, destination.0
            );
            abandon_step(&mut world, &mut reservation, &mut world_pos, grid_pos.0);
            commands.entity(entity).remove::<Destination>();
        }
    }
}

/// Drops the held cell and puts the robot back on its own cell center
fn abandon_step(
    world: &mut WorldAccess,
    reservation: &mut HeldReservation,
    world_pos: &mut WorldPosition,
    cell: GridNode,
) {
    reservation.release(world);
    world_pos.0 = world.cell_to_world(cell);
}

fn step_robots(
    mut commands: Commands,
    mut world: ResMut<WorldAccess>,
    pathfinding: Res<PathfindingConfig>,
    settings: Res<SimSettings>,
    mut robot_query: Query<(
        Entity,
        &mut Robot,
        &mut GridPosition,
        &mut WorldPosition,
        &mut PathFollower,
        &mut HeldReservation,
        &Destination,
    )>,
) {
    let order = in_id_order(robot_query.iter().map(|(entity, robot, ..)| (entity, robot)));
    let give_up_after = settings.blocked_ticks_before_giving_up.max(1);

    for entity in order {
        let Ok((
            entity,
            mut robot,
            mut grid_pos,
            mut world_pos,
            mut follower,
            mut reservation,
            destination,
        )) = robot_query.get_mut(entity)
        else {
            continue;
        };

        if !follower.has_path() {
            continue;
        }

        // A fresh path starts on the robot's own cell
        while follower.next_waypoint() == Some(grid_pos.0) {
            follower.advance_to_next_waypoint();
        }

        if follower.has_path() {
            let here = world.cell_to_world(grid_pos.0);
            if !follower.validate_and_replan_if_needed(&world, &pathfinding, here, destination.0) {
                warn!("{} lost its route to {}", robot.id, destination.0);
                abandon_step(&mut world, &mut reservation, &mut world_pos, grid_pos.0);
                commands.entity(entity).remove::<Destination>();
                continue;
            }
            while follower.next_waypoint() == Some(grid_pos.0) {
                follower.advance_to_next_waypoint();
            }
        }

        let Some(next) = follower.next_waypoint() else {
            // Already standing on the destination
            abandon_step(&mut world, &mut reservation, &mut world_pos, grid_pos.0);
            follower.clear_path();
            commands
                .entity(entity)
                .remove::<Destination>()
                .insert(Arrived);
            continue;
        };

        // A replan moved the next step away from the held cell
        if reservation.cell().is_some_and(|held| held != next) {
            abandon_step(&mut world, &mut reservation, &mut world_pos, grid_pos.0);
        }

        if !reservation.acquire(&mut world, next) {
            robot.blocked_ticks += 1;
            trace!("{} waiting for {next} ({} ticks)", robot.id, robot.blocked_ticks);

            if robot.blocked_ticks >= give_up_after {
                info!(
                    "{} gave up on {} after {} blocked ticks",
                    robot.id, destination.0, robot.blocked_ticks
                );
                robot.blocked_ticks = 0;
                abandon_step(&mut world, &mut reservation, &mut world_pos, grid_pos.0);
                follower.clear_path();
                commands.entity(entity).remove::<Destination>();
            }
            continue;
        }
        robot.blocked_ticks = 0;

        let movement = calculate_movement(
            world_pos.0,
            world.cell_to_world(next),
            MovementConfig {
                speed: robot.speed.0,
                arrival_distance: settings.arrival_distance.get(),
                delta_time: settings.tick_seconds.get(),
            },
        );
        world_pos.0 = movement.new_position;

        if !movement.arrived {
            continue;
        }

        world.remove_occupant(grid_pos.0, CellOccupant::ROBOT);
        world.add_occupant(next, CellOccupant::ROBOT);
        reservation.release(&mut world);
        grid_pos.0 = next;

        if !follower.advance_to_next_waypoint() {
            follower.clear_path();
            commands
                .entity(entity)
                .remove::<Destination>()
                .insert(Arrived);
        }
    }
}

fn handle_arrivals(
    mut commands: Commands,
    mut world: ResMut<WorldAccess>,
    mut ledger: ResMut<JewelLedger>,
    mut arrived_query: Query<(Entity, &mut Robot, &GridPosition), With<Arrived>>,
) {
    for (entity, mut robot, grid_pos) in arrived_query.iter_mut() {
        match robot.carrying {
            Some(color) => {
                if ledger.try_drop(&world, grid_pos.0, color) {
                    info!("{} delivered a {color} jewel at {}", robot.id, grid_pos.0);
                    robot.carrying = None;
                }
            }
            None => {
                if let Some(color) = ledger.try_pick_up(&mut world, grid_pos.0) {
                    info!("{} picked up a {color} jewel at {}", robot.id, grid_pos.0);
                    robot.carrying = Some(color);
                }
            }
        }

        commands.entity(entity).remove::<Arrived>();
    }
}

fn advance_tick(mut counter: ResMut<TickCounter>) {
    counter.tick += 1;
    trace!("Tick {} complete", counter.tick);
}
