use crate::components::{GridPosition, Robot, RobotId, Speed, WorldPosition};
use crate::game_logic::errors::{JewelbotsError, JewelbotsResult};
use crate::grid::{CellOccupant, CellType, GridNode};
use crate::map::WarehouseMap;
use crate::pathfinding::PathFollower;
use crate::world::{HeldReservation, WorldAccess};
use bevy::prelude::*;

/// Spawn a robot standing on `cell` and mark the cell as occupied.
///
/// The cell has to be walkable and free of other robots and reservations.
pub fn spawn_robot(
    world: &mut World,
    id: RobotId,
    cell: GridNode,
    speed: Speed,
) -> JewelbotsResult<Entity> {
    let mut access = world
        .get_resource_mut::<WorldAccess>()
        .ok_or(JewelbotsError::WorldNotInstalled)?;

    if !is_free_for_robot(&access, cell) {
        return Err(JewelbotsError::InvalidSpawnCell { cell });
    }

    access.add_occupant(cell, CellOccupant::ROBOT);
    let position = access.cell_to_world(cell);

    let entity = world
        .spawn((
            Robot::new(id, speed),
            GridPosition(cell),
            WorldPosition(position),
            PathFollower::new(),
            HeldReservation::default(),
        ))
        .id();

    debug!("Spawned {id} at {cell}");
    Ok(entity)
}

/// Remove a robot, clearing its occupancy and any reservation it holds
pub fn despawn_robot(world: &mut World, entity: Entity) -> bool {
    let Some(grid_pos) = world.get::<GridPosition>(entity).copied() else {
        return false;
    };
    let mut reservation = world
        .get::<HeldReservation>(entity)
        .cloned()
        .unwrap_or_default();

    if let Some(mut access) = world.get_resource_mut::<WorldAccess>() {
        reservation.release(&mut access);
        access.remove_occupant(grid_pos.0, CellOccupant::ROBOT);
    }

    world.despawn(entity)
}

fn is_free_for_robot(access: &WorldAccess, cell: GridNode) -> bool {
    access
        .cell(cell)
        .is_some_and(|c| c.is_walkable_by_type() && !c.is_blocked_by_occupant())
}

/// Cells for `count` robots: the map's spawn cells first, then free empty
/// floor in row-major order.
pub fn fleet_spawn_cells(map: &WarehouseMap, access: &WorldAccess, count: usize) -> Vec<GridNode> {
    let overflow = access
        .grid()
        .iter()
        .filter(|(_, cell)| cell.cell_type() == CellType::Empty)
        .map(|(node, _)| node);

    map.robot_spawns()
        .into_iter()
        .chain(overflow)
        .filter(|cell| is_free_for_robot(access, *cell))
        .take(count)
        .collect()
}

/// Spawn `count` robots with ids `0..count`
pub fn spawn_fleet(
    world: &mut World,
    map: &WarehouseMap,
    count: usize,
    speed: Speed,
) -> JewelbotsResult<Vec<Entity>> {
    let cells = {
        let access = world
            .get_resource::<WorldAccess>()
            .ok_or(JewelbotsError::WorldNotInstalled)?;
        fleet_spawn_cells(map, access, count)
    };

    if cells.len() < count {
        warn!(
            "Map '{}' only has room for {} of {count} robots",
            map.name,
            cells.len()
        );
    }

    cells
        .into_iter()
        .enumerate()
        .map(|(index, cell)| spawn_robot(world, RobotId(index as u32), cell, speed))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::Grid;

    fn world_with_grid(rows: &[&str]) -> (World, WarehouseMap) {
        let map = WarehouseMap::new(
            "spawn test",
            1.0,
            rows.iter().map(|row| row.to_string()).collect(),
        )
        .unwrap();
        let (access, _) = map.build_world().unwrap();
        let mut world = World::new();
        world.insert_resource(access);
        (world, map)
    }

    #[test]
    fn test_spawn_marks_cell() {
        let (mut world, _) = world_with_grid(&["...", "R.."]);
        let cell = GridNode::new(0, 0);

        let entity = spawn_robot(&mut world, RobotId(1), cell, Speed::new(2.0)).unwrap();

        let access = world.resource::<WorldAccess>();
        assert!(access.has_occupant(cell, CellOccupant::ROBOT));
        assert_eq!(world.get::<GridPosition>(entity), Some(&GridPosition(cell)));
        assert_eq!(
            world.get::<WorldPosition>(entity).map(|p| p.0),
            Some(Vec3::new(0.5, 0.0, 0.5))
        );
        assert!(!world.get::<PathFollower>(entity).unwrap().has_path());
    }

    #[test]
    fn test_spawn_refusals() {
        let (mut world, _) = world_with_grid(&["#..", "R.."]);

        let speed = Speed::new(1.0);
        assert!(matches!(
            spawn_robot(&mut world, RobotId(0), GridNode::new(0, 1), speed),
            Err(JewelbotsError::InvalidSpawnCell { .. })
        ));
        assert!(spawn_robot(&mut world, RobotId(0), GridNode::new(7, 7), speed).is_err());

        spawn_robot(&mut world, RobotId(0), GridNode::new(0, 0), speed).unwrap();
        assert!(spawn_robot(&mut world, RobotId(1), GridNode::new(0, 0), speed).is_err());
    }

    #[test]
    fn test_spawn_without_world_resource() {
        let mut world = World::new();
        let result = spawn_robot(&mut world, RobotId(0), GridNode::new(0, 0), Speed::new(1.0));
        assert!(matches!(result, Err(JewelbotsError::WorldNotInstalled)));
    }

    #[test]
    fn test_despawn_clears_occupancy_and_reservation() {
        let (mut world, _) = world_with_grid(&["...", "R.."]);
        let cell = GridNode::new(0, 0);
        let next = GridNode::new(1, 0);
        let entity = spawn_robot(&mut world, RobotId(0), cell, Speed::new(1.0)).unwrap();

        world.resource_scope(|world, mut access: Mut<WorldAccess>| {
            let mut hold = world.get_mut::<HeldReservation>(entity).unwrap();
            assert!(hold.acquire(&mut access, next));
        });
        assert!(world.resource::<WorldAccess>().has_occupant(next, CellOccupant::RESERVED));

        assert!(despawn_robot(&mut world, entity));
        assert!(!despawn_robot(&mut world, entity));

        let access = world.resource::<WorldAccess>();
        assert!(access.cells_with_occupant(CellOccupant::ROBOT).is_empty());
        assert!(access.cells_with_occupant(CellOccupant::RESERVED).is_empty());
    }

    #[test]
    fn test_fleet_prefers_spawn_cells() {
        let (world, map) = world_with_grid(&["#.R", "R.#"]);
        let access = world.resource::<WorldAccess>();

        let cells = fleet_spawn_cells(&map, access, 3);

        assert_eq!(
            cells,
            vec![GridNode::new(0, 0), GridNode::new(2, 1), GridNode::new(1, 0)]
        );
    }

    #[test]
    fn test_spawn_fleet_caps_at_free_cells() {
        let (mut world, map) = world_with_grid(&["R#", "#."]);

        let robots = spawn_fleet(&mut world, &map, 5, Speed::new(1.0)).unwrap();

        assert_eq!(robots.len(), 2);
        let ids: Vec<RobotId> = robots
            .iter()
            .map(|entity| world.get::<Robot>(*entity).unwrap().id)
            .collect();
        assert_eq!(ids, vec![RobotId(0), RobotId(1)]);
    }

    #[test]
    fn test_fleet_falls_back_to_empty_floor() {
        let mut world = World::new();
        world.insert_resource(WorldAccess::with_unit_cells(
            Grid::new(2, 1).unwrap(),
            Vec3::ZERO,
        ));
        let map = WarehouseMap::new("bare", 1.0, vec!["..".to_string()]).unwrap();

        let robots = spawn_fleet(&mut world, &map, 1, Speed::new(1.0)).unwrap();
        assert_eq!(robots.len(), 1);
    }
}
