use bevy::prelude::*;

/// Pure movement calculation logic that can be tested without Bevy runtime
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MovementCalculation {
    pub new_position: Vec3,
    pub distance_to_target: f32,
    pub arrived: bool,
}

/// Configuration for movement calculations
#[derive(Debug, Clone, Copy)]
pub struct MovementConfig {
    pub speed: f32,
    pub arrival_distance: f32,
    pub delta_time: f32,
}

impl Default for MovementConfig {
    fn default() -> Self {
        Self {
            speed: 4.0,
            arrival_distance: 0.01,
            delta_time: 0.1,
        }
    }
}

/// Move `current_position` toward `target` by at most `speed * delta_time`.
///
/// Distance is measured on the ground plane only. The robot snaps onto the
/// target once it would reach or overshoot it, or is already within
/// `arrival_distance`, so waypoints are hit exactly.
pub fn calculate_movement(
    current_position: Vec3,
    target: Vec3,
    config: MovementConfig,
) -> MovementCalculation {
    // Calculate 2D distance (ignore Y differences for movement)
    let current_2d = Vec3::new(current_position.x, 0.0, current_position.z);
    let target_2d = Vec3::new(target.x, 0.0, target.z);
    let distance = current_2d.distance(target_2d);
    let max_move_distance = (config.speed * config.delta_time).max(0.0);

    if distance <= config.arrival_distance || distance <= max_move_distance {
        return MovementCalculation {
            new_position: Vec3::new(target.x, current_position.y, target.z),
            distance_to_target: distance,
            arrived: true,
        };
    }

    let direction = (target_2d - current_2d).normalize_or_zero();

    MovementCalculation {
        new_position: current_position + direction * max_move_distance,
        distance_to_target: distance,
        arrived: false,
    }
}
