use crate::game_logic::jewels::JewelColor;
use crate::grid::GridNode;
use bevy::prelude::*;
use derive_more::{Display, From, Mul};

#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Mul, Display, From)]
pub struct Speed(pub f32);

impl Speed {
    pub fn new(value: f32) -> Self {
        Self(value.max(0.0))
    }
    pub const ZERO: Speed = Speed(0.0);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display, From)]
#[display("robot-{_0}")]
pub struct RobotId(pub u32);

#[derive(Component, Debug, Clone)]
pub struct Robot {
    pub id: RobotId,
    pub speed: Speed,
    pub carrying: Option<JewelColor>,
    /// Consecutive ticks spent waiting for the next cell to free up
    pub blocked_ticks: u32,
}

impl Robot {
    pub fn new(id: RobotId, speed: Speed) -> Self {
        Self {
            id,
            speed,
            carrying: None,
            blocked_ticks: 0,
        }
    }

    pub fn is_carrying(&self) -> bool {
        self.carrying.is_some()
    }
}

/// Cell the robot currently occupies. Changes only when a step completes.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Deref, DerefMut)]
pub struct GridPosition(pub GridNode);

/// Continuous position, interpolated between cell centers
#[derive(Component, Debug, Clone, Copy, PartialEq, Deref, DerefMut)]
pub struct WorldPosition(pub Vec3);

/// Cell the robot is trying to reach
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Deref)]
pub struct Destination(pub GridNode);

/// Marker inserted for one tick when a robot reaches its destination
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct Arrived;
