use derive_more::{Display, Into};
use serde::{Deserialize, Serialize};

/// Robot travel speed in world units per second, constrained to [0.1, 50.0]
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Display, Into, Serialize, Deserialize)]
#[serde(from = "f32", into = "f32")]
pub struct MovementSpeed(f32);

impl MovementSpeed {
    const MIN: f32 = 0.1;
    const MAX: f32 = 50.0;
    const DEFAULT: f32 = 4.0;

    /// NaN falls back to the default
    pub fn new(value: f32) -> Self {
        if value.is_nan() {
            return Self(Self::DEFAULT);
        }
        Self(value.clamp(Self::MIN, Self::MAX))
    }

    pub fn get(self) -> f32 {
        self.0
    }
}

impl From<f32> for MovementSpeed {
    fn from(value: f32) -> Self {
        Self::new(value)
    }
}

impl Default for MovementSpeed {
    fn default() -> Self {
        Self::new(Self::DEFAULT)
    }
}

/// Simulated seconds per tick, constrained to [0.01, 1.0]
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Display, Into, Serialize, Deserialize)]
#[serde(from = "f32", into = "f32")]
pub struct TickSeconds(f32);

impl TickSeconds {
    const MIN: f32 = 0.01;
    const MAX: f32 = 1.0;
    const DEFAULT: f32 = 0.1;

    /// NaN falls back to the default
    pub fn new(value: f32) -> Self {
        if value.is_nan() {
            return Self(Self::DEFAULT);
        }
        Self(value.clamp(Self::MIN, Self::MAX))
    }

    pub fn get(self) -> f32 {
        self.0
    }
}

impl From<f32> for TickSeconds {
    fn from(value: f32) -> Self {
        Self::new(value)
    }
}

impl Default for TickSeconds {
    fn default() -> Self {
        Self::new(Self::DEFAULT)
    }
}

/// Distance at which a robot counts as standing on its waypoint, constrained to [0.001, 0.5]
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Display, Into, Serialize, Deserialize)]
#[serde(from = "f32", into = "f32")]
pub struct ArrivalDistance(f32);

impl ArrivalDistance {
    const MIN: f32 = 0.001;
    const MAX: f32 = 0.5;
    const DEFAULT: f32 = 0.01;

    /// NaN falls back to the default
    pub fn new(value: f32) -> Self {
        if value.is_nan() {
            return Self(Self::DEFAULT);
        }
        Self(value.clamp(Self::MIN, Self::MAX))
    }

    pub fn get(self) -> f32 {
        self.0
    }
}

impl From<f32> for ArrivalDistance {
    fn from(value: f32) -> Self {
        Self::new(value)
    }
}

impl Default for ArrivalDistance {
    fn default() -> Self {
        Self::new(Self::DEFAULT)
    }
}

/// Uniform surcharge added to every grid step, constrained to [0.0, 100.0]
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Display, Into, Serialize, Deserialize)]
#[serde(from = "f32", into = "f32")]
pub struct ExtraCost(f32);

impl ExtraCost {
    const MIN: f32 = 0.0;
    const MAX: f32 = 100.0;

    pub fn new(value: f32) -> Self {
        // clamp passes NaN through
        if value.is_nan() {
            return Self(Self::MIN);
        }
        Self(value.clamp(Self::MIN, Self::MAX))
    }

    pub fn get(self) -> f32 {
        self.0
    }
}

impl From<f32> for ExtraCost {
    fn from(value: f32) -> Self {
        Self::new(value)
    }
}

impl Default for ExtraCost {
    fn default() -> Self {
        Self::new(0.0)
    }
}

/// Upper bound on A* node expansions, constrained to [1, 1_000_000]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Display, Into, Serialize, Deserialize)]
#[serde(from = "usize", into = "usize")]
pub struct IterationBudget(usize);

impl IterationBudget {
    const MIN: usize = 1;
    const MAX: usize = 1_000_000;

    pub fn new(value: usize) -> Self {
        Self(value.clamp(Self::MIN, Self::MAX))
    }

    pub fn get(self) -> usize {
        self.0
    }
}

impl From<usize> for IterationBudget {
    fn from(value: usize) -> Self {
        Self::new(value)
    }
}

impl Default for IterationBudget {
    fn default() -> Self {
        Self::new(1000)
    }
}
