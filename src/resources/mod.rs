use crate::config::range_types::*;
use crate::pathfinding::PathfindingConfig;
use bevy::prelude::*;
use serde::{Deserialize, Serialize};

/// Number of completed simulation ticks
#[derive(Resource, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickCounter {
    pub tick: u64,
}

#[derive(Resource, Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct SimConfig {
    /// Seed for robot dispatch. The same seed and map replay the same run.
    pub seed: u64,
    pub settings: SimSettings,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            settings: SimSettings::default(),
        }
    }
}

#[derive(Resource, Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
// NOTE: When adding new fields, update the default config.toml example in the project root
pub struct SimSettings {
    // Clock
    pub tick_seconds: TickSeconds,

    // Robots
    pub robot_speed: MovementSpeed,
    pub arrival_distance: ArrivalDistance,
    pub blocked_ticks_before_giving_up: u32,

    // Pathfinding
    pub path_extra_cost: ExtraCost,
    pub path_max_iterations: IterationBudget,

    // Map file, relative to the maps directory
    pub map_file_path: String,
}

impl Default for SimSettings {
    fn default() -> Self {
        Self {
            tick_seconds: TickSeconds::new(0.1),
            robot_speed: MovementSpeed::new(4.0),
            arrival_distance: ArrivalDistance::new(0.01),
            blocked_ticks_before_giving_up: 20,
            path_extra_cost: ExtraCost::new(0.0),
            path_max_iterations: IterationBudget::new(1000),
            map_file_path: "warehouse.toml".to_string(),
        }
    }
}

impl SimSettings {
    pub fn pathfinding_config(&self) -> PathfindingConfig {
        PathfindingConfig {
            extra_cost: self.path_extra_cost.get(),
            max_iterations: self.path_max_iterations.get(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_pathfinding_config() {
        let config = SimSettings::default().pathfinding_config();
        assert_eq!(config, PathfindingConfig::default());
    }

    #[test]
    fn test_settings_toml_round_trip() {
        let config = SimConfig::default();

        let text = toml::to_string_pretty(&config).unwrap();
        let parsed: SimConfig = toml::from_str(&text).unwrap();

        assert_eq!(parsed, config);
        assert!(text.contains("robot_speed = 4.0"));
    }

    #[test]
    fn test_empty_toml_is_default() {
        let parsed: SimConfig = toml::from_str("").unwrap();
        assert_eq!(parsed, SimConfig::default());
    }

    #[test]
    fn test_nan_settings_are_replaced_on_read() {
        let text = "[settings]\nrobot_speed = nan\ntick_seconds = nan\narrival_distance = nan\npath_extra_cost = nan\n";
        let parsed: SimConfig = toml::from_str(text).unwrap();

        assert_eq!(parsed.settings, SimSettings::default());
    }
}
