pub mod range_types;

use crate::game_logic::errors::{JewelbotsError, JewelbotsResult};
use crate::resources::SimConfig;
use bevy::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};

const APP_DIR: &str = "jewelbots";
const CONFIG_FILE: &str = "config.toml";

/// `<platform config dir>/jewelbots/config.toml`, creating the directory if needed
pub fn get_config_path() -> JewelbotsResult<PathBuf> {
    let mut path = dirs::config_dir().ok_or(JewelbotsError::ConfigDirNotFound)?;
    path.push(APP_DIR);
    fs::create_dir_all(&path)?;
    path.push(CONFIG_FILE);
    Ok(path)
}

/// Load the user config, falling back to defaults when it is missing or broken
pub fn load_config() -> SimConfig {
    let loaded = get_config_path().and_then(|path| load_config_from(&path));

    match loaded {
        Ok(config) => config,
        Err(JewelbotsError::ConfigFileNotFound { path }) => {
            debug!("No config at {}, using defaults", path.display());
            SimConfig::default()
        }
        Err(e) => {
            warn!("Failed to load config, using defaults: {e}");
            SimConfig::default()
        }
    }
}

pub fn load_config_from(path: &Path) -> JewelbotsResult<SimConfig> {
    if !path.exists() {
        return Err(JewelbotsError::ConfigFileNotFound {
            path: path.to_path_buf(),
        });
    }

    let contents = fs::read_to_string(path)?;
    Ok(toml::from_str::<SimConfig>(&contents)?)
}

pub fn save_config(config: &SimConfig) -> JewelbotsResult<PathBuf> {
    let path = get_config_path()?;
    save_config_to(config, &path)?;
    Ok(path)
}

pub fn save_config_to(config: &SimConfig, path: &Path) -> JewelbotsResult<()> {
    let contents = toml::to_string_pretty(config)?;
    fs::write(path, contents)?;
    info!("Saved config to {}", path.display());
    Ok(())
}
