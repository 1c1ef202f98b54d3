use crate::grid::GridNode;
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised by direct grid construction and cell access.
///
/// The world facade never surfaces these for queries: out-of-range lookups
/// there come back as `false` or `None`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GridError {
    #[error("Invalid argument: {reason}")]
    InvalidArgument { reason: String },

    #[error("Cell ({x}, {y}) is outside the {width}x{height} grid")]
    OutOfRange {
        x: i32,
        y: i32,
        width: u32,
        height: u32,
    },
}

#[derive(Error, Debug)]
pub enum JewelbotsError {
    // Config-related errors
    #[error("Failed to get config directory")]
    ConfigDirNotFound,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to serialize config: {0}")]
    SerializationFailed(#[from] toml::ser::Error),

    #[error("Failed to deserialize config: {0}")]
    DeserializationFailed(#[from] toml::de::Error),

    #[error("Config file not found at path: {path}")]
    ConfigFileNotFound { path: PathBuf },

    // Map-related errors
    #[error("Map file not found at path: {path}")]
    MapFileNotFound { path: PathBuf },

    #[error("Corrupted map file: {reason}")]
    CorruptedMapFile { reason: String },

    #[error("Invalid map data: {reason}")]
    InvalidMapData { reason: String },

    #[error("{reason}")]
    MapValidationFailed { reason: String },

    // Simulation errors
    #[error(transparent)]
    Grid(#[from] GridError),

    #[error("Cannot spawn a robot at {cell}")]
    InvalidSpawnCell { cell: GridNode },

    #[error("Simulation world has not been installed")]
    WorldNotInstalled,
}

/// Result type alias for all fallible operations outside the grid itself
pub type JewelbotsResult<T> = Result<T, JewelbotsError>;
