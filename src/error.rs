use std::path::PathBuf;

/// Errors raised while building or loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{name} must be in {expected}, got {value}")]
    InvalidHyperparameter {
        name: &'static str,
        value: f64,
        expected: &'static str,
    },

    #[error(
        "grid must be between 1x1 and {max}x{max}, got {width}x{height}",
        max = crate::game::MAX_GRID_SIDE
    )]
    InvalidGrid { width: usize, height: usize },

    #[error("config validation error: {0}")]
    Validation(String),

    #[error("failed to read config file {path}: {source}")]
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse TOML: {0}")]
    TomlParse(#[from] toml::de::Error),
}

/// Errors raised while saving or loading a Q-table.
#[derive(Debug, thiserror::Error)]
pub enum PersistenceError {
    #[error("unsupported Q-table format version {found} (expected {expected})")]
    UnsupportedVersion { found: u32, expected: u32 },

    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to encode Q-table: {0}")]
    Encode(#[from] rmp_serde::encode::Error),

    #[error("failed to decode Q-table: {0}")]
    Decode(#[from] rmp_serde::decode::Error),

    #[error("metadata error: {0}")]
    Metadata(#[from] serde_json::Error),
}
