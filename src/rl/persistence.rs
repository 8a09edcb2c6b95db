//! Q-table persistence for saving and loading trained agents
//!
//! A saved agent is two files:
//! - `<path>` - the Q-table entries, MessagePack encoded
//! - `<path>.meta.json` - training metadata as JSON
//!
//! Entries are written sorted by state so that saving the same table twice
//! produces identical bytes.

use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};

use super::QLearningConfig;
use super::encoder::EncodedState;
use super::q_table::{ActionValues, QTable};
use crate::error::PersistenceError;
use crate::game::GameConfig;

/// Current on-disk format version of [`SavedQTable`]
pub const FORMAT_VERSION: u32 = 1;

/// Serialized form of a Q-table
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SavedQTable {
    pub version: u32,
    pub entries: Vec<(EncodedState, ActionValues)>,
}

impl SavedQTable {
    pub fn from_table(table: &QTable) -> Self {
        Self {
            version: FORMAT_VERSION,
            entries: table.sorted_entries(),
        }
    }

    pub fn into_table(self) -> Result<QTable, PersistenceError> {
        if self.version != FORMAT_VERSION {
            return Err(PersistenceError::UnsupportedVersion {
                found: self.version,
                expected: FORMAT_VERSION,
            });
        }
        Ok(self.entries.into_iter().collect())
    }
}

/// How far training had progressed when the table was saved
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct TrainingProgress {
    pub episodes_trained: usize,
    pub training_steps: usize,
    pub epsilon: f64,
}

/// Metadata saved with the table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelMetadata {
    /// Agent hyperparameters used during training
    pub agent_config: QLearningConfig,

    /// Game the table was trained on
    pub game_config: GameConfig,

    pub progress: TrainingProgress,

    /// Number of distinct states in the table
    pub states: usize,

    /// Crate version that wrote the files
    pub version: String,
}

impl ModelMetadata {
    pub fn new(
        agent_config: QLearningConfig,
        game_config: GameConfig,
        progress: TrainingProgress,
        states: usize,
    ) -> Self {
        Self {
            agent_config,
            game_config,
            progress,
            states,
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

/// Path of the metadata sidecar for a table file
pub fn metadata_path(path: &Path) -> PathBuf {
    path.with_extension("meta.json")
}

/// Save a Q-table and its metadata
///
/// Creates parent directories if they don't exist.
pub fn save_q_table(
    table: &QTable,
    metadata: &ModelMetadata,
    path: &Path,
) -> Result<(), PersistenceError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|source| PersistenceError::Io {
            path: parent.to_path_buf(),
            source,
        })?;
    }

    let file = File::create(path).map_err(|source| PersistenceError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let mut writer = BufWriter::new(file);
    rmp_serde::encode::write(&mut writer, &SavedQTable::from_table(table))?;

    let meta_path = metadata_path(path);
    let meta_json = serde_json::to_string_pretty(metadata)?;
    std::fs::write(&meta_path, meta_json).map_err(|source| PersistenceError::Io {
        path: meta_path,
        source,
    })?;

    Ok(())
}

/// Load a Q-table and its metadata
pub fn load_q_table(path: &Path) -> Result<(QTable, ModelMetadata), PersistenceError> {
    let meta_path = metadata_path(path);
    let meta_json = std::fs::read_to_string(&meta_path).map_err(|source| PersistenceError::Io {
        path: meta_path.clone(),
        source,
    })?;
    let metadata: ModelMetadata = serde_json::from_str(&meta_json)?;

    let file = File::open(path).map_err(|source| PersistenceError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let saved: SavedQTable = rmp_serde::decode::from_read(BufReader::new(file))?;

    Ok((saved.into_table()?, metadata))
}
