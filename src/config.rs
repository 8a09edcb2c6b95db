use std::path::Path;

use tracing::warn;

use crate::error::ConfigError;
use crate::game::GameConfig;
use crate::modes::TrainConfig;
use crate::rl::QLearningConfig;

/// Top-level application configuration, loadable from TOML.
///
/// ```toml
/// [game]
/// grid_width = 20
/// grid_height = 20
///
/// [game.rewards]
/// food_reward = 10.0
///
/// [agent]
/// learning_rate = 0.1
/// epsilon_decay = 0.995
///
/// [training]
/// num_episodes = 5000
/// seed = 42
/// ```
///
/// Missing sections and keys fall back to their defaults.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub game: GameConfig,
    pub agent: QLearningConfig,
    pub training: TrainConfig,
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FileRead {
            path: path.to_path_buf(),
            source: e,
        })?;
        let config: AppConfig = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file, falling back to defaults if the file
    /// does not exist.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::load(path)
        } else {
            warn!(path = %path.display(), "config file not found, using defaults");
            Ok(Self::default())
        }
    }

    /// Validate every section.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.game.validate()?;
        self.agent.validate()?;
        self.training.validate()
    }
}
