use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Largest accepted grid width or height; keeps cell counts and coordinates
/// well inside `usize` and `i32`
pub const MAX_GRID_SIDE: usize = 1024;

/// Reward shaping for a single step
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RewardPolicy {
    /// Reward for landing on food
    pub food_reward: f32,
    /// Reward for leaving the grid
    pub wall_penalty: f32,
    /// Base reward of every other step
    pub step_penalty: f32,
    /// Added when the head moved closer to the food
    pub approach_bonus: f32,
    /// Subtracted when the head moved away from the food
    pub retreat_penalty: f32,
}

impl Default for RewardPolicy {
    fn default() -> Self {
        Self {
            food_reward: 10.0,
            wall_penalty: -10.0,
            step_penalty: -0.05,
            approach_bonus: 0.5,
            retreat_penalty: 0.25,
        }
    }
}

/// Configuration for the game
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Width of the game grid
    pub grid_width: usize,
    /// Height of the game grid
    pub grid_height: usize,
    /// Rewards (for RL)
    pub rewards: RewardPolicy,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            grid_width: 20,
            grid_height: 20,
            rewards: RewardPolicy::default(),
        }
    }
}

impl GameConfig {
    /// Create a new configuration with custom grid size
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            grid_width: width,
            grid_height: height,
            ..Default::default()
        }
    }

    /// Create a small grid for testing
    pub fn small() -> Self {
        Self::new(10, 10)
    }

    /// Reject empty or oversized grids and non-finite rewards
    pub fn validate(&self) -> Result<(), ConfigError> {
        let side_ok = |side: usize| (1..=MAX_GRID_SIDE).contains(&side);
        if !side_ok(self.grid_width) || !side_ok(self.grid_height) {
            return Err(ConfigError::InvalidGrid {
                width: self.grid_width,
                height: self.grid_height,
            });
        }

        let r = &self.rewards;
        let all_finite = [
            r.food_reward,
            r.wall_penalty,
            r.step_penalty,
            r.approach_bonus,
            r.retreat_penalty,
        ]
        .iter()
        .all(|v| v.is_finite());
        if !all_finite {
            return Err(ConfigError::Validation(
                "rewards must be finite numbers".into(),
            ));
        }

        Ok(())
    }
}
