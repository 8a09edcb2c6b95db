//! Reinforcement learning environment and agent for Snake
//!
//! Provides:
//! - Discrete state encoding (food direction relative to heading + distance bucket)
//! - RL environment interface over the game engine
//! - Sparse Q-table and epsilon-greedy Q-learning agent
//! - Q-table persistence

pub mod agent;
pub mod config;
pub mod encoder;
pub mod environment;
pub mod persistence;
pub mod q_table;

pub use agent::{ACTIONS, QLearningAgent};
pub use config::QLearningConfig;
pub use encoder::{EncodedState, encode, encode_state};
pub use environment::SnakeEnvironment;
pub use persistence::{ModelMetadata, TrainingProgress, load_q_table, save_q_table};
pub use q_table::{N_ACTIONS, QTable};

use rand::SeedableRng;
use rand::rngs::StdRng;

/// Seeded generator, or one drawn from OS entropy when no seed is given
pub fn make_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}
