//! Q Snake - Snake on a grid with a tabular Q-learning agent
//!
//! This library provides:
//! - Core game logic with relative turns and shaped rewards (game module)
//! - State encoding, Q-table, epsilon-greedy agent and persistence (rl module)
//! - Training statistics and observers (metrics module)
//! - TUI rendering and keyboard input (render, input modules)
//! - Execution modes: human play, training, watching a saved table (modes module)

pub mod config;
pub mod error;
pub mod game;
pub mod input;
pub mod metrics;
pub mod modes;
pub mod render;
pub mod rl;

pub use config::AppConfig;
pub use error::{ConfigError, PersistenceError};
