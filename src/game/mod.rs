//! Core game logic module for Snake
//!
//! This module contains all the game logic without any I/O or rendering dependencies.
//! It is driven the same way by human play, training and replay.

pub mod action;
pub mod config;
pub mod engine;
pub mod state;

// Re-export commonly used types
pub use action::{Action, Direction};
pub use config::{GameConfig, MAX_GRID_SIDE, RewardPolicy};
pub use engine::{GameEngine, StepInfo, StepResult};
pub use state::{CollisionType, GameState, Snake, Vector};
