//! Q-learning hyperparameter configuration

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Configuration for the tabular Q-learning agent
///
/// # Example
///
/// ```rust
/// use q_snake::rl::QLearningConfig;
///
/// let config = QLearningConfig {
///     learning_rate: 0.2,
///     ..Default::default()
/// };
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QLearningConfig {
    /// Step size α of the temporal-difference update, in (0, 1]
    ///
    /// Default: 0.1
    pub learning_rate: f64,

    /// Discount factor γ for future rewards, in [0, 1)
    ///
    /// Default: 0.95
    pub discount_factor: f64,

    /// Initial exploration rate ε, in [0, 1]
    ///
    /// Default: 1.0
    pub epsilon: f64,

    /// Multiplicative decay applied to ε after every episode, in (0, 1]
    ///
    /// Default: 0.995
    pub epsilon_decay: f64,

    /// Floor for ε, in [0, epsilon]
    ///
    /// Default: 0.01
    pub min_epsilon: f64,
}

impl Default for QLearningConfig {
    fn default() -> Self {
        Self {
            learning_rate: 0.1,
            discount_factor: 0.95,
            epsilon: 1.0,
            epsilon_decay: 0.995,
            min_epsilon: 0.01,
        }
    }
}

impl QLearningConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate configuration parameters
    pub fn validate(&self) -> Result<(), ConfigError> {
        check(
            "learning_rate",
            self.learning_rate,
            "(0, 1]",
            self.learning_rate > 0.0 && self.learning_rate <= 1.0,
        )?;
        check(
            "discount_factor",
            self.discount_factor,
            "[0, 1)",
            (0.0..1.0).contains(&self.discount_factor),
        )?;
        check(
            "epsilon",
            self.epsilon,
            "[0, 1]",
            (0.0..=1.0).contains(&self.epsilon),
        )?;
        check(
            "epsilon_decay",
            self.epsilon_decay,
            "(0, 1]",
            self.epsilon_decay > 0.0 && self.epsilon_decay <= 1.0,
        )?;
        check(
            "min_epsilon",
            self.min_epsilon,
            "[0, epsilon]",
            self.min_epsilon >= 0.0 && self.min_epsilon <= self.epsilon,
        )?;
        Ok(())
    }
}

fn check(name: &'static str, value: f64, expected: &'static str, ok: bool) -> Result<(), ConfigError> {
    if ok {
        Ok(())
    } else {
        Err(ConfigError::InvalidHyperparameter {
            name,
            value,
            expected,
        })
    }
}
