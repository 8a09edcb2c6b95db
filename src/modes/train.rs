//! Training mode for the Q-learning agent
//!
//! Runs episodes in the Snake environment, letting the agent learn from every
//! step, decays exploration after each episode, reports progress to
//! observers and periodically saves checkpoints.
//!
//! # Example
//!
//! ```rust,no_run
//! use q_snake::game::GameConfig;
//! use q_snake::modes::{TrainConfig, TrainMode};
//! use q_snake::rl::QLearningConfig;
//! use std::path::PathBuf;
//!
//! let train_config = TrainConfig::new(5_000, PathBuf::from("models/snake.qtable"));
//! let mut train_mode =
//!     TrainMode::new(train_config, GameConfig::default(), QLearningConfig::default())?;
//! train_mode.run()?;
//! # Ok::<(), anyhow::Error>(())
//! ```

use anyhow::{Context, Result};
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::error::ConfigError;
use crate::game::GameConfig;
use crate::metrics::{LogObserver, TrainingObserver, TrainingStats};
use crate::rl::{
    ModelMetadata, QLearningAgent, QLearningConfig, QTable, SnakeEnvironment, TrainingProgress,
    make_rng, save_q_table,
};

/// Mixed into the seed so the agent and the environment draw from different streams
const AGENT_SEED_SALT: u64 = 0x9E37_79B9_7F4A_7C15;

/// Configuration for training mode
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainConfig {
    /// Number of episodes to train
    pub num_episodes: usize,

    /// Episodes are cut off after this many steps; 0 disables the cap
    pub max_episode_steps: usize,

    /// Path to save the final Q-table
    pub save_path: PathBuf,

    /// Save a checkpoint every N episodes; 0 disables checkpoints
    pub checkpoint_frequency: usize,

    /// Log training progress every N episodes
    pub log_frequency: usize,

    /// Episodes in the rolling statistics window
    pub stats_window: usize,

    /// Seed for both the environment and the agent; random when absent
    pub seed: Option<u64>,
}

impl Default for TrainConfig {
    fn default() -> Self {
        Self {
            num_episodes: 5_000,
            max_episode_steps: 2_000,
            save_path: PathBuf::from("models/snake.qtable"),
            checkpoint_frequency: 1_000,
            log_frequency: 100,
            stats_window: 100,
            seed: None,
        }
    }
}

impl TrainConfig {
    /// Create a new training configuration with defaults
    pub fn new(num_episodes: usize, save_path: PathBuf) -> Self {
        Self {
            num_episodes,
            save_path,
            ..Default::default()
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.num_episodes == 0 {
            return Err(ConfigError::Validation(
                "training.num_episodes must be > 0".into(),
            ));
        }
        if self.log_frequency == 0 {
            return Err(ConfigError::Validation(
                "training.log_frequency must be > 0".into(),
            ));
        }
        Ok(())
    }
}

/// Outcome of one training episode
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EpisodeSummary {
    /// Sum of step rewards
    pub reward: f32,
    pub steps: usize,
    /// Food eaten
    pub score: u32,
    /// True when the step cap ended the episode instead of a collision
    pub truncated: bool,
}

/// Training mode for the Q-learning agent
pub struct TrainMode {
    /// Agent being trained
    agent: QLearningAgent<StdRng>,

    /// Snake environment for experience collection
    env: SnakeEnvironment<StdRng>,

    /// Training statistics tracker
    stats: TrainingStats,

    config: TrainConfig,

    observers: Vec<Box<dyn TrainingObserver>>,

    /// Episodes completed so far, including those of a resumed run
    episodes_done: usize,

    /// Environment steps taken before this run started
    prior_steps: usize,
}

impl TrainMode {
    /// Create a new training mode, validating every configuration section
    pub fn new(
        config: TrainConfig,
        game_config: GameConfig,
        agent_config: QLearningConfig,
    ) -> Result<Self, ConfigError> {
        config.validate()?;

        let env = SnakeEnvironment::new(game_config, make_rng(config.seed))?;
        let agent = QLearningAgent::new(
            agent_config,
            make_rng(config.seed.map(|seed| seed ^ AGENT_SEED_SALT)),
        )?;

        let mut stats = TrainingStats::new(config.stats_window);
        stats.set_epsilon(agent.epsilon());

        Ok(Self {
            agent,
            env,
            stats,
            observers: vec![Box::new(LogObserver::new(config.num_episodes))],
            config,
            episodes_done: 0,
            prior_steps: 0,
        })
    }

    /// Register an additional observer
    pub fn add_observer(&mut self, observer: Box<dyn TrainingObserver>) {
        self.observers.push(observer);
    }

    /// Continue from a saved table
    ///
    /// Episode and step counts carry on from `metadata.progress`, so saved
    /// progress and checkpoint names keep counting instead of restarting.
    pub fn resume_from(&mut self, table: QTable, metadata: &ModelMetadata) {
        if &metadata.game_config != self.env.config() {
            warn!("resumed table was trained on a different game configuration");
        }

        let progress = metadata.progress;
        self.agent.set_q_table(table);
        self.agent.set_epsilon(progress.epsilon);
        self.stats.set_epsilon(self.agent.epsilon());
        self.episodes_done = progress.episodes_trained;
        self.prior_steps = progress.training_steps;

        info!(
            episodes_trained = progress.episodes_trained,
            training_steps = progress.training_steps,
            epsilon = progress.epsilon,
            states = metadata.states,
            "resuming from saved table"
        );
    }

    /// Episodes completed so far, including those of a resumed run
    pub fn episodes_done(&self) -> usize {
        self.episodes_done
    }

    /// Run the training loop
    ///
    /// Trains for the configured number of episodes, then saves the final
    /// table to `save_path`.
    pub fn run(&mut self) -> Result<()> {
        self.log_header();

        for _ in 0..self.config.num_episodes {
            let summary = self.run_episode();
            self.stats
                .record_episode(summary.reward, summary.steps, summary.score);

            // Decay is owned here, not by the agent
            self.agent.decay_epsilon();
            self.stats.set_epsilon(self.agent.epsilon());
            self.episodes_done += 1;

            debug!(
                episode = self.episodes_done,
                reward = summary.reward,
                steps = summary.steps,
                score = summary.score,
                truncated = summary.truncated,
                "episode finished"
            );

            if self.episodes_done % self.config.log_frequency == 0 {
                self.notify_log_interval()?;
            }

            if self.config.checkpoint_frequency > 0
                && self.episodes_done % self.config.checkpoint_frequency == 0
            {
                self.save_checkpoint()?;
            }
        }

        for observer in &mut self.observers {
            observer.on_training_end(&self.stats)?;
        }

        self.save_table(&self.config.save_path)
            .with_context(|| format!("Failed to save final table to {:?}", self.config.save_path))?;
        info!(path = ?self.config.save_path, "training complete, table saved");

        Ok(())
    }

    /// Run a single training episode
    pub fn run_episode(&mut self) -> EpisodeSummary {
        self.env.reset();
        let mut reward = 0.0;
        let mut steps = 0;
        let mut done = false;
        let cap = self.config.max_episode_steps;

        while !done && (cap == 0 || steps < cap) {
            let (_state, step_reward, terminated) = self.agent.make_step(&mut self.env);
            self.stats.record_td_error(self.agent.last_td_error());

            reward += step_reward;
            steps += 1;
            done = terminated;
        }

        EpisodeSummary {
            reward,
            steps,
            score: self.env.state().score,
            truncated: !done,
        }
    }

    pub fn stats(&self) -> &TrainingStats {
        &self.stats
    }

    pub fn agent(&self) -> &QLearningAgent<StdRng> {
        &self.agent
    }

    fn notify_log_interval(&mut self) -> Result<()> {
        let rewards = self.stats.reward_history();
        let scores = self.stats.score_history();
        for observer in &mut self.observers {
            observer.on_log_interval(self.episodes_done, rewards, scores, &self.stats)?;
        }
        Ok(())
    }

    /// Save a checkpoint next to the final table
    fn save_checkpoint(&self) -> Result<()> {
        let checkpoint_path = self
            .config
            .save_path
            .parent()
            .unwrap_or(Path::new("."))
            .join(format!("checkpoint_ep{}.qtable", self.episodes_done));

        self.save_table(&checkpoint_path)
            .with_context(|| format!("Failed to save checkpoint to {:?}", checkpoint_path))?;

        info!(path = ?checkpoint_path, "checkpoint saved");
        Ok(())
    }

    fn save_table(&self, path: &Path) -> Result<()> {
        let table = self.agent.q_table();
        let metadata = ModelMetadata::new(
            self.agent.config().clone(),
            self.env.config().clone(),
            TrainingProgress {
                episodes_trained: self.episodes_done,
                training_steps: self.prior_steps + self.stats.total_steps(),
                epsilon: self.agent.epsilon(),
            },
            table.len(),
        );
        save_q_table(table, &metadata, path)?;
        Ok(())
    }

    fn log_header(&self) {
        let game = self.env.config();
        let agent = self.agent.config();
        info!(
            episodes = self.config.num_episodes,
            grid = %format!("{}x{}", game.grid_width, game.grid_height),
            max_episode_steps = self.config.max_episode_steps,
            seed = ?self.config.seed,
            "starting Q-learning training"
        );
        info!(
            learning_rate = agent.learning_rate,
            discount_factor = agent.discount_factor,
            epsilon = agent.epsilon,
            epsilon_decay = agent.epsilon_decay,
            min_epsilon = agent.min_epsilon,
            "agent hyperparameters"
        );
        info!(
            checkpoint_frequency = self.config.checkpoint_frequency,
            log_frequency = self.config.log_frequency,
            save_path = ?self.config.save_path,
            "output"
        );
    }
}
