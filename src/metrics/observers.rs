//! Observers for training runs
//!
//! Observers receive the learning curves at every log interval without
//! feeding anything back into training.

use anyhow::{Context, Result};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::info;

use super::TrainingStats;

/// Receives training progress once per log interval
pub trait TrainingObserver {
    /// Called after episode `episode` (1-based) when it closes a log interval.
    ///
    /// `rewards` and `scores` hold every episode so far, oldest first.
    fn on_log_interval(
        &mut self,
        episode: usize,
        rewards: &[f32],
        scores: &[u32],
        stats: &TrainingStats,
    ) -> Result<()>;

    /// Called once after the last episode
    fn on_training_end(&mut self, _stats: &TrainingStats) -> Result<()> {
        Ok(())
    }
}

/// Emits one progress line per interval through `tracing`
#[derive(Debug, Default)]
pub struct LogObserver {
    total_episodes: usize,
}

impl LogObserver {
    pub fn new(total_episodes: usize) -> Self {
        Self { total_episodes }
    }
}

impl TrainingObserver for LogObserver {
    fn on_log_interval(
        &mut self,
        episode: usize,
        _rewards: &[f32],
        _scores: &[u32],
        stats: &TrainingStats,
    ) -> Result<()> {
        info!(
            episode,
            total = self.total_episodes,
            mean_reward = stats.mean_episode_reward(),
            mean_score = stats.mean_episode_score(),
            best_score = stats.best_score(),
            epsilon = stats.epsilon(),
            "{}",
            stats.format_summary()
        );
        Ok(())
    }

    fn on_training_end(&mut self, stats: &TrainingStats) -> Result<()> {
        info!("final statistics: {}", stats.format_summary());
        Ok(())
    }
}

/// Appends `episode,reward,score` rows to a CSV file
pub struct CsvCurveObserver {
    writer: BufWriter<File>,
    path: PathBuf,
    written: usize,
}

impl CsvCurveObserver {
    /// Create the file (and parent directories) and write the header
    pub fn create(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {:?}", parent))?;
        }
        let file = File::create(path)
            .with_context(|| format!("Failed to create curve file {:?}", path))?;
        let mut writer = BufWriter::new(file);
        writeln!(writer, "episode,reward,score")?;

        Ok(Self {
            writer,
            path: path.to_path_buf(),
            written: 0,
        })
    }

    fn write_pending(&mut self, rewards: &[f32], scores: &[u32]) -> Result<()> {
        for (i, (reward, score)) in rewards
            .iter()
            .zip(scores)
            .enumerate()
            .skip(self.written)
        {
            writeln!(self.writer, "{},{},{}", i + 1, reward, score)
                .with_context(|| format!("Failed to write to {:?}", self.path))?;
        }
        self.written = rewards.len().min(scores.len());
        self.writer.flush()?;
        Ok(())
    }
}

impl TrainingObserver for CsvCurveObserver {
    fn on_log_interval(
        &mut self,
        _episode: usize,
        rewards: &[f32],
        scores: &[u32],
        _stats: &TrainingStats,
    ) -> Result<()> {
        self.write_pending(rewards, scores)
    }

    fn on_training_end(&mut self, stats: &TrainingStats) -> Result<()> {
        self.write_pending(stats.reward_history(), stats.score_history())
    }
}
