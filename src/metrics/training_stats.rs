//! Training statistics tracking for Q-learning
//!
//! Tracks episode rewards, lengths and scores with rolling windows for
//! smoothed progress lines, plus the complete per-episode reward and score
//! history for curve export.

use std::collections::VecDeque;

/// Training statistics tracker with rolling averages
///
/// # Example
///
/// ```rust
/// use q_snake::metrics::TrainingStats;
///
/// let mut stats = TrainingStats::new(100);
/// stats.record_episode(15.5, 150, 5);
/// stats.record_td_error(0.3);
///
/// assert_eq!(stats.total_episodes(), 1);
/// println!("{}", stats.format_summary());
/// ```
#[derive(Debug, Clone)]
pub struct TrainingStats {
    /// Episode rewards (rolling window)
    episode_rewards: VecDeque<f32>,

    /// Episode lengths in steps (rolling window)
    episode_lengths: VecDeque<usize>,

    /// Episode scores (food eaten) (rolling window)
    episode_scores: VecDeque<u32>,

    /// Absolute TD errors (rolling window)
    td_errors: VecDeque<f64>,

    /// Every episode's total reward, in order
    reward_history: Vec<f32>,

    /// Every episode's score, in order
    score_history: Vec<u32>,

    best_score: u32,

    /// Exploration rate at the last recorded episode
    epsilon: f64,

    /// Total number of episodes completed
    total_episodes: usize,

    /// Total number of environment steps taken
    total_steps: usize,

    /// Window size for rolling averages
    window_size: usize,
}

impl TrainingStats {
    /// Create a new training statistics tracker
    ///
    /// `window_size` is the number of recent values kept for rolling averages.
    pub fn new(window_size: usize) -> Self {
        let window_size = window_size.max(1);
        Self {
            episode_rewards: VecDeque::with_capacity(window_size),
            episode_lengths: VecDeque::with_capacity(window_size),
            episode_scores: VecDeque::with_capacity(window_size),
            td_errors: VecDeque::with_capacity(window_size),
            reward_history: Vec::new(),
            score_history: Vec::new(),
            best_score: 0,
            epsilon: 0.0,
            total_episodes: 0,
            total_steps: 0,
            window_size,
        }
    }

    /// Record the completion of an episode
    pub fn record_episode(&mut self, reward: f32, length: usize, score: u32) {
        Self::push_deque(&mut self.episode_rewards, reward, self.window_size);
        Self::push_deque(&mut self.episode_lengths, length, self.window_size);
        Self::push_deque(&mut self.episode_scores, score, self.window_size);
        self.reward_history.push(reward);
        self.score_history.push(score);
        self.best_score = self.best_score.max(score);
        self.total_episodes += 1;
        self.total_steps += length;
    }

    /// Record the magnitude of one TD error
    pub fn record_td_error(&mut self, td_error: f64) {
        Self::push_deque(&mut self.td_errors, td_error.abs(), self.window_size);
    }

    pub fn set_epsilon(&mut self, epsilon: f64) {
        self.epsilon = epsilon;
    }

    /// Get the mean episode reward over the rolling window
    pub fn mean_episode_reward(&self) -> f32 {
        if self.episode_rewards.is_empty() {
            0.0
        } else {
            self.episode_rewards.iter().sum::<f32>() / self.episode_rewards.len() as f32
        }
    }

    /// Get the mean episode length over the rolling window
    pub fn mean_episode_length(&self) -> f32 {
        let sum: usize = self.episode_lengths.iter().sum();
        if self.episode_lengths.is_empty() {
            0.0
        } else {
            sum as f32 / self.episode_lengths.len() as f32
        }
    }

    /// Get the mean episode score over the rolling window
    pub fn mean_episode_score(&self) -> f32 {
        let sum: u32 = self.episode_scores.iter().sum();
        if self.episode_scores.is_empty() {
            0.0
        } else {
            sum as f32 / self.episode_scores.len() as f32
        }
    }

    /// Mean absolute TD error over the rolling window
    pub fn mean_td_error(&self) -> f64 {
        if self.td_errors.is_empty() {
            0.0
        } else {
            self.td_errors.iter().sum::<f64>() / self.td_errors.len() as f64
        }
    }

    /// Total reward of every episode so far
    pub fn reward_history(&self) -> &[f32] {
        &self.reward_history
    }

    /// Score of every episode so far
    pub fn score_history(&self) -> &[u32] {
        &self.score_history
    }

    pub fn best_score(&self) -> u32 {
        self.best_score
    }

    pub fn epsilon(&self) -> f64 {
        self.epsilon
    }

    /// Get the total number of episodes completed
    pub fn total_episodes(&self) -> usize {
        self.total_episodes
    }

    /// Get the total number of environment steps taken
    pub fn total_steps(&self) -> usize {
        self.total_steps
    }

    /// Get the window size for rolling averages
    pub fn window_size(&self) -> usize {
        self.window_size
    }

    /// Format a summary of the current statistics
    ///
    /// ```text
    /// Episodes: 1 | Steps: 150 | Reward: 15.50 | Score: 5.00 | Best: 5 | Len: 150.0 | TD: 0.3000 | Eps: 0.900
    /// ```
    pub fn format_summary(&self) -> String {
        format!(
            "Episodes: {} | Steps: {} | Reward: {:.2} | Score: {:.2} | Best: {} | Len: {:.1} | TD: {:.4} | Eps: {:.3}",
            self.total_episodes,
            self.total_steps,
            self.mean_episode_reward(),
            self.mean_episode_score(),
            self.best_score,
            self.mean_episode_length(),
            self.mean_td_error(),
            self.epsilon,
        )
    }

    /// Helper function to push to a deque with size limit
    fn push_deque<T>(deque: &mut VecDeque<T>, value: T, window_size: usize) {
        if deque.len() >= window_size {
            deque.pop_front();
        }
        deque.push_back(value);
    }
}
