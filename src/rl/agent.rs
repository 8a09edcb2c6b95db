//! Epsilon-greedy tabular Q-learning agent
//!
//! The agent keeps a [`QTable`] keyed by [`EncodedState`] and learns from
//! single transitions with the one-step temporal-difference rule
//!
//! ```text
//! Q(s,a) ← Q(s,a) + α [r + γ max_a' Q(s',a') − Q(s,a)]
//! ```
//!
//! where the bootstrap term is zero for terminal transitions.

use rand::Rng;
use rand::rngs::StdRng;

use super::config::QLearningConfig;
use super::encoder::EncodedState;
use super::environment::SnakeEnvironment;
use super::q_table::{self, N_ACTIONS, QTable};
use crate::error::ConfigError;
use crate::game::Action;

/// Action chosen by each agent index
pub const ACTIONS: [Action; N_ACTIONS] = [Action::Left, Action::Right, Action::Straight];

/// Q-learning agent (off-policy TD control)
pub struct QLearningAgent<R: Rng = StdRng> {
    q_table: QTable,
    config: QLearningConfig,
    epsilon: f64,
    last_td_error: f64,
    rng: R,
}

impl<R: Rng> QLearningAgent<R> {
    /// Create an agent with an empty table
    ///
    /// Fails if any hyperparameter is outside its valid range.
    pub fn new(config: QLearningConfig, rng: R) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            q_table: QTable::new(),
            epsilon: config.epsilon,
            last_td_error: 0.0,
            config,
            rng,
        })
    }

    /// Start from a previously learned table
    pub fn with_q_table(mut self, q_table: QTable) -> Self {
        self.q_table = q_table;
        self
    }

    pub fn set_q_table(&mut self, q_table: QTable) {
        self.q_table = q_table;
    }

    /// ε-greedy action selection
    ///
    /// Unseen states are added to the table with zero values.
    pub fn get_action(&mut self, state: EncodedState) -> usize {
        if self.rng.gen_bool(self.epsilon) {
            self.rng.gen_range(0..N_ACTIONS)
        } else {
            q_table::argmax(self.q_table.values_mut(state))
        }
    }

    /// Greedy action without exploration or table growth
    pub fn greedy_action(&self, state: &EncodedState) -> usize {
        q_table::argmax(&self.q_table.values(state))
    }

    /// Apply one temporal-difference update and return the TD error
    ///
    /// `action_index` indexes [`ACTIONS`], as returned by
    /// [`get_action`](Self::get_action).
    ///
    /// # Panics
    ///
    /// Panics if `action_index >= N_ACTIONS`.
    pub fn update(
        &mut self,
        old_state: EncodedState,
        action_index: usize,
        new_state: EncodedState,
        reward: f32,
        done: bool,
    ) -> f64 {
        debug_assert!(
            action_index < N_ACTIONS,
            "action index {action_index} out of range"
        );
        let max_future_q = if done {
            0.0
        } else {
            q_table::max_value(self.q_table.values_mut(new_state))
        };

        let alpha = self.config.learning_rate;
        let gamma = self.config.discount_factor;
        let current_q = &mut self.q_table.values_mut(old_state)[action_index];

        let td_error = f64::from(reward) + gamma * max_future_q - *current_q;
        *current_q += alpha * td_error;
        self.last_td_error = td_error;
        td_error
    }

    /// Observe, act and learn from one environment step
    pub fn make_step<E: Rng>(
        &mut self,
        env: &mut SnakeEnvironment<E>,
    ) -> (EncodedState, f32, bool) {
        let old_state = env.encoded_state();
        let action_index = self.get_action(old_state);
        let (new_state, reward, done) = env.step(ACTIONS[action_index]);
        self.update(old_state, action_index, new_state, reward, done);
        (new_state, reward, done)
    }

    /// TD error of the most recent update
    pub fn last_td_error(&self) -> f64 {
        self.last_td_error
    }

    pub fn epsilon(&self) -> f64 {
        self.epsilon
    }

    /// Override ε, clamped to [0, 1]
    pub fn set_epsilon(&mut self, epsilon: f64) {
        self.epsilon = epsilon.clamp(0.0, 1.0);
    }

    /// Multiply ε by the configured decay, never going below the floor
    pub fn decay_epsilon(&mut self) {
        self.epsilon = (self.epsilon * self.config.epsilon_decay).max(self.config.min_epsilon);
    }

    pub fn config(&self) -> &QLearningConfig {
        &self.config
    }

    pub fn q_table(&self) -> &QTable {
        &self.q_table
    }

    pub fn into_q_table(self) -> QTable {
        self.q_table
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{Direction, GameConfig, GameState, Snake, Vector};
    use rand::SeedableRng;

    fn agent(config: QLearningConfig) -> QLearningAgent {
        QLearningAgent::new(config, StdRng::seed_from_u64(3)).unwrap()
    }

    fn greedy() -> QLearningConfig {
        QLearningConfig {
            epsilon: 0.0,
            min_epsilon: 0.0,
            ..Default::default()
        }
    }

    fn state(ahead: bool, level: u8) -> EncodedState {
        EncodedState {
            food_ahead: ahead,
            food_left: !ahead,
            food_right: false,
            distance_level: level,
        }
    }

    #[test]
    fn test_action_mapping() {
        assert_eq!(ACTIONS, [Action::Left, Action::Right, Action::Straight]);
    }

    #[test]
    #[should_panic(expected = "out of")]
    fn test_update_rejects_bad_action_index() {
        let mut agent = agent(greedy());
        agent.update(state(true, 0), N_ACTIONS, state(true, 0), 1.0, false);
    }

    #[test]
    fn test_invalid_hyperparameters_rejected() {
        let config = QLearningConfig {
            learning_rate: 0.0,
            ..Default::default()
        };
        assert!(QLearningAgent::new(config, StdRng::seed_from_u64(0)).is_err());

        let config = QLearningConfig {
            discount_factor: 1.0,
            ..Default::default()
        };
        assert!(QLearningAgent::new(config, StdRng::seed_from_u64(0)).is_err());
    }

    #[test]
    fn test_get_action_in_range() {
        let mut explorer = agent(QLearningConfig::default());
        let mut exploiter = agent(greedy());

        for level in 0..4 {
            for ahead in [true, false] {
                for _ in 0..50 {
                    assert!(explorer.get_action(state(ahead, level)) < N_ACTIONS);
                    assert!(exploiter.get_action(state(ahead, level)) < N_ACTIONS);
                }
            }
        }
    }

    #[test]
    fn test_full_exploration_covers_all_actions() {
        let mut agent = agent(QLearningConfig::default());
        let mut seen = [false; N_ACTIONS];
        for _ in 0..200 {
            seen[agent.get_action(state(true, 0))] = true;
        }
        assert_eq!(seen, [true; N_ACTIONS]);
    }

    #[test]
    fn test_greedy_picks_best_and_first_on_ties() {
        let mut agent = agent(greedy());
        let s = state(true, 1);

        // Unseen: all zeros, first index wins and the state is inserted
        assert_eq!(agent.get_action(s), 0);
        assert!(agent.q_table().contains(&s));

        agent.update(s, 2, s, 1.0, true);
        assert_eq!(agent.get_action(s), 2);
        assert_eq!(agent.greedy_action(&s), 2);
    }

    #[test]
    fn test_update_non_terminal() {
        let mut agent = agent(greedy());
        let old = state(true, 0);
        let new = state(false, 1);

        // Q(new) = [0, 1, 0] after this terminal update with α = 0.1, r = 10
        agent.update(new, 1, new, 10.0, true);
        assert!((agent.q_table().values(&new)[1] - 1.0).abs() < 1e-12);

        let td_error = agent.update(old, 0, new, 0.45, false);

        // 0 + 0.1 * (0.45 + 0.95 * 1.0 - 0) = 0.14
        let expected = 0.1 * (f64::from(0.45f32) + 0.95);
        assert!((agent.q_table().values(&old)[0] - expected).abs() < 1e-12);
        assert!((td_error - (f64::from(0.45f32) + 0.95)).abs() < 1e-12);
    }

    #[test]
    fn test_update_terminal_ignores_future() {
        let mut agent = agent(greedy());
        let old = state(true, 0);
        let new = state(false, 3);
        agent.update(new, 0, new, 5.0, false);

        agent.update(old, 2, new, -10.0, true);
        assert!((agent.q_table().values(&old)[2] - (-1.0)).abs() < 1e-12);
    }

    #[test]
    fn test_update_is_deterministic_from_same_table() {
        let mut first = agent(greedy());
        first.update(state(false, 2), 1, state(false, 2), 3.0, false);
        let mut second = agent(greedy()).with_q_table(first.q_table().clone());

        let a = first.update(state(true, 0), 1, state(false, 2), -0.3, false);
        let b = second.update(state(true, 0), 1, state(false, 2), -0.3, false);

        assert_eq!(a.to_bits(), b.to_bits());
        assert_eq!(first.q_table(), second.q_table());
    }

    #[test]
    fn test_epsilon_decay_reaches_floor() {
        let mut agent = agent(QLearningConfig {
            epsilon_decay: 0.5,
            min_epsilon: 0.1,
            ..Default::default()
        });
        agent.decay_epsilon();
        assert_eq!(agent.epsilon(), 0.5);
        for _ in 0..10 {
            agent.decay_epsilon();
        }
        assert_eq!(agent.epsilon(), 0.1);

        agent.set_epsilon(3.0);
        assert_eq!(agent.epsilon(), 1.0);
    }

    #[test]
    fn test_make_step_learns_from_transition() {
        let mut env = SnakeEnvironment::new(GameConfig::new(20, 20), StdRng::seed_from_u64(1))
            .unwrap();
        env.set_state(GameState::new(
            Snake::new(Vector::new(0, 5), Direction::Left),
            Vector::new(10, 10),
            20,
            20,
        ));
        let before = env.encoded_state();

        let mut agent = agent(greedy());
        let (_, reward, done) = agent.make_step(&mut env);

        // Greedy on an empty table turns Left: from Left that is Down, (0, 6)
        assert_eq!(env.state().snake.head(), Vector::new(0, 6));
        assert!(!done);
        // Distance to (10,10) drops from 15 to 14
        assert_eq!(reward, -0.05 + 0.5);
        let learned = agent.q_table().values(&before)[0];
        assert!((learned - 0.1 * f64::from(reward)).abs() < 1e-9);
    }
}
