use rand::Rng;
use rand::rngs::StdRng;

use super::encoder::{EncodedState, encode_state};
use crate::error::ConfigError;
use crate::game::{Action, GameConfig, GameEngine, GameState, StepResult};

/// Snake environment for reinforcement learning
///
/// Wraps the game engine and the live game state behind the usual RL
/// interface:
/// - Encoded observations (food direction flags + distance bucket)
/// - Relative action space (Left, Right, Straight)
/// - `reset` / `step`
///
/// `step` has no I/O side effects; drawing and frame pacing belong to the
/// caller.
pub struct SnakeEnvironment<R: Rng = StdRng> {
    engine: GameEngine<R>,
    state: GameState,
    last_step: Option<StepResult>,
}

impl<R: Rng> SnakeEnvironment<R> {
    /// Create a new Snake environment and start its first episode
    pub fn new(config: GameConfig, rng: R) -> Result<Self, ConfigError> {
        let mut engine = GameEngine::new(config, rng)?;
        let state = engine.reset();
        Ok(Self {
            engine,
            state,
            last_step: None,
        })
    }

    /// Start a new episode and return its initial observation
    pub fn reset(&mut self) -> EncodedState {
        self.state = self.engine.reset();
        self.last_step = None;
        self.encoded_state()
    }

    /// Advance the game by one relative turn
    ///
    /// Returns: (observation, reward, done). Once `done` is true the episode
    /// must be `reset` before stepping again; further steps are ignored and
    /// yield a zero reward.
    pub fn step(&mut self, action: Action) -> (EncodedState, f32, bool) {
        let result = self.engine.step(&mut self.state, action);
        let reward = result.reward;
        let done = result.terminated;
        self.last_step = Some(result);

        (self.encoded_state(), reward, done)
    }

    /// Current observation without stepping
    pub fn encoded_state(&self) -> EncodedState {
        encode_state(&self.state)
    }

    /// Whether the current episode has ended
    pub fn is_done(&self) -> bool {
        !self.state.is_alive
    }

    /// Full result of the most recent step, if any since the last reset
    pub fn last_step(&self) -> Option<&StepResult> {
        self.last_step.as_ref()
    }

    /// Get reference to current game state (for rendering and debugging)
    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Replace the live game state (for scripted scenarios)
    pub fn set_state(&mut self, state: GameState) {
        self.state = state;
        self.last_step = None;
    }

    pub fn config(&self) -> &GameConfig {
        self.engine.config()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{CollisionType, Direction, Snake, Vector};
    use rand::SeedableRng;

    fn env(config: GameConfig) -> SnakeEnvironment {
        SnakeEnvironment::new(config, StdRng::seed_from_u64(7)).unwrap()
    }

    fn place(env: &mut SnakeEnvironment, head: Vector, direction: Direction, food: Vector) {
        let (w, h) = (env.config().grid_width, env.config().grid_height);
        env.set_state(GameState::new(Snake::new(head, direction), food, w, h));
    }

    #[test]
    fn test_environment_creation() {
        let env = env(GameConfig::default());

        assert!(env.state().is_alive);
        assert_eq!(env.state().score, 0);
        assert_eq!(env.state().steps, 0);
        assert!(!env.is_done());
        assert!(env.last_step().is_none());
    }

    #[test]
    fn test_invalid_config_fails_fast() {
        let result = SnakeEnvironment::new(GameConfig::new(10, 0), StdRng::seed_from_u64(0));
        assert!(result.is_err());
    }

    #[test]
    fn test_scenario_step_toward_food() {
        let mut env = env(GameConfig::new(20, 20));
        place(&mut env, Vector::new(10, 10), Direction::Right, Vector::new(15, 10));

        let (obs, reward, done) = env.step(Action::Straight);

        assert_eq!(env.state().snake.head(), Vector::new(11, 10));
        assert_eq!(env.state().distance_to_food(), 4);
        assert_eq!(reward, -0.05 + 0.5);
        assert!(!done);
        assert!(obs.food_ahead);
        assert_eq!(obs.distance_level, 0);
    }

    #[test]
    fn test_scenario_wall() {
        let mut env = env(GameConfig::new(20, 20));
        place(&mut env, Vector::new(0, 5), Direction::Left, Vector::new(10, 10));

        let (_obs, reward, done) = env.step(Action::Straight);

        assert_eq!(env.state().snake.head(), Vector::new(-1, 5));
        assert_eq!(reward, -10.0);
        assert!(done);
        assert!(env.is_done());
        assert_eq!(
            env.last_step().and_then(|s| s.info.collision),
            Some(CollisionType::Wall)
        );
    }

    #[test]
    fn test_scenario_eat_food() {
        let mut env = env(GameConfig::new(20, 20));
        place(&mut env, Vector::new(10, 10), Direction::Right, Vector::new(10, 11));

        // Right turned Right is Down, onto the food
        let (_obs, reward, done) = env.step(Action::Right);

        assert_eq!(reward, 10.0);
        assert!(!done);
        assert_eq!(env.state().score, 1);
        assert_eq!(env.state().snake.len(), 2);
        assert_ne!(env.state().food, Vector::new(10, 11));
        assert!(!env.state().snake.contains(env.state().food));
    }

    #[test]
    fn test_food_flags_match_turns() {
        let mut env = env(GameConfig::new(20, 20));
        let head = Vector::new(10, 10);

        for direction in Direction::ALL {
            for dx in -3..=3 {
                for dy in -3..=3 {
                    let food = Vector::new(head.x + dx, head.y + dy);
                    if food == head {
                        continue;
                    }
                    place(&mut env, head, direction, food);
                    let obs = env.encoded_state();
                    let before = head.manhattan_distance(food);

                    for (flag, action) in [
                        (obs.food_ahead, Action::Straight),
                        (obs.food_left, Action::Left),
                        (obs.food_right, Action::Right),
                    ] {
                        if !flag {
                            continue;
                        }
                        place(&mut env, head, direction, food);
                        env.step(action);
                        let after = env.state().snake.head().manhattan_distance(food);
                        assert!(
                            after < before,
                            "{direction:?} {action:?} toward {food:?} went from {before} to {after}"
                        );
                    }
                }
            }
        }
    }

    #[test]
    fn test_reset_after_terminal() {
        let mut env = env(GameConfig::small());
        place(&mut env, Vector::new(0, 5), Direction::Left, Vector::new(5, 5));
        let (_, _, done) = env.step(Action::Straight);
        assert!(done);

        // Stepping a finished episode changes nothing
        let (_, reward, done) = env.step(Action::Straight);
        assert!(done);
        assert_eq!(reward, 0.0);

        let obs = env.reset();
        assert!(!env.is_done());
        assert_eq!(env.state().snake.head(), Vector::new(5, 5));
        assert_eq!(obs, env.encoded_state());
    }

    #[test]
    fn test_multiple_episodes() {
        let mut env = env(GameConfig::small());

        for _ in 0..2 {
            env.reset();
            let mut steps = 0;
            let mut done = false;

            // Going straight from the centre must hit the wall
            while !done && steps < 100 {
                let (_obs, _reward, terminated) = env.step(Action::Straight);
                done = terminated;
                steps += 1;
            }

            assert!(done);
            assert!(steps <= 10);
        }
    }
}
