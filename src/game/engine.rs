use rand::Rng;
use rand::rngs::StdRng;
use tracing::warn;

use super::{
    action::{Action, Direction},
    config::GameConfig,
    state::{CollisionType, GameState, Snake, Vector},
};
use crate::error::ConfigError;

/// Information about a step
#[derive(Debug, Clone, PartialEq)]
pub struct StepInfo {
    /// Whether the snake ate food this step
    pub ate_food: bool,
    /// Type of collision if one occurred
    pub collision: Option<CollisionType>,
}

/// Result of a game step
#[derive(Debug, Clone, PartialEq)]
pub struct StepResult {
    /// Reward for this step (for RL training)
    pub reward: f32,
    /// Whether the game has terminated
    pub terminated: bool,
    /// Additional information about the step
    pub info: StepInfo,
}

/// The game engine that handles all game logic.
///
/// All randomness (food placement) comes from the injected `rng`, so a seeded
/// engine replays the same games.
pub struct GameEngine<R: Rng = StdRng> {
    config: GameConfig,
    rng: R,
}

impl<R: Rng> GameEngine<R> {
    /// Create a new game engine, rejecting invalid configurations
    pub fn new(config: GameConfig, rng: R) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { config, rng })
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Reset the game to initial state
    pub fn reset(&mut self) -> GameState {
        let center = Vector::new(
            (self.config.grid_width / 2) as i32,
            (self.config.grid_height / 2) as i32,
        );
        let snake = Snake::new(center, Direction::Right);

        let food = self.spawn_food(&snake).unwrap_or(center);

        GameState::new(snake, food, self.config.grid_width, self.config.grid_height)
    }

    /// Execute one step of the game
    pub fn step(&mut self, state: &mut GameState, action: Action) -> StepResult {
        if !state.is_alive {
            return StepResult {
                reward: 0.0,
                terminated: true,
                info: StepInfo {
                    ate_food: false,
                    collision: None,
                },
            };
        }

        let old_distance = state.distance_to_food();
        let target = state.food;

        state.snake.turn(action);

        let new_head = state.snake.head() + state.snake.direction.delta();
        let ate_food = new_head == target;
        state.snake.advance(ate_food);

        if ate_food {
            state.score += 1;
            if let Some(food) = self.spawn_food(&state.snake) {
                state.food = food;
                debug_assert!(!state.snake.contains(state.food));
            }
        }

        let collision = check_collision(state, new_head);
        state.steps += 1;
        if collision.is_some() {
            state.is_alive = false;
        } else {
            debug_assert!(!state.snake.has_duplicate_cells());
        }

        let reward = self.reward(
            old_distance,
            new_head.manhattan_distance(target),
            ate_food,
            collision == Some(CollisionType::Wall),
        );

        StepResult {
            reward,
            terminated: collision.is_some(),
            info: StepInfo {
                ate_food,
                collision,
            },
        }
    }

    /// Reward for one transition.
    ///
    /// Precedence: food, then leaving the grid, then the per-step cost adjusted
    /// by whether the head moved toward or away from the food. Self-collision
    /// takes the last branch.
    pub fn reward(
        &self,
        old_distance: u32,
        new_distance: u32,
        ate_food: bool,
        out_of_bounds: bool,
    ) -> f32 {
        let rewards = &self.config.rewards;

        if ate_food {
            return rewards.food_reward;
        }
        if out_of_bounds {
            return rewards.wall_penalty;
        }

        let mut reward = rewards.step_penalty;
        if new_distance < old_distance {
            reward += rewards.approach_bonus;
        } else if new_distance > old_distance {
            reward -= rewards.retreat_penalty;
        }
        reward
    }

    /// Pick a uniformly random cell not covered by the snake.
    ///
    /// Rejection sampling first; on a crowded grid it falls back to drawing
    /// from the enumerated free cells. Returns `None` only when the snake
    /// fills the grid.
    fn spawn_food(&mut self, snake: &Snake) -> Option<Vector> {
        let (width, height) = (self.config.grid_width, self.config.grid_height);
        let cells = width * height;

        for _ in 0..cells.max(16) {
            let x = self.rng.gen_range(0..width) as i32;
            let y = self.rng.gen_range(0..height) as i32;
            let pos = Vector::new(x, y);

            if !snake.contains(pos) {
                return Some(pos);
            }
        }

        let free: Vec<Vector> = (0..height as i32)
            .flat_map(|y| (0..width as i32).map(move |x| Vector::new(x, y)))
            .filter(|pos| !snake.contains(*pos))
            .collect();
        if free.is_empty() {
            warn!(
                snake_len = snake.len(),
                cells, "no free cell left for food, keeping previous position"
            );
            return None;
        }
        Some(free[self.rng.gen_range(0..free.len())])
    }
}

/// Check if the new head position ends the episode
fn check_collision(state: &GameState, head: Vector) -> Option<CollisionType> {
    if !state.is_in_bounds(head) {
        return Some(CollisionType::Wall);
    }

    if state.snake.collides_with_body(head) {
        return Some(CollisionType::SelfCollision);
    }

    None
}
