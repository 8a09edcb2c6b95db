use serde::{Deserialize, Serialize};

use crate::game::{Direction, GameState, Vector};

/// Number of distance buckets in an encoded state
pub const DISTANCE_LEVELS: u8 = 4;

/// Width of one distance bucket, in cells
const DISTANCE_BUCKET: u32 = 5;

/// Agent-visible summary of a game state, used as the Q-table key
///
/// Food flags are relative to the current heading. `distance_level` is the
/// Manhattan distance to the food bucketed into `0..DISTANCE_LEVELS`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EncodedState {
    pub food_ahead: bool,
    pub food_left: bool,
    pub food_right: bool,
    pub distance_level: u8,
}

/// Encode the current state of a game
pub fn encode_state(state: &GameState) -> EncodedState {
    encode(state.snake.direction, state.snake.head(), state.food)
}

/// Encode a (heading, head, food) triple
pub fn encode(heading: Direction, head: Vector, food: Vector) -> EncodedState {
    let (food_ahead, food_left, food_right) = match heading {
        Direction::Right => (head.x < food.x, head.y > food.y, head.y < food.y),
        Direction::Left => (head.x > food.x, head.y < food.y, head.y > food.y),
        Direction::Down => (head.y < food.y, head.x < food.x, head.x > food.x),
        Direction::Up => (head.y > food.y, head.x > food.x, head.x < food.x),
    };

    EncodedState {
        food_ahead,
        food_left,
        food_right,
        distance_level: distance_level(head.manhattan_distance(food)),
    }
}

/// Bucket a Manhattan distance: `distance / 5`, capped at the last level
pub fn distance_level(distance: u32) -> u8 {
    (distance / DISTANCE_BUCKET).min(u32::from(DISTANCE_LEVELS - 1)) as u8
}
