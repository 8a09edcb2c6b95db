use std::collections::VecDeque;
use std::ops::Add;

use serde::{Deserialize, Serialize};

use super::action::{Action, Direction};

/// A cell on the game grid, or an offset between two cells
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Vector {
    pub x: i32,
    pub y: i32,
}

impl Vector {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Sum of absolute coordinate differences
    pub fn manhattan_distance(self, other: Vector) -> u32 {
        self.x.abs_diff(other.x) + self.y.abs_diff(other.y)
    }
}

impl Add for Vector {
    type Output = Vector;

    fn add(self, other: Vector) -> Vector {
        Vector::new(self.x + other.x, self.y + other.y)
    }
}

/// The snake in the game
#[derive(Debug, Clone, PartialEq)]
pub struct Snake {
    /// Body segments, with head at index 0
    pub body: VecDeque<Vector>,
    /// Current heading
    pub direction: Direction,
}

impl Snake {
    /// Create a single-cell snake
    pub fn new(head: Vector, direction: Direction) -> Self {
        Self {
            body: VecDeque::from([head]),
            direction,
        }
    }

    /// Create a snake from explicit segments, head first
    ///
    /// # Panics
    ///
    /// Panics if `segments` is empty.
    pub fn from_segments(segments: impl IntoIterator<Item = Vector>, direction: Direction) -> Self {
        let body: VecDeque<Vector> = segments.into_iter().collect();
        assert!(!body.is_empty(), "snake needs at least one segment");
        Self { body, direction }
    }

    /// Get the head position
    pub fn head(&self) -> Vector {
        self.body[0]
    }

    /// Check if position collides with the snake body (excluding head)
    pub fn collides_with_body(&self, pos: Vector) -> bool {
        self.body.iter().skip(1).any(|&segment| segment == pos)
    }

    /// Check if any segment, head included, occupies `pos`
    pub fn contains(&self, pos: Vector) -> bool {
        self.body.contains(&pos)
    }

    /// Apply a relative turn to the heading
    pub fn turn(&mut self, action: Action) {
        let previous = self.direction;
        self.direction = previous.turned(action);
        debug_assert!(!self.direction.is_opposite(previous));
    }

    /// Push a new head one cell along the heading; the tail is kept when growing
    pub fn advance(&mut self, grow: bool) -> Vector {
        let new_head = self.head() + self.direction.delta();
        self.body.push_front(new_head);

        if !grow {
            self.body.pop_back();
        }

        new_head
    }

    /// Get the length of the snake
    pub fn len(&self) -> usize {
        self.body.len()
    }

    /// Check if the snake is empty (should never happen in practice)
    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }

    /// True when two segments share a cell
    pub fn has_duplicate_cells(&self) -> bool {
        self.body
            .iter()
            .enumerate()
            .any(|(i, a)| self.body.iter().skip(i + 1).any(|b| a == b))
    }
}

/// Type of collision that ended an episode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollisionType {
    /// Snake left the grid
    Wall,
    /// Snake hit itself
    SelfCollision,
}

/// Complete game state
#[derive(Debug, Clone, PartialEq)]
pub struct GameState {
    pub snake: Snake,
    pub food: Vector,
    pub grid_width: usize,
    pub grid_height: usize,
    /// Food eaten this episode
    pub score: u32,
    pub steps: u32,
    pub is_alive: bool,
}

impl GameState {
    /// Create a new game state
    pub fn new(snake: Snake, food: Vector, grid_width: usize, grid_height: usize) -> Self {
        Self {
            snake,
            food,
            grid_width,
            grid_height,
            score: 0,
            steps: 0,
            is_alive: true,
        }
    }

    /// Check if a position is within the grid bounds
    pub fn is_in_bounds(&self, pos: Vector) -> bool {
        pos.x >= 0
            && pos.x < self.grid_width as i32
            && pos.y >= 0
            && pos.y < self.grid_height as i32
    }

    /// Check if a position is occupied by the snake
    pub fn is_occupied_by_snake(&self, pos: Vector) -> bool {
        self.snake.contains(pos)
    }

    /// Manhattan distance from the head to the food
    pub fn distance_to_food(&self) -> u32 {
        self.snake.head().manhattan_distance(self.food)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vector_addition() {
        let pos = Vector::new(5, 5);
        assert_eq!(pos + Vector::new(1, 0), Vector::new(6, 5));
        assert_eq!(pos + Vector::new(-1, 0), Vector::new(4, 5));
        assert_eq!(pos + Vector::new(0, 1), Vector::new(5, 6));
        assert_eq!(pos + Vector::new(0, -1), Vector::new(5, 4));
    }

    #[test]
    fn test_manhattan_distance() {
        assert_eq!(Vector::new(10, 10).manhattan_distance(Vector::new(15, 10)), 5);
        assert_eq!(Vector::new(-1, 5).manhattan_distance(Vector::new(2, 1)), 7);
        assert_eq!(Vector::new(3, 3).manhattan_distance(Vector::new(3, 3)), 0);
    }

    #[test]
    #[should_panic(expected = "at least one segment")]
    fn test_snake_needs_a_segment() {
        Snake::from_segments(Vec::<Vector>::new(), Direction::Right);
    }

    #[test]
    fn test_single_cell_snake() {
        let snake = Snake::new(Vector::new(5, 5), Direction::Right);
        assert_eq!(snake.len(), 1);
        assert_eq!(snake.head(), Vector::new(5, 5));
        assert!(!snake.collides_with_body(Vector::new(5, 5)));
    }

    #[test]
    fn test_snake_advance() {
        let mut snake = Snake::from_segments(
            [Vector::new(5, 5), Vector::new(4, 5), Vector::new(3, 5)],
            Direction::Right,
        );

        // Move without growing
        snake.advance(false);
        assert_eq!(snake.len(), 3);
        assert_eq!(snake.head(), Vector::new(6, 5));
        assert_eq!(snake.body.back(), Some(&Vector::new(4, 5)));

        // Move with growing
        snake.advance(true);
        assert_eq!(snake.len(), 4);
        assert_eq!(snake.head(), Vector::new(7, 5));
        assert_eq!(snake.body.back(), Some(&Vector::new(4, 5)));
    }

    #[test]
    fn test_collision_detection() {
        let snake = Snake::from_segments(
            [Vector::new(5, 5), Vector::new(4, 5), Vector::new(3, 5)],
            Direction::Right,
        );
        assert!(!snake.collides_with_body(Vector::new(5, 5))); // head
        assert!(snake.collides_with_body(Vector::new(4, 5))); // body
        assert!(!snake.collides_with_body(Vector::new(10, 10))); // empty
        assert!(snake.contains(Vector::new(5, 5)));
    }

    #[test]
    fn test_duplicate_cells() {
        let snake = Snake::from_segments(
            [Vector::new(5, 5), Vector::new(4, 5), Vector::new(5, 5)],
            Direction::Right,
        );
        assert!(snake.has_duplicate_cells());

        let snake = Snake::new(Vector::new(1, 1), Direction::Up);
        assert!(!snake.has_duplicate_cells());
    }

    #[test]
    fn test_bounds_checking() {
        let state = GameState::new(
            Snake::new(Vector::new(5, 5), Direction::Right),
            Vector::new(10, 10),
            20,
            20,
        );

        assert!(state.is_in_bounds(Vector::new(0, 0)));
        assert!(state.is_in_bounds(Vector::new(19, 19)));
        assert!(!state.is_in_bounds(Vector::new(-1, 0)));
        assert!(!state.is_in_bounds(Vector::new(20, 0)));
        assert!(!state.is_in_bounds(Vector::new(0, 20)));
        assert_eq!(state.distance_to_food(), 10);
    }
}
