use super::state::Vector;

/// Heading of the snake, in screen coordinates (y grows downward)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    /// Returns true if turning from self to other would be a 180-degree turn
    pub fn is_opposite(&self, other: Direction) -> bool {
        matches!(
            (self, other),
            (Direction::Up, Direction::Down)
                | (Direction::Down, Direction::Up)
                | (Direction::Left, Direction::Right)
                | (Direction::Right, Direction::Left)
        )
    }

    /// Unit vector for moving one cell in this direction
    pub fn delta(&self) -> Vector {
        match self {
            Direction::Up => Vector::new(0, -1),
            Direction::Down => Vector::new(0, 1),
            Direction::Left => Vector::new(-1, 0),
            Direction::Right => Vector::new(1, 0),
        }
    }

    /// Heading after applying a relative turn.
    ///
    /// LEFT is a counter-clockwise turn as seen on screen: with y growing
    /// downward it maps `(dx, dy)` to `(dy, -dx)`, so Right becomes Up.
    /// RIGHT maps `(dx, dy)` to `(-dy, dx)`.
    pub fn turned(self, action: Action) -> Direction {
        let Vector { x: dx, y: dy } = self.delta();
        let rotated = match action {
            Action::Straight => return self,
            Action::Left => Vector::new(dy, -dx),
            Action::Right => Vector::new(-dy, dx),
        };

        match rotated {
            Vector { x: 0, y: -1 } => Direction::Up,
            Vector { x: 0, y: 1 } => Direction::Down,
            Vector { x: -1, y: 0 } => Direction::Left,
            _ => Direction::Right,
        }
    }
}

/// Relative turn applied to the current heading
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Left,
    Right,
    Straight,
}
