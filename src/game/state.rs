use rand::Rng;
use serde::{Deserialize, Serialize};

use super::action::Direction;

/// Head of the canonical starting snake; the body trails to the left of it
pub const START_HEAD: Position = Position { x: 5, y: 5 };
pub const START_LENGTH: usize = 3;
pub const START_DIRECTION: Direction = Direction::Right;

/// A position on the game grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Move position by delta
    pub fn moved_by(&self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    /// Move position in a direction
    pub fn moved_in_direction(&self, direction: Direction) -> Self {
        let (dx, dy) = direction.delta();
        self.moved_by(dx, dy)
    }

    /// Fold both coordinates back onto a `board_size` torus
    pub fn wrapped(&self, board_size: usize) -> Self {
        let n = board_size as i32;
        Self {
            x: (self.x + n) % n,
            y: (self.y + n) % n,
        }
    }

    pub fn is_within(&self, board_size: usize) -> bool {
        let n = board_size as i32;
        (0..n).contains(&self.x) && (0..n).contains(&self.y)
    }
}

/// Exact field equality of two cells
pub fn positions_equal(a: Position, b: Position) -> bool {
    a.x == b.x && a.y == b.y
}

/// The snake in the game
#[derive(Debug, Clone, PartialEq)]
pub struct Snake {
    /// Body segments, with head at index 0
    pub body: Vec<Position>,
    /// Direction committed by the last tick
    pub direction: Direction,
}

impl Snake {
    /// Create a new snake with given starting position and direction
    pub fn new(head: Position, direction: Direction, length: usize) -> Self {
        let mut body = Vec::with_capacity(length.max(1));
        body.push(head);

        let (dx, dy) = direction.delta();
        for i in 1..length {
            let prev = body[i - 1];
            body.push(prev.moved_by(-dx, -dy));
        }

        Self { body, direction }
    }

    /// Build a snake from explicit segments, head first
    pub fn from_segments(body: Vec<Position>, direction: Direction) -> Self {
        assert!(!body.is_empty(), "a snake needs at least one segment");
        Self { body, direction }
    }

    /// The canonical three-segment snake facing right
    pub fn starting() -> Self {
        Self::new(START_HEAD, START_DIRECTION, START_LENGTH)
    }

    /// Get the head position
    pub fn head(&self) -> Position {
        self.body[0]
    }

    /// Get the tail position (last segment)
    pub fn tail(&self) -> Position {
        self.body[self.body.len() - 1]
    }

    /// True if any segment, head included, sits on `pos`
    pub fn occupies(&self, pos: Position) -> bool {
        self.body.iter().any(|segment| positions_equal(*segment, pos))
    }

    /// Commit a move: prepend `new_head`, dropping the tail unless growing
    pub fn advance(&mut self, new_head: Position, grow: bool) {
        self.body.insert(0, new_head);
        if !grow {
            self.body.pop();
        }
    }

    pub fn len(&self) -> usize {
        self.body.len()
    }

    /// Always false for a well-formed snake
    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }
}

/// Draw a food cell uniformly among the cells the snake does not cover.
///
/// Uses rejection sampling over the whole grid. When the snake fills every
/// cell there is nowhere to put food and this never returns.
pub fn place_food<R: Rng + ?Sized>(snake: &Snake, board_size: usize, rng: &mut R) -> Position {
    loop {
        let x = rng.gen_range(0..board_size) as i32;
        let y = rng.gen_range(0..board_size) as i32;
        let candidate = Position::new(x, y);

        if !snake.occupies(candidate) {
            return candidate;
        }
    }
}

/// Complete game state
#[derive(Debug, Clone, PartialEq)]
pub struct GameState {
    pub snake: Snake,
    pub food: Position,
    pub board_size: usize,
    pub score: u32,
    /// Committed moves since the last reset
    pub ticks: u64,
    pub game_over: bool,
}

impl GameState {
    /// Create a new game state
    pub fn new(snake: Snake, food: Position, board_size: usize) -> Self {
        Self {
            snake,
            food,
            board_size,
            score: 0,
            ticks: 0,
            game_over: false,
        }
    }

    pub fn direction(&self) -> Direction {
        self.snake.direction
    }
}

/// Fresh state: the canonical snake facing right, food placed clear of it
pub fn initial_state<R: Rng + ?Sized>(board_size: usize, rng: &mut R) -> GameState {
    let snake = Snake::starting();
    let food = place_food(&snake, board_size, rng);
    GameState::new(snake, food, board_size)
}
