use serde::{Deserialize, Serialize};

use super::action::Direction;
use super::engine::EngineStatus;
use super::state::{GameState, Position};

/// Immutable copy of everything an observer needs to draw one frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Segments, head first
    pub snake: Vec<Position>,
    pub food: Position,
    pub score: u32,
    pub game_over: bool,
    pub direction: Direction,
    pub board_size: usize,
    pub ticks: u64,
    pub status: EngineStatus,
}

impl Snapshot {
    pub fn capture(state: &GameState, status: EngineStatus) -> Self {
        Self {
            snake: state.snake.body.clone(),
            food: state.food,
            score: state.score,
            game_over: state.game_over,
            direction: state.snake.direction,
            board_size: state.board_size,
            ticks: state.ticks,
            status,
        }
    }

    pub fn head(&self) -> Position {
        self.snake[0]
    }

    pub fn len(&self) -> usize {
        self.snake.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snake.is_empty()
    }
}
