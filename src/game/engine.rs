use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use tracing::{debug, info, warn};

use super::{
    action::Direction,
    config::{BoundaryMode, ConfigError, GameConfig},
    snapshot::Snapshot,
    state::{initial_state, place_food, positions_equal, GameState},
};

/// Lifecycle of the engine as seen by a driver
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EngineStatus {
    /// Not ticking: before the first start or after a stop
    Idle,
    Running,
    /// Terminal until the next reset
    GameOver,
}

/// What ended the game
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollisionKind {
    SelfCollision,
    /// Only possible with [`BoundaryMode::Wall`]
    Wall,
    /// The snake covers every cell, so no food can be placed
    BoardFull,
}

/// Result of a single call to [`SimulationEngine::tick`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Engine idle or game already over; nothing changed
    Skipped,
    Moved,
    /// Head landed on food: score +1, snake grew by one
    Ate,
    Collided(CollisionKind),
}

/// The authoritative state machine. Advances one discrete step per tick and
/// mediates driver intents. Every state-affecting call publishes a fresh
/// [`Snapshot`] to subscribers.
pub struct SimulationEngine {
    config: GameConfig,
    state: GameState,
    /// Direction the next tick will move in
    pending_direction: Direction,
    running: bool,
    rng: StdRng,
    publisher: watch::Sender<Snapshot>,
}

impl SimulationEngine {
    /// Create an idle engine holding a fresh game
    pub fn new(config: GameConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let mut rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let state = initial_state(config.board_size, &mut rng);
        Ok(Self::assemble(config, state, rng))
    }

    /// Create an idle engine around an existing state, e.g. a hand-built
    /// position. The state's board size overrides the configured one.
    pub fn with_state(mut config: GameConfig, state: GameState) -> Result<Self, ConfigError> {
        config.board_size = state.board_size;
        config.validate()?;
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Ok(Self::assemble(config, state, rng))
    }

    fn assemble(config: GameConfig, state: GameState, rng: StdRng) -> Self {
        let status = if state.game_over {
            EngineStatus::GameOver
        } else {
            EngineStatus::Idle
        };
        let (publisher, _) = watch::channel(Snapshot::capture(&state, status));

        Self {
            pending_direction: state.snake.direction,
            config,
            state,
            running: false,
            rng,
            publisher,
        }
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn pending_direction(&self) -> Direction {
        self.pending_direction
    }

    pub fn status(&self) -> EngineStatus {
        if self.state.game_over {
            EngineStatus::GameOver
        } else if self.running {
            EngineStatus::Running
        } else {
            EngineStatus::Idle
        }
    }

    /// True while the tick schedule should be armed
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Current state as an owned snapshot (polling accessor)
    pub fn snapshot(&self) -> Snapshot {
        Snapshot::capture(&self.state, self.status())
    }

    /// Receiver that is notified on every published snapshot
    pub fn subscribe(&self) -> watch::Receiver<Snapshot> {
        self.publisher.subscribe()
    }

    fn publish(&self) {
        self.publisher.send_replace(self.snapshot());
    }

    /// Begin ticking. No-op if already running or if the game is over.
    pub fn start(&mut self) {
        if self.running {
            return;
        }
        if self.state.game_over {
            warn!("start ignored: game is over, reset first");
            return;
        }
        self.running = true;
        info!(score = self.state.score, "simulation started");
        self.publish();
    }

    /// Stop ticking. Once this returns no further tick will change the state
    /// until [`start`](Self::start) is called again.
    pub fn stop(&mut self) {
        if !self.running {
            return;
        }
        self.running = false;
        info!(score = self.state.score, ticks = self.state.ticks, "simulation stopped");
        self.publish();
    }

    /// Replace the whole game with a fresh one. Does not start ticking.
    pub fn reset(&mut self) {
        self.state = initial_state(self.config.board_size, &mut self.rng);
        self.pending_direction = self.state.snake.direction;
        info!(food = ?self.state.food, "game reset");
        self.publish();
    }

    /// Request a direction for the next tick. A request for the exact
    /// opposite of the committed direction is ignored. Returns whether the
    /// request was accepted.
    pub fn set_direction(&mut self, direction: Direction) -> bool {
        if direction.is_opposite(self.state.snake.direction) {
            debug!(%direction, current = %self.state.snake.direction, "reversal rejected");
            return false;
        }
        self.pending_direction = direction;
        true
    }

    /// Advance the simulation by one step
    pub fn tick(&mut self) -> TickOutcome {
        if !self.running || self.state.game_over {
            return TickOutcome::Skipped;
        }

        let board_size = self.config.board_size;
        let direction = self.pending_direction;
        let stepped = self.state.snake.head().moved_in_direction(direction);

        let new_head = match self.config.boundary {
            BoundaryMode::Wrap => stepped.wrapped(board_size),
            BoundaryMode::Wall if !stepped.is_within(board_size) => {
                return self.end_game(CollisionKind::Wall);
            }
            BoundaryMode::Wall => stepped,
        };

        // Tested against the whole pre-move body, tail included
        if self.state.snake.occupies(new_head) {
            return self.end_game(CollisionKind::SelfCollision);
        }

        let ate_food = positions_equal(new_head, self.state.food);
        self.state.snake.direction = direction;
        self.state.snake.advance(new_head, ate_food);
        self.state.ticks += 1;

        let outcome = if ate_food {
            self.state.score += 1;
            if self.state.snake.len() >= board_size * board_size {
                return self.end_game(CollisionKind::BoardFull);
            }
            self.state.food = place_food(&self.state.snake, board_size, &mut self.rng);
            debug!(score = self.state.score, food = ?self.state.food, "food eaten");
            TickOutcome::Ate
        } else {
            TickOutcome::Moved
        };

        self.publish();
        outcome
    }

    fn end_game(&mut self, kind: CollisionKind) -> TickOutcome {
        self.state.game_over = true;
        self.running = false;
        info!(?kind, score = self.state.score, ticks = self.state.ticks, "game over");
        self.publish();
        TickOutcome::Collided(kind)
    }
}
