//! Core game logic module for Snake
//!
//! This module contains all the game logic without any rendering or terminal
//! dependencies. The engine can be driven directly (tests, scripts) or through
//! a [`GameSession`] that ticks it on a fixed interval.

pub mod action;
pub mod config;
pub mod engine;
pub mod scheduler;
pub mod session;
pub mod snapshot;
pub mod state;

// Re-export commonly used types
pub use action::{Command, Direction, ParseDirectionError};
pub use config::{BoundaryMode, ConfigError, GameConfig};
pub use engine::{CollisionKind, EngineStatus, SimulationEngine, TickOutcome};
pub use scheduler::TickScheduler;
pub use session::GameSession;
pub use snapshot::Snapshot;
pub use state::{initial_state, place_food, positions_equal, GameState, Position, Snake};
