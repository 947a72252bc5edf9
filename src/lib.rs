//! Grid Snake - a single-player snake simulation
//!
//! This library provides:
//! - The game-state engine and its fixed-interval session loop (game module)
//! - Keyboard mapping, TUI rendering and play statistics for the terminal
//!   front-end (input, render, metrics modules)
//! - Interactive and headless execution modes (modes module)

pub mod game;
pub mod input;
pub mod logging;
pub mod metrics;
pub mod modes;
pub mod render;
