//! Scripted run without a terminal UI.
//!
//! A seeded autopilot steers the snake through a regular [`GameSession`]
//! while every published snapshot is written as one JSON line. Useful for
//! smoke-testing the engine and for piping game traces into other tools.

use anyhow::{Context, Result};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use std::io::Write;
use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::game::{
    BoundaryMode, Command, Direction, GameConfig, GameSession, SimulationEngine, Snapshot,
};

/// Chance of keeping the current heading when it is safe
const KEEP_HEADING: f64 = 0.75;

pub struct HeadlessMode {
    config: GameConfig,
    max_ticks: u64,
    rng: StdRng,
}

impl HeadlessMode {
    pub fn new(config: GameConfig, max_ticks: u64) -> Self {
        let rng = match config.seed {
            // Steering must not replay the engine's food sequence
            Some(seed) => StdRng::seed_from_u64(seed.wrapping_add(1)),
            None => StdRng::from_entropy(),
        };
        Self {
            config,
            max_ticks,
            rng,
        }
    }

    /// Play until game over or `max_ticks`, writing snapshots to `out`
    pub async fn run<W: Write>(&mut self, out: &mut W) -> Result<Snapshot> {
        let engine =
            SimulationEngine::new(self.config.clone()).context("Invalid game configuration")?;
        let session = GameSession::new(engine);
        let mut snapshots = session.subscribe();
        let (commands, command_rx) = mpsc::unbounded_channel();
        let handle = tokio::spawn(session.run(command_rx));

        write_snapshot(out, &snapshots.borrow_and_update())?;
        commands
            .send(Command::Start)
            .context("Session ended before start")?;

        let mut last_ticks = 0;
        while snapshots.changed().await.is_ok() {
            let snapshot = snapshots.borrow_and_update().clone();
            write_snapshot(out, &snapshot)?;

            if snapshot.game_over || snapshot.ticks >= self.max_ticks {
                break;
            }
            if snapshot.ticks != last_ticks || snapshot.ticks == 0 {
                last_ticks = snapshot.ticks;
                if let Some(direction) =
                    choose_direction(&snapshot, self.config.boundary, &mut self.rng)
                {
                    debug!(%direction, tick = snapshot.ticks, "autopilot steer");
                    // Fails only if the session is gone, which ends the loop anyway
                    let _ = commands.send(Command::SetDirection(direction));
                }
            }
        }

        let _ = commands.send(Command::Quit);
        let last = handle.await.context("Session task failed")?;
        info!(score = last.score, ticks = last.ticks, game_over = last.game_over, "headless run finished");
        Ok(last)
    }
}

fn write_snapshot<W: Write>(out: &mut W, snapshot: &Snapshot) -> Result<()> {
    let line = serde_json::to_string(snapshot).context("Failed to serialize snapshot")?;
    writeln!(out, "{line}").context("Failed to write snapshot")?;
    Ok(())
}

/// Pick a heading whose next cell is free. Returns `None` when every legal
/// move is fatal.
pub fn choose_direction<R: Rng + ?Sized>(
    snapshot: &Snapshot,
    boundary: BoundaryMode,
    rng: &mut R,
) -> Option<Direction> {
    let head = snapshot.head();
    let is_safe = |direction: Direction| {
        let next = head.moved_in_direction(direction);
        let next = match boundary {
            BoundaryMode::Wrap => next.wrapped(snapshot.board_size),
            BoundaryMode::Wall if !next.is_within(snapshot.board_size) => return false,
            BoundaryMode::Wall => next,
        };
        !snapshot.snake.contains(&next)
    };

    if is_safe(snapshot.direction) && rng.gen_bool(KEEP_HEADING) {
        return Some(snapshot.direction);
    }

    let safe: Vec<Direction> = Direction::ALL
        .into_iter()
        .filter(|d| !d.is_opposite(snapshot.direction))
        .filter(|d| is_safe(*d))
        .collect();
    safe.choose(rng).copied()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{EngineStatus, Position};

    fn snapshot_with(snake: Vec<Position>, direction: Direction, board_size: usize) -> Snapshot {
        Snapshot {
            snake,
            food: Position::new(0, 0),
            score: 0,
            game_over: false,
            direction,
            board_size,
            ticks: 0,
            status: EngineStatus::Running,
        }
    }

    #[test]
    fn test_never_proposes_reversal() {
        let mut rng = StdRng::seed_from_u64(0);
        let snapshot = snapshot_with(
            vec![Position::new(5, 5), Position::new(4, 5), Position::new(3, 5)],
            Direction::Right,
            20,
        );

        for _ in 0..200 {
            let choice = choose_direction(&snapshot, BoundaryMode::Wrap, &mut rng);
            assert_ne!(choice, Some(Direction::Left));
            assert!(choice.is_some());
        }
    }

    #[test]
    fn test_avoids_walls_in_wall_mode() {
        let mut rng = StdRng::seed_from_u64(0);
        // Top-right corner heading right: only Down is safe
        let snapshot = snapshot_with(
            vec![Position::new(9, 0), Position::new(8, 0)],
            Direction::Right,
            10,
        );

        for _ in 0..50 {
            assert_eq!(
                choose_direction(&snapshot, BoundaryMode::Wall, &mut rng),
                Some(Direction::Down)
            );
        }
    }

    #[test]
    fn test_boxed_in_returns_none() {
        let mut rng = StdRng::seed_from_u64(0);
        // Head at (1,1) facing up, surrounded on up/left/right by body
        let snapshot = snapshot_with(
            vec![
                Position::new(1, 1),
                Position::new(1, 2),
                Position::new(2, 2),
                Position::new(2, 1),
                Position::new(2, 0),
                Position::new(1, 0),
                Position::new(0, 0),
                Position::new(0, 1),
            ],
            Direction::Up,
            10,
        );

        assert_eq!(choose_direction(&snapshot, BoundaryMode::Wrap, &mut rng), None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_headless_run_writes_json_lines() {
        let config = GameConfig::default().with_seed(21);
        let mut mode = HeadlessMode::new(config, 25);
        let mut out = Vec::new();

        let last = mode.run(&mut out).await.unwrap();

        let text = String::from_utf8(out).unwrap();
        let lines: Vec<Snapshot> = text
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect();
        assert!(lines.len() >= 2);
        assert_eq!(lines[0].status, EngineStatus::Idle);
        assert!(last.ticks <= 25);
        assert!(last.game_over || last.ticks == 25);
        for snapshot in &lines {
            assert!(!snapshot.snake.contains(&snapshot.food) || snapshot.game_over);
        }
    }
}
