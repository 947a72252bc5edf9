use std::time::{Duration, Instant};

use crate::game::{EngineStatus, Snapshot};

/// Per-run play statistics, fed from published snapshots
pub struct GameMetrics {
    /// Set while the engine is running; paused time is not counted
    running_since: Option<Instant>,
    /// Play time accumulated before the current running stretch
    banked: Duration,
    pub high_score: u32,
    pub games_played: u32,
    last_status: EngineStatus,
    last_ticks: u64,
}

impl GameMetrics {
    pub fn new() -> Self {
        Self {
            running_since: None,
            banked: Duration::ZERO,
            high_score: 0,
            games_played: 0,
            last_status: EngineStatus::Idle,
            last_ticks: 0,
        }
    }

    /// Play time of the current game
    pub fn elapsed(&self) -> Duration {
        self.banked + self.running_since.map_or(Duration::ZERO, |since| since.elapsed())
    }

    pub fn observe(&mut self, snapshot: &Snapshot) {
        self.observe_at(snapshot, Instant::now());
    }

    fn observe_at(&mut self, snapshot: &Snapshot, now: Instant) {
        // Tick counter going backwards means the game was reset
        if snapshot.ticks < self.last_ticks {
            self.banked = Duration::ZERO;
            self.running_since = self.running_since.map(|_| now);
        }

        match (self.last_status, snapshot.status) {
            (EngineStatus::Running, EngineStatus::Running) => {}
            (_, EngineStatus::Running) => self.running_since = Some(now),
            (EngineStatus::Running, _) => {
                if let Some(since) = self.running_since.take() {
                    self.banked += now.saturating_duration_since(since);
                }
            }
            _ => {}
        }

        if snapshot.status == EngineStatus::GameOver && self.last_status != EngineStatus::GameOver
        {
            self.on_game_over(snapshot.score);
        }
        if snapshot.status != EngineStatus::GameOver && self.last_status == EngineStatus::GameOver
        {
            self.banked = Duration::ZERO;
        }

        self.high_score = self.high_score.max(snapshot.score);
        self.last_status = snapshot.status;
        self.last_ticks = snapshot.ticks;
    }

    fn on_game_over(&mut self, final_score: u32) {
        self.games_played += 1;
        self.high_score = self.high_score.max(final_score);
    }

    pub fn format_time(&self) -> String {
        let total_secs = self.elapsed().as_secs();
        format!("{:02}:{:02}", total_secs / 60, total_secs % 60)
    }
}

impl Default for GameMetrics {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{Direction, Position};

    fn snapshot(status: EngineStatus, score: u32, ticks: u64) -> Snapshot {
        Snapshot {
            snake: vec![Position::new(5, 5)],
            food: Position::new(1, 1),
            score,
            game_over: status == EngineStatus::GameOver,
            direction: Direction::Right,
            board_size: 20,
            ticks,
            status,
        }
    }

    #[test]
    fn test_time_formatting() {
        let mut metrics = GameMetrics::new();
        metrics.banked = Duration::from_secs(125);
        assert_eq!(metrics.format_time(), "02:05");

        metrics.banked = Duration::from_secs(0);
        assert_eq!(metrics.format_time(), "00:00");

        metrics.banked = Duration::from_secs(3661);
        assert_eq!(metrics.format_time(), "61:01");
    }

    #[test]
    fn test_paused_time_not_counted() {
        let mut metrics = GameMetrics::new();
        let t0 = Instant::now();

        metrics.observe_at(&snapshot(EngineStatus::Running, 0, 0), t0);
        metrics.observe_at(
            &snapshot(EngineStatus::Idle, 0, 10),
            t0 + Duration::from_secs(4),
        );
        assert_eq!(metrics.elapsed(), Duration::from_secs(4));

        // Idle stretch contributes nothing
        metrics.observe_at(
            &snapshot(EngineStatus::Running, 0, 10),
            t0 + Duration::from_secs(60),
        );
        metrics.observe_at(
            &snapshot(EngineStatus::Idle, 0, 20),
            t0 + Duration::from_secs(62),
        );
        assert_eq!(metrics.elapsed(), Duration::from_secs(6));
    }

    #[test]
    fn test_high_score_tracking() {
        let mut metrics = GameMetrics::new();
        let t0 = Instant::now();

        metrics.observe_at(&snapshot(EngineStatus::Running, 10, 50), t0);
        metrics.observe_at(&snapshot(EngineStatus::GameOver, 10, 50), t0);
        assert_eq!(metrics.high_score, 10);
        assert_eq!(metrics.games_played, 1);

        // Repeated game-over snapshots count once
        metrics.observe_at(&snapshot(EngineStatus::GameOver, 10, 50), t0);
        assert_eq!(metrics.games_played, 1);

        metrics.observe_at(&snapshot(EngineStatus::Idle, 0, 0), t0);
        metrics.observe_at(&snapshot(EngineStatus::Running, 5, 20), t0);
        metrics.observe_at(&snapshot(EngineStatus::GameOver, 5, 20), t0);
        assert_eq!(metrics.high_score, 10);
        assert_eq!(metrics.games_played, 2);
    }

    #[test]
    fn test_reset_clears_elapsed() {
        let mut metrics = GameMetrics::new();
        let t0 = Instant::now();

        metrics.observe_at(&snapshot(EngineStatus::Running, 0, 0), t0);
        metrics.observe_at(
            &snapshot(EngineStatus::Idle, 0, 30),
            t0 + Duration::from_secs(5),
        );
        metrics.observe_at(
            &snapshot(EngineStatus::Idle, 0, 0),
            t0 + Duration::from_secs(6),
        );
        assert_eq!(metrics.elapsed(), Duration::ZERO);
    }
}
