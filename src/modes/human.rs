use anyhow::{Context, Result};
use crossterm::{
    event::{Event, EventStream, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use futures::StreamExt;
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io::{stderr, Stderr};
use std::time::Duration;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::interval;
use tracing::{info, warn};

use crate::game::{Command, GameConfig, GameSession, SimulationEngine, Snapshot};
use crate::input::InputHandler;
use crate::metrics::GameMetrics;
use crate::render::Renderer;

/// Interactive terminal play. The session task owns the engine; this side
/// only forwards key presses and draws the latest published snapshot.
pub struct HumanMode {
    commands: mpsc::UnboundedSender<Command>,
    snapshots: watch::Receiver<Snapshot>,
    session: Option<JoinHandle<Snapshot>>,
    metrics: GameMetrics,
    renderer: Renderer,
    input_handler: InputHandler,
    should_quit: bool,
}

impl HumanMode {
    /// Spawn the session task. Must be called inside a tokio runtime.
    pub fn new(config: GameConfig) -> Result<Self> {
        let engine = SimulationEngine::new(config).context("Invalid game configuration")?;
        let session = GameSession::new(engine);
        let snapshots = session.subscribe();
        let (commands, command_rx) = mpsc::unbounded_channel();
        let handle = tokio::spawn(session.run(command_rx));

        Ok(Self {
            commands,
            snapshots,
            session: Some(handle),
            metrics: GameMetrics::new(),
            renderer: Renderer::new(),
            input_handler: InputHandler::new(),
            should_quit: false,
        })
    }

    pub async fn run(&mut self) -> Result<()> {
        // Setup terminal
        enable_raw_mode().context("Failed to enable raw mode")?;
        let mut stderr = stderr();
        execute!(stderr, EnterAlternateScreen).context("Failed to enter alternate screen")?;
        let backend = CrosstermBackend::new(stderr);
        let mut terminal = Terminal::new(backend).context("Failed to create terminal")?;
        terminal.hide_cursor().context("Failed to hide cursor")?;
        terminal.clear().context("Failed to clear terminal")?;

        self.send(Command::Start);
        let result = self.run_game_loop(&mut terminal).await;

        self.cleanup_terminal(&mut terminal)?;
        let last = self.shutdown().await?;
        println!("Final score: {} (best this run: {})", last.score, self.metrics.high_score);

        result
    }

    async fn run_game_loop(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stderr>>,
    ) -> Result<()> {
        let mut event_stream = EventStream::new();

        // Render at 30 FPS (33ms per frame); game ticks are paced by the session
        let mut render_timer = interval(Duration::from_millis(33));

        loop {
            tokio::select! {
                maybe_event = event_stream.next() => {
                    match maybe_event {
                        Some(Ok(event)) => self.handle_event(event),
                        Some(Err(e)) => return Err(e).context("Failed to read terminal event"),
                        None => self.should_quit = true,
                    }
                }

                _ = render_timer.tick() => {
                    let snapshot = self.snapshots.borrow_and_update().clone();
                    self.metrics.observe(&snapshot);
                    terminal.draw(|frame| {
                        self.renderer.render(frame, &snapshot, &self.metrics);
                    }).context("Failed to draw frame")?;
                }

                _ = tokio::signal::ctrl_c() => {
                    self.should_quit = true;
                }
            }

            if self.should_quit {
                break;
            }
        }

        Ok(())
    }

    fn handle_event(&mut self, event: Event) {
        let Event::Key(key) = event else {
            return;
        };
        // Only process key press events, not release
        if key.kind != KeyEventKind::Press {
            return;
        }

        match self.input_handler.handle_key_event(key) {
            Some(Command::Quit) => self.should_quit = true,
            Some(command) => self.send(command),
            None => {}
        }
    }

    fn send(&mut self, command: Command) {
        if self.commands.send(command).is_err() {
            warn!(?command, "session has ended; command dropped");
            self.should_quit = true;
        }
    }

    async fn shutdown(&mut self) -> Result<Snapshot> {
        let _ = self.commands.send(Command::Quit);
        let last = match self.session.take() {
            Some(handle) => handle.await.context("Session task failed")?,
            None => self.snapshots.borrow().clone(),
        };
        self.metrics.observe(&last);
        info!(score = last.score, high_score = self.metrics.high_score, "leaving human mode");
        Ok(last)
    }

    fn cleanup_terminal(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stderr>>,
    ) -> Result<()> {
        disable_raw_mode().context("Failed to disable raw mode")?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)
            .context("Failed to leave alternate screen")?;
        terminal.show_cursor().context("Failed to show cursor")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{Direction, EngineStatus};
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

    #[tokio::test]
    async fn test_game_initialization() {
        let mode = HumanMode::new(GameConfig::default().with_seed(1)).unwrap();
        let snapshot = mode.snapshots.borrow().clone();
        assert_eq!(snapshot.status, EngineStatus::Idle);
        assert_eq!(snapshot.score, 0);
    }

    #[tokio::test]
    async fn test_invalid_config_is_an_error() {
        assert!(HumanMode::new(GameConfig::new(1)).is_err());
    }

    #[tokio::test]
    async fn test_key_events_reach_session() {
        let mut mode = HumanMode::new(GameConfig::default().with_seed(1)).unwrap();

        mode.handle_event(Event::Key(KeyEvent::new(KeyCode::Char(' '), KeyModifiers::NONE)));
        mode.handle_event(Event::Key(KeyEvent::new(KeyCode::Down, KeyModifiers::NONE)));
        mode.snapshots.changed().await.unwrap();
        assert_eq!(mode.snapshots.borrow().status, EngineStatus::Running);

        mode.handle_event(Event::Key(KeyEvent::new(KeyCode::Char('q'), KeyModifiers::NONE)));
        assert!(mode.should_quit);

        let last = mode.shutdown().await.unwrap();
        assert_eq!(last.status, EngineStatus::Idle);
        assert!(matches!(last.direction, Direction::Right | Direction::Down));
    }
}
