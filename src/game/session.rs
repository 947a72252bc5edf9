//! Cooperative driver loop for a [`SimulationEngine`].
//!
//! One task owns the engine and the tick timer. Driver commands and timer
//! deadlines are multiplexed with `tokio::select!`, so a tick always runs to
//! completion before the next command is looked at and no locking is needed.

use std::ops::ControlFlow;
use tokio::sync::{mpsc, watch};
use tracing::{debug, info};

use super::{
    action::Command,
    engine::{SimulationEngine, TickOutcome},
    scheduler::TickScheduler,
    snapshot::Snapshot,
};

pub struct GameSession {
    engine: SimulationEngine,
    scheduler: TickScheduler,
}

impl GameSession {
    pub fn new(engine: SimulationEngine) -> Self {
        let scheduler = TickScheduler::new(engine.config().tick_interval());
        Self { engine, scheduler }
    }

    pub fn engine(&self) -> &SimulationEngine {
        &self.engine
    }

    pub fn subscribe(&self) -> watch::Receiver<Snapshot> {
        self.engine.subscribe()
    }

    /// Apply one driver command. Breaks on [`Command::Quit`].
    pub fn apply(&mut self, command: Command) -> ControlFlow<()> {
        debug!(?command, "command received");
        match command {
            Command::Start => self.engine.start(),
            Command::Stop => self.engine.stop(),
            Command::TogglePause => {
                if self.engine.is_running() {
                    self.engine.stop();
                } else {
                    self.engine.start();
                }
            }
            Command::Reset => self.engine.reset(),
            Command::SetDirection(direction) => {
                self.engine.set_direction(direction);
            }
            Command::Quit => return ControlFlow::Break(()),
        }
        self.sync_schedule();
        ControlFlow::Continue(())
    }

    fn on_tick(&mut self) {
        let outcome = self.engine.tick();
        if outcome != TickOutcome::Skipped {
            debug!(?outcome, "tick");
        }
        self.sync_schedule();
    }

    fn sync_schedule(&mut self) {
        self.scheduler.set_armed(self.engine.is_running());
    }

    /// Run until the command channel closes or a quit arrives. Returns the
    /// final snapshot.
    pub async fn run(mut self, mut commands: mpsc::UnboundedReceiver<Command>) -> Snapshot {
        info!(
            board_size = self.engine.config().board_size,
            period_ms = self.scheduler.period().as_millis() as u64,
            "session started"
        );
        self.sync_schedule();

        loop {
            tokio::select! {
                maybe_command = commands.recv() => {
                    let Some(command) = maybe_command else {
                        break;
                    };
                    if self.apply(command).is_break() {
                        break;
                    }
                }

                _ = self.scheduler.next_tick() => {
                    self.on_tick();
                }
            }
        }

        self.engine.stop();
        let last = self.engine.snapshot();
        info!(score = last.score, ticks = last.ticks, "session ended");
        last
    }
}
