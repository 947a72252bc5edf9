use anyhow::Result;
use clap::{Parser, ValueEnum};
use grid_snake::game::{BoundaryMode, GameConfig};
use grid_snake::logging;
use grid_snake::modes::{HeadlessMode, HumanMode};
use std::io::{stdout, Write};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "grid_snake")]
#[command(version, about = "Single-player grid snake")]
struct Cli {
    /// How to drive the game
    #[arg(long, value_enum, default_value = "human")]
    mode: Mode,

    /// JSON config file; flags below override its values
    #[arg(long)]
    config: Option<PathBuf>,

    /// Grid cells per side
    #[arg(long)]
    board_size: Option<usize>,

    /// Milliseconds between ticks
    #[arg(long)]
    tick_ms: Option<u64>,

    /// Edge behaviour
    #[arg(long, value_enum)]
    boundary: Option<Boundary>,

    /// RNG seed for reproducible food placement
    #[arg(long)]
    seed: Option<u64>,

    /// Headless only: stop after this many ticks
    #[arg(long, default_value = "500")]
    ticks: u64,

    /// Write logs to this file (human mode logs nowhere otherwise)
    #[arg(long)]
    log_file: Option<PathBuf>,
}

#[derive(Clone, ValueEnum)]
enum Mode {
    /// Play snake with keyboard controls
    Human,
    /// Autopilot run printing JSON snapshots to stdout
    Headless,
}

#[derive(Clone, Copy, ValueEnum)]
enum Boundary {
    Wrap,
    Wall,
}

impl From<Boundary> for BoundaryMode {
    fn from(boundary: Boundary) -> Self {
        match boundary {
            Boundary::Wrap => BoundaryMode::Wrap,
            Boundary::Wall => BoundaryMode::Wall,
        }
    }
}

impl Cli {
    fn game_config(&self) -> Result<GameConfig> {
        let mut config = match &self.config {
            Some(path) => GameConfig::from_json_file(path)?,
            None => GameConfig::default(),
        };
        if let Some(board_size) = self.board_size {
            config.board_size = board_size;
        }
        if let Some(tick_ms) = self.tick_ms {
            config.tick_interval_ms = tick_ms;
        }
        if let Some(boundary) = self.boundary {
            config.boundary = boundary.into();
        }
        if self.seed.is_some() {
            config.seed = self.seed;
        }
        config.validate()?;
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match (&cli.mode, &cli.log_file) {
        (_, Some(path)) => logging::init_file(path)?,
        (Mode::Headless, None) => logging::init_stderr(),
        (Mode::Human, None) => {}
    }

    let config = cli.game_config()?;

    match cli.mode {
        Mode::Human => {
            let mut human_mode = HumanMode::new(config)?;
            human_mode.run().await?;
        }
        Mode::Headless => {
            let mut headless_mode = HeadlessMode::new(config, cli.ticks);
            let mut out = stdout().lock();
            let last = headless_mode.run(&mut out).await?;
            out.flush()?;
            eprintln!("Final score: {} after {} ticks", last.score, last.ticks);
        }
    }

    Ok(())
}
