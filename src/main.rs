use std::fs::File;
use std::path::PathBuf;
use std::sync::Mutex;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use snake::app::App;
use snake::config::Settings;
use snake::highscore::{FileHighScoreStore, HighScoreStore, MemoryHighScoreStore};

#[derive(Parser)]
#[command(name = "snake")]
#[command(version, about = "Snake in the terminal")]
struct Cli {
    /// Settings file (TOML)
    #[arg(long, default_value = "snake.toml")]
    config: PathBuf,

    /// Canvas width in cells
    #[arg(long)]
    width: Option<u16>,

    /// Canvas height in cells
    #[arg(long)]
    height: Option<u16>,

    /// Use the whole terminal as the canvas
    #[arg(long)]
    fit: bool,

    /// Border cells between the canvas edge and the play area
    #[arg(long)]
    inset: Option<u16>,

    /// Starting tick interval in milliseconds
    #[arg(long)]
    tick_ms: Option<u64>,

    /// High score file
    #[arg(long)]
    highscore: Option<PathBuf>,

    /// Keep the high score in memory only
    #[arg(long)]
    no_save: bool,

    /// Write logs to this file (filtered by RUST_LOG)
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Seed for food placement
    #[arg(long)]
    seed: Option<u64>,
}

impl Cli {
    fn apply(&self, settings: &mut Settings) {
        if let Some(width) = self.width {
            settings.game.canvas_width = width;
        }
        if let Some(height) = self.height {
            settings.game.canvas_height = height;
        }
        if self.fit {
            settings.fit_terminal = true;
        }
        if let Some(inset) = self.inset {
            settings.game.inset = inset;
        }
        if let Some(tick_ms) = self.tick_ms {
            settings.speed.tick_interval_ms = tick_ms;
            settings.speed.min_tick_interval_ms = settings.speed.min_tick_interval_ms.min(tick_ms);
        }
        if let Some(path) = &self.highscore {
            settings.highscore_path = path.clone();
        }
        if let Some(path) = &self.log_file {
            settings.log_file = Some(path.clone());
        }
    }
}

// The terminal is taken over while playing, so logs only ever go to a file.
fn init_logging(settings: &Settings) -> Result<()> {
    let Some(path) = &settings.log_file else {
        return Ok(());
    };

    let file = File::create(path)
        .with_context(|| format!("Failed to create log file {}", path.display()))?;
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut settings = Settings::load(&cli.config).context("Failed to load settings")?;
    cli.apply(&mut settings);
    init_logging(&settings)?;

    let store: Box<dyn HighScoreStore> = if cli.no_save {
        Box::new(MemoryHighScoreStore::default())
    } else {
        Box::new(FileHighScoreStore::new(settings.highscore_path.clone()))
    };

    let mut app = App::new(settings, store, cli.seed).context("Failed to start game")?;
    app.run().context("Game loop failed")?;

    Ok(())
}
