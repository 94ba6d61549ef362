use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};
use crate::grid::{Direction, PlayArea};

/// Rules of a single game.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Canvas size in cells
    pub canvas_width: u16,
    pub canvas_height: u16,
    /// Border cells kept free around the play area
    pub inset: u16,
    /// Explicit play area; overrides `inset` when set
    pub play_area: Option<PlayArea>,
    pub initial_length: usize,
    /// `None` waits for the first key before moving
    pub initial_direction: Option<Direction>,
    /// Points per food eaten
    pub food_reward: u32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            canvas_width: 30,
            canvas_height: 20,
            inset: 0,
            play_area: None,
            initial_length: 1,
            initial_direction: None,
            food_reward: 10,
        }
    }
}

impl GameConfig {
    pub fn new(canvas_width: u16, canvas_height: u16) -> Self {
        Self { canvas_width, canvas_height, ..Default::default() }
    }

    pub fn play_area(&self) -> PlayArea {
        self.play_area
            .unwrap_or_else(|| PlayArea::inset(self.canvas_width, self.canvas_height, self.inset))
    }

    pub fn validate(&self) -> Result<()> {
        let area = self.play_area();
        if area.is_empty() {
            return Err(Error::InvalidConfig(format!(
                "play area is empty ({}x{} canvas, inset {})",
                self.canvas_width, self.canvas_height, self.inset
            )));
        }

        let canvas = PlayArea::full(self.canvas_width, self.canvas_height);
        let far_corner = area.cell_at(area.cell_count() - 1);
        if !canvas.contains(area.origin) || !canvas.contains(far_corner) {
            return Err(Error::InvalidConfig("play area lies outside the canvas".to_string()));
        }

        if self.initial_length == 0 {
            return Err(Error::InvalidConfig("initial length must be at least 1".to_string()));
        }

        // The body is laid out in a line from the center, away from the facing.
        let (w, h) = (area.width as usize, area.height as usize);
        let room = match self.initial_direction {
            Some(Direction::Up) => h - h / 2,
            Some(Direction::Down) => h / 2 + 1,
            Some(Direction::Left) => w - w / 2,
            Some(Direction::Right) | None => w / 2 + 1,
        };
        if self.initial_length > room {
            return Err(Error::InvalidConfig(format!(
                "initial length {} does not fit in a {}x{} play area",
                self.initial_length, area.width, area.height
            )));
        }

        Ok(())
    }
}

/// Tick cadence, consulted by the game loop only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpeedConfig {
    pub tick_interval_ms: u64,
    pub min_tick_interval_ms: u64,
    /// Foods eaten per speed-up; 0 keeps the speed constant
    pub speedup_every: u32,
    pub speedup_step_ms: u64,
    /// Terminal cells are taller than wide, so vertical moves are slowed down
    pub vertical_stretch: f64,
}

impl Default for SpeedConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: 120,
            min_tick_interval_ms: 40,
            speedup_every: 7,
            speedup_step_ms: 10,
            vertical_stretch: 1.35,
        }
    }
}

impl SpeedConfig {
    pub fn interval(&self, foods_eaten: u32, facing: Option<Direction>) -> Duration {
        let steps = foods_eaten.checked_div(self.speedup_every).unwrap_or(0) as u64;
        let base = self
            .tick_interval_ms
            .saturating_sub(steps.saturating_mul(self.speedup_step_ms))
            .max(self.min_tick_interval_ms);

        let ms = match facing {
            Some(dir) if dir.is_vertical() => (base as f64 * self.vertical_stretch).ceil() as u64,
            _ => base,
        };

        Duration::from_millis(ms)
    }

    pub fn validate(&self) -> Result<()> {
        if self.tick_interval_ms == 0 || self.min_tick_interval_ms == 0 {
            return Err(Error::InvalidConfig("tick intervals must be positive".to_string()));
        }
        if self.min_tick_interval_ms > self.tick_interval_ms {
            return Err(Error::InvalidConfig(
                "min_tick_interval_ms exceeds tick_interval_ms".to_string(),
            ));
        }
        if !(self.vertical_stretch.is_finite() && self.vertical_stretch >= 1.0) {
            return Err(Error::InvalidConfig("vertical_stretch must be >= 1.0".to_string()));
        }
        Ok(())
    }
}

/// Everything read from the settings file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub game: GameConfig,
    pub speed: SpeedConfig,
    /// Size the canvas to the terminal instead of `game.canvas_*`
    pub fit_terminal: bool,
    pub highscore_path: PathBuf,
    pub log_file: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            game: GameConfig::default(),
            speed: SpeedConfig::default(),
            fit_terminal: false,
            highscore_path: PathBuf::from("highscore.txt"),
            log_file: None,
        }
    }
}

impl Settings {
    /// Reads settings from a TOML file. A missing file gives the defaults.
    pub fn load(path: &Path) -> Result<Self> {
        match std::fs::read_to_string(path) {
            Ok(content) => Self::parse(&content).map_err(|source| Error::ConfigParse {
                path: path.to_path_buf(),
                source,
            }),
            Err(err) if err.kind() == ErrorKind::NotFound => {
                debug!(path = %path.display(), "no settings file, using defaults");
                Ok(Self::default())
            }
            Err(err) => Err(err.into()),
        }
    }

    pub fn parse(content: &str) -> std::result::Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    pub fn validate(&self) -> Result<()> {
        self.game.validate()?;
        self.speed.validate()
    }
}
