use std::cell::Cell;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::error::Result;

/// Somewhere to keep the best score between runs.
pub trait HighScoreStore {
    /// Never fails: anything unreadable counts as no high score yet.
    fn load(&self) -> u32;
    fn save(&self, score: u32) -> Result<()>;
}

/// Stores the score as a decimal number in a plain text file.
#[derive(Debug, Clone)]
pub struct FileHighScoreStore {
    path: PathBuf,
}

impl FileHighScoreStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl HighScoreStore for FileHighScoreStore {
    fn load(&self) -> u32 {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "no high score file yet");
                return 0;
            }
            Err(err) => {
                warn!(path = %self.path.display(), %err, "cannot read high score");
                return 0;
            }
        };

        content.trim().parse().unwrap_or_else(|err| {
            warn!(path = %self.path.display(), %err, "ignoring malformed high score");
            0
        })
    }

    fn save(&self, score: u32) -> Result<()> {
        std::fs::write(&self.path, score.to_string())?;
        debug!(path = %self.path.display(), score, "high score saved");
        Ok(())
    }
}

/// Keeps the score for the lifetime of the process only.
#[derive(Debug, Default)]
pub struct MemoryHighScoreStore {
    score: Cell<u32>,
}

impl MemoryHighScoreStore {
    pub fn new(score: u32) -> Self {
        Self { score: Cell::new(score) }
    }
}

impl HighScoreStore for MemoryHighScoreStore {
    fn load(&self) -> u32 {
        self.score.get()
    }

    fn save(&self, score: u32) -> Result<()> {
        self.score.set(score);
        Ok(())
    }
}
