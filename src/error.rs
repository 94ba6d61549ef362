use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid config: {0}")]
    InvalidConfig(String),

    #[error("terminal too small: {width}x{height}, need at least {min_width}x{min_height}")]
    TerminalTooSmall { width: u16, height: u16, min_width: u16, min_height: u16 },
}

pub type Result<T> = std::result::Result<T, Error>;
