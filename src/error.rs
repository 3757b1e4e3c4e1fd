//! Errors for the fallible edges of the game: settings and best-score files.
//!
//! The simulation itself never fails. Losing to an asteroid is a state
//! transition, and spawner exhaustion degrades to a fallback placement.

use std::path::PathBuf;

use thiserror::Error;

/// Top-level error type
#[derive(Debug, Error)]
pub enum GameError {
    /// Reading or writing a file failed
    #[error("i/o error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A settings or best-score file held malformed JSON
    #[error("malformed json: {0}")]
    Json(#[from] serde_json::Error),

    /// A difficulty tier name did not match easy/normal/hard
    #[error("unknown difficulty tier '{0}'")]
    UnknownTier(String),
}

impl GameError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        GameError::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, GameError>;
