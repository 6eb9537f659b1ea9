//! Shared error types for the services crate.

use thiserror::Error;

use quiz_core::model::{LevelId, LevelRecordsError, SessionError};
use storage::repository::StorageError;
use storage::sqlite::SqliteInitError;

/// Errors emitted by `ProgressStore`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ProgressError {
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Records(#[from] LevelRecordsError),
}

/// Error reported by an `AudioPlayer` when a clip cannot be played.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum PlaybackError {
    #[error("playback blocked: {0}")]
    Blocked(String),
    #[error("media failed to load: {url}")]
    Media { url: String },
}

/// Errors emitted by `GameController`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum GameError {
    #[error("level {0} does not exist")]
    UnknownLevel(LevelId),
    #[error("level {0} is locked")]
    LevelLocked(LevelId),
    #[error("no level is being played")]
    NotPlaying,
    #[error("no level result to act on")]
    NoResult,
    #[error("level {0} has no next level to play")]
    NoNextLevel(LevelId),
    #[error(transparent)]
    Session(#[from] SessionError),
}

/// Errors emitted while bootstrapping app services.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppServicesError {
    #[error(transparent)]
    Sqlite(#[from] SqliteInitError),
}
