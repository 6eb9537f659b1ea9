#![forbid(unsafe_code)]

pub mod app_services;
pub mod audio;
pub mod error;
pub mod game;
pub mod progress_store;
pub mod questions;

pub use quiz_core::GameConfig;

pub use app_services::AppServices;
pub use audio::{AudioChannel, AudioCue, AudioPlayer, SilentAudio};
pub use error::{AppServicesError, GameError, PlaybackError, ProgressError};
pub use game::{Deferred, DeferredAction, DeferredOutcome, GameController};
pub use progress_store::{PROGRESS_KEY, ProgressStore};
pub use questions::QuestionGenerator;
