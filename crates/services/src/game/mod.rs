mod controller;
mod timers;

// Public API of the game-flow subsystem.
pub use crate::error::GameError;
pub use controller::{DeferredOutcome, GameController};
pub use timers::{Deferred, DeferredAction, SessionTimers};
