#![forbid(unsafe_code)]

pub mod config;
pub mod labels;
pub mod model;
pub mod scoring;

pub use config::{GameConfig, GameConfigError};
pub use scoring::stars_for;
