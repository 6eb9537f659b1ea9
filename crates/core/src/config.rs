use std::time::Duration;

use thiserror::Error;

use crate::model::LevelId;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum GameConfigError {
    #[error("total levels must be > 0")]
    InvalidTotalLevels,

    #[error("questions per level must be > 0")]
    InvalidQuestionsPerLevel,
}

/// Tunable game constants.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameConfig {
    total_levels: u32,
    questions_per_level: u32,
    prompt_delay: Duration,
    advance_delay: Duration,
}

impl GameConfig {
    pub const DEFAULT_TOTAL_LEVELS: u32 = 6;
    pub const DEFAULT_QUESTIONS_PER_LEVEL: u32 = 10;
    /// Pause between showing a question and playing its sound.
    pub const DEFAULT_PROMPT_DELAY: Duration = Duration::from_millis(400);
    /// How long answer feedback stays on screen before moving on.
    pub const DEFAULT_ADVANCE_DELAY: Duration = Duration::from_millis(1200);

    /// # Errors
    ///
    /// Returns `GameConfigError` if either count is zero.
    pub fn new(total_levels: u32, questions_per_level: u32) -> Result<Self, GameConfigError> {
        if total_levels == 0 {
            return Err(GameConfigError::InvalidTotalLevels);
        }
        if questions_per_level == 0 {
            return Err(GameConfigError::InvalidQuestionsPerLevel);
        }
        Ok(Self {
            total_levels,
            questions_per_level,
            prompt_delay: Self::DEFAULT_PROMPT_DELAY,
            advance_delay: Self::DEFAULT_ADVANCE_DELAY,
        })
    }

    #[must_use]
    pub fn with_timings(mut self, prompt_delay: Duration, advance_delay: Duration) -> Self {
        self.prompt_delay = prompt_delay;
        self.advance_delay = advance_delay;
        self
    }

    #[must_use]
    pub fn total_levels(&self) -> u32 {
        self.total_levels
    }

    #[must_use]
    pub fn questions_per_level(&self) -> u32 {
        self.questions_per_level
    }

    #[must_use]
    pub fn prompt_delay(&self) -> Duration {
        self.prompt_delay
    }

    #[must_use]
    pub fn advance_delay(&self) -> Duration {
        self.advance_delay
    }

    /// True when `id` names a level on the map.
    #[must_use]
    pub fn contains(&self, id: LevelId) -> bool {
        id.value() <= self.total_levels
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            total_levels: Self::DEFAULT_TOTAL_LEVELS,
            questions_per_level: Self::DEFAULT_QUESTIONS_PER_LEVEL,
            prompt_delay: Self::DEFAULT_PROMPT_DELAY,
            advance_delay: Self::DEFAULT_ADVANCE_DELAY,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_shipped_game() {
        let config = GameConfig::default();
        assert_eq!(config.total_levels(), 6);
        assert_eq!(config.questions_per_level(), 10);
        assert_eq!(config.prompt_delay(), Duration::from_millis(400));
        assert_eq!(config.advance_delay(), Duration::from_millis(1200));
    }

    #[test]
    fn rejects_zero_counts() {
        assert_eq!(GameConfig::new(0, 10), Err(GameConfigError::InvalidTotalLevels));
        assert_eq!(
            GameConfig::new(6, 0),
            Err(GameConfigError::InvalidQuestionsPerLevel)
        );
    }

    #[test]
    fn contains_checks_upper_bound() {
        let config = GameConfig::new(3, 5).unwrap();
        assert!(config.contains(LevelId::new(3).unwrap()));
        assert!(!config.contains(LevelId::new(4).unwrap()));
    }
}
