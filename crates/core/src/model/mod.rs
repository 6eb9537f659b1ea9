mod animal;
mod ids;
mod level;
mod question;
mod session;

pub use animal::{Animal, AnimalCatalog, CatalogError, POOL_SIZE};
pub use ids::{LevelId, LevelIdError, ParseIdError, SessionToken};
pub use level::{
    LevelRecord, LevelRecordsError, Stars, StarsError, apply_level_result, default_levels,
    quick_play_level, reconcile_levels,
};
pub use question::{OPTIONS_PER_QUESTION, Question};
pub use session::{AnswerFeedback, Advance, GameState, LevelOutcome, PlayingSession, SessionError};
