use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use thiserror::Error;

use crate::model::ids::LevelId;

//
// ─── STARS ─────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("stars must be between 0 and 3, got {0}")]
pub struct StarsError(pub u8);

/// Star rating of a level result, 0 to 3.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Stars(u8);

impl Stars {
    pub const ZERO: Stars = Stars(0);
    pub const ONE: Stars = Stars(1);
    pub const TWO: Stars = Stars(2);
    pub const THREE: Stars = Stars(3);
    pub const MAX: Stars = Stars::THREE;

    /// # Errors
    ///
    /// Returns `StarsError` if `value` is greater than 3.
    pub fn new(value: u8) -> Result<Self, StarsError> {
        if value > Self::MAX.0 {
            return Err(StarsError(value));
        }
        Ok(Self(value))
    }

    #[must_use]
    pub fn value(self) -> u8 {
        self.0
    }

    /// True for any result that counts as passing the level.
    #[must_use]
    pub fn is_earned(self) -> bool {
        self.0 > 0
    }

    #[must_use]
    pub fn is_max(self) -> bool {
        self == Self::MAX
    }
}

impl TryFrom<u8> for Stars {
    type Error = StarsError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Stars> for u8 {
    fn from(stars: Stars) -> Self {
        stars.0
    }
}

impl fmt::Display for Stars {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let filled = usize::from(self.0);
        let empty = usize::from(Self::MAX.0) - filled;
        write!(f, "{}{}", "★".repeat(filled), "☆".repeat(empty))
    }
}

//
// ─── LEVEL RECORD ──────────────────────────────────────────────────────────────
//

/// Persisted unlock/star state of one level.
///
/// Serializes as `{"id":1,"stars":0,"isLocked":false}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LevelRecord {
    pub id: LevelId,
    pub stars: Stars,
    pub is_locked: bool,
}

impl LevelRecord {
    /// Zero stars; locked unless it is the first level.
    #[must_use]
    pub fn fresh(id: LevelId) -> Self {
        Self {
            id,
            stars: Stars::ZERO,
            is_locked: id != LevelId::FIRST,
        }
    }

    #[must_use]
    pub fn is_playable(&self) -> bool {
        !self.is_locked
    }
}

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum LevelRecordsError {
    #[error("level {0} appears more than once")]
    DuplicateLevel(LevelId),
}

/// First-run progress: `total_levels` records, only level 1 unlocked.
#[must_use]
pub fn default_levels(total_levels: u32) -> Vec<LevelRecord> {
    (1..=total_levels)
        .filter_map(|id| LevelId::new(id).ok())
        .map(LevelRecord::fresh)
        .collect()
}

/// Applies a finished level to the progress sequence.
///
/// The level keeps its best star count. A passing result (at least one star)
/// unlocks the following level when there is one. Nothing is ever re-locked.
#[must_use]
pub fn apply_level_result(
    records: &[LevelRecord],
    level_id: LevelId,
    earned: Stars,
) -> Vec<LevelRecord> {
    let unlock = earned.is_earned().then(|| level_id.next()).flatten();
    records
        .iter()
        .map(|record| {
            if record.id == level_id {
                LevelRecord {
                    stars: record.stars.max(earned),
                    ..*record
                }
            } else if Some(record.id) == unlock {
                LevelRecord {
                    is_locked: false,
                    ..*record
                }
            } else {
                *record
            }
        })
        .collect()
}

/// Level started by the map's quick-play button: the first unlocked level
/// without a perfect score, falling back to level 1.
#[must_use]
pub fn quick_play_level(records: &[LevelRecord]) -> LevelId {
    records
        .iter()
        .find(|record| record.is_playable() && !record.stars.is_max())
        .map_or(LevelId::FIRST, |record| record.id)
}

/// Fits stored records to the configured number of levels.
///
/// Missing levels get fresh records, levels past `total_levels` are dropped
/// and level 1 is always unlocked. The result is ordered by id.
///
/// # Errors
///
/// Returns `LevelRecordsError::DuplicateLevel` if a level id appears twice.
pub fn reconcile_levels(
    stored: Vec<LevelRecord>,
    total_levels: u32,
) -> Result<Vec<LevelRecord>, LevelRecordsError> {
    let mut seen = HashSet::with_capacity(stored.len());
    for record in &stored {
        if !seen.insert(record.id) {
            return Err(LevelRecordsError::DuplicateLevel(record.id));
        }
    }

    let mut levels = default_levels(total_levels);
    for record in stored {
        if let Some(slot) = levels.get_mut(record.id.index()) {
            *slot = record;
        }
    }
    if let Some(first) = levels.first_mut() {
        first.is_locked = false;
    }
    Ok(levels)
}
