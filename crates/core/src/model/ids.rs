use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use uuid::Uuid;

/// Error returned when a level id is zero.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("level id must be >= 1")]
pub struct LevelIdError;

/// One-based identifier of a level on the map.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct LevelId(u32);

impl LevelId {
    /// The first level, which is always playable.
    pub const FIRST: LevelId = LevelId(1);

    /// Creates a new `LevelId`
    ///
    /// # Errors
    ///
    /// Returns `LevelIdError` if `id` is zero.
    pub fn new(id: u32) -> Result<Self, LevelIdError> {
        if id == 0 {
            return Err(LevelIdError);
        }
        Ok(Self(id))
    }

    /// Returns the underlying u32 value
    #[must_use]
    pub fn value(&self) -> u32 {
        self.0
    }

    /// Zero-based position of this level in an id-ordered sequence.
    #[must_use]
    pub fn index(&self) -> usize {
        usize::try_from(self.0 - 1).unwrap_or(usize::MAX)
    }

    /// The level that follows this one, if representable.
    #[must_use]
    pub fn next(&self) -> Option<LevelId> {
        self.0.checked_add(1).map(LevelId)
    }
}

impl TryFrom<u32> for LevelId {
    type Error = LevelIdError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<LevelId> for u32 {
    fn from(id: LevelId) -> Self {
        id.0
    }
}

/// Identity of one playthrough of a level.
///
/// Deferred events carry the token of the session that scheduled them so a
/// superseded session can be recognised.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct SessionToken(Uuid);

impl SessionToken {
    /// Creates a fresh random token.
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    #[must_use]
    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl fmt::Debug for LevelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "LevelId({})", self.0)
    }
}

impl fmt::Debug for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SessionToken({})", self.0)
    }
}

// ─── Display Implementations ───────────────────────────────────────────────────

impl fmt::Display for LevelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ─── FromStr Implementations ───────────────────────────────────────────────────

/// Error type for parsing ID from string
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseIdError {
    kind: String,
}

impl fmt::Display for ParseIdError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "failed to parse {} from string", self.kind)
    }
}

impl std::error::Error for ParseIdError {}

impl FromStr for LevelId {
    type Err = ParseIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<u32>()
            .ok()
            .and_then(|value| LevelId::new(value).ok())
            .ok_or_else(|| ParseIdError {
                kind: "LevelId".to_string(),
            })
    }
}

// ─── Tests ─────────────────────────────────────────────────────────────────────
