use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Unique identifier for a lesson node on the unit map.
///
/// Lesson ids are numeric: the unlock frontier in [`crate::model::UserProgress`]
/// compares a completed id against `current_level` by value. At the persistence
/// boundary ids travel as strings (a JSON list), so `Display`/`FromStr` are the
/// canonical round-trip.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct LessonId(u64);

impl LessonId {
    /// Creates a new `LessonId`
    #[must_use]
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the underlying u64 value
    #[must_use]
    pub fn value(&self) -> u64 {
        self.0
    }
}

impl fmt::Debug for LessonId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "LessonId({})", self.0)
    }
}

impl fmt::Display for LessonId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Error type for parsing a `LessonId` from a string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseLessonIdError {
    raw: String,
}

impl fmt::Display for ParseLessonIdError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "failed to parse lesson id from {:?}", self.raw)
    }
}

impl std::error::Error for ParseLessonIdError {}

impl FromStr for LessonId {
    type Err = ParseLessonIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<u64>()
            .map(LessonId::new)
            .map_err(|_| ParseLessonIdError { raw: s.to_string() })
    }
}
