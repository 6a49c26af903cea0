use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::ids::{ContentId, UserId};

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum ProgressError {
    #[error("progress must be between 0 and 100, got {0}")]
    OutOfRange(i64),
}

/// Watch completion percentage in `0..=100`.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub struct Progress(u8);

impl Progress {
    pub const NONE: Progress = Progress(0);
    pub const COMPLETE: Progress = Progress(100);

    /// # Errors
    ///
    /// Returns `ProgressError::OutOfRange` for values outside `0..=100`.
    pub fn new(percent: i64) -> Result<Self, ProgressError> {
        u8::try_from(percent)
            .ok()
            .filter(|p| *p <= 100)
            .map(Self)
            .ok_or(ProgressError::OutOfRange(percent))
    }

    #[must_use]
    pub fn percent(self) -> u8 {
        self.0
    }

    #[must_use]
    pub fn is_started(self) -> bool {
        self.0 > 0
    }

    #[must_use]
    pub fn is_complete(self) -> bool {
        self.0 >= 100
    }

    /// Started but not finished: what "continue watching" is made of.
    #[must_use]
    pub fn is_in_progress(self) -> bool {
        self.is_started() && !self.is_complete()
    }
}

impl TryFrom<i64> for Progress {
    type Error = ProgressError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Progress> for i64 {
    fn from(value: Progress) -> Self {
        i64::from(value.0)
    }
}

impl fmt::Debug for Progress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Progress({}%)", self.0)
    }
}

impl fmt::Display for Progress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.0)
    }
}

/// A user's watch position for one title.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressRecord {
    pub user_id: UserId,
    pub content_id: ContentId,
    pub progress: Progress,
    pub last_watched: DateTime<Utc>,
}

impl ProgressRecord {
    #[must_use]
    pub fn new(
        user_id: UserId,
        content_id: ContentId,
        progress: Progress,
        last_watched: DateTime<Utc>,
    ) -> Self {
        Self {
            user_id,
            content_id,
            progress,
            last_watched,
        }
    }
}
