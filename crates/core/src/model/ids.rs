use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Catalog row identifier.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContentId(u64);

impl ContentId {
    #[must_use]
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    #[must_use]
    pub fn value(&self) -> u64 {
        self.0
    }
}

/// Row identifier of a favorite entry.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FavoriteId(u64);

impl FavoriteId {
    #[must_use]
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    #[must_use]
    pub fn value(&self) -> u64 {
        self.0
    }
}

/// Account identifier issued by the auth backend.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(Uuid);

impl UserId {
    #[must_use]
    pub fn new(id: Uuid) -> Self {
        Self(id)
    }

    /// Fresh random id, used by local backends that issue their own accounts.
    #[must_use]
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    #[must_use]
    pub fn value(&self) -> Uuid {
        self.0
    }
}

impl fmt::Debug for ContentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ContentId({})", self.0)
    }
}

impl fmt::Debug for FavoriteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FavoriteId({})", self.0)
    }
}

impl fmt::Debug for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "UserId({})", self.0)
    }
}

impl fmt::Display for ContentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for FavoriteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.hyphenated())
    }
}

/// Error type for parsing an id from a string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseIdError {
    kind: &'static str,
}

impl fmt::Display for ParseIdError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "failed to parse {} from string", self.kind)
    }
}

impl std::error::Error for ParseIdError {}

impl FromStr for ContentId {
    type Err = ParseIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<u64>()
            .map(ContentId::new)
            .map_err(|_| ParseIdError { kind: "ContentId" })
    }
}

impl FromStr for FavoriteId {
    type Err = ParseIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<u64>()
            .map(FavoriteId::new)
            .map_err(|_| ParseIdError { kind: "FavoriteId" })
    }
}

impl FromStr for UserId {
    type Err = ParseIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s.trim())
            .map(UserId::new)
            .map_err(|_| ParseIdError { kind: "UserId" })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn content_id_parses_and_displays() {
        let id: ContentId = " 42 ".parse().unwrap();
        assert_eq!(id, ContentId::new(42));
        assert_eq!(id.to_string(), "42");
    }

    #[test]
    fn content_id_rejects_garbage() {
        assert!("not-a-number".parse::<ContentId>().is_err());
        assert!("-1".parse::<ContentId>().is_err());
    }

    #[test]
    fn user_id_parses_hyphenated_uuid() {
        let raw = "6f1c7a52-3f0e-4d8e-9a57-1b2f3c4d5e6f";
        let id: UserId = raw.parse().unwrap();
        assert_eq!(id.to_string(), raw);
    }

    #[test]
    fn user_id_rejects_non_uuid() {
        let err = "user-1".parse::<UserId>().unwrap_err();
        assert_eq!(err.to_string(), "failed to parse UserId from string");
    }
}
