use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::ids::ContentId;

//
// ─── CONTENT KIND ──────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unknown content kind: {0}")]
pub struct ContentKindError(pub String);

/// Whether a title is a single film or an episodic series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentKind {
    Movie,
    Series,
}

impl ContentKind {
    /// Wire/storage representation.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            ContentKind::Movie => "movie",
            ContentKind::Series => "series",
        }
    }
}

impl fmt::Display for ContentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ContentKind {
    type Err = ContentKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "movie" => Ok(ContentKind::Movie),
            "series" => Ok(ContentKind::Series),
            other => Err(ContentKindError(other.to_owned())),
        }
    }
}

//
// ─── ORDERING ──────────────────────────────────────────────────────────────────
//

/// Sort order requested from the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ContentOrder {
    /// Highest rated first. Used by the dashboard.
    RatingDesc,
    /// Most recently added first.
    #[default]
    NewestFirst,
}

//
// ─── CONTENT ITEM ──────────────────────────────────────────────────────────────
//

/// One watchable title from the catalog.
///
/// Catalog rows are owned by the backend; the app never mutates them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentItem {
    pub id: ContentId,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub image_url: String,
    #[serde(rename = "type")]
    pub kind: ContentKind,
    #[serde(default)]
    pub rating: Option<f32>,
    #[serde(default)]
    pub year: Option<i32>,
    #[serde(default)]
    pub duration: Option<String>,
    pub category: String,
    #[serde(default)]
    pub featured: bool,
    pub created_at: DateTime<Utc>,
}

impl ContentItem {
    /// Minimal item with empty presentation fields.
    #[must_use]
    pub fn new(
        id: ContentId,
        title: impl Into<String>,
        category: impl Into<String>,
        kind: ContentKind,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            title: title.into(),
            description: String::new(),
            image_url: String::new(),
            kind,
            rating: None,
            year: None,
            duration: None,
            category: category.into(),
            featured: false,
            created_at,
        }
    }

    #[must_use]
    pub fn with_rating(mut self, rating: f32) -> Self {
        self.rating = Some(rating);
        self
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    #[must_use]
    pub fn with_image_url(mut self, url: impl Into<String>) -> Self {
        self.image_url = url.into();
        self
    }

    #[must_use]
    pub fn with_release(mut self, year: i32, duration: impl Into<String>) -> Self {
        self.year = Some(year);
        self.duration = Some(duration.into());
        self
    }

    #[must_use]
    pub fn featured(mut self) -> Self {
        self.featured = true;
        self
    }
}

/// Sort a catalog snapshot the way the backend would for `order`.
///
/// Unrated items sort after rated ones; ties keep their input order.
pub fn sort_content(items: &mut [ContentItem], order: ContentOrder) {
    match order {
        ContentOrder::RatingDesc => items.sort_by(|a, b| {
            let a = a.rating.unwrap_or(f32::NEG_INFINITY);
            let b = b.rating.unwrap_or(f32::NEG_INFINITY);
            b.total_cmp(&a)
        }),
        ContentOrder::NewestFirst => items.sort_by(|a, b| b.created_at.cmp(&a.created_at)),
    }
}
