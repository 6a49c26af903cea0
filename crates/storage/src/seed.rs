//! Demo data for local runs: a small catalog and one viewer with history.

use chrono::{DateTime, Duration, Utc};
use stream_core::model::{
    ContentId, ContentItem, ContentKind, Credentials, Progress, ProgressRecord, UserId,
    UserProfile,
};
use uuid::Uuid;

use crate::repository::{InMemoryRepository, ProgressRepository, StorageError, UserRepository};
use crate::sqlite::SqliteRepository;

pub const DEMO_EMAIL: &str = "demo@cinestream.local";
pub const DEMO_PASSWORD: &str = "watchnow";
pub const DEMO_NAME: &str = "Demo Viewer";

const DEMO_USER: u128 = 0x5c1e_0000_0000_4000_8000_0000_0000_0001;

#[must_use]
pub fn demo_user_id() -> UserId {
    UserId::new(Uuid::from_u128(DEMO_USER))
}

struct Title {
    id: u64,
    title: &'static str,
    kind: ContentKind,
    category: &'static str,
    rating: Option<f32>,
    year: i32,
    duration: &'static str,
    featured: bool,
    description: &'static str,
}

const TITLES: &[Title] = &[
    Title {
        id: 1,
        title: "Iron Horizon",
        kind: ContentKind::Movie,
        category: "Action",
        rating: Some(8.4),
        year: 2023,
        duration: "2h 12m",
        featured: true,
        description: "A salvage pilot races a corporate fleet to a derelict warship.",
    },
    Title {
        id: 2,
        title: "Last Exit North",
        kind: ContentKind::Movie,
        category: "Action",
        rating: Some(7.1),
        year: 2021,
        duration: "1h 48m",
        featured: false,
        description: "Two couriers, one stolen van, and a border that closes at dawn.",
    },
    Title {
        id: 3,
        title: "The Quiet Years",
        kind: ContentKind::Series,
        category: "Drama",
        rating: Some(8.9),
        year: 2022,
        duration: "2 seasons",
        featured: true,
        description: "A family rebuilds its vineyard after a decade of drought.",
    },
    Title {
        id: 4,
        title: "Harbor Lights",
        kind: ContentKind::Movie,
        category: "Drama",
        rating: Some(6.8),
        year: 2019,
        duration: "1h 55m",
        featured: false,
        description: "A lighthouse keeper's last season before automation.",
    },
    Title {
        id: 5,
        title: "Office Hours",
        kind: ContentKind::Series,
        category: "Comedy",
        rating: Some(7.6),
        year: 2024,
        duration: "1 season",
        featured: false,
        description: "A night-school professor runs out of excuses.",
    },
    Title {
        id: 6,
        title: "Second Helpings",
        kind: ContentKind::Movie,
        category: "Comedy",
        rating: None,
        year: 2024,
        duration: "1h 37m",
        featured: false,
        description: "A disastrous cooking show becomes a surprise hit.",
    },
    Title {
        id: 7,
        title: "Signal Lost",
        kind: ContentKind::Series,
        category: "Sci-Fi",
        rating: Some(8.1),
        year: 2023,
        duration: "3 seasons",
        featured: true,
        description: "A deep-space relay station stops answering.",
    },
    Title {
        id: 8,
        title: "Under the Ice",
        kind: ContentKind::Movie,
        category: "Documentary",
        rating: Some(7.9),
        year: 2020,
        duration: "1h 29m",
        featured: false,
        description: "Divers map the caves beneath an Antarctic shelf.",
    },
];

/// The demo catalog, newest title first by `created_at`.
#[must_use]
pub fn demo_catalog(now: DateTime<Utc>) -> Vec<ContentItem> {
    TITLES
        .iter()
        .map(|t| {
            let added = now - Duration::days(i64::try_from(t.id).unwrap_or(0));
            let mut item = ContentItem::new(
                ContentId::new(t.id),
                t.title,
                t.category,
                t.kind,
                added,
            )
            .with_description(t.description)
            .with_image_url(format!("https://picsum.photos/seed/cinestream-{}/600/340", t.id))
            .with_release(t.year, t.duration);
            if let Some(rating) = t.rating {
                item = item.with_rating(rating);
            }
            if t.featured {
                item = item.featured();
            }
            item
        })
        .collect()
}

/// Watch history for `user`: two titles in progress and one finished.
///
/// # Errors
///
/// Returns `StorageError::Serialization` if a hard-coded percentage is invalid.
pub fn demo_progress(
    user: UserId,
    now: DateTime<Utc>,
) -> Result<Vec<ProgressRecord>, StorageError> {
    [(1, 40, 2), (3, 75, 1), (8, 100, 5)]
        .into_iter()
        .map(|(id, percent, days_ago)| {
            let progress = Progress::new(percent)
                .map_err(|e| StorageError::Serialization(e.to_string()))?;
            Ok(ProgressRecord::new(
                user,
                ContentId::new(id),
                progress,
                now - Duration::days(days_ago),
            ))
        })
        .collect()
}

/// Counts of rows written by [`seed_local`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeedReport {
    pub content: usize,
    pub progress: usize,
}

/// Upsert the demo catalog into `repo`.
///
/// # Errors
///
/// Returns `StorageError` if a write fails.
pub async fn seed_catalog(
    repo: &SqliteRepository,
    now: DateTime<Utc>,
) -> Result<usize, StorageError> {
    let catalog = demo_catalog(now);
    for item in &catalog {
        repo.upsert_content(item).await?;
    }
    Ok(catalog.len())
}

/// Seed the catalog, then register the demo viewer in `accounts` and give it
/// a profile and watch history in `repo`.
///
/// Re-running is harmless: rows are upserted and an existing profile is kept.
///
/// # Errors
///
/// Returns `StorageError` if a write fails or the demo credentials are rejected.
pub async fn seed_local(
    repo: &SqliteRepository,
    accounts: &InMemoryRepository,
    now: DateTime<Utc>,
) -> Result<SeedReport, StorageError> {
    let content = seed_catalog(repo, now).await?;

    let user = demo_user_id();
    let credentials = Credentials::new(DEMO_EMAIL, DEMO_PASSWORD)
        .map_err(|e| StorageError::Serialization(e.to_string()))?;
    match accounts.insert_account(user, &credentials) {
        Ok(()) | Err(StorageError::Conflict) => {}
        Err(e) => return Err(e),
    }

    let profile = UserProfile::new(user, DEMO_EMAIL, DEMO_NAME, now)
        .map_err(|e| StorageError::Serialization(e.to_string()))?;
    match repo.insert_profile(&profile).await {
        Ok(()) | Err(StorageError::Conflict) => {}
        Err(e) => return Err(e),
    }

    let history = demo_progress(user, now)?;
    for record in &history {
        repo.upsert_progress(record).await?;
    }

    log::info!(
        "seeded {content} titles and {} progress rows for {DEMO_EMAIL}",
        history.len()
    );
    Ok(SeedReport {
        content,
        progress: history.len(),
    })
}
