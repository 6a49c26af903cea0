use stream_core::model::{ContentId, ContentItem, ContentKind, Progress};

/// UI-ready content card for dashboard rows.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ContentCardVm {
    pub id: ContentId,
    pub title: String,
    pub image_url: String,
    pub rating_label: Option<String>,
    pub kind_label: &'static str,
    pub kind_class: &'static str,
    pub meta: String,
    /// Watched percentage, only while the title is partly watched.
    pub progress_percent: Option<u8>,
    pub is_favorite: bool,
}

#[must_use]
pub fn map_content_card(
    item: &ContentItem,
    progress: Option<Progress>,
    is_favorite: bool,
) -> ContentCardVm {
    ContentCardVm {
        id: item.id,
        title: item.title.clone(),
        image_url: item.image_url.clone(),
        rating_label: item.rating.map(format_rating),
        kind_label: kind_label(item.kind),
        kind_class: kind_class(item.kind),
        meta: format_meta(item.year, item.duration.as_deref()),
        progress_percent: progress
            .filter(|p| p.is_in_progress())
            .map(Progress::percent),
        is_favorite,
    }
}

#[must_use]
pub fn format_rating(rating: f32) -> String {
    format!("{rating:.1}")
}

#[must_use]
pub fn kind_label(kind: ContentKind) -> &'static str {
    match kind {
        ContentKind::Movie => "Movie",
        ContentKind::Series => "Series",
    }
}

fn kind_class(kind: ContentKind) -> &'static str {
    match kind {
        ContentKind::Movie => "badge badge-movie",
        ContentKind::Series => "badge badge-series",
    }
}

/// "2021 · 2h 15m", either half alone, or empty.
#[must_use]
pub fn format_meta(year: Option<i32>, duration: Option<&str>) -> String {
    let duration = duration.map(str::trim).filter(|d| !d.is_empty());
    match (year, duration) {
        (Some(year), Some(duration)) => format!("{year} · {duration}"),
        (Some(year), None) => year.to_string(),
        (None, Some(duration)) => duration.to_owned(),
        (None, None) => String::new(),
    }
}
