use services::DashboardData;
use stream_core::model::{ContentId, ContentItem};

use super::content_card_vm::{ContentCardVm, format_meta, format_rating, kind_label, map_content_card};

pub const CONTINUE_WATCHING_TITLE: &str = "Continue Watching";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HeroVm {
    pub id: ContentId,
    pub title: String,
    pub description: String,
    pub image_url: String,
    pub rating_label: Option<String>,
    pub kind_label: &'static str,
    pub meta: String,
    pub is_favorite: bool,
}

/// One horizontal row of cards.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ContentRowVm {
    pub key: String,
    pub title: String,
    pub cards: Vec<ContentCardVm>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DashboardVm {
    pub user_name: String,
    pub hero: Option<HeroVm>,
    pub rows: Vec<ContentRowVm>,
}

impl DashboardVm {
    /// No titles at all; distinct from a failed load.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Continue-watching row first (when non-empty), then one row per category.
#[must_use]
pub fn map_dashboard(data: &DashboardData) -> DashboardVm {
    let dashboard = &data.dashboard;
    let card = |item: &ContentItem| {
        map_content_card(
            item,
            dashboard.progress_for(item.id),
            data.is_favorite(item.id),
        )
    };

    let mut rows = Vec::with_capacity(dashboard.by_category().len() + 1);
    if !dashboard.continue_watching().is_empty() {
        rows.push(ContentRowVm {
            key: "continue-watching".to_owned(),
            title: CONTINUE_WATCHING_TITLE.to_owned(),
            cards: dashboard.continue_watching().iter().map(card).collect(),
        });
    }
    rows.extend(dashboard.by_category().iter().map(|group| ContentRowVm {
        key: format!("category-{}", group.category),
        title: group.category.clone(),
        cards: group.items.iter().map(card).collect(),
    }));

    DashboardVm {
        user_name: data.user_name.clone(),
        hero: data.hero.as_ref().map(|item| map_hero(item, data.is_favorite(item.id))),
        rows,
    }
}

fn map_hero(item: &ContentItem, is_favorite: bool) -> HeroVm {
    HeroVm {
        id: item.id,
        title: item.title.clone(),
        description: item.description.clone(),
        image_url: item.image_url.clone(),
        rating_label: item.rating.map(format_rating),
        kind_label: kind_label(item.kind),
        meta: format_meta(item.year, item.duration.as_deref()),
        is_favorite,
    }
}
