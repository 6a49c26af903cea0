use std::sync::Arc;

use storage::repository::CatalogRepository;
use stream_core::model::{ContentId, ContentItem, ContentKind, ContentOrder};

use crate::error::CatalogServiceError;

pub const DEFAULT_FEATURED_LIMIT: u32 = 5;

/// Read-only access to the catalog.
#[derive(Clone)]
pub struct CatalogService {
    catalog: Arc<dyn CatalogRepository>,
}

impl CatalogService {
    #[must_use]
    pub fn new(catalog: Arc<dyn CatalogRepository>) -> Self {
        Self { catalog }
    }

    /// # Errors
    ///
    /// Returns `CatalogServiceError::Storage` if the fetch fails.
    pub async fn list(
        &self,
        order: ContentOrder,
        kind: Option<ContentKind>,
    ) -> Result<Vec<ContentItem>, CatalogServiceError> {
        Ok(self.catalog.list_content(order, kind).await?)
    }

    /// Featured titles, best rated first.
    ///
    /// # Errors
    ///
    /// Returns `CatalogServiceError::Storage` if the fetch fails.
    pub async fn featured(&self, limit: u32) -> Result<Vec<ContentItem>, CatalogServiceError> {
        Ok(self.catalog.featured_content(limit).await?)
    }

    /// # Errors
    ///
    /// Returns `CatalogServiceError::Storage` if the fetch fails.
    pub async fn get(&self, id: ContentId) -> Result<Option<ContentItem>, CatalogServiceError> {
        Ok(self.catalog.get_content(id).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use storage::repository::InMemoryRepository;
    use stream_core::time::fixed_now;

    fn seeded() -> CatalogService {
        let repo = InMemoryRepository::new();
        let items = [
            (1, ContentKind::Movie, Some(7.0), true),
            (2, ContentKind::Series, Some(9.1), true),
            (3, ContentKind::Movie, None, false),
        ];
        for (id, kind, rating, featured) in items {
            let mut item =
                ContentItem::new(ContentId::new(id), format!("T{id}"), "Drama", kind, fixed_now());
            item.rating = rating;
            item.featured = featured;
            repo.upsert_content(item).unwrap();
        }
        CatalogService::new(Arc::new(repo))
    }

    #[tokio::test]
    async fn featured_is_rating_ordered_and_limited() {
        let svc = seeded();
        let featured = svc.featured(DEFAULT_FEATURED_LIMIT).await.unwrap();
        let ids: Vec<u64> = featured.iter().map(|c| c.id.value()).collect();
        assert_eq!(ids, vec![2, 1]);
        assert_eq!(svc.featured(1).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn list_filters_by_kind() {
        let svc = seeded();
        let movies = svc
            .list(ContentOrder::RatingDesc, Some(ContentKind::Movie))
            .await
            .unwrap();
        let ids: Vec<u64> = movies.iter().map(|c| c.id.value()).collect();
        assert_eq!(ids, vec![1, 3]);
        assert!(svc.get(ContentId::new(42)).await.unwrap().is_none());
    }
}
