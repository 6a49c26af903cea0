use std::sync::Arc;

use storage::repository::ProgressRepository;
use stream_core::model::{ContentId, Progress, ProgressRecord, UserId};

use crate::Clock;
use crate::error::ProgressServiceError;

/// Watch position per (user, title).
#[derive(Clone)]
pub struct ProgressService {
    clock: Clock,
    progress: Arc<dyn ProgressRepository>,
}

impl ProgressService {
    #[must_use]
    pub fn new(clock: Clock, progress: Arc<dyn ProgressRepository>) -> Self {
        Self { clock, progress }
    }

    /// Most recently watched first.
    ///
    /// # Errors
    ///
    /// Returns `ProgressServiceError::Storage` if the fetch fails.
    pub async fn list(&self, user: UserId) -> Result<Vec<ProgressRecord>, ProgressServiceError> {
        Ok(self.progress.list_progress(user).await?)
    }

    /// Record `percent` for the title, replacing any earlier value.
    ///
    /// # Errors
    ///
    /// Returns `ProgressServiceError::Progress` if `percent` is outside 0..=100.
    /// Returns `ProgressServiceError::Storage` if the write fails.
    pub async fn update(
        &self,
        user: UserId,
        content: ContentId,
        percent: i64,
    ) -> Result<ProgressRecord, ProgressServiceError> {
        let record = ProgressRecord::new(user, content, Progress::new(percent)?, self.clock.now());
        self.progress.upsert_progress(&record).await?;
        log::debug!("progress for {content} set to {}", record.progress);
        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use storage::repository::InMemoryRepository;
    use stream_core::model::ProgressError;
    use stream_core::time::{fixed_clock, fixed_now};

    #[tokio::test]
    async fn update_stamps_clock_and_replaces() {
        let repo = InMemoryRepository::new();
        let svc = ProgressService::new(fixed_clock(), Arc::new(repo));
        let user = UserId::random();
        let id = ContentId::new(4);

        svc.update(user, id, 10).await.unwrap();
        let record = svc.update(user, id, 60).await.unwrap();
        assert_eq!(record.last_watched, fixed_now());

        let rows = svc.list(user).await.unwrap();
        assert_eq!(rows, vec![record]);
    }

    #[tokio::test]
    async fn out_of_range_percent_is_rejected() {
        let svc = ProgressService::new(fixed_clock(), Arc::new(InMemoryRepository::new()));
        let err = svc
            .update(UserId::random(), ContentId::new(1), 101)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ProgressServiceError::Progress(ProgressError::OutOfRange(101))
        ));
    }
}
