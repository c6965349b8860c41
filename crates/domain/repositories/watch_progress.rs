use anyhow::Result;
use async_trait::async_trait;
use mockall::automock;
use uuid::Uuid;

use crate::domain::entities::watch_progress::{UpsertWatchProgressEntity, WatchProgressEntity};

#[automock]
#[async_trait]
pub trait WatchProgressRepository {
    /// Single-statement upsert on `(user_id, content_id)`; last write wins.
    async fn upsert_progress(
        &self,
        progress: UpsertWatchProgressEntity,
    ) -> Result<WatchProgressEntity>;

    async fn find_progress(
        &self,
        user_id: Uuid,
        content_id: Uuid,
    ) -> Result<Option<WatchProgressEntity>>;

    /// Most recently updated first.
    async fn list_by_user(&self, user_id: Uuid) -> Result<Vec<WatchProgressEntity>>;
}
