use anyhow::Result;
use async_trait::async_trait;
use mockall::automock;
use uuid::Uuid;

use crate::domain::entities::contents::ContentEntity;

/// Read-only view of the catalog.
#[automock]
#[async_trait]
pub trait ContentRepository {
    async fn find_by_id(&self, content_id: Uuid) -> Result<Option<ContentEntity>>;

    /// Ids without a catalog entry are skipped, not reported.
    async fn list_by_ids(&self, content_ids: Vec<Uuid>) -> Result<Vec<ContentEntity>>;
}
