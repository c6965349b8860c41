use anyhow::Result;
use async_trait::async_trait;
use mockall::automock;
use uuid::Uuid;

use crate::domain::entities::favorites::InsertFavoriteEntity;

#[automock]
#[async_trait]
pub trait FavoriteRepository {
    /// Insert-or-ignore on `(user_id, content_id)`. True when a row was inserted.
    async fn add_favorite(&self, favorite: InsertFavoriteEntity) -> Result<bool>;

    /// True when a row was deleted.
    async fn remove_favorite(&self, user_id: Uuid, content_id: Uuid) -> Result<bool>;

    async fn is_favorite(&self, user_id: Uuid, content_id: Uuid) -> Result<bool>;

    /// Most recently added first.
    async fn list_content_ids(&self, user_id: Uuid) -> Result<Vec<Uuid>>;
}
