use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use mockall::automock;
use uuid::Uuid;

use crate::domain::entities::users::UserEntity;

#[automock]
#[async_trait]
pub trait UserRepository {
    async fn find_by_id(&self, user_id: Uuid) -> Result<Option<UserEntity>>;

    /// Returns false when no such user exists.
    async fn set_vip_status(
        &self,
        user_id: Uuid,
        is_vip: bool,
        vip_expires_at: Option<DateTime<Utc>>,
    ) -> Result<bool>;
}
