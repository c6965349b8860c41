use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::{PgConnection, QueryResult, RunQueryDsl, prelude::*, update};
use std::sync::Arc;
use uuid::Uuid;

use super::PostgresStore;
use crate::domain::{
    entities::users::{UpdateVipStatusEntity, UserEntity},
    repositories::users::UserRepository,
};
use crate::infra::db::postgres::schema::users;

#[async_trait]
impl UserRepository for PostgresStore {
    async fn find_by_id(&self, user_id: Uuid) -> Result<Option<UserEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let user = users::table
            .find(user_id)
            .select(UserEntity::as_select())
            .first::<UserEntity>(&mut conn)
            .optional()?;

        Ok(user)
    }

    async fn set_vip_status(
        &self,
        user_id: Uuid,
        is_vip: bool,
        vip_expires_at: Option<DateTime<Utc>>,
    ) -> Result<bool> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let updated = write_vip_status(&mut conn, user_id, is_vip, vip_expires_at, Utc::now())?;

        Ok(updated)
    }
}

/// Shared with the subscription transactions so the VIP columns move together
/// with the subscription row.
pub(super) fn write_vip_status(
    conn: &mut PgConnection,
    user_id: Uuid,
    is_vip: bool,
    vip_expires_at: Option<DateTime<Utc>>,
    at: DateTime<Utc>,
) -> QueryResult<bool> {
    let rows = update(users::table.find(user_id))
        .set(&UpdateVipStatusEntity {
            is_vip,
            vip_expires_at,
            updated_at: at,
        })
        .execute(conn)?;

    Ok(rows > 0)
}
