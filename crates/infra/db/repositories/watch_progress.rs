use anyhow::Result;
use async_trait::async_trait;
use diesel::{RunQueryDsl, insert_into, prelude::*};
use std::sync::Arc;
use uuid::Uuid;

use super::PostgresStore;
use crate::domain::{
    entities::watch_progress::{
        UpdateWatchProgressEntity, UpsertWatchProgressEntity, WatchProgressEntity,
    },
    repositories::watch_progress::WatchProgressRepository,
};
use crate::infra::db::postgres::schema::watch_progress;

#[async_trait]
impl WatchProgressRepository for PostgresStore {
    async fn upsert_progress(
        &self,
        progress: UpsertWatchProgressEntity,
    ) -> Result<WatchProgressEntity> {
        let mut conn = Arc::clone(&self.db_pool).get()?;
        let changes = UpdateWatchProgressEntity::from(&progress);

        let record = insert_into(watch_progress::table)
            .values(&progress)
            .on_conflict((watch_progress::user_id, watch_progress::content_id))
            .do_update()
            .set(&changes)
            .returning(WatchProgressEntity::as_select())
            .get_result::<WatchProgressEntity>(&mut conn)?;

        Ok(record)
    }

    async fn find_progress(
        &self,
        user_id: Uuid,
        content_id: Uuid,
    ) -> Result<Option<WatchProgressEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let record = watch_progress::table
            .find((user_id, content_id))
            .select(WatchProgressEntity::as_select())
            .first::<WatchProgressEntity>(&mut conn)
            .optional()?;

        Ok(record)
    }

    async fn list_by_user(&self, user_id: Uuid) -> Result<Vec<WatchProgressEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let results = watch_progress::table
            .filter(watch_progress::user_id.eq(user_id))
            .order(watch_progress::updated_at.desc())
            .select(WatchProgressEntity::as_select())
            .load::<WatchProgressEntity>(&mut conn)?;

        Ok(results)
    }
}
