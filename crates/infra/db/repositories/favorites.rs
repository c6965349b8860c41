use anyhow::Result;
use async_trait::async_trait;
use diesel::{RunQueryDsl, delete, dsl::exists, insert_into, prelude::*, select};
use std::sync::Arc;
use uuid::Uuid;

use super::PostgresStore;
use crate::domain::{
    entities::favorites::InsertFavoriteEntity, repositories::favorites::FavoriteRepository,
};
use crate::infra::db::postgres::schema::favorites;

#[async_trait]
impl FavoriteRepository for PostgresStore {
    async fn add_favorite(&self, favorite: InsertFavoriteEntity) -> Result<bool> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        // The primary key settles concurrent duplicates; the loser inserts nothing.
        let inserted = insert_into(favorites::table)
            .values(&favorite)
            .on_conflict_do_nothing()
            .execute(&mut conn)?;

        Ok(inserted > 0)
    }

    async fn remove_favorite(&self, user_id: Uuid, content_id: Uuid) -> Result<bool> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let deleted = delete(favorites::table.find((user_id, content_id))).execute(&mut conn)?;

        Ok(deleted > 0)
    }

    async fn is_favorite(&self, user_id: Uuid, content_id: Uuid) -> Result<bool> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let found = select(exists(favorites::table.find((user_id, content_id))))
            .get_result::<bool>(&mut conn)?;

        Ok(found)
    }

    async fn list_content_ids(&self, user_id: Uuid) -> Result<Vec<Uuid>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let ids = favorites::table
            .filter(favorites::user_id.eq(user_id))
            .order(favorites::added_at.desc())
            .select(favorites::content_id)
            .load::<Uuid>(&mut conn)?;

        Ok(ids)
    }
}
