use anyhow::Result;
use async_trait::async_trait;
use diesel::{RunQueryDsl, prelude::*};
use std::sync::Arc;
use uuid::Uuid;

use super::PostgresStore;
use crate::domain::{entities::contents::ContentEntity, repositories::contents::ContentRepository};
use crate::infra::db::postgres::schema::contents;

#[async_trait]
impl ContentRepository for PostgresStore {
    async fn find_by_id(&self, content_id: Uuid) -> Result<Option<ContentEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let content = contents::table
            .find(content_id)
            .select(ContentEntity::as_select())
            .first::<ContentEntity>(&mut conn)
            .optional()?;

        Ok(content)
    }

    async fn list_by_ids(&self, content_ids: Vec<Uuid>) -> Result<Vec<ContentEntity>> {
        if content_ids.is_empty() {
            return Ok(Vec::new());
        }

        let mut conn = Arc::clone(&self.db_pool).get()?;

        let mut results = contents::table
            .filter(contents::id.eq_any(content_ids.clone()))
            .select(ContentEntity::as_select())
            .load::<ContentEntity>(&mut conn)?;

        // Keep the caller's ordering (favorites are listed newest first).
        results.sort_by_key(|content| {
            content_ids
                .iter()
                .position(|id| *id == content.id)
                .unwrap_or(usize::MAX)
        });

        Ok(results)
    }
}
