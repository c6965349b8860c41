use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::infra::db::postgres::schema::favorites;

#[derive(Debug, Clone, PartialEq, Identifiable, Selectable, Queryable)]
#[diesel(primary_key(user_id, content_id))]
#[diesel(table_name = favorites)]
pub struct FavoriteEntity {
    pub user_id: Uuid,
    pub content_id: Uuid,
    pub added_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Insertable)]
#[diesel(table_name = favorites)]
pub struct InsertFavoriteEntity {
    pub user_id: Uuid,
    pub content_id: Uuid,
    pub added_at: DateTime<Utc>,
}
