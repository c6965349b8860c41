use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::infra::db::postgres::schema::watch_progress;

#[derive(Debug, Clone, PartialEq, Identifiable, Selectable, Queryable)]
#[diesel(primary_key(user_id, content_id))]
#[diesel(table_name = watch_progress)]
pub struct WatchProgressEntity {
    pub user_id: Uuid,
    pub content_id: Uuid,
    pub progress: i32,
    pub current_season: Option<i32>,
    pub current_episode: Option<i32>,
    pub time_remaining: Option<i32>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Insertable)]
#[diesel(table_name = watch_progress)]
pub struct UpsertWatchProgressEntity {
    pub user_id: Uuid,
    pub content_id: Uuid,
    pub progress: i32,
    pub current_season: Option<i32>,
    pub current_episode: Option<i32>,
    pub time_remaining: Option<i32>,
    pub updated_at: DateTime<Utc>,
}

/// Conflict branch of the upsert. Omitted optional fields keep their stored value.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = watch_progress)]
pub struct UpdateWatchProgressEntity {
    pub progress: i32,
    pub current_season: Option<i32>,
    pub current_episode: Option<i32>,
    pub time_remaining: Option<i32>,
    pub updated_at: DateTime<Utc>,
}

impl From<&UpsertWatchProgressEntity> for UpdateWatchProgressEntity {
    fn from(value: &UpsertWatchProgressEntity) -> Self {
        Self {
            progress: value.progress,
            current_season: value.current_season,
            current_episode: value.current_episode,
            time_remaining: value.time_remaining,
            updated_at: value.updated_at,
        }
    }
}
