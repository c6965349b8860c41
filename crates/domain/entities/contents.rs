use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::infra::db::postgres::schema::contents;

#[derive(Debug, Clone, PartialEq, Identifiable, Selectable, Queryable)]
#[diesel(table_name = contents)]
pub struct ContentEntity {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub content_type: String, // movie | series, see value_objects/enums/content_types.rs
    pub thumbnail_url: Option<String>,
    pub video_url: Option<String>,
    pub is_exclusive: bool,
    pub release_year: Option<i32>,
    pub created_at: DateTime<Utc>,
}
