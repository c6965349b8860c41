use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::domain::value_objects::enums::content_types::ContentType;

/// Catalog item as seen by one viewer. `video_url` is only present when the
/// viewer may play it.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ContentView {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub content_type: ContentType,
    pub thumbnail_url: Option<String>,
    pub video_url: Option<String>,
    pub is_exclusive: bool,
    pub release_year: Option<i32>,
    pub created_at: DateTime<Utc>,
    pub vip_required: bool,
}
