//! Entitlement gate: the single authority on whether a viewer gets VIP access.
//!
//! Everything here is a pure function of its inputs. Expiry is evaluated at
//! read time against `now`; a stale `is_vip = true` flag is never cleared by
//! these functions.

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::domain::entities::{contents::ContentEntity, users::UserEntity};
use crate::domain::value_objects::{
    contents::ContentView,
    enums::{content_types::ContentType, video_qualities::VideoQuality},
};

/// True iff the user is flagged VIP and the grant has not expired.
pub fn is_entitled(user: &UserEntity, now: DateTime<Utc>) -> bool {
    user.is_vip
        && match user.vip_expires_at {
            None => true,
            Some(expires_at) => expires_at > now,
        }
}

/// Anonymous viewers are never entitled.
pub fn viewer_is_entitled(viewer: Option<&UserEntity>, now: DateTime<Utc>) -> bool {
    viewer.is_some_and(|user| is_entitled(user, now))
}

/// Redacts `video_url` on exclusive content for viewers without entitlement.
pub fn project_content(
    content: ContentEntity,
    viewer: Option<&UserEntity>,
    now: DateTime<Utc>,
) -> ContentView {
    let vip_required = content.is_exclusive && !viewer_is_entitled(viewer, now);
    let video_url = if vip_required { None } else { content.video_url };

    ContentView {
        id: content.id,
        title: content.title,
        description: content.description,
        content_type: ContentType::from_str(&content.content_type),
        thumbnail_url: content.thumbnail_url,
        video_url,
        is_exclusive: content.is_exclusive,
        release_year: content.release_year,
        created_at: content.created_at,
        vip_required,
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct EntitlementDto {
    pub user_id: Uuid,
    pub is_vip: bool,
    pub vip_expires_at: Option<DateTime<Utc>>,
    pub entitled: bool,
    pub preferred_quality: VideoQuality,
}

impl EntitlementDto {
    pub fn evaluate(user: &UserEntity, now: DateTime<Utc>) -> Self {
        Self {
            user_id: user.id,
            is_vip: user.is_vip,
            vip_expires_at: user.vip_expires_at,
            entitled: is_entitled(user, now),
            preferred_quality: VideoQuality::from_str(&user.preferred_quality),
        }
    }
}
