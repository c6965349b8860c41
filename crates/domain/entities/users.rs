use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::infra::db::postgres::schema::users;

/// Identity is owned elsewhere; this service only touches the VIP columns.
#[derive(Debug, Clone, PartialEq, Identifiable, Selectable, Queryable)]
#[diesel(table_name = users)]
pub struct UserEntity {
    pub id: Uuid,
    pub email: String,
    pub display_name: Option<String>,
    pub is_vip: bool,
    pub vip_expires_at: Option<DateTime<Utc>>,
    pub preferred_quality: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// `treat_none_as_null` so a revoke clears `vip_expires_at` instead of skipping it.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = users, treat_none_as_null = true)]
pub struct UpdateVipStatusEntity {
    pub is_vip: bool,
    pub vip_expires_at: Option<DateTime<Utc>>,
    pub updated_at: DateTime<Utc>,
}
