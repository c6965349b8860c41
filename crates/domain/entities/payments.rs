use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::infra::db::postgres::schema::payments;

#[derive(Debug, Clone, PartialEq, Identifiable, Selectable, Queryable)]
#[diesel(table_name = payments)]
pub struct PaymentEntity {
    pub id: Uuid,
    pub user_id: Uuid,
    pub subscription_id: Option<Uuid>,
    pub amount_minor: i32,
    pub currency: String,
    pub method: String,
    pub details: serde_json::Value,
    pub status: String,
    pub transaction_id: Option<String>,
    pub failure_reason: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Insertable)]
#[diesel(table_name = payments)]
pub struct InsertPaymentEntity {
    pub user_id: Uuid,
    pub subscription_id: Option<Uuid>,
    pub amount_minor: i32,
    pub currency: String,
    pub method: String,
    pub details: serde_json::Value,
    pub status: String,
}

// None fields are left untouched by the status update.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = payments)]
pub struct UpdatePaymentStatusEntity {
    pub status: String,
    pub transaction_id: Option<String>,
    pub failure_reason: Option<String>,
    pub completed_at: Option<DateTime<Utc>>,
    pub updated_at: DateTime<Utc>,
}
