use diesel::prelude::*;
use uuid::Uuid;

use crate::infra::db::postgres::schema::subscription_plans;

#[derive(Debug, Clone, PartialEq)]
pub struct PlanEntity {
    pub id: Uuid,
    pub name: String,
    pub price_minor: i32,
    pub currency: String,
    pub duration_days: i32,
    pub quality: String,
    pub features: Vec<String>,
    pub is_active: bool,
}

impl PlanEntity {
    /// Active and priced above zero; checkout charges `price_minor` as a pending payment.
    pub fn is_purchasable(&self) -> bool {
        self.is_active && self.price_minor > 0
    }
}

/// Raw row used for Diesel queries. Features stay as JSON and are parsed into a list.
#[derive(Debug, Clone, Identifiable, Selectable, Queryable)]
#[diesel(table_name = subscription_plans)]
pub struct PlanRow {
    pub id: Uuid,
    pub name: String,
    pub price_minor: i32,
    pub currency: String,
    pub duration_days: i32,
    pub quality: String,
    pub features: serde_json::Value,
    pub is_active: bool,
}

impl From<PlanRow> for PlanEntity {
    fn from(value: PlanRow) -> Self {
        let features = serde_json::from_value(value.features).unwrap_or_default();

        Self {
            id: value.id,
            name: value.name,
            price_minor: value.price_minor,
            currency: value.currency,
            duration_days: value.duration_days,
            quality: value.quality,
            features,
            is_active: value.is_active,
        }
    }
}
