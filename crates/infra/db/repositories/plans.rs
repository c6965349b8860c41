use anyhow::Result;
use async_trait::async_trait;
use diesel::{RunQueryDsl, prelude::*};
use std::sync::Arc;
use uuid::Uuid;

use super::PostgresStore;
use crate::domain::{
    entities::plans::{PlanEntity, PlanRow},
    repositories::plans::PlanRepository,
};
use crate::infra::db::postgres::schema::subscription_plans;

#[async_trait]
impl PlanRepository for PostgresStore {
    async fn find_active_plan_by_id(&self, plan_id: Uuid) -> Result<Option<PlanEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let row = subscription_plans::table
            .filter(subscription_plans::id.eq(plan_id))
            .filter(subscription_plans::is_active.eq(true))
            .filter(subscription_plans::price_minor.gt(0))
            .select(PlanRow::as_select())
            .first::<PlanRow>(&mut conn)
            .optional()?;

        Ok(row.map(PlanEntity::from))
    }

    async fn find_by_id(&self, plan_id: Uuid) -> Result<Option<PlanEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let row = subscription_plans::table
            .find(plan_id)
            .select(PlanRow::as_select())
            .first::<PlanRow>(&mut conn)
            .optional()?;

        Ok(row.map(PlanEntity::from))
    }

    async fn list_active_plans(&self) -> Result<Vec<PlanEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let rows = subscription_plans::table
            .filter(subscription_plans::is_active.eq(true))
            .filter(subscription_plans::price_minor.gt(0))
            .order(subscription_plans::price_minor.asc())
            .select(PlanRow::as_select())
            .load::<PlanRow>(&mut conn)?;

        Ok(rows.into_iter().map(PlanEntity::from).collect())
    }
}
