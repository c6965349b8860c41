use anyhow::Result;
use async_trait::async_trait;
use diesel::{RunQueryDsl, insert_into, prelude::*, update};
use std::sync::Arc;
use uuid::Uuid;

use super::PostgresStore;
use crate::domain::{
    entities::payments::{InsertPaymentEntity, PaymentEntity},
    repositories::payments::PaymentRepository,
    value_objects::payments::PaymentTransitionModel,
};
use crate::infra::db::postgres::schema::payments;

#[async_trait]
impl PaymentRepository for PostgresStore {
    async fn create_payment(&self, payment: InsertPaymentEntity) -> Result<PaymentEntity> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let result = insert_into(payments::table)
            .values(&payment)
            .returning(PaymentEntity::as_select())
            .get_result::<PaymentEntity>(&mut conn)?;

        Ok(result)
    }

    async fn find_by_id(&self, payment_id: Uuid) -> Result<Option<PaymentEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let payment = payments::table
            .find(payment_id)
            .select(PaymentEntity::as_select())
            .first::<PaymentEntity>(&mut conn)
            .optional()?;

        Ok(payment)
    }

    async fn list_by_user(&self, user_id: Uuid) -> Result<Vec<PaymentEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let results = payments::table
            .filter(payments::user_id.eq(user_id))
            .order(payments::created_at.desc())
            .select(PaymentEntity::as_select())
            .load::<PaymentEntity>(&mut conn)?;

        Ok(results)
    }

    async fn transition_status(
        &self,
        payment_id: Uuid,
        transition: PaymentTransitionModel,
    ) -> Result<Option<PaymentEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;
        let changeset = transition.changeset();

        let updated = update(payments::table)
            .filter(payments::id.eq(payment_id))
            .filter(payments::status.eq(transition.from.as_str()))
            .set(&changeset)
            .returning(PaymentEntity::as_select())
            .get_result::<PaymentEntity>(&mut conn)
            .optional()?;

        Ok(updated)
    }
}
