use anyhow::{Result, bail};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::{Connection, RunQueryDsl, insert_into, prelude::*, update};
use std::sync::Arc;
use uuid::Uuid;

use super::{PostgresStore, users::write_vip_status};
use crate::domain::{
    entities::{
        payments::{InsertPaymentEntity, PaymentEntity},
        subscriptions::{InsertSubscriptionEntity, SubscriptionEntity},
    },
    repositories::subscriptions::SubscriptionRepository,
    value_objects::subscriptions::{
        ActivationOutcome, ActivationStatus, CancellationOutcome, settled_activation,
    },
};
use crate::infra::db::postgres::schema::{payments, subscriptions};

#[async_trait]
impl SubscriptionRepository for PostgresStore {
    async fn find_by_id(&self, subscription_id: Uuid) -> Result<Option<SubscriptionEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let subscription = subscriptions::table
            .find(subscription_id)
            .select(SubscriptionEntity::as_select())
            .first::<SubscriptionEntity>(&mut conn)
            .optional()?;

        Ok(subscription)
    }

    async fn find_active_by_user(&self, user_id: Uuid) -> Result<Option<SubscriptionEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let subscription = subscriptions::table
            .filter(subscriptions::user_id.eq(user_id))
            .filter(subscriptions::is_active.eq(true))
            .select(SubscriptionEntity::as_select())
            .first::<SubscriptionEntity>(&mut conn)
            .optional()?;

        Ok(subscription)
    }

    async fn create_subscription(
        &self,
        subscription: InsertSubscriptionEntity,
    ) -> Result<SubscriptionEntity> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let result = insert_into(subscriptions::table)
            .values(&subscription)
            .returning(SubscriptionEntity::as_select())
            .get_result::<SubscriptionEntity>(&mut conn)?;

        Ok(result)
    }

    async fn create_subscription_with_payment(
        &self,
        subscription: InsertSubscriptionEntity,
        payment: InsertPaymentEntity,
    ) -> Result<(SubscriptionEntity, PaymentEntity)> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let result = conn.transaction::<(SubscriptionEntity, PaymentEntity), diesel::result::Error, _>(
            |tx| {
                let subscription = insert_into(subscriptions::table)
                    .values(&subscription)
                    .returning(SubscriptionEntity::as_select())
                    .get_result::<SubscriptionEntity>(tx)?;

                let payment = InsertPaymentEntity {
                    subscription_id: Some(subscription.id),
                    ..payment
                };
                let payment = insert_into(payments::table)
                    .values(&payment)
                    .returning(PaymentEntity::as_select())
                    .get_result::<PaymentEntity>(tx)?;

                Ok((subscription, payment))
            },
        )?;

        Ok(result)
    }

    async fn activate_and_grant_vip(
        &self,
        subscription_id: Uuid,
        activated_at: DateTime<Utc>,
    ) -> Result<Option<ActivationOutcome>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let outcome = conn.transaction::<Option<ActivationOutcome>, anyhow::Error, _>(|tx| {
            // Row lock serializes concurrent activations of the same subscription.
            let Some(subscription) = subscriptions::table
                .find(subscription_id)
                .select(SubscriptionEntity::as_select())
                .for_update()
                .first::<SubscriptionEntity>(tx)
                .optional()?
            else {
                return Ok(None);
            };

            if let Some(status) = settled_activation(&subscription) {
                return Ok(Some(ActivationOutcome {
                    subscription,
                    status,
                }));
            }

            // A newer plan supersedes the previous one; the old row is kept as history.
            update(subscriptions::table)
                .filter(subscriptions::user_id.eq(subscription.user_id))
                .filter(subscriptions::is_active.eq(true))
                .filter(subscriptions::id.ne(subscription_id))
                .set((
                    subscriptions::is_active.eq(false),
                    subscriptions::updated_at.eq(activated_at),
                ))
                .execute(tx)?;

            let activated = update(subscriptions::table.find(subscription_id))
                .set((
                    subscriptions::is_active.eq(true),
                    subscriptions::activated_at.eq(Some(activated_at)),
                    subscriptions::updated_at.eq(activated_at),
                ))
                .returning(SubscriptionEntity::as_select())
                .get_result::<SubscriptionEntity>(tx)?;

            let granted = write_vip_status(
                tx,
                activated.user_id,
                true,
                Some(activated.end_date),
                activated_at,
            )?;
            if !granted {
                bail!(
                    "user {} owning subscription {} does not exist",
                    activated.user_id,
                    activated.id
                );
            }

            Ok(Some(ActivationOutcome {
                subscription: activated,
                status: ActivationStatus::Activated,
            }))
        })?;

        Ok(outcome)
    }

    async fn cancel_and_revoke_vip(
        &self,
        subscription_id: Uuid,
        canceled_at: DateTime<Utc>,
    ) -> Result<Option<CancellationOutcome>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let outcome = conn.transaction::<Option<CancellationOutcome>, diesel::result::Error, _>(
            |tx| {
                let Some(subscription) = subscriptions::table
                    .find(subscription_id)
                    .select(SubscriptionEntity::as_select())
                    .for_update()
                    .first::<SubscriptionEntity>(tx)
                    .optional()?
                else {
                    return Ok(None);
                };

                if subscription.canceled_at.is_some() {
                    return Ok(Some(CancellationOutcome {
                        subscription,
                        already_canceled: true,
                        vip_revoked: false,
                    }));
                }

                let was_active = subscription.is_active;
                let canceled = update(subscriptions::table.find(subscription_id))
                    .set((
                        subscriptions::is_active.eq(false),
                        subscriptions::auto_renew.eq(false),
                        subscriptions::canceled_at.eq(Some(canceled_at)),
                        subscriptions::updated_at.eq(canceled_at),
                    ))
                    .returning(SubscriptionEntity::as_select())
                    .get_result::<SubscriptionEntity>(tx)?;

                let vip_revoked = if was_active {
                    write_vip_status(tx, canceled.user_id, false, None, canceled_at)?
                } else {
                    false
                };

                Ok(Some(CancellationOutcome {
                    subscription: canceled,
                    already_canceled: false,
                    vip_revoked,
                }))
            },
        )?;

        Ok(outcome)
    }
}
