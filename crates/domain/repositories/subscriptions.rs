use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use mockall::automock;
use uuid::Uuid;

use crate::domain::entities::{
    payments::{InsertPaymentEntity, PaymentEntity},
    subscriptions::{InsertSubscriptionEntity, SubscriptionEntity},
};
use crate::domain::value_objects::subscriptions::{ActivationOutcome, CancellationOutcome};

#[automock]
#[async_trait]
pub trait SubscriptionRepository {
    async fn find_by_id(&self, subscription_id: Uuid) -> Result<Option<SubscriptionEntity>>;

    async fn find_active_by_user(&self, user_id: Uuid) -> Result<Option<SubscriptionEntity>>;

    async fn create_subscription(
        &self,
        subscription: InsertSubscriptionEntity,
    ) -> Result<SubscriptionEntity>;

    /// Inserts the subscription and its pending payment in one transaction. The
    /// payment's `subscription_id` is filled in with the new row id.
    async fn create_subscription_with_payment(
        &self,
        subscription: InsertSubscriptionEntity,
        payment: InsertPaymentEntity,
    ) -> Result<(SubscriptionEntity, PaymentEntity)>;

    /// Atomically activates the subscription, deactivates any other active
    /// subscription of the same user and grants VIP until `end_date`.
    /// None when the subscription does not exist.
    async fn activate_and_grant_vip(
        &self,
        subscription_id: Uuid,
        activated_at: DateTime<Utc>,
    ) -> Result<Option<ActivationOutcome>>;

    /// Atomically deactivates the subscription and, if it was the active one,
    /// revokes VIP. None when the subscription does not exist.
    async fn cancel_and_revoke_vip(
        &self,
        subscription_id: Uuid,
        canceled_at: DateTime<Utc>,
    ) -> Result<Option<CancellationOutcome>>;
}
