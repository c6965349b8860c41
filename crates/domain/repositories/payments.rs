use anyhow::Result;
use async_trait::async_trait;
use mockall::automock;
use uuid::Uuid;

use crate::domain::entities::payments::{InsertPaymentEntity, PaymentEntity};
use crate::domain::value_objects::payments::PaymentTransitionModel;

#[automock]
#[async_trait]
pub trait PaymentRepository {
    async fn create_payment(&self, payment: InsertPaymentEntity) -> Result<PaymentEntity>;

    async fn find_by_id(&self, payment_id: Uuid) -> Result<Option<PaymentEntity>>;

    async fn list_by_user(&self, user_id: Uuid) -> Result<Vec<PaymentEntity>>;

    /// Applies the transition only if the stored status still equals
    /// `transition.from`. None means the row is missing or was moved by someone else.
    async fn transition_status(
        &self,
        payment_id: Uuid,
        transition: PaymentTransitionModel,
    ) -> Result<Option<PaymentEntity>>;
}
