use std::sync::Arc;

use anyhow::anyhow;
use chrono::Utc;
use crates::domain::{
    entities::payments::PaymentEntity,
    repositories::{
        payments::PaymentRepository, plans::PlanRepository, subscriptions::SubscriptionRepository,
    },
    value_objects::{
        enums::payment_statuses::PaymentStatus,
        payments::{CreatePaymentModel, PaymentDto, PaymentTransitionModel},
    },
};
use tracing::{error, info, warn};
use uuid::Uuid;

use super::{
    errors::{UseCaseError, UseCaseResult},
    subscriptions::SubscriptionUseCase,
};

pub struct PaymentUseCase<Pay, P, S>
where
    Pay: PaymentRepository + Send + Sync + 'static,
    P: PlanRepository + Send + Sync + 'static,
    S: SubscriptionRepository + Send + Sync + 'static,
{
    payment_repo: Arc<Pay>,
    subscription_usecase: Arc<SubscriptionUseCase<P, S>>,
}

impl<Pay, P, S> PaymentUseCase<Pay, P, S>
where
    Pay: PaymentRepository + Send + Sync + 'static,
    P: PlanRepository + Send + Sync + 'static,
    S: SubscriptionRepository + Send + Sync + 'static,
{
    pub fn new(payment_repo: Arc<Pay>, subscription_usecase: Arc<SubscriptionUseCase<P, S>>) -> Self {
        Self {
            payment_repo,
            subscription_usecase,
        }
    }

    pub async fn create_payment(&self, model: CreatePaymentModel) -> UseCaseResult<PaymentDto> {
        let user_id = model.user_id;
        let payment = model.into_insert_entity().inspect_err(|err| {
            warn!(%user_id, reason = %err, "payments: create rejected");
        })?;

        let created = self.payment_repo.create_payment(payment).await.map_err(|err| {
            error!(%user_id, db_error = ?err, "payments: failed to create payment");
            UseCaseError::Internal(err)
        })?;

        info!(
            %user_id,
            payment_id = %created.id,
            amount_minor = created.amount_minor,
            currency = %created.currency,
            "payments: pending payment created"
        );
        Ok(created.into())
    }

    /// Settles a pending payment and activates the subscription it pays for.
    /// Retrying an already completed payment re-runs the activation, which is a
    /// no-op once the subscription has been activated.
    pub async fn complete_payment(
        &self,
        payment_id: Uuid,
        transaction_id: String,
    ) -> UseCaseResult<PaymentDto> {
        let transaction_id = transaction_id.trim().to_string();
        if transaction_id.is_empty() {
            return Err(UseCaseError::Validation(
                "transaction_id must not be empty".to_string(),
            ));
        }

        let payment = self
            .transition(
                payment_id,
                PaymentTransitionModel {
                    from: PaymentStatus::Pending,
                    to: PaymentStatus::Completed,
                    transaction_id: Some(transaction_id),
                    failure_reason: None,
                    at: Utc::now(),
                },
            )
            .await?;

        if let Some(subscription_id) = payment.subscription_id {
            self.subscription_usecase
                .activate_on_payment(subscription_id)
                .await?;
        }

        Ok(payment.into())
    }

    pub async fn fail_payment(
        &self,
        payment_id: Uuid,
        reason: Option<String>,
    ) -> UseCaseResult<PaymentDto> {
        let payment = self
            .transition(
                payment_id,
                PaymentTransitionModel {
                    from: PaymentStatus::Pending,
                    to: PaymentStatus::Failed,
                    transaction_id: None,
                    failure_reason: reason,
                    at: Utc::now(),
                },
            )
            .await?;

        Ok(payment.into())
    }

    /// Marks a completed payment refunded. The subscription it paid for is left as is.
    pub async fn refund_payment(&self, payment_id: Uuid) -> UseCaseResult<PaymentDto> {
        let payment = self
            .transition(
                payment_id,
                PaymentTransitionModel {
                    from: PaymentStatus::Completed,
                    to: PaymentStatus::Refunded,
                    transaction_id: None,
                    failure_reason: None,
                    at: Utc::now(),
                },
            )
            .await?;

        Ok(payment.into())
    }

    pub async fn get_payment(&self, payment_id: Uuid) -> UseCaseResult<PaymentDto> {
        Ok(self.find_payment(payment_id).await?.into())
    }

    pub async fn get_payment_for_user(
        &self,
        user_id: Uuid,
        payment_id: Uuid,
    ) -> UseCaseResult<PaymentDto> {
        let payment = self.find_payment(payment_id).await?;
        if payment.user_id != user_id {
            return Err(UseCaseError::PaymentNotFound);
        }
        Ok(payment.into())
    }

    pub async fn list_payments(&self, user_id: Uuid) -> UseCaseResult<Vec<PaymentDto>> {
        let payments = self.payment_repo.list_by_user(user_id).await.map_err(|err| {
            error!(%user_id, db_error = ?err, "payments: failed to list payments");
            UseCaseError::Internal(err)
        })?;

        Ok(payments.into_iter().map(PaymentDto::from).collect())
    }

    async fn find_payment(&self, payment_id: Uuid) -> UseCaseResult<PaymentEntity> {
        self.payment_repo
            .find_by_id(payment_id)
            .await
            .map_err(|err| {
                error!(%payment_id, db_error = ?err, "payments: failed to load payment");
                UseCaseError::Internal(err)
            })?
            .ok_or(UseCaseError::PaymentNotFound)
    }

    // A payment already in the target status is returned unchanged. The update
    // itself only applies while the row still holds `from`; a lost race is
    // settled by reading the row again.
    async fn transition(
        &self,
        payment_id: Uuid,
        transition: PaymentTransitionModel,
    ) -> UseCaseResult<PaymentEntity> {
        let current = self.find_payment(payment_id).await?;
        let status = stored_status(&current)?;

        if status == transition.to {
            info!(%payment_id, status = %status, "payments: transition already applied");
            return Ok(current);
        }
        if status != transition.from || !status.can_transition_to(transition.to) {
            warn!(
                %payment_id,
                status = %status,
                target = %transition.to,
                final_status = status.is_final(),
                "payments: transition rejected"
            );
            return Err(invalid_transition(status, transition.to));
        }

        let target = transition.to;
        let updated = self
            .payment_repo
            .transition_status(payment_id, transition)
            .await
            .map_err(|err| {
                error!(%payment_id, db_error = ?err, "payments: status update failed");
                UseCaseError::Internal(err)
            })?;

        match updated {
            Some(payment) => {
                info!(
                    %payment_id,
                    from = %status,
                    to = %target,
                    "payments: status updated"
                );
                Ok(payment)
            }
            None => {
                let reread = self.find_payment(payment_id).await?;
                let now = stored_status(&reread)?;
                if now == target {
                    info!(%payment_id, status = %now, "payments: concurrent transition already applied");
                    Ok(reread)
                } else {
                    warn!(%payment_id, status = %now, target = %target, "payments: lost transition race");
                    Err(invalid_transition(now, target))
                }
            }
        }
    }
}

fn stored_status(payment: &PaymentEntity) -> UseCaseResult<PaymentStatus> {
    PaymentStatus::from_str(&payment.status).ok_or_else(|| {
        UseCaseError::Internal(anyhow!(
            "payment {} has unknown status {}",
            payment.id,
            payment.status
        ))
    })
}

fn invalid_transition(from: PaymentStatus, to: PaymentStatus) -> UseCaseError {
    UseCaseError::InvalidState(format!("payment is {from}, cannot become {to}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use crates::domain::{
        entities::subscriptions::SubscriptionEntity,
        repositories::{
            payments::MockPaymentRepository, plans::MockPlanRepository,
            subscriptions::MockSubscriptionRepository,
        },
        value_objects::subscriptions::{ActivationOutcome, ActivationStatus},
    };
    use mockall::{Sequence, predicate::eq};

    type TestUseCase =
        PaymentUseCase<MockPaymentRepository, MockPlanRepository, MockSubscriptionRepository>;

    fn payment(status: PaymentStatus, subscription_id: Option<Uuid>) -> PaymentEntity {
        let now = Utc::now();
        PaymentEntity {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            subscription_id,
            amount_minor: 19900,
            currency: "THB".to_string(),
            method: "card".to_string(),
            details: serde_json::json!({}),
            status: status.to_string(),
            transaction_id: None,
            failure_reason: None,
            created_at: now,
            updated_at: now,
            completed_at: None,
        }
    }

    fn subscription(id: Uuid) -> SubscriptionEntity {
        let now = Utc::now();
        SubscriptionEntity {
            id,
            user_id: Uuid::new_v4(),
            plan_id: Uuid::new_v4(),
            start_date: now,
            end_date: now + Duration::days(30),
            is_active: true,
            auto_renew: false,
            activated_at: Some(now),
            canceled_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    fn usecase(
        payment_repo: MockPaymentRepository,
        subscription_repo: MockSubscriptionRepository,
    ) -> TestUseCase {
        let subscriptions = SubscriptionUseCase::new(
            Arc::new(MockPlanRepository::new()),
            Arc::new(subscription_repo),
        );
        PaymentUseCase::new(Arc::new(payment_repo), Arc::new(subscriptions))
    }

    fn expect_activation(repo: &mut MockSubscriptionRepository, subscription_id: Uuid, times: usize) {
        repo.expect_activate_and_grant_vip()
            .with(eq(subscription_id), mockall::predicate::always())
            .times(times)
            .returning(move |id, _| {
                Ok(Some(ActivationOutcome {
                    subscription: subscription(id),
                    status: ActivationStatus::Activated,
                }))
            });
    }

    #[tokio::test]
    async fn complete_activates_linked_subscription() {
        let subscription_id = Uuid::new_v4();
        let pending = payment(PaymentStatus::Pending, Some(subscription_id));
        let payment_id = pending.id;

        let mut payment_repo = MockPaymentRepository::new();
        let stored = pending.clone();
        payment_repo
            .expect_find_by_id()
            .with(eq(payment_id))
            .returning(move |_| Ok(Some(stored.clone())));
        payment_repo
            .expect_transition_status()
            .withf(|_, transition| {
                transition.from == PaymentStatus::Pending
                    && transition.to == PaymentStatus::Completed
                    && transition.transaction_id.as_deref() == Some("tx-1")
            })
            .times(1)
            .returning(move |_, transition| {
                let mut updated = pending.clone();
                transition.apply_to(&mut updated);
                Ok(Some(updated))
            });

        let mut subscription_repo = MockSubscriptionRepository::new();
        expect_activation(&mut subscription_repo, subscription_id, 1);

        let completed = usecase(payment_repo, subscription_repo)
            .complete_payment(payment_id, "tx-1".to_string())
            .await
            .unwrap();

        assert_eq!(completed.status, "completed");
        assert!(completed.completed_at.is_some());
    }

    #[tokio::test]
    async fn complete_retry_reruns_activation_without_update() {
        let subscription_id = Uuid::new_v4();
        let completed = payment(PaymentStatus::Completed, Some(subscription_id));
        let payment_id = completed.id;

        let mut payment_repo = MockPaymentRepository::new();
        payment_repo
            .expect_find_by_id()
            .returning(move |_| Ok(Some(completed.clone())));
        payment_repo.expect_transition_status().never();

        let mut subscription_repo = MockSubscriptionRepository::new();
        expect_activation(&mut subscription_repo, subscription_id, 1);

        let payment = usecase(payment_repo, subscription_repo)
            .complete_payment(payment_id, "tx-1".to_string())
            .await
            .unwrap();

        assert_eq!(payment.status, "completed");
    }

    #[tokio::test]
    async fn complete_rejects_final_statuses() {
        for status in [PaymentStatus::Failed, PaymentStatus::Refunded] {
            let stored = payment(status, None);
            let payment_id = stored.id;

            let mut payment_repo = MockPaymentRepository::new();
            payment_repo
                .expect_find_by_id()
                .returning(move |_| Ok(Some(stored.clone())));
            payment_repo.expect_transition_status().never();

            let result = usecase(payment_repo, MockSubscriptionRepository::new())
                .complete_payment(payment_id, "tx-1".to_string())
                .await;

            assert!(matches!(result, Err(UseCaseError::InvalidState(_))));
        }
    }

    #[tokio::test]
    async fn complete_of_unknown_payment_is_not_found() {
        let mut payment_repo = MockPaymentRepository::new();
        payment_repo.expect_find_by_id().returning(|_| Ok(None));

        let result = usecase(payment_repo, MockSubscriptionRepository::new())
            .complete_payment(Uuid::new_v4(), "tx-1".to_string())
            .await;

        assert!(matches!(result, Err(UseCaseError::PaymentNotFound)));
    }

    #[tokio::test]
    async fn lost_race_to_same_target_is_absorbed() {
        let pending = payment(PaymentStatus::Pending, None);
        let payment_id = pending.id;
        let mut completed = pending.clone();
        completed.status = PaymentStatus::Completed.to_string();

        let mut seq = Sequence::new();
        let mut payment_repo = MockPaymentRepository::new();
        payment_repo
            .expect_find_by_id()
            .times(1)
            .in_sequence(&mut seq)
            .returning(move |_| Ok(Some(pending.clone())));
        payment_repo
            .expect_transition_status()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _| Ok(None));
        payment_repo
            .expect_find_by_id()
            .times(1)
            .in_sequence(&mut seq)
            .returning(move |_| Ok(Some(completed.clone())));

        let payment = usecase(payment_repo, MockSubscriptionRepository::new())
            .complete_payment(payment_id, "tx-1".to_string())
            .await
            .unwrap();

        assert_eq!(payment.status, "completed");
    }

    #[tokio::test]
    async fn lost_race_to_other_status_is_invalid() {
        let pending = payment(PaymentStatus::Pending, None);
        let payment_id = pending.id;
        let mut failed = pending.clone();
        failed.status = PaymentStatus::Failed.to_string();

        let mut seq = Sequence::new();
        let mut payment_repo = MockPaymentRepository::new();
        payment_repo
            .expect_find_by_id()
            .times(1)
            .in_sequence(&mut seq)
            .returning(move |_| Ok(Some(pending.clone())));
        payment_repo
            .expect_transition_status()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _| Ok(None));
        payment_repo
            .expect_find_by_id()
            .times(1)
            .in_sequence(&mut seq)
            .returning(move |_| Ok(Some(failed.clone())));

        let result = usecase(payment_repo, MockSubscriptionRepository::new())
            .complete_payment(payment_id, "tx-1".to_string())
            .await;

        assert!(matches!(result, Err(UseCaseError::InvalidState(_))));
    }

    #[tokio::test]
    async fn refund_requires_completed_payment() {
        let stored = payment(PaymentStatus::Pending, None);
        let payment_id = stored.id;

        let mut payment_repo = MockPaymentRepository::new();
        payment_repo
            .expect_find_by_id()
            .returning(move |_| Ok(Some(stored.clone())));
        payment_repo.expect_transition_status().never();

        let result = usecase(payment_repo, MockSubscriptionRepository::new())
            .refund_payment(payment_id)
            .await;

        assert!(matches!(result, Err(UseCaseError::InvalidState(_))));
    }

    #[tokio::test]
    async fn fail_is_absorbed_when_already_failed() {
        let stored = payment(PaymentStatus::Failed, None);
        let payment_id = stored.id;

        let mut payment_repo = MockPaymentRepository::new();
        payment_repo
            .expect_find_by_id()
            .returning(move |_| Ok(Some(stored.clone())));
        payment_repo.expect_transition_status().never();

        let payment = usecase(payment_repo, MockSubscriptionRepository::new())
            .fail_payment(payment_id, Some("declined".to_string()))
            .await
            .unwrap();

        assert_eq!(payment.status, "failed");
    }

    #[tokio::test]
    async fn create_rejects_invalid_amount() {
        let mut payment_repo = MockPaymentRepository::new();
        payment_repo.expect_create_payment().never();

        let result = usecase(payment_repo, MockSubscriptionRepository::new())
            .create_payment(CreatePaymentModel {
                user_id: Uuid::new_v4(),
                subscription_id: None,
                amount_minor: 0,
                currency: "THB".to_string(),
                method: "card".to_string(),
                details: serde_json::json!({}),
            })
            .await;

        assert!(matches!(result, Err(UseCaseError::Validation(_))));
    }
}
