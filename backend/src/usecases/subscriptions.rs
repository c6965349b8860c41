use std::sync::Arc;

use chrono::Utc;
use crates::domain::{
    entities::{
        plans::PlanEntity,
        subscriptions::{InsertSubscriptionEntity, SubscriptionEntity},
    },
    repositories::{plans::PlanRepository, subscriptions::SubscriptionRepository},
    value_objects::{
        payments::CreatePaymentModel,
        plans::PlanDto,
        subscriptions::{
            ActivationOutcome, ActivationStatus, CheckoutDto, CurrentSubscriptionDto,
            SubscriptionDto, subscription_period,
        },
    },
};
use tracing::{error, info, warn};
use uuid::Uuid;

use super::errors::{UseCaseError, UseCaseResult};

pub struct SubscriptionUseCase<P, S>
where
    P: PlanRepository + Send + Sync + 'static,
    S: SubscriptionRepository + Send + Sync + 'static,
{
    plan_repo: Arc<P>,
    subscription_repo: Arc<S>,
}

impl<P, S> SubscriptionUseCase<P, S>
where
    P: PlanRepository + Send + Sync + 'static,
    S: SubscriptionRepository + Send + Sync + 'static,
{
    pub fn new(plan_repo: Arc<P>, subscription_repo: Arc<S>) -> Self {
        Self {
            plan_repo,
            subscription_repo,
        }
    }

    pub async fn list_plans(&self) -> UseCaseResult<Vec<PlanDto>> {
        info!("subscriptions: listing active plans");
        let plans = self.plan_repo.list_active_plans().await.map_err(|err| {
            error!(db_error = ?err, "subscriptions: failed to list active plans");
            UseCaseError::Internal(err)
        })?;
        let plan_count = plans.len();
        info!(plan_count, "subscriptions: active plans loaded");
        Ok(plans.into_iter().map(PlanDto::from).collect())
    }

    /// Creates an inactive subscription for the plan's duration, starting now.
    pub async fn subscribe(
        &self,
        user_id: Uuid,
        plan_id: Uuid,
        auto_renew: bool,
    ) -> UseCaseResult<SubscriptionDto> {
        info!(%user_id, %plan_id, auto_renew, "subscriptions: subscribe requested");
        let subscription = self.pending_subscription(user_id, plan_id, auto_renew).await?.0;

        let created = self
            .subscription_repo
            .create_subscription(subscription)
            .await
            .map_err(|err| {
                error!(%user_id, %plan_id, db_error = ?err, "subscriptions: failed to create subscription");
                UseCaseError::Internal(err)
            })?;

        info!(%user_id, subscription_id = %created.id, "subscriptions: pending subscription created");
        Ok(created.into())
    }

    /// Inactive subscription plus a pending payment for the plan price, written together.
    pub async fn checkout(
        &self,
        user_id: Uuid,
        plan_id: Uuid,
        payment_method: &str,
        auto_renew: bool,
    ) -> UseCaseResult<CheckoutDto> {
        info!(
            %user_id,
            %plan_id,
            payment_method,
            auto_renew,
            "subscriptions: checkout requested"
        );
        let (subscription, plan) = self.pending_subscription(user_id, plan_id, auto_renew).await?;

        let payment = CreatePaymentModel {
            user_id,
            subscription_id: None,
            amount_minor: plan.price_minor,
            currency: plan.currency.clone(),
            method: payment_method.to_string(),
            details: serde_json::json!({ "plan_id": plan.id, "plan_name": plan.name }),
        }
        .into_insert_entity()
        .inspect_err(|err| {
            warn!(%user_id, %plan_id, reason = %err, "subscriptions: checkout rejected");
        })?;

        let (subscription, payment) = self
            .subscription_repo
            .create_subscription_with_payment(subscription, payment)
            .await
            .map_err(|err| {
                error!(%user_id, %plan_id, db_error = ?err, "subscriptions: checkout write failed");
                UseCaseError::Internal(err)
            })?;

        info!(
            %user_id,
            subscription_id = %subscription.id,
            payment_id = %payment.id,
            amount_minor = payment.amount_minor,
            currency = %payment.currency,
            "subscriptions: checkout created"
        );

        Ok(CheckoutDto {
            subscription: subscription.into(),
            payment: payment.into(),
        })
    }

    /// Activates a subscription and grants VIP until its end date. Repeated
    /// calls and calls for canceled subscriptions change nothing.
    pub async fn activate_on_payment(
        &self,
        subscription_id: Uuid,
    ) -> UseCaseResult<ActivationOutcome> {
        let outcome = self
            .subscription_repo
            .activate_and_grant_vip(subscription_id, Utc::now())
            .await
            .map_err(|err| {
                error!(%subscription_id, db_error = ?err, "subscriptions: activation failed");
                UseCaseError::Internal(err)
            })?
            .ok_or_else(|| {
                warn!(%subscription_id, "subscriptions: activation for unknown subscription");
                UseCaseError::SubscriptionNotFound
            })?;

        let user_id = outcome.subscription.user_id;
        match outcome.status {
            ActivationStatus::Activated => info!(
                %subscription_id,
                %user_id,
                vip_expires_at = %outcome.subscription.end_date,
                "subscriptions: activated and vip granted"
            ),
            ActivationStatus::AlreadyActivated => info!(
                %subscription_id,
                %user_id,
                "subscriptions: already activated, nothing to do"
            ),
            ActivationStatus::Canceled => warn!(
                %subscription_id,
                %user_id,
                "subscriptions: payment settled for canceled subscription, not activating"
            ),
        }

        Ok(outcome)
    }

    pub async fn cancel(&self, subscription_id: Uuid) -> UseCaseResult<SubscriptionDto> {
        let outcome = self
            .subscription_repo
            .cancel_and_revoke_vip(subscription_id, Utc::now())
            .await
            .map_err(|err| {
                error!(%subscription_id, db_error = ?err, "subscriptions: cancel failed");
                UseCaseError::Internal(err)
            })?
            .ok_or(UseCaseError::SubscriptionNotFound)?;

        let user_id = outcome.subscription.user_id;
        if outcome.already_canceled {
            info!(%subscription_id, %user_id, "subscriptions: already canceled");
        } else {
            info!(
                %subscription_id,
                %user_id,
                vip_revoked = outcome.vip_revoked,
                "subscriptions: canceled"
            );
        }

        Ok(outcome.subscription.into())
    }

    /// Cancel on behalf of a viewer; other users' subscriptions look missing.
    pub async fn cancel_for_user(
        &self,
        user_id: Uuid,
        subscription_id: Uuid,
    ) -> UseCaseResult<SubscriptionDto> {
        let subscription = self.find_subscription(subscription_id).await?;
        if subscription.user_id != user_id {
            warn!(%user_id, %subscription_id, "subscriptions: cancel for foreign subscription");
            return Err(UseCaseError::SubscriptionNotFound);
        }

        self.cancel(subscription_id).await
    }

    pub async fn current_subscription(
        &self,
        user_id: Uuid,
    ) -> UseCaseResult<Option<CurrentSubscriptionDto>> {
        info!(%user_id, "subscriptions: loading current subscription for user");
        let Some(subscription) = self
            .subscription_repo
            .find_active_by_user(user_id)
            .await
            .map_err(|err| {
                error!(%user_id, db_error = ?err, "subscriptions: failed to load current subscription");
                UseCaseError::Internal(err)
            })?
        else {
            info!(%user_id, "subscriptions: no active subscription");
            return Ok(None);
        };

        // Plans may be retired while subscribers still hold them.
        let plan = self
            .plan_repo
            .find_by_id(subscription.plan_id)
            .await
            .map_err(|err| {
                error!(
                    %user_id,
                    plan_id = %subscription.plan_id,
                    db_error = ?err,
                    "subscriptions: failed to load plan"
                );
                UseCaseError::Internal(err)
            })?
            .ok_or(UseCaseError::PlanNotFound)?;

        Ok(Some(CurrentSubscriptionDto {
            subscription: subscription.into(),
            plan: plan.into(),
        }))
    }

    async fn find_subscription(&self, subscription_id: Uuid) -> UseCaseResult<SubscriptionEntity> {
        self.subscription_repo
            .find_by_id(subscription_id)
            .await
            .map_err(|err| {
                error!(%subscription_id, db_error = ?err, "subscriptions: failed to load subscription");
                UseCaseError::Internal(err)
            })?
            .ok_or(UseCaseError::SubscriptionNotFound)
    }

    async fn pending_subscription(
        &self,
        user_id: Uuid,
        plan_id: Uuid,
        auto_renew: bool,
    ) -> UseCaseResult<(InsertSubscriptionEntity, PlanEntity)> {
        let plan = self
            .plan_repo
            .find_active_plan_by_id(plan_id)
            .await
            .map_err(|err| {
                error!(%plan_id, db_error = ?err, "subscriptions: failed to load plan");
                UseCaseError::Internal(err)
            })?
            .ok_or_else(|| {
                warn!(%user_id, %plan_id, "subscriptions: unknown or inactive plan");
                UseCaseError::PlanNotFound
            })?;

        let (start_date, end_date) = subscription_period(Utc::now(), plan.duration_days)
            .ok_or_else(|| {
                UseCaseError::InvalidState(format!(
                    "plan {} has an unusable duration of {} days",
                    plan.id, plan.duration_days
                ))
            })?;

        Ok((
            InsertSubscriptionEntity {
                user_id,
                plan_id,
                start_date,
                end_date,
                is_active: false,
                auto_renew,
            },
            plan,
        ))
    }
}
