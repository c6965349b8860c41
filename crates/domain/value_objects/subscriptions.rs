use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::entities::subscriptions::SubscriptionEntity;
use crate::domain::value_objects::{payments::PaymentDto, plans::PlanDto};

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ActivationStatus {
    /// This call flipped the subscription to active and granted VIP.
    Activated,
    /// Activated by an earlier call; nothing changed.
    AlreadyActivated,
    /// Canceled before its payment settled; stays inactive.
    Canceled,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ActivationOutcome {
    pub subscription: SubscriptionEntity,
    pub status: ActivationStatus,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CancellationOutcome {
    pub subscription: SubscriptionEntity,
    pub already_canceled: bool,
    pub vip_revoked: bool,
}

/// Outcome for a subscription that must not be activated again, or None when
/// the activation still has to happen. A subscription is activated at most once.
pub fn settled_activation(subscription: &SubscriptionEntity) -> Option<ActivationStatus> {
    if subscription.canceled_at.is_some() {
        Some(ActivationStatus::Canceled)
    } else if subscription.activated_at.is_some() {
        Some(ActivationStatus::AlreadyActivated)
    } else {
        None
    }
}

/// `end = start + duration_days`. None on overflow or a non-positive duration.
pub fn subscription_period(
    start: DateTime<Utc>,
    duration_days: i32,
) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
    if duration_days <= 0 {
        return None;
    }
    let end = start.checked_add_signed(Duration::days(i64::from(duration_days)))?;
    Some((start, end))
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SubscriptionDto {
    pub id: Uuid,
    pub user_id: Uuid,
    pub plan_id: Uuid,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub is_active: bool,
    pub auto_renew: bool,
    pub activated_at: Option<DateTime<Utc>>,
    pub canceled_at: Option<DateTime<Utc>>,
}

impl From<SubscriptionEntity> for SubscriptionDto {
    fn from(value: SubscriptionEntity) -> Self {
        Self {
            id: value.id,
            user_id: value.user_id,
            plan_id: value.plan_id,
            start_date: value.start_date,
            end_date: value.end_date,
            is_active: value.is_active,
            auto_renew: value.auto_renew,
            activated_at: value.activated_at,
            canceled_at: value.canceled_at,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CheckoutRequest {
    pub plan_id: Uuid,
    pub payment_method: String,
    #[serde(default)]
    pub auto_renew: bool,
}

#[derive(Debug, Serialize)]
pub struct CheckoutDto {
    pub subscription: SubscriptionDto,
    pub payment: PaymentDto,
}

#[derive(Debug, Serialize)]
pub struct CurrentSubscriptionDto {
    pub subscription: SubscriptionDto,
    pub plan: PlanDto,
}
