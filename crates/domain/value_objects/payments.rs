use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::entities::payments::{
    InsertPaymentEntity, PaymentEntity, UpdatePaymentStatusEntity,
};
use crate::domain::value_objects::{
    enums::{payment_methods::PaymentMethod, payment_statuses::PaymentStatus},
    validation::ValidationError,
};

#[derive(Debug, Clone, PartialEq)]
pub struct CreatePaymentModel {
    pub user_id: Uuid,
    pub subscription_id: Option<Uuid>,
    pub amount_minor: i32,
    pub currency: String,
    pub method: String,
    pub details: serde_json::Value,
}

impl CreatePaymentModel {
    /// Checks amount, currency and method, returning the row to insert as `pending`.
    pub fn into_insert_entity(self) -> Result<InsertPaymentEntity, ValidationError> {
        if self.amount_minor <= 0 {
            return Err(ValidationError::new(
                "amount must be a positive number of minor units",
            ));
        }
        validate_currency(&self.currency)?;
        let method = parse_payment_method(&self.method)?;

        Ok(InsertPaymentEntity {
            user_id: self.user_id,
            subscription_id: self.subscription_id,
            amount_minor: self.amount_minor,
            currency: self.currency,
            method: method.to_string(),
            details: self.details,
            status: PaymentStatus::Pending.to_string(),
        })
    }
}

pub fn parse_payment_method(value: &str) -> Result<PaymentMethod, ValidationError> {
    PaymentMethod::from_str(value)
        .ok_or_else(|| ValidationError::new(format!("unknown payment method: {value}")))
}

/// Currency codes are stored verbatim: three uppercase ASCII letters, never converted.
pub fn validate_currency(code: &str) -> Result<(), ValidationError> {
    if code.len() == 3 && code.chars().all(|c| c.is_ascii_uppercase()) {
        Ok(())
    } else {
        Err(ValidationError::new(format!("invalid currency code: {code}")))
    }
}

/// Compare-and-set request: applied only while the stored status is still `from`.
#[derive(Debug, Clone, PartialEq)]
pub struct PaymentTransitionModel {
    pub from: PaymentStatus,
    pub to: PaymentStatus,
    pub transaction_id: Option<String>,
    pub failure_reason: Option<String>,
    pub at: DateTime<Utc>,
}

impl PaymentTransitionModel {
    pub fn changeset(&self) -> UpdatePaymentStatusEntity {
        UpdatePaymentStatusEntity {
            status: self.to.to_string(),
            transaction_id: self.transaction_id.clone(),
            failure_reason: self.failure_reason.clone(),
            completed_at: (self.to == PaymentStatus::Completed).then_some(self.at),
            updated_at: self.at,
        }
    }

    pub fn apply_to(&self, payment: &mut PaymentEntity) {
        let changeset = self.changeset();
        payment.status = changeset.status;
        if let Some(transaction_id) = changeset.transaction_id {
            payment.transaction_id = Some(transaction_id);
        }
        if let Some(failure_reason) = changeset.failure_reason {
            payment.failure_reason = Some(failure_reason);
        }
        if let Some(completed_at) = changeset.completed_at {
            payment.completed_at = Some(completed_at);
        }
        payment.updated_at = changeset.updated_at;
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct PaymentDto {
    pub id: Uuid,
    pub user_id: Uuid,
    pub subscription_id: Option<Uuid>,
    pub amount_minor: i32,
    pub currency: String,
    pub method: String,
    pub status: String,
    pub transaction_id: Option<String>,
    pub failure_reason: Option<String>,
    pub created_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl From<PaymentEntity> for PaymentDto {
    fn from(value: PaymentEntity) -> Self {
        Self {
            id: value.id,
            user_id: value.user_id,
            subscription_id: value.subscription_id,
            amount_minor: value.amount_minor,
            currency: value.currency,
            method: value.method,
            status: value.status,
            transaction_id: value.transaction_id,
            failure_reason: value.failure_reason,
            created_at: value.created_at,
            completed_at: value.completed_at,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct CompletePaymentRequest {
    pub transaction_id: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct FailPaymentRequest {
    #[serde(default)]
    pub reason: Option<String>,
}
