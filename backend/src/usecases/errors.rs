use axum::http::StatusCode;
use crates::domain::value_objects::validation::ValidationError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum UseCaseError {
    #[error("plan not found")]
    PlanNotFound,
    #[error("subscription not found")]
    SubscriptionNotFound,
    #[error("payment not found")]
    PaymentNotFound,
    #[error("content not found")]
    ContentNotFound,
    #[error("user not found")]
    UserNotFound,
    #[error("invalid state: {0}")]
    InvalidState(String),
    #[error("{0}")]
    Validation(String),
    #[error("forbidden")]
    Forbidden,
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl UseCaseError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            UseCaseError::PlanNotFound
            | UseCaseError::SubscriptionNotFound
            | UseCaseError::PaymentNotFound
            | UseCaseError::ContentNotFound
            | UseCaseError::UserNotFound => StatusCode::NOT_FOUND,
            UseCaseError::InvalidState(_) => StatusCode::CONFLICT,
            UseCaseError::Validation(_) => StatusCode::BAD_REQUEST,
            UseCaseError::Forbidden => StatusCode::FORBIDDEN,
            UseCaseError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<ValidationError> for UseCaseError {
    fn from(err: ValidationError) -> Self {
        UseCaseError::Validation(err.0)
    }
}

pub type UseCaseResult<T> = std::result::Result<T, UseCaseError>;
