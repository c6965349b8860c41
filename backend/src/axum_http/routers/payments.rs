use crate::{
    auth::AuthUser,
    usecases::{
        errors::UseCaseError, payments::PaymentUseCase, subscriptions::SubscriptionUseCase,
    },
};
use axum::{
    Json, Router,
    extract::{Path, State},
    response::IntoResponse,
    routing::{get, post},
};
use crates::domain::{
    repositories::{
        entitlement_store::EntitlementStore, payments::PaymentRepository, plans::PlanRepository,
        subscriptions::SubscriptionRepository,
    },
    value_objects::payments::{CompletePaymentRequest, FailPaymentRequest},
};
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

pub fn routes<T>(store: Arc<T>) -> Router
where
    T: EntitlementStore + 'static,
{
    let subscriptions_usecase = SubscriptionUseCase::new(Arc::clone(&store), Arc::clone(&store));
    let payments_usecase = PaymentUseCase::new(Arc::clone(&store), Arc::new(subscriptions_usecase));

    Router::new()
        .route("/", get(list_payments::<T, T, T>))
        .route("/:payment_id", get(get_payment::<T, T, T>))
        .route("/:payment_id/complete", post(complete_payment::<T, T, T>))
        .route("/:payment_id/fail", post(fail_payment::<T, T, T>))
        .route("/:payment_id/refund", post(refund_payment::<T, T, T>))
        .with_state(Arc::new(payments_usecase))
}

// Settlement is reported by the payment integration, never by viewers.
fn require_service(auth: &AuthUser, payment_id: Uuid) -> Result<(), UseCaseError> {
    if auth.is_service() {
        return Ok(());
    }
    warn!(
        user_id = %auth.user_id,
        %payment_id,
        role = %auth.role,
        "payments: settlement attempted without service role"
    );
    Err(UseCaseError::Forbidden)
}

pub async fn list_payments<Pay, P, S>(
    State(payments_usecase): State<Arc<PaymentUseCase<Pay, P, S>>>,
    AuthUser { user_id, .. }: AuthUser,
) -> impl IntoResponse
where
    Pay: PaymentRepository + Send + Sync + 'static,
    P: PlanRepository + Send + Sync + 'static,
    S: SubscriptionRepository + Send + Sync + 'static,
{
    match payments_usecase.list_payments(user_id).await {
        Ok(payments) => Json(payments).into_response(),
        Err(err) => err.into_response(),
    }
}

pub async fn get_payment<Pay, P, S>(
    State(payments_usecase): State<Arc<PaymentUseCase<Pay, P, S>>>,
    auth: AuthUser,
    Path(payment_id): Path<Uuid>,
) -> impl IntoResponse
where
    Pay: PaymentRepository + Send + Sync + 'static,
    P: PlanRepository + Send + Sync + 'static,
    S: SubscriptionRepository + Send + Sync + 'static,
{
    let result = if auth.is_service() {
        payments_usecase.get_payment(payment_id).await
    } else {
        payments_usecase
            .get_payment_for_user(auth.user_id, payment_id)
            .await
    };

    match result {
        Ok(payment) => Json(payment).into_response(),
        Err(err) => err.into_response(),
    }
}

pub async fn complete_payment<Pay, P, S>(
    State(payments_usecase): State<Arc<PaymentUseCase<Pay, P, S>>>,
    auth: AuthUser,
    Path(payment_id): Path<Uuid>,
    Json(request): Json<CompletePaymentRequest>,
) -> impl IntoResponse
where
    Pay: PaymentRepository + Send + Sync + 'static,
    P: PlanRepository + Send + Sync + 'static,
    S: SubscriptionRepository + Send + Sync + 'static,
{
    if let Err(err) = require_service(&auth, payment_id) {
        return err.into_response();
    }

    info!(%payment_id, "payments: complete request received");
    match payments_usecase
        .complete_payment(payment_id, request.transaction_id)
        .await
    {
        Ok(payment) => Json(payment).into_response(),
        Err(err) => err.into_response(),
    }
}

pub async fn fail_payment<Pay, P, S>(
    State(payments_usecase): State<Arc<PaymentUseCase<Pay, P, S>>>,
    auth: AuthUser,
    Path(payment_id): Path<Uuid>,
    request: Option<Json<FailPaymentRequest>>,
) -> impl IntoResponse
where
    Pay: PaymentRepository + Send + Sync + 'static,
    P: PlanRepository + Send + Sync + 'static,
    S: SubscriptionRepository + Send + Sync + 'static,
{
    if let Err(err) = require_service(&auth, payment_id) {
        return err.into_response();
    }

    let request = request.map(|Json(body)| body).unwrap_or_default();
    info!(%payment_id, "payments: fail request received");
    match payments_usecase
        .fail_payment(payment_id, request.reason)
        .await
    {
        Ok(payment) => Json(payment).into_response(),
        Err(err) => err.into_response(),
    }
}

pub async fn refund_payment<Pay, P, S>(
    State(payments_usecase): State<Arc<PaymentUseCase<Pay, P, S>>>,
    auth: AuthUser,
    Path(payment_id): Path<Uuid>,
) -> impl IntoResponse
where
    Pay: PaymentRepository + Send + Sync + 'static,
    P: PlanRepository + Send + Sync + 'static,
    S: SubscriptionRepository + Send + Sync + 'static,
{
    if let Err(err) = require_service(&auth, payment_id) {
        return err.into_response();
    }

    info!(%payment_id, "payments: refund request received");
    match payments_usecase.refund_payment(payment_id).await {
        Ok(payment) => Json(payment).into_response(),
        Err(err) => err.into_response(),
    }
}
