use crate::{
    auth::AuthUser,
    usecases::subscriptions::SubscriptionUseCase,
};
use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use crates::domain::{
    repositories::{
        entitlement_store::EntitlementStore, plans::PlanRepository,
        subscriptions::SubscriptionRepository,
    },
    value_objects::subscriptions::CheckoutRequest,
};
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

pub fn plan_routes<T>(store: Arc<T>) -> Router
where
    T: EntitlementStore + 'static,
{
    let subscriptions_usecase = SubscriptionUseCase::new(Arc::clone(&store), Arc::clone(&store));

    Router::new()
        .route("/", get(list_plans::<T, T>))
        .with_state(Arc::new(subscriptions_usecase))
}

pub fn routes<T>(store: Arc<T>) -> Router
where
    T: EntitlementStore + 'static,
{
    let subscriptions_usecase = SubscriptionUseCase::new(Arc::clone(&store), Arc::clone(&store));

    Router::new()
        .route("/checkout", post(checkout::<T, T>))
        .route("/current", get(current_subscription::<T, T>))
        .route("/:subscription_id/cancel", post(cancel_subscription::<T, T>))
        .with_state(Arc::new(subscriptions_usecase))
}

pub async fn list_plans<P, S>(
    State(subscriptions_usecase): State<Arc<SubscriptionUseCase<P, S>>>,
) -> impl IntoResponse
where
    P: PlanRepository + Send + Sync + 'static,
    S: SubscriptionRepository + Send + Sync + 'static,
{
    match subscriptions_usecase.list_plans().await {
        Ok(plans) => Json(plans).into_response(),
        Err(err) => err.into_response(),
    }
}

pub async fn checkout<P, S>(
    State(subscriptions_usecase): State<Arc<SubscriptionUseCase<P, S>>>,
    AuthUser { user_id, .. }: AuthUser,
    Json(request): Json<CheckoutRequest>,
) -> impl IntoResponse
where
    P: PlanRepository + Send + Sync + 'static,
    S: SubscriptionRepository + Send + Sync + 'static,
{
    info!(%user_id, plan_id = %request.plan_id, "subscriptions: checkout request received");
    match subscriptions_usecase
        .checkout(
            user_id,
            request.plan_id,
            &request.payment_method,
            request.auto_renew,
        )
        .await
    {
        Ok(checkout) => (StatusCode::CREATED, Json(checkout)).into_response(),
        Err(err) => err.into_response(),
    }
}

pub async fn current_subscription<P, S>(
    State(subscriptions_usecase): State<Arc<SubscriptionUseCase<P, S>>>,
    AuthUser { user_id, .. }: AuthUser,
) -> impl IntoResponse
where
    P: PlanRepository + Send + Sync + 'static,
    S: SubscriptionRepository + Send + Sync + 'static,
{
    match subscriptions_usecase.current_subscription(user_id).await {
        Ok(current) => Json(current).into_response(),
        Err(err) => err.into_response(),
    }
}

pub async fn cancel_subscription<P, S>(
    State(subscriptions_usecase): State<Arc<SubscriptionUseCase<P, S>>>,
    AuthUser { user_id, .. }: AuthUser,
    Path(subscription_id): Path<Uuid>,
) -> impl IntoResponse
where
    P: PlanRepository + Send + Sync + 'static,
    S: SubscriptionRepository + Send + Sync + 'static,
{
    info!(%user_id, %subscription_id, "subscriptions: cancel request received");
    match subscriptions_usecase
        .cancel_for_user(user_id, subscription_id)
        .await
    {
        Ok(subscription) => Json(subscription).into_response(),
        Err(err) => err.into_response(),
    }
}
