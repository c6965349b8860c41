use crate::{
    auth::{AuthUser, OptionalAuthUser},
    usecases::contents::ContentUseCase,
};
use axum::{
    Json, Router,
    extract::{Path, State},
    response::IntoResponse,
    routing::get,
};
use crates::domain::repositories::{
    contents::ContentRepository, entitlement_store::EntitlementStore, users::UserRepository,
};
use std::sync::Arc;
use uuid::Uuid;

pub fn routes<T>(store: Arc<T>) -> Router
where
    T: EntitlementStore + 'static,
{
    let contents_usecase = ContentUseCase::new(Arc::clone(&store), Arc::clone(&store));

    Router::new()
        .route("/:content_id", get(get_content::<T, T>))
        .with_state(Arc::new(contents_usecase))
}

pub fn entitlement_routes<T>(store: Arc<T>) -> Router
where
    T: EntitlementStore + 'static,
{
    let contents_usecase = ContentUseCase::new(Arc::clone(&store), Arc::clone(&store));

    Router::new()
        .route("/me", get(my_entitlement::<T, T>))
        .with_state(Arc::new(contents_usecase))
}

pub async fn get_content<C, U>(
    State(contents_usecase): State<Arc<ContentUseCase<C, U>>>,
    OptionalAuthUser(viewer): OptionalAuthUser,
    Path(content_id): Path<Uuid>,
) -> impl IntoResponse
where
    C: ContentRepository + Send + Sync + 'static,
    U: UserRepository + Send + Sync + 'static,
{
    let viewer_id = viewer.map(|auth| auth.user_id);
    match contents_usecase.get_content(content_id, viewer_id).await {
        Ok(view) => Json(view).into_response(),
        Err(err) => err.into_response(),
    }
}

pub async fn my_entitlement<C, U>(
    State(contents_usecase): State<Arc<ContentUseCase<C, U>>>,
    AuthUser { user_id, .. }: AuthUser,
) -> impl IntoResponse
where
    C: ContentRepository + Send + Sync + 'static,
    U: UserRepository + Send + Sync + 'static,
{
    match contents_usecase.entitlement_of(user_id).await {
        Ok(entitlement) => Json(entitlement).into_response(),
        Err(err) => err.into_response(),
    }
}
