use crate::{auth::AuthUser, usecases::progress::ProgressUseCase};
use axum::{
    Json, Router,
    extract::{Path, State},
    response::IntoResponse,
    routing::get,
};
use crates::domain::{
    repositories::{
        contents::ContentRepository, entitlement_store::EntitlementStore,
        users::UserRepository, watch_progress::WatchProgressRepository,
    },
    value_objects::watch_progress::SaveProgressModel,
};
use std::sync::Arc;
use uuid::Uuid;

pub fn routes<T>(store: Arc<T>) -> Router
where
    T: EntitlementStore + 'static,
{
    let progress_usecase = ProgressUseCase::new(
        Arc::clone(&store),
        Arc::clone(&store),
        Arc::clone(&store),
    );

    Router::new()
        .route("/", get(list_progress::<T, T, T>))
        .route(
            "/:content_id",
            get(get_progress::<T, T, T>).put(save_progress::<T, T, T>),
        )
        .with_state(Arc::new(progress_usecase))
}

pub async fn save_progress<W, C, U>(
    State(progress_usecase): State<Arc<ProgressUseCase<W, C, U>>>,
    AuthUser { user_id, .. }: AuthUser,
    Path(content_id): Path<Uuid>,
    Json(model): Json<SaveProgressModel>,
) -> impl IntoResponse
where
    W: WatchProgressRepository + Send + Sync + 'static,
    C: ContentRepository + Send + Sync + 'static,
    U: UserRepository + Send + Sync + 'static,
{
    match progress_usecase
        .save_progress(user_id, content_id, model)
        .await
    {
        Ok(record) => Json(record).into_response(),
        Err(err) => err.into_response(),
    }
}

pub async fn get_progress<W, C, U>(
    State(progress_usecase): State<Arc<ProgressUseCase<W, C, U>>>,
    AuthUser { user_id, .. }: AuthUser,
    Path(content_id): Path<Uuid>,
) -> impl IntoResponse
where
    W: WatchProgressRepository + Send + Sync + 'static,
    C: ContentRepository + Send + Sync + 'static,
    U: UserRepository + Send + Sync + 'static,
{
    match progress_usecase.get_progress(user_id, content_id).await {
        Ok(record) => Json(record).into_response(),
        Err(err) => err.into_response(),
    }
}

pub async fn list_progress<W, C, U>(
    State(progress_usecase): State<Arc<ProgressUseCase<W, C, U>>>,
    AuthUser { user_id, .. }: AuthUser,
) -> impl IntoResponse
where
    W: WatchProgressRepository + Send + Sync + 'static,
    C: ContentRepository + Send + Sync + 'static,
    U: UserRepository + Send + Sync + 'static,
{
    match progress_usecase.list_progress(user_id).await {
        Ok(records) => Json(records).into_response(),
        Err(err) => err.into_response(),
    }
}
