use crate::{auth::AuthUser, usecases::favorites::FavoriteUseCase};
use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use crates::domain::repositories::{
    contents::ContentRepository, entitlement_store::EntitlementStore,
    favorites::FavoriteRepository, users::UserRepository,
};
use serde::Serialize;
use std::sync::Arc;
use uuid::Uuid;

#[derive(Debug, Serialize)]
pub struct FavoriteStatusDto {
    pub content_id: Uuid,
    pub favorited: bool,
}

pub fn routes<T>(store: Arc<T>) -> Router
where
    T: EntitlementStore + 'static,
{
    let favorites_usecase = FavoriteUseCase::new(
        Arc::clone(&store),
        Arc::clone(&store),
        Arc::clone(&store),
    );

    Router::new()
        .route("/", get(list_favorites::<T, T, T>))
        .route(
            "/:content_id",
            get(favorite_status::<T, T, T>)
                .post(add_favorite::<T, T, T>)
                .delete(remove_favorite::<T, T, T>),
        )
        .with_state(Arc::new(favorites_usecase))
}

pub async fn add_favorite<F, C, U>(
    State(favorites_usecase): State<Arc<FavoriteUseCase<F, C, U>>>,
    AuthUser { user_id, .. }: AuthUser,
    Path(content_id): Path<Uuid>,
) -> impl IntoResponse
where
    F: FavoriteRepository + Send + Sync + 'static,
    C: ContentRepository + Send + Sync + 'static,
    U: UserRepository + Send + Sync + 'static,
{
    match favorites_usecase.add(user_id, content_id).await {
        Ok(inserted) => {
            let status = if inserted {
                StatusCode::CREATED
            } else {
                StatusCode::OK
            };
            let body = FavoriteStatusDto {
                content_id,
                favorited: true,
            };
            (status, Json(body)).into_response()
        }
        Err(err) => err.into_response(),
    }
}

pub async fn remove_favorite<F, C, U>(
    State(favorites_usecase): State<Arc<FavoriteUseCase<F, C, U>>>,
    AuthUser { user_id, .. }: AuthUser,
    Path(content_id): Path<Uuid>,
) -> impl IntoResponse
where
    F: FavoriteRepository + Send + Sync + 'static,
    C: ContentRepository + Send + Sync + 'static,
    U: UserRepository + Send + Sync + 'static,
{
    match favorites_usecase.remove(user_id, content_id).await {
        Ok(_) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => err.into_response(),
    }
}

pub async fn favorite_status<F, C, U>(
    State(favorites_usecase): State<Arc<FavoriteUseCase<F, C, U>>>,
    AuthUser { user_id, .. }: AuthUser,
    Path(content_id): Path<Uuid>,
) -> impl IntoResponse
where
    F: FavoriteRepository + Send + Sync + 'static,
    C: ContentRepository + Send + Sync + 'static,
    U: UserRepository + Send + Sync + 'static,
{
    match favorites_usecase.is_favorite(user_id, content_id).await {
        Ok(favorited) => Json(FavoriteStatusDto {
            content_id,
            favorited,
        })
        .into_response(),
        Err(err) => err.into_response(),
    }
}

pub async fn list_favorites<F, C, U>(
    State(favorites_usecase): State<Arc<FavoriteUseCase<F, C, U>>>,
    AuthUser { user_id, .. }: AuthUser,
) -> impl IntoResponse
where
    F: FavoriteRepository + Send + Sync + 'static,
    C: ContentRepository + Send + Sync + 'static,
    U: UserRepository + Send + Sync + 'static,
{
    match favorites_usecase.list(user_id).await {
        Ok(contents) => Json(contents).into_response(),
        Err(err) => err.into_response(),
    }
}
