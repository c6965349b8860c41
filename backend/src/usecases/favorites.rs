use std::sync::Arc;

use chrono::Utc;
use crates::domain::{
    entities::favorites::InsertFavoriteEntity,
    repositories::{
        contents::ContentRepository, favorites::FavoriteRepository, users::UserRepository,
    },
    value_objects::{contents::ContentView, entitlements::project_content},
};
use tracing::{error, info};
use uuid::Uuid;

use super::{
    contents::{load_viewer, require_user},
    errors::{UseCaseError, UseCaseResult},
};

pub struct FavoriteUseCase<F, C, U>
where
    F: FavoriteRepository + Send + Sync + 'static,
    C: ContentRepository + Send + Sync + 'static,
    U: UserRepository + Send + Sync + 'static,
{
    favorite_repo: Arc<F>,
    content_repo: Arc<C>,
    user_repo: Arc<U>,
}

impl<F, C, U> FavoriteUseCase<F, C, U>
where
    F: FavoriteRepository + Send + Sync + 'static,
    C: ContentRepository + Send + Sync + 'static,
    U: UserRepository + Send + Sync + 'static,
{
    pub fn new(favorite_repo: Arc<F>, content_repo: Arc<C>, user_repo: Arc<U>) -> Self {
        Self {
            favorite_repo,
            content_repo,
            user_repo,
        }
    }

    /// Returns whether a new favorite was recorded.
    pub async fn add(&self, user_id: Uuid, content_id: Uuid) -> UseCaseResult<bool> {
        let exists = self
            .content_repo
            .find_by_id(content_id)
            .await
            .map_err(|err| {
                error!(%content_id, db_error = ?err, "favorites: failed to load content");
                UseCaseError::Internal(err)
            })?
            .is_some();
        if !exists {
            return Err(UseCaseError::ContentNotFound);
        }
        require_user(self.user_repo.as_ref(), user_id).await?;

        let inserted = self
            .favorite_repo
            .add_favorite(InsertFavoriteEntity {
                user_id,
                content_id,
                added_at: Utc::now(),
            })
            .await
            .map_err(|err| {
                error!(%user_id, %content_id, db_error = ?err, "favorites: add failed");
                UseCaseError::Internal(err)
            })?;

        info!(%user_id, %content_id, inserted, "favorites: added");
        Ok(inserted)
    }

    pub async fn remove(&self, user_id: Uuid, content_id: Uuid) -> UseCaseResult<bool> {
        let removed = self
            .favorite_repo
            .remove_favorite(user_id, content_id)
            .await
            .map_err(|err| {
                error!(%user_id, %content_id, db_error = ?err, "favorites: remove failed");
                UseCaseError::Internal(err)
            })?;

        info!(%user_id, %content_id, removed, "favorites: removed");
        Ok(removed)
    }

    pub async fn is_favorite(&self, user_id: Uuid, content_id: Uuid) -> UseCaseResult<bool> {
        self.favorite_repo
            .is_favorite(user_id, content_id)
            .await
            .map_err(|err| {
                error!(%user_id, %content_id, db_error = ?err, "favorites: lookup failed");
                UseCaseError::Internal(err)
            })
    }

    /// Favorites newest first, gated for this user. Ids missing from the catalog are skipped.
    pub async fn list(&self, user_id: Uuid) -> UseCaseResult<Vec<ContentView>> {
        let content_ids = self
            .favorite_repo
            .list_content_ids(user_id)
            .await
            .map_err(|err| {
                error!(%user_id, db_error = ?err, "favorites: failed to list ids");
                UseCaseError::Internal(err)
            })?;

        if content_ids.is_empty() {
            return Ok(Vec::new());
        }

        let requested = content_ids.len();
        let contents = self
            .content_repo
            .list_by_ids(content_ids)
            .await
            .map_err(|err| {
                error!(%user_id, db_error = ?err, "favorites: failed to resolve contents");
                UseCaseError::Internal(err)
            })?;

        let viewer = load_viewer(self.user_repo.as_ref(), user_id).await?;
        let now = Utc::now();

        info!(
            %user_id,
            requested,
            resolved = contents.len(),
            "favorites: listed"
        );
        Ok(contents
            .into_iter()
            .map(|content| project_content(content, viewer.as_ref(), now))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crates::domain::{
        entities::contents::ContentEntity,
        repositories::{
            contents::MockContentRepository, favorites::MockFavoriteRepository,
            users::MockUserRepository,
        },
    };

    fn exclusive(id: Uuid) -> ContentEntity {
        ContentEntity {
            id,
            title: "Glass Garden".to_string(),
            description: None,
            content_type: "movie".to_string(),
            thumbnail_url: None,
            video_url: Some("https://cdn.example.com/glass.m3u8".to_string()),
            is_exclusive: true,
            release_year: Some(2023),
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn add_rejects_unknown_content() {
        let mut favorite_repo = MockFavoriteRepository::new();
        favorite_repo.expect_add_favorite().never();
        let mut content_repo = MockContentRepository::new();
        content_repo.expect_find_by_id().returning(|_| Ok(None));

        let usecase = FavoriteUseCase::new(
            Arc::new(favorite_repo),
            Arc::new(content_repo),
            Arc::new(MockUserRepository::new()),
        );

        assert!(matches!(
            usecase.add(Uuid::new_v4(), Uuid::new_v4()).await,
            Err(UseCaseError::ContentNotFound)
        ));
    }

    #[tokio::test]
    async fn add_for_token_without_user_record_is_not_found() {
        let mut favorite_repo = MockFavoriteRepository::new();
        favorite_repo.expect_add_favorite().never();
        let mut content_repo = MockContentRepository::new();
        content_repo
            .expect_find_by_id()
            .returning(|id| Ok(Some(exclusive(id))));
        let mut user_repo = MockUserRepository::new();
        user_repo.expect_find_by_id().times(1).returning(|_| Ok(None));

        let usecase = FavoriteUseCase::new(
            Arc::new(favorite_repo),
            Arc::new(content_repo),
            Arc::new(user_repo),
        );

        assert!(matches!(
            usecase.add(Uuid::new_v4(), Uuid::new_v4()).await,
            Err(UseCaseError::UserNotFound)
        ));
    }

    #[tokio::test]
    async fn remove_of_absent_favorite_succeeds() {
        let mut favorite_repo = MockFavoriteRepository::new();
        favorite_repo
            .expect_remove_favorite()
            .returning(|_, _| Ok(false));

        let usecase = FavoriteUseCase::new(
            Arc::new(favorite_repo),
            Arc::new(MockContentRepository::new()),
            Arc::new(MockUserRepository::new()),
        );

        assert!(!usecase.remove(Uuid::new_v4(), Uuid::new_v4()).await.unwrap());
    }

    #[tokio::test]
    async fn list_drops_missing_and_gates_for_user() {
        let user_id = Uuid::new_v4();
        let present = Uuid::new_v4();
        let missing = Uuid::new_v4();

        let mut favorite_repo = MockFavoriteRepository::new();
        favorite_repo
            .expect_list_content_ids()
            .returning(move |_| Ok(vec![missing, present]));
        let mut content_repo = MockContentRepository::new();
        content_repo
            .expect_list_by_ids()
            .withf(move |ids| ids == &vec![missing, present])
            .returning(move |_| Ok(vec![exclusive(present)]));
        let mut user_repo = MockUserRepository::new();
        user_repo.expect_find_by_id().returning(|_| Ok(None));

        let usecase = FavoriteUseCase::new(
            Arc::new(favorite_repo),
            Arc::new(content_repo),
            Arc::new(user_repo),
        );
        let listed = usecase.list(user_id).await.unwrap();

        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].id, present);
        assert!(listed[0].vip_required);
        assert_eq!(listed[0].video_url, None);
    }

    #[tokio::test]
    async fn empty_list_skips_catalog() {
        let mut favorite_repo = MockFavoriteRepository::new();
        favorite_repo
            .expect_list_content_ids()
            .returning(|_| Ok(Vec::new()));
        let mut content_repo = MockContentRepository::new();
        content_repo.expect_list_by_ids().never();

        let usecase = FavoriteUseCase::new(
            Arc::new(favorite_repo),
            Arc::new(content_repo),
            Arc::new(MockUserRepository::new()),
        );

        assert!(usecase.list(Uuid::new_v4()).await.unwrap().is_empty());
    }
}
