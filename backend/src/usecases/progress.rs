use std::sync::Arc;

use chrono::Utc;
use crates::domain::{
    repositories::{
        contents::ContentRepository, users::UserRepository,
        watch_progress::WatchProgressRepository,
    },
    value_objects::watch_progress::{SaveProgressModel, WatchProgressDto},
};
use tracing::{error, info, warn};
use uuid::Uuid;

use super::{
    contents::require_user,
    errors::{UseCaseError, UseCaseResult},
};

pub struct ProgressUseCase<W, C, U>
where
    W: WatchProgressRepository + Send + Sync + 'static,
    C: ContentRepository + Send + Sync + 'static,
    U: UserRepository + Send + Sync + 'static,
{
    progress_repo: Arc<W>,
    content_repo: Arc<C>,
    user_repo: Arc<U>,
}

impl<W, C, U> ProgressUseCase<W, C, U>
where
    W: WatchProgressRepository + Send + Sync + 'static,
    C: ContentRepository + Send + Sync + 'static,
    U: UserRepository + Send + Sync + 'static,
{
    pub fn new(progress_repo: Arc<W>, content_repo: Arc<C>, user_repo: Arc<U>) -> Self {
        Self {
            progress_repo,
            content_repo,
            user_repo,
        }
    }

    /// Last write wins; fields left out of `model` keep their stored value.
    pub async fn save_progress(
        &self,
        user_id: Uuid,
        content_id: Uuid,
        model: SaveProgressModel,
    ) -> UseCaseResult<WatchProgressDto> {
        let record = model
            .into_entity(user_id, content_id, Utc::now())
            .inspect_err(|err| {
                warn!(%user_id, %content_id, reason = %err, "progress: save rejected");
            })?;

        let exists = self
            .content_repo
            .find_by_id(content_id)
            .await
            .map_err(|err| {
                error!(%content_id, db_error = ?err, "progress: failed to load content");
                UseCaseError::Internal(err)
            })?
            .is_some();
        if !exists {
            return Err(UseCaseError::ContentNotFound);
        }
        require_user(self.user_repo.as_ref(), user_id).await?;

        let saved = self
            .progress_repo
            .upsert_progress(record)
            .await
            .map_err(|err| {
                error!(%user_id, %content_id, db_error = ?err, "progress: upsert failed");
                UseCaseError::Internal(err)
            })?;

        info!(%user_id, %content_id, progress = saved.progress, "progress: saved");
        Ok(saved.into())
    }

    pub async fn get_progress(
        &self,
        user_id: Uuid,
        content_id: Uuid,
    ) -> UseCaseResult<Option<WatchProgressDto>> {
        let record = self
            .progress_repo
            .find_progress(user_id, content_id)
            .await
            .map_err(|err| {
                error!(%user_id, %content_id, db_error = ?err, "progress: failed to load progress");
                UseCaseError::Internal(err)
            })?;

        Ok(record.map(WatchProgressDto::from))
    }

    /// Most recently watched first.
    pub async fn list_progress(&self, user_id: Uuid) -> UseCaseResult<Vec<WatchProgressDto>> {
        let records = self.progress_repo.list_by_user(user_id).await.map_err(|err| {
            error!(%user_id, db_error = ?err, "progress: failed to list progress");
            UseCaseError::Internal(err)
        })?;

        Ok(records.into_iter().map(WatchProgressDto::from).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crates::domain::{
        entities::{
            contents::ContentEntity, users::UserEntity, watch_progress::WatchProgressEntity,
        },
        repositories::{
            contents::MockContentRepository, users::MockUserRepository,
            watch_progress::MockWatchProgressRepository,
        },
    };

    fn model(progress: i32) -> SaveProgressModel {
        SaveProgressModel {
            progress,
            current_season: Some(1),
            current_episode: Some(3),
            time_remaining: Some(600),
        }
    }

    fn content(id: Uuid) -> ContentEntity {
        ContentEntity {
            id,
            title: "Harbor Lights".to_string(),
            description: None,
            content_type: "series".to_string(),
            thumbnail_url: None,
            video_url: None,
            is_exclusive: false,
            release_year: None,
            created_at: Utc::now(),
        }
    }

    fn user(id: Uuid) -> UserEntity {
        let now = Utc::now();
        UserEntity {
            id,
            email: "viewer@example.com".to_string(),
            display_name: None,
            is_vip: false,
            vip_expires_at: None,
            preferred_quality: "hd".to_string(),
            created_at: now,
            updated_at: now,
        }
    }

    #[tokio::test]
    async fn out_of_range_progress_is_rejected_before_io() {
        let mut progress_repo = MockWatchProgressRepository::new();
        progress_repo.expect_upsert_progress().never();
        let mut content_repo = MockContentRepository::new();
        content_repo.expect_find_by_id().never();
        let mut user_repo = MockUserRepository::new();
        user_repo.expect_find_by_id().never();

        let usecase = ProgressUseCase::new(
            Arc::new(progress_repo),
            Arc::new(content_repo),
            Arc::new(user_repo),
        );
        for progress in [-1, 101] {
            let result = usecase
                .save_progress(Uuid::new_v4(), Uuid::new_v4(), model(progress))
                .await;
            assert!(matches!(result, Err(UseCaseError::Validation(_))));
        }
    }

    #[tokio::test]
    async fn unknown_content_is_not_found() {
        let mut progress_repo = MockWatchProgressRepository::new();
        progress_repo.expect_upsert_progress().never();
        let mut content_repo = MockContentRepository::new();
        content_repo.expect_find_by_id().returning(|_| Ok(None));
        let mut user_repo = MockUserRepository::new();
        user_repo.expect_find_by_id().never();

        let usecase = ProgressUseCase::new(
            Arc::new(progress_repo),
            Arc::new(content_repo),
            Arc::new(user_repo),
        );
        let result = usecase
            .save_progress(Uuid::new_v4(), Uuid::new_v4(), model(40))
            .await;

        assert!(matches!(result, Err(UseCaseError::ContentNotFound)));
    }

    #[tokio::test]
    async fn save_upserts_and_returns_record() {
        let user_id = Uuid::new_v4();
        let content_id = Uuid::new_v4();

        let mut content_repo = MockContentRepository::new();
        content_repo
            .expect_find_by_id()
            .returning(move |id| Ok(Some(content(id))));
        let mut progress_repo = MockWatchProgressRepository::new();
        progress_repo
            .expect_upsert_progress()
            .withf(move |record| {
                record.user_id == user_id && record.content_id == content_id && record.progress == 100
            })
            .times(1)
            .returning(|record| {
                Ok(WatchProgressEntity {
                    user_id: record.user_id,
                    content_id: record.content_id,
                    progress: record.progress,
                    current_season: record.current_season,
                    current_episode: record.current_episode,
                    time_remaining: record.time_remaining,
                    updated_at: record.updated_at,
                })
            });

        let mut user_repo = MockUserRepository::new();
        user_repo
            .expect_find_by_id()
            .returning(move |id| Ok(Some(user(id))));

        let usecase = ProgressUseCase::new(
            Arc::new(progress_repo),
            Arc::new(content_repo),
            Arc::new(user_repo),
        );
        let saved = usecase
            .save_progress(user_id, content_id, model(100))
            .await
            .unwrap();

        assert_eq!(saved.content_id, content_id);
        assert_eq!(saved.progress, 100);
        assert_eq!(saved.current_episode, Some(3));
    }

    #[tokio::test]
    async fn token_without_user_record_is_not_found() {
        let mut content_repo = MockContentRepository::new();
        content_repo
            .expect_find_by_id()
            .returning(move |id| Ok(Some(content(id))));
        let mut user_repo = MockUserRepository::new();
        user_repo.expect_find_by_id().times(1).returning(|_| Ok(None));
        let mut progress_repo = MockWatchProgressRepository::new();
        progress_repo.expect_upsert_progress().never();

        let usecase = ProgressUseCase::new(
            Arc::new(progress_repo),
            Arc::new(content_repo),
            Arc::new(user_repo),
        );
        let result = usecase
            .save_progress(Uuid::new_v4(), Uuid::new_v4(), model(40))
            .await;

        assert!(matches!(result, Err(UseCaseError::UserNotFound)));
    }
}
