use std::sync::Arc;

use chrono::Utc;
use crates::domain::{
    entities::users::UserEntity,
    repositories::{contents::ContentRepository, users::UserRepository},
    value_objects::{
        contents::ContentView,
        entitlements::{EntitlementDto, project_content},
    },
};
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use super::errors::{UseCaseError, UseCaseResult};

pub struct ContentUseCase<C, U>
where
    C: ContentRepository + Send + Sync + 'static,
    U: UserRepository + Send + Sync + 'static,
{
    content_repo: Arc<C>,
    user_repo: Arc<U>,
}

impl<C, U> ContentUseCase<C, U>
where
    C: ContentRepository + Send + Sync + 'static,
    U: UserRepository + Send + Sync + 'static,
{
    pub fn new(content_repo: Arc<C>, user_repo: Arc<U>) -> Self {
        Self {
            content_repo,
            user_repo,
        }
    }

    pub async fn get_content(
        &self,
        content_id: Uuid,
        viewer_id: Option<Uuid>,
    ) -> UseCaseResult<ContentView> {
        let content = self
            .content_repo
            .find_by_id(content_id)
            .await
            .map_err(|err| {
                error!(%content_id, db_error = ?err, "contents: failed to load content");
                UseCaseError::Internal(err)
            })?
            .ok_or(UseCaseError::ContentNotFound)?;

        let viewer = match viewer_id {
            Some(user_id) => load_viewer(self.user_repo.as_ref(), user_id).await?,
            None => None,
        };

        let view = project_content(content, viewer.as_ref(), Utc::now());
        debug!(
            %content_id,
            anonymous = viewer.is_none(),
            vip_required = view.vip_required,
            "contents: content projected"
        );
        Ok(view)
    }

    pub async fn entitlement_of(&self, user_id: Uuid) -> UseCaseResult<EntitlementDto> {
        let user = load_viewer(self.user_repo.as_ref(), user_id)
            .await?
            .ok_or(UseCaseError::UserNotFound)?;

        let entitlement = EntitlementDto::evaluate(&user, Utc::now());
        info!(
            %user_id,
            is_vip = entitlement.is_vip,
            entitled = entitlement.entitled,
            "contents: entitlement evaluated"
        );
        Ok(entitlement)
    }
}

/// Viewer record, or None for ids without one so they are served as anonymous.
pub(super) async fn load_viewer<U>(user_repo: &U, user_id: Uuid) -> UseCaseResult<Option<UserEntity>>
where
    U: UserRepository + Send + Sync + 'static,
{
    let viewer = user_repo.find_by_id(user_id).await.map_err(|err| {
        error!(%user_id, db_error = ?err, "contents: failed to load viewer");
        UseCaseError::Internal(err)
    })?;

    if viewer.is_none() {
        debug!(%user_id, "contents: viewer has no user record, serving as anonymous");
    }
    Ok(viewer)
}

/// Owner record for writes keyed by user id; a token for an unknown user is `UserNotFound`.
pub(super) async fn require_user<U>(user_repo: &U, user_id: Uuid) -> UseCaseResult<UserEntity>
where
    U: UserRepository + Send + Sync + 'static,
{
    user_repo
        .find_by_id(user_id)
        .await
        .map_err(|err| {
            error!(%user_id, db_error = ?err, "users: failed to load user");
            UseCaseError::Internal(err)
        })?
        .ok_or_else(|| {
            warn!(%user_id, "users: no user record for token subject");
            UseCaseError::UserNotFound
        })
}
