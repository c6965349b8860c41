use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::entities::watch_progress::{UpsertWatchProgressEntity, WatchProgressEntity};
use crate::domain::value_objects::validation::ValidationError;

pub const MIN_PROGRESS: i32 = 0;
pub const MAX_PROGRESS: i32 = 100;

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SaveProgressModel {
    pub progress: i32,
    #[serde(default)]
    pub current_season: Option<i32>,
    #[serde(default)]
    pub current_episode: Option<i32>,
    #[serde(default)]
    pub time_remaining: Option<i32>,
}

impl SaveProgressModel {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !(MIN_PROGRESS..=MAX_PROGRESS).contains(&self.progress) {
            return Err(ValidationError::new(format!(
                "progress must be between {MIN_PROGRESS} and {MAX_PROGRESS}, got {}",
                self.progress
            )));
        }

        for (field, value) in [
            ("current_season", self.current_season),
            ("current_episode", self.current_episode),
            ("time_remaining", self.time_remaining),
        ] {
            if value.is_some_and(|v| v < 0) {
                return Err(ValidationError::new(format!("{field} must not be negative")));
            }
        }

        Ok(())
    }

    pub fn into_entity(
        self,
        user_id: Uuid,
        content_id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<UpsertWatchProgressEntity, ValidationError> {
        self.validate()?;

        Ok(UpsertWatchProgressEntity {
            user_id,
            content_id,
            progress: self.progress,
            current_season: self.current_season,
            current_episode: self.current_episode,
            time_remaining: self.time_remaining,
            updated_at: now,
        })
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct WatchProgressDto {
    pub content_id: Uuid,
    pub progress: i32,
    pub current_season: Option<i32>,
    pub current_episode: Option<i32>,
    pub time_remaining: Option<i32>,
    pub timestamp: DateTime<Utc>,
}

impl From<WatchProgressEntity> for WatchProgressDto {
    fn from(value: WatchProgressEntity) -> Self {
        Self {
            content_id: value.content_id,
            progress: value.progress,
            current_season: value.current_season,
            current_episode: value.current_episode,
            time_remaining: value.time_remaining,
            timestamp: value.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn model(progress: i32) -> SaveProgressModel {
        SaveProgressModel {
            progress,
            current_season: Some(2),
            current_episode: Some(5),
            time_remaining: Some(1200),
        }
    }

    #[test]
    fn bounds_are_inclusive() {
        assert!(model(0).validate().is_ok());
        assert!(model(100).validate().is_ok());
    }

    #[test]
    fn out_of_range_progress_is_rejected() {
        for progress in [-1, 101, i32::MAX] {
            let err = model(progress).validate().unwrap_err();
            assert!(err.to_string().contains("progress must be between"), "got: {err}");
        }
    }

    #[test]
    fn negative_episode_fields_are_rejected() {
        let mut model = model(10);
        model.time_remaining = Some(-5);
        assert_eq!(
            model.validate().unwrap_err().to_string(),
            "time_remaining must not be negative"
        );
    }

    #[test]
    fn entity_carries_timestamp_and_keys() {
        let now = Utc::now();
        let user_id = Uuid::new_v4();
        let content_id = Uuid::new_v4();
        let entity = model(40).into_entity(user_id, content_id, now).unwrap();
        assert_eq!(entity.user_id, user_id);
        assert_eq!(entity.content_id, content_id);
        assert_eq!(entity.progress, 40);
        assert_eq!(entity.updated_at, now);
    }
}
