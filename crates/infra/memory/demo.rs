use anyhow::Result;
use chrono::Utc;
use uuid::Uuid;

use super::MemoryStore;
use crate::domain::entities::{contents::ContentEntity, plans::PlanEntity, users::UserEntity};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DemoSeed {
    pub plans: usize,
    pub contents: usize,
    pub users: usize,
}

impl MemoryStore {
    /// Loads a small plan list and catalog for local runs, plus a user record
    /// for each id so tokens issued for them resolve to a viewer.
    pub fn seed_demo(&self, user_ids: &[Uuid]) -> Result<DemoSeed> {
        let now = Utc::now();

        let plans = [
            ("VIP Monthly", 19900, 30, "full_hd", vec!["exclusive", "full_hd"]),
            ("VIP Yearly", 199000, 365, "4k", vec!["exclusive", "4k", "offline"]),
        ];
        for (name, price_minor, duration_days, quality, features) in &plans {
            self.insert_plan(PlanEntity {
                id: Uuid::new_v4(),
                name: name.to_string(),
                price_minor: *price_minor,
                currency: "THB".to_string(),
                duration_days: *duration_days,
                quality: quality.to_string(),
                features: features.iter().map(|feature| feature.to_string()).collect(),
                is_active: true,
            })?;
        }

        let contents = [
            ("Harbor Lights", "series", false, 2022),
            ("Glass Garden", "movie", false, 2023),
            ("Midnight Heist", "series", true, 2025),
        ];
        for (title, content_type, is_exclusive, release_year) in &contents {
            let id = Uuid::new_v4();
            self.insert_content(ContentEntity {
                id,
                title: title.to_string(),
                description: None,
                content_type: content_type.to_string(),
                thumbnail_url: None,
                video_url: Some(format!("https://cdn.streamvault.local/{id}.m3u8")),
                is_exclusive: *is_exclusive,
                release_year: Some(*release_year),
                created_at: now,
            })?;
        }

        for (index, user_id) in user_ids.iter().enumerate() {
            self.insert_user(UserEntity {
                id: *user_id,
                email: format!("demo{}@streamvault.local", index + 1),
                display_name: Some(format!("Demo {}", index + 1)),
                is_vip: false,
                vip_expires_at: None,
                preferred_quality: "hd".to_string(),
                created_at: now,
                updated_at: now,
            })?;
        }

        Ok(DemoSeed {
            plans: plans.len(),
            contents: contents.len(),
            users: user_ids.len(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::repositories::{plans::PlanRepository, users::UserRepository};

    #[tokio::test]
    async fn seeded_store_offers_plans_and_known_users() {
        let store = MemoryStore::new();
        let user_id = Uuid::new_v4();

        let seed = store.seed_demo(&[user_id]).unwrap();
        assert_eq!(
            seed,
            DemoSeed {
                plans: 2,
                contents: 3,
                users: 1
            }
        );

        let plans = store.list_active_plans().await.unwrap();
        assert_eq!(plans.len(), 2);
        assert!(plans.iter().all(|plan| plan.is_purchasable()));

        let user = UserRepository::find_by_id(&store, user_id)
            .await
            .unwrap()
            .unwrap();
        assert!(!user.is_vip);
    }
}
