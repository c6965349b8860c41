use anyhow::{Result, bail};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::{MemoryState, MemoryStore};
use crate::domain::{
    entities::{
        contents::ContentEntity,
        favorites::{FavoriteEntity, InsertFavoriteEntity},
        payments::{InsertPaymentEntity, PaymentEntity},
        plans::PlanEntity,
        subscriptions::{InsertSubscriptionEntity, SubscriptionEntity},
        users::UserEntity,
        watch_progress::{UpsertWatchProgressEntity, WatchProgressEntity},
    },
    repositories::{
        contents::ContentRepository, favorites::FavoriteRepository, payments::PaymentRepository,
        plans::PlanRepository, subscriptions::SubscriptionRepository, users::UserRepository,
        watch_progress::WatchProgressRepository,
    },
    value_objects::{
        payments::PaymentTransitionModel,
        subscriptions::{
            ActivationOutcome, ActivationStatus, CancellationOutcome, settled_activation,
        },
    },
};

impl MemoryState {
    fn write_vip_status(
        &mut self,
        user_id: Uuid,
        is_vip: bool,
        vip_expires_at: Option<DateTime<Utc>>,
        at: DateTime<Utc>,
    ) -> bool {
        match self.users.get_mut(&user_id) {
            Some(user) => {
                user.is_vip = is_vip;
                user.vip_expires_at = vip_expires_at;
                user.updated_at = at;
                true
            }
            None => false,
        }
    }

    fn insert_subscription(&mut self, subscription: InsertSubscriptionEntity) -> SubscriptionEntity {
        let now = Utc::now();
        let entity = SubscriptionEntity {
            id: Uuid::new_v4(),
            user_id: subscription.user_id,
            plan_id: subscription.plan_id,
            start_date: subscription.start_date,
            end_date: subscription.end_date,
            is_active: subscription.is_active,
            auto_renew: subscription.auto_renew,
            activated_at: None,
            canceled_at: None,
            created_at: now,
            updated_at: now,
        };
        self.subscriptions.insert(entity.id, entity.clone());
        entity
    }

    fn insert_payment(&mut self, payment: InsertPaymentEntity) -> PaymentEntity {
        let now = Utc::now();
        let entity = PaymentEntity {
            id: Uuid::new_v4(),
            user_id: payment.user_id,
            subscription_id: payment.subscription_id,
            amount_minor: payment.amount_minor,
            currency: payment.currency,
            method: payment.method,
            details: payment.details,
            status: payment.status,
            transaction_id: None,
            failure_reason: None,
            created_at: now,
            updated_at: now,
            completed_at: None,
        };
        self.payments.insert(entity.id, entity.clone());
        entity
    }
}

#[async_trait]
impl UserRepository for MemoryStore {
    async fn find_by_id(&self, user_id: Uuid) -> Result<Option<UserEntity>> {
        Ok(self.lock()?.users.get(&user_id).cloned())
    }

    async fn set_vip_status(
        &self,
        user_id: Uuid,
        is_vip: bool,
        vip_expires_at: Option<DateTime<Utc>>,
    ) -> Result<bool> {
        Ok(self
            .lock()?
            .write_vip_status(user_id, is_vip, vip_expires_at, Utc::now()))
    }
}

#[async_trait]
impl PlanRepository for MemoryStore {
    async fn find_active_plan_by_id(&self, plan_id: Uuid) -> Result<Option<PlanEntity>> {
        Ok(self
            .lock()?
            .plans
            .get(&plan_id)
            .filter(|plan| plan.is_purchasable())
            .cloned())
    }

    async fn find_by_id(&self, plan_id: Uuid) -> Result<Option<PlanEntity>> {
        Ok(self.lock()?.plans.get(&plan_id).cloned())
    }

    async fn list_active_plans(&self) -> Result<Vec<PlanEntity>> {
        let mut plans: Vec<PlanEntity> = self
            .lock()?
            .plans
            .values()
            .filter(|plan| plan.is_purchasable())
            .cloned()
            .collect();
        plans.sort_by_key(|plan| plan.price_minor);
        Ok(plans)
    }
}

#[async_trait]
impl SubscriptionRepository for MemoryStore {
    async fn find_by_id(&self, subscription_id: Uuid) -> Result<Option<SubscriptionEntity>> {
        Ok(self.lock()?.subscriptions.get(&subscription_id).cloned())
    }

    async fn find_active_by_user(&self, user_id: Uuid) -> Result<Option<SubscriptionEntity>> {
        Ok(self
            .lock()?
            .subscriptions
            .values()
            .find(|subscription| subscription.user_id == user_id && subscription.is_active)
            .cloned())
    }

    async fn create_subscription(
        &self,
        subscription: InsertSubscriptionEntity,
    ) -> Result<SubscriptionEntity> {
        Ok(self.lock()?.insert_subscription(subscription))
    }

    async fn create_subscription_with_payment(
        &self,
        subscription: InsertSubscriptionEntity,
        payment: InsertPaymentEntity,
    ) -> Result<(SubscriptionEntity, PaymentEntity)> {
        let mut state = self.lock()?;
        let subscription = state.insert_subscription(subscription);
        let payment = state.insert_payment(InsertPaymentEntity {
            subscription_id: Some(subscription.id),
            ..payment
        });
        Ok((subscription, payment))
    }

    async fn activate_and_grant_vip(
        &self,
        subscription_id: Uuid,
        activated_at: DateTime<Utc>,
    ) -> Result<Option<ActivationOutcome>> {
        let mut state = self.lock()?;

        let Some(subscription) = state.subscriptions.get(&subscription_id).cloned() else {
            return Ok(None);
        };

        if let Some(status) = settled_activation(&subscription) {
            return Ok(Some(ActivationOutcome {
                subscription,
                status,
            }));
        }

        // Checked up front so a missing owner leaves nothing half-written.
        if !state.users.contains_key(&subscription.user_id) {
            bail!(
                "user {} owning subscription {} does not exist",
                subscription.user_id,
                subscription.id
            );
        }

        for other in state.subscriptions.values_mut() {
            if other.user_id == subscription.user_id && other.is_active && other.id != subscription_id
            {
                other.is_active = false;
                other.updated_at = activated_at;
            }
        }

        let mut activated = subscription;
        activated.is_active = true;
        activated.activated_at = Some(activated_at);
        activated.updated_at = activated_at;
        state.subscriptions.insert(activated.id, activated.clone());
        state.write_vip_status(activated.user_id, true, Some(activated.end_date), activated_at);

        Ok(Some(ActivationOutcome {
            subscription: activated,
            status: ActivationStatus::Activated,
        }))
    }

    async fn cancel_and_revoke_vip(
        &self,
        subscription_id: Uuid,
        canceled_at: DateTime<Utc>,
    ) -> Result<Option<CancellationOutcome>> {
        let mut state = self.lock()?;

        let Some(subscription) = state.subscriptions.get(&subscription_id).cloned() else {
            return Ok(None);
        };

        if subscription.canceled_at.is_some() {
            return Ok(Some(CancellationOutcome {
                subscription,
                already_canceled: true,
                vip_revoked: false,
            }));
        }

        let was_active = subscription.is_active;
        let mut canceled = subscription;
        canceled.is_active = false;
        canceled.auto_renew = false;
        canceled.canceled_at = Some(canceled_at);
        canceled.updated_at = canceled_at;
        state.subscriptions.insert(canceled.id, canceled.clone());

        let vip_revoked =
            was_active && state.write_vip_status(canceled.user_id, false, None, canceled_at);

        Ok(Some(CancellationOutcome {
            subscription: canceled,
            already_canceled: false,
            vip_revoked,
        }))
    }
}

#[async_trait]
impl PaymentRepository for MemoryStore {
    async fn create_payment(&self, payment: InsertPaymentEntity) -> Result<PaymentEntity> {
        Ok(self.lock()?.insert_payment(payment))
    }

    async fn find_by_id(&self, payment_id: Uuid) -> Result<Option<PaymentEntity>> {
        Ok(self.lock()?.payments.get(&payment_id).cloned())
    }

    async fn list_by_user(&self, user_id: Uuid) -> Result<Vec<PaymentEntity>> {
        let mut payments: Vec<PaymentEntity> = self
            .lock()?
            .payments
            .values()
            .filter(|payment| payment.user_id == user_id)
            .cloned()
            .collect();
        payments.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(payments)
    }

    async fn transition_status(
        &self,
        payment_id: Uuid,
        transition: PaymentTransitionModel,
    ) -> Result<Option<PaymentEntity>> {
        let mut state = self.lock()?;

        match state.payments.get_mut(&payment_id) {
            Some(payment) if payment.status == transition.from.as_str() => {
                transition.apply_to(payment);
                Ok(Some(payment.clone()))
            }
            _ => Ok(None),
        }
    }
}

#[async_trait]
impl ContentRepository for MemoryStore {
    async fn find_by_id(&self, content_id: Uuid) -> Result<Option<ContentEntity>> {
        Ok(self.lock()?.contents.get(&content_id).cloned())
    }

    async fn list_by_ids(&self, content_ids: Vec<Uuid>) -> Result<Vec<ContentEntity>> {
        let state = self.lock()?;
        Ok(content_ids
            .iter()
            .filter_map(|id| state.contents.get(id).cloned())
            .collect())
    }
}

#[async_trait]
impl WatchProgressRepository for MemoryStore {
    async fn upsert_progress(
        &self,
        progress: UpsertWatchProgressEntity,
    ) -> Result<WatchProgressEntity> {
        let mut state = self.lock()?;
        let key = (progress.user_id, progress.content_id);

        let record = match state.watch_progress.get(&key) {
            Some(existing) => WatchProgressEntity {
                progress: progress.progress,
                current_season: progress.current_season.or(existing.current_season),
                current_episode: progress.current_episode.or(existing.current_episode),
                time_remaining: progress.time_remaining.or(existing.time_remaining),
                updated_at: progress.updated_at,
                ..existing.clone()
            },
            None => WatchProgressEntity {
                user_id: progress.user_id,
                content_id: progress.content_id,
                progress: progress.progress,
                current_season: progress.current_season,
                current_episode: progress.current_episode,
                time_remaining: progress.time_remaining,
                updated_at: progress.updated_at,
            },
        };

        state.watch_progress.insert(key, record.clone());
        Ok(record)
    }

    async fn find_progress(
        &self,
        user_id: Uuid,
        content_id: Uuid,
    ) -> Result<Option<WatchProgressEntity>> {
        Ok(self
            .lock()?
            .watch_progress
            .get(&(user_id, content_id))
            .cloned())
    }

    async fn list_by_user(&self, user_id: Uuid) -> Result<Vec<WatchProgressEntity>> {
        let mut records: Vec<WatchProgressEntity> = self
            .lock()?
            .watch_progress
            .values()
            .filter(|record| record.user_id == user_id)
            .cloned()
            .collect();
        records.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        Ok(records)
    }
}

#[async_trait]
impl FavoriteRepository for MemoryStore {
    async fn add_favorite(&self, favorite: InsertFavoriteEntity) -> Result<bool> {
        let mut state = self.lock()?;
        let key = (favorite.user_id, favorite.content_id);

        if state.favorites.contains_key(&key) {
            return Ok(false);
        }

        state.favorites.insert(
            key,
            FavoriteEntity {
                user_id: favorite.user_id,
                content_id: favorite.content_id,
                added_at: favorite.added_at,
            },
        );
        Ok(true)
    }

    async fn remove_favorite(&self, user_id: Uuid, content_id: Uuid) -> Result<bool> {
        Ok(self
            .lock()?
            .favorites
            .remove(&(user_id, content_id))
            .is_some())
    }

    async fn is_favorite(&self, user_id: Uuid, content_id: Uuid) -> Result<bool> {
        Ok(self.lock()?.favorites.contains_key(&(user_id, content_id)))
    }

    async fn list_content_ids(&self, user_id: Uuid) -> Result<Vec<Uuid>> {
        let mut favorites: Vec<FavoriteEntity> = self
            .lock()?
            .favorites
            .values()
            .filter(|favorite| favorite.user_id == user_id)
            .cloned()
            .collect();
        favorites.sort_by(|a, b| b.added_at.cmp(&a.added_at));
        Ok(favorites.into_iter().map(|favorite| favorite.content_id).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_objects::enums::payment_statuses::PaymentStatus;
    use chrono::Duration;

    fn user() -> UserEntity {
        let now = Utc::now();
        UserEntity {
            id: Uuid::new_v4(),
            email: "viewer@example.com".to_string(),
            display_name: None,
            is_vip: false,
            vip_expires_at: None,
            preferred_quality: "hd".to_string(),
            created_at: now,
            updated_at: now,
        }
    }

    fn content() -> ContentEntity {
        ContentEntity {
            id: Uuid::new_v4(),
            title: "Night Train".to_string(),
            description: None,
            content_type: "movie".to_string(),
            thumbnail_url: None,
            video_url: Some("https://cdn.example.com/night-train.m3u8".to_string()),
            is_exclusive: true,
            release_year: Some(2024),
            created_at: Utc::now(),
        }
    }

    fn pending_subscription(user_id: Uuid) -> InsertSubscriptionEntity {
        let start = Utc::now();
        InsertSubscriptionEntity {
            user_id,
            plan_id: Uuid::new_v4(),
            start_date: start,
            end_date: start + Duration::days(30),
            is_active: false,
            auto_renew: false,
        }
    }

    #[tokio::test]
    async fn activation_grants_vip_once() {
        let store = MemoryStore::new();
        let user = user();
        store.insert_user(user.clone()).unwrap();

        let subscription = store
            .create_subscription(pending_subscription(user.id))
            .await
            .unwrap();

        let first = store
            .activate_and_grant_vip(subscription.id, Utc::now())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(first.status, ActivationStatus::Activated);
        assert!(first.subscription.is_active);

        let second = store
            .activate_and_grant_vip(subscription.id, Utc::now())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(second.status, ActivationStatus::AlreadyActivated);

        let stored = UserRepository::find_by_id(&store, user.id)
            .await
            .unwrap()
            .unwrap();
        assert!(stored.is_vip);
        assert_eq!(stored.vip_expires_at, Some(subscription.end_date));
    }

    #[tokio::test]
    async fn activation_supersedes_previous_active_subscription() {
        let store = MemoryStore::new();
        let user = user();
        store.insert_user(user.clone()).unwrap();

        let older = store
            .create_subscription(pending_subscription(user.id))
            .await
            .unwrap();
        let newer = store
            .create_subscription(pending_subscription(user.id))
            .await
            .unwrap();

        store
            .activate_and_grant_vip(older.id, Utc::now())
            .await
            .unwrap();
        store
            .activate_and_grant_vip(newer.id, Utc::now())
            .await
            .unwrap();

        let active = store.find_active_by_user(user.id).await.unwrap().unwrap();
        assert_eq!(active.id, newer.id);

        let older = SubscriptionRepository::find_by_id(&store, older.id)
            .await
            .unwrap()
            .unwrap();
        assert!(!older.is_active);
    }

    #[tokio::test]
    async fn activation_of_missing_owner_fails_without_changes() {
        let store = MemoryStore::new();
        let subscription = store
            .create_subscription(pending_subscription(Uuid::new_v4()))
            .await
            .unwrap();

        assert!(
            store
                .activate_and_grant_vip(subscription.id, Utc::now())
                .await
                .is_err()
        );

        let stored = SubscriptionRepository::find_by_id(&store, subscription.id)
            .await
            .unwrap()
            .unwrap();
        assert!(!stored.is_active);
        assert_eq!(stored.activated_at, None);
    }

    #[tokio::test]
    async fn cancel_revokes_vip_and_blocks_later_activation() {
        let store = MemoryStore::new();
        let user = user();
        store.insert_user(user.clone()).unwrap();

        let subscription = store
            .create_subscription(pending_subscription(user.id))
            .await
            .unwrap();
        store
            .activate_and_grant_vip(subscription.id, Utc::now())
            .await
            .unwrap();

        let canceled = store
            .cancel_and_revoke_vip(subscription.id, Utc::now())
            .await
            .unwrap()
            .unwrap();
        assert!(canceled.vip_revoked);
        assert!(!canceled.already_canceled);
        assert!(!canceled.subscription.is_active);
        assert!(!canceled.subscription.auto_renew);

        let again = store
            .cancel_and_revoke_vip(subscription.id, Utc::now())
            .await
            .unwrap()
            .unwrap();
        assert!(again.already_canceled);

        let stored = UserRepository::find_by_id(&store, user.id)
            .await
            .unwrap()
            .unwrap();
        assert!(!stored.is_vip);
        assert_eq!(stored.vip_expires_at, None);

        let outcome = store
            .activate_and_grant_vip(subscription.id, Utc::now())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(outcome.status, ActivationStatus::Canceled);
    }

    #[tokio::test]
    async fn cancel_of_pending_subscription_keeps_vip() {
        let store = MemoryStore::new();
        let mut user = user();
        user.is_vip = true;
        user.vip_expires_at = Some(Utc::now() + Duration::days(3));
        store.insert_user(user.clone()).unwrap();

        let pending = store
            .create_subscription(pending_subscription(user.id))
            .await
            .unwrap();
        let outcome = store
            .cancel_and_revoke_vip(pending.id, Utc::now())
            .await
            .unwrap()
            .unwrap();
        assert!(!outcome.vip_revoked);

        let stored = UserRepository::find_by_id(&store, user.id)
            .await
            .unwrap()
            .unwrap();
        assert!(stored.is_vip);
    }

    #[tokio::test]
    async fn transition_applies_only_from_expected_status() {
        let store = MemoryStore::new();
        let payment = store
            .create_payment(InsertPaymentEntity {
                user_id: Uuid::new_v4(),
                subscription_id: None,
                amount_minor: 19900,
                currency: "THB".to_string(),
                method: "card".to_string(),
                details: serde_json::json!({}),
                status: "pending".to_string(),
            })
            .await
            .unwrap();

        let complete = PaymentTransitionModel {
            from: PaymentStatus::Pending,
            to: PaymentStatus::Completed,
            transaction_id: Some("tx-42".to_string()),
            failure_reason: None,
            at: Utc::now(),
        };

        let updated = store
            .transition_status(payment.id, complete.clone())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.status, "completed");
        assert_eq!(updated.transaction_id.as_deref(), Some("tx-42"));
        assert!(updated.completed_at.is_some());

        assert!(
            store
                .transition_status(payment.id, complete)
                .await
                .unwrap()
                .is_none()
        );
    }

    #[tokio::test]
    async fn progress_upsert_keeps_omitted_fields() {
        let store = MemoryStore::new();
        let (user_id, content_id) = (Uuid::new_v4(), Uuid::new_v4());

        store
            .upsert_progress(UpsertWatchProgressEntity {
                user_id,
                content_id,
                progress: 30,
                current_season: Some(2),
                current_episode: Some(5),
                time_remaining: Some(1200),
                updated_at: Utc::now(),
            })
            .await
            .unwrap();

        let saved = store
            .upsert_progress(UpsertWatchProgressEntity {
                user_id,
                content_id,
                progress: 45,
                current_season: None,
                current_episode: Some(6),
                time_remaining: None,
                updated_at: Utc::now(),
            })
            .await
            .unwrap();

        assert_eq!(saved.progress, 45);
        assert_eq!(saved.current_season, Some(2));
        assert_eq!(saved.current_episode, Some(6));
        assert_eq!(saved.time_remaining, Some(1200));
        assert_eq!(store.progress_count(user_id).unwrap(), 1);
    }

    #[tokio::test]
    async fn favorites_are_idempotent_and_newest_first() {
        let store = MemoryStore::new();
        let user_id = Uuid::new_v4();
        let (first, second) = (content(), content());
        let now = Utc::now();

        let add = |content_id, added_at| InsertFavoriteEntity {
            user_id,
            content_id,
            added_at,
        };

        assert!(store.add_favorite(add(first.id, now)).await.unwrap());
        assert!(!store.add_favorite(add(first.id, now)).await.unwrap());
        assert!(
            store
                .add_favorite(add(second.id, now + Duration::seconds(1)))
                .await
                .unwrap()
        );
        assert_eq!(store.favorite_count(user_id).unwrap(), 2);

        assert_eq!(
            store.list_content_ids(user_id).await.unwrap(),
            vec![second.id, first.id]
        );

        assert!(store.remove_favorite(user_id, first.id).await.unwrap());
        assert!(!store.remove_favorite(user_id, first.id).await.unwrap());
        assert!(!store.is_favorite(user_id, first.id).await.unwrap());
    }

    #[tokio::test]
    async fn list_by_ids_skips_missing_content() {
        let store = MemoryStore::new();
        let (first, second) = (content(), content());
        store.insert_content(first.clone()).unwrap();
        store.insert_content(second.clone()).unwrap();

        let listed = store
            .list_by_ids(vec![second.id, Uuid::new_v4(), first.id])
            .await
            .unwrap();
        assert_eq!(listed, vec![second, first]);
    }

    fn plan(name: &str, price_minor: i32, is_active: bool) -> PlanEntity {
        PlanEntity {
            id: Uuid::new_v4(),
            name: name.to_string(),
            price_minor,
            currency: "THB".to_string(),
            duration_days: 30,
            quality: "hd".to_string(),
            features: Vec::new(),
            is_active,
        }
    }

    #[tokio::test]
    async fn only_purchasable_plans_are_offered() {
        let store = MemoryStore::new();
        let premium = plan("Premium", 29900, true);
        let basic = plan("Basic", 9900, true);
        let free = plan("Free", 0, true);
        let retired = plan("Legacy", 4900, false);
        for entry in [&premium, &basic, &free, &retired] {
            store.insert_plan(entry.clone()).unwrap();
        }

        let listed = store.list_active_plans().await.unwrap();
        assert_eq!(listed, vec![basic.clone(), premium]);

        assert_eq!(
            store.find_active_plan_by_id(basic.id).await.unwrap(),
            Some(basic)
        );
        assert_eq!(store.find_active_plan_by_id(free.id).await.unwrap(), None);
        assert_eq!(store.find_active_plan_by_id(retired.id).await.unwrap(), None);
        assert!(
            PlanRepository::find_by_id(&store, free.id)
                .await
                .unwrap()
                .is_some()
        );
    }
}
