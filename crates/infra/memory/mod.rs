//! Process-local `EntitlementStore` used by tests and local runs.
//!
//! A single mutex guards every table, so each repository call is one atomic
//! unit, matching the transactions of the Postgres store.

mod demo;
mod repositories;

pub use demo::DemoSeed;

use anyhow::{Result, anyhow};
use std::{
    collections::HashMap,
    sync::{Mutex, MutexGuard},
};
use uuid::Uuid;

use crate::domain::entities::{
    contents::ContentEntity, favorites::FavoriteEntity, payments::PaymentEntity,
    plans::PlanEntity, subscriptions::SubscriptionEntity, users::UserEntity,
    watch_progress::WatchProgressEntity,
};

#[derive(Default)]
pub struct MemoryStore {
    state: Mutex<MemoryState>,
}

#[derive(Default)]
struct MemoryState {
    users: HashMap<Uuid, UserEntity>,
    plans: HashMap<Uuid, PlanEntity>,
    subscriptions: HashMap<Uuid, SubscriptionEntity>,
    payments: HashMap<Uuid, PaymentEntity>,
    contents: HashMap<Uuid, ContentEntity>,
    watch_progress: HashMap<(Uuid, Uuid), WatchProgressEntity>,
    favorites: HashMap<(Uuid, Uuid), FavoriteEntity>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, MemoryState>> {
        self.state
            .lock()
            .map_err(|_| anyhow!("memory store lock poisoned"))
    }

    // Users, plans and catalog entries are owned by other subsystems; these
    // stand in for their writes.

    pub fn insert_user(&self, user: UserEntity) -> Result<()> {
        self.lock()?.users.insert(user.id, user);
        Ok(())
    }

    pub fn insert_plan(&self, plan: PlanEntity) -> Result<()> {
        self.lock()?.plans.insert(plan.id, plan);
        Ok(())
    }

    pub fn insert_content(&self, content: ContentEntity) -> Result<()> {
        self.lock()?.contents.insert(content.id, content);
        Ok(())
    }

    pub fn favorite_count(&self, user_id: Uuid) -> Result<usize> {
        Ok(self
            .lock()?
            .favorites
            .keys()
            .filter(|(owner, _)| *owner == user_id)
            .count())
    }

    pub fn progress_count(&self, user_id: Uuid) -> Result<usize> {
        Ok(self
            .lock()?
            .watch_progress
            .keys()
            .filter(|(owner, _)| *owner == user_id)
            .count())
    }
}
