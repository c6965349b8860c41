use crate::domain::repositories::{
    contents::ContentRepository, favorites::FavoriteRepository, payments::PaymentRepository,
    plans::PlanRepository, subscriptions::SubscriptionRepository, users::UserRepository,
    watch_progress::WatchProgressRepository,
};

/// Every storage capability the service needs, behind one bound. Implemented by
/// the Postgres store and the in-memory store; the backend is picked at startup.
pub trait EntitlementStore:
    UserRepository
    + PlanRepository
    + SubscriptionRepository
    + PaymentRepository
    + ContentRepository
    + WatchProgressRepository
    + FavoriteRepository
    + Send
    + Sync
{
}

impl<T> EntitlementStore for T where
    T: UserRepository
        + PlanRepository
        + SubscriptionRepository
        + PaymentRepository
        + ContentRepository
        + WatchProgressRepository
        + FavoriteRepository
        + Send
        + Sync
{
}
