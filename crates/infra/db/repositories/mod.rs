pub mod contents;
pub mod favorites;
pub mod payments;
pub mod plans;
pub mod subscriptions;
pub mod users;
pub mod watch_progress;

use std::sync::Arc;

use crate::infra::db::postgres::postgres_connection::PgPoolSquad;

/// Production `EntitlementStore`. Each submodule implements one repository
/// trait against the shared pool.
#[derive(Clone)]
pub struct PostgresStore {
    db_pool: Arc<PgPoolSquad>,
}

impl PostgresStore {
    pub fn new(db_pool: Arc<PgPoolSquad>) -> Self {
        Self { db_pool }
    }
}
