use anyhow::{Context, Result};
use backend::axum_http::http_serve;
use backend::config::{config_loader, config_model::StorageBackend};
use crates::infra::{
    db::{postgres::postgres_connection, repositories::PostgresStore},
    memory::MemoryStore,
};
use std::sync::Arc;
use tracing::{error, info, warn};

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        error!("Backend exited with error: {:#}", error);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    dotenvy::dotenv().ok();
    crates::observability::init_observability("backend")?;

    let dotenvy_env = Arc::new(config_loader::load()?);
    info!(storage = ?dotenvy_env.storage, "ENV has been loaded");

    match dotenvy_env.storage {
        StorageBackend::Postgres => {
            let database = dotenvy_env
                .database
                .as_ref()
                .context("DATABASE_URL is required for the postgres backend")?;
            let postgres_pool = postgres_connection::establish_connection(&database.url)?;
            info!("Postgres connection has been established");

            let store = PostgresStore::new(Arc::new(postgres_pool));
            http_serve::start(Arc::clone(&dotenvy_env), Arc::new(store)).await?;
        }
        StorageBackend::Memory => {
            warn!("Using the in-memory store; nothing will persist across restarts");
            let store = MemoryStore::new();

            if dotenvy_env.demo.enabled {
                let seed = store.seed_demo(&dotenvy_env.demo.user_ids)?;
                info!(
                    plans = seed.plans,
                    contents = seed.contents,
                    users = seed.users,
                    "Demo data has been loaded into the in-memory store"
                );
            } else {
                warn!("In-memory store starts empty; set MEMORY_SEED_DEMO=true to load demo data");
            }

            http_serve::start(Arc::clone(&dotenvy_env), Arc::new(store)).await?;
        }
    }

    Ok(())
}
