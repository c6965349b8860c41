use anyhow::{Context, Result, anyhow};

use uuid::Uuid;

use super::config_model::{Auth, BackendServer, Database, DemoData, DotEnvyConfig, StorageBackend};

pub fn load() -> Result<DotEnvyConfig> {
    dotenvy::dotenv().ok();

    let backend_server = BackendServer {
        port: required("SERVER_PORT_BACKEND")?
            .parse()
            .context("SERVER_PORT_BACKEND is invalid")?,
        body_limit: required("SERVER_BODY_LIMIT")?
            .parse()
            .context("SERVER_BODY_LIMIT is invalid")?,
        timeout: required("SERVER_TIMEOUT")?
            .parse()
            .context("SERVER_TIMEOUT is invalid")?,
    };

    let storage = match std::env::var("STORAGE_BACKEND") {
        Ok(raw) if !raw.trim().is_empty() => StorageBackend::from_str(&raw)
            .ok_or_else(|| anyhow!("STORAGE_BACKEND is invalid: {raw}"))?,
        _ => StorageBackend::default(),
    };

    let database = match storage {
        StorageBackend::Postgres => Some(Database {
            url: required("DATABASE_URL")?,
        }),
        StorageBackend::Memory => std::env::var("DATABASE_URL")
            .ok()
            .map(|url| Database { url }),
    };

    let auth = Auth {
        jwt_secret: required("AUTH_JWT_SECRET")?,
    };

    let demo = DemoData {
        enabled: std::env::var("MEMORY_SEED_DEMO")
            .map(|raw| parse_flag(&raw))
            .unwrap_or(false),
        user_ids: match std::env::var("MEMORY_DEMO_USER_IDS") {
            Ok(raw) => parse_user_ids(&raw)?,
            Err(_) => Vec::new(),
        },
    };

    Ok(DotEnvyConfig {
        backend_server,
        database,
        auth,
        storage,
        demo,
    })
}

fn parse_flag(raw: &str) -> bool {
    matches!(
        raw.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

fn parse_user_ids(raw: &str) -> Result<Vec<Uuid>> {
    raw.split(',')
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(|id| {
            Uuid::parse_str(id)
                .with_context(|| format!("MEMORY_DEMO_USER_IDS has an invalid id: {id}"))
        })
        .collect()
}

fn required(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("{key} is invalid"))
}
