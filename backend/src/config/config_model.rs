use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct DotEnvyConfig {
    pub backend_server: BackendServer,
    pub database: Option<Database>,
    pub auth: Auth,
    pub storage: StorageBackend,
    pub demo: DemoData,
}

#[derive(Debug, Clone)]
pub struct BackendServer {
    pub port: u16,
    /// MiB.
    pub body_limit: u64,
    /// Seconds.
    pub timeout: u64,
}

#[derive(Debug, Clone)]
pub struct Database {
    pub url: String,
}

#[derive(Debug, Clone)]
pub struct Auth {
    pub jwt_secret: String,
}

/// Sample plans, catalog and users loaded into the memory backend at startup.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DemoData {
    pub enabled: bool,
    pub user_ids: Vec<Uuid>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StorageBackend {
    #[default]
    Postgres,
    Memory,
}

impl StorageBackend {
    pub fn from_str(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "postgres" | "postgresql" => Some(StorageBackend::Postgres),
            "memory" | "in-memory" => Some(StorageBackend::Memory),
            _ => None,
        }
    }
}
