//! Backend selection by URL scheme, and pool settings shared by every backend

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use crate::error::{OrmError, OrmResult};
use super::core::{DatabasePool, SqlDialect};
use super::postgres::PostgresBackend;
use super::sqlite::SqliteBackend;

/// Supported database engines
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DatabaseBackendType {
    PostgreSQL,
    SQLite,
}

impl DatabaseBackendType {
    /// Engine named by a connection URL's scheme
    pub fn from_url(url: &str) -> OrmResult<Self> {
        match url.split_once(':').map(|(scheme, _)| scheme) {
            Some("postgres" | "postgresql") => Ok(DatabaseBackendType::PostgreSQL),
            Some("sqlite") => Ok(DatabaseBackendType::SQLite),
            _ => Err(OrmError::Connection(format!("Unable to detect database backend from URL: {}", url))),
        }
    }
}

impl fmt::Display for DatabaseBackendType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DatabaseBackendType::PostgreSQL => write!(f, "postgresql"),
            DatabaseBackendType::SQLite => write!(f, "sqlite"),
        }
    }
}

impl FromStr for DatabaseBackendType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "postgresql" | "postgres" => Ok(DatabaseBackendType::PostgreSQL),
            "sqlite" => Ok(DatabaseBackendType::SQLite),
            _ => Err(format!("Unsupported database backend: {}", s)),
        }
    }
}

/// A database engine able to open pools
#[async_trait]
pub trait DatabaseBackend: Send + Sync {
    async fn create_pool(&self, database_url: &str, config: DatabasePoolConfig) -> OrmResult<Arc<dyn DatabasePool>>;

    fn sql_dialect(&self) -> SqlDialect;

    fn backend_type(&self) -> DatabaseBackendType;

    /// Reject URLs this backend cannot connect to before any I/O happens
    fn validate_database_url(&self, url: &str) -> OrmResult<()>;
}

/// Connection pool sizing and timeouts
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabasePoolConfig {
    pub max_connections: u32,
    pub min_connections: u32,
    pub acquire_timeout_seconds: u64,
    pub idle_timeout_seconds: Option<u64>,
    pub max_lifetime_seconds: Option<u64>,
    pub test_before_acquire: bool,
}

impl Default for DatabasePoolConfig {
    fn default() -> Self {
        Self {
            max_connections: 10,
            min_connections: 1,
            acquire_timeout_seconds: 30,
            idle_timeout_seconds: Some(600),
            max_lifetime_seconds: Some(1800),
            test_before_acquire: true,
        }
    }
}

impl DatabasePoolConfig {
    /// sqlx pool options carrying these settings
    pub(crate) fn pool_options<DB: sqlx::Database>(&self) -> sqlx::pool::PoolOptions<DB> {
        sqlx::pool::PoolOptions::<DB>::new()
            .max_connections(self.max_connections)
            .min_connections(self.min_connections)
            .acquire_timeout(Duration::from_secs(self.acquire_timeout_seconds))
            .idle_timeout(self.idle_timeout_seconds.map(Duration::from_secs))
            .max_lifetime(self.max_lifetime_seconds.map(Duration::from_secs))
            .test_before_acquire(self.test_before_acquire)
    }
}

/// Backends keyed by engine; pools are opened through the one matching the URL
pub struct DatabaseBackendRegistry {
    backends: HashMap<DatabaseBackendType, Arc<dyn DatabaseBackend>>,
}

impl DatabaseBackendRegistry {
    /// Registry without any backend
    pub fn new() -> Self {
        Self {
            backends: HashMap::new(),
        }
    }

    /// Registry with the PostgreSQL and SQLite backends installed
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(PostgresBackend::new()));
        registry.register(Arc::new(SqliteBackend::new()));
        registry
    }

    /// Install `backend`, replacing any backend of the same type
    pub fn register(&mut self, backend: Arc<dyn DatabaseBackend>) {
        self.backends.insert(backend.backend_type(), backend);
    }

    pub fn get(&self, backend_type: DatabaseBackendType) -> Option<Arc<dyn DatabaseBackend>> {
        self.backends.get(&backend_type).cloned()
    }

    /// Open a pool with the backend the URL scheme names
    pub async fn create_pool(&self, database_url: &str, config: DatabasePoolConfig) -> OrmResult<Arc<dyn DatabasePool>> {
        let backend_type = DatabaseBackendType::from_url(database_url)?;
        let backend = self
            .get(backend_type)
            .ok_or_else(|| OrmError::Connection(format!("No backend registered for {}", backend_type)))?;

        backend.validate_database_url(database_url)?;
        backend.create_pool(database_url, config).await
    }

    pub fn registered_backends(&self) -> Vec<DatabaseBackendType> {
        self.backends.keys().copied().collect()
    }
}

impl Default for DatabaseBackendRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}
