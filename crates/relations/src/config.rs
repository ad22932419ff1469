//! Database configuration
//!
//! Connection settings for the pool relations execute against. Values come
//! from code or from `DATABASE_*` environment variables.

use std::sync::Arc;

use crate::backends::{DatabaseBackendRegistry, DatabasePool, DatabasePoolConfig};
use crate::error::{ModelError, ModelResult};

/// Environment variable holding the connection URL
pub const DATABASE_URL_ENV: &str = "DATABASE_URL";
/// Environment variable overriding the pool's maximum size
pub const DATABASE_MAX_CONNECTIONS_ENV: &str = "DATABASE_MAX_CONNECTIONS";
/// Environment variable overriding the pool's minimum size
pub const DATABASE_MIN_CONNECTIONS_ENV: &str = "DATABASE_MIN_CONNECTIONS";
/// Environment variable overriding the acquire timeout, in seconds
pub const DATABASE_ACQUIRE_TIMEOUT_ENV: &str = "DATABASE_ACQUIRE_TIMEOUT";

/// Connection URL plus pool settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseConfig {
    pub url: String,
    pub pool: DatabasePoolConfig,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "sqlite::memory:".to_string(),
            pool: DatabasePoolConfig::default(),
        }
    }
}

impl DatabaseConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            pool: DatabasePoolConfig::default(),
        }
    }

    pub fn with_pool(mut self, pool: DatabasePoolConfig) -> Self {
        self.pool = pool;
        self
    }

    /// Load configuration from the process environment.
    ///
    /// `DATABASE_URL` is required; the pool variables are optional and fall
    /// back to [`DatabasePoolConfig::default`].
    pub fn from_env() -> ModelResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> ModelResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let url = lookup(DATABASE_URL_ENV)
            .filter(|url| !url.trim().is_empty())
            .ok_or_else(|| ModelError::Configuration(format!("{} is not set", DATABASE_URL_ENV)))?;

        let mut pool = DatabasePoolConfig::default();
        if let Some(max) = parse_var(&lookup, DATABASE_MAX_CONNECTIONS_ENV)? {
            pool.max_connections = max;
        }
        if let Some(min) = parse_var(&lookup, DATABASE_MIN_CONNECTIONS_ENV)? {
            pool.min_connections = min;
        }
        if let Some(timeout) = parse_var(&lookup, DATABASE_ACQUIRE_TIMEOUT_ENV)? {
            pool.acquire_timeout_seconds = timeout;
        }

        let config = Self { url, pool };
        config.validate()?;
        Ok(config)
    }

    /// Check pool bounds
    pub fn validate(&self) -> ModelResult<()> {
        if self.pool.max_connections == 0 {
            return Err(ModelError::Configuration("max_connections must be greater than zero".to_string()));
        }
        if self.pool.min_connections > self.pool.max_connections {
            return Err(ModelError::Configuration(format!(
                "min_connections ({}) exceeds max_connections ({})",
                self.pool.min_connections, self.pool.max_connections
            )));
        }
        Ok(())
    }
}

fn parse_var<F, T>(lookup: &F, key: &str) -> ModelResult<Option<T>>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|e| ModelError::Configuration(format!("Invalid value for {}: {}", key, e))),
        None => Ok(None),
    }
}

/// Create a pool for `config` using the built-in backends
pub async fn connect(config: &DatabaseConfig) -> ModelResult<Arc<dyn DatabasePool>> {
    config.validate()?;
    tracing::debug!("Connecting to database with config: max={}, min={}, timeout={}s",
        config.pool.max_connections, config.pool.min_connections, config.pool.acquire_timeout_seconds);

    DatabaseBackendRegistry::with_defaults()
        .create_pool(&config.url, config.pool.clone())
        .await
}
