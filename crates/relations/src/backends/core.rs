//! Core Database Backend Traits
//!
//! The relation layer never talks to a driver directly. It hands parameterized
//! SQL to a [`DatabasePool`] and turns the returned [`DatabaseRow`]s into
//! models.

use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value as JsonValue;

use crate::error::OrmResult;
use super::value::DatabaseValue;

/// Executes parameterized SQL for one database
#[async_trait]
pub trait DatabasePool: Send + Sync {
    /// Run a statement, returning the number of affected rows
    async fn execute(&self, sql: &str, params: &[DatabaseValue]) -> OrmResult<u64>;

    async fn fetch_all(&self, sql: &str, params: &[DatabaseValue]) -> OrmResult<Vec<Box<dyn DatabaseRow>>>;

    async fn fetch_optional(&self, sql: &str, params: &[DatabaseValue]) -> OrmResult<Option<Box<dyn DatabaseRow>>>;

    /// Dialect generated statements must target
    fn sql_dialect(&self) -> SqlDialect;

    async fn close(&self) -> OrmResult<()>;

    fn stats(&self) -> DatabasePoolStats;

    /// Round-trip time of a trivial query
    async fn health_check(&self) -> OrmResult<Duration>;
}

/// Connection counts at a point in time
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabasePoolStats {
    pub total_connections: u32,
    pub idle_connections: u32,
    pub active_connections: u32,
}

impl DatabasePoolStats {
    pub(crate) fn of<DB: sqlx::Database>(pool: &sqlx::Pool<DB>) -> Self {
        let total = pool.size();
        let idle = u32::try_from(pool.num_idle()).unwrap_or(total);

        Self {
            total_connections: total,
            idle_connections: idle,
            active_connections: total.saturating_sub(idle),
        }
    }
}

/// A result row decoded into [`DatabaseValue`]s
pub trait DatabaseRow: Send + Sync {
    fn get_by_index(&self, index: usize) -> OrmResult<DatabaseValue>;

    /// Fails with `ColumnNotFound` for unknown names
    fn get_by_name(&self, name: &str) -> OrmResult<DatabaseValue>;

    fn column_names(&self) -> Vec<String>;

    /// JSON object keyed by column name, the input to model deserialization
    fn to_json(&self) -> OrmResult<JsonValue> {
        let mut map = serde_json::Map::new();
        for (index, name) in self.column_names().into_iter().enumerate() {
            map.insert(name, self.get_by_index(index)?.to_json());
        }
        Ok(JsonValue::Object(map))
    }
}

/// SQL dialect enumeration for generating database-specific SQL
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SqlDialect {
    PostgreSQL,
    SQLite,
}

impl SqlDialect {
    /// Placeholder for the zero-based parameter `index`
    pub fn parameter_placeholder(&self, index: usize) -> String {
        match self {
            SqlDialect::PostgreSQL => format!("${}", index + 1),
            SqlDialect::SQLite => "?".to_string(),
        }
    }
}
