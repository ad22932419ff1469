//! SQLite Backend Implementation
//!
//! Mirrors the PostgreSQL backend on top of sqlx's SQLite driver. In-memory
//! databases are pinned to a single long-lived connection because every new
//! SQLite connection to `:memory:` opens a fresh, empty database.

use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use sqlx::pool::PoolOptions;
use sqlx::query::Query;
use sqlx::sqlite::{SqliteArguments, SqliteRow};
use sqlx::{Column, Pool, Row as SqlxRow, Sqlite, TypeInfo, ValueRef};

use crate::error::{OrmError, OrmResult};
use super::core::{DatabasePool, DatabasePoolStats, DatabaseRow, SqlDialect};
use super::registry::{DatabaseBackend, DatabaseBackendType, DatabasePoolConfig};
use super::value::DatabaseValue;

const MEMORY_URL: &str = "sqlite::memory:";

#[derive(Debug, Default)]
pub struct SqliteBackend;

impl SqliteBackend {
    pub fn new() -> Self {
        Self
    }

    fn is_in_memory(url: &str) -> bool {
        url.contains(":memory:") || url.contains("mode=memory")
    }
}

/// One connection that is never reaped, so the database outlives idle periods
fn single_connection(options: PoolOptions<Sqlite>) -> PoolOptions<Sqlite> {
    options
        .max_connections(1)
        .min_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
}

#[async_trait]
impl DatabaseBackend for SqliteBackend {
    async fn create_pool(&self, database_url: &str, config: DatabasePoolConfig) -> OrmResult<Arc<dyn DatabasePool>> {
        let in_memory = Self::is_in_memory(database_url);
        let mut options = config.pool_options::<Sqlite>();
        if in_memory {
            options = single_connection(options);
        }

        let pool = options
            .connect(database_url)
            .await
            .map_err(|e| OrmError::Connection(format!("Failed to create SQLite pool: {}", e)))?;

        tracing::debug!(in_memory, "SQLite pool created");
        Ok(Arc::new(SqlitePool::new(pool)))
    }

    fn sql_dialect(&self) -> SqlDialect {
        SqlDialect::SQLite
    }

    fn backend_type(&self) -> DatabaseBackendType {
        DatabaseBackendType::SQLite
    }

    fn validate_database_url(&self, url: &str) -> OrmResult<()> {
        if !url.starts_with("sqlite:") {
            return Err(OrmError::Connection("Invalid SQLite URL scheme".to_string()));
        }
        Ok(())
    }
}

pub struct SqlitePool {
    pool: Pool<Sqlite>,
}

impl SqlitePool {
    pub fn new(pool: Pool<Sqlite>) -> Self {
        Self { pool }
    }

    /// Fresh, empty in-memory database
    pub async fn in_memory() -> OrmResult<Self> {
        let pool = single_connection(PoolOptions::new())
            .connect(MEMORY_URL)
            .await
            .map_err(|e| OrmError::Connection(format!("Failed to open in-memory SQLite database: {}", e)))?;

        Ok(Self::new(pool))
    }
}

#[async_trait]
impl DatabasePool for SqlitePool {
    async fn execute(&self, sql: &str, params: &[DatabaseValue]) -> OrmResult<u64> {
        let result = bind_all(sql, params)
            .execute(&self.pool)
            .await
            .map_err(|e| OrmError::Query(format!("Query execution failed: {}", e)))?;

        Ok(result.rows_affected())
    }

    async fn fetch_all(&self, sql: &str, params: &[DatabaseValue]) -> OrmResult<Vec<Box<dyn DatabaseRow>>> {
        let rows = bind_all(sql, params)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| OrmError::Query(format!("Query fetch failed: {}", e)))?;

        Ok(rows.into_iter().map(|row| Box::new(SqliteRowAdapter(row)) as Box<dyn DatabaseRow>).collect())
    }

    async fn fetch_optional(&self, sql: &str, params: &[DatabaseValue]) -> OrmResult<Option<Box<dyn DatabaseRow>>> {
        let row = bind_all(sql, params)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| OrmError::Query(format!("Query fetch failed: {}", e)))?;

        Ok(row.map(|row| Box::new(SqliteRowAdapter(row)) as Box<dyn DatabaseRow>))
    }

    fn sql_dialect(&self) -> SqlDialect {
        SqlDialect::SQLite
    }

    async fn close(&self) -> OrmResult<()> {
        self.pool.close().await;
        Ok(())
    }

    fn stats(&self) -> DatabasePoolStats {
        DatabasePoolStats::of(&self.pool)
    }

    async fn health_check(&self) -> OrmResult<Duration> {
        let start = Instant::now();
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(|e| OrmError::Connection(format!("Health check failed: {}", e)))?;

        Ok(start.elapsed())
    }
}

struct SqliteRowAdapter(SqliteRow);

impl DatabaseRow for SqliteRowAdapter {
    fn get_by_index(&self, index: usize) -> OrmResult<DatabaseValue> {
        decode_column(&self.0, index)
    }

    fn get_by_name(&self, name: &str) -> OrmResult<DatabaseValue> {
        let index = self
            .0
            .columns()
            .iter()
            .position(|col| col.name() == name)
            .ok_or_else(|| OrmError::ColumnNotFound(name.to_string()))?;

        decode_column(&self.0, index)
    }

    fn column_names(&self) -> Vec<String> {
        self.0.columns().iter().map(|col| col.name().to_string()).collect()
    }
}

fn bind_all<'q>(sql: &'q str, params: &[DatabaseValue]) -> Query<'q, Sqlite, SqliteArguments<'q>> {
    params.iter().fold(sqlx::query(sql), |query, value| match value {
        DatabaseValue::Null => query.bind(Option::<String>::None),
        DatabaseValue::Bool(b) => query.bind(*b),
        DatabaseValue::Int32(i) => query.bind(*i),
        DatabaseValue::Int64(i) => query.bind(*i),
        DatabaseValue::Float64(f) => query.bind(*f),
        DatabaseValue::String(s) => query.bind(s.clone()),
        DatabaseValue::Bytes(b) => query.bind(b.clone()),
        // no native UUID, timestamp or JSON types; text compares equal to TEXT columns
        DatabaseValue::Uuid(u) => query.bind(u.to_string()),
        DatabaseValue::DateTime(dt) => query.bind(dt.to_rfc3339()),
        DatabaseValue::Date(d) => query.bind(d.to_string()),
        DatabaseValue::Time(t) => query.bind(t.to_string()),
        DatabaseValue::Json(j) => query.bind(j.to_string()),
    })
}

/// Decode by storage class. Booleans are stored as INTEGER, so only the
/// declared column type tells them apart.
fn decode_column(row: &SqliteRow, index: usize) -> OrmResult<DatabaseValue> {
    let storage_class = {
        let raw = row.try_get_raw(index)?;
        if raw.is_null() {
            return Ok(DatabaseValue::Null);
        }
        raw.type_info().name().to_string()
    };
    let declared_bool = row
        .columns()
        .get(index)
        .map_or(false, |column| column.type_info().name() == "BOOLEAN");

    let value = match storage_class.as_str() {
        "INTEGER" if declared_bool => DatabaseValue::Bool(row.try_get(index)?),
        "INTEGER" => DatabaseValue::Int64(row.try_get(index)?),
        "BOOLEAN" => DatabaseValue::Bool(row.try_get(index)?),
        "REAL" => DatabaseValue::Float64(row.try_get(index)?),
        "BLOB" => DatabaseValue::Bytes(row.try_get(index)?),
        _ => DatabaseValue::String(row.try_get(index)?),
    };

    Ok(value)
}
