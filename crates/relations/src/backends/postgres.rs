//! PostgreSQL Backend Implementation
//!
//! sqlx-backed pool. Parameters bind with their native PostgreSQL types and
//! columns decode by their declared type name.

use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};
use serde_json::Value as JsonValue;
use sqlx::postgres::{PgArguments, PgRow};
use sqlx::query::Query;
use sqlx::types::Decimal;
use sqlx::{Column, Pool, Postgres, Row as SqlxRow, TypeInfo, ValueRef};

use crate::error::{OrmError, OrmResult};
use super::core::{DatabasePool, DatabasePoolStats, DatabaseRow, SqlDialect};
use super::registry::{DatabaseBackend, DatabaseBackendType, DatabasePoolConfig};
use super::value::DatabaseValue;

#[derive(Debug, Default)]
pub struct PostgresBackend;

impl PostgresBackend {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl DatabaseBackend for PostgresBackend {
    async fn create_pool(&self, database_url: &str, config: DatabasePoolConfig) -> OrmResult<Arc<dyn DatabasePool>> {
        let pool = config
            .pool_options::<Postgres>()
            .connect(database_url)
            .await
            .map_err(|e| OrmError::Connection(format!("Failed to create PostgreSQL pool: {}", e)))?;

        tracing::info!("PostgreSQL pool created with {} max connections", config.max_connections);
        Ok(Arc::new(PostgresPool::new(pool)))
    }

    fn sql_dialect(&self) -> SqlDialect {
        SqlDialect::PostgreSQL
    }

    fn backend_type(&self) -> DatabaseBackendType {
        DatabaseBackendType::PostgreSQL
    }

    fn validate_database_url(&self, url: &str) -> OrmResult<()> {
        let parsed = url::Url::parse(url).map_err(|e| OrmError::Connection(format!("Invalid database URL: {}", e)))?;

        if !matches!(parsed.scheme(), "postgres" | "postgresql") {
            return Err(OrmError::Connection(format!("Invalid PostgreSQL URL scheme: {}", parsed.scheme())));
        }
        if parsed.host_str().map_or(true, str::is_empty) {
            return Err(OrmError::Connection("Missing host in database URL".to_string()));
        }
        if parsed.path().trim_start_matches('/').is_empty() {
            return Err(OrmError::Connection("Missing database name in URL".to_string()));
        }
        Ok(())
    }
}

pub struct PostgresPool {
    pool: Pool<Postgres>,
}

impl PostgresPool {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl DatabasePool for PostgresPool {
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

        Ok(rows.into_iter().map(|row| Box::new(PostgresRow(row)) as Box<dyn DatabaseRow>).collect())
    }

    async fn fetch_optional(&self, sql: &str, params: &[DatabaseValue]) -> OrmResult<Option<Box<dyn DatabaseRow>>> {
        let row = bind_all(sql, params)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| OrmError::Query(format!("Query fetch failed: {}", e)))?;

        Ok(row.map(|row| Box::new(PostgresRow(row)) as Box<dyn DatabaseRow>))
    }

    fn sql_dialect(&self) -> SqlDialect {
        SqlDialect::PostgreSQL
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

struct PostgresRow(PgRow);

impl DatabaseRow for PostgresRow {
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

fn bind_all<'q>(sql: &'q str, params: &[DatabaseValue]) -> Query<'q, Postgres, PgArguments> {
    params.iter().fold(sqlx::query(sql), |query, value| match value {
        DatabaseValue::Null => query.bind(Option::<String>::None),
        DatabaseValue::Bool(b) => query.bind(*b),
        DatabaseValue::Int32(i) => query.bind(*i),
        DatabaseValue::Int64(i) => query.bind(*i),
        DatabaseValue::Float64(f) => query.bind(*f),
        DatabaseValue::String(s) => query.bind(s.clone()),
        DatabaseValue::Bytes(b) => query.bind(b.clone()),
        DatabaseValue::Uuid(u) => query.bind(*u),
        DatabaseValue::DateTime(dt) => query.bind(*dt),
        DatabaseValue::Date(d) => query.bind(*d),
        DatabaseValue::Time(t) => query.bind(*t),
        DatabaseValue::Json(j) => query.bind(j.clone()),
    })
}

/// How a column is decoded, keyed by its PostgreSQL type name
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PgColumnKind {
    Bool,
    SmallInt,
    Int,
    BigInt,
    Real,
    Double,
    Numeric,
    Bytes,
    Uuid,
    TimestampTz,
    Timestamp,
    Date,
    Time,
    Json,
    Text,
}

impl PgColumnKind {
    fn from_type_name(name: &str) -> Self {
        match name {
            "BOOL" => Self::Bool,
            "INT2" => Self::SmallInt,
            "INT4" => Self::Int,
            "INT8" => Self::BigInt,
            "FLOAT4" => Self::Real,
            "FLOAT8" => Self::Double,
            "NUMERIC" => Self::Numeric,
            "BYTEA" => Self::Bytes,
            "UUID" => Self::Uuid,
            "TIMESTAMPTZ" => Self::TimestampTz,
            "TIMESTAMP" => Self::Timestamp,
            "DATE" => Self::Date,
            "TIME" => Self::Time,
            "JSON" | "JSONB" => Self::Json,
            _ => Self::Text,
        }
    }
}

fn decode_column(row: &PgRow, index: usize) -> OrmResult<DatabaseValue> {
    let type_name = {
        let raw = row.try_get_raw(index)?;
        if raw.is_null() {
            return Ok(DatabaseValue::Null);
        }
        raw.type_info().name().to_string()
    };

    let value = match PgColumnKind::from_type_name(&type_name) {
        PgColumnKind::Bool => DatabaseValue::Bool(row.try_get(index)?),
        PgColumnKind::SmallInt => DatabaseValue::Int32(i32::from(row.try_get::<i16, _>(index)?)),
        PgColumnKind::Int => DatabaseValue::Int32(row.try_get(index)?),
        PgColumnKind::BigInt => DatabaseValue::Int64(row.try_get(index)?),
        PgColumnKind::Real => DatabaseValue::Float64(f64::from(row.try_get::<f32, _>(index)?)),
        PgColumnKind::Double => DatabaseValue::Float64(row.try_get(index)?),
        // exact digits, not a lossy float
        PgColumnKind::Numeric => DatabaseValue::String(row.try_get::<Decimal, _>(index)?.to_string()),
        PgColumnKind::Bytes => DatabaseValue::Bytes(row.try_get(index)?),
        PgColumnKind::Uuid => DatabaseValue::Uuid(row.try_get(index)?),
        PgColumnKind::TimestampTz => DatabaseValue::DateTime(row.try_get(index)?),
        // zone-less timestamps are read as UTC
        PgColumnKind::Timestamp => {
            DatabaseValue::DateTime(Utc.from_utc_datetime(&row.try_get::<NaiveDateTime, _>(index)?))
        }
        PgColumnKind::Date => DatabaseValue::Date(row.try_get::<NaiveDate, _>(index)?),
        PgColumnKind::Time => DatabaseValue::Time(row.try_get::<NaiveTime, _>(index)?),
        PgColumnKind::Json => DatabaseValue::Json(row.try_get::<JsonValue, _>(index)?),
        PgColumnKind::Text => DatabaseValue::String(row.try_get(index).map_err(|e| {
            OrmError::Query(format!("Cannot decode column of type '{}' as text: {}", type_name, e))
        })?),
    };

    Ok(value)
}
