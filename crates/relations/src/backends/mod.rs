//! Database Backend Abstractions
//!
//! Relations execute through these traits so the same constraint logic runs
//! against PostgreSQL in production and SQLite in tests.

pub mod core;
pub mod postgres;
pub mod registry;
pub mod sqlite;
pub mod value;

pub use self::core::*;
pub use postgres::{PostgresBackend, PostgresPool};
pub use registry::{DatabaseBackend, DatabaseBackendRegistry, DatabaseBackendType, DatabasePoolConfig};
pub use sqlite::{SqliteBackend, SqlitePool};
pub use value::DatabaseValue;
