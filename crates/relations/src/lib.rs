//! # elif-relations: Relationship resolution for elif.rs models
//!
//! Resolves belongs-to, has-one and has-many associations for a loaded
//! parent record. A relation borrows its parent, scopes a query for the
//! related table with the relationship's key constraint and executes it
//! against a `DatabasePool`.
//!
//! ```ignore
//! use elif_relations::{HasRelations, Relation};
//!
//! let posts = user.has_many::<Post>("user_id").get_results(pool.as_ref()).await?;
//! let author = post.belongs_to::<User>("user_id").get_results(pool.as_ref()).await?;
//! ```

pub mod backends;
pub mod config;
pub mod error;
pub mod model;
pub mod query;
pub mod relationships;

// Re-export core traits and types
pub use backends::{
    DatabaseBackend, DatabaseBackendRegistry, DatabaseBackendType, DatabasePool, DatabasePoolConfig,
    DatabasePoolStats, DatabaseRow, DatabaseValue, SqlDialect,
};
pub use config::{connect, DatabaseConfig};
pub use error::*;
pub use model::Model;
pub use query::{Operand, OrderDirection, QueryBuilder, QueryOperator, WhereCondition};
pub use relationships::*;
