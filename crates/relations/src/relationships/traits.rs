//! Relationship Traits - Core contract shared by every relationship kind

use std::fmt;

use async_trait::async_trait;

use crate::backends::{DatabasePool, DatabaseValue, SqlDialect};
use crate::error::{ModelResult, RelationshipError};
use crate::model::Model;
use crate::query::QueryBuilder;

/// The closed set of relationship kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RelationshipType {
    /// Foreign key lives on the parent and points at the related row
    BelongsTo,
    /// Foreign key lives on the single related row
    HasOne,
    /// Foreign key lives on each of the related rows
    HasMany,
}

impl RelationshipType {
    /// Whether resolution yields a collection
    pub fn is_collection(&self) -> bool {
        matches!(self, RelationshipType::HasMany)
    }
}

impl fmt::Display for RelationshipType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RelationshipType::BelongsTo => write!(f, "belongs_to"),
            RelationshipType::HasOne => write!(f, "has_one"),
            RelationshipType::HasMany => write!(f, "has_many"),
        }
    }
}

/// Relationship metadata, available without resolving the relation.
///
/// For `BelongsTo`, `local_key` holds the owner key: the column on the
/// related table that `foreign_key` on the parent points at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelationshipMeta {
    pub relationship_type: RelationshipType,
    pub foreign_key: String,
    pub local_key: String,
    pub related_table: String,
}

impl RelationshipMeta {
    pub fn new(relationship_type: RelationshipType, foreign_key: &str, local_key: &str, related_table: &str) -> Self {
        Self {
            relationship_type,
            foreign_key: foreign_key.to_string(),
            local_key: local_key.to_string(),
            related_table: related_table.to_string(),
        }
    }

    /// Column read from the parent record
    pub fn parent_column(&self) -> &str {
        match self.relationship_type {
            RelationshipType::BelongsTo => &self.foreign_key,
            RelationshipType::HasOne | RelationshipType::HasMany => &self.local_key,
        }
    }

    /// Column constrained on the related table
    pub fn related_column(&self) -> &str {
        match self.relationship_type {
            RelationshipType::BelongsTo => &self.local_key,
            RelationshipType::HasOne | RelationshipType::HasMany => &self.foreign_key,
        }
    }

    /// Reject empty key or table names
    pub fn validate(&self) -> Result<(), RelationshipError> {
        for (name, value) in [
            ("foreign key", &self.foreign_key),
            ("local key", &self.local_key),
            ("related table", &self.related_table),
        ] {
            if value.trim().is_empty() {
                return Err(RelationshipError::InvalidConfiguration(format!(
                    "{} relationship has an empty {}",
                    self.relationship_type, name
                )));
            }
        }
        Ok(())
    }
}

/// Lifecycle of a relation before it is consumed by resolution
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelationState {
    /// Query is still unconstrained
    Created,
    /// Parent constraint has been applied (or found unresolvable)
    Constrained,
}

/// Core relationship contract.
///
/// Resolution methods take `self`: a relation is resolved at most once, and
/// each association access builds a fresh one.
#[async_trait]
pub trait Relation: Sized + Send {
    type Parent: Model;
    type Related: Model;
    /// `Option<Related>` or `Vec<Related>`
    type Output: Send;

    /// Get relationship metadata
    fn meta(&self) -> &RelationshipMeta;

    /// Get the parent model instance
    fn parent(&self) -> &Self::Parent;

    /// Query as it stands, constrained or not
    fn query(&self) -> &QueryBuilder<Self::Related>;

    /// Mutable access to the underlying query
    fn query_mut(&mut self) -> &mut QueryBuilder<Self::Related>;

    /// Current lifecycle state
    fn state(&self) -> RelationState;

    /// Value of the parent's key column, `None` when unset or NULL
    fn parent_key(&self) -> Option<DatabaseValue> {
        self.parent().get_attribute(self.meta().parent_column())
    }

    /// Scope the query to records related to the parent. Only the first call
    /// has an effect.
    fn add_constraints(&mut self);

    /// Apply constraints and hand over the query. `None` means the parent's
    /// key is NULL and nothing can match.
    fn into_query(self) -> Option<QueryBuilder<Self::Related>>;

    /// Resolve the relation according to its cardinality
    async fn get_results(self, pool: &dyn DatabasePool) -> ModelResult<Self::Output>;

    /// Merge extra constraints into the relation's query
    fn constrain<F>(mut self, f: F) -> Self
    where
        F: FnOnce(QueryBuilder<Self::Related>) -> QueryBuilder<Self::Related>,
    {
        let query = std::mem::take(self.query_mut());
        *self.query_mut() = f(query);
        self
    }

    /// First related record
    async fn first(self, pool: &dyn DatabasePool) -> ModelResult<Option<Self::Related>> {
        match self.into_query() {
            Some(query) => query.first(pool).await,
            None => Ok(None),
        }
    }

    /// All related records
    async fn get(self, pool: &dyn DatabasePool) -> ModelResult<Vec<Self::Related>> {
        match self.into_query() {
            Some(query) => query.get(pool).await,
            None => Ok(Vec::new()),
        }
    }

    /// Number of related records
    async fn count(self, pool: &dyn DatabasePool) -> ModelResult<i64> {
        match self.into_query() {
            Some(query) => query.count(pool).await,
            None => Ok(0),
        }
    }

    /// Whether any related record exists
    async fn exists(self, pool: &dyn DatabasePool) -> ModelResult<bool> {
        match self.into_query() {
            Some(query) => query.exists(pool).await,
            None => Ok(false),
        }
    }

    /// SQL the relation would run, without executing it
    fn to_sql(&mut self, dialect: SqlDialect) -> Option<(String, Vec<DatabaseValue>)> {
        self.add_constraints();
        self.parent_key()?;
        Some(self.query().to_sql_with_params(dialect))
    }
}
