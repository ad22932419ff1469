//! Type-erased relation over the closed set of relationship kinds
//!
//! Lets a model declare its associations as [`RelationshipMeta`] values and
//! resolve them uniformly, choosing the kind at definition time rather than
//! through a generic parameter.

use crate::backends::{DatabasePool, DatabaseValue, SqlDialect};
use crate::error::{ModelResult, RelationshipError};
use crate::model::Model;
use crate::query::QueryBuilder;

use super::belongs_to::BelongsTo;
use super::has_many::HasMany;
use super::has_one::HasOne;
use super::traits::{Relation, RelationState, RelationshipMeta, RelationshipType};

/// One of the three relationship kinds
#[derive(Debug)]
pub enum AnyRelation<'p, Parent, Related> {
    BelongsTo(BelongsTo<'p, Parent, Related>),
    HasOne(HasOne<'p, Parent, Related>),
    HasMany(HasMany<'p, Parent, Related>),
}

/// Result of resolving an [`AnyRelation`]
#[derive(Debug, Clone, PartialEq)]
pub enum RelationResults<Related> {
    One(Option<Related>),
    Many(Vec<Related>),
}

impl<Related> RelationResults<Related> {
    /// Single-record result, failing for collections
    pub fn into_one(self) -> Result<Option<Related>, RelationshipError> {
        match self {
            RelationResults::One(related) => Ok(related),
            RelationResults::Many(_) => Err(RelationshipError::TypeMismatch {
                expected: "single record".to_string(),
                found: "collection".to_string(),
            }),
        }
    }

    /// Collection result, failing for single-record relations
    pub fn into_many(self) -> Result<Vec<Related>, RelationshipError> {
        match self {
            RelationResults::Many(related) => Ok(related),
            RelationResults::One(_) => Err(RelationshipError::TypeMismatch {
                expected: "collection".to_string(),
                found: "single record".to_string(),
            }),
        }
    }

    /// Flatten either shape into a vector
    pub fn into_vec(self) -> Vec<Related> {
        match self {
            RelationResults::One(related) => related.into_iter().collect(),
            RelationResults::Many(related) => related,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            RelationResults::One(related) => usize::from(related.is_some()),
            RelationResults::Many(related) => related.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<'p, Parent, Related> AnyRelation<'p, Parent, Related>
where
    Parent: Model,
    Related: Model,
{
    /// Build the relation described by `meta` over `query`
    pub fn from_meta(
        query: QueryBuilder<Related>,
        parent: &'p Parent,
        meta: &RelationshipMeta,
    ) -> Result<Self, RelationshipError> {
        meta.validate()?;
        if meta.related_table != Related::table_name() {
            return Err(RelationshipError::TypeMismatch {
                expected: Related::table_name().to_string(),
                found: meta.related_table.clone(),
            });
        }

        let relation = match meta.relationship_type {
            RelationshipType::BelongsTo => {
                AnyRelation::BelongsTo(BelongsTo::new(query, parent, &meta.foreign_key, &meta.local_key))
            }
            RelationshipType::HasOne => {
                AnyRelation::HasOne(HasOne::new(query, parent, &meta.foreign_key, &meta.local_key))
            }
            RelationshipType::HasMany => {
                AnyRelation::HasMany(HasMany::new(query, parent, &meta.foreign_key, &meta.local_key))
            }
        };
        Ok(relation)
    }

    pub fn relationship_type(&self) -> RelationshipType {
        self.meta().relationship_type
    }

    pub fn meta(&self) -> &RelationshipMeta {
        match self {
            AnyRelation::BelongsTo(relation) => relation.meta(),
            AnyRelation::HasOne(relation) => relation.meta(),
            AnyRelation::HasMany(relation) => relation.meta(),
        }
    }

    pub fn state(&self) -> RelationState {
        match self {
            AnyRelation::BelongsTo(relation) => relation.state(),
            AnyRelation::HasOne(relation) => relation.state(),
            AnyRelation::HasMany(relation) => relation.state(),
        }
    }

    pub fn add_constraints(&mut self) {
        match self {
            AnyRelation::BelongsTo(relation) => relation.add_constraints(),
            AnyRelation::HasOne(relation) => relation.add_constraints(),
            AnyRelation::HasMany(relation) => relation.add_constraints(),
        }
    }

    /// SQL the relation would run, `None` when the parent key is NULL
    pub fn to_sql(&mut self, dialect: SqlDialect) -> Option<(String, Vec<DatabaseValue>)> {
        match self {
            AnyRelation::BelongsTo(relation) => relation.to_sql(dialect),
            AnyRelation::HasOne(relation) => relation.to_sql(dialect),
            AnyRelation::HasMany(relation) => relation.to_sql(dialect),
        }
    }

    /// Resolve according to the relation's cardinality
    pub async fn get_results(self, pool: &dyn DatabasePool) -> ModelResult<RelationResults<Related>> {
        match self {
            AnyRelation::BelongsTo(relation) => relation.get_results(pool).await.map(RelationResults::One),
            AnyRelation::HasOne(relation) => relation.get_results(pool).await.map(RelationResults::One),
            AnyRelation::HasMany(relation) => relation.get_results(pool).await.map(RelationResults::Many),
        }
    }
}

impl<'p, Parent, Related> From<BelongsTo<'p, Parent, Related>> for AnyRelation<'p, Parent, Related> {
    fn from(relation: BelongsTo<'p, Parent, Related>) -> Self {
        AnyRelation::BelongsTo(relation)
    }
}

impl<'p, Parent, Related> From<HasOne<'p, Parent, Related>> for AnyRelation<'p, Parent, Related> {
    fn from(relation: HasOne<'p, Parent, Related>) -> Self {
        AnyRelation::HasOne(relation)
    }
}

impl<'p, Parent, Related> From<HasMany<'p, Parent, Related>> for AnyRelation<'p, Parent, Related> {
    fn from(relation: HasMany<'p, Parent, Related>) -> Self {
        AnyRelation::HasMany(relation)
    }
}
