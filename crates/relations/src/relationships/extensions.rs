//! Model-side constructors for relations
//!
//! Every model gets `belongs_to`, `has_one` and `has_many`. Each call starts
//! from a fresh query on the related table, so a relation is never shared
//! between two resolutions.

use crate::error::RelationshipError;
use crate::model::Model;
use crate::query::QueryBuilder;

use super::any::AnyRelation;
use super::belongs_to::BelongsTo;
use super::has_many::HasMany;
use super::has_one::HasOne;
use super::traits::RelationshipMeta;

/// Relation constructors available on every [`Model`]
pub trait HasRelations: Model + Sized {
    /// Owner referenced by `self[foreign_key]`, matched on the owner's
    /// primary key
    fn belongs_to<R: Model>(&self, foreign_key: &str) -> BelongsTo<'_, Self, R> {
        self.belongs_to_with_owner_key(foreign_key, R::primary_key_name())
    }

    fn belongs_to_with_owner_key<R: Model>(&self, foreign_key: &str, owner_key: &str) -> BelongsTo<'_, Self, R> {
        BelongsTo::new(QueryBuilder::for_model(), self, foreign_key, owner_key)
    }

    /// Single record whose `foreign_key` equals this model's primary key
    fn has_one<R: Model>(&self, foreign_key: &str) -> HasOne<'_, Self, R> {
        self.has_one_with_local_key(foreign_key, Self::primary_key_name())
    }

    fn has_one_with_local_key<R: Model>(&self, foreign_key: &str, local_key: &str) -> HasOne<'_, Self, R> {
        HasOne::new(QueryBuilder::for_model(), self, foreign_key, local_key)
    }

    /// Records whose `foreign_key` equals this model's primary key
    fn has_many<R: Model>(&self, foreign_key: &str) -> HasMany<'_, Self, R> {
        self.has_many_with_local_key(foreign_key, Self::primary_key_name())
    }

    fn has_many_with_local_key<R: Model>(&self, foreign_key: &str, local_key: &str) -> HasMany<'_, Self, R> {
        HasMany::new(QueryBuilder::for_model(), self, foreign_key, local_key)
    }

    /// Relation described by declared metadata
    fn relation<R: Model>(&self, meta: &RelationshipMeta) -> Result<AnyRelation<'_, Self, R>, RelationshipError> {
        AnyRelation::from_meta(QueryBuilder::for_model(), self, meta)
    }
}

impl<M: Model> HasRelations for M {}
