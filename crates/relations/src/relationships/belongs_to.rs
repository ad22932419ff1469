//! BelongsTo Relationship - the parent holds a foreign key pointing at its
//! owner

use async_trait::async_trait;

use crate::backends::DatabasePool;
use crate::error::ModelResult;
use crate::model::Model;
use crate::query::QueryBuilder;

use super::base::RelationCore;
use super::traits::{Relation, RelationState, RelationshipMeta, RelationshipType};

/// BelongsTo relationship - resolves the owner referenced by
/// `parent[foreign_key]` through `owner_key` on the related table
#[derive(Debug)]
pub struct BelongsTo<'p, Parent, Related> {
    core: RelationCore<'p, Parent, Related>,
}

impl<'p, Parent, Related> BelongsTo<'p, Parent, Related>
where
    Parent: Model,
    Related: Model,
{
    /// Create a new BelongsTo relationship over `query`
    pub fn new(query: QueryBuilder<Related>, parent: &'p Parent, foreign_key: &str, owner_key: &str) -> Self {
        let meta = RelationshipMeta::new(
            RelationshipType::BelongsTo,
            foreign_key,
            owner_key,
            Related::table_name(),
        );
        Self {
            core: RelationCore::new(query, parent, meta),
        }
    }

    /// Column on the parent holding the owner's key
    pub fn foreign_key(&self) -> &str {
        &self.core.meta.foreign_key
    }

    /// Column on the related table matched against the foreign key
    pub fn owner_key(&self) -> &str {
        &self.core.meta.local_key
    }
}

#[async_trait]
impl<'p, Parent, Related> Relation for BelongsTo<'p, Parent, Related>
where
    Parent: Model,
    Related: Model,
{
    type Parent = Parent;
    type Related = Related;
    type Output = Option<Related>;

    fn meta(&self) -> &RelationshipMeta {
        &self.core.meta
    }

    fn parent(&self) -> &Parent {
        self.core.parent
    }

    fn query(&self) -> &QueryBuilder<Related> {
        &self.core.query
    }

    fn query_mut(&mut self) -> &mut QueryBuilder<Related> {
        &mut self.core.query
    }

    fn state(&self) -> RelationState {
        self.core.state
    }

    fn add_constraints(&mut self) {
        self.core.apply_constraints();
    }

    fn into_query(self) -> Option<QueryBuilder<Related>> {
        self.core.into_query()
    }

    async fn get_results(self, pool: &dyn DatabasePool) -> ModelResult<Option<Related>> {
        self.first(pool).await
    }
}
