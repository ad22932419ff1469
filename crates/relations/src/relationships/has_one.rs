//! HasOne Relationship - a single related row carries a foreign key back to
//! the parent

use async_trait::async_trait;

use crate::backends::DatabasePool;
use crate::error::ModelResult;
use crate::model::Model;
use crate::query::QueryBuilder;

use super::base::RelationCore;
use super::traits::{Relation, RelationState, RelationshipMeta, RelationshipType};

/// HasOne relationship - parent model has one related model
#[derive(Debug)]
pub struct HasOne<'p, Parent, Related> {
    core: RelationCore<'p, Parent, Related>,
}

impl<'p, Parent, Related> HasOne<'p, Parent, Related>
where
    Parent: Model,
    Related: Model,
{
    /// Create a new HasOne relationship over `query`
    pub fn new(query: QueryBuilder<Related>, parent: &'p Parent, foreign_key: &str, local_key: &str) -> Self {
        let meta = RelationshipMeta::new(
            RelationshipType::HasOne,
            foreign_key,
            local_key,
            Related::table_name(),
        );
        Self {
            core: RelationCore::new(query, parent, meta),
        }
    }

    /// Column on the related table referencing the parent
    pub fn foreign_key(&self) -> &str {
        &self.core.meta.foreign_key
    }

    /// Column on the parent supplying the referenced value
    pub fn local_key(&self) -> &str {
        &self.core.meta.local_key
    }
}

#[async_trait]
impl<'p, Parent, Related> Relation for HasOne<'p, Parent, Related>
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
