//! Shared state and constraint application for the concrete relations

use crate::backends::DatabaseValue;
use crate::model::Model;
use crate::query::{QueryBuilder, WhereCondition};

use super::traits::{RelationState, RelationshipMeta};

/// Parent reference, owned query and lifecycle state of one relation
#[derive(Debug)]
pub(crate) struct RelationCore<'p, P, R> {
    pub(crate) parent: &'p P,
    pub(crate) query: QueryBuilder<R>,
    pub(crate) meta: RelationshipMeta,
    pub(crate) state: RelationState,
    parent_key: Option<DatabaseValue>,
}

impl<'p, P: Model, R: Model> RelationCore<'p, P, R> {
    pub(crate) fn new(query: QueryBuilder<R>, parent: &'p P, meta: RelationshipMeta) -> Self {
        Self {
            parent,
            query,
            meta,
            state: RelationState::Created,
            parent_key: None,
        }
    }

    /// `related_column = parent[parent_column]`, applied at most once
    pub(crate) fn apply_constraints(&mut self) {
        if self.state == RelationState::Constrained {
            return;
        }
        self.state = RelationState::Constrained;

        let parent_column = self.meta.parent_column().to_string();
        let related_column = self.meta.related_column().to_string();

        let Some(value) = self.parent.get_attribute(&parent_column) else {
            if self.parent.has_attribute(&parent_column) {
                tracing::debug!(
                    relationship = %self.meta.relationship_type,
                    parent = P::table_name(),
                    column = %parent_column,
                    "parent key is null, relation resolves to nothing"
                );
            } else {
                // most likely a misspelled key column
                tracing::warn!(
                    relationship = %self.meta.relationship_type,
                    parent = P::table_name(),
                    column = %parent_column,
                    "parent has no such column, relation resolves to nothing"
                );
            }
            return;
        };
        self.parent_key = Some(value.clone());

        // a base query may already carry the same equality
        if self.query.has_condition(&WhereCondition::eq(&related_column, value.clone())) {
            return;
        }

        let query = std::mem::take(&mut self.query);
        self.query = query.where_eq(&related_column, value);
        tracing::debug!(
            relationship = %self.meta.relationship_type,
            related = %self.meta.related_table,
            column = %related_column,
            "applied relationship constraint"
        );
    }

    pub(crate) fn into_query(mut self) -> Option<QueryBuilder<R>> {
        self.apply_constraints();
        self.parent_key.is_some().then_some(self.query)
    }
}
