//! Query Builder - state of a single-table SELECT

use std::marker::PhantomData;

use crate::model::Model;
use super::types::{OrderDirection, WhereCondition};

/// Builder for a SELECT against one table.
///
/// `M` is the model rows are materialized into; `()` builds SQL only.
#[derive(Debug)]
pub struct QueryBuilder<M = ()> {
    pub(crate) select_fields: Vec<String>,
    pub(crate) table: Option<String>,
    pub(crate) where_conditions: Vec<WhereCondition>,
    pub(crate) order_by: Vec<(String, OrderDirection)>,
    pub(crate) limit_count: Option<i64>,
    pub(crate) offset_value: Option<i64>,
    _model: PhantomData<fn() -> M>,
}

// derive would require `M: Clone`
impl<M> Clone for QueryBuilder<M> {
    fn clone(&self) -> Self {
        Self {
            select_fields: self.select_fields.clone(),
            table: self.table.clone(),
            where_conditions: self.where_conditions.clone(),
            order_by: self.order_by.clone(),
            limit_count: self.limit_count,
            offset_value: self.offset_value,
            _model: PhantomData,
        }
    }
}

impl<M> Default for QueryBuilder<M> {
    fn default() -> Self {
        Self {
            select_fields: Vec::new(),
            table: None,
            where_conditions: Vec::new(),
            order_by: Vec::new(),
            limit_count: None,
            offset_value: None,
            _model: PhantomData,
        }
    }
}

impl<M> QueryBuilder<M> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the table to select from
    pub fn from(mut self, table: &str) -> Self {
        self.table = Some(table.to_string());
        self
    }

    pub fn table(&self) -> Option<&str> {
        self.table.as_deref()
    }

    /// WHERE conditions added so far, in order
    pub fn where_conditions(&self) -> &[WhereCondition] {
        &self.where_conditions
    }

    /// Whether an identical condition is already present
    pub fn has_condition(&self, condition: &WhereCondition) -> bool {
        self.where_conditions.contains(condition)
    }
}

impl<M: Model> QueryBuilder<M> {
    /// Query scoped to the model's own table
    pub fn for_model() -> Self {
        Self::new().from(M::table_name())
    }
}
