//! Query Builder WHERE clause operations

use super::builder::QueryBuilder;
use super::types::{QueryOperator, WhereCondition};
use crate::backends::DatabaseValue;

impl<M> QueryBuilder<M> {
    /// Add an arbitrary condition
    pub fn where_condition(mut self, condition: WhereCondition) -> Self {
        self.where_conditions.push(condition);
        self
    }

    /// `column <operator> value` for single-value operators
    pub fn where_op<T: Into<DatabaseValue>>(self, column: &str, operator: QueryOperator, value: T) -> Self {
        self.where_condition(WhereCondition::compare(column, operator, value.into()))
    }

    pub fn where_eq<T: Into<DatabaseValue>>(self, column: &str, value: T) -> Self {
        self.where_op(column, QueryOperator::Equal, value)
    }

    pub fn where_ne<T: Into<DatabaseValue>>(self, column: &str, value: T) -> Self {
        self.where_op(column, QueryOperator::NotEqual, value)
    }

    pub fn where_gt<T: Into<DatabaseValue>>(self, column: &str, value: T) -> Self {
        self.where_op(column, QueryOperator::GreaterThan, value)
    }

    pub fn where_gte<T: Into<DatabaseValue>>(self, column: &str, value: T) -> Self {
        self.where_op(column, QueryOperator::GreaterThanOrEqual, value)
    }

    pub fn where_lt<T: Into<DatabaseValue>>(self, column: &str, value: T) -> Self {
        self.where_op(column, QueryOperator::LessThan, value)
    }

    pub fn where_lte<T: Into<DatabaseValue>>(self, column: &str, value: T) -> Self {
        self.where_op(column, QueryOperator::LessThanOrEqual, value)
    }

    pub fn where_like(self, column: &str, pattern: &str) -> Self {
        self.where_op(column, QueryOperator::Like, pattern)
    }

    /// `column IN (...)`; an empty list matches nothing
    pub fn where_in<T: Into<DatabaseValue>>(self, column: &str, values: Vec<T>) -> Self {
        let values = values.into_iter().map(Into::into).collect();
        self.where_condition(WhereCondition::list(column, QueryOperator::In, values))
    }

    /// `column NOT IN (...)`; an empty list matches everything
    pub fn where_not_in<T: Into<DatabaseValue>>(self, column: &str, values: Vec<T>) -> Self {
        let values = values.into_iter().map(Into::into).collect();
        self.where_condition(WhereCondition::list(column, QueryOperator::NotIn, values))
    }

    pub fn where_null(self, column: &str) -> Self {
        self.where_condition(WhereCondition::null_check(column, QueryOperator::IsNull))
    }

    pub fn where_not_null(self, column: &str) -> Self {
        self.where_condition(WhereCondition::null_check(column, QueryOperator::IsNotNull))
    }
}
