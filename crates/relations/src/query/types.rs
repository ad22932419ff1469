//! Query Builder Types - conditions and ordering

use std::fmt;

use crate::backends::DatabaseValue;

/// Comparison applied by a [`WhereCondition`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryOperator {
    Equal,
    NotEqual,
    GreaterThan,
    GreaterThanOrEqual,
    LessThan,
    LessThanOrEqual,
    Like,
    In,
    NotIn,
    IsNull,
    IsNotNull,
}

impl QueryOperator {
    pub fn as_sql(&self) -> &'static str {
        match self {
            QueryOperator::Equal => "=",
            QueryOperator::NotEqual => "!=",
            QueryOperator::GreaterThan => ">",
            QueryOperator::GreaterThanOrEqual => ">=",
            QueryOperator::LessThan => "<",
            QueryOperator::LessThanOrEqual => "<=",
            QueryOperator::Like => "LIKE",
            QueryOperator::In => "IN",
            QueryOperator::NotIn => "NOT IN",
            QueryOperator::IsNull => "IS NULL",
            QueryOperator::IsNotNull => "IS NOT NULL",
        }
    }
}

impl fmt::Display for QueryOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_sql())
    }
}

/// Right-hand side of a condition
#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    /// `IS NULL` / `IS NOT NULL`
    None,
    Value(DatabaseValue),
    /// `IN` / `NOT IN`
    List(Vec<DatabaseValue>),
}

/// One predicate of the WHERE clause; conditions are joined with AND
#[derive(Debug, Clone, PartialEq)]
pub struct WhereCondition {
    pub column: String,
    pub operator: QueryOperator,
    pub operand: Operand,
}

impl WhereCondition {
    pub fn compare(column: &str, operator: QueryOperator, value: DatabaseValue) -> Self {
        Self {
            column: column.to_string(),
            operator,
            operand: Operand::Value(value),
        }
    }

    /// `column = value`, the shape of every relationship constraint
    pub fn eq(column: &str, value: DatabaseValue) -> Self {
        Self::compare(column, QueryOperator::Equal, value)
    }

    pub fn list(column: &str, operator: QueryOperator, values: Vec<DatabaseValue>) -> Self {
        Self {
            column: column.to_string(),
            operator,
            operand: Operand::List(values),
        }
    }

    pub fn null_check(column: &str, operator: QueryOperator) -> Self {
        Self {
            column: column.to_string(),
            operator,
            operand: Operand::None,
        }
    }

    /// The compared value, for single-value operators
    pub fn value(&self) -> Option<&DatabaseValue> {
        match &self.operand {
            Operand::Value(value) => Some(value),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderDirection {
    Asc,
    Desc,
}

impl fmt::Display for OrderDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OrderDirection::Asc => f.write_str("ASC"),
            OrderDirection::Desc => f.write_str("DESC"),
        }
    }
}
