//! Query Builder Module - the single-table SELECT that relations constrain
//! and execute

pub mod builder;
pub mod execution;
pub mod ordering;
pub mod sql_generation;
pub mod types;
pub mod where_clause;

pub use builder::QueryBuilder;
pub use types::{Operand, OrderDirection, QueryOperator, WhereCondition};
