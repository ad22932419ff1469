//! Query Builder SQL generation

use std::fmt::Write;

use super::builder::QueryBuilder;
use super::types::{Operand, QueryOperator, WhereCondition};
use crate::backends::{DatabaseValue, SqlDialect};

/// Collects bound values and hands out their placeholders
struct Params {
    dialect: SqlDialect,
    values: Vec<DatabaseValue>,
}

impl Params {
    fn bind(&mut self, value: &DatabaseValue) -> String {
        let placeholder = self.dialect.parameter_placeholder(self.values.len());
        self.values.push(value.clone());
        placeholder
    }
}

impl<M> QueryBuilder<M> {
    /// SQL with dialect-specific placeholders, plus the values to bind in order
    pub fn to_sql_with_params(&self, dialect: SqlDialect) -> (String, Vec<DatabaseValue>) {
        let mut params = Params {
            dialect,
            values: Vec::new(),
        };

        let columns = if self.select_fields.is_empty() {
            "*".to_string()
        } else {
            self.select_fields.join(", ")
        };
        let mut sql = format!("SELECT {}", columns);

        if let Some(table) = &self.table {
            let _ = write!(sql, " FROM {}", table);
        }

        if !self.where_conditions.is_empty() {
            let predicates: Vec<String> = self
                .where_conditions
                .iter()
                .map(|condition| render_condition(condition, &mut params))
                .collect();
            let _ = write!(sql, " WHERE {}", predicates.join(" AND "));
        }

        if !self.order_by.is_empty() {
            let terms: Vec<String> = self
                .order_by
                .iter()
                .map(|(column, direction)| format!("{} {}", column, direction))
                .collect();
            let _ = write!(sql, " ORDER BY {}", terms.join(", "));
        }

        if let Some(limit) = self.limit_count {
            let _ = write!(sql, " LIMIT {}", limit);
        }
        if let Some(offset) = self.offset_value {
            let _ = write!(sql, " OFFSET {}", offset);
        }

        (sql, params.values)
    }

    /// PostgreSQL-flavoured SQL text, for logging and assertions
    pub fn to_sql(&self) -> String {
        self.to_sql_with_params(SqlDialect::PostgreSQL).0
    }
}

fn render_condition(condition: &WhereCondition, params: &mut Params) -> String {
    let column = &condition.column;
    let operator = condition.operator;

    match &condition.operand {
        Operand::None => format!("{} {}", column, operator),
        // IN () is not valid SQL
        Operand::List(values) if values.is_empty() => {
            let always = operator == QueryOperator::NotIn;
            (if always { "1 = 1" } else { "1 = 0" }).to_string()
        }
        Operand::List(values) => {
            let placeholders: Vec<String> = values.iter().map(|value| params.bind(value)).collect();
            format!("{} {} ({})", column, operator, placeholders.join(", "))
        }
        Operand::Value(value) => format!("{} {} {}", column, operator, params.bind(value)),
    }
}
