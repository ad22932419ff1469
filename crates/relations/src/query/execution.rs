//! Query Builder execution for Model types

use crate::backends::DatabasePool;
use crate::error::{ModelError, ModelResult};
use crate::model::Model;
use super::builder::QueryBuilder;

impl<M: Model> QueryBuilder<M> {
    /// Execute query and return models in executor order
    pub async fn get(self, pool: &dyn DatabasePool) -> ModelResult<Vec<M>> {
        let (sql, params) = self.to_sql_with_params(pool.sql_dialect());
        tracing::debug!(table = M::table_name(), sql = %sql, params = params.len(), "executing query");

        let rows = pool.fetch_all(&sql, &params).await?;
        rows.iter()
            .map(|row| M::from_database_row(row.as_ref()))
            .collect()
    }

    /// Execute query and return first model
    pub async fn first(self, pool: &dyn DatabasePool) -> ModelResult<Option<M>> {
        let (sql, params) = self.limit(1).to_sql_with_params(pool.sql_dialect());
        tracing::debug!(table = M::table_name(), sql = %sql, params = params.len(), "executing query");

        match pool.fetch_optional(&sql, &params).await? {
            Some(row) => M::from_database_row(row.as_ref()).map(Some),
            None => Ok(None),
        }
    }

    /// Execute query and return first model or error
    pub async fn first_or_fail(self, pool: &dyn DatabasePool) -> ModelResult<M> {
        self.first(pool)
            .await?
            .ok_or_else(|| ModelError::NotFound(M::table_name().to_string()))
    }

    /// Count query results
    pub async fn count(mut self, pool: &dyn DatabasePool) -> ModelResult<i64> {
        self.select_fields = vec!["COUNT(*)".to_string()];
        self.order_by.clear();
        self.limit_count = None;
        self.offset_value = None;

        let (sql, params) = self.to_sql_with_params(pool.sql_dialect());
        tracing::debug!(table = M::table_name(), sql = %sql, "executing count");

        let row = pool
            .fetch_optional(&sql, &params)
            .await?
            .ok_or_else(|| ModelError::Query("COUNT query returned no rows".to_string()))?;

        let value = row.get_by_index(0)?;
        value
            .as_i64()
            .ok_or_else(|| ModelError::Query(format!("Unexpected COUNT result: {:?}", value)))
    }

    /// Whether at least one row matches
    pub async fn exists(mut self, pool: &dyn DatabasePool) -> ModelResult<bool> {
        self.select_fields = vec!["1".to_string()];
        let (sql, params) = self.limit(1).to_sql_with_params(pool.sql_dialect());
        tracing::debug!(table = M::table_name(), sql = %sql, "executing exists");

        Ok(pool.fetch_optional(&sql, &params).await?.is_some())
    }
}
