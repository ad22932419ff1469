//! Query Builder ORDER BY and LIMIT/OFFSET operations

use super::builder::QueryBuilder;
use super::types::OrderDirection;

impl<M> QueryBuilder<M> {
    pub fn order_by_direction(mut self, column: &str, direction: OrderDirection) -> Self {
        self.order_by.push((column.to_string(), direction));
        self
    }

    pub fn order_by(self, column: &str) -> Self {
        self.order_by_direction(column, OrderDirection::Asc)
    }

    pub fn order_by_desc(self, column: &str) -> Self {
        self.order_by_direction(column, OrderDirection::Desc)
    }

    pub fn limit(mut self, count: i64) -> Self {
        self.limit_count = Some(count);
        self
    }

    pub fn offset(mut self, count: i64) -> Self {
        self.offset_value = Some(count);
        self
    }

    /// LIMIT/OFFSET for a 1-based `page`; pages below 1 are treated as 1
    pub fn for_page(self, page: i64, per_page: i64) -> Self {
        let offset = (page.max(1) - 1) * per_page;
        self.limit(per_page).offset(offset)
    }
}
