//! Core Model Trait - Base definition for database entities
//!
//! Defines table metadata, primary key handling, attribute access by column
//! name and row materialization. Relations only ever read a parent through
//! [`Model::get_attribute`] and build related records through
//! [`Model::from_database_row`].

use std::collections::HashMap;
use std::fmt::Debug;
use serde::{Deserialize, Serialize};

use crate::backends::{DatabaseRow, DatabaseValue};
use crate::error::{ModelError, ModelResult};

/// Core trait for database models
pub trait Model: Send + Sync + Debug + Serialize + for<'de> Deserialize<'de> {
    /// The type used for this model's primary key. Converting into
    /// [`DatabaseValue`] keeps the key's native type when it is bound, so a
    /// `Uuid` key compares against a `UUID` column and not against text.
    type PrimaryKey: Clone + Send + Sync + Debug + std::fmt::Display + Into<DatabaseValue>;

    /// Table name for this model
    fn table_name() -> &'static str;

    /// Primary key field name
    fn primary_key_name() -> &'static str {
        "id"
    }

    /// Get the primary key value for this model instance
    fn primary_key(&self) -> Option<Self::PrimaryKey>;

    /// Convert model to field-value pairs keyed by column name
    fn to_fields(&self) -> HashMap<String, serde_json::Value> {
        match serde_json::to_value(self) {
            Ok(serde_json::Value::Object(map)) => map.into_iter().collect(),
            _ => HashMap::new(),
        }
    }

    /// Read a single attribute by column name.
    ///
    /// Returns `None` when the column is unknown or holds NULL, so callers
    /// never have to distinguish "unset" from "null".
    ///
    /// The primary key column comes from [`Model::primary_key`] with its
    /// native type. Other columns are read from the serialized model, where
    /// UUIDs and timestamps are plain strings; models with such foreign keys
    /// on PostgreSQL override this method and return the typed value for
    /// those columns, delegating the rest to [`Model::serialized_attribute`].
    fn get_attribute(&self, column: &str) -> Option<DatabaseValue> {
        if column == Self::primary_key_name() {
            return self.primary_key().map(Into::into);
        }
        self.serialized_attribute(column)
    }

    /// Attribute as read from the model's serde representation
    fn serialized_attribute(&self, column: &str) -> Option<DatabaseValue> {
        let serde_json::Value::Object(mut fields) = serde_json::to_value(self).ok()? else {
            return None;
        };
        fields
            .remove(column)
            .map(DatabaseValue::from_json)
            .filter(|value| !value.is_null())
    }

    /// Whether the model has a column of this name at all, NULL or not
    fn has_attribute(&self, column: &str) -> bool {
        column == Self::primary_key_name() || self.to_fields().contains_key(column)
    }

    /// Create a model instance from a database row
    fn from_database_row(row: &dyn DatabaseRow) -> ModelResult<Self>
    where
        Self: Sized,
    {
        let json = row.to_json()?;
        serde_json::from_value(json).map_err(|e| {
            ModelError::Serialization(format!("Failed to build {} from row: {}", Self::table_name(), e))
        })
    }
}
