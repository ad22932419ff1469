//! Error types for the ORM relation layer
//!
//! Relations add no recovery of their own: anything that goes wrong while a
//! related query executes surfaces through [`ModelError`] unchanged.

/// Result type alias for model operations
pub type ModelResult<T> = Result<T, ModelError>;

/// ORM error type alias
pub type OrmError = ModelError;

/// ORM result type alias
pub type OrmResult<T> = ModelResult<T>;

/// Error types for ORM operations
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ModelError {
    /// Database driver error
    #[error("Database error: {0}")]
    Database(String),

    /// Model not found in database
    #[error("Record not found in table '{0}'")]
    NotFound(String),

    /// Relationship could not be built or resolved
    #[error("Relationship error: {0}")]
    Relationship(String),

    /// Row could not be converted to or from a model
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Connection pool error
    #[error("Connection error: {0}")]
    Connection(String),

    /// Query execution error
    #[error("Query error: {0}")]
    Query(String),

    /// Invalid configuration value
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Column missing from a result row
    #[error("Column not found: {0}")]
    ColumnNotFound(String),
}

impl From<sqlx::Error> for ModelError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::ColumnNotFound(column) => ModelError::ColumnNotFound(column),
            sqlx::Error::RowNotFound => ModelError::NotFound("row".to_string()),
            sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed => {
                ModelError::Connection(err.to_string())
            }
            other => ModelError::Database(other.to_string()),
        }
    }
}

impl From<serde_json::Error> for ModelError {
    fn from(err: serde_json::Error) -> Self {
        ModelError::Serialization(err.to_string())
    }
}

/// Error types for relationship construction
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RelationshipError {
    /// A key name was empty
    #[error("Invalid relationship configuration: {0}")]
    InvalidConfiguration(String),

    /// Relationship kind did not match the requested operation
    #[error("Relationship type mismatch: expected {expected}, found {found}")]
    TypeMismatch { expected: String, found: String },
}

impl From<RelationshipError> for ModelError {
    fn from(err: RelationshipError) -> Self {
        ModelError::Relationship(err.to_string())
    }
}
