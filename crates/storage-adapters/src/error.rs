use domains::DomainError;
use thiserror::Error;

/// Driver-level failures. Converted into `DomainError::Storage` at the port boundary.
#[derive(Error, Debug)]
pub enum StorageError {
    #[cfg(feature = "db-mongo")]
    #[error("mongodb error: {0}")]
    Mongo(#[from] mongodb::error::Error),

    #[cfg(feature = "db-mongo")]
    #[error("bson serialization error: {0}")]
    BsonSerialization(#[from] bson::ser::Error),

    #[cfg(feature = "db-postgres")]
    #[error("postgres error: {0}")]
    Postgres(#[from] sqlx::Error),

    #[cfg(feature = "db-postgres")]
    #[error("migration error: {0}")]
    Migrate(#[from] sqlx::migrate::MigrateError),

    /// A stored record that cannot be mapped back onto the domain model.
    #[error("corrupt record: {0}")]
    Corrupt(String),
}

impl From<StorageError> for DomainError {
    fn from(err: StorageError) -> Self {
        tracing::error!(error = %err, "storage operation failed");
        DomainError::Storage(err.to_string())
    }
}
