//! # storage-adapters
//!
//! Implementations of the `ThreadRepository` port. The in-memory store is
//! always compiled; document and relational backends sit behind features.

pub mod error;
pub mod memory;

#[cfg(feature = "db-mongo")]
pub mod mongo;

#[cfg(feature = "db-postgres")]
pub mod postgres;

pub use error::StorageError;
pub use memory::InMemoryThreadRepository;

#[cfg(feature = "db-mongo")]
pub use mongo::MongoThreadRepository;

#[cfg(feature = "db-postgres")]
pub use postgres::PgThreadRepository;
