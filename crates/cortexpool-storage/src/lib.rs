//! # cortexpool-storage
//!
//! SQLite-backed implementation of `IPersistenceAdapter` (spec §6).
//! Single connection guarded by a mutex — the engine's concurrency model
//! (spec §5) is single-threaded cooperative, so there is no read pool to
//! size; every call serializes on the one connection.

pub mod adapter;
pub mod migrations;
pub mod rows;

pub use adapter::SqliteAdapter;

use cortexpool_core::errors::StorageError;

/// Convert a `rusqlite::Error` into `StorageError::Sqlite`.
pub(crate) fn to_storage_err(err: rusqlite::Error) -> StorageError {
    StorageError::Sqlite {
        message: err.to_string(),
    }
}
