use thiserror::Error;

use crate::{PartId, Version};

/// Errors that can occur when interacting with the part store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// No part is stored under the given id.
    #[error("Part not found: {0}")]
    NotFound(PartId),

    /// A part with the given id is already stored.
    #[error("Duplicate part: {0}")]
    DuplicateKey(PartId),

    /// The stored version did not match the version the write expected.
    #[error("Concurrency conflict for part {id}: expected version {expected}, found {actual}")]
    VersionConflict {
        id: PartId,
        expected: Version,
        actual: Version,
    },

    /// A database error occurred.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A database migration error occurred.
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
}

/// Result type for part store operations.
pub type Result<T> = std::result::Result<T, StoreError>;
