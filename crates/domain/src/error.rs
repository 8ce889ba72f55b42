//! Domain error types.

use part_store::StoreError;
use thiserror::Error;

/// Errors that can occur during inventory operations.
///
/// Every variant is returned to the caller as-is; the domain never retries.
#[derive(Debug, Error)]
pub enum InventoryError {
    /// The requested part (or any part, for listing) does not exist.
    #[error("{0}")]
    NotFound(String),

    /// A part with the same identity is already stored.
    #[error("{0}")]
    AlreadyExists(String),

    /// The operation would break the quantity invariant, or the part was
    /// modified concurrently.
    #[error("{0}")]
    Conflict(String),

    /// The caller supplied a non-positive amount or a malformed identity.
    #[error("{0}")]
    InvalidArgument(String),

    /// The store failed in a way the caller cannot act on.
    #[error("Part store error: {0}")]
    Store(#[source] StoreError),
}

impl InventoryError {
    /// Returns a stable label for this kind of error, used in metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            InventoryError::NotFound(_) => "not_found",
            InventoryError::AlreadyExists(_) => "already_exists",
            InventoryError::Conflict(_) => "conflict",
            InventoryError::InvalidArgument(_) => "invalid_argument",
            InventoryError::Store(_) => "internal",
        }
    }
}

impl From<StoreError> for InventoryError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(id) => {
                InventoryError::NotFound(format!("Part with ID '{id}' not found"))
            }
            StoreError::DuplicateKey(id) => InventoryError::AlreadyExists(format!(
                "Cannot add part '{id}' because it already exists"
            )),
            StoreError::VersionConflict { id, .. } => InventoryError::Conflict(format!(
                "Part '{id}' was modified concurrently, retry the operation"
            )),
            other => InventoryError::Store(other),
        }
    }
}
