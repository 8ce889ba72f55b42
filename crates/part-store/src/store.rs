use async_trait::async_trait;

use crate::{Part, PartId, Result, Version};

/// Core trait for part store implementations.
///
/// A part store holds exactly the current state of every part, keyed by
/// [`PartId`]. Each method is atomic against a single row. Writes to an
/// existing part take the version the caller read and fail with
/// `VersionConflict` if the row has changed since.
/// All implementations must be thread-safe (Send + Sync).
#[async_trait]
pub trait PartStore: Send + Sync {
    /// Looks up a part by its full composite id.
    ///
    /// Returns None if no such part exists.
    async fn find(&self, id: &PartId) -> Result<Option<Part>>;

    /// Returns every stored part.
    ///
    /// Ordering is implementation defined but stable for a given state.
    async fn list(&self) -> Result<Vec<Part>>;

    /// Inserts a new part at the initial version.
    ///
    /// Fails with `DuplicateKey` if a part with the same id is present.
    async fn insert(&self, part: Part) -> Result<Part>;

    /// Replaces the quantity of an existing part.
    ///
    /// Succeeds only if the stored version equals `expected`; the returned
    /// part carries the incremented version. Fails with `NotFound` if the
    /// part is gone and `VersionConflict` if it was modified concurrently.
    async fn update(&self, part: Part, expected: Version) -> Result<Part>;

    /// Removes a part permanently.
    ///
    /// Same version semantics as [`PartStore::update`].
    async fn delete(&self, id: &PartId, expected: Version) -> Result<()>;
}

/// Extension trait providing convenience methods for part stores.
#[async_trait]
pub trait PartStoreExt: PartStore {
    /// Checks if a part exists.
    async fn exists(&self, id: &PartId) -> Result<bool> {
        Ok(self.find(id).await?.is_some())
    }
}

// Blanket implementation for all PartStore implementations
impl<T: PartStore + ?Sized> PartStoreExt for T {}
