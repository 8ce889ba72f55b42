use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::{
    Part, PartId, Result, StoreError, Version,
    store::PartStore,
};

/// In-memory part store implementation for testing and local runs.
///
/// This implementation keeps all parts in an ordered map and provides
/// the same interface as the PostgreSQL implementation. Each operation
/// holds the lock for its whole check-and-write, so version checks are
/// atomic.
#[derive(Clone, Default)]
pub struct InMemoryPartStore {
    parts: Arc<RwLock<BTreeMap<PartId, Part>>>,
}

impl InMemoryPartStore {
    /// Creates a new empty in-memory part store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the total number of parts stored.
    pub async fn part_count(&self) -> usize {
        self.parts.read().await.len()
    }

    /// Removes all parts.
    pub async fn clear(&self) {
        self.parts.write().await.clear();
    }
}

#[async_trait]
impl PartStore for InMemoryPartStore {
    async fn find(&self, id: &PartId) -> Result<Option<Part>> {
        Ok(self.parts.read().await.get(id).cloned())
    }

    async fn list(&self) -> Result<Vec<Part>> {
        Ok(self.parts.read().await.values().cloned().collect())
    }

    async fn insert(&self, part: Part) -> Result<Part> {
        let mut parts = self.parts.write().await;

        if parts.contains_key(&part.id) {
            return Err(StoreError::DuplicateKey(part.id));
        }

        let stored = Part {
            version: Version::initial(),
            ..part
        };
        parts.insert(stored.id.clone(), stored.clone());
        Ok(stored)
    }

    async fn update(&self, part: Part, expected: Version) -> Result<Part> {
        let mut parts = self.parts.write().await;

        let current = parts
            .get_mut(&part.id)
            .ok_or_else(|| StoreError::NotFound(part.id.clone()))?;

        if current.version != expected {
            return Err(StoreError::VersionConflict {
                id: part.id,
                expected,
                actual: current.version,
            });
        }

        current.quantity = part.quantity;
        current.version = expected.next();
        Ok(current.clone())
    }

    async fn delete(&self, id: &PartId, expected: Version) -> Result<()> {
        let mut parts = self.parts.write().await;

        let current = parts
            .get(id)
            .ok_or_else(|| StoreError::NotFound(id.clone()))?;

        if current.version != expected {
            return Err(StoreError::VersionConflict {
                id: id.clone(),
                expected,
                actual: current.version,
            });
        }

        parts.remove(id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::PartStoreExt;

    fn part_id(n: u32) -> PartId {
        PartId::new(format!("M{n}"), format!("S{n}"), format!("SUP{n}"))
    }

    #[tokio::test]
    async fn insert_and_find() {
        let store = InMemoryPartStore::new();
        let stored = store.insert(Part::new(part_id(1))).await.unwrap();
        assert_eq!(stored.version, Version::initial());

        let found = store.find(&part_id(1)).await.unwrap().unwrap();
        assert_eq!(found, stored);
        assert!(store.exists(&part_id(1)).await.unwrap());
        assert!(!store.exists(&part_id(2)).await.unwrap());
    }

    #[tokio::test]
    async fn insert_duplicate_is_rejected_and_keeps_original() {
        let store = InMemoryPartStore::new();
        let original = store.insert(Part::new(part_id(1))).await.unwrap();
        let bumped = store
            .update(original.with_quantity(4), Version::initial())
            .await
            .unwrap();

        let result = store.insert(Part::new(part_id(1))).await;
        assert!(matches!(result, Err(StoreError::DuplicateKey(_))));

        let found = store.find(&part_id(1)).await.unwrap().unwrap();
        assert_eq!(found, bumped);
    }

    #[tokio::test]
    async fn update_bumps_version() {
        let store = InMemoryPartStore::new();
        let part = store.insert(Part::new(part_id(1))).await.unwrap();

        let updated = store
            .update(part.with_quantity(5), part.version)
            .await
            .unwrap();
        assert_eq!(updated.quantity, 5);
        assert_eq!(updated.version, Version::new(1));
    }

    #[tokio::test]
    async fn stale_update_is_a_version_conflict() {
        let store = InMemoryPartStore::new();
        let part = store.insert(Part::new(part_id(1))).await.unwrap();

        store
            .update(part.with_quantity(5), part.version)
            .await
            .unwrap();

        let stale = store.update(part.with_quantity(9), part.version).await;
        match stale {
            Err(StoreError::VersionConflict {
                expected, actual, ..
            }) => {
                assert_eq!(expected, Version::new(0));
                assert_eq!(actual, Version::new(1));
            }
            other => panic!("expected version conflict, got {other:?}"),
        }

        let found = store.find(&part_id(1)).await.unwrap().unwrap();
        assert_eq!(found.quantity, 5);
    }

    #[tokio::test]
    async fn update_missing_part_is_not_found() {
        let store = InMemoryPartStore::new();
        let result = store
            .update(Part::new(part_id(1)), Version::initial())
            .await;
        assert!(matches!(result, Err(StoreError::NotFound(_))));
        assert_eq!(store.part_count().await, 0);
    }

    #[tokio::test]
    async fn delete_checks_version() {
        let store = InMemoryPartStore::new();
        let part = store.insert(Part::new(part_id(1))).await.unwrap();

        let stale = store.delete(&part_id(1), Version::new(7)).await;
        assert!(matches!(stale, Err(StoreError::VersionConflict { .. })));
        assert_eq!(store.part_count().await, 1);

        store.delete(&part_id(1), part.version).await.unwrap();
        assert_eq!(store.part_count().await, 0);

        let again = store.delete(&part_id(1), part.version).await;
        assert!(matches!(again, Err(StoreError::NotFound(_))));
    }

    #[tokio::test]
    async fn list_is_ordered_by_id() {
        let store = InMemoryPartStore::new();
        store.insert(Part::new(part_id(3))).await.unwrap();
        store.insert(Part::new(part_id(1))).await.unwrap();
        store.insert(Part::new(part_id(2))).await.unwrap();

        let ids: Vec<_> = store
            .list()
            .await
            .unwrap()
            .into_iter()
            .map(|p| p.id)
            .collect();
        assert_eq!(ids, vec![part_id(1), part_id(2), part_id(3)]);

        store.clear().await;
        assert!(store.list().await.unwrap().is_empty());
    }
}
