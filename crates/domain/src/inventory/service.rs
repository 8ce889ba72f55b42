//! Part service enforcing the inventory rules on top of a part store.

use part_store::{Part, PartId, PartStore, PartStoreExt};

use crate::error::InventoryError;

use super::Operation;

/// Result type for inventory operations.
pub type Result<T> = std::result::Result<T, InventoryError>;

/// Service for managing parts in the warehouse.
///
/// Owns every business rule: an identity is stored at most once, new parts
/// start at quantity zero, quantities never go negative, and only empty
/// parts can be deleted. Each write is a read, a check, and a write guarded
/// by the version that was read, so a concurrent change to the same part
/// surfaces as [`InventoryError::Conflict`] instead of a lost update.
pub struct PartService<S: PartStore> {
    store: S,
}

impl<S: PartStore> PartService<S> {
    /// Creates a new part service with the given store.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Returns a reference to the underlying part store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Lists every part in the warehouse.
    ///
    /// An empty warehouse is reported as `NotFound` rather than an empty list.
    #[tracing::instrument(skip(self))]
    pub async fn list(&self) -> Result<Vec<Part>> {
        Operation::List.observe(self.list_parts().await)
    }

    /// Loads a part by its composite id.
    #[tracing::instrument(skip(self))]
    pub async fn get(&self, id: &PartId) -> Result<Part> {
        Operation::Get.observe(self.get_part(id).await)
    }

    /// Adds a new part with an initial quantity of zero.
    ///
    /// This is the only way a part comes into existence.
    #[tracing::instrument(skip(self))]
    pub async fn add(&self, id: PartId) -> Result<Part> {
        Operation::Add.observe(self.add_part(id).await)
    }

    /// Deletes a part, provided its quantity is zero.
    #[tracing::instrument(skip(self))]
    pub async fn delete(&self, id: &PartId) -> Result<()> {
        Operation::Delete.observe(self.delete_part(id).await)
    }

    /// Increases the quantity of a part by `amount`, which must be at least 1.
    #[tracing::instrument(skip(self))]
    pub async fn increase(&self, id: &PartId, amount: i64) -> Result<Part> {
        Operation::Increase.observe(self.increase_quantity(id, amount).await)
    }

    /// Decreases the quantity of a part by `amount`, never below zero.
    #[tracing::instrument(skip(self))]
    pub async fn decrease(&self, id: &PartId, amount: i64) -> Result<Part> {
        Operation::Decrease.observe(self.decrease_quantity(id, amount).await)
    }

    async fn list_parts(&self) -> Result<Vec<Part>> {
        let parts = self.store.list().await?;
        tracing::info!(count = parts.len(), "retrieved parts from inventory");
        if parts.is_empty() {
            return Err(InventoryError::NotFound(
                "No parts found in the warehouse".to_string(),
            ));
        }
        Ok(parts)
    }

    async fn get_part(&self, id: &PartId) -> Result<Part> {
        let part = self.load(id, None).await?;
        tracing::info!(%id, "retrieved part");
        Ok(part)
    }

    async fn add_part(&self, id: PartId) -> Result<Part> {
        id.validate()
            .map_err(|e| InventoryError::InvalidArgument(e.to_string()))?;

        if self.store.exists(&id).await? {
            tracing::warn!(%id, "cannot add part because it already exists");
            return Err(InventoryError::AlreadyExists(format!(
                "Cannot add part '{id}' because it already exists"
            )));
        }

        let saved = self.store.insert(Part::new(id)).await?;
        tracing::info!(id = %saved.id, quantity = saved.quantity, "added new part");
        Ok(saved)
    }

    async fn delete_part(&self, id: &PartId) -> Result<()> {
        let part = self.load(id, None).await?;

        if part.quantity != 0 {
            tracing::warn!(%id, quantity = part.quantity, "cannot delete part with non-zero quantity");
            return Err(InventoryError::Conflict(format!(
                "Cannot delete part '{id}' because quantity is '{}' (not zero)",
                part.quantity
            )));
        }

        self.store.delete(id, part.version).await?;
        tracing::info!(%id, "deleted part from inventory");
        Ok(())
    }

    async fn increase_quantity(&self, id: &PartId, amount: i64) -> Result<Part> {
        let part = self.load(id, Some(Operation::Increase)).await?;
        check_amount(id, amount, Operation::Increase)?;

        let quantity = part.quantity.checked_add(amount).ok_or_else(|| {
            InventoryError::InvalidArgument(format!(
                "Amount '{amount}' would overflow the quantity of part '{id}'"
            ))
        })?;

        let saved = self
            .store
            .update(part.with_quantity(quantity), part.version)
            .await?;
        tracing::info!(%id, amount, quantity = saved.quantity, "increased part quantity");
        Ok(saved)
    }

    async fn decrease_quantity(&self, id: &PartId, amount: i64) -> Result<Part> {
        let part = self.load(id, Some(Operation::Decrease)).await?;
        check_amount(id, amount, Operation::Decrease)?;

        if amount > part.quantity {
            tracing::warn!(%id, amount, quantity = part.quantity, "insufficient quantity to subtract");
            return Err(InventoryError::Conflict(format!(
                "Cannot subtract '{amount}' from part '{id}' because current quantity is only '{}'",
                part.quantity
            )));
        }

        let saved = self
            .store
            .update(part.with_quantity(part.quantity - amount), part.version)
            .await?;
        tracing::info!(%id, amount, quantity = saved.quantity, "decreased part quantity");
        Ok(saved)
    }

    async fn load(&self, id: &PartId, during: Option<Operation>) -> Result<Part> {
        match self.store.find(id).await? {
            Some(part) => Ok(part),
            None => {
                tracing::warn!(%id, "part not found");
                let message = match during {
                    Some(op) => format!("Part with ID '{id}' not found ({} operation)", op.as_str()),
                    None => format!("Part with ID '{id}' not found"),
                };
                Err(InventoryError::NotFound(message))
            }
        }
    }
}

fn check_amount(id: &PartId, amount: i64, during: Operation) -> Result<()> {
    if amount < 1 {
        return Err(InventoryError::InvalidArgument(format!(
            "Amount must be greater than 0 for part '{id}' (during {} operation)",
            during.as_str()
        )));
    }
    Ok(())
}
