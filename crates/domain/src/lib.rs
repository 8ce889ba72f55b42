//! Domain layer for the warehouse parts inventory.
//!
//! This crate owns the inventory rules:
//! - a part is identified by its full composite [`PartId`]
//! - parts are created only through [`PartService::add`], at quantity zero
//! - quantities never go negative
//! - only parts with zero quantity can be deleted

pub mod error;
pub mod inventory;

pub use error::InventoryError;
pub use inventory::{Operation, PartService};
pub use part_store::{Part, PartId, Version};
