//! Storage for part records.
//!
//! Provides the [`PartStore`] trait with an in-memory implementation for
//! tests and local runs and a PostgreSQL implementation for production.

pub mod error;
pub mod memory;
pub mod part;
pub mod postgres;
pub mod store;

pub use common::PartId;
pub use error::{Result, StoreError};
pub use memory::InMemoryPartStore;
pub use part::{Part, Version};
pub use postgres::PostgresPartStore;
pub use store::{PartStore, PartStoreExt};

// Callers build connection pools through this re-export.
pub use sqlx;
