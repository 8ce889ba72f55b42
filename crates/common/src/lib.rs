//! Shared types for the warehouse parts inventory service.

pub mod types;

pub use types::{IdentityErrors, MAX_FIELD_LEN, PartId};
