//! Warehouse inventory: the part service and its operations.

mod service;

pub use service::{PartService, Result};

use crate::error::InventoryError;

/// The operations the part service exposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    List,
    Get,
    Add,
    Delete,
    Increase,
    Decrease,
}

impl Operation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::List => "list",
            Operation::Get => "get",
            Operation::Add => "add",
            Operation::Delete => "delete",
            Operation::Increase => "increase",
            Operation::Decrease => "decrease",
        }
    }

    /// Counts the outcome of one invocation and passes the result through.
    pub(crate) fn observe<T>(self, result: Result<T>) -> Result<T> {
        let outcome = match &result {
            Ok(_) => "ok",
            Err(err) => err.kind(),
        };
        if let Err(InventoryError::Store(err)) = &result {
            tracing::error!(operation = self.as_str(), error = %err, "part store failure");
        }

        metrics::counter!(
            "inventory_operations_total",
            "operation" => self.as_str(),
            "outcome" => outcome
        )
        .increment(1);

        result
    }
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
