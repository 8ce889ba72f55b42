use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Maximum length, in characters, of each identity field.
pub const MAX_FIELD_LEN: usize = 50;

/// Composite identifier of a part in the warehouse.
///
/// A part is identified by all three of its numbers together; two ids are
/// equal only when every field matches. Ordering and hashing are structural
/// so the id can key both hashed and ordered maps.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PartId {
    material_number: String,
    serial_number: String,
    supplier_number: String,
}

impl PartId {
    /// Creates a part ID without validating its fields.
    ///
    /// Intended for trusted sources such as rows already in the store.
    pub fn new(
        material_number: impl Into<String>,
        serial_number: impl Into<String>,
        supplier_number: impl Into<String>,
    ) -> Self {
        Self {
            material_number: material_number.into(),
            serial_number: serial_number.into(),
            supplier_number: supplier_number.into(),
        }
    }

    /// Creates a part ID, checking that every field is non-blank and at most
    /// [`MAX_FIELD_LEN`] characters long.
    pub fn parse(
        material_number: impl Into<String>,
        serial_number: impl Into<String>,
        supplier_number: impl Into<String>,
    ) -> Result<Self, IdentityErrors> {
        let id = Self::new(material_number, serial_number, supplier_number);
        id.validate()?;
        Ok(id)
    }

    /// Checks the field constraints on an already constructed ID.
    ///
    /// Used for IDs that arrive through deserialization.
    pub fn validate(&self) -> Result<(), IdentityErrors> {
        let mut errors = IdentityErrors::default();
        errors.check("materialNumber", &self.material_number);
        errors.check("serialNumber", &self.serial_number);
        errors.check("supplierNumber", &self.supplier_number);

        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }

    pub fn material_number(&self) -> &str {
        &self.material_number
    }

    pub fn serial_number(&self) -> &str {
        &self.serial_number
    }

    pub fn supplier_number(&self) -> &str {
        &self.supplier_number
    }
}

impl std::fmt::Display for PartId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "PartId{{materialNumber='{}', serialNumber='{}', supplierNumber='{}'}}",
            self.material_number, self.serial_number, self.supplier_number
        )
    }
}

/// Field-level validation failures for a [`PartId`], keyed by the camelCase
/// field name used on the wire.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IdentityErrors {
    fields: BTreeMap<String, String>,
}

impl IdentityErrors {
    fn check(&mut self, field: &str, value: &str) {
        if value.trim().is_empty() {
            self.fields
                .insert(field.to_string(), "must not be blank".to_string());
        } else if value.chars().count() > MAX_FIELD_LEN {
            self.fields.insert(
                field.to_string(),
                format!("size must be between 1 and {MAX_FIELD_LEN}"),
            );
        }
    }

    /// Returns true if no field failed validation.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Returns the message recorded for a field, if any.
    pub fn get(&self, field: &str) -> Option<&str> {
        self.fields.get(field).map(String::as_str)
    }

    /// Returns the field-to-message map.
    pub fn fields(&self) -> &BTreeMap<String, String> {
        &self.fields
    }

    /// Consumes the errors, returning the field-to-message map.
    pub fn into_fields(self) -> BTreeMap<String, String> {
        self.fields
    }
}

impl std::fmt::Display for IdentityErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Invalid part identity:")?;
        for (field, message) in &self.fields {
            write!(f, " {field} {message};")?;
        }
        Ok(())
    }
}

impl std::error::Error for IdentityErrors {}
