//! Store construction options.
//!
//! # Invariants
//! - Both table names are required, distinct, and plain SQL identifiers.

use crate::db::is_plain_identifier;

pub const DEFAULT_PERMISSION_TABLE: &str = "permissions_permission";
pub const DEFAULT_ENTITY_PERMISSION_TABLE: &str = "permissions_entity_permission";

/// Options for `PermissionStore::try_new`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreOptions {
    /// Table holding permission definitions.
    pub permission_table_name: String,
    /// Table holding entity-to-permission links.
    pub entity_permission_table_name: String,
    /// Create missing tables during construction.
    pub automigrate_enabled: bool,
    /// Log every statement and its parameters at `debug`.
    pub debug_enabled: bool,
}

impl Default for StoreOptions {
    fn default() -> Self {
        Self {
            permission_table_name: DEFAULT_PERMISSION_TABLE.to_string(),
            entity_permission_table_name: DEFAULT_ENTITY_PERMISSION_TABLE.to_string(),
            automigrate_enabled: false,
            debug_enabled: false,
        }
    }
}

impl StoreOptions {
    /// Returns a human-readable reason when the options cannot build a store.
    pub fn validate(&self) -> Result<(), String> {
        for (field, value) in [
            ("permission_table_name", &self.permission_table_name),
            (
                "entity_permission_table_name",
                &self.entity_permission_table_name,
            ),
        ] {
            if value.trim().is_empty() {
                return Err(format!("{field} is required"));
            }
            if !is_plain_identifier(value) {
                return Err(format!("{field} `{value}` is not a plain sql identifier"));
            }
        }

        if self.permission_table_name == self.entity_permission_table_name {
            return Err(format!(
                "permission and entity permission tables must differ, both are `{}`",
                self.permission_table_name
            ));
        }

        Ok(())
    }
}
