//! Entity-to-permission association model.
//!
//! # Invariants
//! - `(entity_type, entity_id, permission_id)` is unique among alive rows;
//!   the repository checks this before insert.
//! - `permission_id` is not a foreign key at this layer.

use super::{init_fresh, Column, Entity, TrackedRecord};
use serde::Serialize;

/// Columns of the entity-permission table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityPermissionColumn {
    Id,
    EntityType,
    EntityId,
    PermissionId,
    Metas,
    Memo,
    CreatedAt,
    UpdatedAt,
    SoftDeletedAt,
}

impl Column for EntityPermissionColumn {
    const ALL: &'static [Self] = &[
        Self::Id,
        Self::EntityType,
        Self::EntityId,
        Self::PermissionId,
        Self::Metas,
        Self::Memo,
        Self::CreatedAt,
        Self::UpdatedAt,
        Self::SoftDeletedAt,
    ];
    const ID: Self = Self::Id;
    const MEMO: Self = Self::Memo;
    const METAS: Self = Self::Metas;
    const CREATED_AT: Self = Self::CreatedAt;
    const UPDATED_AT: Self = Self::UpdatedAt;
    const SOFT_DELETED_AT: Self = Self::SoftDeletedAt;

    fn name(self) -> &'static str {
        match self {
            Self::Id => "id",
            Self::EntityType => "entity_type",
            Self::EntityId => "entity_id",
            Self::PermissionId => "permission_id",
            Self::Metas => "metas",
            Self::Memo => "memo",
            Self::CreatedAt => "created_at",
            Self::UpdatedAt => "updated_at",
            Self::SoftDeletedAt => "soft_deleted_at",
        }
    }
}

/// Link between an external entity (type + id) and a permission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct EntityPermission {
    record: TrackedRecord<EntityPermissionColumn>,
}

impl Default for EntityPermission {
    fn default() -> Self {
        Self::new()
    }
}

impl EntityPermission {
    /// Creates an alive association with a generated id and no endpoints.
    pub fn new() -> Self {
        let mut link = Self {
            record: TrackedRecord::default(),
        };
        init_fresh(&mut link);
        link
    }

    /// Caller-defined category of the linked entity, e.g. `USER`.
    pub fn entity_type(&self) -> &str {
        self.get(EntityPermissionColumn::EntityType)
    }

    pub fn set_entity_type(&mut self, entity_type: impl Into<String>) -> &mut Self {
        self.set(EntityPermissionColumn::EntityType, entity_type)
    }

    pub fn entity_id(&self) -> &str {
        self.get(EntityPermissionColumn::EntityId)
    }

    pub fn set_entity_id(&mut self, entity_id: impl Into<String>) -> &mut Self {
        self.set(EntityPermissionColumn::EntityId, entity_id)
    }

    pub fn permission_id(&self) -> &str {
        self.get(EntityPermissionColumn::PermissionId)
    }

    pub fn set_permission_id(&mut self, permission_id: impl Into<String>) -> &mut Self {
        self.set(EntityPermissionColumn::PermissionId, permission_id)
    }
}

impl Entity for EntityPermission {
    type Column = EntityPermissionColumn;

    const KIND: &'static str = "entity permission";

    fn record(&self) -> &TrackedRecord<EntityPermissionColumn> {
        &self.record
    }

    fn record_mut(&mut self) -> &mut TrackedRecord<EntityPermissionColumn> {
        &mut self.record
    }

    fn from_record(record: TrackedRecord<EntityPermissionColumn>) -> Result<Self, String> {
        Ok(Self { record })
    }
}
