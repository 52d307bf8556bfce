//! Permission domain model.
//!
//! # Invariants
//! - `status` defaults to `inactive` and is a plain attribute; no transition
//!   rules are enforced.
//! - Persisted rows carrying an unknown status are rejected on hydration.

use super::{init_fresh, Column, Entity, TrackedRecord};
use serde::Serialize;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Columns of the permission table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PermissionColumn {
    Id,
    Status,
    Handle,
    Title,
    Metas,
    Memo,
    CreatedAt,
    UpdatedAt,
    SoftDeletedAt,
}

impl Column for PermissionColumn {
    const ALL: &'static [Self] = &[
        Self::Id,
        Self::Status,
        Self::Handle,
        Self::Title,
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
            Self::Status => "status",
            Self::Handle => "handle",
            Self::Title => "title",
            Self::Metas => "metas",
            Self::Memo => "memo",
            Self::CreatedAt => "created_at",
            Self::UpdatedAt => "updated_at",
            Self::SoftDeletedAt => "soft_deleted_at",
        }
    }
}

/// Permission lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PermissionStatus {
    Active,
    Inactive,
    Deleted,
}

impl PermissionStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Inactive => "inactive",
            Self::Deleted => "deleted",
        }
    }
}

impl Display for PermissionStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PermissionStatus {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "active" => Ok(Self::Active),
            "inactive" => Ok(Self::Inactive),
            "deleted" => Ok(Self::Deleted),
            other => Err(format!("unknown permission status `{other}`")),
        }
    }
}

/// A standalone permission definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Permission {
    record: TrackedRecord<PermissionColumn>,
}

impl Default for Permission {
    fn default() -> Self {
        Self::new()
    }
}

impl Permission {
    /// Creates an inactive, alive permission with a generated id.
    pub fn new() -> Self {
        let mut permission = Self {
            record: TrackedRecord::default(),
        };
        permission.set_status(PermissionStatus::Inactive);
        init_fresh(&mut permission);
        permission
    }

    /// Parsed status; `None` when the column is empty or unrecognised.
    pub fn status(&self) -> Option<PermissionStatus> {
        self.get(PermissionColumn::Status).parse().ok()
    }

    pub fn set_status(&mut self, status: PermissionStatus) -> &mut Self {
        self.set(PermissionColumn::Status, status.as_str())
    }

    pub fn is_active(&self) -> bool {
        self.status() == Some(PermissionStatus::Active)
    }

    pub fn is_inactive(&self) -> bool {
        self.status() == Some(PermissionStatus::Inactive)
    }

    pub fn handle(&self) -> &str {
        self.get(PermissionColumn::Handle)
    }

    pub fn set_handle(&mut self, handle: impl Into<String>) -> &mut Self {
        self.set(PermissionColumn::Handle, handle)
    }

    pub fn title(&self) -> &str {
        self.get(PermissionColumn::Title)
    }

    pub fn set_title(&mut self, title: impl Into<String>) -> &mut Self {
        self.set(PermissionColumn::Title, title)
    }
}

impl Entity for Permission {
    type Column = PermissionColumn;

    const KIND: &'static str = "permission";

    fn record(&self) -> &TrackedRecord<PermissionColumn> {
        &self.record
    }

    fn record_mut(&mut self) -> &mut TrackedRecord<PermissionColumn> {
        &mut self.record
    }

    fn from_record(record: TrackedRecord<PermissionColumn>) -> Result<Self, String> {
        if record.contains(PermissionColumn::Status) {
            let status = record.get(PermissionColumn::Status);
            status
                .parse::<PermissionStatus>()
                .map_err(|err| format!("{err} in permission.status"))?;
        }
        Ok(Self { record })
    }
}
