//! Change-tracked entity model for permissions and their entity links.
//!
//! # Responsibility
//! - Define typed column sets per entity kind.
//! - Track which columns changed since the last clean checkpoint.
//! - Provide the shared soft-delete and metas accessors.
//!
//! # Invariants
//! - Every entity gets a generated stable `id` on construction.
//! - A fresh entity is clean and alive (`soft_deleted_at == MAX_DATETIME`).
//! - Deletion is a timestamp, not row removal, on the normal path.

use crate::clock;
use chrono::NaiveDateTime;
use serde::Serialize;
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Debug, Display, Formatter};
use std::hash::Hash;

pub mod entity_permission;
pub mod metas;
pub mod permission;
pub mod record;

pub use metas::Metas;
pub use record::TrackedRecord;

/// Typed column set of one table.
pub trait Column: Copy + Ord + Hash + Debug + Serialize + 'static {
    /// Every column, in DDL order.
    const ALL: &'static [Self];
    const ID: Self;
    const MEMO: Self;
    const METAS: Self;
    const CREATED_AT: Self;
    const UPDATED_AT: Self;
    const SOFT_DELETED_AT: Self;

    /// Column name as stored.
    fn name(self) -> &'static str;

    fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|column| column.name() == name)
    }
}

/// Error raised when an entity is missing a value an operation requires.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    EmptyField {
        entity: &'static str,
        field: &'static str,
    },
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyField { entity, field } => write!(f, "{entity} {field} is empty"),
        }
    }
}

impl Error for ValidationError {}

/// Behaviour shared by every change-tracked entity kind.
pub trait Entity: Sized {
    type Column: Column;

    /// Kind name used in errors and log events.
    const KIND: &'static str;

    fn record(&self) -> &TrackedRecord<Self::Column>;

    fn record_mut(&mut self) -> &mut TrackedRecord<Self::Column>;

    /// Wraps a hydrated record, rejecting persisted state the kind cannot hold.
    fn from_record(record: TrackedRecord<Self::Column>) -> Result<Self, String>;

    /// Hydrates a clean entity from a name-keyed row.
    fn from_existing_data(row: BTreeMap<String, String>) -> Result<Self, String> {
        let record = TrackedRecord::from_row(row)
            .map_err(|name| format!("unknown {} column `{name}`", Self::KIND))?;
        Self::from_record(record)
    }

    fn get(&self, column: Self::Column) -> &str {
        self.record().get(column)
    }

    fn set(&mut self, column: Self::Column, value: impl Into<String>) -> &mut Self {
        self.record_mut().set(column, value);
        self
    }

    fn data(&self) -> BTreeMap<Self::Column, String> {
        self.record().data()
    }

    fn data_changed(&self) -> BTreeMap<Self::Column, String> {
        self.record().data_changed()
    }

    fn mark_as_not_dirty(&mut self) {
        self.record_mut().mark_as_not_dirty();
    }

    fn id(&self) -> &str {
        self.get(Self::Column::ID)
    }

    fn set_id(&mut self, id: impl Into<String>) -> &mut Self {
        self.set(Self::Column::ID, id)
    }

    fn memo(&self) -> &str {
        self.get(Self::Column::MEMO)
    }

    fn set_memo(&mut self, memo: impl Into<String>) -> &mut Self {
        self.set(Self::Column::MEMO, memo)
    }

    fn metas(&self) -> serde_json::Result<Metas> {
        self.record().metas()
    }

    fn meta(&self, name: &str) -> String {
        self.record().meta(name)
    }

    fn set_meta(
        &mut self,
        name: impl Into<String>,
        value: impl Into<String>,
    ) -> serde_json::Result<()> {
        let mut single = Metas::new();
        single.insert(name.into(), value.into());
        self.upsert_metas(single)
    }

    /// Replaces every meta value.
    fn set_metas(&mut self, metas: &Metas) -> serde_json::Result<()> {
        self.record_mut().set_metas(metas)
    }

    fn upsert_metas(&mut self, metas: Metas) -> serde_json::Result<()> {
        self.record_mut().upsert_metas(metas)
    }

    fn created_at(&self) -> &str {
        self.get(Self::Column::CREATED_AT)
    }

    fn created_at_datetime(&self) -> Option<NaiveDateTime> {
        clock::parse_datetime(self.created_at())
    }

    fn set_created_at(&mut self, created_at: impl Into<String>) -> &mut Self {
        self.set(Self::Column::CREATED_AT, created_at)
    }

    fn updated_at(&self) -> &str {
        self.get(Self::Column::UPDATED_AT)
    }

    fn updated_at_datetime(&self) -> Option<NaiveDateTime> {
        clock::parse_datetime(self.updated_at())
    }

    fn set_updated_at(&mut self, updated_at: impl Into<String>) -> &mut Self {
        self.set(Self::Column::UPDATED_AT, updated_at)
    }

    fn soft_deleted_at(&self) -> &str {
        self.get(Self::Column::SOFT_DELETED_AT)
    }

    fn soft_deleted_at_datetime(&self) -> Option<NaiveDateTime> {
        clock::parse_datetime(self.soft_deleted_at())
    }

    fn set_soft_deleted_at(&mut self, soft_deleted_at: impl Into<String>) -> &mut Self {
        self.set(Self::Column::SOFT_DELETED_AT, soft_deleted_at)
    }

    /// True once `soft_deleted_at` lies before the current instant.
    fn is_soft_deleted(&self) -> bool {
        clock::is_past(self.soft_deleted_at())
    }
}

/// Seeds the columns every fresh entity starts with and marks it clean.
pub(crate) fn init_fresh<E: Entity>(entity: &mut E) {
    let now = clock::now_datetime();
    entity
        .set_id(uuid::Uuid::new_v4().to_string())
        .set_memo("")
        .set_created_at(now.clone())
        .set_updated_at(now)
        .set_soft_deleted_at(clock::MAX_DATETIME)
        .set(E::Column::METAS, "{}");
    entity.mark_as_not_dirty();
}
