//! Change-tracked column storage shared by every entity kind.
//!
//! # Invariants
//! - `values` is the canonical state; `changed` only ever names columns whose
//!   value differs from the last clean checkpoint.
//! - A clean checkpoint happens on hydration and on `mark_as_not_dirty`.

use super::metas::{decode_metas, encode_metas, Metas};
use super::Column;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

/// Column values of one row plus the set of columns changed since clean.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct TrackedRecord<C: Column> {
    values: BTreeMap<C, String>,
    #[serde(skip)]
    changed: BTreeSet<C>,
}

impl<C: Column> Default for TrackedRecord<C> {
    fn default() -> Self {
        Self {
            values: BTreeMap::new(),
            changed: BTreeSet::new(),
        }
    }
}

impl<C: Column> TrackedRecord<C> {
    /// Builds a clean record from already-persisted values.
    pub fn from_values(values: BTreeMap<C, String>) -> Self {
        Self {
            values,
            changed: BTreeSet::new(),
        }
    }

    /// Builds a clean record from a name-keyed row.
    ///
    /// Returns the offending column name when the row carries a column this
    /// entity kind does not know.
    pub fn from_row(row: BTreeMap<String, String>) -> Result<Self, String> {
        let mut values = BTreeMap::new();
        for (name, value) in row {
            let column = C::from_name(&name).ok_or(name)?;
            values.insert(column, value);
        }
        Ok(Self::from_values(values))
    }

    /// Current value of `column`, empty when never set.
    pub fn get(&self, column: C) -> &str {
        self.values.get(&column).map_or("", String::as_str)
    }

    /// Whether `column` holds a value at all (projected rows may not).
    pub fn contains(&self, column: C) -> bool {
        self.values.contains_key(&column)
    }

    /// Stores `value`, recording `column` as changed when the value differs
    /// from the current one or the column was absent.
    pub fn set(&mut self, column: C, value: impl Into<String>) {
        let value = value.into();
        if self.values.get(&column) != Some(&value) {
            self.changed.insert(column);
        }
        self.values.insert(column, value);
    }

    /// Full canonical mapping.
    pub fn data(&self) -> BTreeMap<C, String> {
        self.values.clone()
    }

    /// Columns changed since the last clean checkpoint with their values.
    pub fn data_changed(&self) -> BTreeMap<C, String> {
        self.changed
            .iter()
            .map(|column| (*column, self.get(*column).to_string()))
            .collect()
    }

    pub fn is_dirty(&self) -> bool {
        !self.changed.is_empty()
    }

    /// Clears the changed set without touching values.
    pub fn mark_as_not_dirty(&mut self) {
        self.changed.clear();
    }

    /// Decodes the metas column. An empty column decodes to an empty map.
    pub fn metas(&self) -> serde_json::Result<Metas> {
        decode_metas(self.get(C::METAS))
    }

    /// Single meta value, empty when absent or undecodable.
    pub fn meta(&self, name: &str) -> String {
        self.metas()
            .ok()
            .and_then(|mut metas| metas.remove(name))
            .unwrap_or_default()
    }

    /// Replaces the whole metas map.
    pub fn set_metas(&mut self, metas: &Metas) -> serde_json::Result<()> {
        let encoded = encode_metas(metas)?;
        self.set(C::METAS, encoded);
        Ok(())
    }

    /// Merges `metas` over the current map and rewrites the column.
    pub fn upsert_metas(&mut self, metas: Metas) -> serde_json::Result<()> {
        let mut current = self.metas()?;
        current.extend(metas);
        self.set_metas(&current)
    }
}

#[cfg(test)]
mod tests {
    use super::TrackedRecord;
    use crate::model::permission::PermissionColumn;
    use std::collections::BTreeMap;

    #[test]
    fn set_tracks_only_real_changes() {
        let mut record = TrackedRecord::<PermissionColumn>::default();
        record.set(PermissionColumn::Title, "a");
        assert!(record.data_changed().contains_key(&PermissionColumn::Title));

        record.mark_as_not_dirty();
        assert!(record.data_changed().is_empty());
        assert_eq!(record.get(PermissionColumn::Title), "a");

        record.set(PermissionColumn::Title, "a");
        assert!(!record.is_dirty());

        record.set(PermissionColumn::Title, "b");
        assert_eq!(
            record
                .data_changed()
                .get(&PermissionColumn::Title)
                .map(String::as_str),
            Some("b")
        );
        assert_eq!(record.data()[&PermissionColumn::Title], "b");
    }

    #[test]
    fn setting_absent_column_to_empty_is_a_change() {
        let mut record = TrackedRecord::<PermissionColumn>::default();
        record.set(PermissionColumn::Memo, "");
        assert!(record.is_dirty());
    }

    #[test]
    fn from_row_rejects_unknown_columns_and_starts_clean() {
        let mut row = BTreeMap::new();
        row.insert("title".to_string(), "x".to_string());
        let record = TrackedRecord::<PermissionColumn>::from_row(row.clone()).unwrap();
        assert!(!record.is_dirty());
        assert!(!record.contains(PermissionColumn::Handle));

        row.insert("bogus".to_string(), "y".to_string());
        let err = TrackedRecord::<PermissionColumn>::from_row(row).unwrap_err();
        assert_eq!(err, "bogus");
    }

    #[test]
    fn metas_merge_and_replace() {
        let mut record = TrackedRecord::<PermissionColumn>::default();
        assert!(record.metas().unwrap().is_empty());

        record
            .upsert_metas([("a".to_string(), "1".to_string())].into())
            .unwrap();
        record
            .upsert_metas([("b".to_string(), "2".to_string())].into())
            .unwrap();
        assert_eq!(record.meta("a"), "1");
        assert_eq!(record.meta("b"), "2");
        assert_eq!(record.meta("missing"), "");

        record
            .set_metas(&[("c".to_string(), "3".to_string())].into())
            .unwrap();
        assert_eq!(record.meta("a"), "");
        assert_eq!(record.meta("c"), "3");
    }

    #[test]
    fn corrupt_metas_read_as_empty_value_but_fail_upsert() {
        let mut record = TrackedRecord::<PermissionColumn>::default();
        record.set(PermissionColumn::Metas, "{not json");
        assert_eq!(record.meta("a"), "");
        assert!(record.metas().is_err());
        assert!(record.upsert_metas(Default::default()).is_err());
    }
}
