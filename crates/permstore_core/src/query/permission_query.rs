//! Permission-specific filters.

use super::compiler::text_values;
use super::{
    require_non_empty, require_non_empty_list, Filter, Predicate, Query, QueryValidationError,
};
use crate::model::permission::{PermissionColumn, PermissionStatus};
use crate::model::Column;
use rusqlite::types::Value;

/// Query over the permission table.
pub type PermissionQuery = Query<PermissionFilter>;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PermissionFilter {
    pub status: Option<PermissionStatus>,
    pub status_in: Option<Vec<PermissionStatus>>,
    pub handle: Option<String>,
    /// Case-insensitive substring of `title`.
    pub title_like: Option<String>,
}

impl Filter for PermissionFilter {
    type Column = PermissionColumn;

    fn validate(&self) -> Result<(), QueryValidationError> {
        require_non_empty_list("status_in", self.status_in.as_deref())?;
        require_non_empty("handle", self.handle.as_deref())?;
        require_non_empty("title_like", self.title_like.as_deref())
    }

    fn equality_predicates(&self, out: &mut Vec<Predicate>) {
        let status = PermissionColumn::Status.name();
        if let Some(value) = self.status {
            out.push(Predicate::Eq(
                status,
                Value::Text(value.as_str().to_string()),
            ));
        }
        if let Some(values) = &self.status_in {
            let values: Vec<String> = values.iter().map(|s| s.as_str().to_string()).collect();
            out.push(Predicate::In(status, text_values(&values)));
        }
        if let Some(handle) = &self.handle {
            out.push(Predicate::Eq(
                PermissionColumn::Handle.name(),
                Value::Text(handle.clone()),
            ));
        }
    }

    fn like_predicates(&self, out: &mut Vec<Predicate>) {
        if let Some(needle) = &self.title_like {
            out.push(Predicate::ContainsIgnoreCase(
                PermissionColumn::Title.name(),
                needle.clone(),
            ));
        }
    }
}

impl PermissionQuery {
    pub fn with_status(mut self, status: PermissionStatus) -> Self {
        self.filter.status = Some(status);
        self
    }

    pub fn with_status_in(mut self, statuses: Vec<PermissionStatus>) -> Self {
        self.filter.status_in = Some(statuses);
        self
    }

    pub fn with_handle(mut self, handle: impl Into<String>) -> Self {
        self.filter.handle = Some(handle.into());
        self
    }

    pub fn with_title_like(mut self, needle: impl Into<String>) -> Self {
        self.filter.title_like = Some(needle.into());
        self
    }
}
