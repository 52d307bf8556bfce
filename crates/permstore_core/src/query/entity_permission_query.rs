//! Entity-permission-specific filters.

use super::{require_non_empty, Filter, Predicate, Query, QueryValidationError};
use crate::model::entity_permission::EntityPermissionColumn;
use crate::model::Column;
use rusqlite::types::Value;

/// Query over the entity-permission table.
pub type EntityPermissionQuery = Query<EntityPermissionFilter>;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntityPermissionFilter {
    pub entity_type: Option<String>,
    pub entity_id: Option<String>,
    pub permission_id: Option<String>,
    /// Case-insensitive substring of `memo`.
    pub memo_like: Option<String>,
}

impl Filter for EntityPermissionFilter {
    type Column = EntityPermissionColumn;

    fn validate(&self) -> Result<(), QueryValidationError> {
        require_non_empty("entity_type", self.entity_type.as_deref())?;
        require_non_empty("entity_id", self.entity_id.as_deref())?;
        require_non_empty("permission_id", self.permission_id.as_deref())?;
        require_non_empty("memo_like", self.memo_like.as_deref())
    }

    fn equality_predicates(&self, out: &mut Vec<Predicate>) {
        let fields = [
            (EntityPermissionColumn::EntityType, &self.entity_type),
            (EntityPermissionColumn::EntityId, &self.entity_id),
            (EntityPermissionColumn::PermissionId, &self.permission_id),
        ];
        for (column, value) in fields {
            if let Some(value) = value {
                out.push(Predicate::Eq(column.name(), Value::Text(value.clone())));
            }
        }
    }

    fn like_predicates(&self, out: &mut Vec<Predicate>) {
        if let Some(needle) = &self.memo_like {
            out.push(Predicate::ContainsIgnoreCase(
                EntityPermissionColumn::Memo.name(),
                needle.clone(),
            ));
        }
    }
}

impl EntityPermissionQuery {
    pub fn with_entity_type(mut self, entity_type: impl Into<String>) -> Self {
        self.filter.entity_type = Some(entity_type.into());
        self
    }

    pub fn with_entity_id(mut self, entity_id: impl Into<String>) -> Self {
        self.filter.entity_id = Some(entity_id.into());
        self
    }

    pub fn with_permission_id(mut self, permission_id: impl Into<String>) -> Self {
        self.filter.permission_id = Some(permission_id.into());
        self
    }

    pub fn with_memo_like(mut self, needle: impl Into<String>) -> Self {
        self.filter.memo_like = Some(needle.into());
        self
    }
}
