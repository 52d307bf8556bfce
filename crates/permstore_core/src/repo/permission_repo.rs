//! Permission repository contract and SQLite implementation.
//!
//! # Invariants
//! - Find operations return at most one alive row.
//! - `soft_delete_permission_by_id` on a missing or already deleted id is
//!   `RepoError::NotFound`.

use super::common::TableAccess;
use super::{require_value, RepoError, RepoResult};
use crate::model::permission::Permission;
use crate::model::Entity;
use crate::query::PermissionQuery;
use crate::store::PermissionStore;
use rusqlite::Connection;

/// Repository interface for permission records.
pub trait PermissionRepository {
    fn count_permissions(&self, query: &PermissionQuery) -> RepoResult<i64>;
    fn create_permission(&self, permission: &mut Permission) -> RepoResult<()>;
    fn delete_permission(&self, permission: &Permission) -> RepoResult<()>;
    fn delete_permission_by_id(&self, id: &str) -> RepoResult<()>;
    fn find_permission_by_handle(&self, handle: &str) -> RepoResult<Option<Permission>>;
    fn find_permission_by_id(&self, id: &str) -> RepoResult<Option<Permission>>;
    fn list_permissions(&self, query: &PermissionQuery) -> RepoResult<Vec<Permission>>;
    fn soft_delete_permission(&self, permission: &mut Permission) -> RepoResult<()>;
    fn soft_delete_permission_by_id(&self, id: &str) -> RepoResult<()>;
    fn update_permission(&self, permission: &mut Permission) -> RepoResult<()>;
}

/// SQLite-backed permission repository bound to one connection or transaction.
pub struct SqlitePermissionRepository<'a> {
    table: TableAccess<'a>,
}

impl<'a> SqlitePermissionRepository<'a> {
    pub fn new(store: &'a PermissionStore, conn: &'a Connection) -> Self {
        Self {
            table: TableAccess::new(
                conn,
                &store.options().permission_table_name,
                store.is_debug_enabled(),
            ),
        }
    }

    fn find_first(&self, query: PermissionQuery) -> RepoResult<Option<Permission>> {
        Ok(self
            .list_permissions(&query.with_limit(1))?
            .into_iter()
            .next())
    }
}

impl PermissionRepository for SqlitePermissionRepository<'_> {
    fn count_permissions(&self, query: &PermissionQuery) -> RepoResult<i64> {
        self.table.count(query)
    }

    fn create_permission(&self, permission: &mut Permission) -> RepoResult<()> {
        self.table.insert(permission)
    }

    fn delete_permission(&self, permission: &Permission) -> RepoResult<()> {
        self.delete_permission_by_id(permission.id())
    }

    fn delete_permission_by_id(&self, id: &str) -> RepoResult<()> {
        self.table.delete_by_id::<Permission>(id)
    }

    fn find_permission_by_handle(&self, handle: &str) -> RepoResult<Option<Permission>> {
        require_value(Permission::KIND, "handle", handle)?;
        self.find_first(PermissionQuery::new().with_handle(handle))
    }

    fn find_permission_by_id(&self, id: &str) -> RepoResult<Option<Permission>> {
        require_value(Permission::KIND, "id", id)?;
        self.find_first(PermissionQuery::new().with_id(id))
    }

    fn list_permissions(&self, query: &PermissionQuery) -> RepoResult<Vec<Permission>> {
        self.table.list(query)
    }

    fn soft_delete_permission(&self, permission: &mut Permission) -> RepoResult<()> {
        self.table.soft_delete(permission)
    }

    fn soft_delete_permission_by_id(&self, id: &str) -> RepoResult<()> {
        let mut permission = self
            .find_permission_by_id(id)?
            .ok_or_else(|| RepoError::NotFound {
                entity: Permission::KIND,
                id: id.to_string(),
            })?;
        self.soft_delete_permission(&mut permission)
    }

    fn update_permission(&self, permission: &mut Permission) -> RepoResult<()> {
        self.table.update(permission)
    }
}
