//! Entity-permission repository contract and SQLite implementation.
//!
//! # Invariants
//! - Create refuses a triple that already has an alive row. The check and the
//!   insert are separate statements, so concurrent creators under weak
//!   isolation can still both succeed; callers needing a hard guarantee must
//!   serialize creates (e.g. an IMMEDIATE transaction).

use super::common::TableAccess;
use super::{require_value, RepoError, RepoResult};
use crate::model::entity_permission::EntityPermission;
use crate::model::Entity;
use crate::query::EntityPermissionQuery;
use crate::store::PermissionStore;
use log::warn;
use rusqlite::Connection;

/// Repository interface for entity-to-permission links.
pub trait EntityPermissionRepository {
    fn count_entity_permissions(&self, query: &EntityPermissionQuery) -> RepoResult<i64>;
    fn create_entity_permission(&self, link: &mut EntityPermission) -> RepoResult<()>;
    fn delete_entity_permission(&self, link: &EntityPermission) -> RepoResult<()>;
    fn delete_entity_permission_by_id(&self, id: &str) -> RepoResult<()>;
    fn find_entity_permission_by_entity_and_permission(
        &self,
        entity_type: &str,
        entity_id: &str,
        permission_id: &str,
    ) -> RepoResult<Option<EntityPermission>>;
    fn find_entity_permission_by_id(&self, id: &str) -> RepoResult<Option<EntityPermission>>;
    fn list_entity_permissions(
        &self,
        query: &EntityPermissionQuery,
    ) -> RepoResult<Vec<EntityPermission>>;
    fn soft_delete_entity_permission(&self, link: &mut EntityPermission) -> RepoResult<()>;
    fn soft_delete_entity_permission_by_id(&self, id: &str) -> RepoResult<()>;
    fn update_entity_permission(&self, link: &mut EntityPermission) -> RepoResult<()>;
}

/// SQLite-backed entity-permission repository bound to one connection or
/// transaction.
pub struct SqliteEntityPermissionRepository<'a> {
    table: TableAccess<'a>,
}

impl<'a> SqliteEntityPermissionRepository<'a> {
    pub fn new(store: &'a PermissionStore, conn: &'a Connection) -> Self {
        Self {
            table: TableAccess::new(
                conn,
                &store.options().entity_permission_table_name,
                store.is_debug_enabled(),
            ),
        }
    }

    fn find_first(&self, query: EntityPermissionQuery) -> RepoResult<Option<EntityPermission>> {
        Ok(self
            .list_entity_permissions(&query.with_limit(1))?
            .into_iter()
            .next())
    }
}

impl EntityPermissionRepository for SqliteEntityPermissionRepository<'_> {
    fn count_entity_permissions(&self, query: &EntityPermissionQuery) -> RepoResult<i64> {
        self.table.count(query)
    }

    fn create_entity_permission(&self, link: &mut EntityPermission) -> RepoResult<()> {
        require_value(
            EntityPermission::KIND,
            "permission_id",
            link.permission_id(),
        )?;
        require_value(EntityPermission::KIND, "entity_id", link.entity_id())?;
        require_value(EntityPermission::KIND, "entity_type", link.entity_type())?;

        let existing = self.find_entity_permission_by_entity_and_permission(
            link.entity_type(),
            link.entity_id(),
            link.permission_id(),
        )?;
        if existing.is_some() {
            warn!(
                "event=entity_permission_create module=repo status=rejected error_code=duplicate entity_type={} entity_id={} permission_id={}",
                link.entity_type(),
                link.entity_id(),
                link.permission_id()
            );
            return Err(RepoError::Duplicate {
                entity_type: link.entity_type().to_string(),
                entity_id: link.entity_id().to_string(),
                permission_id: link.permission_id().to_string(),
            });
        }

        self.table.insert(link)
    }

    fn delete_entity_permission(&self, link: &EntityPermission) -> RepoResult<()> {
        self.delete_entity_permission_by_id(link.id())
    }

    fn delete_entity_permission_by_id(&self, id: &str) -> RepoResult<()> {
        self.table.delete_by_id::<EntityPermission>(id)
    }

    fn find_entity_permission_by_entity_and_permission(
        &self,
        entity_type: &str,
        entity_id: &str,
        permission_id: &str,
    ) -> RepoResult<Option<EntityPermission>> {
        require_value(EntityPermission::KIND, "entity_type", entity_type)?;
        require_value(EntityPermission::KIND, "entity_id", entity_id)?;
        require_value(EntityPermission::KIND, "permission_id", permission_id)?;

        self.find_first(
            EntityPermissionQuery::new()
                .with_entity_type(entity_type)
                .with_entity_id(entity_id)
                .with_permission_id(permission_id),
        )
    }

    fn find_entity_permission_by_id(&self, id: &str) -> RepoResult<Option<EntityPermission>> {
        require_value(EntityPermission::KIND, "id", id)?;
        self.find_first(EntityPermissionQuery::new().with_id(id))
    }

    fn list_entity_permissions(
        &self,
        query: &EntityPermissionQuery,
    ) -> RepoResult<Vec<EntityPermission>> {
        self.table.list(query)
    }

    fn soft_delete_entity_permission(&self, link: &mut EntityPermission) -> RepoResult<()> {
        self.table.soft_delete(link)
    }

    fn soft_delete_entity_permission_by_id(&self, id: &str) -> RepoResult<()> {
        let mut link = self
            .find_entity_permission_by_id(id)?
            .ok_or_else(|| RepoError::NotFound {
                entity: EntityPermission::KIND,
                id: id.to_string(),
            })?;
        self.soft_delete_entity_permission(&mut link)
    }

    fn update_entity_permission(&self, link: &mut EntityPermission) -> RepoResult<()> {
        self.table.update(link)
    }
}
