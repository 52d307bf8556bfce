//! Store entry point.
//!
//! # Responsibility
//! - Own validated table names and the debug flag.
//! - Provision both tables on demand.
//! - Hand out repositories bound to a caller-owned connection or transaction.
//!
//! # Invariants
//! - A constructed store always carries valid options.
//! - The store never begins, commits or rolls back a transaction.

use crate::config::StoreOptions;
use crate::db::schema::{entity_permission_table_sql, permission_table_sql};
use crate::repo::{
    RepoError, RepoResult, SqliteEntityPermissionRepository, SqlitePermissionRepository,
};
use log::{error, info};
use rusqlite::Connection;
use std::time::Instant;

/// Permission store configured with table names and logging behavior.
#[derive(Debug, Clone)]
pub struct PermissionStore {
    options: StoreOptions,
}

impl PermissionStore {
    /// Validates `options` and provisions tables when auto-migration is on.
    ///
    /// # Errors
    /// - `RepoError::Config` for invalid options.
    /// - `RepoError::Db` when table creation fails.
    pub fn try_new(options: StoreOptions, conn: &Connection) -> RepoResult<Self> {
        options.validate().map_err(RepoError::Config)?;

        let store = Self { options };
        if store.options.automigrate_enabled {
            store.auto_migrate(conn)?;
        }
        Ok(store)
    }

    /// Creates both tables if absent. Safe to call repeatedly.
    pub fn auto_migrate(&self, conn: &Connection) -> RepoResult<()> {
        let started_at = Instant::now();
        let result = self.create_tables(conn);
        let duration_ms = started_at.elapsed().as_millis();

        match &result {
            Ok(()) => info!(
                "event=auto_migrate module=store status=ok duration_ms={} permission_table={} entity_permission_table={}",
                duration_ms,
                self.options.permission_table_name,
                self.options.entity_permission_table_name
            ),
            Err(err) => error!(
                "event=auto_migrate module=store status=error duration_ms={} error={}",
                duration_ms, err
            ),
        }
        result
    }

    fn create_tables(&self, conn: &Connection) -> RepoResult<()> {
        let permission_sql = permission_table_sql(&self.options.permission_table_name)?;
        let entity_permission_sql =
            entity_permission_table_sql(&self.options.entity_permission_table_name)?;
        conn.execute_batch(&permission_sql)?;
        conn.execute_batch(&entity_permission_sql)?;
        Ok(())
    }

    pub fn enable_debug(&mut self, enabled: bool) {
        self.options.debug_enabled = enabled;
    }

    pub fn is_debug_enabled(&self) -> bool {
        self.options.debug_enabled
    }

    pub fn options(&self) -> &StoreOptions {
        &self.options
    }

    /// Permission repository running against `conn`.
    pub fn permissions<'a>(&'a self, conn: &'a Connection) -> SqlitePermissionRepository<'a> {
        SqlitePermissionRepository::new(self, conn)
    }

    /// Entity-permission repository running against `conn`.
    pub fn entity_permissions<'a>(
        &'a self,
        conn: &'a Connection,
    ) -> SqliteEntityPermissionRepository<'a> {
        SqliteEntityPermissionRepository::new(self, conn)
    }
}

#[cfg(test)]
mod tests {
    use super::PermissionStore;
    use crate::config::StoreOptions;
    use crate::db::open_db_in_memory;
    use crate::repo::RepoError;

    fn table_exists(conn: &rusqlite::Connection, table: &str) -> bool {
        let count: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = ?1;",
                [table],
                |row| row.get(0),
            )
            .unwrap();
        count == 1
    }

    #[test]
    fn try_new_without_automigrate_leaves_schema_untouched() {
        let conn = open_db_in_memory().unwrap();
        let store = PermissionStore::try_new(StoreOptions::default(), &conn).unwrap();
        assert!(!table_exists(&conn, &store.options().permission_table_name));
    }

    #[test]
    fn auto_migrate_creates_configured_tables() {
        let conn = open_db_in_memory().unwrap();
        let options = StoreOptions {
            permission_table_name: "acl_permission".to_string(),
            entity_permission_table_name: "acl_link".to_string(),
            automigrate_enabled: true,
            debug_enabled: false,
        };
        PermissionStore::try_new(options, &conn).unwrap();
        assert!(table_exists(&conn, "acl_permission"));
        assert!(table_exists(&conn, "acl_link"));
    }

    #[test]
    fn invalid_options_are_config_errors() {
        let conn = open_db_in_memory().unwrap();
        let options = StoreOptions {
            permission_table_name: String::new(),
            ..StoreOptions::default()
        };
        let error = PermissionStore::try_new(options, &conn).unwrap_err();
        assert!(matches!(error, RepoError::Config(_)));
    }

    #[test]
    fn debug_flag_toggles_at_runtime() {
        let conn = open_db_in_memory().unwrap();
        let mut store = PermissionStore::try_new(StoreOptions::default(), &conn).unwrap();
        assert!(!store.is_debug_enabled());
        store.enable_debug(true);
        assert!(store.is_debug_enabled());
    }
}
