//! Persistence core for permission records and entity-permission links.
//! Sparse queries, change tracking and soft delete live here.

pub mod clock;
pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod query;
pub mod repo;
pub mod store;

pub use config::StoreOptions;
pub use db::{open_db, open_db_in_memory, DbError};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::entity_permission::{EntityPermission, EntityPermissionColumn};
pub use model::permission::{Permission, PermissionColumn, PermissionStatus};
pub use model::{Entity, Metas, ValidationError};
pub use query::{
    EntityPermissionFilter, EntityPermissionQuery, PermissionFilter, PermissionQuery,
    QueryValidationError, SortDirection,
};
pub use repo::{
    EntityPermissionRepository, PermissionRepository, RepoError, RepoResult,
    SqliteEntityPermissionRepository, SqlitePermissionRepository,
};
pub use store::PermissionStore;

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
