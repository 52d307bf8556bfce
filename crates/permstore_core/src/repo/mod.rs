//! Repository contracts and SQLite implementations.
//!
//! # Responsibility
//! - Provide count/create/find/list/update/soft-delete/delete per entity kind.
//! - Compose query compilation with change-tracked persistence.
//!
//! # Invariants
//! - Repositories run against the connection or transaction they are bound
//!   to and never begin, commit or roll back.
//! - Every operation issues at most one write statement.
//! - Not-found on find paths is `Ok(None)`, never an error.

use crate::db::DbError;
use crate::model::ValidationError;
use crate::query::QueryValidationError;
use std::error::Error;
use std::fmt::{Display, Formatter};

mod common;
pub mod entity_permission_repo;
pub mod permission_repo;

pub use entity_permission_repo::{EntityPermissionRepository, SqliteEntityPermissionRepository};
pub use permission_repo::{PermissionRepository, SqlitePermissionRepository};

pub type RepoResult<T> = Result<T, RepoError>;

/// Error surfaced by every repository operation.
#[derive(Debug)]
pub enum RepoError {
    /// The query was rejected before reaching SQL.
    Query(QueryValidationError),
    /// An entity or argument lacks a required value.
    Validation(ValidationError),
    /// An alive association with the same triple already exists.
    Duplicate {
        entity_type: String,
        entity_id: String,
        permission_id: String,
    },
    NotFound {
        entity: &'static str,
        id: String,
    },
    Db(DbError),
    InvalidData(String),
    Config(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Query(err) => write!(f, "{err}"),
            Self::Validation(err) => write!(f, "{err}"),
            Self::Duplicate {
                entity_type,
                entity_id,
                permission_id,
            } => write!(
                f,
                "entity permission already exists for {entity_type}/{entity_id} -> {permission_id}"
            ),
            Self::NotFound { entity, id } => write!(f, "{entity} not found: {id}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::InvalidData(message) => write!(f, "invalid persisted data: {message}"),
            Self::Config(message) => write!(f, "invalid store options: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Query(err) => Some(err),
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::Duplicate { .. }
            | Self::NotFound { .. }
            | Self::InvalidData(_)
            | Self::Config(_) => None,
        }
    }
}

impl From<QueryValidationError> for RepoError {
    fn from(value: QueryValidationError) -> Self {
        Self::Query(value)
    }
}

impl From<ValidationError> for RepoError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

pub(crate) fn require_value(
    entity: &'static str,
    field: &'static str,
    value: &str,
) -> Result<(), ValidationError> {
    if value.is_empty() {
        return Err(ValidationError::EmptyField { entity, field });
    }
    Ok(())
}
