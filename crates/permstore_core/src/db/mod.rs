//! SQLite storage bootstrap, schema provisioning and statement execution.
//!
//! # Responsibility
//! - Open and configure SQLite connections for the permission store.
//! - Provide idempotent DDL for the permission and entity-permission tables.
//! - Execute parameterized statements and decode rows into string maps.
//!
//! # Invariants
//! - Table and column identifiers reaching SQL text are plain identifiers.
//! - Values always travel as bound parameters, never as SQL text.

use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod exec;
mod open;
pub mod schema;

pub use exec::{execute, select_to_string_maps, RowMap};
pub use open::{open_db, open_db_in_memory};
pub use schema::{is_plain_identifier, quote_identifier};

pub type DbResult<T> = Result<T, DbError>;

#[derive(Debug)]
pub enum DbError {
    Sqlite(rusqlite::Error),
    InvalidIdentifier(String),
}

impl Display for DbError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sqlite(err) => write!(f, "{err}"),
            Self::InvalidIdentifier(name) => write!(f, "invalid sql identifier `{name}`"),
        }
    }
}

impl Error for DbError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Sqlite(err) => Some(err),
            Self::InvalidIdentifier(_) => None,
        }
    }
}

impl From<rusqlite::Error> for DbError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}
