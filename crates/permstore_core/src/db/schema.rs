//! Idempotent DDL for the permission tables.
//!
//! # Invariants
//! - Statements use `CREATE TABLE IF NOT EXISTS`; running them twice is a no-op.
//! - Timestamps are TEXT in `clock::DATETIME_FORMAT`, `metas` is JSON TEXT.
//! - No unique constraint backs the entity-permission triple; uniqueness is
//!   checked by the repository before insert.

use super::{DbError, DbResult};
use once_cell::sync::Lazy;
use regex::Regex;

static PLAIN_IDENTIFIER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z_][A-Za-z0-9_]{0,62}$").expect("identifier pattern is valid")
});

/// Returns whether `name` can be embedded in SQL text as an identifier.
pub fn is_plain_identifier(name: &str) -> bool {
    PLAIN_IDENTIFIER.is_match(name)
}

/// Double-quotes a plain identifier, rejecting anything else.
pub fn quote_identifier(name: &str) -> DbResult<String> {
    if !is_plain_identifier(name) {
        return Err(DbError::InvalidIdentifier(name.to_string()));
    }
    Ok(format!("\"{name}\""))
}

/// DDL for the standalone permission table.
pub fn permission_table_sql(table: &str) -> DbResult<String> {
    let table = quote_identifier(table)?;
    Ok(format!(
        "CREATE TABLE IF NOT EXISTS {table} (
            \"id\" VARCHAR(40) NOT NULL PRIMARY KEY,
            \"status\" VARCHAR(40) NOT NULL DEFAULT '',
            \"handle\" VARCHAR(50) NOT NULL DEFAULT '',
            \"title\" VARCHAR(100) NOT NULL DEFAULT '',
            \"metas\" TEXT NOT NULL DEFAULT '',
            \"memo\" TEXT NOT NULL DEFAULT '',
            \"created_at\" TEXT NOT NULL DEFAULT '',
            \"updated_at\" TEXT NOT NULL DEFAULT '',
            \"soft_deleted_at\" TEXT NOT NULL DEFAULT ''
        );"
    ))
}

/// DDL for the entity-to-permission association table.
pub fn entity_permission_table_sql(table: &str) -> DbResult<String> {
    let table = quote_identifier(table)?;
    Ok(format!(
        "CREATE TABLE IF NOT EXISTS {table} (
            \"id\" VARCHAR(40) NOT NULL PRIMARY KEY,
            \"entity_type\" VARCHAR(80) NOT NULL DEFAULT '',
            \"entity_id\" VARCHAR(40) NOT NULL DEFAULT '',
            \"permission_id\" VARCHAR(40) NOT NULL DEFAULT '',
            \"metas\" TEXT NOT NULL DEFAULT '',
            \"memo\" TEXT NOT NULL DEFAULT '',
            \"created_at\" TEXT NOT NULL DEFAULT '',
            \"updated_at\" TEXT NOT NULL DEFAULT '',
            \"soft_deleted_at\" TEXT NOT NULL DEFAULT ''
        );"
    ))
}

#[cfg(test)]
mod tests {
    use super::{is_plain_identifier, permission_table_sql, quote_identifier};

    #[test]
    fn plain_identifiers_are_accepted() {
        assert!(is_plain_identifier("permissions_permission"));
        assert!(is_plain_identifier("_t1"));
        assert_eq!(quote_identifier("roles").unwrap(), "\"roles\"");
    }

    #[test]
    fn identifiers_with_sql_are_rejected() {
        assert!(!is_plain_identifier(""));
        assert!(!is_plain_identifier("1table"));
        assert!(!is_plain_identifier("t; DROP TABLE x"));
        assert!(!is_plain_identifier("a\"b"));
        assert!(permission_table_sql("bad name").is_err());
    }
}
