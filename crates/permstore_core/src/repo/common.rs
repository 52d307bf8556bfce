//! Table-level plumbing shared by both repositories.

use super::{require_value, RepoError, RepoResult};
use crate::clock;
use crate::db::{self, quote_identifier};
use crate::model::{Column, Entity};
use crate::query::{compile, Filter, Query, QueryValidationError};
use log::debug;
use rusqlite::types::Value;
use rusqlite::Connection;

/// One table reached through one connection or transaction.
pub(crate) struct TableAccess<'a> {
    conn: &'a Connection,
    table: &'a str,
    debug_enabled: bool,
}

impl<'a> TableAccess<'a> {
    pub(crate) fn new(conn: &'a Connection, table: &'a str, debug_enabled: bool) -> Self {
        Self {
            conn,
            table,
            debug_enabled,
        }
    }

    fn log_sql(&self, operation: &str, sql: &str, params: &[Value]) {
        if self.debug_enabled {
            debug!(
                "event=sql_exec module=repo op={operation} table={} sql={sql} params={params:?}",
                self.table
            );
        }
    }

    fn select(&self, sql: &str, params: &[Value]) -> RepoResult<Vec<db::RowMap>> {
        self.log_sql("select", sql, params);
        Ok(db::select_to_string_maps(self.conn, sql, params)?)
    }

    fn write(&self, operation: &str, sql: &str, params: &[Value]) -> RepoResult<usize> {
        self.log_sql(operation, sql, params);
        Ok(db::execute(self.conn, sql, params)?)
    }

    /// Counts rows matching `query`, ignoring its limit, offset and projection.
    pub(crate) fn count<F: Filter>(&self, query: &Query<F>) -> RepoResult<i64> {
        let mut query = query.clone();
        query.count_only = true;

        let compiled = compile(&query, self.table, &clock::now_datetime())?;
        let (sql, params) = compiled.to_sql()?;
        let rows = self.select(&sql, &params)?;

        let raw = rows
            .first()
            .and_then(|row| row.get("count"))
            .ok_or_else(|| {
                RepoError::InvalidData(format!("count on {} returned no row", self.table))
            })?;
        raw.parse::<i64>().map_err(|_| {
            RepoError::InvalidData(format!("count on {} returned `{raw}`", self.table))
        })
    }

    /// Lists rows matching `query` as clean entities.
    pub(crate) fn list<E, F>(&self, query: &Query<F>) -> RepoResult<Vec<E>>
    where
        E: Entity,
        F: Filter<Column = E::Column>,
    {
        if query.count_only {
            return Err(QueryValidationError::CountOnlyList.into());
        }

        let compiled = compile(query, self.table, &clock::now_datetime())?;
        let (sql, params) = compiled.to_sql()?;
        let rows = self.select(&sql, &params)?;

        rows.into_iter()
            .map(|row| E::from_existing_data(row).map_err(RepoError::InvalidData))
            .collect()
    }

    /// Stamps timestamps, inserts the full canonical data and marks clean.
    pub(crate) fn insert<E: Entity>(&self, entity: &mut E) -> RepoResult<()> {
        require_value(E::KIND, "id", entity.id())?;

        let now = clock::now_datetime();
        entity.set_created_at(now.clone()).set_updated_at(now);

        let data = entity.data();
        let mut columns = Vec::with_capacity(data.len());
        let mut params = Vec::with_capacity(data.len());
        for (column, value) in data {
            columns.push(quote_identifier(column.name())?);
            params.push(Value::Text(value));
        }
        let placeholders = vec!["?"; columns.len()].join(", ");
        let sql = format!(
            "INSERT INTO {} ({}) VALUES ({placeholders});",
            quote_identifier(self.table)?,
            columns.join(", ")
        );

        self.write("insert", &sql, &params)?;
        entity.mark_as_not_dirty();
        Ok(())
    }

    /// Persists only changed columns, keyed by id.
    ///
    /// Returns without any statement when nothing but `id`/`updated_at`
    /// changed. The entity is marked clean after the write even when it fails.
    pub(crate) fn update<E: Entity>(&self, entity: &mut E) -> RepoResult<()> {
        let mut changed = entity.data_changed();
        changed.remove(&E::Column::ID);
        changed.remove(&E::Column::UPDATED_AT);
        if changed.is_empty() {
            return Ok(());
        }

        entity.set_updated_at(clock::now_datetime());
        let mut changed = entity.data_changed();
        changed.remove(&E::Column::ID);

        let mut assignments = Vec::with_capacity(changed.len());
        let mut params = Vec::with_capacity(changed.len() + 1);
        for (column, value) in changed {
            assignments.push(format!("{} = ?", quote_identifier(column.name())?));
            params.push(Value::Text(value));
        }
        params.push(Value::Text(entity.id().to_string()));
        let sql = format!(
            "UPDATE {} SET {} WHERE {} = ?;",
            quote_identifier(self.table)?,
            assignments.join(", "),
            quote_identifier(E::Column::ID.name())?
        );

        let result = self.write("update", &sql, &params);
        entity.mark_as_not_dirty();
        result.map(|_| ())
    }

    /// Stamps `soft_deleted_at` with the current instant and updates.
    pub(crate) fn soft_delete<E: Entity>(&self, entity: &mut E) -> RepoResult<()> {
        entity.set_soft_deleted_at(clock::now_datetime());
        self.update(entity)
    }

    /// Removes the row unconditionally.
    pub(crate) fn delete_by_id<E: Entity>(&self, id: &str) -> RepoResult<()> {
        require_value(E::KIND, "id", id)?;

        let sql = format!(
            "DELETE FROM {} WHERE {} = ?;",
            quote_identifier(self.table)?,
            quote_identifier(E::Column::ID.name())?
        );
        self.write("delete", &sql, &[Value::Text(id.to_string())])?;
        Ok(())
    }
}
