//! Translation of validated queries into parameterized SQL.
//!
//! # Invariants
//! - Predicates are conjunctive and emitted only for fields that are set.
//! - Limit and offset are dropped in count-only mode.
//! - Unless soft-deleted rows are requested, `soft_deleted_at > now` is the
//!   last predicate of every compiled query.

use super::{Filter, Query, QueryValidationError, SortDirection};
use crate::db::{quote_identifier, DbResult};
use crate::model::Column;
use rusqlite::types::Value;

/// One conjunctive filter condition over a single column.
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    Eq(&'static str, Value),
    In(&'static str, Vec<Value>),
    Gte(&'static str, Value),
    Lte(&'static str, Value),
    Gt(&'static str, Value),
    /// Case-insensitive substring match; the needle is stored unescaped.
    ContainsIgnoreCase(&'static str, String),
}

impl Predicate {
    pub fn column(&self) -> &'static str {
        match self {
            Self::Eq(column, _)
            | Self::In(column, _)
            | Self::Gte(column, _)
            | Self::Lte(column, _)
            | Self::Gt(column, _)
            | Self::ContainsIgnoreCase(column, _) => *column,
        }
    }

    fn render(&self, sql: &mut String, params: &mut Vec<Value>) -> DbResult<()> {
        let column = quote_identifier(self.column())?;
        match self {
            Self::Eq(_, value) => binary(sql, params, &column, "=", value),
            Self::Gte(_, value) => binary(sql, params, &column, ">=", value),
            Self::Lte(_, value) => binary(sql, params, &column, "<=", value),
            Self::Gt(_, value) => binary(sql, params, &column, ">", value),
            Self::In(_, values) => {
                let placeholders = vec!["?"; values.len()].join(", ");
                sql.push_str(&format!("{column} IN ({placeholders})"));
                params.extend(values.iter().cloned());
            }
            Self::ContainsIgnoreCase(_, needle) => {
                sql.push_str(&format!("LOWER({column}) LIKE LOWER(?) ESCAPE '\\'"));
                params.push(Value::Text(format!("%{}%", escape_like(needle))));
            }
        }
        Ok(())
    }
}

fn binary(sql: &mut String, params: &mut Vec<Value>, column: &str, op: &str, value: &Value) {
    sql.push_str(&format!("{column} {op} ?"));
    params.push(value.clone());
}

fn escape_like(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        if matches!(ch, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}

/// A compiled, not yet rendered, select over one table.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectQuery {
    pub table: String,
    /// Output columns; never empty.
    pub columns: Vec<&'static str>,
    pub predicates: Vec<Predicate>,
    pub order: Option<(&'static str, SortDirection)>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
    pub count_only: bool,
}

impl SelectQuery {
    /// Renders SQL text and bound parameters.
    ///
    /// Count-only queries render `SELECT COUNT(*) AS "count"` without ordering
    /// or pagination.
    pub fn to_sql(&self) -> DbResult<(String, Vec<Value>)> {
        let mut sql = String::from("SELECT ");
        let mut params = Vec::new();

        if self.count_only {
            sql.push_str("COUNT(*) AS \"count\"");
        } else {
            let columns = self
                .columns
                .iter()
                .map(|column| quote_identifier(column))
                .collect::<DbResult<Vec<_>>>()?;
            sql.push_str(&columns.join(", "));
        }

        sql.push_str(" FROM ");
        sql.push_str(&quote_identifier(&self.table)?);

        for (index, predicate) in self.predicates.iter().enumerate() {
            sql.push_str(if index == 0 { " WHERE " } else { " AND " });
            predicate.render(&mut sql, &mut params)?;
        }

        if self.count_only {
            sql.push(';');
            return Ok((sql, params));
        }

        if let Some((column, direction)) = self.order {
            sql.push_str(&format!(
                " ORDER BY {} {}",
                quote_identifier(column)?,
                direction.as_sql()
            ));
        }

        match (self.limit, self.offset) {
            (Some(limit), Some(offset)) => {
                sql.push_str(" LIMIT ? OFFSET ?");
                params.push(Value::Integer(limit));
                params.push(Value::Integer(offset));
            }
            (Some(limit), None) => {
                sql.push_str(" LIMIT ?");
                params.push(Value::Integer(limit));
            }
            (None, Some(offset)) => {
                sql.push_str(" LIMIT -1 OFFSET ?");
                params.push(Value::Integer(offset));
            }
            (None, None) => {}
        }

        sql.push(';');
        Ok((sql, params))
    }
}

/// Validates `query` and compiles it against `table`, using `now` as the
/// soft-delete cut-off.
pub fn compile<F: Filter>(
    query: &Query<F>,
    table: &str,
    now: &str,
) -> Result<SelectQuery, QueryValidationError> {
    query.validate()?;

    let id = F::Column::ID.name();
    let created_at = F::Column::CREATED_AT.name();
    let mut predicates = Vec::new();

    if let Some(value) = &query.id {
        predicates.push(Predicate::Eq(id, Value::Text(value.clone())));
    }
    if let Some(values) = &query.id_in {
        predicates.push(Predicate::In(id, text_values(values)));
    }
    query.filter.equality_predicates(&mut predicates);

    if let Some(lower) = &query.created_at_gte {
        predicates.push(Predicate::Gte(created_at, Value::Text(lower.clone())));
    }
    if let Some(upper) = &query.created_at_lte {
        predicates.push(Predicate::Lte(created_at, Value::Text(upper.clone())));
    }

    query.filter.like_predicates(&mut predicates);

    let columns = if query.columns.is_empty() {
        F::Column::ALL.iter().map(|column| column.name()).collect()
    } else {
        query.columns.iter().map(|column| column.name()).collect()
    };

    let (limit, offset) = if query.count_only {
        (None, None)
    } else {
        (query.limit, query.offset)
    };

    let order = match query.order_by.as_deref() {
        Some(name) => {
            let column = F::Column::from_name(name)
                .ok_or_else(|| QueryValidationError::UnknownColumn(name.to_string()))?;
            Some((column.name(), query.sort_direction.unwrap_or_default()))
        }
        None => None,
    };

    if !query.soft_deleted_included {
        predicates.push(Predicate::Gt(
            F::Column::SOFT_DELETED_AT.name(),
            Value::Text(now.to_string()),
        ));
    }

    Ok(SelectQuery {
        table: table.to_string(),
        columns,
        predicates,
        order,
        limit,
        offset,
        count_only: query.count_only,
    })
}

pub(crate) fn text_values(values: &[String]) -> Vec<Value> {
    values.iter().cloned().map(Value::Text).collect()
}
