//! Statement execution against a connection or transaction handle.

use super::DbResult;
use rusqlite::types::{Value, ValueRef};
use rusqlite::{params_from_iter, Connection};
use std::collections::BTreeMap;

/// One result row keyed by column name, every value rendered as text.
pub type RowMap = BTreeMap<String, String>;

/// Runs a query and returns every row as a string map.
///
/// `NULL` becomes the empty string; integers and reals use their decimal form.
pub fn select_to_string_maps(
    conn: &Connection,
    sql: &str,
    params: &[Value],
) -> DbResult<Vec<RowMap>> {
    let mut stmt = conn.prepare(sql)?;
    let names: Vec<String> = stmt
        .column_names()
        .into_iter()
        .map(str::to_string)
        .collect();

    let mut rows = stmt.query(params_from_iter(params.iter()))?;
    let mut maps = Vec::new();
    while let Some(row) = rows.next()? {
        let mut map = RowMap::new();
        for (index, name) in names.iter().enumerate() {
            map.insert(name.clone(), value_to_text(row.get_ref(index)?));
        }
        maps.push(map);
    }

    Ok(maps)
}

/// Executes a write statement and returns the number of affected rows.
pub fn execute(conn: &Connection, sql: &str, params: &[Value]) -> DbResult<usize> {
    Ok(conn.execute(sql, params_from_iter(params.iter()))?)
}

fn value_to_text(value: ValueRef<'_>) -> String {
    match value {
        ValueRef::Null => String::new(),
        ValueRef::Integer(number) => number.to_string(),
        ValueRef::Real(number) => number.to_string(),
        ValueRef::Text(bytes) | ValueRef::Blob(bytes) => {
            String::from_utf8_lossy(bytes).into_owned()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{execute, select_to_string_maps};
    use rusqlite::types::Value;
    use rusqlite::Connection;

    #[test]
    fn rows_are_rendered_as_text_maps() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch("CREATE TABLE t (a TEXT, b INTEGER, c TEXT);")
            .unwrap();
        let inserted = execute(
            &conn,
            "INSERT INTO t (a, b, c) VALUES (?, ?, ?);",
            &[Value::Text("x".into()), Value::Integer(7), Value::Null],
        )
        .unwrap();
        assert_eq!(inserted, 1);

        let rows = select_to_string_maps(&conn, "SELECT a, b, c FROM t;", &[]).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["a"], "x");
        assert_eq!(rows[0]["b"], "7");
        assert_eq!(rows[0]["c"], "");
    }
}
