//! Builder helpers that construct parameterized DML and delegate to the
//! execution engine. Values always travel as bound arguments; only table
//! and column identifiers are interpolated, and those are assumed trusted.

use crate::error::SqlSessionError;
use crate::session::{ExecuteOptions, Session};
use crate::translation::CANONICAL_MARKER;
use crate::types::{ColumnMap, SqlValue};

impl Session {
    /// Insert a single row.
    ///
    /// `data` maps columns to values in insertion order; a `Null` value
    /// binds as SQL NULL.
    ///
    /// # Errors
    /// Propagates the engine's failure for the built statement.
    ///
    /// ```rust,no_run
    /// # use sql_session::prelude::*;
    /// # fn demo(db: &mut Session) -> Result<(), SqlSessionError> {
    /// let data = ColumnMap::from([
    ///     ("name".to_string(), SqlValue::Text("alice".into())),
    ///     ("age".to_string(), SqlValue::Int(33)),
    /// ]);
    /// let inserted = db.insert("users", &data)?;
    /// # let _ = inserted; Ok(())
    /// # }
    /// ```
    #[track_caller]
    pub fn insert(&mut self, table: &str, data: &ColumnMap) -> Result<u64, SqlSessionError> {
        let (sql, values) = build_insert(table, data);
        self.execute(&sql, &values, ExecuteOptions::default())?;
        Ok(self.affected_rows)
    }

    /// Insert many rows with one multi-row statement.
    ///
    /// Each row's arity must equal `columns.len()`; a mismatch is not
    /// validated here and produces a malformed statement the backend
    /// rejects.
    ///
    /// # Errors
    /// Propagates the engine's failure for the built statement.
    #[track_caller]
    pub fn bulk_insert(
        &mut self,
        table: &str,
        columns: &[&str],
        rows: &[Vec<SqlValue>],
    ) -> Result<u64, SqlSessionError> {
        let (sql, values) = build_bulk_insert(table, columns, rows);
        self.execute(&sql, &values, ExecuteOptions::default())?;
        Ok(self.affected_rows)
    }

    /// Delete rows matching equality conditions joined with AND.
    ///
    /// A `Null` condition value becomes an `IS NULL` test and contributes
    /// no bound argument. An empty condition set deletes every row —
    /// callers must pass conditions to scope the delete.
    ///
    /// # Errors
    /// Propagates the engine's failure for the built statement.
    #[track_caller]
    pub fn delete(&mut self, table: &str, where_: &ColumnMap) -> Result<u64, SqlSessionError> {
        let (sql, values) = build_delete(table, where_);
        self.execute(&sql, &values, ExecuteOptions::default())?;
        Ok(self.affected_rows)
    }

    /// Update rows: SET from `data`, WHERE from `where_`.
    ///
    /// A `Null` in `data` becomes a literal `NULL` assignment with no
    /// bound argument; `where_` follows the delete rules.
    ///
    /// # Errors
    /// Propagates the engine's failure for the built statement.
    #[track_caller]
    pub fn update(
        &mut self,
        table: &str,
        data: &ColumnMap,
        where_: &ColumnMap,
    ) -> Result<u64, SqlSessionError> {
        let (sql, values) = build_update(table, data, where_);
        self.execute(&sql, &values, ExecuteOptions::default())?;
        Ok(self.affected_rows)
    }
}

pub(crate) fn build_insert(table: &str, data: &ColumnMap) -> (String, Vec<SqlValue>) {
    let columns: Vec<&str> = data.keys().map(String::as_str).collect();
    let markers = vec![CANONICAL_MARKER; data.len()].join(", ");
    let sql = format!(
        "INSERT INTO {table} ({}) VALUES ({markers})",
        columns.join(", ")
    );
    (sql, data.values().cloned().collect())
}

pub(crate) fn build_bulk_insert(
    table: &str,
    columns: &[&str],
    rows: &[Vec<SqlValue>],
) -> (String, Vec<SqlValue>) {
    let group = format!("({})", vec![CANONICAL_MARKER; columns.len()].join(", "));
    let groups = vec![group; rows.len()].join(", ");
    let sql = format!("INSERT INTO {table} ({}) VALUES {groups}", columns.join(", "));
    let values = rows.iter().flat_map(|row| row.iter().cloned()).collect();
    (sql, values)
}

/// Equality conditions for one map: `IS NULL` for `Null` values (no bound
/// argument), `= marker` otherwise.
fn conditions(where_: &ColumnMap, values: &mut Vec<SqlValue>) -> Vec<String> {
    where_
        .iter()
        .map(|(field, value)| {
            if value.is_null() {
                format!("\"{field}\" IS NULL")
            } else {
                values.push(value.clone());
                format!("\"{field}\" = {CANONICAL_MARKER}")
            }
        })
        .collect()
}

pub(crate) fn build_delete(table: &str, where_: &ColumnMap) -> (String, Vec<SqlValue>) {
    let mut values = Vec::new();
    let conditions = conditions(where_, &mut values);
    let mut sql = format!("DELETE FROM \"{table}\"");
    if !conditions.is_empty() {
        sql.push_str(" WHERE ");
        sql.push_str(&conditions.join(" AND "));
    }
    (sql, values)
}

pub(crate) fn build_update(
    table: &str,
    data: &ColumnMap,
    where_: &ColumnMap,
) -> (String, Vec<SqlValue>) {
    let mut values = Vec::new();
    let fields: Vec<String> = data
        .iter()
        .map(|(field, value)| {
            if value.is_null() {
                format!("\"{field}\" = NULL")
            } else {
                values.push(value.clone());
                format!("\"{field}\" = {CANONICAL_MARKER}")
            }
        })
        .collect();
    let conditions = conditions(where_, &mut values);
    let sql = format!(
        "UPDATE \"{table}\" SET {} WHERE {}",
        fields.join(", "),
        conditions.join(" AND ")
    );
    (sql, values)
}
