use std::fmt::Write as _;
use std::sync::Arc;

use rusqlite::types::Value;
use rusqlite::{Connection, ToSql};

use crate::backend::{Backend, StatementOutcome};
use crate::config::SessionConfig;
use crate::error::SqlSessionError;
use crate::types::{SqlValue, TIMESTAMP_FORMAT};

/// `SQLite` backend over rusqlite.
///
/// `config.database` is the file path; `:memory:` opens an in-memory
/// database. Host, port, and credentials are ignored.
pub struct SqliteBackend {
    conn: Option<Connection>,
}

impl SqliteBackend {
    #[must_use]
    pub fn new() -> Self {
        Self { conn: None }
    }

    fn conn(&mut self) -> Result<&mut Connection, SqlSessionError> {
        self.conn.as_mut().ok_or_else(|| {
            SqlSessionError::ConnectionError("SQLite backend is not connected".into())
        })
    }
}

impl Default for SqliteBackend {
    fn default() -> Self {
        Self::new()
    }
}

/// Convert a session value into a rusqlite `Value`.
fn to_sqlite_value(value: &SqlValue) -> Value {
    match value {
        SqlValue::Int(i) => Value::Integer(*i),
        SqlValue::Float(f) => Value::Real(*f),
        SqlValue::Text(s) => Value::Text(s.clone()),
        SqlValue::Bool(b) => Value::Integer(i64::from(*b)),
        SqlValue::Timestamp(dt) => {
            let mut buf = String::with_capacity(32);
            let _ = write!(buf, "{}", dt.format(TIMESTAMP_FORMAT));
            Value::Text(buf)
        }
        SqlValue::Null => Value::Null,
        SqlValue::Json(v) => Value::Text(v.to_string()),
        SqlValue::Blob(bytes) => Value::Blob(bytes.clone()),
    }
}

/// Extract a session value from a fetched `SQLite` row.
fn extract_value(row: &rusqlite::Row<'_>, idx: usize) -> Result<SqlValue, SqlSessionError> {
    let value: Value = row.get(idx).map_err(SqlSessionError::SqliteError)?;
    match value {
        Value::Null => Ok(SqlValue::Null),
        Value::Integer(i) => Ok(SqlValue::Int(i)),
        Value::Real(f) => Ok(SqlValue::Float(f)),
        Value::Text(s) => Ok(SqlValue::Text(s)),
        Value::Blob(b) => Ok(SqlValue::Blob(b)),
    }
}

impl Backend for SqliteBackend {
    fn connect(&mut self, config: &SessionConfig) -> Result<(), SqlSessionError> {
        if config.database.is_empty() {
            return Err(SqlSessionError::ConfigError(
                "SQLite requires a database path (or :memory:)".into(),
            ));
        }
        tracing::debug!(database = %config.database, "opening SQLite connection");
        let conn = Connection::open(&config.database)?;
        self.conn = Some(conn);
        Ok(())
    }

    fn close(&mut self) -> Result<(), SqlSessionError> {
        let conn = self.conn.take().ok_or_else(|| {
            SqlSessionError::ConnectionError("SQLite backend is not connected".into())
        })?;
        conn.close().map_err(|(conn, err)| {
            // Close failed; keep the handle so the session stays usable.
            self.conn = Some(conn);
            SqlSessionError::SqliteError(err)
        })
    }

    fn is_connected(&self) -> bool {
        self.conn.is_some()
    }

    fn begin(&mut self) -> Result<(), SqlSessionError> {
        self.conn()?.execute_batch("BEGIN")?;
        Ok(())
    }

    fn commit(&mut self) -> Result<(), SqlSessionError> {
        let conn = self.conn()?;
        // COMMIT outside a transaction is an error in SQLite; treat it as
        // the no-op other backends make it.
        if conn.is_autocommit() {
            return Ok(());
        }
        conn.execute_batch("COMMIT")?;
        Ok(())
    }

    fn rollback(&mut self) -> Result<(), SqlSessionError> {
        self.conn()?.execute_batch("ROLLBACK")?;
        Ok(())
    }

    fn placeholder(&self) -> &'static str {
        "?"
    }

    fn execute(
        &mut self,
        sql: &str,
        params: &[SqlValue],
    ) -> Result<StatementOutcome, SqlSessionError> {
        let conn = self.conn()?;
        let values: Vec<Value> = params.iter().map(to_sqlite_value).collect();
        let refs: Vec<&dyn ToSql> = values.iter().map(|v| v as &dyn ToSql).collect();

        // The statement is scoped to this call; it drops (and the driver
        // finalizes it) on every exit path, including errors.
        let mut stmt = conn.prepare(sql)?;
        if stmt.column_count() == 0 {
            let affected = stmt.execute(&refs[..])? as u64;
            drop(stmt);
            return Ok(StatementOutcome {
                rows: None,
                affected_rows: affected,
                last_insert_id: conn.last_insert_rowid(),
            });
        }

        let columns: Arc<Vec<String>> = Arc::new(
            stmt.column_names()
                .iter()
                .map(std::string::ToString::to_string)
                .collect(),
        );
        let mut fetched: Vec<Vec<SqlValue>> = Vec::new();
        let mut rows = stmt.query(&refs[..])?;
        while let Some(row) = rows.next()? {
            let mut row_values = Vec::with_capacity(columns.len());
            for idx in 0..columns.len() {
                row_values.push(extract_value(row, idx)?);
            }
            fetched.push(row_values);
        }
        drop(rows);
        drop(stmt);

        // Mirror cursor.rowcount semantics: a result-producing statement
        // reports the number of rows fetched.
        let affected_rows = fetched.len() as u64;
        Ok(StatementOutcome {
            rows: Some((columns, fetched)),
            affected_rows,
            last_insert_id: conn.last_insert_rowid(),
        })
    }

    fn call_procedure(
        &mut self,
        name: &str,
        _params: &[SqlValue],
    ) -> Result<StatementOutcome, SqlSessionError> {
        Err(SqlSessionError::Unimplemented(format!(
            "SQLite has no stored procedures (tried to call '{name}')"
        )))
    }

    fn set_charset(&mut self, charset: &str, collate: Option<&str>) -> Result<(), SqlSessionError> {
        if let Some(collate) = collate {
            tracing::debug!(collate, "SQLite has no connection collation; ignored");
        }
        // Only honored before the first table is created; harmless after.
        self.conn()?
            .execute_batch(&format!("PRAGMA encoding = '{charset}'"))?;
        Ok(())
    }

    fn server_version(&mut self) -> Result<String, SqlSessionError> {
        Ok(rusqlite::version().to_string())
    }

    fn table_names(&mut self) -> Result<Vec<String>, SqlSessionError> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT name FROM sqlite_master \
             WHERE type = 'table' AND name NOT LIKE 'sqlite_%' ORDER BY name",
        )?;
        let names = stmt
            .query_map([], |row| row.get::<_, String>(0))?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(names)
    }
}
