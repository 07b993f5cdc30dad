use std::panic::Location;
use std::path::Path;

use crate::error::SqlSessionError;
use crate::records::{Record, RecordCollection};
use crate::session::{SavedQuery, Session};
use crate::translation::normalize_template;
use crate::types::SqlValue;

/// Per-call options for [`Session::execute`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExecuteOptions {
    /// Treat the statement text as a stored-procedure name.
    pub stored_procedure: bool,
    /// Collapse the result to its first row.
    pub single_row: bool,
}

impl ExecuteOptions {
    #[must_use]
    pub fn with_stored_procedure(mut self) -> Self {
        self.stored_procedure = true;
        self
    }

    #[must_use]
    pub fn with_single_row(mut self) -> Self {
        self.single_row = true;
        self
    }
}

/// What one [`Session::execute`] call produced.
#[derive(Debug)]
pub enum Executed {
    /// The statement's result rows.
    Collection(RecordCollection),
    /// First row (or `None`) when single-row mode was requested.
    Single(Option<Record>),
    /// The statement produced no result set (the usual DML outcome).
    NoRows,
}

impl Executed {
    /// The result rows, when the statement produced a collection.
    #[must_use]
    pub fn collection(self) -> Option<RecordCollection> {
        match self {
            Executed::Collection(rows) => Some(rows),
            _ => None,
        }
    }

    /// The single row, when single-row mode produced one.
    #[must_use]
    pub fn single(self) -> Option<Record> {
        match self {
            Executed::Single(row) => row,
            _ => None,
        }
    }
}

impl Session {
    /// Execute a statement against the current connection.
    ///
    /// Templates may use the legacy `%s`/`%d`/`%f` marker conventions
    /// (quoted or bare); they are normalized to the backend's native
    /// marker before binding. The number of markers must match
    /// `params.len()` — a mismatch is not validated here and fails at the
    /// backend's bind step.
    ///
    /// With `stored_procedure` set the text is a procedure name, no
    /// normalization happens, and the argument list is invoked directly.
    ///
    /// # Errors
    /// Propagates backend failures unchanged; the failure text is also
    /// recorded on the session.
    #[track_caller]
    pub fn execute(
        &mut self,
        sql: &str,
        params: &[SqlValue],
        options: ExecuteOptions,
    ) -> Result<Executed, SqlSessionError> {
        let caller = Location::caller();
        self.ensure_connected()?;

        let outcome = if options.stored_procedure {
            let joined = params
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(", ");
            self.last_query = Some(if joined.is_empty() {
                sql.to_string()
            } else {
                format!("{sql} {joined}")
            });
            self.run_backend(|b| b.call_procedure(sql, params))?
        } else {
            let normalized = normalize_template(sql, self.backend.placeholder());
            tracing::debug!(statement = %normalized, "executing statement");
            self.last_query = Some(normalized.clone());

            if self.save_queries {
                self.timer_start();
            }
            let outcome = self.run_backend(|b| b.execute(&normalized, params))?;
            if self.save_queries {
                self.timer_stop();
                let elapsed = self.last_elapsed().unwrap_or_default();
                self.saved_queries.push(SavedQuery {
                    statement: normalized,
                    elapsed,
                    caller: format!("file {}, line {}", caller.file(), caller.line()),
                });
            }
            self.queries_executed += 1;
            outcome
        };

        self.affected_rows = outcome.affected_rows;
        self.last_insert_id = outcome.last_insert_id;

        let Some((columns, raw_rows)) = outcome.rows else {
            return Ok(Executed::NoRows);
        };
        let producer = raw_rows
            .into_iter()
            .map(move |values| Record::new(columns.clone(), values));
        let mut collection = RecordCollection::new(Box::new(producer));
        if options.single_row {
            Ok(Executed::Single(collection.first()?.cloned()))
        } else {
            Ok(Executed::Collection(collection))
        }
    }

    /// Execute and return the first result row, or `None`.
    ///
    /// # Errors
    /// Propagates backend failures unchanged.
    #[track_caller]
    pub fn query_one(
        &mut self,
        sql: &str,
        params: &[SqlValue],
    ) -> Result<Option<Record>, SqlSessionError> {
        match self.execute(sql, params, ExecuteOptions::default().with_single_row())? {
            Executed::Single(row) => Ok(row),
            _ => Ok(None),
        }
    }

    /// Execute the statement contained in a file.
    ///
    /// # Errors
    /// `ResourceError` when the path is missing, is a directory, or cannot
    /// be read; backend failures otherwise.
    #[track_caller]
    pub fn query_file(
        &mut self,
        path: impl AsRef<Path>,
        params: &[SqlValue],
    ) -> Result<Executed, SqlSessionError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(SqlSessionError::ResourceError(format!(
                "file '{}' not found",
                path.display()
            )));
        }
        if path.is_dir() {
            return Err(SqlSessionError::ResourceError(format!(
                "'{}' is a directory",
                path.display()
            )));
        }
        let sql = std::fs::read_to_string(path).map_err(|err| {
            SqlSessionError::ResourceError(format!("failed to read '{}': {err}", path.display()))
        })?;
        self.execute(&sql, params, ExecuteOptions::default())
    }

    /// Invoke a named stored procedure.
    ///
    /// # Errors
    /// Propagates backend failures unchanged; `Unimplemented` on backends
    /// without stored procedures.
    #[track_caller]
    pub fn call_procedure(
        &mut self,
        procedure: &str,
        params: &[SqlValue],
    ) -> Result<Executed, SqlSessionError> {
        self.execute(
            procedure,
            params,
            ExecuteOptions::default().with_stored_procedure(),
        )
    }
}
