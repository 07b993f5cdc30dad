//! The capability seam between the session core and concrete drivers.

use std::sync::Arc;

use crate::config::SessionConfig;
use crate::error::SqlSessionError;
use crate::types::{BackendKind, SqlValue};

#[cfg(feature = "sqlite")]
mod sqlite;

#[cfg(feature = "sqlite")]
pub use sqlite::SqliteBackend;

/// What one statement execution reported back.
#[derive(Debug, Clone, Default)]
pub struct StatementOutcome {
    /// Fetched result rows as a shared column header plus ordered value
    /// rows; `None` when the statement produced no result set.
    pub rows: Option<(Arc<Vec<String>>, Vec<Vec<SqlValue>>)>,
    /// Rows affected, as reported by the driver.
    pub affected_rows: u64,
    /// Key generated by the most recent insert, when the driver tracks one.
    pub last_insert_id: i64,
}

/// Hooks a concrete backend family supplies.
///
/// The session core depends only on this trait. Statement text arriving at
/// [`Backend::execute`] has already been normalized to the marker this
/// backend reports from [`Backend::placeholder`].
pub trait Backend: Send {
    /// Open a connection using the given settings.
    fn connect(&mut self, config: &SessionConfig) -> Result<(), SqlSessionError>;

    /// Close the current connection.
    fn close(&mut self) -> Result<(), SqlSessionError>;

    fn is_connected(&self) -> bool;

    fn begin(&mut self) -> Result<(), SqlSessionError>;

    fn commit(&mut self) -> Result<(), SqlSessionError>;

    fn rollback(&mut self) -> Result<(), SqlSessionError>;

    /// The bound-parameter marker this backend's driver recognizes.
    fn placeholder(&self) -> &'static str;

    /// Execute one statement with bound positional arguments, fetching any
    /// result rows. The statement handle must not outlive the call.
    fn execute(&mut self, sql: &str, params: &[SqlValue])
    -> Result<StatementOutcome, SqlSessionError>;

    /// Invoke a named stored procedure with positional arguments.
    fn call_procedure(
        &mut self,
        name: &str,
        params: &[SqlValue],
    ) -> Result<StatementOutcome, SqlSessionError>;

    /// Set the connection character set and optional collation.
    fn set_charset(&mut self, charset: &str, collate: Option<&str>) -> Result<(), SqlSessionError>;

    /// Raw server version string, unparsed.
    fn server_version(&mut self) -> Result<String, SqlSessionError>;

    /// Table names in the current database.
    fn table_names(&mut self) -> Result<Vec<String>, SqlSessionError>;
}

/// Construct the backend implementation for a family.
#[must_use]
pub fn open_backend(kind: BackendKind) -> Box<dyn Backend> {
    match kind {
        #[cfg(feature = "sqlite")]
        BackendKind::Sqlite => Box::new(SqliteBackend::new()),
    }
}
