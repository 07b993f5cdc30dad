//! The database session: connection lifecycle, execution engine, builder
//! helpers, transactions, and diagnostics.

mod diagnostics;
mod dml;
mod execute;
mod retrieve;
mod tx;

use std::fmt;
use std::time::Instant;

use crate::backend::{self, Backend};
use crate::config::SessionConfig;
use crate::error::SqlSessionError;
use crate::types::BackendKind;
use crate::util::clean_version;

pub use diagnostics::SavedQuery;
pub use execute::{ExecuteOptions, Executed};
pub use retrieve::{RowShape, RowShaped};

/// One logical database session.
///
/// A session exclusively owns its backend connection; create one session
/// per concurrent thread or worker. Every operation is synchronous and
/// runs to completion on the calling thread.
pub struct Session {
    backend: Box<dyn Backend>,
    config: SessionConfig,
    charset: Option<String>,
    collate: Option<String>,
    in_transaction: bool,
    save_queries: bool,
    saved_queries: Vec<SavedQuery>,
    last_query: Option<String>,
    last_error: String,
    last_insert_id: i64,
    affected_rows: u64,
    queries_executed: u64,
    time_start: Option<Instant>,
    time_stop: Option<Instant>,
}

impl Session {
    /// Open a session over the given backend, eagerly connecting.
    ///
    /// # Errors
    /// Returns the backend's connection failure.
    pub fn connect(
        backend: Box<dyn Backend>,
        config: SessionConfig,
    ) -> Result<Self, SqlSessionError> {
        let save_queries = config.save_queries;
        let mut session = Self {
            backend,
            config,
            charset: None,
            collate: None,
            in_transaction: false,
            save_queries,
            saved_queries: Vec::new(),
            last_query: None,
            last_error: String::new(),
            last_insert_id: 0,
            affected_rows: 0,
            queries_executed: 0,
            time_start: None,
            time_stop: None,
        };
        tracing::debug!(
            host = %session.config.host,
            port = session.config.port,
            user = %session.config.user,
            database = %session.config.database,
            "opening session"
        );
        session.backend.connect(&session.config)?;
        Ok(session)
    }

    /// Open a session for a backend family.
    ///
    /// # Errors
    /// Returns the backend's connection failure.
    pub fn open(kind: BackendKind, config: SessionConfig) -> Result<Self, SqlSessionError> {
        Self::connect(backend::open_backend(kind), config)
    }

    /// Close the current connection.
    ///
    /// # Errors
    /// `ConfigError` when the session has no open connection.
    pub fn close(&mut self) -> Result<(), SqlSessionError> {
        if !self.backend.is_connected() {
            return Err(SqlSessionError::ConfigError(
                "cannot close: session is not connected".into(),
            ));
        }
        self.backend.close()
    }

    /// Reconnect when the session was never connected (or was closed).
    pub(crate) fn ensure_connected(&mut self) -> Result<(), SqlSessionError> {
        if !self.backend.is_connected() {
            self.backend.connect(&self.config)?;
        }
        Ok(())
    }

    /// Run a backend operation, mirroring any failure into `last_error`
    /// before propagating it unchanged.
    pub(crate) fn run_backend<T>(
        &mut self,
        op: impl FnOnce(&mut dyn Backend) -> Result<T, SqlSessionError>,
    ) -> Result<T, SqlSessionError> {
        match op(self.backend.as_mut()) {
            Ok(value) => Ok(value),
            Err(err) => {
                self.last_error = err.to_string();
                tracing::debug!(error = %self.last_error, "backend operation failed");
                Err(err)
            }
        }
    }

    /// Set the connection character set and optional collation.
    ///
    /// # Errors
    /// Propagates the backend failure.
    pub fn set_charset(
        &mut self,
        charset: &str,
        collate: Option<&str>,
    ) -> Result<(), SqlSessionError> {
        tracing::debug!(charset, ?collate, "setting connection charset");
        self.run_backend(|b| b.set_charset(charset, collate))?;
        self.charset = Some(charset.to_string());
        self.collate = collate.map(str::to_string);
        Ok(())
    }

    /// Server version with any trailing non-numeric suffix stripped.
    ///
    /// # Errors
    /// Propagates the backend failure.
    pub fn server_version(&mut self) -> Result<String, SqlSessionError> {
        let raw = self.run_backend(|b| b.server_version())?;
        Ok(clean_version(&raw))
    }

    /// Table names in the connected database.
    ///
    /// # Errors
    /// Propagates the backend failure.
    pub fn table_names(&mut self) -> Result<Vec<String>, SqlSessionError> {
        self.run_backend(|b| b.table_names())
    }

    // ------------------------------------------------------------------
    // Read accessors
    // ------------------------------------------------------------------

    /// Whether a BEGIN has been issued without a matching COMMIT/ROLLBACK.
    #[must_use]
    pub fn in_transaction(&self) -> bool {
        self.in_transaction
    }

    #[must_use]
    pub fn is_connected(&self) -> bool {
        self.backend.is_connected()
    }

    /// Rows affected by the most recent statement.
    #[must_use]
    pub fn affected_rows(&self) -> u64 {
        self.affected_rows
    }

    /// Key generated by the most recent insert.
    #[must_use]
    pub fn last_insert_id(&self) -> i64 {
        self.last_insert_id
    }

    /// Statements executed since construction (or the last flush).
    #[must_use]
    pub fn queries_executed(&self) -> u64 {
        self.queries_executed
    }

    /// The most recent statement, post-normalization.
    #[must_use]
    pub fn last_query(&self) -> Option<&str> {
        self.last_query.as_deref()
    }

    /// The most recent backend error text.
    #[must_use]
    pub fn last_error(&self) -> &str {
        &self.last_error
    }

    #[must_use]
    pub fn charset(&self) -> Option<&str> {
        self.charset.as_deref()
    }

    #[must_use]
    pub fn collate(&self) -> Option<&str> {
        self.collate.as_deref()
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("database", &self.config.database)
            .field("connected", &self.backend.is_connected())
            .field("in_transaction", &self.in_transaction)
            .field("queries_executed", &self.queries_executed)
            .finish()
    }
}
