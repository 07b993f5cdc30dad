//! Transaction control layered on the session's connection.

use crate::error::SqlSessionError;
use crate::session::Session;

impl Session {
    /// Begin a transaction.
    ///
    /// # Errors
    /// `ConfigError` without an open connection, or when a transaction is
    /// already open (nested transactions are rejected outright rather
    /// than deferred to backend semantics).
    pub fn begin(&mut self) -> Result<(), SqlSessionError> {
        if !self.backend.is_connected() {
            return Err(SqlSessionError::ConfigError(
                "cannot BEGIN: session has no open connection".into(),
            ));
        }
        if self.in_transaction {
            return Err(SqlSessionError::ConfigError(
                "cannot BEGIN: a transaction is already open".into(),
            ));
        }
        self.run_backend(|b| b.begin())?;
        self.in_transaction = true;
        tracing::debug!("transaction started");
        Ok(())
    }

    /// Commit the current transaction.
    ///
    /// Permitted outside a transaction (a no-op commit on most backends);
    /// the in-transaction flag is cleared unconditionally.
    ///
    /// # Errors
    /// `ConfigError` without an open connection; backend failures
    /// otherwise.
    pub fn commit(&mut self) -> Result<(), SqlSessionError> {
        if !self.backend.is_connected() {
            return Err(SqlSessionError::ConfigError(
                "cannot COMMIT: session has no open connection".into(),
            ));
        }
        self.run_backend(|b| b.commit())?;
        self.in_transaction = false;
        tracing::debug!("transaction committed");
        Ok(())
    }

    /// Roll back the current transaction.
    ///
    /// # Errors
    /// `ConfigError` without an open connection or outside a transaction;
    /// backend failures otherwise.
    pub fn rollback(&mut self) -> Result<(), SqlSessionError> {
        if !self.backend.is_connected() || !self.in_transaction {
            return Err(SqlSessionError::ConfigError(
                "cannot ROLLBACK: no open connection or no transaction in progress".into(),
            ));
        }
        self.run_backend(|b| b.rollback())?;
        self.in_transaction = false;
        tracing::debug!("transaction rolled back");
        Ok(())
    }
}
