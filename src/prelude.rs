//! Convenient imports for common functionality.

pub use crate::backend::{Backend, StatementOutcome};
pub use crate::config::{SessionConfig, SessionConfigBuilder};
pub use crate::error::SqlSessionError;
pub use crate::records::{Record, RecordCollection};
pub use crate::session::{ExecuteOptions, Executed, RowShape, RowShaped, SavedQuery, Session};
pub use crate::translation::normalize_template;
pub use crate::types::{BackendKind, ColumnMap, SqlValue};

#[cfg(feature = "sqlite")]
pub use crate::backend::SqliteBackend;
