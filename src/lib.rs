//! Synchronous database session layer.
//!
//! A [`Session`](session::Session) owns one backend connection, prepares
//! parameterized SQL, executes it, tracks transaction and diagnostic
//! state, and materializes results into a uniform
//! [`Record`](records::Record)/[`RecordCollection`](records::RecordCollection)
//! model independent of the driver's native row type. Backends plug in
//! through the [`Backend`](backend::Backend) capability trait; a `SQLite`
//! implementation ships behind the default `sqlite` feature.
//!
//! Values always travel as bound arguments. Never interpolate untrusted
//! input into statement text:
//!
//! ```rust,no_run
//! use sql_session::prelude::*;
//!
//! fn rename(db: &mut Session, id: i64, name: &str) -> Result<(), SqlSessionError> {
//!     // Insecure, do not do this:
//!     //     let sql = format!("UPDATE people SET name = '{name}' WHERE id = {id}");
//!     // Bind instead:
//!     db.execute(
//!         "UPDATE people SET name = %s WHERE id = %d",
//!         &[SqlValue::Text(name.into()), SqlValue::Int(id)],
//!         ExecuteOptions::default(),
//!     )?;
//!     Ok(())
//! }
//! ```

pub mod backend;
pub mod config;
mod error;
pub mod records;
pub mod session;
pub mod translation;
mod types;
mod util;

pub mod prelude;

pub use config::{SessionConfig, SessionConfigBuilder};
pub use error::SqlSessionError;
pub use session::Session;
pub use types::{BackendKind, ColumnMap, SqlValue};
pub use util::format_duration;
