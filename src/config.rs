use serde::{Deserialize, Serialize};

/// Connection settings handed to a backend when a session opens.
///
/// For server backends all five fields matter; file-backed backends such
/// as `SQLite` read only `database` (the file path, or `:memory:`).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SessionConfig {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub database: String,
    /// Collect a [`SavedQuery`](crate::session::SavedQuery) entry per
    /// executed statement.
    pub save_queries: bool,
}

impl SessionConfig {
    #[must_use]
    pub fn builder() -> SessionConfigBuilder {
        SessionConfigBuilder {
            config: SessionConfig::default(),
        }
    }

    /// Shorthand for a file-backed database config.
    #[must_use]
    pub fn for_database(database: impl Into<String>) -> Self {
        SessionConfig {
            database: database.into(),
            ..SessionConfig::default()
        }
    }
}

/// Fluent builder for [`SessionConfig`].
#[derive(Debug, Clone)]
pub struct SessionConfigBuilder {
    config: SessionConfig,
}

impl SessionConfigBuilder {
    #[must_use]
    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.config.host = host.into();
        self
    }

    #[must_use]
    pub fn port(mut self, port: u16) -> Self {
        self.config.port = port;
        self
    }

    #[must_use]
    pub fn user(mut self, user: impl Into<String>) -> Self {
        self.config.user = user.into();
        self
    }

    #[must_use]
    pub fn password(mut self, password: impl Into<String>) -> Self {
        self.config.password = password.into();
        self
    }

    #[must_use]
    pub fn database(mut self, database: impl Into<String>) -> Self {
        self.config.database = database.into();
        self
    }

    #[must_use]
    pub fn save_queries(mut self, save_queries: bool) -> Self {
        self.config.save_queries = save_queries;
        self
    }

    #[must_use]
    pub fn finish(self) -> SessionConfig {
        self.config
    }
}
