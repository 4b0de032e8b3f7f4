// SQLite Store Configuration

use h5p_editor_core::error::{AppError, Result};
use std::fmt;
use std::time::Duration;

const DEFAULT_DATABASE_URL: &str = "sqlite::memory:";
const DEFAULT_TABLE_PREFIX: &str = "wp_";
const DEFAULT_MAX_CONNECTIONS: u32 = 10;
const DEFAULT_BUSY_TIMEOUT: Duration = Duration::from_secs(5);
const MAX_PREFIX_LEN: usize = 32;

/// Validated table name prefix
///
/// The prefix is the only piece of SQL text that is not a bound parameter,
/// so it is restricted to ASCII alphanumerics and underscores.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TablePrefix(String);

impl TablePrefix {
    pub fn new(prefix: impl Into<String>) -> Result<Self> {
        let prefix = prefix.into();

        if prefix.len() > MAX_PREFIX_LEN {
            return Err(AppError::Config(format!(
                "Table prefix too long: {} characters (max {})",
                prefix.len(),
                MAX_PREFIX_LEN
            )));
        }

        if !prefix
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_')
        {
            return Err(AppError::Config(format!(
                "Table prefix must be alphanumeric or underscore: {:?}",
                prefix
            )));
        }

        Ok(Self(prefix))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Full table name for `table` (e.g. `wp_` + `h5p_libraries`)
    pub(crate) fn table(&self, table: &str) -> String {
        format!("{}{}", self.0, table)
    }

    /// Substitute `{prefix}` placeholders in migration SQL
    pub(crate) fn apply(&self, sql: &str) -> String {
        sql.replace("{prefix}", &self.0)
    }
}

impl Default for TablePrefix {
    fn default() -> Self {
        Self(DEFAULT_TABLE_PREFIX.to_string())
    }
}

impl fmt::Display for TablePrefix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Connection and schema settings for the SQLite store
#[derive(Debug, Clone)]
pub struct SqliteStoreConfig {
    /// `sqlite::memory:`, `sqlite://path/to/file.db` or a plain file path
    pub database_url: String,
    pub table_prefix: TablePrefix,
    pub max_connections: u32,
    pub busy_timeout: Duration,
}

impl SqliteStoreConfig {
    pub fn new(database_url: impl Into<String>) -> Self {
        Self {
            database_url: database_url.into(),
            ..Default::default()
        }
    }

    /// In-memory databases exist per connection, so they must not be pooled
    pub(crate) fn is_in_memory(&self) -> bool {
        self.database_url.contains(":memory:") || self.database_url.contains("mode=memory")
    }
}

impl Default for SqliteStoreConfig {
    fn default() -> Self {
        Self {
            database_url: DEFAULT_DATABASE_URL.to_string(),
            table_prefix: TablePrefix::default(),
            max_connections: DEFAULT_MAX_CONNECTIONS,
            busy_timeout: DEFAULT_BUSY_TIMEOUT,
        }
    }
}
