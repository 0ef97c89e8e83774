use serde::{Deserialize, Serialize};

use super::ConfigError;

/// `[database]` section, selected by `type`.
///
/// Leaving it out is only useful for `labelhub --help` and the config tests;
/// `serve`, `migrate` and the account commands refuse to start without one.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(tag = "type", rename_all = "snake_case")]
#[serde(deny_unknown_fields)]
pub enum DatabaseConfig {
    #[default]
    None,

    #[cfg(feature = "database-sqlite")]
    Sqlite(SqliteConfig),
}

impl DatabaseConfig {
    pub fn is_none(&self) -> bool {
        matches!(self, DatabaseConfig::None)
    }

    /// Whether `serve` applies pending migrations before accepting requests.
    pub fn run_migrations(&self) -> bool {
        match self {
            DatabaseConfig::None => false,
            #[cfg(feature = "database-sqlite")]
            DatabaseConfig::Sqlite(sqlite) => sqlite.run_migrations,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        match self {
            DatabaseConfig::None => Ok(()),
            #[cfg(feature = "database-sqlite")]
            DatabaseConfig::Sqlite(sqlite) => sqlite.validate(),
        }
    }
}

/// A single SQLite file holding accounts, the catalog, labels and submissions.
#[cfg(feature = "database-sqlite")]
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SqliteConfig {
    pub path: String,
    pub create_if_missing: bool,
    pub run_migrations: bool,
    /// Write-ahead logging lets report queries read while labels are being issued.
    pub wal_mode: bool,
    pub busy_timeout_ms: u64,
    pub max_connections: u32,
}

#[cfg(feature = "database-sqlite")]
impl Default for SqliteConfig {
    fn default() -> Self {
        Self {
            path: "labelhub.db".into(),
            create_if_missing: true,
            run_migrations: true,
            wal_mode: true,
            busy_timeout_ms: 5_000,
            max_connections: 5,
        }
    }
}

#[cfg(feature = "database-sqlite")]
impl SqliteConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        if self.path.trim().is_empty() {
            return Err(ConfigError::Validation(
                "database.path must name a file".into(),
            ));
        }
        if self.max_connections == 0 {
            return Err(ConfigError::Validation(
                "database.max_connections must be at least 1".into(),
            ));
        }
        Ok(())
    }
}
