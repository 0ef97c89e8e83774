//! Configuration module for labelhub.
//!
//! The service is configured via a TOML file, with support for environment
//! variable interpolation using `${VAR_NAME}` syntax.
//!
//! # Example
//!
//! ```toml
//! [server]
//! port = 8080
//!
//! [database]
//! type = "sqlite"
//! path = "labelhub.db"
//!
//! [auth]
//! jwt_secret = "${LABELHUB_JWT_SECRET}"
//!
//! [reports]
//! company_lookback_months = 2
//! ```

mod auth;
mod database;
mod observability;
mod reports;
mod server;

use std::{path::Path, sync::LazyLock};

pub use auth::*;
pub use database::*;
pub use observability::*;
use regex::Regex;
pub use reports::*;
use serde::{Deserialize, Serialize};
pub use server::*;

static ENV_VAR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)\}").unwrap());

/// Contents of `labelhub.toml`.
///
/// Every section may be omitted except `[auth]`, which needs a signing secret
/// before any admin token can be issued or checked.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LabelhubConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
    pub observability: ObservabilityConfig,
    /// Report windows and CSV thresholds
    pub reports: ReportsConfig,
}

impl LabelhubConfig {
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents =
            std::fs::read_to_string(path).map_err(|e| ConfigError::Io(e, path.to_path_buf()))?;
        Self::from_str(&contents)
    }

    /// Expand `${VAR}` references, parse, then validate every section.
    pub fn from_str(contents: &str) -> Result<Self, ConfigError> {
        let config: LabelhubConfig = toml::from_str(&expand_env_vars(contents)?)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        self.database.validate()?;
        self.auth.validate()?;
        self.reports.validate()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {1}: {0}")]
    Io(std::io::Error, std::path::PathBuf),

    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Environment variable not found: {0}")]
    EnvVarNotFound(String),

    #[error("Configuration validation error: {0}")]
    Validation(String),
}

/// Replace `${VAR}` with the variable's value. Text after `#` is a TOML
/// comment and is copied untouched.
fn expand_env_vars(input: &str) -> Result<String, ConfigError> {
    let mut expanded = String::with_capacity(input.len());

    for line in input.split_inclusive('\n') {
        let (code, comment) = line.split_at(line.find('#').unwrap_or(line.len()));
        let mut copied_to = 0;
        for caps in ENV_VAR_RE.captures_iter(code) {
            let (Some(whole), Some(name)) = (caps.get(0), caps.get(1)) else {
                continue;
            };
            let value = std::env::var(name.as_str())
                .map_err(|_| ConfigError::EnvVarNotFound(name.as_str().to_string()))?;
            expanded.push_str(&code[copied_to..whole.start()]);
            expanded.push_str(&value);
            copied_to = whole.end();
        }
        expanded.push_str(&code[copied_to..]);
        expanded.push_str(comment);
    }

    Ok(expanded)
}
