mod accounts;
mod brands;
mod common;
mod companies;
mod labels;
mod manufacturers;
mod products;
mod submissions;

pub use accounts::SqliteAccountRepo;
pub use brands::SqliteBrandRepo;
pub use companies::SqliteCompanyRepo;
pub use labels::SqliteLabelRepo;
pub use manufacturers::SqliteManufacturerRepo;
pub use products::SqliteProductRepo;
pub use submissions::SqliteSubmissionRepo;

use std::time::Duration;

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions};

use crate::config::SqliteConfig;

/// Open the pool described by `[database]`, with foreign keys enforced.
pub async fn connect(config: &SqliteConfig) -> Result<SqlitePool, sqlx::Error> {
    let journal_mode = if config.wal_mode {
        SqliteJournalMode::Wal
    } else {
        SqliteJournalMode::Delete
    };
    let options = SqliteConnectOptions::new()
        .filename(&config.path)
        .create_if_missing(config.create_if_missing)
        .foreign_keys(true)
        .journal_mode(journal_mode)
        .busy_timeout(Duration::from_millis(config.busy_timeout_ms));

    SqlitePoolOptions::new()
        .max_connections(config.max_connections)
        .connect_with(options)
        .await
}
