mod error;
pub mod repos;
#[cfg(feature = "database-sqlite")]
pub mod sqlite;

#[cfg(all(test, feature = "database-sqlite"))]
pub mod tests;

use std::sync::Arc;

pub use error::{DbError, DbResult};
pub use repos::*;

use crate::config::DatabaseConfig;

/// One trait object per repository, shared by every request.
struct CachedRepos {
    accounts: Arc<dyn AccountRepo>,
    companies: Arc<dyn CompanyRepo>,
    manufacturers: Arc<dyn ManufacturerRepo>,
    brands: Arc<dyn BrandRepo>,
    products: Arc<dyn ProductRepo>,
    labels: Arc<dyn LabelRepo>,
    submissions: Arc<dyn SubmissionRepo>,
}

#[cfg(feature = "database-sqlite")]
impl CachedRepos {
    fn sqlite(pool: &sqlx::SqlitePool) -> Self {
        Self {
            accounts: Arc::new(sqlite::SqliteAccountRepo::new(pool.clone())),
            companies: Arc::new(sqlite::SqliteCompanyRepo::new(pool.clone())),
            manufacturers: Arc::new(sqlite::SqliteManufacturerRepo::new(pool.clone())),
            brands: Arc::new(sqlite::SqliteBrandRepo::new(pool.clone())),
            products: Arc::new(sqlite::SqliteProductRepo::new(pool.clone())),
            labels: Arc::new(sqlite::SqliteLabelRepo::new(pool.clone())),
            submissions: Arc::new(sqlite::SqliteSubmissionRepo::new(pool.clone())),
        }
    }
}

enum PoolStorage {
    #[cfg(feature = "database-sqlite")]
    Sqlite(sqlx::SqlitePool),
    #[cfg(not(feature = "database-sqlite"))]
    _None(std::convert::Infallible),
}

/// The label store: a connection pool plus the repositories built on it.
pub struct DbPool {
    inner: PoolStorage,
    repos: CachedRepos,
}

impl DbPool {
    /// Wrap an already-open pool. Tests use this with in-memory databases.
    #[cfg(feature = "database-sqlite")]
    pub fn from_sqlite(pool: sqlx::SqlitePool) -> Self {
        DbPool {
            repos: CachedRepos::sqlite(&pool),
            inner: PoolStorage::Sqlite(pool),
        }
    }

    pub async fn from_config(config: &DatabaseConfig) -> DbResult<Self> {
        match config {
            DatabaseConfig::None => Err(DbError::NotConfigured),
            #[cfg(feature = "database-sqlite")]
            DatabaseConfig::Sqlite(sqlite_config) => {
                let pool = sqlite::connect(sqlite_config).await?;
                tracing::debug!(path = %sqlite_config.path, "Opened SQLite database");
                Ok(Self::from_sqlite(pool))
            }
        }
    }

    /// Apply `migrations_sqlx/sqlite`; sqlx records what ran in `_sqlx_migrations`.
    pub async fn run_migrations(&self) -> DbResult<()> {
        match &self.inner {
            #[cfg(feature = "database-sqlite")]
            PoolStorage::Sqlite(pool) => {
                sqlx::migrate!("./migrations_sqlx/sqlite").run(pool).await?;
                tracing::info!("Label store schema is up to date");
                Ok(())
            }
            #[cfg(not(feature = "database-sqlite"))]
            PoolStorage::_None(infallible) => match *infallible {},
        }
    }

    pub fn accounts(&self) -> Arc<dyn AccountRepo> {
        Arc::clone(&self.repos.accounts)
    }

    /// Companies and their subcategories
    pub fn companies(&self) -> Arc<dyn CompanyRepo> {
        Arc::clone(&self.repos.companies)
    }

    pub fn manufacturers(&self) -> Arc<dyn ManufacturerRepo> {
        Arc::clone(&self.repos.manufacturers)
    }

    pub fn brands(&self) -> Arc<dyn BrandRepo> {
        Arc::clone(&self.repos.brands)
    }

    pub fn products(&self) -> Arc<dyn ProductRepo> {
        Arc::clone(&self.repos.products)
    }

    pub fn labels(&self) -> Arc<dyn LabelRepo> {
        Arc::clone(&self.repos.labels)
    }

    /// Warranties, help requests and error reports
    pub fn submissions(&self) -> Arc<dyn SubmissionRepo> {
        Arc::clone(&self.repos.submissions)
    }

    /// Round-trip a trivial query; used by `/health` and `/health/ready`.
    pub async fn health_check(&self) -> DbResult<()> {
        match &self.inner {
            #[cfg(feature = "database-sqlite")]
            PoolStorage::Sqlite(pool) => {
                sqlx::query("SELECT 1").execute(pool).await?;
                Ok(())
            }
            #[cfg(not(feature = "database-sqlite"))]
            PoolStorage::_None(infallible) => match *infallible {},
        }
    }
}
