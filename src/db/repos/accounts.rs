use async_trait::async_trait;
use uuid::Uuid;

use crate::{
    db::error::DbResult,
    models::{Account, AccountSummary, CreateAccount},
};

#[async_trait]
pub trait AccountRepo: Send + Sync {
    /// Create an account. Fails with `Conflict` when the email is taken.
    async fn create(&self, input: CreateAccount) -> DbResult<Account>;

    async fn get_by_id(&self, id: Uuid) -> DbResult<Option<Account>>;

    async fn get_by_email(&self, email: &str) -> DbResult<Option<Account>>;

    /// Active company and manufacturer admins, ordered by name.
    async fn list_active_associates(&self) -> DbResult<Vec<AccountSummary>>;

    /// Count active accounts across the platform.
    async fn count_active(&self) -> DbResult<i64>;

    /// Count accounts associated with a company or manufacturer.
    async fn count_associated(&self, associated_id: Uuid) -> DbResult<i64>;
}
