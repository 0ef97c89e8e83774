use async_trait::async_trait;
use uuid::Uuid;

use crate::{
    db::error::DbResult,
    models::{Company, CreateCompany, CreateSubcategory, NamedRef, Subcategory},
};

#[async_trait]
pub trait CompanyRepo: Send + Sync {
    /// Create a company and link it to the given subcategories.
    async fn create(&self, input: CreateCompany) -> DbResult<Company>;

    async fn get_by_id(&self, id: Uuid) -> DbResult<Option<Company>>;

    /// Visible companies registered by an account.
    async fn list_by_owner(&self, owner_account_id: Uuid) -> DbResult<Vec<Company>>;

    /// `{id, name}` of every visible company, ordered by name.
    async fn list_visible_refs(&self) -> DbResult<Vec<NamedRef>>;

    async fn create_subcategory(&self, input: CreateSubcategory) -> DbResult<Subcategory>;

    /// Subcategories linked to a company, ordered by title.
    async fn list_subcategories(&self, company_id: Uuid) -> DbResult<Vec<Subcategory>>;
}
