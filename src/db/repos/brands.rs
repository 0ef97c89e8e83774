use async_trait::async_trait;
use uuid::Uuid;

use crate::{
    db::error::DbResult,
    models::{Brand, BrandSummary, CreateBrand, NamedRef},
};

#[async_trait]
pub trait BrandRepo: Send + Sync {
    async fn create(&self, input: CreateBrand) -> DbResult<Brand>;

    async fn get_by_id(&self, id: Uuid) -> DbResult<Option<Brand>>;

    /// Visible brands of one company with their warranty/help flags.
    async fn list_visible_by_company(&self, company_id: Uuid) -> DbResult<Vec<BrandSummary>>;

    /// `{id, name}` of visible brands, optionally restricted to a set of companies.
    /// An empty `company_ids` slice means every company.
    async fn list_visible_refs(&self, company_ids: &[Uuid]) -> DbResult<Vec<NamedRef>>;

    /// Count visible brands across the platform.
    async fn count_visible(&self) -> DbResult<i64>;

    /// Count every brand of a company regardless of status.
    async fn count_by_company(&self, company_id: Uuid) -> DbResult<i64>;
}
