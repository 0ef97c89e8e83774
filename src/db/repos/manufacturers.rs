use async_trait::async_trait;
use uuid::Uuid;

use crate::{
    db::error::DbResult,
    models::{CreateManufacturer, Manufacturer, NamedRef},
};

#[async_trait]
pub trait ManufacturerRepo: Send + Sync {
    async fn create(&self, input: CreateManufacturer) -> DbResult<Manufacturer>;

    async fn get_by_id(&self, id: Uuid) -> DbResult<Option<Manufacturer>>;

    /// Active manufacturers, optionally restricted to a set of companies.
    /// An empty `company_ids` slice means every company.
    async fn list_active(&self, company_ids: &[Uuid]) -> DbResult<Vec<Manufacturer>>;

    /// IDs of the active manufacturers of the given companies.
    /// Returns an empty list when `company_ids` is empty.
    async fn active_ids_for_companies(&self, company_ids: &[Uuid]) -> DbResult<Vec<Uuid>>;

    /// `{id, name}` of every active manufacturer, ordered by name.
    async fn list_active_refs(&self) -> DbResult<Vec<NamedRef>>;
}
