use async_trait::async_trait;
use uuid::Uuid;

use crate::{
    db::error::DbResult,
    models::{CreateProduct, Product, ProductSummary},
};

/// Restrictions for visible product lookups. Empty vectors mean no restriction.
#[derive(Debug, Clone, Default)]
pub struct ProductLookup {
    pub company_id: Option<Uuid>,
    pub brand_ids: Vec<Uuid>,
    pub product_ids: Vec<Uuid>,
}

#[async_trait]
pub trait ProductRepo: Send + Sync {
    /// Create a product under a brand. `company_id` is taken from the brand.
    async fn create(&self, company_id: Uuid, input: CreateProduct) -> DbResult<Product>;

    async fn get_by_id(&self, id: Uuid) -> DbResult<Option<Product>>;

    /// Visible products matching the lookup, ordered by name.
    async fn list_visible(&self, lookup: &ProductLookup) -> DbResult<Vec<ProductSummary>>;

    /// Count visible products across the platform.
    async fn count_visible(&self) -> DbResult<i64>;

    /// Count every product of a company regardless of status.
    async fn count_by_company(&self, company_id: Uuid) -> DbResult<i64>;
}
