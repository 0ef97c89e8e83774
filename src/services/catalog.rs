use std::sync::Arc;

use serde::Serialize;
use uuid::Uuid;

use crate::{
    db::{DbError, DbPool, DbResult, ProductLookup},
    models::{
        AccountSummary, Brand, BrandSummary, Company, CreateBrand, CreateCompany,
        CreateManufacturer, CreateProduct, CreateSubcategory, Manufacturer, NamedRef, Product,
        ProductSummary, Subcategory,
    },
};

/// Everything the super admin dashboard needs to populate its pickers.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct AssociatesCollections {
    pub active_companies: Vec<NamedRef>,
    pub active_manufacturers: Vec<NamedRef>,
    pub accounts: Vec<AccountSummary>,
}

/// Companies, manufacturers, brands and products.
#[derive(Clone)]
pub struct CatalogService {
    db: Arc<DbPool>,
}

impl CatalogService {
    pub fn new(db: Arc<DbPool>) -> Self {
        Self { db }
    }

    pub async fn create_company(&self, input: CreateCompany) -> DbResult<Company> {
        let company = self.db.companies().create(input).await?;
        tracing::info!(company_id = %company.id, "Company created");
        Ok(company)
    }

    pub async fn create_subcategory(&self, input: CreateSubcategory) -> DbResult<Subcategory> {
        self.db.companies().create_subcategory(input).await
    }

    pub async fn create_manufacturer(&self, input: CreateManufacturer) -> DbResult<Manufacturer> {
        let manufacturer = self.db.manufacturers().create(input).await?;
        tracing::info!(
            manufacturer_id = %manufacturer.id,
            company_id = %manufacturer.company_id,
            "Manufacturer created"
        );
        Ok(manufacturer)
    }

    pub async fn create_brand(&self, input: CreateBrand) -> DbResult<Brand> {
        self.db.brands().create(input).await
    }

    /// Create a product under an existing brand, inheriting the brand's company.
    pub async fn create_product(&self, input: CreateProduct) -> DbResult<Product> {
        let brand = self
            .db
            .brands()
            .get_by_id(input.brand_id)
            .await?
            .ok_or_else(|| DbError::Validation(format!("Brand '{}' not found", input.brand_id)))?;
        self.db.products().create(brand.company_id, input).await
    }

    pub async fn get_brand(&self, id: Uuid) -> DbResult<Option<Brand>> {
        self.db.brands().get_by_id(id).await
    }

    pub async fn get_manufacturer(&self, id: Uuid) -> DbResult<Option<Manufacturer>> {
        self.db.manufacturers().get_by_id(id).await
    }

    /// Company a manufacturer belongs to.
    pub async fn manufacturer_company(&self, manufacturer_id: Uuid) -> DbResult<Uuid> {
        self.get_manufacturer(manufacturer_id)
            .await?
            .map(|m| m.company_id)
            .ok_or(DbError::NotFound)
    }

    pub async fn company_brands(&self, company_id: Uuid) -> DbResult<Vec<BrandSummary>> {
        self.db.brands().list_visible_by_company(company_id).await
    }

    pub async fn company_subcategories(&self, company_id: Uuid) -> DbResult<Vec<Subcategory>> {
        self.db.companies().list_subcategories(company_id).await
    }

    /// Visible brands of the given companies; every company when empty.
    pub async fn brand_refs(&self, company_ids: &[Uuid]) -> DbResult<Vec<NamedRef>> {
        self.db.brands().list_visible_refs(company_ids).await
    }

    pub async fn products(&self, lookup: &ProductLookup) -> DbResult<Vec<ProductSummary>> {
        self.db.products().list_visible(lookup).await
    }

    /// Variants of every matching product, flattened in product order.
    pub async fn product_variants(&self, lookup: &ProductLookup) -> DbResult<Vec<String>> {
        let products = self.products(lookup).await?;
        Ok(products.into_iter().flat_map(|p| p.variants).collect())
    }

    pub async fn companies_owned_by(&self, account_id: Uuid) -> DbResult<Vec<Company>> {
        self.db.companies().list_by_owner(account_id).await
    }

    /// Active manufacturers of the given companies; every company when empty.
    pub async fn manufacturers(&self, company_ids: &[Uuid]) -> DbResult<Vec<Manufacturer>> {
        self.db.manufacturers().list_active(company_ids).await
    }

    pub async fn associates_collections(&self) -> DbResult<AssociatesCollections> {
        Ok(AssociatesCollections {
            active_companies: self.db.companies().list_visible_refs().await?,
            active_manufacturers: self.db.manufacturers().list_active_refs().await?,
            accounts: self.db.accounts().list_active_associates().await?,
        })
    }
}
