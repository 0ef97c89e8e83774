use axum::{Extension, Json, extract::State, http::StatusCode, response::IntoResponse};
use axum_valid::Valid;
use serde::Deserialize;
use uuid::Uuid;

use super::{AdminError, caller_company};
use crate::{
    AppState,
    auth::AuthenticatedAccount,
    db::ProductLookup,
    models::{
        AccountRole, CreateBrand, CreateCompany, CreateManufacturer, CreateProduct,
        CreateSubcategory,
    },
    routes::ApiSuccess,
};

const ALL_ADMINS: &[AccountRole] = &[
    AccountRole::SuperAdmin,
    AccountRole::CompanyAdmin,
    AccountRole::ManufacturerAdmin,
];
const SUPER_OR_COMPANY: &[AccountRole] = &[AccountRole::SuperAdmin, AccountRole::CompanyAdmin];

/// Company admins may only write into their own company.
fn check_company_access(auth: &AuthenticatedAccount, company_id: Uuid) -> Result<(), AdminError> {
    if auth.role() == AccountRole::CompanyAdmin && auth.associated_id()? != company_id {
        return Err(AdminError::Forbidden(
            "company admins may only manage their own company".to_string(),
        ));
    }
    Ok(())
}

// ============================================================================
// Writes
// ============================================================================

#[tracing::instrument(name = "admin.catalog.create_company", skip(state, auth, input))]
pub async fn create_company(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedAccount>,
    Valid(Json(input)): Valid<Json<CreateCompany>>,
) -> Result<impl IntoResponse, AdminError> {
    auth.require(&[AccountRole::SuperAdmin])?;
    let input = CreateCompany {
        owner_account_id: input.owner_account_id.or(Some(auth.id())),
        ..input
    };
    let company = state.services.catalog.create_company(input).await?;
    Ok((StatusCode::CREATED, ApiSuccess::new(company)))
}

#[tracing::instrument(name = "admin.catalog.create_subcategory", skip(state, auth, input))]
pub async fn create_subcategory(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedAccount>,
    Valid(Json(input)): Valid<Json<CreateSubcategory>>,
) -> Result<impl IntoResponse, AdminError> {
    auth.require(&[AccountRole::SuperAdmin])?;
    let subcategory = state.services.catalog.create_subcategory(input).await?;
    Ok((StatusCode::CREATED, ApiSuccess::new(subcategory)))
}

#[tracing::instrument(name = "admin.catalog.create_manufacturer", skip(state, auth, input), fields(company_id = %input.company_id))]
pub async fn create_manufacturer(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedAccount>,
    Valid(Json(input)): Valid<Json<CreateManufacturer>>,
) -> Result<impl IntoResponse, AdminError> {
    auth.require(&[AccountRole::SuperAdmin])?;
    let manufacturer = state.services.catalog.create_manufacturer(input).await?;
    Ok((StatusCode::CREATED, ApiSuccess::new(manufacturer)))
}

#[tracing::instrument(name = "admin.catalog.create_brand", skip(state, auth, input), fields(company_id = %input.company_id))]
pub async fn create_brand(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedAccount>,
    Valid(Json(input)): Valid<Json<CreateBrand>>,
) -> Result<impl IntoResponse, AdminError> {
    auth.require(SUPER_OR_COMPANY)?;
    check_company_access(&auth, input.company_id)?;
    let brand = state.services.catalog.create_brand(input).await?;
    Ok((StatusCode::CREATED, ApiSuccess::new(brand)))
}

#[tracing::instrument(name = "admin.catalog.create_product", skip(state, auth, input), fields(brand_id = %input.brand_id))]
pub async fn create_product(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedAccount>,
    Valid(Json(input)): Valid<Json<CreateProduct>>,
) -> Result<impl IntoResponse, AdminError> {
    auth.require(SUPER_OR_COMPANY)?;
    if let Some(brand) = state.services.catalog.get_brand(input.brand_id).await? {
        check_company_access(&auth, brand.company_id)?;
    }
    let product = state.services.catalog.create_product(input).await?;
    Ok((StatusCode::CREATED, ApiSuccess::new(product)))
}

// ============================================================================
// Lookups
// ============================================================================

/// Visible brands of the company admin's company
pub async fn company_brands(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedAccount>,
) -> Result<impl IntoResponse, AdminError> {
    auth.require(&[AccountRole::CompanyAdmin])?;
    let brands = state
        .services
        .catalog
        .company_brands(auth.associated_id()?)
        .await?;
    Ok(ApiSuccess::new(brands))
}

/// Subcategories the company admin's company operates in
pub async fn company_subcategories(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedAccount>,
) -> Result<impl IntoResponse, AdminError> {
    auth.require(&[AccountRole::CompanyAdmin])?;
    let subcategories = state
        .services
        .catalog
        .company_subcategories(auth.associated_id()?)
        .await?;
    Ok(ApiSuccess::new(subcategories))
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct BrandsForAllRequest {
    /// 1 restricts to `company_ids`, 2 to the caller's company
    pub level: Option<u8>,
    pub company_ids: Vec<Uuid>,
}

pub async fn brands_for_all(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedAccount>,
    Json(body): Json<BrandsForAllRequest>,
) -> Result<impl IntoResponse, AdminError> {
    auth.require(ALL_ADMINS)?;
    let company_ids = match body.level {
        Some(1) if !body.company_ids.is_empty() => body.company_ids,
        Some(2) => vec![caller_company(&state, &auth).await?],
        _ => Vec::new(),
    };
    let brands = state.services.catalog.brand_refs(&company_ids).await?;
    Ok(ApiSuccess::new(brands))
}

/// Visible brands of the manufacturer admin's company
pub async fn manufacturer_company_brands(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedAccount>,
) -> Result<impl IntoResponse, AdminError> {
    auth.require(&[AccountRole::ManufacturerAdmin])?;
    let company_id = caller_company(&state, &auth).await?;
    let brands = state.services.catalog.brand_refs(&[company_id]).await?;
    Ok(ApiSuccess::new(brands))
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct BrandProductsRequest {
    pub brand_id: Option<Uuid>,
}

/// Products of the manufacturer admin's company, optionally of one brand
pub async fn brand_products(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedAccount>,
    Json(body): Json<BrandProductsRequest>,
) -> Result<impl IntoResponse, AdminError> {
    auth.require(&[AccountRole::ManufacturerAdmin])?;
    let lookup = ProductLookup {
        company_id: Some(caller_company(&state, &auth).await?),
        brand_ids: body.brand_id.into_iter().collect(),
        product_ids: Vec::new(),
    };
    let products = state.services.catalog.products(&lookup).await?;
    Ok(ApiSuccess::new(products))
}

/// Companies registered by the caller
pub async fn companies(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedAccount>,
) -> Result<impl IntoResponse, AdminError> {
    auth.require(SUPER_OR_COMPANY)?;
    let companies = state.services.catalog.companies_owned_by(auth.id()).await?;
    Ok(ApiSuccess::new(companies))
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct CompanyIdsRequest {
    pub company_ids: Vec<Uuid>,
}

/// Active manufacturers of the requested companies.
///
/// Company admins always see their own company's manufacturers.
pub async fn companies_manufacturers(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedAccount>,
    Json(body): Json<CompanyIdsRequest>,
) -> Result<impl IntoResponse, AdminError> {
    auth.require(SUPER_OR_COMPANY)?;
    let company_ids = if auth.is_super_admin() {
        body.company_ids
    } else {
        vec![auth.associated_id()?]
    };
    let manufacturers = state.services.catalog.manufacturers(&company_ids).await?;
    Ok(ApiSuccess::new(manufacturers))
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ProductsRequest {
    pub brand_ids: Vec<Uuid>,
    pub product_ids: Vec<Uuid>,
}

impl From<ProductsRequest> for ProductLookup {
    fn from(body: ProductsRequest) -> Self {
        ProductLookup {
            company_id: None,
            brand_ids: body.brand_ids,
            product_ids: body.product_ids,
        }
    }
}

/// Visible products of the given brands; every brand when none are given
pub async fn brands_products(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedAccount>,
    Json(body): Json<ProductsRequest>,
) -> Result<impl IntoResponse, AdminError> {
    auth.require(ALL_ADMINS)?;
    let products = state.services.catalog.products(&body.into()).await?;
    Ok(ApiSuccess::new(products))
}

/// Variants of the matching products, flattened
pub async fn product_variants(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedAccount>,
    Json(body): Json<ProductsRequest>,
) -> Result<impl IntoResponse, AdminError> {
    auth.require(ALL_ADMINS)?;
    let variants = state
        .services
        .catalog
        .product_variants(&body.into())
        .await?;
    Ok(ApiSuccess::new(variants))
}
