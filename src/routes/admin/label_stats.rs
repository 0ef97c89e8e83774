//! Label statistics for the three admin dashboards.

use axum::{Extension, Json, extract::State, response::IntoResponse};
use serde::Deserialize;
use uuid::Uuid;

use super::AdminError;
use crate::{
    AppState,
    auth::AuthenticatedAccount,
    db::LabelFilter,
    models::AccountRole,
    reports::{LabelReport, ReportScope, parse_reference_date, require_reference_date},
    routes::ApiSuccess,
};

/// Filters shared by the statistics endpoints. Missing arrays mean no restriction.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct StatsRequest {
    /// Reference date, `YYYY-MM-DD` or RFC 3339
    pub date: Option<String>,
    pub company_ids: Vec<Uuid>,
    pub manufacturer_ids: Vec<Uuid>,
    pub brand_ids: Vec<Uuid>,
    pub product_ids: Vec<Uuid>,
    pub variants: Vec<String>,
    pub user_ids: Vec<Uuid>,
}

impl StatsRequest {
    pub(crate) fn label_filter(&self) -> LabelFilter {
        LabelFilter {
            brand_ids: self.brand_ids.clone(),
            product_ids: self.product_ids.clone(),
            variants: self.variants.clone(),
            user_ids: self.user_ids.clone(),
        }
    }
}

async fn respond(
    state: &AppState,
    scope: ReportScope,
    body: StatsRequest,
) -> Result<ApiSuccess<LabelReport>, AdminError> {
    let reference = require_reference_date(body.date.as_deref())?;
    let report = state
        .services
        .label_reports
        .statistics(&scope, body.label_filter(), reference)
        .await?;
    Ok(ApiSuccess::new(report))
}

/// Platform-wide statistics, optionally narrowed to companies or manufacturers
#[tracing::instrument(name = "admin.label_stats.super_admin", skip(state, auth, body))]
pub async fn super_admin_stats(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedAccount>,
    Json(body): Json<StatsRequest>,
) -> Result<impl IntoResponse, AdminError> {
    auth.require(&[AccountRole::SuperAdmin])?;
    let scope = ReportScope::Platform {
        company_ids: body.company_ids.clone(),
        manufacturer_ids: body.manufacturer_ids.clone(),
    };
    respond(&state, scope, body).await
}

/// Statistics over the company admin's manufacturers
#[tracing::instrument(name = "admin.label_stats.company", skip(state, auth, body))]
pub async fn company_stats(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedAccount>,
    Json(body): Json<StatsRequest>,
) -> Result<impl IntoResponse, AdminError> {
    auth.require(&[AccountRole::CompanyAdmin])?;
    let scope = ReportScope::Company {
        company_id: auth.associated_id()?,
        manufacturer_ids: body.manufacturer_ids.clone(),
    };
    respond(&state, scope, body).await
}

/// Statistics over labels the manufacturer admin issued
#[tracing::instrument(name = "admin.label_stats.manufacturer", skip(state, auth, body))]
pub async fn manufacturer_stats(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedAccount>,
    Json(body): Json<StatsRequest>,
) -> Result<impl IntoResponse, AdminError> {
    auth.require(&[AccountRole::ManufacturerAdmin])?;
    let scope = ReportScope::Manufacturer {
        manufacturer_id: auth.associated_id()?,
        account_id: auth.id(),
    };
    respond(&state, scope, body).await
}

/// Every field is required; `None` means the client left it out.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct LabelCountRequest {
    pub brand_ids: Option<Vec<Uuid>>,
    pub product_ids: Option<Vec<Uuid>>,
    pub variants: Option<Vec<String>>,
    pub date: Option<String>,
}

fn required<T>(value: Option<T>, param: &str) -> Result<T, AdminError> {
    value.ok_or_else(|| AdminError::bad_param(param, format!("{param} is required")))
}

/// Daily label counts over the trailing months ending on `date`
#[tracing::instrument(name = "admin.label_stats.label_count", skip(state, auth, body))]
pub async fn label_count(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedAccount>,
    Json(body): Json<LabelCountRequest>,
) -> Result<impl IntoResponse, AdminError> {
    auth.require(&[AccountRole::ManufacturerAdmin])?;
    let filter = LabelFilter {
        brand_ids: required(body.brand_ids, "brand_ids")?,
        product_ids: required(body.product_ids, "product_ids")?,
        variants: required(body.variants, "variants")?,
        user_ids: Vec::new(),
    };
    let reference = parse_reference_date(&required(body.date, "date")?)?;

    let counts = state
        .services
        .label_reports
        .daily_counts(auth.associated_id()?, filter, reference)
        .await?;
    Ok(ApiSuccess::new(counts))
}
