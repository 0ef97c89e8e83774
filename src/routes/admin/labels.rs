use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use axum_valid::Valid;
use serde::Deserialize;
use uuid::Uuid;

use super::{AdminError, visible_manufacturers};
use crate::{
    AppState,
    auth::AuthenticatedAccount,
    db::LabelFilter,
    models::{AccountRole, IssueLabel},
    routes::ApiSuccess,
};

/// Issue a label for the manufacturer admin's manufacturer
#[tracing::instrument(name = "admin.labels.issue", skip(state, auth, input), fields(product_id = %input.product_id))]
pub async fn issue(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedAccount>,
    Valid(Json(input)): Valid<Json<IssueLabel>>,
) -> Result<impl IntoResponse, AdminError> {
    auth.require(&[AccountRole::ManufacturerAdmin])?;
    let label = state
        .services
        .labels
        .issue(auth.associated_id()?, auth.id(), input)
        .await?;
    Ok((StatusCode::CREATED, ApiSuccess::new(label)))
}

/// Flip a label between show and hide
#[tracing::instrument(name = "admin.labels.toggle_status", skip(state, auth), fields(%id))]
pub async fn toggle_status(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedAccount>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AdminError> {
    let visible = visible_manufacturers(&state, &auth).await?;
    let label = state.services.labels.toggle_status(id, &visible).await?;
    Ok(ApiSuccess::new(label))
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct BatchesAndVariantsRequest {
    /// Required; an empty array means every product
    pub product_ids: Option<Vec<Uuid>>,
}

/// Variants used on the given products' labels
#[tracing::instrument(name = "admin.labels.batches_and_variants", skip(state, auth, body))]
pub async fn batches_and_variants(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedAccount>,
    Json(body): Json<BatchesAndVariantsRequest>,
) -> Result<impl IntoResponse, AdminError> {
    auth.require(&[AccountRole::ManufacturerAdmin])?;
    let product_ids = body
        .product_ids
        .ok_or_else(|| AdminError::bad_param("product_ids", "product_ids is required"))?;
    let filter = LabelFilter {
        product_ids,
        ..Default::default()
    };
    let visible = visible_manufacturers(&state, &auth).await?;
    let variants = state.services.labels.variants(visible, filter).await?;
    Ok(ApiSuccess::new(variants))
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct LabelSelector {
    pub brand_id: Option<Uuid>,
    pub product_id: Option<Uuid>,
    pub variant: Option<String>,
}

impl From<LabelSelector> for LabelFilter {
    fn from(selector: LabelSelector) -> Self {
        LabelFilter {
            brand_ids: selector.brand_id.into_iter().collect(),
            product_ids: selector.product_id.into_iter().collect(),
            variants: selector.variant.into_iter().collect(),
            user_ids: Vec::new(),
        }
    }
}

/// Batch numbers of labels for a brand, product and variant
#[tracing::instrument(name = "admin.labels.batch_numbers", skip(state, auth, body))]
pub async fn batch_numbers(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedAccount>,
    Json(body): Json<LabelSelector>,
) -> Result<impl IntoResponse, AdminError> {
    auth.require(&[AccountRole::ManufacturerAdmin])?;
    let visible = visible_manufacturers(&state, &auth).await?;
    let batches = state
        .services
        .labels
        .batch_numbers(visible, body.into())
        .await?;
    Ok(ApiSuccess::new(batches))
}

/// Variants of labels for a brand and product. Any `variant` sent is ignored.
#[tracing::instrument(name = "admin.labels.variants", skip(state, auth, body))]
pub async fn variants(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedAccount>,
    Json(body): Json<LabelSelector>,
) -> Result<impl IntoResponse, AdminError> {
    auth.require(&[AccountRole::ManufacturerAdmin])?;
    let visible = visible_manufacturers(&state, &auth).await?;
    let selector = LabelSelector {
        variant: None,
        ..body
    };
    let variants = state
        .services
        .labels
        .variants(visible, selector.into())
        .await?;
    Ok(ApiSuccess::new(variants))
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct MultipleVariantsRequest {
    pub brand_ids: Vec<Uuid>,
    pub product_ids: Vec<Uuid>,
}

/// Variants of labels across several brands and products
#[tracing::instrument(name = "admin.labels.multiple_variants", skip(state, auth, body))]
pub async fn multiple_variants(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedAccount>,
    Json(body): Json<MultipleVariantsRequest>,
) -> Result<impl IntoResponse, AdminError> {
    let filter = LabelFilter {
        brand_ids: body.brand_ids,
        product_ids: body.product_ids,
        ..Default::default()
    };
    let visible = visible_manufacturers(&state, &auth).await?;
    let variants = state.services.labels.variants(visible, filter).await?;
    Ok(ApiSuccess::new(variants))
}
