use axum::{Extension, Json, extract::State, http::StatusCode, response::IntoResponse};
use axum_valid::Valid;

use super::AdminError;
use crate::{
    AppState,
    auth::AuthenticatedAccount,
    models::{AccountRole, CreateAccount},
    routes::ApiSuccess,
};

/// Create a company or manufacturer admin (or another super admin)
#[tracing::instrument(name = "admin.accounts.create", skip(state, auth, input), fields(role = %input.role))]
pub async fn create(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedAccount>,
    Valid(Json(input)): Valid<Json<CreateAccount>>,
) -> Result<impl IntoResponse, AdminError> {
    auth.require(&[AccountRole::SuperAdmin])?;
    let account = state.services.accounts.create(input).await?;
    Ok((StatusCode::CREATED, ApiSuccess::new(account)))
}

/// Active companies, manufacturers and associated admins for the super admin pickers
#[tracing::instrument(name = "admin.accounts.associates_collections", skip(state, auth))]
pub async fn associates_collections(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedAccount>,
) -> Result<impl IntoResponse, AdminError> {
    auth.require(&[AccountRole::SuperAdmin])?;
    let collections = state.services.catalog.associates_collections().await?;
    Ok(ApiSuccess::new(collections))
}

/// The authenticated account
pub async fn role_info(
    Extension(auth): Extension<AuthenticatedAccount>,
) -> Result<impl IntoResponse, AdminError> {
    auth.require(&[AccountRole::SuperAdmin])?;
    Ok(ApiSuccess::new(auth.0))
}
