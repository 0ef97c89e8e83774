//! Unauthenticated end-user submissions.

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::post,
};
use axum_valid::Valid;

use super::{ApiSuccess, admin::AdminError};
use crate::{
    AppState,
    models::{CreateErrorReport, CreateHelpRequest, CreateWarranty},
};

pub fn public_routes() -> Router<AppState> {
    Router::new().nest(
        "/v1",
        Router::new()
            .route("/warranties", post(create_warranty))
            .route("/help-requests", post(create_help_request))
            .route("/error-reports", post(create_error_report)),
    )
}

/// Register a warranty against a printed label
#[tracing::instrument(name = "public.warranties.create", skip(state, input), fields(ds1 = %input.ds1))]
pub async fn create_warranty(
    State(state): State<AppState>,
    Valid(Json(input)): Valid<Json<CreateWarranty>>,
) -> Result<impl IntoResponse, AdminError> {
    let warranty = state.services.submissions.create_warranty(input).await?;
    Ok((StatusCode::CREATED, ApiSuccess::new(warranty)))
}

#[tracing::instrument(name = "public.help_requests.create", skip(state, input), fields(ds1 = %input.ds1))]
pub async fn create_help_request(
    State(state): State<AppState>,
    Valid(Json(input)): Valid<Json<CreateHelpRequest>>,
) -> Result<impl IntoResponse, AdminError> {
    let request = state.services.submissions.create_help_request(input).await?;
    Ok((StatusCode::CREATED, ApiSuccess::new(request)))
}

#[tracing::instrument(name = "public.error_reports.create", skip(state, input))]
pub async fn create_error_report(
    State(state): State<AppState>,
    Valid(Json(input)): Valid<Json<CreateErrorReport>>,
) -> Result<impl IntoResponse, AdminError> {
    let report = state.services.submissions.create_error_report(input).await?;
    Ok((StatusCode::CREATED, ApiSuccess::new(report)))
}
