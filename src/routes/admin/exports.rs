//! CSV download endpoints.

use axum::{Extension, Json, extract::State};
use chrono::NaiveDate;
use serde::Deserialize;
use uuid::Uuid;

use super::{
    AdminError, caller_company,
    csv_export::{
        CsvResponse, export_daily_counts_csv, export_error_reports_csv, export_help_requests_csv,
        export_warranties_csv,
    },
};
use crate::{
    AppState,
    auth::AuthenticatedAccount,
    db::LabelFilter,
    models::{AccountRole, SubmissionQuery},
    reports::{ReportScope, end_of_day, midnight, parse_reference_date},
    services::LabelReportError,
};

fn export_failed(err: impl std::fmt::Display) -> AdminError {
    AdminError::Internal(err.to_string())
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct StatsCsvRequest {
    /// Days back from now; the configured `export_days` when absent
    pub days: Option<u32>,
    pub company_ids: Vec<Uuid>,
    pub manufacturer_ids: Vec<Uuid>,
    pub brand_ids: Vec<Uuid>,
    pub product_ids: Vec<Uuid>,
    pub variants: Vec<String>,
    pub user_ids: Vec<Uuid>,
}

impl StatsCsvRequest {
    fn label_filter(&self) -> LabelFilter {
        LabelFilter {
            brand_ids: self.brand_ids.clone(),
            product_ids: self.product_ids.clone(),
            variants: self.variants.clone(),
            user_ids: self.user_ids.clone(),
        }
    }
}

async fn busy_days_csv(
    state: &AppState,
    scope: ReportScope,
    body: StatsCsvRequest,
    filename: &str,
) -> Result<CsvResponse, AdminError> {
    let counts = state
        .services
        .label_reports
        .busy_days(&scope, body.label_filter(), body.days)
        .await
        .map_err(|e| match e {
            LabelReportError::Report(_) => {
                AdminError::bad_param("days", "days reaches past the earliest supported date")
            }
            other => other.into(),
        })?;
    let data = export_daily_counts_csv(&counts).map_err(export_failed)?;
    Ok(CsvResponse {
        data,
        filename: filename.to_string(),
    })
}

/// Busy days for the super admin or company admin scope
#[tracing::instrument(name = "admin.exports.label_stats", skip(state, auth, body))]
pub async fn filter_and_download_csv(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedAccount>,
    Json(body): Json<StatsCsvRequest>,
) -> Result<CsvResponse, AdminError> {
    auth.require(&[AccountRole::SuperAdmin, AccountRole::CompanyAdmin])?;
    let scope = if auth.is_super_admin() {
        ReportScope::Platform {
            company_ids: body.company_ids.clone(),
            manufacturer_ids: body.manufacturer_ids.clone(),
        }
    } else {
        ReportScope::Company {
            company_id: auth.associated_id()?,
            manufacturer_ids: body.manufacturer_ids.clone(),
        }
    };
    busy_days_csv(&state, scope, body, "label-stats.csv").await
}

/// Busy days of labels the manufacturer admin issued
#[tracing::instrument(name = "admin.exports.manufacturer_label_stats", skip(state, auth, body))]
pub async fn manufacturer_filter_and_csv(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedAccount>,
    Json(body): Json<StatsCsvRequest>,
) -> Result<CsvResponse, AdminError> {
    auth.require(&[AccountRole::ManufacturerAdmin])?;
    let scope = ReportScope::Manufacturer {
        manufacturer_id: auth.associated_id()?,
        account_id: auth.id(),
    };
    busy_days_csv(&state, scope, body, "manufacturer-label-stats.csv").await
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct SubmissionExportRequest {
    /// Inclusive `YYYY-MM-DD` bounds
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    /// 2 restricts super admins to their company
    pub level: Option<u8>,
}

fn parse_day(raw: Option<&str>, param: &str) -> Result<Option<NaiveDate>, AdminError> {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        None => Ok(None),
        Some(raw) => parse_reference_date(raw)
            .map(Some)
            .map_err(|e| AdminError::bad_param(param, e.to_string())),
    }
}

/// Resolve the request into creation-time bounds and the caller's company restriction.
async fn submission_query(
    state: &AppState,
    auth: &AuthenticatedAccount,
    body: &SubmissionExportRequest,
) -> Result<SubmissionQuery, AdminError> {
    let start = parse_day(body.start_date.as_deref(), "start_date")?;
    let end = parse_day(body.end_date.as_deref(), "end_date")?;
    if let (Some(start), Some(end)) = (start, end)
        && start > end
    {
        return Err(AdminError::bad_param(
            "start_date",
            "start_date must not be after end_date",
        ));
    }

    let company_id = if !auth.is_super_admin() || body.level == Some(2) {
        Some(caller_company(state, auth).await?)
    } else {
        None
    };

    Ok(SubmissionQuery {
        from: start.map(midnight),
        until: end.map(end_of_day).transpose()?,
        company_id,
    })
}

#[tracing::instrument(name = "admin.exports.warranties", skip(state, auth, body))]
pub async fn warranties_csv(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedAccount>,
    Json(body): Json<SubmissionExportRequest>,
) -> Result<CsvResponse, AdminError> {
    let query = submission_query(&state, &auth, &body).await?;
    let warranties = state.services.submissions.warranties(&query).await?;
    Ok(CsvResponse {
        data: export_warranties_csv(&warranties).map_err(export_failed)?,
        filename: "warranties.csv".to_string(),
    })
}

#[tracing::instrument(name = "admin.exports.help_requests", skip(state, auth, body))]
pub async fn help_requests_csv(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedAccount>,
    Json(body): Json<SubmissionExportRequest>,
) -> Result<CsvResponse, AdminError> {
    let query = submission_query(&state, &auth, &body).await?;
    let requests = state.services.submissions.help_requests(&query).await?;
    Ok(CsvResponse {
        data: export_help_requests_csv(&requests).map_err(export_failed)?,
        filename: "help-requests.csv".to_string(),
    })
}

#[tracing::instrument(name = "admin.exports.error_reports", skip(state, auth, body))]
pub async fn error_reports_csv(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedAccount>,
    Json(body): Json<SubmissionExportRequest>,
) -> Result<CsvResponse, AdminError> {
    let query = submission_query(&state, &auth, &body).await?;
    let reports = state.services.submissions.error_reports(&query).await?;
    Ok(CsvResponse {
        data: export_error_reports_csv(&reports).map_err(export_failed)?,
        filename: "error-reports.csv".to_string(),
    })
}
