pub mod accounts;
pub mod catalog;
#[cfg(feature = "csv-export")]
mod csv_export;
mod error;
#[cfg(feature = "csv-export")]
pub mod exports;
pub mod label_stats;
pub mod labels;

use axum::{
    Router,
    routing::{get, patch, post},
};
pub use error::AdminError;
use uuid::Uuid;

use crate::{
    AppState,
    auth::AuthenticatedAccount,
    db::ManufacturerSet,
    models::AccountRole,
    reports::ReportScope,
};

/// Admin routes. Authentication is applied in `build_app` via `route_layer`.
pub fn admin_routes() -> Router<AppState> {
    Router::new().nest("/v1", admin_v1_routes())
}

fn admin_v1_routes() -> Router<AppState> {
    let router = Router::new()
        // Accounts
        .route("/accounts", post(accounts::create))
        .route(
            "/associates-collections",
            get(accounts::associates_collections),
        )
        .route("/roles", get(accounts::role_info))
        // Catalog writes
        .route("/companies", post(catalog::create_company))
        .route("/subcategories", post(catalog::create_subcategory))
        .route("/manufacturers", post(catalog::create_manufacturer))
        .route("/brands", post(catalog::create_brand))
        .route("/products", post(catalog::create_product))
        // Catalog lookups
        .route("/fetch-company-brands", get(catalog::company_brands))
        .route(
            "/fetch-company-subcategories",
            get(catalog::company_subcategories),
        )
        .route("/fetch-brands-for-all", post(catalog::brands_for_all))
        .route(
            "/fetch-manufacturers-company-brands",
            get(catalog::manufacturer_company_brands),
        )
        .route("/fetch-brand-products", post(catalog::brand_products))
        .route("/fetch-companies", get(catalog::companies))
        .route(
            "/fetch-companies-manufacturer",
            post(catalog::companies_manufacturers),
        )
        .route("/fetch-brands-products", post(catalog::brands_products))
        .route("/products-variants", post(catalog::product_variants))
        // Label statistics
        .route(
            "/super-admin-label-stats",
            post(label_stats::super_admin_stats),
        )
        .route("/company-label-stats", post(label_stats::company_stats))
        .route(
            "/manufacturer-label-stats",
            post(label_stats::manufacturer_stats),
        )
        .route("/label-count", post(label_stats::label_count))
        // Labels
        .route("/labels", post(labels::issue))
        .route("/labels/{id}/status", patch(labels::toggle_status))
        .route(
            "/label-batchs-and-variants",
            post(labels::batches_and_variants),
        )
        .route("/label-batch-numbers", post(labels::batch_numbers))
        .route("/label-variants", post(labels::variants))
        .route("/multiple-label-variants", post(labels::multiple_variants));

    #[cfg(feature = "csv-export")]
    let router = router
        .route(
            "/filter-and-download-csv",
            post(exports::filter_and_download_csv),
        )
        .route(
            "/manufacturer-filter-and-csv",
            post(exports::manufacturer_filter_and_csv),
        )
        .route("/warranties-csv", post(exports::warranties_csv))
        .route("/reqhelp-csv", post(exports::help_requests_csv))
        .route("/error-report-csv", post(exports::error_reports_csv));

    router
}

/// The report scope an account sees when it passes no narrowing filters.
pub(crate) fn default_scope(auth: &AuthenticatedAccount) -> Result<ReportScope, AdminError> {
    Ok(match auth.role() {
        AccountRole::SuperAdmin => ReportScope::Platform {
            company_ids: Vec::new(),
            manufacturer_ids: Vec::new(),
        },
        AccountRole::CompanyAdmin => ReportScope::Company {
            company_id: auth.associated_id()?,
            manufacturer_ids: Vec::new(),
        },
        AccountRole::ManufacturerAdmin => ReportScope::Manufacturer {
            manufacturer_id: auth.associated_id()?,
            account_id: auth.id(),
        },
    })
}

/// Manufacturers whose labels the caller may look up.
pub(crate) async fn visible_manufacturers(
    state: &AppState,
    auth: &AuthenticatedAccount,
) -> Result<ManufacturerSet, AdminError> {
    let scope = default_scope(auth)?;
    Ok(state
        .services
        .label_reports
        .visible_manufacturers(&scope)
        .await?)
}

/// The company a company or manufacturer admin works for.
///
/// Super admins have no company of their own and are refused.
pub(crate) async fn caller_company(
    state: &AppState,
    auth: &AuthenticatedAccount,
) -> Result<Uuid, AdminError> {
    match auth.role() {
        AccountRole::CompanyAdmin => Ok(auth.associated_id()?),
        AccountRole::ManufacturerAdmin => Ok(state
            .services
            .catalog
            .manufacturer_company(auth.associated_id()?)
            .await?),
        AccountRole::SuperAdmin => Err(AdminError::Forbidden(
            "super admins are not associated with a company".to_string(),
        )),
    }
}
