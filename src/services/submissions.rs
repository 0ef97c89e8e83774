use std::sync::Arc;

use uuid::Uuid;

use crate::{
    db::{DbError, DbPool, DbResult},
    models::{
        CreateErrorReport, CreateHelpRequest, CreateWarranty, ErrorReport, ErrorReportExport,
        HelpRequest, HelpRequestExport, SubmissionQuery, Warranty,
    },
};

/// Warranty registrations, help requests and error reports from end users.
#[derive(Clone)]
pub struct SubmissionService {
    db: Arc<DbPool>,
}

impl SubmissionService {
    pub fn new(db: Arc<DbPool>) -> Self {
        Self { db }
    }

    /// Reject submissions whose product is not the named brand's and company's.
    async fn check_product(&self, company_id: Uuid, brand_id: Uuid, product_id: Uuid) -> DbResult<()> {
        let product = self
            .db
            .products()
            .get_by_id(product_id)
            .await?
            .ok_or_else(|| DbError::Validation(format!("Product '{}' not found", product_id)))?;

        if product.brand_id != brand_id || product.company_id != company_id {
            return Err(DbError::Validation(
                "Product does not match the given brand and company".into(),
            ));
        }
        Ok(())
    }

    pub async fn create_warranty(&self, input: CreateWarranty) -> DbResult<Warranty> {
        self.check_product(input.company_id, input.brand_id, input.product_id)
            .await?;
        let warranty = self.db.submissions().create_warranty(input).await?;
        tracing::info!(warranty_id = %warranty.id, ds1 = %warranty.ds1, "Warranty registered");
        Ok(warranty)
    }

    pub async fn create_help_request(&self, input: CreateHelpRequest) -> DbResult<HelpRequest> {
        self.check_product(input.company_id, input.brand_id, input.product_id)
            .await?;
        let request = self.db.submissions().create_help_request(input).await?;
        tracing::info!(help_request_id = %request.id, "Help request received");
        Ok(request)
    }

    pub async fn create_error_report(&self, input: CreateErrorReport) -> DbResult<ErrorReport> {
        self.check_product(input.company_id, input.brand_id, input.product_id)
            .await?;
        let report = self.db.submissions().create_error_report(input).await?;
        tracing::info!(error_report_id = %report.id, "Error report received");
        Ok(report)
    }

    pub async fn warranties(&self, query: &SubmissionQuery) -> DbResult<Vec<Warranty>> {
        self.db.submissions().list_warranties(query).await
    }

    pub async fn help_requests(&self, query: &SubmissionQuery) -> DbResult<Vec<HelpRequestExport>> {
        self.db.submissions().list_help_requests(query).await
    }

    pub async fn error_reports(&self, query: &SubmissionQuery) -> DbResult<Vec<ErrorReportExport>> {
        self.db.submissions().list_error_reports(query).await
    }
}
