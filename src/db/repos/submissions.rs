use async_trait::async_trait;

use crate::{
    db::error::DbResult,
    models::{
        CreateErrorReport, CreateHelpRequest, CreateWarranty, ErrorReport, ErrorReportExport,
        HelpRequest, HelpRequestExport, SubmissionQuery, Warranty,
    },
};

/// Storage for end-user submissions made against labels.
#[async_trait]
pub trait SubmissionRepo: Send + Sync {
    async fn create_warranty(&self, input: CreateWarranty) -> DbResult<Warranty>;

    async fn create_help_request(&self, input: CreateHelpRequest) -> DbResult<HelpRequest>;

    async fn create_error_report(&self, input: CreateErrorReport) -> DbResult<ErrorReport>;

    /// Warranties matching the query, oldest first.
    async fn list_warranties(&self, query: &SubmissionQuery) -> DbResult<Vec<Warranty>>;

    /// Help requests matching the query joined with display names, oldest first.
    async fn list_help_requests(&self, query: &SubmissionQuery)
    -> DbResult<Vec<HelpRequestExport>>;

    /// Error reports matching the query joined with display names, oldest first.
    async fn list_error_reports(&self, query: &SubmissionQuery)
    -> DbResult<Vec<ErrorReportExport>>;
}
