mod accounts;
mod catalog;
mod label_reports;
mod labels;
mod submissions;

use std::sync::Arc;

pub use accounts::AccountService;
pub use catalog::{AssociatesCollections, CatalogService};
pub use label_reports::{LabelReportError, LabelReportService};
pub use labels::LabelService;
pub use submissions::SubmissionService;

use crate::{config::ReportsConfig, db::DbPool};

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub accounts: AccountService,
    pub catalog: CatalogService,
    pub labels: LabelService,
    pub label_reports: LabelReportService,
    pub submissions: SubmissionService,
}

impl Services {
    pub fn new(db: Arc<DbPool>, reports: ReportsConfig) -> Self {
        Self {
            accounts: AccountService::new(db.clone()),
            catalog: CatalogService::new(db.clone()),
            labels: LabelService::new(db.clone()),
            label_reports: LabelReportService::new(db.clone(), reports),
            submissions: SubmissionService::new(db),
        }
    }
}

#[cfg(all(test, feature = "database-sqlite"))]
mod tests;
