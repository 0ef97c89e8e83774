//! Role-scoped label statistics.
//!
//! Resolves a [`ReportScope`] into the manufacturers whose labels it may
//! see, fetches the matching labels and hands them to the pure builders in
//! [`crate::reports`].

use std::sync::Arc;

use chrono::{DateTime, Duration, NaiveDate, Utc};
use uuid::Uuid;

use crate::{
    config::ReportsConfig,
    db::{DbError, DbPool, DbResult, LabelFilter, LabelQuery, ManufacturerSet},
    models::DailyLabelCount,
    reports::{
        self, LabelReport, ReportError, ReportScope, ReportTotals, ReportWindow, daily_counts,
        keep_busy_days, trailing_months,
    },
};

#[derive(Debug, thiserror::Error)]
pub enum LabelReportError {
    #[error(transparent)]
    Report(#[from] ReportError),

    #[error(transparent)]
    Database(#[from] DbError),
}

#[derive(Clone)]
pub struct LabelReportService {
    db: Arc<DbPool>,
    config: ReportsConfig,
}

impl LabelReportService {
    pub fn new(db: Arc<DbPool>, config: ReportsConfig) -> Self {
        Self { db, config }
    }

    /// Manufacturers whose labels the scope may see.
    pub async fn visible_manufacturers(&self, scope: &ReportScope) -> DbResult<ManufacturerSet> {
        let manufacturers = self.db.manufacturers();
        let set = match scope {
            ReportScope::Platform {
                manufacturer_ids, ..
            } if !manufacturer_ids.is_empty() => ManufacturerSet::Only(manufacturer_ids.clone()),
            ReportScope::Platform { company_ids, .. } if !company_ids.is_empty() => {
                ManufacturerSet::Only(manufacturers.active_ids_for_companies(company_ids).await?)
            }
            ReportScope::Platform { .. } => ManufacturerSet::All,
            ReportScope::Company {
                company_id,
                manufacturer_ids,
            } => {
                let owned = manufacturers
                    .active_ids_for_companies(&[*company_id])
                    .await?;
                ManufacturerSet::Only(reports::narrow(owned, manufacturer_ids))
            }
            ReportScope::Manufacturer {
                manufacturer_id, ..
            } => ManufacturerSet::Only(vec![*manufacturer_id]),
        };
        Ok(set)
    }

    /// Stat counters shown next to the report.
    pub async fn totals(
        &self,
        scope: &ReportScope,
        manufacturers: &ManufacturerSet,
    ) -> DbResult<ReportTotals> {
        match scope {
            ReportScope::Platform { .. } => Ok(ReportTotals {
                brands: self.db.brands().count_visible().await?,
                products: self.db.products().count_visible().await?,
                admins: self.db.accounts().count_active().await?,
                labels: self.db.labels().count(&ManufacturerSet::All).await?,
            }),
            ReportScope::Company { company_id, .. } => Ok(ReportTotals {
                brands: self.db.brands().count_by_company(*company_id).await?,
                products: self.db.products().count_by_company(*company_id).await?,
                admins: self.db.accounts().count_associated(*company_id).await?,
                labels: self.db.labels().count(manufacturers).await?,
            }),
            ReportScope::Manufacturer {
                manufacturer_id, ..
            } => {
                let company_id = self
                    .db
                    .manufacturers()
                    .get_by_id(*manufacturer_id)
                    .await?
                    .map(|m| m.company_id);
                let (brands, products) = match company_id {
                    Some(company_id) => (
                        self.db.brands().count_by_company(company_id).await?,
                        self.db.products().count_by_company(company_id).await?,
                    ),
                    None => (0, 0),
                };
                Ok(ReportTotals {
                    brands,
                    products,
                    admins: self.db.accounts().count_associated(*manufacturer_id).await?,
                    labels: self
                        .db
                        .labels()
                        .count(&ManufacturerSet::Only(vec![*manufacturer_id]))
                        .await?,
                })
            }
        }
    }

    /// Monthly and per-user label statistics for the window ending on `reference`.
    pub async fn statistics(
        &self,
        scope: &ReportScope,
        filter: LabelFilter,
        reference: NaiveDate,
    ) -> Result<LabelReport, LabelReportError> {
        let window = ReportWindow::months_back(reference, scope.lookback_months(&self.config))?;
        let manufacturers = self.visible_manufacturers(scope).await?;
        let totals = self.totals(scope, &manufacturers).await?;

        if manufacturers.is_empty() {
            tracing::debug!(role = ?scope.role(), "No visible manufacturers, returning empty report");
            return Ok(LabelReport::empty(&window, totals));
        }

        let query = LabelQuery::new(manufacturers, scope.constrain(filter))
            .between(window.start(), window.end());
        let rows = self.db.labels().list_report_rows(&query).await?;
        let report = reports::build(&window, &rows, totals);

        tracing::debug!(
            role = ?scope.role(),
            start = %window.start(),
            end = %window.end(),
            total_labels = report.total_labels,
            "Built label report"
        );
        Ok(report)
    }

    /// Per-day label counts from `days` days ago until now, keeping only the
    /// days that reach `csv_min_daily_count`.
    pub async fn busy_days(
        &self,
        scope: &ReportScope,
        filter: LabelFilter,
        days: Option<u32>,
    ) -> Result<Vec<DailyLabelCount>, LabelReportError> {
        let until = Utc::now();
        let from = Duration::try_days(i64::from(days.unwrap_or(self.config.export_days)))
            .and_then(|span| until.checked_sub_signed(span))
            .ok_or(ReportError::DateOutOfRange)?;
        let manufacturers = self.visible_manufacturers(scope).await?;
        let times = self
            .created_at(manufacturers, scope.constrain(filter), from, until)
            .await?;
        Ok(keep_busy_days(
            daily_counts(&times),
            self.config.csv_min_daily_count,
        ))
    }

    /// Per-day counts of every label the manufacturer issued over the trailing
    /// `label_count_lookback_months` ending on `reference`, whoever issued them.
    pub async fn daily_counts(
        &self,
        manufacturer_id: Uuid,
        filter: LabelFilter,
        reference: NaiveDate,
    ) -> Result<Vec<DailyLabelCount>, LabelReportError> {
        let (from, until) = trailing_months(reference, self.config.label_count_lookback_months)?;
        let manufacturers = ManufacturerSet::Only(vec![manufacturer_id]);
        let times = self.created_at(manufacturers, filter, from, until).await?;
        Ok(daily_counts(&times))
    }

    async fn created_at(
        &self,
        manufacturers: ManufacturerSet,
        filter: LabelFilter,
        from: DateTime<Utc>,
        until: DateTime<Utc>,
    ) -> DbResult<Vec<DateTime<Utc>>> {
        if manufacturers.is_empty() {
            return Ok(Vec::new());
        }
        let query = LabelQuery::new(manufacturers, filter).between(from, until);
        self.db.labels().list_created_at(&query).await
    }
}
