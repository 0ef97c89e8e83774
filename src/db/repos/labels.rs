use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::{
    db::error::DbResult,
    models::{CreateLabel, Label, LabelReportRow, Visibility},
};

/// Manufacturers whose labels a query may see.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ManufacturerSet {
    /// No manufacturer restriction.
    All,
    /// Only these manufacturers. An empty list matches nothing.
    Only(Vec<Uuid>),
}

impl ManufacturerSet {
    /// True when the set cannot match any label.
    pub fn is_empty(&self) -> bool {
        matches!(self, ManufacturerSet::Only(ids) if ids.is_empty())
    }

    pub fn contains(&self, manufacturer_id: Uuid) -> bool {
        match self {
            ManufacturerSet::All => true,
            ManufacturerSet::Only(ids) => ids.contains(&manufacturer_id),
        }
    }
}

/// Optional dimension filters over labels.
///
/// Filters are conjunctive. An empty vector places no restriction on its
/// dimension; a non-empty one is a membership test.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LabelFilter {
    pub brand_ids: Vec<Uuid>,
    pub product_ids: Vec<Uuid>,
    pub variants: Vec<String>,
    pub user_ids: Vec<Uuid>,
}

/// Selection of visible labels.
#[derive(Debug, Clone)]
pub struct LabelQuery {
    pub manufacturers: ManufacturerSet,
    pub filter: LabelFilter,
    /// Inclusive lower bound on `created_at`
    pub from: Option<DateTime<Utc>>,
    /// Exclusive upper bound on `created_at`
    pub until: Option<DateTime<Utc>>,
}

impl LabelQuery {
    pub fn new(manufacturers: ManufacturerSet, filter: LabelFilter) -> Self {
        Self {
            manufacturers,
            filter,
            from: None,
            until: None,
        }
    }

    pub fn between(mut self, from: DateTime<Utc>, until: DateTime<Utc>) -> Self {
        self.from = Some(from);
        self.until = Some(until);
        self
    }
}

#[async_trait]
pub trait LabelRepo: Send + Sync {
    async fn create(&self, input: CreateLabel) -> DbResult<Label>;

    async fn get_by_id(&self, id: Uuid) -> DbResult<Option<Label>>;

    /// Change a label's status. Returns `NotFound` for unknown ids.
    async fn set_status(&self, id: Uuid, status: Visibility) -> DbResult<Label>;

    /// Visible labels matching the query with the issuing account's display name,
    /// oldest first.
    async fn list_report_rows(&self, query: &LabelQuery) -> DbResult<Vec<LabelReportRow>>;

    /// Creation times of visible labels matching the query, oldest first.
    async fn list_created_at(&self, query: &LabelQuery) -> DbResult<Vec<DateTime<Utc>>>;

    /// Distinct variants of visible labels matching the query, ascending.
    async fn distinct_variants(&self, query: &LabelQuery) -> DbResult<Vec<String>>;

    /// Distinct batch numbers of visible labels matching the query, ascending.
    async fn distinct_batch_numbers(&self, query: &LabelQuery) -> DbResult<Vec<String>>;

    /// Count labels of any status belonging to the manufacturer set.
    async fn count(&self, manufacturers: &ManufacturerSet) -> DbResult<i64>;
}
