use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use super::Visibility;

/// A printed label tied to a brand, product, manufacturer and variant.
///
/// Labels never change after issue except for their status.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Label {
    pub id: Uuid,
    pub brand_id: Uuid,
    pub product_id: Uuid,
    pub manufacturer_id: Uuid,
    /// Account that issued the label
    pub user_id: Uuid,
    pub variant: String,
    pub batch_number: String,
    pub status: Visibility,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Request body for issuing a label.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct IssueLabel {
    pub brand_id: Uuid,
    pub product_id: Uuid,
    #[validate(length(min = 1, max = 128))]
    pub variant: String,
    #[validate(length(min = 1, max = 128))]
    pub batch_number: String,
}

/// Fully resolved insert for the label repository.
#[derive(Debug, Clone)]
pub struct CreateLabel {
    pub brand_id: Uuid,
    pub product_id: Uuid,
    pub manufacturer_id: Uuid,
    pub user_id: Uuid,
    pub variant: String,
    pub batch_number: String,
    /// Issue time; `None` stamps the current time
    pub created_at: Option<DateTime<Utc>>,
}

/// A label joined with the display name of the account that issued it.
#[derive(Debug, Clone, PartialEq)]
pub struct LabelReportRow {
    pub user_name: String,
    pub created_at: DateTime<Utc>,
}

/// Daily label count returned by the range endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DailyLabelCount {
    pub date: String,
    pub count_of_label: u64,
}
