//! End-user submissions made against a printed label: warranty
//! registrations, help requests and error reports.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use super::validators::PINCODE_REGEX;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Warranty {
    pub id: Uuid,
    /// Serial printed on the label
    pub ds1: String,
    pub company_id: Uuid,
    pub brand_id: Uuid,
    pub product_id: Uuid,
    pub warranty_activated: bool,
    pub purchase_date: NaiveDate,
    pub store_name: String,
    pub store_pin_code: String,
    pub warranty_duration: String,
    pub invoice_number: String,
    pub invoice_image: Option<String>,
    pub pincode: String,
    pub address1: String,
    pub address2: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateWarranty {
    #[validate(length(min = 1, max = 128))]
    pub ds1: String,
    pub company_id: Uuid,
    pub brand_id: Uuid,
    pub product_id: Uuid,
    #[serde(default)]
    pub warranty_activated: bool,
    pub purchase_date: NaiveDate,
    #[validate(length(min = 1, max = 255))]
    pub store_name: String,
    #[validate(regex(path = *PINCODE_REGEX))]
    pub store_pin_code: String,
    #[validate(length(min = 1, max = 64))]
    pub warranty_duration: String,
    #[validate(length(min = 1, max = 128))]
    pub invoice_number: String,
    #[serde(default)]
    #[validate(url)]
    pub invoice_image: Option<String>,
    #[validate(regex(path = *PINCODE_REGEX))]
    pub pincode: String,
    #[validate(length(min = 1, max = 512))]
    pub address1: String,
    #[serde(default)]
    #[validate(length(max = 512))]
    pub address2: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HelpRequest {
    pub id: Uuid,
    pub ds1: String,
    pub company_id: Uuid,
    pub brand_id: Uuid,
    pub product_id: Uuid,
    pub request_date: DateTime<Utc>,
    pub help_ref_num: String,
    pub address: String,
    pub pincode: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateHelpRequest {
    #[validate(length(min = 1, max = 128))]
    pub ds1: String,
    pub company_id: Uuid,
    pub brand_id: Uuid,
    pub product_id: Uuid,
    /// Defaults to the submission time
    #[serde(default)]
    pub request_date: Option<DateTime<Utc>>,
    #[validate(length(min = 1, max = 64))]
    pub help_ref_num: String,
    #[validate(length(min = 1, max = 512))]
    pub address: String,
    #[validate(regex(path = *PINCODE_REGEX))]
    pub pincode: String,
}

/// Help request joined with company, brand and product names for export.
#[derive(Debug, Clone, PartialEq)]
pub struct HelpRequestExport {
    pub ds1: String,
    pub request_date: DateTime<Utc>,
    pub company_name: String,
    pub brand_name: String,
    pub product_name: String,
    pub help_ref_num: String,
    pub address: String,
    pub pincode: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorReport {
    pub id: Uuid,
    pub company_id: Uuid,
    pub brand_id: Uuid,
    pub product_id: Uuid,
    pub store_and_location: String,
    pub purchase_date: NaiveDate,
    pub store_pin_code: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateErrorReport {
    pub company_id: Uuid,
    pub brand_id: Uuid,
    pub product_id: Uuid,
    #[validate(length(min = 1, max = 512))]
    pub store_and_location: String,
    pub purchase_date: NaiveDate,
    #[validate(regex(path = *PINCODE_REGEX))]
    pub store_pin_code: String,
}

/// Error report joined with brand and product names for export.
#[derive(Debug, Clone, PartialEq)]
pub struct ErrorReportExport {
    pub brand_name: String,
    pub product_name: String,
    pub store_and_location: String,
    pub purchase_date: NaiveDate,
    pub store_pin_code: String,
    pub created_at: DateTime<Utc>,
}

/// Inclusive creation-date bounds and optional company restriction for exports.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SubmissionQuery {
    pub from: Option<DateTime<Utc>>,
    /// Exclusive upper bound
    pub until: Option<DateTime<Utc>>,
    pub company_id: Option<Uuid>,
}
