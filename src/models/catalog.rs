use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use super::{Visibility, validators::validate_variants};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Brand {
    pub id: Uuid,
    pub company_id: Uuid,
    pub name: String,
    /// Whether end users can register warranties for this brand
    pub warranty: bool,
    /// Whether end users can request help for this brand
    pub request_help: bool,
    pub status: Visibility,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateBrand {
    pub company_id: Uuid,
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    #[serde(default)]
    pub warranty: bool,
    #[serde(default)]
    pub request_help: bool,
}

/// Brand row returned to company admins.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BrandSummary {
    pub id: Uuid,
    pub name: String,
    pub warranty: bool,
    pub request_help: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    pub id: Uuid,
    pub company_id: Uuid,
    pub brand_id: Uuid,
    pub name: String,
    pub feature: Option<String>,
    pub variants: Vec<String>,
    pub status: Visibility,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateProduct {
    pub brand_id: Uuid,
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    #[serde(default)]
    #[validate(length(max = 1024))]
    pub feature: Option<String>,
    #[serde(default)]
    #[validate(custom(function = "validate_variants"))]
    pub variants: Vec<String>,
}

/// Product row returned by catalog lookups.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProductSummary {
    pub id: Uuid,
    pub name: String,
    pub feature: Option<String>,
    pub variants: Vec<String>,
}
