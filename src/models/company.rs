use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use super::{ActivityStatus, Visibility};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Company {
    pub id: Uuid,
    pub name: String,
    /// Account that registered the company
    pub owner_account_id: Option<Uuid>,
    pub status: Visibility,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateCompany {
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    #[serde(default)]
    pub owner_account_id: Option<Uuid>,
    /// Subcategories the company operates in
    #[serde(default)]
    pub subcategory_ids: Vec<Uuid>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Subcategory {
    pub id: Uuid,
    pub title: String,
    pub features: Vec<String>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateSubcategory {
    #[validate(length(min = 1, max = 255))]
    pub title: String,
    #[serde(default)]
    pub features: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Manufacturer {
    pub id: Uuid,
    pub company_id: Uuid,
    pub name: String,
    pub status: ActivityStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateManufacturer {
    pub company_id: Uuid,
    #[validate(length(min = 1, max = 255))]
    pub name: String,
}

/// `{id, name}` pair used by dropdown-style lookups.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NamedRef {
    pub id: Uuid,
    pub name: String,
}
