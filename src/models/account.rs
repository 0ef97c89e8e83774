use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use super::ActivityStatus;

/// Administrative role of an account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccountRole {
    /// Platform operator; sees every company.
    SuperAdmin,
    /// Administers one company; `associated_id` is the company.
    CompanyAdmin,
    /// Administers one manufacturer; `associated_id` is the manufacturer.
    ManufacturerAdmin,
}

impl AccountRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SuperAdmin => "super_admin",
            Self::CompanyAdmin => "company_admin",
            Self::ManufacturerAdmin => "manufacturer_admin",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "super_admin" => Some(Self::SuperAdmin),
            "company_admin" => Some(Self::CompanyAdmin),
            "manufacturer_admin" => Some(Self::ManufacturerAdmin),
            _ => None,
        }
    }

    /// Whether accounts with this role must point at a company or manufacturer.
    pub fn requires_association(&self) -> bool {
        !matches!(self, Self::SuperAdmin)
    }
}

impl std::fmt::Display for AccountRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub role: AccountRole,
    /// Company (company admin) or manufacturer (manufacturer admin) this account administers
    pub associated_id: Option<Uuid>,
    pub status: ActivityStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Account {
    pub fn is_active(&self) -> bool {
        self.status == ActivityStatus::Active
    }
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateAccount {
    /// Display name, used as the user bucket key in label reports
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    #[validate(email)]
    pub email: String,
    pub role: AccountRole,
    #[serde(default)]
    pub associated_id: Option<Uuid>,
}

/// Account summary for the associates listing.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AccountSummary {
    pub id: Uuid,
    pub name: String,
    pub role: AccountRole,
}
