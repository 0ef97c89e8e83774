use std::sync::Arc;

use uuid::Uuid;

use crate::{
    db::{DbError, DbPool, DbResult},
    models::{Account, AccountRole, AccountSummary, CreateAccount},
};

/// Service layer for admin accounts
#[derive(Clone)]
pub struct AccountService {
    db: Arc<DbPool>,
}

impl AccountService {
    pub fn new(db: Arc<DbPool>) -> Self {
        Self { db }
    }

    /// Create an account after checking its association matches its role.
    ///
    /// Company admins must point at an existing company and manufacturer
    /// admins at an existing manufacturer. Super admins have no association.
    pub async fn create(&self, input: CreateAccount) -> DbResult<Account> {
        match (input.role, input.associated_id) {
            (AccountRole::SuperAdmin, Some(_)) => {
                return Err(DbError::Validation(
                    "super admins cannot be associated with a company or manufacturer".into(),
                ));
            }
            (AccountRole::SuperAdmin, None) => {}
            (role, None) => {
                return Err(DbError::Validation(format!(
                    "{} accounts require associated_id",
                    role
                )));
            }
            (AccountRole::CompanyAdmin, Some(company_id)) => {
                if self.db.companies().get_by_id(company_id).await?.is_none() {
                    return Err(DbError::Validation(format!(
                        "Company '{}' not found",
                        company_id
                    )));
                }
            }
            (AccountRole::ManufacturerAdmin, Some(manufacturer_id)) => {
                if self
                    .db
                    .manufacturers()
                    .get_by_id(manufacturer_id)
                    .await?
                    .is_none()
                {
                    return Err(DbError::Validation(format!(
                        "Manufacturer '{}' not found",
                        manufacturer_id
                    )));
                }
            }
        }

        let account = self.db.accounts().create(input).await?;
        tracing::info!(account_id = %account.id, role = %account.role, "Account created");
        Ok(account)
    }

    pub async fn get_by_id(&self, id: Uuid) -> DbResult<Option<Account>> {
        self.db.accounts().get_by_id(id).await
    }

    pub async fn get_by_email(&self, email: &str) -> DbResult<Option<Account>> {
        self.db.accounts().get_by_email(email).await
    }

    /// Active company and manufacturer admins
    pub async fn list_active_associates(&self) -> DbResult<Vec<AccountSummary>> {
        self.db.accounts().list_active_associates().await
    }
}
