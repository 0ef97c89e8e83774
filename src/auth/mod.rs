mod error;
mod jwt;

pub use error::AuthError;
pub use jwt::{Claims, issue_token, verify_token};
use uuid::Uuid;

use crate::models::{Account, AccountRole};

/// The active account behind a verified admin token.
///
/// Inserted into request extensions by the admin auth middleware.
#[derive(Debug, Clone)]
pub struct AuthenticatedAccount(pub Account);

impl AuthenticatedAccount {
    pub fn account(&self) -> &Account {
        &self.0
    }

    pub fn id(&self) -> Uuid {
        self.0.id
    }

    pub fn role(&self) -> AccountRole {
        self.0.role
    }

    pub fn is_super_admin(&self) -> bool {
        self.0.role == AccountRole::SuperAdmin
    }

    /// Fail with `Forbidden` unless the account holds one of `roles`.
    pub fn require(&self, roles: &[AccountRole]) -> Result<(), AuthError> {
        if roles.contains(&self.0.role) {
            Ok(())
        } else {
            Err(AuthError::Forbidden(format!(
                "role '{}' may not perform this operation",
                self.0.role
            )))
        }
    }

    /// The company or manufacturer this account administers.
    pub fn associated_id(&self) -> Result<Uuid, AuthError> {
        self.0.associated_id.ok_or_else(|| {
            AuthError::Forbidden(format!(
                "account has no associated {}",
                match self.0.role {
                    AccountRole::ManufacturerAdmin => "manufacturer",
                    _ => "company",
                }
            ))
        })
    }
}
