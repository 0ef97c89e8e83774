use async_trait::async_trait;
use sqlx::{Row, SqlitePool, sqlite::SqliteRow};
use uuid::Uuid;

use super::common::{parse_optional_uuid, parse_uuid};
use crate::{
    db::{
        error::{DbError, DbResult},
        repos::AccountRepo,
    },
    models::{Account, AccountRole, AccountSummary, ActivityStatus, CreateAccount},
};

pub struct SqliteAccountRepo {
    pool: SqlitePool,
}

impl SqliteAccountRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

fn parse_role(s: &str) -> DbResult<AccountRole> {
    AccountRole::from_str(s)
        .ok_or_else(|| DbError::Internal(format!("Invalid account role in database: {}", s)))
}

fn account_from_row(row: &SqliteRow) -> DbResult<Account> {
    let status: String = row.get("status");
    Ok(Account {
        id: parse_uuid(&row.get::<String, _>("id"))?,
        name: row.get("name"),
        email: row.get("email"),
        role: parse_role(&row.get::<String, _>("role"))?,
        associated_id: parse_optional_uuid(row.get("associated_id"))?,
        status: ActivityStatus::from_str(&status).ok_or_else(|| {
            DbError::Internal(format!("Invalid account status in database: {}", status))
        })?,
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    })
}

#[async_trait]
impl AccountRepo for SqliteAccountRepo {
    async fn create(&self, input: CreateAccount) -> DbResult<Account> {
        let id = Uuid::new_v4();
        let now = chrono::Utc::now();

        sqlx::query(
            r#"
            INSERT INTO accounts (id, name, email, role, associated_id, status, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, 'active', ?, ?)
            "#,
        )
        .bind(id.to_string())
        .bind(&input.name)
        .bind(&input.email)
        .bind(input.role.as_str())
        .bind(input.associated_id.map(|id| id.to_string()))
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => DbError::Conflict(
                format!("Account with email '{}' already exists", input.email),
            ),
            _ => DbError::from(e),
        })?;

        Ok(Account {
            id,
            name: input.name,
            email: input.email,
            role: input.role,
            associated_id: input.associated_id,
            status: ActivityStatus::Active,
            created_at: now,
            updated_at: now,
        })
    }

    async fn get_by_id(&self, id: Uuid) -> DbResult<Option<Account>> {
        let row = sqlx::query(
            r#"
            SELECT id, name, email, role, associated_id, status, created_at, updated_at
            FROM accounts
            WHERE id = ?
            "#,
        )
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(account_from_row).transpose()
    }

    async fn get_by_email(&self, email: &str) -> DbResult<Option<Account>> {
        let row = sqlx::query(
            r#"
            SELECT id, name, email, role, associated_id, status, created_at, updated_at
            FROM accounts
            WHERE email = ?
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(account_from_row).transpose()
    }

    async fn list_active_associates(&self) -> DbResult<Vec<AccountSummary>> {
        let rows = sqlx::query(
            r#"
            SELECT id, name, role
            FROM accounts
            WHERE status = 'active' AND role IN ('company_admin', 'manufacturer_admin')
            ORDER BY name ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter()
            .map(|row| {
                Ok(AccountSummary {
                    id: parse_uuid(&row.get::<String, _>("id"))?,
                    name: row.get("name"),
                    role: parse_role(&row.get::<String, _>("role"))?,
                })
            })
            .collect()
    }

    async fn count_active(&self) -> DbResult<i64> {
        let row = sqlx::query("SELECT COUNT(*) AS count FROM accounts WHERE status = 'active'")
            .fetch_one(&self.pool)
            .await?;
        Ok(row.get("count"))
    }

    async fn count_associated(&self, associated_id: Uuid) -> DbResult<i64> {
        let row = sqlx::query("SELECT COUNT(*) AS count FROM accounts WHERE associated_id = ?")
            .bind(associated_id.to_string())
            .fetch_one(&self.pool)
            .await?;
        Ok(row.get("count"))
    }
}
