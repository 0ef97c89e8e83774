use async_trait::async_trait;
use sqlx::{Row, SqlitePool, sqlite::SqliteRow};
use uuid::Uuid;

use super::common::{parse_optional_uuid, parse_string_list, parse_uuid};
use crate::{
    db::{
        error::{DbError, DbResult},
        repos::CompanyRepo,
    },
    models::{Company, CreateCompany, CreateSubcategory, NamedRef, Subcategory, Visibility},
};

pub struct SqliteCompanyRepo {
    pool: SqlitePool,
}

impl SqliteCompanyRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

fn company_from_row(row: &SqliteRow) -> DbResult<Company> {
    let status: String = row.get("status");
    Ok(Company {
        id: parse_uuid(&row.get::<String, _>("id"))?,
        name: row.get("name"),
        owner_account_id: parse_optional_uuid(row.get("owner_account_id"))?,
        status: Visibility::from_str(&status).ok_or_else(|| {
            DbError::Internal(format!("Invalid company status in database: {}", status))
        })?,
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    })
}

#[async_trait]
impl CompanyRepo for SqliteCompanyRepo {
    async fn create(&self, input: CreateCompany) -> DbResult<Company> {
        let id = Uuid::new_v4();
        let now = chrono::Utc::now();

        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO companies (id, name, owner_account_id, status, created_at, updated_at)
            VALUES (?, ?, ?, 'show', ?, ?)
            "#,
        )
        .bind(id.to_string())
        .bind(&input.name)
        .bind(input.owner_account_id.map(|id| id.to_string()))
        .bind(now)
        .bind(now)
        .execute(&mut *tx)
        .await?;

        for subcategory_id in &input.subcategory_ids {
            sqlx::query(
                "INSERT OR IGNORE INTO company_subcategories (company_id, subcategory_id) VALUES (?, ?)",
            )
            .bind(id.to_string())
            .bind(subcategory_id.to_string())
            .execute(&mut *tx)
            .await
            .map_err(|e| match e {
                sqlx::Error::Database(db_err) if db_err.is_foreign_key_violation() => {
                    DbError::Validation(format!("Unknown subcategory '{}'", subcategory_id))
                }
                _ => DbError::from(e),
            })?;
        }

        tx.commit().await?;

        Ok(Company {
            id,
            name: input.name,
            owner_account_id: input.owner_account_id,
            status: Visibility::Show,
            created_at: now,
            updated_at: now,
        })
    }

    async fn get_by_id(&self, id: Uuid) -> DbResult<Option<Company>> {
        let row = sqlx::query(
            r#"
            SELECT id, name, owner_account_id, status, created_at, updated_at
            FROM companies
            WHERE id = ?
            "#,
        )
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(company_from_row).transpose()
    }

    async fn list_by_owner(&self, owner_account_id: Uuid) -> DbResult<Vec<Company>> {
        let rows = sqlx::query(
            r#"
            SELECT id, name, owner_account_id, status, created_at, updated_at
            FROM companies
            WHERE owner_account_id = ? AND status = 'show'
            ORDER BY name ASC
            "#,
        )
        .bind(owner_account_id.to_string())
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(company_from_row).collect()
    }

    async fn list_visible_refs(&self) -> DbResult<Vec<NamedRef>> {
        let rows = sqlx::query("SELECT id, name FROM companies WHERE status = 'show' ORDER BY name ASC")
            .fetch_all(&self.pool)
            .await?;

        rows.into_iter()
            .map(|row| {
                Ok(NamedRef {
                    id: parse_uuid(&row.get::<String, _>("id"))?,
                    name: row.get("name"),
                })
            })
            .collect()
    }

    async fn create_subcategory(&self, input: CreateSubcategory) -> DbResult<Subcategory> {
        let id = Uuid::new_v4();

        sqlx::query(
            r#"
            INSERT INTO subcategories (id, title, features, created_at)
            VALUES (?, ?, ?, ?)
            "#,
        )
        .bind(id.to_string())
        .bind(&input.title)
        .bind(serde_json::to_string(&input.features)?)
        .bind(chrono::Utc::now())
        .execute(&self.pool)
        .await?;

        Ok(Subcategory {
            id,
            title: input.title,
            features: input.features,
        })
    }

    async fn list_subcategories(&self, company_id: Uuid) -> DbResult<Vec<Subcategory>> {
        let rows = sqlx::query(
            r#"
            SELECT s.id, s.title, s.features
            FROM subcategories s
            INNER JOIN company_subcategories cs ON cs.subcategory_id = s.id
            WHERE cs.company_id = ?
            ORDER BY s.title ASC
            "#,
        )
        .bind(company_id.to_string())
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter()
            .map(|row| {
                Ok(Subcategory {
                    id: parse_uuid(&row.get::<String, _>("id"))?,
                    title: row.get("title"),
                    features: parse_string_list(&row.get::<String, _>("features"))?,
                })
            })
            .collect()
    }
}
