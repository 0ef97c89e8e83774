use async_trait::async_trait;
use sqlx::{Row, SqlitePool, sqlite::SqliteRow};
use uuid::Uuid;

use super::common::{parse_uuid, placeholders};
use crate::{
    db::{
        error::{DbError, DbResult},
        repos::BrandRepo,
    },
    models::{Brand, BrandSummary, CreateBrand, NamedRef, Visibility},
};

pub struct SqliteBrandRepo {
    pool: SqlitePool,
}

impl SqliteBrandRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

fn brand_from_row(row: &SqliteRow) -> DbResult<Brand> {
    let status: String = row.get("status");
    Ok(Brand {
        id: parse_uuid(&row.get::<String, _>("id"))?,
        company_id: parse_uuid(&row.get::<String, _>("company_id"))?,
        name: row.get("name"),
        warranty: row.get("warranty"),
        request_help: row.get("request_help"),
        status: Visibility::from_str(&status).ok_or_else(|| {
            DbError::Internal(format!("Invalid brand status in database: {}", status))
        })?,
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    })
}

#[async_trait]
impl BrandRepo for SqliteBrandRepo {
    async fn create(&self, input: CreateBrand) -> DbResult<Brand> {
        let id = Uuid::new_v4();
        let now = chrono::Utc::now();

        sqlx::query(
            r#"
            INSERT INTO brands (id, company_id, name, warranty, request_help, status, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, 'show', ?, ?)
            "#,
        )
        .bind(id.to_string())
        .bind(input.company_id.to_string())
        .bind(&input.name)
        .bind(input.warranty)
        .bind(input.request_help)
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(db_err) if db_err.is_foreign_key_violation() => {
                DbError::Validation(format!("Unknown company '{}'", input.company_id))
            }
            _ => DbError::from(e),
        })?;

        Ok(Brand {
            id,
            company_id: input.company_id,
            name: input.name,
            warranty: input.warranty,
            request_help: input.request_help,
            status: Visibility::Show,
            created_at: now,
            updated_at: now,
        })
    }

    async fn get_by_id(&self, id: Uuid) -> DbResult<Option<Brand>> {
        let row = sqlx::query(
            r#"
            SELECT id, company_id, name, warranty, request_help, status, created_at, updated_at
            FROM brands
            WHERE id = ?
            "#,
        )
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(brand_from_row).transpose()
    }

    async fn list_visible_by_company(&self, company_id: Uuid) -> DbResult<Vec<BrandSummary>> {
        let rows = sqlx::query(
            r#"
            SELECT id, name, warranty, request_help
            FROM brands
            WHERE company_id = ? AND status = 'show'
            ORDER BY name ASC
            "#,
        )
        .bind(company_id.to_string())
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter()
            .map(|row| {
                Ok(BrandSummary {
                    id: parse_uuid(&row.get::<String, _>("id"))?,
                    name: row.get("name"),
                    warranty: row.get("warranty"),
                    request_help: row.get("request_help"),
                })
            })
            .collect()
    }

    async fn list_visible_refs(&self, company_ids: &[Uuid]) -> DbResult<Vec<NamedRef>> {
        let company_filter = if company_ids.is_empty() {
            String::new()
        } else {
            format!("AND company_id IN ({})", placeholders(company_ids.len()))
        };
        let query = format!(
            "SELECT id, name FROM brands WHERE status = 'show' {} ORDER BY name ASC",
            company_filter
        );

        let mut q = sqlx::query(&query);
        for id in company_ids {
            q = q.bind(id.to_string());
        }
        let rows = q.fetch_all(&self.pool).await?;

        rows.into_iter()
            .map(|row| {
                Ok(NamedRef {
                    id: parse_uuid(&row.get::<String, _>("id"))?,
                    name: row.get("name"),
                })
            })
            .collect()
    }

    async fn count_visible(&self) -> DbResult<i64> {
        let row = sqlx::query("SELECT COUNT(*) AS count FROM brands WHERE status = 'show'")
            .fetch_one(&self.pool)
            .await?;
        Ok(row.get("count"))
    }

    async fn count_by_company(&self, company_id: Uuid) -> DbResult<i64> {
        let row = sqlx::query("SELECT COUNT(*) AS count FROM brands WHERE company_id = ?")
            .bind(company_id.to_string())
            .fetch_one(&self.pool)
            .await?;
        Ok(row.get("count"))
    }
}
