use async_trait::async_trait;
use sqlx::{Row, SqlitePool, sqlite::SqliteRow};
use uuid::Uuid;

use super::common::{parse_uuid, placeholders};
use crate::{
    db::{
        error::{DbError, DbResult},
        repos::ManufacturerRepo,
    },
    models::{ActivityStatus, CreateManufacturer, Manufacturer, NamedRef},
};

pub struct SqliteManufacturerRepo {
    pool: SqlitePool,
}

impl SqliteManufacturerRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

fn manufacturer_from_row(row: &SqliteRow) -> DbResult<Manufacturer> {
    let status: String = row.get("status");
    Ok(Manufacturer {
        id: parse_uuid(&row.get::<String, _>("id"))?,
        company_id: parse_uuid(&row.get::<String, _>("company_id"))?,
        name: row.get("name"),
        status: ActivityStatus::from_str(&status).ok_or_else(|| {
            DbError::Internal(format!("Invalid manufacturer status in database: {}", status))
        })?,
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    })
}

#[async_trait]
impl ManufacturerRepo for SqliteManufacturerRepo {
    async fn create(&self, input: CreateManufacturer) -> DbResult<Manufacturer> {
        let id = Uuid::new_v4();
        let now = chrono::Utc::now();

        sqlx::query(
            r#"
            INSERT INTO manufacturers (id, company_id, name, status, created_at, updated_at)
            VALUES (?, ?, ?, 'active', ?, ?)
            "#,
        )
        .bind(id.to_string())
        .bind(input.company_id.to_string())
        .bind(&input.name)
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

        Ok(Manufacturer {
            id,
            company_id: input.company_id,
            name: input.name,
            status: ActivityStatus::Active,
            created_at: now,
            updated_at: now,
        })
    }

    async fn get_by_id(&self, id: Uuid) -> DbResult<Option<Manufacturer>> {
        let row = sqlx::query(
            r#"
            SELECT id, company_id, name, status, created_at, updated_at
            FROM manufacturers
            WHERE id = ?
            "#,
        )
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(manufacturer_from_row).transpose()
    }

    async fn list_active(&self, company_ids: &[Uuid]) -> DbResult<Vec<Manufacturer>> {
        let company_filter = if company_ids.is_empty() {
            String::new()
        } else {
            format!("AND company_id IN ({})", placeholders(company_ids.len()))
        };
        let query = format!(
            r#"
            SELECT id, company_id, name, status, created_at, updated_at
            FROM manufacturers
            WHERE status = 'active' {}
            ORDER BY name ASC
            "#,
            company_filter
        );

        let mut q = sqlx::query(&query);
        for id in company_ids {
            q = q.bind(id.to_string());
        }
        let rows = q.fetch_all(&self.pool).await?;

        rows.iter().map(manufacturer_from_row).collect()
    }

    async fn active_ids_for_companies(&self, company_ids: &[Uuid]) -> DbResult<Vec<Uuid>> {
        if company_ids.is_empty() {
            return Ok(Vec::new());
        }

        let query = format!(
            "SELECT id FROM manufacturers WHERE status = 'active' AND company_id IN ({}) ORDER BY id",
            placeholders(company_ids.len())
        );
        let mut q = sqlx::query(&query);
        for id in company_ids {
            q = q.bind(id.to_string());
        }
        let rows = q.fetch_all(&self.pool).await?;

        rows.into_iter()
            .map(|row| parse_uuid(&row.get::<String, _>("id")))
            .collect()
    }

    async fn list_active_refs(&self) -> DbResult<Vec<NamedRef>> {
        let rows = sqlx::query(
            "SELECT id, name FROM manufacturers WHERE status = 'active' ORDER BY name ASC",
        )
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
}
