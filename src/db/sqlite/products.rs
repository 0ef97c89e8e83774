use async_trait::async_trait;
use sqlx::{Row, SqlitePool, sqlite::SqliteRow};
use uuid::Uuid;

use super::common::{parse_string_list, parse_uuid, placeholders};
use crate::{
    db::{
        error::{DbError, DbResult},
        repos::{ProductLookup, ProductRepo},
    },
    models::{CreateProduct, Product, ProductSummary, Visibility},
};

pub struct SqliteProductRepo {
    pool: SqlitePool,
}

impl SqliteProductRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

fn product_from_row(row: &SqliteRow) -> DbResult<Product> {
    let status: String = row.get("status");
    Ok(Product {
        id: parse_uuid(&row.get::<String, _>("id"))?,
        company_id: parse_uuid(&row.get::<String, _>("company_id"))?,
        brand_id: parse_uuid(&row.get::<String, _>("brand_id"))?,
        name: row.get("name"),
        feature: row.get("feature"),
        variants: parse_string_list(&row.get::<String, _>("variants"))?,
        status: Visibility::from_str(&status).ok_or_else(|| {
            DbError::Internal(format!("Invalid product status in database: {}", status))
        })?,
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    })
}

#[async_trait]
impl ProductRepo for SqliteProductRepo {
    async fn create(&self, company_id: Uuid, input: CreateProduct) -> DbResult<Product> {
        let id = Uuid::new_v4();
        let now = chrono::Utc::now();

        sqlx::query(
            r#"
            INSERT INTO products (id, company_id, brand_id, name, feature, variants, status, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, 'show', ?, ?)
            "#,
        )
        .bind(id.to_string())
        .bind(company_id.to_string())
        .bind(input.brand_id.to_string())
        .bind(&input.name)
        .bind(&input.feature)
        .bind(serde_json::to_string(&input.variants)?)
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(db_err) if db_err.is_foreign_key_violation() => {
                DbError::Validation(format!("Unknown brand '{}'", input.brand_id))
            }
            _ => DbError::from(e),
        })?;

        Ok(Product {
            id,
            company_id,
            brand_id: input.brand_id,
            name: input.name,
            feature: input.feature,
            variants: input.variants,
            status: Visibility::Show,
            created_at: now,
            updated_at: now,
        })
    }

    async fn get_by_id(&self, id: Uuid) -> DbResult<Option<Product>> {
        let row = sqlx::query(
            r#"
            SELECT id, company_id, brand_id, name, feature, variants, status, created_at, updated_at
            FROM products
            WHERE id = ?
            "#,
        )
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(product_from_row).transpose()
    }

    async fn list_visible(&self, lookup: &ProductLookup) -> DbResult<Vec<ProductSummary>> {
        let mut conditions = vec!["status = 'show'".to_string()];
        let mut binds: Vec<String> = Vec::new();

        if let Some(company_id) = lookup.company_id {
            conditions.push("company_id = ?".to_string());
            binds.push(company_id.to_string());
        }
        if !lookup.brand_ids.is_empty() {
            conditions.push(format!(
                "brand_id IN ({})",
                placeholders(lookup.brand_ids.len())
            ));
            binds.extend(lookup.brand_ids.iter().map(Uuid::to_string));
        }
        if !lookup.product_ids.is_empty() {
            conditions.push(format!("id IN ({})", placeholders(lookup.product_ids.len())));
            binds.extend(lookup.product_ids.iter().map(Uuid::to_string));
        }

        let query = format!(
            r#"
            SELECT id, name, feature, variants
            FROM products
            WHERE {}
            ORDER BY name ASC
            "#,
            conditions.join(" AND ")
        );

        let mut q = sqlx::query(&query);
        for value in binds {
            q = q.bind(value);
        }
        let rows = q.fetch_all(&self.pool).await?;

        rows.into_iter()
            .map(|row| {
                Ok(ProductSummary {
                    id: parse_uuid(&row.get::<String, _>("id"))?,
                    name: row.get("name"),
                    feature: row.get("feature"),
                    variants: parse_string_list(&row.get::<String, _>("variants"))?,
                })
            })
            .collect()
    }

    async fn count_visible(&self) -> DbResult<i64> {
        let row = sqlx::query("SELECT COUNT(*) AS count FROM products WHERE status = 'show'")
            .fetch_one(&self.pool)
            .await?;
        Ok(row.get("count"))
    }

    async fn count_by_company(&self, company_id: Uuid) -> DbResult<i64> {
        let row = sqlx::query("SELECT COUNT(*) AS count FROM products WHERE company_id = ?")
            .bind(company_id.to_string())
            .fetch_one(&self.pool)
            .await?;
        Ok(row.get("count"))
    }
}
