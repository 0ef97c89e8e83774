use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{Row, SqlitePool, sqlite::SqliteRow};
use uuid::Uuid;

use super::common::{SqlArg, bind_args, parse_uuid, placeholders};
use crate::{
    db::{
        error::{DbError, DbResult},
        repos::{LabelQuery, LabelRepo, ManufacturerSet},
    },
    models::{CreateLabel, Label, LabelReportRow, Visibility},
};

pub struct SqliteLabelRepo {
    pool: SqlitePool,
}

impl SqliteLabelRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

fn label_from_row(row: &SqliteRow) -> DbResult<Label> {
    let status: String = row.get("status");
    Ok(Label {
        id: parse_uuid(&row.get::<String, _>("id"))?,
        brand_id: parse_uuid(&row.get::<String, _>("brand_id"))?,
        product_id: parse_uuid(&row.get::<String, _>("product_id"))?,
        manufacturer_id: parse_uuid(&row.get::<String, _>("manufacturer_id"))?,
        user_id: parse_uuid(&row.get::<String, _>("user_id"))?,
        variant: row.get("variant"),
        batch_number: row.get("batch_number"),
        status: Visibility::from_str(&status).ok_or_else(|| {
            DbError::Internal(format!("Invalid label status in database: {}", status))
        })?,
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    })
}

/// Append an `IN (...)` condition for a non-empty list.
fn push_in<T>(conditions: &mut Vec<String>, args: &mut Vec<SqlArg>, column: &str, values: &[T])
where
    T: Clone + Into<SqlArg>,
{
    if values.is_empty() {
        return;
    }
    conditions.push(format!("{} IN ({})", column, placeholders(values.len())));
    args.extend(values.iter().cloned().map(Into::into));
}

/// Compile a label query into a WHERE clause over the `l` alias.
///
/// Returns `None` when the manufacturer set cannot match anything.
fn where_clause(query: &LabelQuery) -> Option<(String, Vec<SqlArg>)> {
    let mut conditions = vec!["l.status = 'show'".to_string()];
    let mut args = Vec::new();

    match &query.manufacturers {
        ManufacturerSet::All => {}
        ManufacturerSet::Only(ids) if ids.is_empty() => return None,
        ManufacturerSet::Only(ids) => {
            push_in(&mut conditions, &mut args, "l.manufacturer_id", ids);
        }
    }

    let filter = &query.filter;
    push_in(&mut conditions, &mut args, "l.brand_id", &filter.brand_ids);
    push_in(&mut conditions, &mut args, "l.product_id", &filter.product_ids);
    push_in(&mut conditions, &mut args, "l.user_id", &filter.user_ids);
    if !filter.variants.is_empty() {
        conditions.push(format!(
            "l.variant IN ({})",
            placeholders(filter.variants.len())
        ));
        args.extend(filter.variants.iter().cloned().map(SqlArg::Text));
    }

    if let Some(from) = query.from {
        conditions.push("l.created_at >= ?".to_string());
        args.push(SqlArg::Time(from));
    }
    if let Some(until) = query.until {
        conditions.push("l.created_at < ?".to_string());
        args.push(SqlArg::Time(until));
    }

    Some((conditions.join(" AND "), args))
}

impl SqliteLabelRepo {
    async fn distinct_column(&self, column: &str, query: &LabelQuery) -> DbResult<Vec<String>> {
        let Some((clause, args)) = where_clause(query) else {
            return Ok(Vec::new());
        };
        let sql = format!(
            "SELECT DISTINCT l.{col} AS value FROM labels l WHERE {clause} ORDER BY l.{col} ASC",
            col = column,
            clause = clause
        );

        let rows = bind_args(sqlx::query(&sql), &args)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().map(|row| row.get("value")).collect())
    }
}

#[async_trait]
impl LabelRepo for SqliteLabelRepo {
    async fn create(&self, input: CreateLabel) -> DbResult<Label> {
        let id = Uuid::new_v4();
        let now = Utc::now();
        let created_at = input.created_at.unwrap_or(now);

        sqlx::query(
            r#"
            INSERT INTO labels (id, brand_id, product_id, manufacturer_id, user_id, variant, batch_number, status, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, 'show', ?, ?)
            "#,
        )
        .bind(id.to_string())
        .bind(input.brand_id.to_string())
        .bind(input.product_id.to_string())
        .bind(input.manufacturer_id.to_string())
        .bind(input.user_id.to_string())
        .bind(&input.variant)
        .bind(&input.batch_number)
        .bind(created_at)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(db_err) if db_err.is_foreign_key_violation() => {
                DbError::Validation(
                    "Label references an unknown brand, product, manufacturer or account"
                        .to_string(),
                )
            }
            _ => DbError::from(e),
        })?;

        Ok(Label {
            id,
            brand_id: input.brand_id,
            product_id: input.product_id,
            manufacturer_id: input.manufacturer_id,
            user_id: input.user_id,
            variant: input.variant,
            batch_number: input.batch_number,
            status: Visibility::Show,
            created_at,
            updated_at: now,
        })
    }

    async fn get_by_id(&self, id: Uuid) -> DbResult<Option<Label>> {
        let row = sqlx::query(
            r#"
            SELECT id, brand_id, product_id, manufacturer_id, user_id, variant, batch_number,
                   status, created_at, updated_at
            FROM labels
            WHERE id = ?
            "#,
        )
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(label_from_row).transpose()
    }

    async fn set_status(&self, id: Uuid, status: Visibility) -> DbResult<Label> {
        let result = sqlx::query("UPDATE labels SET status = ?, updated_at = ? WHERE id = ?")
            .bind(status.as_str())
            .bind(Utc::now())
            .bind(id.to_string())
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::NotFound);
        }

        self.get_by_id(id).await?.ok_or(DbError::NotFound)
    }

    async fn list_report_rows(&self, query: &LabelQuery) -> DbResult<Vec<LabelReportRow>> {
        let Some((clause, args)) = where_clause(query) else {
            return Ok(Vec::new());
        };
        let sql = format!(
            r#"
            SELECT COALESCE(a.name, 'Unknown') AS user_name, l.created_at
            FROM labels l
            LEFT JOIN accounts a ON a.id = l.user_id
            WHERE {}
            ORDER BY l.created_at ASC
            "#,
            clause
        );

        let rows = bind_args(sqlx::query(&sql), &args)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows
            .into_iter()
            .map(|row| LabelReportRow {
                user_name: row.get("user_name"),
                created_at: row.get("created_at"),
            })
            .collect())
    }

    async fn list_created_at(&self, query: &LabelQuery) -> DbResult<Vec<DateTime<Utc>>> {
        let Some((clause, args)) = where_clause(query) else {
            return Ok(Vec::new());
        };
        let sql = format!(
            "SELECT l.created_at FROM labels l WHERE {} ORDER BY l.created_at ASC",
            clause
        );

        let rows = bind_args(sqlx::query(&sql), &args)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().map(|row| row.get("created_at")).collect())
    }

    async fn distinct_variants(&self, query: &LabelQuery) -> DbResult<Vec<String>> {
        self.distinct_column("variant", query).await
    }

    async fn distinct_batch_numbers(&self, query: &LabelQuery) -> DbResult<Vec<String>> {
        self.distinct_column("batch_number", query).await
    }

    async fn count(&self, manufacturers: &ManufacturerSet) -> DbResult<i64> {
        let row = match manufacturers {
            ManufacturerSet::All => {
                sqlx::query("SELECT COUNT(*) AS count FROM labels")
                    .fetch_one(&self.pool)
                    .await?
            }
            ManufacturerSet::Only(ids) if ids.is_empty() => return Ok(0),
            ManufacturerSet::Only(ids) => {
                let sql = format!(
                    "SELECT COUNT(*) AS count FROM labels WHERE manufacturer_id IN ({})",
                    placeholders(ids.len())
                );
                let mut q = sqlx::query(&sql);
                for id in ids {
                    q = q.bind(id.to_string());
                }
                q.fetch_one(&self.pool).await?
            }
        };
        Ok(row.get("count"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repos::LabelFilter;

    #[test]
    fn test_where_clause_unrestricted() {
        let query = LabelQuery::new(ManufacturerSet::All, LabelFilter::default());
        let (clause, args) = where_clause(&query).unwrap();
        assert_eq!(clause, "l.status = 'show'");
        assert!(args.is_empty());
    }

    #[test]
    fn test_where_clause_empty_manufacturer_set_matches_nothing() {
        let query = LabelQuery::new(ManufacturerSet::Only(vec![]), LabelFilter::default());
        assert!(where_clause(&query).is_none());
    }

    #[test]
    fn test_where_clause_combines_filters_in_bind_order() {
        let manufacturer = Uuid::new_v4();
        let filter = LabelFilter {
            brand_ids: vec![Uuid::new_v4(), Uuid::new_v4()],
            variants: vec!["Red".into()],
            ..Default::default()
        };
        let from = Utc::now();
        let query =
            LabelQuery::new(ManufacturerSet::Only(vec![manufacturer]), filter).between(from, from);

        let (clause, args) = where_clause(&query).unwrap();
        assert_eq!(
            clause,
            "l.status = 'show' AND l.manufacturer_id IN (?) AND l.brand_id IN (?,?) \
             AND l.variant IN (?) AND l.created_at >= ? AND l.created_at < ?"
        );
        assert_eq!(args.len(), 6);
        assert!(matches!(&args[0], SqlArg::Text(s) if *s == manufacturer.to_string()));
        assert!(matches!(&args[3], SqlArg::Text(s) if s == "Red"));
        assert!(matches!(args[5], SqlArg::Time(_)));
    }
}
