use async_trait::async_trait;
use chrono::Utc;
use sqlx::{Row, SqlitePool, sqlite::SqliteRow};
use uuid::Uuid;

use super::common::{SqlArg, bind_args, parse_uuid};
use crate::{
    db::{
        error::{DbError, DbResult},
        repos::SubmissionRepo,
    },
    models::{
        CreateErrorReport, CreateHelpRequest, CreateWarranty, ErrorReport, ErrorReportExport,
        HelpRequest, HelpRequestExport, SubmissionQuery, Warranty,
    },
};

pub struct SqliteSubmissionRepo {
    pool: SqlitePool,
}

impl SqliteSubmissionRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

fn map_reference_error(e: sqlx::Error) -> DbError {
    match e {
        sqlx::Error::Database(db_err) if db_err.is_foreign_key_violation() => {
            DbError::Validation("Unknown company, brand or product".to_string())
        }
        _ => DbError::from(e),
    }
}

/// WHERE clause over a table aliased `t` for the given submission query.
fn submission_filter(query: &SubmissionQuery) -> (String, Vec<SqlArg>) {
    let mut conditions = vec!["1 = 1".to_string()];
    let mut args = Vec::new();

    if let Some(company_id) = query.company_id {
        conditions.push("t.company_id = ?".to_string());
        args.push(SqlArg::from(company_id));
    }
    if let Some(from) = query.from {
        conditions.push("t.created_at >= ?".to_string());
        args.push(SqlArg::Time(from));
    }
    if let Some(until) = query.until {
        conditions.push("t.created_at < ?".to_string());
        args.push(SqlArg::Time(until));
    }

    (conditions.join(" AND "), args)
}

fn warranty_from_row(row: &SqliteRow) -> DbResult<Warranty> {
    Ok(Warranty {
        id: parse_uuid(&row.get::<String, _>("id"))?,
        ds1: row.get("ds1"),
        company_id: parse_uuid(&row.get::<String, _>("company_id"))?,
        brand_id: parse_uuid(&row.get::<String, _>("brand_id"))?,
        product_id: parse_uuid(&row.get::<String, _>("product_id"))?,
        warranty_activated: row.get("warranty_activated"),
        purchase_date: row.get("purchase_date"),
        store_name: row.get("store_name"),
        store_pin_code: row.get("store_pin_code"),
        warranty_duration: row.get("warranty_duration"),
        invoice_number: row.get("invoice_number"),
        invoice_image: row.get("invoice_image"),
        pincode: row.get("pincode"),
        address1: row.get("address1"),
        address2: row.get("address2"),
        created_at: row.get("created_at"),
    })
}

#[async_trait]
impl SubmissionRepo for SqliteSubmissionRepo {
    async fn create_warranty(&self, input: CreateWarranty) -> DbResult<Warranty> {
        let id = Uuid::new_v4();
        let now = Utc::now();

        sqlx::query(
            r#"
            INSERT INTO warranties (
                id, ds1, company_id, brand_id, product_id, warranty_activated, purchase_date,
                store_name, store_pin_code, warranty_duration, invoice_number, invoice_image,
                pincode, address1, address2, created_at
            )
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(id.to_string())
        .bind(&input.ds1)
        .bind(input.company_id.to_string())
        .bind(input.brand_id.to_string())
        .bind(input.product_id.to_string())
        .bind(input.warranty_activated)
        .bind(input.purchase_date)
        .bind(&input.store_name)
        .bind(&input.store_pin_code)
        .bind(&input.warranty_duration)
        .bind(&input.invoice_number)
        .bind(&input.invoice_image)
        .bind(&input.pincode)
        .bind(&input.address1)
        .bind(&input.address2)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(map_reference_error)?;

        Ok(Warranty {
            id,
            ds1: input.ds1,
            company_id: input.company_id,
            brand_id: input.brand_id,
            product_id: input.product_id,
            warranty_activated: input.warranty_activated,
            purchase_date: input.purchase_date,
            store_name: input.store_name,
            store_pin_code: input.store_pin_code,
            warranty_duration: input.warranty_duration,
            invoice_number: input.invoice_number,
            invoice_image: input.invoice_image,
            pincode: input.pincode,
            address1: input.address1,
            address2: input.address2,
            created_at: now,
        })
    }

    async fn create_help_request(&self, input: CreateHelpRequest) -> DbResult<HelpRequest> {
        let id = Uuid::new_v4();
        let now = Utc::now();
        let request_date = input.request_date.unwrap_or(now);

        sqlx::query(
            r#"
            INSERT INTO help_requests (
                id, ds1, company_id, brand_id, product_id, request_date, help_ref_num,
                address, pincode, created_at
            )
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(id.to_string())
        .bind(&input.ds1)
        .bind(input.company_id.to_string())
        .bind(input.brand_id.to_string())
        .bind(input.product_id.to_string())
        .bind(request_date)
        .bind(&input.help_ref_num)
        .bind(&input.address)
        .bind(&input.pincode)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(map_reference_error)?;

        Ok(HelpRequest {
            id,
            ds1: input.ds1,
            company_id: input.company_id,
            brand_id: input.brand_id,
            product_id: input.product_id,
            request_date,
            help_ref_num: input.help_ref_num,
            address: input.address,
            pincode: input.pincode,
            created_at: now,
        })
    }

    async fn create_error_report(&self, input: CreateErrorReport) -> DbResult<ErrorReport> {
        let id = Uuid::new_v4();
        let now = Utc::now();

        sqlx::query(
            r#"
            INSERT INTO error_reports (
                id, company_id, brand_id, product_id, store_and_location, purchase_date,
                store_pin_code, created_at
            )
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(id.to_string())
        .bind(input.company_id.to_string())
        .bind(input.brand_id.to_string())
        .bind(input.product_id.to_string())
        .bind(&input.store_and_location)
        .bind(input.purchase_date)
        .bind(&input.store_pin_code)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(map_reference_error)?;

        Ok(ErrorReport {
            id,
            company_id: input.company_id,
            brand_id: input.brand_id,
            product_id: input.product_id,
            store_and_location: input.store_and_location,
            purchase_date: input.purchase_date,
            store_pin_code: input.store_pin_code,
            created_at: now,
        })
    }

    async fn list_warranties(&self, query: &SubmissionQuery) -> DbResult<Vec<Warranty>> {
        let (clause, args) = submission_filter(query);
        let sql = format!(
            r#"
            SELECT t.id, t.ds1, t.company_id, t.brand_id, t.product_id, t.warranty_activated,
                   t.purchase_date, t.store_name, t.store_pin_code, t.warranty_duration,
                   t.invoice_number, t.invoice_image, t.pincode, t.address1, t.address2,
                   t.created_at
            FROM warranties t
            WHERE {}
            ORDER BY t.created_at ASC
            "#,
            clause
        );

        let rows = bind_args(sqlx::query(&sql), &args)
            .fetch_all(&self.pool)
            .await?;

        rows.iter().map(warranty_from_row).collect()
    }

    async fn list_help_requests(
        &self,
        query: &SubmissionQuery,
    ) -> DbResult<Vec<HelpRequestExport>> {
        let (clause, args) = submission_filter(query);
        let sql = format!(
            r#"
            SELECT t.ds1, t.request_date, t.help_ref_num, t.address, t.pincode, t.created_at,
                   COALESCE(c.name, '') AS company_name,
                   COALESCE(b.name, '') AS brand_name,
                   COALESCE(p.name, '') AS product_name
            FROM help_requests t
            LEFT JOIN companies c ON c.id = t.company_id
            LEFT JOIN brands b ON b.id = t.brand_id
            LEFT JOIN products p ON p.id = t.product_id
            WHERE {}
            ORDER BY t.created_at ASC
            "#,
            clause
        );

        let rows = bind_args(sqlx::query(&sql), &args)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows
            .into_iter()
            .map(|row| HelpRequestExport {
                ds1: row.get("ds1"),
                request_date: row.get("request_date"),
                company_name: row.get("company_name"),
                brand_name: row.get("brand_name"),
                product_name: row.get("product_name"),
                help_ref_num: row.get("help_ref_num"),
                address: row.get("address"),
                pincode: row.get("pincode"),
                created_at: row.get("created_at"),
            })
            .collect())
    }

    async fn list_error_reports(
        &self,
        query: &SubmissionQuery,
    ) -> DbResult<Vec<ErrorReportExport>> {
        let (clause, args) = submission_filter(query);
        let sql = format!(
            r#"
            SELECT t.store_and_location, t.purchase_date, t.store_pin_code, t.created_at,
                   COALESCE(b.name, '') AS brand_name,
                   COALESCE(p.name, '') AS product_name
            FROM error_reports t
            LEFT JOIN brands b ON b.id = t.brand_id
            LEFT JOIN products p ON p.id = t.product_id
            WHERE {}
            ORDER BY t.created_at ASC
            "#,
            clause
        );

        let rows = bind_args(sqlx::query(&sql), &args)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows
            .into_iter()
            .map(|row| ErrorReportExport {
                brand_name: row.get("brand_name"),
                product_name: row.get("product_name"),
                store_and_location: row.get("store_and_location"),
                purchase_date: row.get("purchase_date"),
                store_pin_code: row.get("store_pin_code"),
                created_at: row.get("created_at"),
            })
            .collect())
    }
}
