//! CSV serialization for label statistics and end-user submissions.

use axum::{
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use chrono::{DateTime, Utc};
use csv::WriterBuilder;
use serde::Serialize;

use crate::models::{DailyLabelCount, ErrorReportExport, HelpRequestExport, Warranty};

/// Error type for CSV export operations
#[derive(Debug, thiserror::Error)]
#[error("CSV export error: {0}")]
pub struct CsvExportError(String);

impl IntoResponse for CsvExportError {
    fn into_response(self) -> Response {
        tracing::error!(error = %self.0, "CSV export failed");
        (StatusCode::INTERNAL_SERVER_ERROR, "CSV export failed").into_response()
    }
}

/// CSV attachment response
pub struct CsvResponse {
    pub data: Vec<u8>,
    pub filename: String,
}

impl IntoResponse for CsvResponse {
    fn into_response(self) -> Response {
        (
            StatusCode::OK,
            [
                (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
                (
                    header::CONTENT_DISPOSITION,
                    format!("attachment; filename=\"{}\"", self.filename),
                ),
            ],
            self.data,
        )
            .into_response()
    }
}

fn timestamp(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339()
}

/// Write `headers` followed by one record per row.
///
/// Headers are written explicitly so empty exports still describe their columns.
fn write_rows<R: Serialize>(headers: &[&str], rows: &[R]) -> Result<Vec<u8>, CsvExportError> {
    let mut wtr = WriterBuilder::new()
        .has_headers(false)
        .from_writer(vec![]);
    wtr.write_record(headers)
        .map_err(|e| CsvExportError(e.to_string()))?;
    for row in rows {
        wtr.serialize(row)
            .map_err(|e| CsvExportError(e.to_string()))?;
    }
    wtr.into_inner()
        .map_err(|e| CsvExportError(e.to_string()))
}

#[derive(Serialize)]
struct DailyCountRow<'a> {
    day: &'a str,
    count: u64,
}

/// Export daily label counts as `day,count`
pub fn export_daily_counts_csv(counts: &[DailyLabelCount]) -> Result<Vec<u8>, CsvExportError> {
    let rows: Vec<_> = counts
        .iter()
        .map(|c| DailyCountRow {
            day: &c.date,
            count: c.count_of_label,
        })
        .collect();
    write_rows(&["day", "count"], &rows)
}

#[derive(Serialize)]
struct WarrantyRow<'a> {
    ds1: &'a str,
    warranty_activated: bool,
    purchase_date: String,
    store_name: &'a str,
    store_pin_code: &'a str,
    warranty_duration: &'a str,
    invoice_number: &'a str,
    invoice_image: &'a str,
    pincode: &'a str,
    address1: &'a str,
    address2: &'a str,
    created_at: String,
}

const WARRANTY_HEADERS: &[&str] = &[
    "DS1",
    "warranty_activated",
    "purchase_date",
    "store_name",
    "store_pin_code",
    "warranty_duration",
    "invoice_number",
    "invoice_image",
    "pincode",
    "address1",
    "address2",
    "CreatedAt",
];

pub fn export_warranties_csv(warranties: &[Warranty]) -> Result<Vec<u8>, CsvExportError> {
    let rows: Vec<_> = warranties
        .iter()
        .map(|w| WarrantyRow {
            ds1: &w.ds1,
            warranty_activated: w.warranty_activated,
            purchase_date: w.purchase_date.format("%Y-%m-%d").to_string(),
            store_name: &w.store_name,
            store_pin_code: &w.store_pin_code,
            warranty_duration: &w.warranty_duration,
            invoice_number: &w.invoice_number,
            invoice_image: w.invoice_image.as_deref().unwrap_or_default(),
            pincode: &w.pincode,
            address1: &w.address1,
            address2: w.address2.as_deref().unwrap_or_default(),
            created_at: timestamp(&w.created_at),
        })
        .collect();
    write_rows(WARRANTY_HEADERS, &rows)
}

#[derive(Serialize)]
struct HelpRequestRow<'a> {
    ds1: &'a str,
    request_date: String,
    company: &'a str,
    brand: &'a str,
    product: &'a str,
    help_ref_num: &'a str,
    address: &'a str,
    pincode: &'a str,
    created_at: String,
}

/// The `company_id` column carries the company name.
const HELP_REQUEST_HEADERS: &[&str] = &[
    "DS1",
    "request_date",
    "company_id",
    "brand",
    "product",
    "help_ref_num",
    "address",
    "pincode",
    "CreatedAt",
];

pub fn export_help_requests_csv(
    requests: &[HelpRequestExport],
) -> Result<Vec<u8>, CsvExportError> {
    let rows: Vec<_> = requests
        .iter()
        .map(|r| HelpRequestRow {
            ds1: &r.ds1,
            request_date: timestamp(&r.request_date),
            company: &r.company_name,
            brand: &r.brand_name,
            product: &r.product_name,
            help_ref_num: &r.help_ref_num,
            address: &r.address,
            pincode: &r.pincode,
            created_at: timestamp(&r.created_at),
        })
        .collect();
    write_rows(HELP_REQUEST_HEADERS, &rows)
}

#[derive(Serialize)]
struct ErrorReportRow<'a> {
    brand: &'a str,
    product: &'a str,
    store_and_location: &'a str,
    purchase_date: String,
    store_pin_code: &'a str,
    created_at: String,
}

const ERROR_REPORT_HEADERS: &[&str] = &[
    "brand",
    "product",
    "store_and_location",
    "purchase_date",
    "store_pin_code",
    "CreatedAt",
];

pub fn export_error_reports_csv(
    reports: &[ErrorReportExport],
) -> Result<Vec<u8>, CsvExportError> {
    let rows: Vec<_> = reports
        .iter()
        .map(|r| ErrorReportRow {
            brand: &r.brand_name,
            product: &r.product_name,
            store_and_location: &r.store_and_location,
            purchase_date: r.purchase_date.format("%Y-%m-%d").to_string(),
            store_pin_code: &r.store_pin_code,
            created_at: timestamp(&r.created_at),
        })
        .collect();
    write_rows(ERROR_REPORT_HEADERS, &rows)
}
