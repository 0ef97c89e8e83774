//! End-to-end API tests against an in-memory database.
//!
//! Each test builds the real router with `build_app`, seeds a company with
//! one manufacturer, brand and product, and mints tokens for one account of
//! each role.

use std::sync::{Arc, Mutex};

use axum::{
    body::Body,
    http::{Request, StatusCode, header},
};
use chrono::{DateTime, Duration, TimeZone, Utc};
use serde_json::{Value, json};
use tower::ServiceExt;
use tracing::span;
use tracing_subscriber::{
    Layer,
    layer::{Context, SubscriberExt},
    util::SubscriberInitExt,
};

use crate::{
    AppState,
    auth::issue_token,
    build_app,
    config::{AuthConfig, LabelhubConfig},
    db::{
        DbPool,
        tests::harness::{LabelFixture, TestStore},
    },
    models::{Account, AccountRole},
};

const TEST_SECRET: &str = "0123456789abcdef0123456789abcdef";

struct ApiHarness {
    app: axum::Router,
    store: TestStore,
    fixture: LabelFixture,
    super_token: String,
    company_token: String,
    manufacturer_token: String,
}

impl ApiHarness {
    async fn new() -> Self {
        let store = TestStore::new().await;
        let fixture = LabelFixture::seed(&store, "Acme").await;

        let config = LabelhubConfig {
            auth: AuthConfig {
                jwt_secret: TEST_SECRET.to_string(),
                ..Default::default()
            },
            ..Default::default()
        };

        let super_id = store
            .create_account("Root", AccountRole::SuperAdmin, None)
            .await;
        let company_id = store
            .create_account(
                "Acme Lead",
                AccountRole::CompanyAdmin,
                Some(fixture.company_id),
            )
            .await;

        let token = |account: Account| issue_token(&config.auth, &account).unwrap();
        let super_token = token(Self::account(&store, super_id).await);
        let company_token = token(Self::account(&store, company_id).await);
        let manufacturer_token = token(Self::account(&store, fixture.user_id).await);

        let db = Arc::new(DbPool::from_sqlite(store.pool.clone()));
        let state = AppState::from_pool(config.clone(), db);
        let app = build_app(&config, state);

        Self {
            app,
            store,
            fixture,
            super_token,
            company_token,
            manufacturer_token,
        }
    }

    async fn account(store: &TestStore, id: uuid::Uuid) -> Account {
        store.db.accounts().get_by_id(id).await.unwrap().unwrap()
    }

    async fn add_label(&self, variant: &str, batch: &str, created_at: DateTime<Utc>) {
        self.store
            .db
            .labels()
            .create(self.fixture.label(variant, batch, created_at))
            .await
            .unwrap();
    }

    async fn send(&self, request: Request<Body>) -> (StatusCode, Vec<u8>, axum::http::HeaderMap) {
        let response = self.app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, bytes.to_vec(), headers)
    }

    fn json_request(method: &str, uri: &str, token: Option<&str>, body: Value) -> Request<Body> {
        let mut builder = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json");
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        builder
            .body(Body::from(serde_json::to_string(&body).unwrap()))
            .unwrap()
    }

    /// POST JSON and return status + JSON body.
    async fn post_json(&self, uri: &str, token: Option<&str>, body: Value) -> (StatusCode, Value) {
        let (status, bytes, _) = self
            .send(Self::json_request("POST", uri, token, body))
            .await;
        (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
    }

    /// GET and return status + JSON body.
    async fn get_json(&self, uri: &str, token: Option<&str>) -> (StatusCode, Value) {
        let mut builder = Request::builder().method("GET").uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        let (status, bytes, _) = self.send(builder.body(Body::empty()).unwrap()).await;
        (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
    }
}

#[tokio::test]
async fn test_health() {
    let harness = ApiHarness::new().await;
    let (status, body) = harness.get_json("/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["database"]["healthy"], true);

    let (status, _) = harness.get_json("/health/ready", None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_admin_requires_token() {
    let harness = ApiHarness::new().await;
    let request = Request::builder()
        .method("GET")
        .uri("/admin/v1/roles")
        .header("x-request-id", "req-123")
        .body(Body::empty())
        .unwrap();
    let (status, bytes, headers) = harness.send(request).await;
    let body: Value = serde_json::from_slice(&bytes).unwrap();

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"]["type"], "authentication_error");
    assert_eq!(body["error"]["code"], "missing_credentials");
    assert_eq!(body["error"]["request_id"], "req-123");
    assert_eq!(headers["x-request-id"], "req-123");
}

#[tokio::test]
async fn test_forged_token_rejected() {
    let harness = ApiHarness::new().await;
    let (status, body) = harness
        .get_json("/admin/v1/roles", Some("not.a.token"))
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"]["code"], "invalid_token");
}

#[tokio::test]
async fn test_role_checked_per_handler() {
    let harness = ApiHarness::new().await;
    let (status, body) = harness
        .post_json(
            "/admin/v1/super-admin-label-stats",
            Some(&harness.company_token),
            json!({"date": "2024-03-31"}),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"]["type"], "permission_error");

    let (status, body) = harness
        .get_json("/admin/v1/roles", Some(&harness.super_token))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["role"], "super_admin");
}

#[tokio::test]
async fn test_super_admin_stats_envelope() {
    let harness = ApiHarness::new().await;
    let feb = Utc.with_ymd_and_hms(2024, 2, 10, 9, 0, 0).unwrap();
    harness.add_label("Red", "B1", feb).await;
    harness.add_label("Blue", "B1", feb + Duration::days(1)).await;

    let (status, body) = harness
        .post_json(
            "/admin/v1/super-admin-label-stats",
            Some(&harness.super_token),
            json!({"date": "2024-03-31"}),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    let data = &body["data"];
    assert_eq!(data["total_labels"], 2);
    assert_eq!(
        data["month_counts"],
        json!({"Dec": 0, "Jan": 0, "Feb": 2, "Mar": 0})
    );
    assert_eq!(
        data["user_counts"],
        json!([{"name": "Acme Operator", "count": 2, "percent": 100}])
    );
    assert_eq!(data["totals"]["labels"], 2);
}

#[tokio::test]
async fn test_company_stats_scoped_to_own_company() {
    let harness = ApiHarness::new().await;
    harness
        .add_label("Red", "B1", Utc.with_ymd_and_hms(2024, 3, 5, 9, 0, 0).unwrap())
        .await;

    // A second company's labels stay out of the first company's report
    let other = LabelFixture::seed(&harness.store, "Globex").await;
    harness
        .store
        .db
        .labels()
        .create(other.label("Red", "X1", Utc.with_ymd_and_hms(2024, 3, 6, 9, 0, 0).unwrap()))
        .await
        .unwrap();

    let (status, body) = harness
        .post_json(
            "/admin/v1/company-label-stats",
            Some(&harness.company_token),
            json!({"date": "2024-03-31", "manufacturer_ids": [other.manufacturer_id]}),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["total_labels"], 0);

    let (_, body) = harness
        .post_json(
            "/admin/v1/company-label-stats",
            Some(&harness.company_token),
            json!({"date": "2024-03-31"}),
        )
        .await;
    assert_eq!(body["data"]["total_labels"], 1);
}

#[tokio::test]
async fn test_stats_reject_bad_date() {
    let harness = ApiHarness::new().await;
    for body in [json!({"date": "31/03/2024"}), json!({})] {
        let (status, response) = harness
            .post_json(
                "/admin/v1/manufacturer-label-stats",
                Some(&harness.manufacturer_token),
                body,
            )
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(response["error"]["param"], "date");
    }
}

#[tokio::test]
async fn test_label_count_requires_every_field() {
    let harness = ApiHarness::new().await;
    let (status, body) = harness
        .post_json(
            "/admin/v1/label-count",
            Some(&harness.manufacturer_token),
            json!({"product_ids": [], "variants": [], "date": "2024-05-31"}),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["param"], "brand_ids");

    harness
        .add_label("Red", "B1", Utc.with_ymd_and_hms(2024, 5, 2, 9, 0, 0).unwrap())
        .await;
    let (status, body) = harness
        .post_json(
            "/admin/v1/label-count",
            Some(&harness.manufacturer_token),
            json!({"brand_ids": [], "product_ids": [], "variants": [], "date": "2024-05-31"}),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body["data"],
        json!([{"date": "2024-05-02", "count_of_label": 1}])
    );
}

#[tokio::test]
async fn test_issue_and_toggle_label() {
    let harness = ApiHarness::new().await;
    let (status, body) = harness
        .post_json(
            "/admin/v1/labels",
            Some(&harness.manufacturer_token),
            json!({
                "brand_id": harness.fixture.brand_id,
                "product_id": harness.fixture.product_id,
                "variant": "Red",
                "batch_number": "B-7",
            }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["status"], "show");
    let label_id = body["data"]["id"].as_str().unwrap().to_string();

    let (status, body) = harness
        .post_json(
            "/admin/v1/label-batch-numbers",
            Some(&harness.manufacturer_token),
            json!({"product_id": harness.fixture.product_id}),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"], json!(["B-7"]));

    let request = ApiHarness::json_request(
        "PATCH",
        &format!("/admin/v1/labels/{}/status", label_id),
        Some(&harness.company_token),
        json!({}),
    );
    let (status, bytes, _) = harness.send(request).await;
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "hide");
}

#[tokio::test]
async fn test_issue_label_rejects_unknown_variant() {
    let harness = ApiHarness::new().await;
    let (status, body) = harness
        .post_json(
            "/admin/v1/labels",
            Some(&harness.manufacturer_token),
            json!({
                "brand_id": harness.fixture.brand_id,
                "product_id": harness.fixture.product_id,
                "variant": "Green",
                "batch_number": "B-7",
            }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "validation_error");
}

#[tokio::test]
async fn test_batches_and_variants_requires_product_ids() {
    let harness = ApiHarness::new().await;
    let (status, body) = harness
        .post_json(
            "/admin/v1/label-batchs-and-variants",
            Some(&harness.manufacturer_token),
            json!({}),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["param"], "product_ids");
}

#[tokio::test]
async fn test_manufacturer_csv_download() {
    let harness = ApiHarness::new().await;
    let recent = Utc::now() - Duration::minutes(1);
    harness.add_label("Red", "B1", recent).await;
    harness.add_label("Blue", "B1", recent).await;

    let request = ApiHarness::json_request(
        "POST",
        "/admin/v1/manufacturer-filter-and-csv",
        Some(&harness.manufacturer_token),
        json!({}),
    );
    let (status, bytes, headers) = harness.send(request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(headers[header::CONTENT_TYPE], "text/csv; charset=utf-8");

    let csv = String::from_utf8(bytes).unwrap();
    let lines: Vec<_> = csv.lines().collect();
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0], "day,count");
    assert_eq!(
        lines[1],
        format!("{},2", recent.date_naive().format("%Y-%m-%d"))
    );
}

#[tokio::test]
async fn test_stats_csv_rejects_unrepresentable_days() {
    let harness = ApiHarness::new().await;
    let (status, body) = harness
        .post_json(
            "/admin/v1/filter-and-download-csv",
            Some(&harness.super_token),
            json!({"days": 4294967295u64}),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["param"], "days");
}

/// Records the name of every span opened while it is the default subscriber.
#[derive(Clone, Default)]
struct SpanNames(Arc<Mutex<Vec<&'static str>>>);

impl<S: tracing::Subscriber> Layer<S> for SpanNames {
    fn on_new_span(&self, attrs: &span::Attributes<'_>, _: &span::Id, _: Context<'_, S>) {
        self.0.lock().unwrap().push(attrs.metadata().name());
    }
}

#[tokio::test]
async fn test_label_lookups_open_named_spans() {
    let harness = ApiHarness::new().await;
    let names = SpanNames::default();
    let _guard = tracing_subscriber::registry()
        .with(names.clone())
        .set_default();

    for (path, body) in [
        ("/admin/v1/label-batchs-and-variants", json!({"product_ids": []})),
        ("/admin/v1/label-batch-numbers", json!({})),
        ("/admin/v1/label-variants", json!({})),
        ("/admin/v1/multiple-label-variants", json!({})),
    ] {
        let (status, _) = harness
            .post_json(path, Some(&harness.manufacturer_token), body)
            .await;
        assert_eq!(status, StatusCode::OK, "{path}");
    }

    let names = names.0.lock().unwrap();
    for expected in [
        "admin.labels.batches_and_variants",
        "admin.labels.batch_numbers",
        "admin.labels.variants",
        "admin.labels.multiple_variants",
    ] {
        assert!(names.contains(&expected), "{expected} missing from {names:?}");
    }
}

#[tokio::test]
async fn test_submission_export_rejects_inverted_range() {
    let harness = ApiHarness::new().await;
    let (status, body) = harness
        .post_json(
            "/admin/v1/warranties-csv",
            Some(&harness.super_token),
            json!({"start_date": "2024-03-10", "end_date": "2024-03-01"}),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["param"], "start_date");
}

fn warranty_body(harness: &ApiHarness) -> Value {
    json!({
        "ds1": "DS-0001",
        "company_id": harness.fixture.company_id,
        "brand_id": harness.fixture.brand_id,
        "product_id": harness.fixture.product_id,
        "warranty_activated": true,
        "purchase_date": "2024-03-01",
        "store_name": "Main Street Electronics",
        "store_pin_code": "560001",
        "warranty_duration": "12 months",
        "invoice_number": "INV-77",
        "pincode": "560002",
        "address1": "12 MG Road",
    })
}

#[tokio::test]
async fn test_public_warranty_then_company_export() {
    let harness = ApiHarness::new().await;
    let (status, body) = harness
        .post_json("/public/v1/warranties", None, warranty_body(&harness))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["ds1"], "DS-0001");

    let request = ApiHarness::json_request(
        "POST",
        "/admin/v1/warranties-csv",
        Some(&harness.company_token),
        json!({}),
    );
    let (status, bytes, _) = harness.send(request).await;
    assert_eq!(status, StatusCode::OK);
    let csv = String::from_utf8(bytes).unwrap();
    assert_eq!(csv.lines().count(), 2);
    assert!(csv.lines().nth(1).unwrap().starts_with("DS-0001,true,2024-03-01,"));
}

#[tokio::test]
async fn test_public_warranty_validation() {
    let harness = ApiHarness::new().await;

    let mut bad_pincode = warranty_body(&harness);
    bad_pincode["pincode"] = json!("12ab");
    let (status, _) = harness
        .post_json("/public/v1/warranties", None, bad_pincode)
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let mut wrong_brand = warranty_body(&harness);
    wrong_brand["brand_id"] = json!(uuid::Uuid::new_v4());
    let (status, body) = harness
        .post_json("/public/v1/warranties", None, wrong_brand)
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "validation_error");
}
