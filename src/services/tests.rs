//! Service tests against a migrated in-memory SQLite database.

use std::sync::Arc;

use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};
use uuid::Uuid;

use super::{LabelReportError, Services};
use crate::{
    config::ReportsConfig,
    db::{
        DbError, DbPool, LabelFilter, ManufacturerSet, ProductLookup,
        tests::harness::{LabelFixture, TestStore},
    },
    models::{
        AccountRole, CreateAccount, CreateLabel, CreateProduct, CreateWarranty, IssueLabel,
        Visibility,
    },
    reports::{ReportError, ReportScope, ReportTotals, UserCount},
};

fn at(y: i32, m: u32, d: u32, h: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap()
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn services(store: &TestStore, reports: ReportsConfig) -> Services {
    Services::new(Arc::new(DbPool::from_sqlite(store.pool.clone())), reports)
}

fn platform() -> ReportScope {
    ReportScope::Platform {
        company_ids: vec![],
        manufacturer_ids: vec![],
    }
}

async fn issue_as(store: &TestStore, fx: &LabelFixture, user_id: Uuid, created_at: DateTime<Utc>) {
    store
        .db
        .labels()
        .create(CreateLabel {
            user_id,
            ..fx.label("Red", "B-1", created_at)
        })
        .await
        .expect("Failed to create label");
}

// ============================================================================
// Label reports
// ============================================================================

#[tokio::test]
async fn test_statistics_month_and_user_buckets() {
    let store = TestStore::new().await;
    let fx = LabelFixture::seed(&store, "Acme").await;
    let second = store
        .create_account("Acme Night", AccountRole::ManufacturerAdmin, Some(fx.manufacturer_id))
        .await;
    for day in 1..=6 {
        issue_as(&store, &fx, fx.user_id, at(2024, 2, day, 10)).await;
    }
    for day in 10..=13 {
        issue_as(&store, &fx, second, at(2024, 2, day, 10)).await;
    }
    // Outside the window
    issue_as(&store, &fx, fx.user_id, at(2023, 12, 31, 23)).await;

    let services = services(
        &store,
        ReportsConfig {
            platform_lookback_months: 2,
            ..Default::default()
        },
    );
    let report = services
        .label_reports
        .statistics(&platform(), LabelFilter::default(), date(2024, 3, 31))
        .await
        .expect("Failed to build report");

    let months: Vec<_> = report.month_counts.iter().collect();
    assert_eq!(months, vec![("Jan", 0), ("Feb", 10), ("Mar", 0)]);
    assert_eq!(report.total_labels, 10);
    assert_eq!(
        report.user_counts,
        vec![
            UserCount {
                name: "Acme Operator".into(),
                count: 6,
                percent: 60
            },
            UserCount {
                name: "Acme Night".into(),
                count: 4,
                percent: 40
            },
        ]
    );
    assert_eq!(
        report.totals,
        ReportTotals {
            brands: 1,
            products: 1,
            admins: 2,
            labels: 11,
        }
    );
}

#[tokio::test]
async fn test_empty_filters_match_full_filters() {
    let store = TestStore::new().await;
    let fx = LabelFixture::seed(&store, "Acme").await;
    for day in 1..=3 {
        issue_as(&store, &fx, fx.user_id, at(2024, 3, day, 9)).await;
    }
    let services = services(&store, ReportsConfig::default());

    let unfiltered = services
        .label_reports
        .statistics(&platform(), LabelFilter::default(), date(2024, 3, 31))
        .await
        .unwrap();
    let everything = LabelFilter {
        brand_ids: vec![fx.brand_id],
        product_ids: vec![fx.product_id],
        variants: vec!["Red".into(), "Blue".into()],
        user_ids: vec![fx.user_id],
    };
    let filtered = services
        .label_reports
        .statistics(&platform(), everything, date(2024, 3, 31))
        .await
        .unwrap();

    assert_eq!(unfiltered, filtered);
    assert_eq!(filtered.total_labels, 3);
}

#[tokio::test]
async fn test_company_scope_narrows_to_own_manufacturers() {
    let store = TestStore::new().await;
    let acme = LabelFixture::seed(&store, "Acme").await;
    let globex = LabelFixture::seed(&store, "Globex").await;
    issue_as(&store, &acme, acme.user_id, at(2024, 3, 2, 9)).await;
    issue_as(&store, &globex, globex.user_id, at(2024, 3, 2, 9)).await;
    let services = services(&store, ReportsConfig::default());

    let own = ReportScope::Company {
        company_id: acme.company_id,
        manufacturer_ids: vec![],
    };
    let report = services
        .label_reports
        .statistics(&own, LabelFilter::default(), date(2024, 3, 10))
        .await
        .unwrap();
    assert_eq!(report.total_labels, 1);
    assert_eq!(report.user_counts[0].name, "Acme Operator");
    assert_eq!(report.totals.labels, 1);
    // Company lookback defaults to two months before the reference month
    assert_eq!(report.month_counts.iter().count(), 3);

    // Asking for another company's manufacturer leaves nothing visible
    let foreign = ReportScope::Company {
        company_id: acme.company_id,
        manufacturer_ids: vec![globex.manufacturer_id],
    };
    let report = services
        .label_reports
        .statistics(&foreign, LabelFilter::default(), date(2024, 3, 10))
        .await
        .unwrap();
    assert_eq!(report.total_labels, 0);
    assert!(report.user_counts.is_empty());
    assert_eq!(report.month_counts.total(), 0);
    assert_eq!(report.month_counts.get("Mar"), Some(0));
    assert_eq!(report.totals.labels, 0);
    assert_eq!(report.totals.brands, 1);
}

#[tokio::test]
async fn test_platform_scope_resolution() {
    let store = TestStore::new().await;
    let acme = LabelFixture::seed(&store, "Acme").await;
    let globex = LabelFixture::seed(&store, "Globex").await;
    let services = services(&store, ReportsConfig::default());
    let reports = &services.label_reports;

    let by_company = ReportScope::Platform {
        company_ids: vec![globex.company_id],
        manufacturer_ids: vec![],
    };
    assert_eq!(
        reports.visible_manufacturers(&by_company).await.unwrap(),
        ManufacturerSet::Only(vec![globex.manufacturer_id])
    );

    // Explicit manufacturers win over companies
    let explicit = ReportScope::Platform {
        company_ids: vec![globex.company_id],
        manufacturer_ids: vec![acme.manufacturer_id],
    };
    assert_eq!(
        reports.visible_manufacturers(&explicit).await.unwrap(),
        ManufacturerSet::Only(vec![acme.manufacturer_id])
    );

    assert_eq!(
        reports.visible_manufacturers(&platform()).await.unwrap(),
        ManufacturerSet::All
    );
}

#[tokio::test]
async fn test_manufacturer_scope_counts_only_own_labels() {
    let store = TestStore::new().await;
    let fx = LabelFixture::seed(&store, "Acme").await;
    let colleague = store
        .create_account("Acme Night", AccountRole::ManufacturerAdmin, Some(fx.manufacturer_id))
        .await;
    issue_as(&store, &fx, fx.user_id, at(2024, 3, 1, 9)).await;
    issue_as(&store, &fx, fx.user_id, at(2024, 3, 2, 9)).await;
    issue_as(&store, &fx, colleague, at(2024, 3, 3, 9)).await;
    let services = services(&store, ReportsConfig::default());

    let scope = ReportScope::Manufacturer {
        manufacturer_id: fx.manufacturer_id,
        account_id: fx.user_id,
    };
    let requested = LabelFilter {
        user_ids: vec![colleague],
        ..Default::default()
    };
    let report = services
        .label_reports
        .statistics(&scope, requested, date(2024, 3, 31))
        .await
        .unwrap();

    assert_eq!(report.total_labels, 2);
    assert_eq!(report.user_counts.len(), 1);
    assert_eq!(report.user_counts[0].percent, 100);
    assert_eq!(
        report.totals,
        ReportTotals {
            brands: 1,
            products: 1,
            admins: 2,
            labels: 3,
        }
    );
}

#[tokio::test]
async fn test_busy_days_drops_quiet_days() {
    let store = TestStore::new().await;
    let fx = LabelFixture::seed(&store, "Acme").await;
    let busy = (Utc::now() - Duration::days(3)).date_naive();
    let quiet = (Utc::now() - Duration::days(5)).date_naive();
    let on = |day: NaiveDate, hour| Utc.from_utc_datetime(&day.and_hms_opt(hour, 0, 0).unwrap());
    for hour in 1..=3 {
        issue_as(&store, &fx, fx.user_id, on(busy, hour)).await;
    }
    issue_as(&store, &fx, fx.user_id, on(quiet, 8)).await;
    // Older than the export window
    issue_as(&store, &fx, fx.user_id, Utc::now() - Duration::days(40)).await;
    issue_as(&store, &fx, fx.user_id, Utc::now() - Duration::days(40)).await;
    let services = services(&store, ReportsConfig::default());

    let days = services
        .label_reports
        .busy_days(&platform(), LabelFilter::default(), Some(30))
        .await
        .unwrap();
    assert_eq!(days.len(), 1);
    assert_eq!(days[0].date, busy.format("%Y-%m-%d").to_string());
    assert_eq!(days[0].count_of_label, 3);
}

#[tokio::test]
async fn test_daily_counts_over_trailing_months() {
    let store = TestStore::new().await;
    let fx = LabelFixture::seed(&store, "Acme").await;
    issue_as(&store, &fx, fx.user_id, at(2024, 1, 30, 23)).await;
    issue_as(&store, &fx, fx.user_id, at(2024, 1, 31, 0)).await;
    issue_as(&store, &fx, fx.user_id, at(2024, 5, 31, 22)).await;
    issue_as(&store, &fx, fx.user_id, at(2024, 5, 31, 23)).await;
    issue_as(&store, &fx, fx.user_id, at(2024, 6, 1, 0)).await;
    let services = services(&store, ReportsConfig::default());

    let counts = services
        .label_reports
        .daily_counts(fx.manufacturer_id, LabelFilter::default(), date(2024, 5, 31))
        .await
        .unwrap();
    let pairs: Vec<_> = counts
        .iter()
        .map(|c| (c.date.as_str(), c.count_of_label))
        .collect();
    assert_eq!(pairs, vec![("2024-01-31", 1), ("2024-05-31", 2)]);
}

#[tokio::test]
async fn test_daily_counts_include_colleagues_labels() {
    let store = TestStore::new().await;
    let fx = LabelFixture::seed(&store, "Acme").await;
    let colleague = store
        .create_account("Acme Night", AccountRole::ManufacturerAdmin, Some(fx.manufacturer_id))
        .await;
    issue_as(&store, &fx, fx.user_id, at(2024, 5, 1, 9)).await;
    issue_as(&store, &fx, colleague, at(2024, 5, 1, 17)).await;
    let services = services(&store, ReportsConfig::default());

    let counts = services
        .label_reports
        .daily_counts(fx.manufacturer_id, LabelFilter::default(), date(2024, 5, 31))
        .await
        .unwrap();
    assert_eq!(counts.len(), 1);
    assert_eq!(counts[0].date, "2024-05-01");
    assert_eq!(counts[0].count_of_label, 2);
}

#[tokio::test]
async fn test_busy_days_rejects_unrepresentable_window() {
    let store = TestStore::new().await;
    let services = services(&store, ReportsConfig::default());

    let result = services
        .label_reports
        .busy_days(&platform(), LabelFilter::default(), Some(u32::MAX))
        .await;
    assert!(matches!(
        result,
        Err(LabelReportError::Report(ReportError::DateOutOfRange))
    ));
}

// ============================================================================
// Accounts and catalog
// ============================================================================

#[tokio::test]
async fn test_account_association_rules() {
    let store = TestStore::new().await;
    let company_id = store.create_company("Acme").await;
    let services = services(&store, ReportsConfig::default());

    let input = |role, associated_id| CreateAccount {
        name: "New Admin".into(),
        email: "new.admin@example.com".into(),
        role,
        associated_id,
    };

    for bad in [
        input(AccountRole::SuperAdmin, Some(company_id)),
        input(AccountRole::CompanyAdmin, None),
        input(AccountRole::CompanyAdmin, Some(Uuid::new_v4())),
        input(AccountRole::ManufacturerAdmin, Some(company_id)),
    ] {
        let result = services.accounts.create(bad).await;
        assert!(matches!(result, Err(DbError::Validation(_))));
    }

    let account = services
        .accounts
        .create(input(AccountRole::CompanyAdmin, Some(company_id)))
        .await
        .expect("Failed to create company admin");
    assert_eq!(account.associated_id, Some(company_id));
}

#[tokio::test]
async fn test_product_inherits_brand_company() {
    let store = TestStore::new().await;
    let company_id = store.create_company("Acme").await;
    let brand_id = store.create_brand(company_id, "Bolt").await;
    let services = services(&store, ReportsConfig::default());

    let product = services
        .catalog
        .create_product(CreateProduct {
            brand_id,
            name: "Drill".into(),
            feature: Some("Cordless".into()),
            variants: vec!["18V".into(), "24V".into()],
        })
        .await
        .unwrap();
    assert_eq!(product.company_id, company_id);

    store.create_product(company_id, brand_id, "Saw").await;
    let variants = services
        .catalog
        .product_variants(&ProductLookup {
            brand_ids: vec![brand_id],
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(variants, vec!["18V", "24V", "Red", "Blue"]);

    let orphan = services
        .catalog
        .create_product(CreateProduct {
            brand_id: Uuid::new_v4(),
            name: "Orphan".into(),
            feature: None,
            variants: vec![],
        })
        .await;
    assert!(matches!(orphan, Err(DbError::Validation(_))));
}

// ============================================================================
// Labels
// ============================================================================

#[tokio::test]
async fn test_issue_label_checks_product() {
    let store = TestStore::new().await;
    let fx = LabelFixture::seed(&store, "Acme").await;
    let other_brand = store.create_brand(fx.company_id, "Other").await;
    let services = services(&store, ReportsConfig::default());

    let issue = |brand_id, variant: &str| IssueLabel {
        brand_id,
        product_id: fx.product_id,
        variant: variant.to_string(),
        batch_number: "B-77".into(),
    };

    let wrong_brand = services
        .labels
        .issue(fx.manufacturer_id, fx.user_id, issue(other_brand, "Red"))
        .await;
    assert!(matches!(wrong_brand, Err(DbError::Validation(_))));

    let wrong_variant = services
        .labels
        .issue(fx.manufacturer_id, fx.user_id, issue(fx.brand_id, "Green"))
        .await;
    assert!(matches!(wrong_variant, Err(DbError::Validation(_))));

    let globex = LabelFixture::seed(&store, "Globex").await;
    let foreign = services
        .labels
        .issue(globex.manufacturer_id, globex.user_id, issue(fx.brand_id, "Red"))
        .await;
    assert!(matches!(foreign, Err(DbError::Validation(_))));

    let label = services
        .labels
        .issue(fx.manufacturer_id, fx.user_id, issue(fx.brand_id, "Blue"))
        .await
        .expect("Failed to issue label");
    assert_eq!(label.manufacturer_id, fx.manufacturer_id);
    assert_eq!(label.user_id, fx.user_id);
    assert_eq!(label.status, Visibility::Show);
}

#[tokio::test]
async fn test_toggle_status_respects_visibility() {
    let store = TestStore::new().await;
    let fx = LabelFixture::seed(&store, "Acme").await;
    let label = store
        .db
        .labels()
        .create(fx.label("Red", "B-1", at(2024, 3, 1, 9)))
        .await
        .unwrap();
    let services = services(&store, ReportsConfig::default());

    let elsewhere = ManufacturerSet::Only(vec![Uuid::new_v4()]);
    assert!(matches!(
        services.labels.toggle_status(label.id, &elsewhere).await,
        Err(DbError::NotFound)
    ));

    let own = ManufacturerSet::Only(vec![fx.manufacturer_id]);
    let hidden = services.labels.toggle_status(label.id, &own).await.unwrap();
    assert_eq!(hidden.status, Visibility::Hide);
    let shown = services
        .labels
        .toggle_status(label.id, &ManufacturerSet::All)
        .await
        .unwrap();
    assert_eq!(shown.status, Visibility::Show);
}

// ============================================================================
// Submissions
// ============================================================================

#[tokio::test]
async fn test_submission_product_must_match_brand() {
    let store = TestStore::new().await;
    let acme = LabelFixture::seed(&store, "Acme").await;
    let globex = LabelFixture::seed(&store, "Globex").await;
    let services = services(&store, ReportsConfig::default());

    let warranty = |brand_id| CreateWarranty {
        ds1: "DS-1".into(),
        company_id: acme.company_id,
        brand_id,
        product_id: acme.product_id,
        warranty_activated: true,
        purchase_date: date(2024, 3, 1),
        store_name: "Corner Store".into(),
        store_pin_code: "560001".into(),
        warranty_duration: "12 months".into(),
        invoice_number: "INV-9".into(),
        invoice_image: None,
        pincode: "560002".into(),
        address1: "1 Main Road".into(),
        address2: None,
    };

    let mismatched = services
        .submissions
        .create_warranty(warranty(globex.brand_id))
        .await;
    assert!(matches!(mismatched, Err(DbError::Validation(_))));

    let created = services
        .submissions
        .create_warranty(warranty(acme.brand_id))
        .await
        .expect("Failed to register warranty");
    assert_eq!(created.ds1, "DS-1");
}
