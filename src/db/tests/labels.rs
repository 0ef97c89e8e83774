//! Shared tests for LabelRepo implementations

use chrono::{DateTime, TimeZone, Utc};
use uuid::Uuid;

use super::harness::{LabelFixture, TestStore};
use crate::{
    db::{
        error::DbError,
        repos::{LabelFilter, LabelQuery, ManufacturerSet},
    },
    models::Visibility,
};

fn at(y: i32, m: u32, d: u32, h: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap()
}

fn all_labels() -> LabelQuery {
    LabelQuery::new(ManufacturerSet::All, LabelFilter::default())
}

pub async fn test_create_and_toggle_status(store: &TestStore) {
    let fx = LabelFixture::seed(store, "Acme").await;
    let labels = store.db.labels();

    let label = labels
        .create(fx.label("Red", "B-1", at(2024, 3, 1, 9)))
        .await
        .expect("Failed to create label");
    assert_eq!(label.status, Visibility::Show);
    assert_eq!(label.created_at, at(2024, 3, 1, 9));

    let hidden = labels
        .set_status(label.id, Visibility::Hide)
        .await
        .expect("Failed to hide label");
    assert_eq!(hidden.status, Visibility::Hide);

    let fetched = labels.get_by_id(label.id).await.unwrap().unwrap();
    assert_eq!(fetched.status, Visibility::Hide);
}

pub async fn test_set_status_not_found(store: &TestStore) {
    let result = store
        .db
        .labels()
        .set_status(Uuid::new_v4(), Visibility::Hide)
        .await;
    assert!(matches!(result, Err(DbError::NotFound)));
}

pub async fn test_create_rejects_unknown_references(store: &TestStore) {
    let fx = LabelFixture::seed(store, "Acme").await;
    let mut input = fx.label("Red", "B-1", at(2024, 3, 1, 9));
    input.product_id = Uuid::new_v4();

    let result = store.db.labels().create(input).await;
    assert!(matches!(result, Err(DbError::Validation(_))));
}

pub async fn test_report_rows_window_and_names(store: &TestStore) {
    let fx = LabelFixture::seed(store, "Acme").await;
    let labels = store.db.labels();

    labels
        .create(fx.label("Red", "B-1", at(2024, 1, 31, 23)))
        .await
        .unwrap();
    labels
        .create(fx.label("Red", "B-1", at(2024, 2, 1, 0)))
        .await
        .unwrap();
    labels
        .create(fx.label("Blue", "B-2", at(2024, 2, 29, 12)))
        .await
        .unwrap();
    labels
        .create(fx.label("Blue", "B-2", at(2024, 3, 1, 0)))
        .await
        .unwrap();

    let query = all_labels().between(at(2024, 2, 1, 0), at(2024, 3, 1, 0));
    let rows = labels.list_report_rows(&query).await.unwrap();

    // Inclusive start, exclusive end
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].created_at, at(2024, 2, 1, 0));
    assert_eq!(rows[1].created_at, at(2024, 2, 29, 12));
    assert!(rows.iter().all(|r| r.user_name == "Acme Operator"));
}

pub async fn test_hidden_labels_excluded(store: &TestStore) {
    let fx = LabelFixture::seed(store, "Acme").await;
    let labels = store.db.labels();

    let kept = labels
        .create(fx.label("Red", "B-1", at(2024, 2, 3, 8)))
        .await
        .unwrap();
    let hidden = labels
        .create(fx.label("Blue", "B-9", at(2024, 2, 4, 8)))
        .await
        .unwrap();
    labels.set_status(hidden.id, Visibility::Hide).await.unwrap();

    let times = labels.list_created_at(&all_labels()).await.unwrap();
    assert_eq!(times, vec![kept.created_at]);

    let variants = labels.distinct_variants(&all_labels()).await.unwrap();
    assert_eq!(variants, vec!["Red"]);

    // Totals count every label regardless of status
    assert_eq!(labels.count(&ManufacturerSet::All).await.unwrap(), 2);
}

pub async fn test_manufacturer_set_restricts(store: &TestStore) {
    let acme = LabelFixture::seed(store, "Acme").await;
    let globex = LabelFixture::seed(store, "Globex").await;
    let labels = store.db.labels();

    labels
        .create(acme.label("Red", "A-1", at(2024, 2, 1, 8)))
        .await
        .unwrap();
    labels
        .create(globex.label("Green", "G-1", at(2024, 2, 1, 9)))
        .await
        .unwrap();
    labels
        .create(globex.label("Green", "G-2", at(2024, 2, 1, 10)))
        .await
        .unwrap();

    let only_globex = LabelQuery::new(
        ManufacturerSet::Only(vec![globex.manufacturer_id]),
        LabelFilter::default(),
    );
    let rows = labels.list_report_rows(&only_globex).await.unwrap();
    assert_eq!(rows.len(), 2);
    assert!(rows.iter().all(|r| r.user_name == "Globex Operator"));

    let nobody = LabelQuery::new(ManufacturerSet::Only(vec![]), LabelFilter::default());
    assert!(labels.list_report_rows(&nobody).await.unwrap().is_empty());
    assert!(labels.distinct_variants(&nobody).await.unwrap().is_empty());

    assert_eq!(
        labels
            .count(&ManufacturerSet::Only(vec![acme.manufacturer_id]))
            .await
            .unwrap(),
        1
    );
    assert_eq!(labels.count(&ManufacturerSet::Only(vec![])).await.unwrap(), 0);
}

pub async fn test_filters_are_conjunctive(store: &TestStore) {
    let fx = LabelFixture::seed(store, "Acme").await;
    let labels = store.db.labels();

    labels
        .create(fx.label("Red", "B-1", at(2024, 2, 1, 8)))
        .await
        .unwrap();
    labels
        .create(fx.label("Blue", "B-1", at(2024, 2, 2, 8)))
        .await
        .unwrap();
    labels
        .create(fx.label("Blue", "B-2", at(2024, 2, 3, 8)))
        .await
        .unwrap();

    let blue = LabelFilter {
        product_ids: vec![fx.product_id],
        variants: vec!["Blue".into()],
        ..Default::default()
    };
    let query = LabelQuery::new(ManufacturerSet::All, blue);
    assert_eq!(labels.list_created_at(&query).await.unwrap().len(), 2);
    assert_eq!(
        labels.distinct_batch_numbers(&query).await.unwrap(),
        vec!["B-1", "B-2"]
    );

    let other_user = LabelFilter {
        user_ids: vec![Uuid::new_v4()],
        ..Default::default()
    };
    let query = LabelQuery::new(ManufacturerSet::All, other_user);
    assert!(labels.list_created_at(&query).await.unwrap().is_empty());
}

pub async fn test_distinct_values_sorted(store: &TestStore) {
    let fx = LabelFixture::seed(store, "Acme").await;
    let labels = store.db.labels();

    for (variant, batch) in [("Red", "B-3"), ("Blue", "B-1"), ("Red", "B-2"), ("Amber", "B-1")] {
        labels
            .create(fx.label(variant, batch, at(2024, 2, 1, 8)))
            .await
            .unwrap();
    }

    assert_eq!(
        labels.distinct_variants(&all_labels()).await.unwrap(),
        vec!["Amber", "Blue", "Red"]
    );
    assert_eq!(
        labels.distinct_batch_numbers(&all_labels()).await.unwrap(),
        vec!["B-1", "B-2", "B-3"]
    );
}

pub async fn test_deleted_account_reports_unknown(store: &TestStore) {
    let fx = LabelFixture::seed(store, "Acme").await;
    store
        .db
        .labels()
        .create(fx.label("Red", "B-1", at(2024, 2, 1, 8)))
        .await
        .unwrap();

    sqlx::query("PRAGMA foreign_keys = OFF")
        .execute(&store.pool)
        .await
        .unwrap();
    sqlx::query("DELETE FROM accounts WHERE id = ?")
        .bind(fx.user_id.to_string())
        .execute(&store.pool)
        .await
        .unwrap();

    let rows = store
        .db
        .labels()
        .list_report_rows(&all_labels())
        .await
        .unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].user_name, "Unknown");
}

// ============================================================================
// SQLite Tests - Fast, in-memory
// ============================================================================

#[cfg(all(test, feature = "database-sqlite"))]
mod sqlite_tests {
    use super::TestStore;

    macro_rules! sqlite_test {
        ($name:ident) => {
            #[tokio::test]
            async fn $name() {
                let store = TestStore::new().await;
                super::$name(&store).await;
            }
        };
    }

    sqlite_test!(test_create_and_toggle_status);
    sqlite_test!(test_set_status_not_found);
    sqlite_test!(test_create_rejects_unknown_references);
    sqlite_test!(test_report_rows_window_and_names);
    sqlite_test!(test_hidden_labels_excluded);
    sqlite_test!(test_manufacturer_set_restricts);
    sqlite_test!(test_filters_are_conjunctive);
    sqlite_test!(test_distinct_values_sorted);
    sqlite_test!(test_deleted_account_reports_unknown);
}
