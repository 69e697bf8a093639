// ==========================================
// Import API Integration Tests
// ==========================================
// Outer-surface behavior: upload validation, rate limiting and
// import history listing.
// ==========================================

mod test_helpers;

use rental_ledger::api::{ApiError, ErrorStatus, FixedWindowRateLimiter, ImportApi};
use rental_ledger::config::ImportLimits;
use rental_ledger::importer::{ImportRequest, ReservationImporterImpl};
use rental_ledger::logging;
use std::sync::Arc;
use std::time::Duration;
use test_helpers::*;

fn create_test_api(
    conn: &std::sync::Arc<std::sync::Mutex<rusqlite::Connection>>,
    limiter: FixedWindowRateLimiter,
    limits: ImportLimits,
) -> ImportApi {
    let store = create_test_store(conn);
    let importer = Arc::new(ReservationImporterImpl::new(store.clone(), limits));
    ImportApi::new(importer, store, Arc::new(limiter), limits)
}

fn sample_csv() -> String {
    csv_of(&[
        AIRBNB_HEADERS,
        &airbnb_row(
            "HM001",
            "2025-03-01",
            "2025-03-05",
            "4",
            "Ana García",
            "",
            "Casa Azul",
            "€500,00",
        ),
    ])
}

#[tokio::test]
async fn test_upload_happy_path() {
    logging::init_test();
    let (_db_file, conn) = create_test_db();
    seed_property(&conn, "p1", "u1", "Casa Azul", 20.0, 50.0);
    let api = create_test_api(&conn, FixedWindowRateLimiter::per_hour(), ImportLimits::default());

    let response = api
        .import_csv(ImportRequest::new("u1", "export.csv", sample_csv()))
        .await
        .expect("upload should succeed");

    assert!(response.success);
    assert_eq!(response.summary.imported, 1);
    assert!(response.message.contains("imported 1"));
}

#[tokio::test]
async fn test_upload_rejects_non_csv_extension() {
    logging::init_test();
    let (_db_file, conn) = create_test_db();
    let api = create_test_api(&conn, FixedWindowRateLimiter::per_hour(), ImportLimits::default());

    let err = api
        .import_csv(ImportRequest::new("u1", "export.xlsx", sample_csv()))
        .await
        .expect_err("xlsx must be rejected");
    assert_eq!(err.status, ErrorStatus::BadRequest);
}

#[tokio::test]
async fn test_upload_rejects_oversized_file() {
    logging::init_test();
    let (_db_file, conn) = create_test_db();
    let api = create_test_api(
        &conn,
        FixedWindowRateLimiter::per_hour(),
        ImportLimits {
            max_file_bytes: 16,
            max_rows: 5000,
        },
    );

    let err = api
        .import_csv(ImportRequest::new("u1", "export.csv", sample_csv()))
        .await
        .expect_err("oversized file must be rejected");
    assert_eq!(err.status, ErrorStatus::BadRequest);
}

#[tokio::test]
async fn test_upload_rate_limited_with_retry_after() {
    logging::init_test();
    let (_db_file, conn) = create_test_db();
    seed_property(&conn, "p1", "u1", "Casa Azul", 20.0, 50.0);
    let api = create_test_api(
        &conn,
        FixedWindowRateLimiter::new(1, Duration::from_secs(3600)),
        ImportLimits::default(),
    );

    api.import_csv(ImportRequest::new("u1", "export.csv", sample_csv()))
        .await
        .expect("first upload allowed");

    let err: ApiError = api
        .import_csv(ImportRequest::new("u1", "export.csv", sample_csv()))
        .await
        .expect_err("second upload limited");
    assert_eq!(err.status, ErrorStatus::RateLimited);
    let headers = err.headers.expect("Retry-After expected");
    assert!(headers.contains_key("Retry-After"));

    // Other users are unaffected.
    seed_property(&conn, "p2", "u2", "Casa Azul", 20.0, 50.0);
    api.import_csv(ImportRequest::new("u2", "export.csv", sample_csv()))
        .await
        .expect("different user allowed");
}

#[tokio::test]
async fn test_import_history_newest_first() {
    logging::init_test();
    let (_db_file, conn) = create_test_db();
    seed_property(&conn, "p1", "u1", "Casa Azul", 20.0, 50.0);
    let api = create_test_api(&conn, FixedWindowRateLimiter::per_hour(), ImportLimits::default());

    api.import_csv(ImportRequest::new("u1", "first.csv", sample_csv()))
        .await
        .expect("first upload");
    tokio::time::sleep(Duration::from_millis(5)).await;

    let second = csv_of(&[
        AIRBNB_HEADERS,
        &airbnb_row(
            "HM002",
            "2025-05-01",
            "2025-05-03",
            "2",
            "Eva Ruiz",
            "",
            "Casa Azul",
            "€200,00",
        ),
    ]);
    api.import_csv(ImportRequest::new("u1", "second.csv", second))
        .await
        .expect("second upload");

    let history = api.import_history("u1", 10).await.expect("history");
    assert_eq!(history.len(), 2);
    assert_eq!(history[0].file_name, "second.csv");
    assert_eq!(history[1].file_name, "first.csv");

    // Scoped to the requesting user.
    let other = api.import_history("u2", 10).await.expect("history");
    assert!(other.is_empty());
}
