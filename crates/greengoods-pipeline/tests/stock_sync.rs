//! End-to-end synchronizer tests: wiremock stands in for BigBuy, and
//! `#[sqlx::test]` provides an isolated schema per test.

use std::time::Duration;

use chrono::Utc;
use greengoods_bigbuy::BigBuyClient;
use greengoods_core::ProductRecord;
use greengoods_pipeline::{sync_stock, RunType, SyncOptions};
use rust_decimal::Decimal;
use sqlx::PgPool;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_client(base_url: &str) -> BigBuyClient {
    BigBuyClient::with_base_url("test-key", 20, base_url)
        .expect("client construction should not fail")
}

fn test_options(run_type: RunType) -> SyncOptions {
    SyncOptions {
        product_ids: None,
        chunk_size: 10,
        // No pacing in tests; the delay is exercised implicitly by being zero.
        chunk_delay: Duration::ZERO,
        batch_max: 100,
        run_type,
        performed_by: "system".to_string(),
    }
}

async fn seed_product(pool: &PgPool, external_id: &str, stock: i32) {
    let record = ProductRecord {
        id: ProductRecord::derive_id(external_id),
        name: format!("Product {external_id}"),
        description: String::new(),
        price: Decimal::new(500, 2),
        original_price: None,
        category: "Kitchen".to_string(),
        subcategory: None,
        brand: None,
        images: vec![],
        stock,
        active: true,
        weight: None,
        external_id: Some(external_id.to_string()),
        sku: None,
        last_updated: Utc::now(),
    };
    greengoods_db::upsert_product(pool, &record)
        .await
        .expect("seed product");
}

fn stock_body(quantity: i64) -> serde_json::Value {
    serde_json::json!({ "quantity": quantity })
}

#[sqlx::test(migrations = "../../migrations")]
async fn no_deltas_means_no_writes_but_one_log(pool: PgPool) {
    let server = MockServer::start().await;

    // 25 tracked products, all already at the upstream quantity.
    for i in 0..25 {
        seed_product(&pool, &format!("p{i:02}"), 7).await;
        Mock::given(method("GET"))
            .and(path(format!("/catalog/products/p{i:02}/stock")))
            .respond_with(ResponseTemplate::new(200).set_body_json(stock_body(7)))
            .expect(1)
            .mount(&server)
            .await;
    }

    let client = test_client(&server.uri());
    let outcome = sync_stock(&pool, &client, &test_options(RunType::BulkSync))
        .await
        .expect("sync should succeed");

    // 25 candidates at chunk size 10 → 3 chunks; every product fetched once.
    assert_eq!(outcome.processed, 25);
    assert_eq!(outcome.updated, 0);
    assert_eq!(outcome.unchanged, 25);
    assert_eq!(outcome.failed, 0);

    // No product row was touched.
    let row = greengoods_db::get_product(&pool, "bigbuy-p00")
        .await
        .expect("get");
    assert!(row.last_stock_sync.is_none(), "no-op write occurred");

    // Exactly one audit row.
    let logs = greengoods_db::list_sync_logs(&pool, 10).await.expect("logs");
    assert_eq!(logs.len(), 1);
    assert_eq!(logs[0].run_type, "bulk_sync");
    assert_eq!(logs[0].products_processed, 25);
    assert_eq!(logs[0].synced_products, 25);
    assert_eq!(logs[0].successful_updates, 0);
    assert_eq!(logs[0].failed_updates, 0);
    assert_eq!(logs[0].performed_by, "system");
}

#[sqlx::test(migrations = "../../migrations")]
async fn updates_written_iff_stock_differs(pool: PgPool) {
    let server = MockServer::start().await;

    seed_product(&pool, "changed", 5).await;
    seed_product(&pool, "same", 5).await;

    Mock::given(method("GET"))
        .and(path("/catalog/products/changed/stock"))
        .respond_with(ResponseTemplate::new(200).set_body_json(stock_body(0)))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/catalog/products/same/stock"))
        .respond_with(ResponseTemplate::new(200).set_body_json(stock_body(5)))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let outcome = sync_stock(&pool, &client, &test_options(RunType::BulkSync))
        .await
        .expect("sync should succeed");

    assert_eq!(outcome.processed, 2);
    assert_eq!(outcome.updated, 1);
    assert_eq!(outcome.unchanged, 1);

    let changed = greengoods_db::get_product(&pool, "bigbuy-changed")
        .await
        .expect("get");
    assert_eq!(changed.stock, 0);
    assert!(!changed.in_stock);
    assert!(changed.last_stock_sync.is_some());

    let same = greengoods_db::get_product(&pool, "bigbuy-same")
        .await
        .expect("get");
    assert_eq!(same.stock, 5);
    assert!(same.last_stock_sync.is_none(), "unchanged product was written");
}

#[sqlx::test(migrations = "../../migrations")]
async fn per_item_failure_is_counted_not_fatal(pool: PgPool) {
    let server = MockServer::start().await;

    seed_product(&pool, "ok", 1).await;
    seed_product(&pool, "broken", 1).await;

    Mock::given(method("GET"))
        .and(path("/catalog/products/ok/stock"))
        .respond_with(ResponseTemplate::new(200).set_body_json(stock_body(9)))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/catalog/products/broken/stock"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let outcome = sync_stock(&pool, &client, &test_options(RunType::ScheduledUpdate))
        .await
        .expect("run must survive per-item failures");

    assert_eq!(outcome.processed, 2);
    assert_eq!(outcome.updated, 1);
    assert_eq!(outcome.failed, 1);

    let ok = greengoods_db::get_product(&pool, "bigbuy-ok")
        .await
        .expect("get");
    assert_eq!(ok.stock, 9);

    let logs = greengoods_db::list_sync_logs(&pool, 10).await.expect("logs");
    assert_eq!(logs[0].run_type, "scheduled_update");
    assert_eq!(logs[0].synced_products, 1);
    assert_eq!(logs[0].failed_updates, 1);
}

#[sqlx::test(migrations = "../../migrations")]
async fn explicit_id_list_restricts_candidates(pool: PgPool) {
    let server = MockServer::start().await;

    seed_product(&pool, "wanted", 2).await;
    seed_product(&pool, "ignored", 2).await;

    Mock::given(method("GET"))
        .and(path("/catalog/products/wanted/stock"))
        .respond_with(ResponseTemplate::new(200).set_body_json(stock_body(8)))
        .expect(1)
        .mount(&server)
        .await;
    // No mock for "ignored": a request to it would 404 and count as failed.

    let mut options = test_options(RunType::BatchUpdate);
    options.product_ids = Some(vec!["bigbuy-wanted".to_string()]);
    options.performed_by = "admin-7".to_string();

    let client = test_client(&server.uri());
    let outcome = sync_stock(&pool, &client, &options)
        .await
        .expect("sync should succeed");

    assert_eq!(outcome.processed, 1);
    assert_eq!(outcome.updated, 1);
    assert_eq!(outcome.failed, 0);

    let logs = greengoods_db::list_sync_logs(&pool, 10).await.expect("logs");
    assert_eq!(logs[0].run_type, "batch_update");
    assert_eq!(logs[0].performed_by, "admin-7");
}

#[sqlx::test(migrations = "../../migrations")]
async fn negative_upstream_quantity_clamped_to_zero(pool: PgPool) {
    let server = MockServer::start().await;

    seed_product(&pool, "neg", 4).await;
    Mock::given(method("GET"))
        .and(path("/catalog/products/neg/stock"))
        .respond_with(ResponseTemplate::new(200).set_body_json(stock_body(-12)))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    sync_stock(&pool, &client, &test_options(RunType::BulkSync))
        .await
        .expect("sync should succeed");

    let row = greengoods_db::get_product(&pool, "bigbuy-neg")
        .await
        .expect("get");
    assert_eq!(row.stock, 0);
}

#[test]
fn missing_api_key_fails_before_any_io() {
    let config = greengoods_core::AppConfig {
        database_url: "postgres://unused".to_string(),
        env: greengoods_core::Environment::Test,
        bind_addr: "127.0.0.1:0".parse().expect("addr"),
        log_level: "info".to_string(),
        bigbuy_api_key: None,
        bigbuy_request_timeout_secs: 20,
        db_max_connections: 1,
        db_min_connections: 1,
        db_acquire_timeout_secs: 1,
        sync_chunk_size: 10,
        sync_chunk_delay_ms: 0,
        sync_batch_max: 100,
    };

    let result = greengoods_pipeline::client_from_config(&config);
    assert!(matches!(
        result,
        Err(greengoods_pipeline::PipelineError::MissingApiKey)
    ));
}
